//! Error handling for release publishing
//!
//! This module provides comprehensive error types for every stage of the
//! publish pipeline using the thiserror crate for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for release publishing operations
#[derive(Error, Debug)]
pub enum PublishError {
    // Descriptor errors
    #[error("プロジェクト記述ファイルが見つかりません: {}", .path.display())]
    DescriptorNotFound { path: PathBuf },

    #[error("プロジェクト記述ファイルの解析に失敗しました: {message}")]
    DescriptorParse { path: PathBuf, message: String },

    #[error("バージョン要素（PropertyGroup/Version）が見つかりません: {}", .path.display())]
    VersionMissing { path: PathBuf },

    // Staging errors
    #[error("ビルド成果物の削除に失敗しました: {message}")]
    PruneFailed { path: PathBuf, message: String },

    #[error("アーカイブの作成に失敗しました: {message}")]
    ArchiveFailed { path: PathBuf, message: String },

    // Transfer errors
    #[error("ホスト '{host}' の名前解決に失敗しました: {message}")]
    ConnectivityFailed { host: String, message: String },

    #[error("共有ドライブへの転送に失敗しました: {message}")]
    TransferFailed {
        source_path: PathBuf,
        destination: PathBuf,
        message: String,
    },

    #[error("確認プロンプトの読み取りに失敗しました: {message}")]
    PromptFailed { message: String },

    // Configuration errors
    #[error("設定エラー: {message}")]
    ConfigError { message: String },
}

impl PublishError {
    /// Check if retrying the run may succeed without changing the project
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PruneFailed { .. }
                | Self::ArchiveFailed { .. }
                | Self::ConnectivityFailed { .. }
                | Self::TransferFailed { .. }
                | Self::PromptFailed { .. }
        )
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::DescriptorNotFound { .. } => vec![
                "プロジェクト記述ファイルのパスを確認してください",
                "--project-file オプションまたは設定ファイルで指定してください",
            ],
            Self::DescriptorParse { .. } => {
                vec!["プロジェクト記述ファイルが整形式のXMLか確認してください"]
            }
            Self::VersionMissing { .. } => {
                vec!["PropertyGroup 直下に Version 要素があるか確認してください"]
            }
            Self::PruneFailed { .. } => vec![
                "対象ファイルが他のプロセスで使用中でないか確認してください",
                "ビルド出力ディレクトリへの書き込み権限を確認してください",
            ],
            Self::ArchiveFailed { .. } => vec![
                "ディスクの空き容量を確認してください",
                "作業ディレクトリへの書き込み権限を確認してください",
            ],
            Self::ConnectivityFailed { .. } => vec![
                "VPNに接続しているか確認してください",
                "ホスト名が正しいか確認してください",
            ],
            Self::TransferFailed { .. } => vec![
                "共有ドライブがマウントされているか確認してください",
                "宛先ディレクトリへの書き込み権限を確認してください",
            ],
            Self::PromptFailed { .. } => vec![
                "対話端末から実行するか、--overwrite / --non-interactive を使用してください",
            ],
            Self::ConfigError { .. } => {
                vec![".release-publisher.yaml とCLIオプションを確認してください"]
            }
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::DescriptorNotFound { .. } => "DESCRIPTOR_NOT_FOUND",
            Self::DescriptorParse { .. } => "DESCRIPTOR_PARSE_FAILED",
            Self::VersionMissing { .. } => "VERSION_MISSING",
            Self::PruneFailed { .. } => "PRUNE_FAILED",
            Self::ArchiveFailed { .. } => "ARCHIVE_FAILED",
            Self::ConnectivityFailed { .. } => "CONNECTIVITY_FAILED",
            Self::TransferFailed { .. } => "TRANSFER_FAILED",
            Self::PromptFailed { .. } => "PROMPT_FAILED",
            Self::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}
