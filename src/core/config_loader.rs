//! Configuration file loader for release-publisher
//!
//! This module provides configuration loading, validation, and merging
//! capabilities.

use super::config::*;
use crate::core::error::PublishError;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Configuration file name
const CONFIG_FILENAME: &str = ".release-publisher.yaml";

lazy_static! {
    /// Environment variable pattern (${VAR_NAME})
    static ref ENV_VAR_PATTERN: Regex =
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid");
}

/// Configuration load options
#[derive(Debug, Clone)]
pub struct ConfigLoadOptions {
    /// Directory searched for the project config file
    pub project_path: PathBuf,

    /// Explicit config file path (overrides the project search)
    pub config_file: Option<PathBuf>,

    /// CLI arguments (highest priority)
    pub cli_args: Option<PublisherConfig>,

    /// Environment variables
    pub env: HashMap<String, String>,
}

/// Configuration validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationResult {
    /// Is configuration valid?
    pub valid: bool,

    /// Validation errors
    pub errors: Vec<ConfigValidationIssue>,

    /// Validation warnings
    pub warnings: Vec<ConfigValidationIssue>,
}

/// A single validation error or warning
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationIssue {
    /// Field path (e.g., "destination.root")
    pub field: String,

    /// Message
    pub message: String,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. CLI arguments
    /// 2. Environment variables
    /// 3. Project config (./.release-publisher.yaml, or --config)
    /// 4. Global config (~/.release-publisher.yaml)
    /// 5. Default values
    pub async fn load(options: ConfigLoadOptions) -> Result<PublisherConfig, PublishError> {
        let mut configs: Vec<PublisherConfig> = Vec::new();

        // 5. Default values (lowest priority)
        configs.push(PublisherConfig::default());

        // 4. Global config
        if let Some(global_config) = Self::load_global_config().await? {
            configs.push(global_config);
        }

        // 3. Project config
        if let Some(config_file) = &options.config_file {
            match Self::load_config_file(config_file).await? {
                Some(config) => configs.push(config),
                None => {
                    return Err(PublishError::ConfigError {
                        message: format!("config file not found: {}", config_file.display()),
                    });
                }
            }
        } else if let Some(project_config) =
            Self::load_config_file(&options.project_path.join(CONFIG_FILENAME)).await?
        {
            configs.push(project_config);
        }

        // 2. Environment variables
        if let Some(env_config) = Self::load_env_config(&options.env) {
            configs.push(env_config);
        }

        // 1. CLI arguments (highest priority)
        if let Some(cli_config) = options.cli_args {
            configs.push(cli_config);
        }

        // Merge all configs
        let merged_config = Self::merge_configs(configs);

        // Expand ${VAR} references in path/host strings
        let expanded_config = Self::expand_variables(merged_config, &options.env);

        Ok(expanded_config)
    }

    /// Load global configuration from ~/.release-publisher.yaml
    async fn load_global_config() -> Result<Option<PublisherConfig>, PublishError> {
        let Ok(home_dir) = env::var("HOME") else {
            return Ok(None);
        };

        Self::load_config_file(&PathBuf::from(home_dir).join(CONFIG_FILENAME)).await
    }

    /// Load configuration from a YAML file
    async fn load_config_file(file_path: &Path) -> Result<Option<PublisherConfig>, PublishError> {
        if !file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(file_path).await.map_err(|e| {
            PublishError::ConfigError {
                message: format!("failed to read config file: {}", e),
            }
        })?;

        let config: PublisherConfig =
            serde_yaml::from_str(&content).map_err(|e| PublishError::ConfigError {
                message: format!("failed to parse YAML config: {}", e),
            })?;

        Ok(Some(config))
    }

    /// Load configuration from environment variables
    ///
    /// The returned layer is sparse: only the sub-structs an environment
    /// variable actually sets are populated, so merging it does not reset
    /// lower-priority values back to the defaults.
    fn load_env_config(env: &HashMap<String, String>) -> Option<PublisherConfig> {
        let mut config = PublisherConfig::overlay();
        let mut has_changes = false;

        // RELEASE_PUBLISHER_DESTINATION -> destination.root
        if let Some(destination) = env.get("RELEASE_PUBLISHER_DESTINATION") {
            config.destination = Some(DestinationConfig {
                root: Some(PathBuf::from(destination)),
            });
            has_changes = true;
        }

        // RELEASE_PUBLISHER_HOST -> network.host
        if let Some(host) = env.get("RELEASE_PUBLISHER_HOST") {
            config.network = Some(NetworkConfig {
                enabled: None,
                host: Some(host.clone()),
            });
            has_changes = true;
        }

        // RELEASE_PUBLISHER_CONFIRM -> publish.confirm
        if let Some(confirm) = env.get("RELEASE_PUBLISHER_CONFIRM") {
            config.publish = Some(PublishOptionsConfig {
                confirm: Some(confirm == "true"),
                staging_dir: None,
            });
            has_changes = true;
        }

        if has_changes { Some(config) } else { None }
    }

    /// Merge multiple configurations with priority
    fn merge_configs(configs: Vec<PublisherConfig>) -> PublisherConfig {
        let mut result = PublisherConfig::default();

        for config in configs {
            Self::merge_into(&mut result, config);
        }

        result
    }

    /// Merge source config into target
    fn merge_into(target: &mut PublisherConfig, source: PublisherConfig) {
        // Version
        if !source.version.is_empty() {
            target.version = source.version;
        }

        // Variables
        if let Some(source_vars) = source.variables {
            let target_vars = target.variables.get_or_insert_with(HashMap::new);
            target_vars.extend(source_vars);
        }

        // Project
        if let Some(source_project) = source.project {
            let target_project = target.project.get_or_insert_with(ProjectConfig::default);

            if source_project.descriptor_file.is_some() {
                target_project.descriptor_file = source_project.descriptor_file;
            }
            if source_project.build_dir.is_some() {
                target_project.build_dir = source_project.build_dir;
            }
        }

        // Destination
        if let Some(source_destination) = source.destination {
            let target_destination = target
                .destination
                .get_or_insert_with(DestinationConfig::default);

            if source_destination.root.is_some() {
                target_destination.root = source_destination.root;
            }
        }

        // Prune patterns
        if let Some(source_prune) = source.prune {
            let target_prune = target.prune.get_or_insert_with(PruneConfig::default);

            if source_prune.markers.is_some() {
                target_prune.markers = source_prune.markers;
            }
            if source_prune.extensions.is_some() {
                target_prune.extensions = source_prune.extensions;
            }
            if source_prune.names.is_some() {
                target_prune.names = source_prune.names;
            }
            if source_prune.directories.is_some() {
                target_prune.directories = source_prune.directories;
            }
        }

        // Network
        if let Some(source_network) = source.network {
            let target_network = target.network.get_or_insert_with(NetworkConfig::default);

            if source_network.enabled.is_some() {
                target_network.enabled = source_network.enabled;
            }
            if source_network.host.is_some() {
                target_network.host = source_network.host;
            }
        }

        // Publish options
        if let Some(source_publish) = source.publish {
            let target_publish = target
                .publish
                .get_or_insert_with(PublishOptionsConfig::default);

            if source_publish.confirm.is_some() {
                target_publish.confirm = source_publish.confirm;
            }
            if source_publish.staging_dir.is_some() {
                target_publish.staging_dir = source_publish.staging_dir;
            }
        }
    }

    /// Expand `${VAR}` references in destination root, staging dir, and host
    ///
    /// Config-level `variables` take precedence over process environment
    /// variables; unknown references are left untouched.
    fn expand_variables(
        mut config: PublisherConfig,
        env: &HashMap<String, String>,
    ) -> PublisherConfig {
        let variables = config.variables.clone().unwrap_or_default();

        if let Some(destination) = &mut config.destination
            && let Some(root) = destination.root.take()
        {
            destination.root = Some(PathBuf::from(Self::expand_string(
                &root.to_string_lossy(),
                &variables,
                env,
            )));
        }

        if let Some(publish) = &mut config.publish
            && let Some(staging_dir) = publish.staging_dir.take()
        {
            publish.staging_dir = Some(PathBuf::from(Self::expand_string(
                &staging_dir.to_string_lossy(),
                &variables,
                env,
            )));
        }

        if let Some(network) = &mut config.network
            && let Some(host) = network.host.take()
        {
            network.host = Some(Self::expand_string(&host, &variables, env));
        }

        config
    }

    /// Expand `${VAR_NAME}` occurrences in a single string
    fn expand_string(
        input: &str,
        variables: &HashMap<String, String>,
        env: &HashMap<String, String>,
    ) -> String {
        ENV_VAR_PATTERN
            .replace_all(input, |caps: &regex::Captures| {
                let name = &caps[1];
                variables
                    .get(name)
                    .or_else(|| env.get(name))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Validate a merged configuration
    pub fn validate(config: &PublisherConfig) -> ConfigValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if config.version.is_empty() {
            errors.push(ConfigValidationIssue {
                field: "version".to_string(),
                message: "schema version is required".to_string(),
            });
        } else if config.version != "1.0" {
            warnings.push(ConfigValidationIssue {
                field: "version".to_string(),
                message: format!("unknown schema version '{}'", config.version),
            });
        }

        if let Some(network) = &config.network {
            if network.enabled == Some(true) && network.host.is_none() {
                warnings.push(ConfigValidationIssue {
                    field: "network.host".to_string(),
                    message: "connectivity check enabled but no host configured".to_string(),
                });
            }
        }

        ConfigValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_env_config() {
        let mut env = HashMap::new();
        env.insert(
            "RELEASE_PUBLISHER_DESTINATION".to_string(),
            "/mnt/shared/releases".to_string(),
        );
        env.insert(
            "RELEASE_PUBLISHER_HOST".to_string(),
            "releases.example.internal".to_string(),
        );
        env.insert("RELEASE_PUBLISHER_CONFIRM".to_string(), "false".to_string());

        let config = ConfigLoader::load_env_config(&env).unwrap();

        assert_eq!(
            config.destination.as_ref().unwrap().root,
            Some(PathBuf::from("/mnt/shared/releases"))
        );
        assert_eq!(
            config.network.as_ref().unwrap().host.as_deref(),
            Some("releases.example.internal")
        );
        assert_eq!(config.publish.as_ref().unwrap().confirm, Some(false));
    }

    #[test]
    fn test_load_env_config_empty() {
        let env = HashMap::new();
        assert!(ConfigLoader::load_env_config(&env).is_none());
    }

    #[test]
    fn test_env_layer_is_sparse() {
        let mut env = HashMap::new();
        env.insert(
            "RELEASE_PUBLISHER_DESTINATION".to_string(),
            "/mnt/shared/releases".to_string(),
        );

        let config = ConfigLoader::load_env_config(&env).unwrap();

        // Unrelated sections stay empty so they cannot clobber lower layers
        assert!(config.prune.is_none());
        assert!(config.publish.is_none());
        assert!(config.network.is_none());
    }

    #[test]
    fn test_env_destination_keeps_project_customization() {
        let project_config = PublisherConfig {
            prune: Some(PruneConfig {
                markers: Some(vec!["bundle".to_string()]),
                ..Default::default()
            }),
            publish: Some(PublishOptionsConfig {
                confirm: Some(false),
                staging_dir: None,
            }),
            ..Default::default()
        };

        let mut env = HashMap::new();
        env.insert(
            "RELEASE_PUBLISHER_DESTINATION".to_string(),
            "/mnt/shared/releases".to_string(),
        );
        let env_config = ConfigLoader::load_env_config(&env).unwrap();

        let merged = ConfigLoader::merge_configs(vec![project_config, env_config]);

        assert_eq!(
            merged.destination.as_ref().unwrap().root,
            Some(PathBuf::from("/mnt/shared/releases"))
        );
        assert_eq!(
            merged.prune.as_ref().unwrap().markers,
            Some(vec!["bundle".to_string()])
        );
        assert_eq!(merged.publish.as_ref().unwrap().confirm, Some(false));
    }

    #[test]
    fn test_expand_string() {
        let variables = HashMap::new();
        let mut env = HashMap::new();
        env.insert("SHARE_ROOT".to_string(), "/mnt/shared".to_string());

        let result =
            ConfigLoader::expand_string("${SHARE_ROOT}/releases", &variables, &env);

        assert_eq!(result, "/mnt/shared/releases");
    }

    #[test]
    fn test_expand_string_variables_take_precedence() {
        let mut variables = HashMap::new();
        variables.insert("SHARE_ROOT".to_string(), "/mnt/primary".to_string());
        let mut env = HashMap::new();
        env.insert("SHARE_ROOT".to_string(), "/mnt/fallback".to_string());

        let result = ConfigLoader::expand_string("${SHARE_ROOT}", &variables, &env);

        assert_eq!(result, "/mnt/primary");
    }

    #[test]
    fn test_expand_string_unknown_left_untouched() {
        let variables = HashMap::new();
        let env = HashMap::new();

        let result = ConfigLoader::expand_string("${NOT_SET}/releases", &variables, &env);

        assert_eq!(result, "${NOT_SET}/releases");
    }

    #[test]
    fn test_merge_configs_cli_wins() {
        let file_config = PublisherConfig {
            destination: Some(DestinationConfig {
                root: Some(PathBuf::from("/mnt/from-file")),
            }),
            network: Some(NetworkConfig {
                enabled: Some(true),
                host: Some("from-file.internal".to_string()),
            }),
            ..Default::default()
        };

        let cli_config = PublisherConfig {
            destination: Some(DestinationConfig {
                root: Some(PathBuf::from("/mnt/from-cli")),
            }),
            ..Default::default()
        };

        let merged = ConfigLoader::merge_configs(vec![file_config, cli_config]);

        assert_eq!(
            merged.destination.as_ref().unwrap().root,
            Some(PathBuf::from("/mnt/from-cli"))
        );
        // Untouched fields survive the higher-priority layer
        assert_eq!(
            merged.network.as_ref().unwrap().host.as_deref(),
            Some("from-file.internal")
        );
    }

    #[test]
    fn test_merge_prune_field_wise() {
        let base = PublisherConfig::default();
        let override_config = PublisherConfig {
            prune: Some(PruneConfig {
                names: Some(vec!["App-AddIn.xll".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = ConfigLoader::merge_configs(vec![base, override_config]);
        let prune = merged.prune.unwrap();

        assert_eq!(prune.names, Some(vec!["App-AddIn.xll".to_string()]));
        // Defaults not overridden remain in place
        assert_eq!(prune.markers, Some(vec!["packed".to_string()]));
    }

    #[tokio::test]
    async fn test_load_project_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            "version: \"1.0\"\ndestination:\n  root: /mnt/shared/releases"
        )
        .unwrap();

        let options = ConfigLoadOptions {
            project_path: dir.path().to_path_buf(),
            config_file: None,
            cli_args: None,
            env: HashMap::new(),
        };

        let config = ConfigLoader::load(options).await.unwrap();

        assert_eq!(
            config.destination.as_ref().unwrap().root,
            Some(PathBuf::from("/mnt/shared/releases"))
        );
    }

    #[tokio::test]
    async fn test_load_explicit_config_file_missing() {
        let dir = tempfile::tempdir().unwrap();

        let options = ConfigLoadOptions {
            project_path: dir.path().to_path_buf(),
            config_file: Some(dir.path().join("nope.yaml")),
            cli_args: None,
            env: HashMap::new(),
        };

        let err = ConfigLoader::load(options).await.unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[tokio::test]
    async fn test_load_expands_destination() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            "version: \"1.0\"\nvariables:\n  DRIVE: /mnt/shared\ndestination:\n  root: ${{DRIVE}}/releases"
        )
        .unwrap();

        let options = ConfigLoadOptions {
            project_path: dir.path().to_path_buf(),
            config_file: None,
            cli_args: None,
            env: HashMap::new(),
        };

        let config = ConfigLoader::load(options).await.unwrap();

        assert_eq!(
            config.destination.as_ref().unwrap().root,
            Some(PathBuf::from("/mnt/shared/releases"))
        );
    }

    #[test]
    fn test_validate_version_required() {
        let mut config = PublisherConfig::default();
        config.version = "".to_string();

        let result = ConfigLoader::validate(&config);

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "version");
    }

    #[test]
    fn test_validate_unknown_version_warning() {
        let mut config = PublisherConfig::default();
        config.version = "2.0".to_string();

        let result = ConfigLoader::validate(&config);

        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].field, "version");
    }

    #[test]
    fn test_validate_network_without_host() {
        let mut config = PublisherConfig::default();
        config.network = Some(NetworkConfig {
            enabled: Some(true),
            host: None,
        });

        let result = ConfigLoader::validate(&config);

        assert!(result.valid);
        assert!(result.warnings.iter().any(|w| w.field == "network.host"));
    }
}
