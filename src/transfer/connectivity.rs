//! Connectivity pre-check for the shared-drive host
//!
//! The shared destination usually sits behind a VPN. Resolving the
//! configured host name is a cheap signal that the operator is connected
//! before any destructive step runs. The check is advisory: a successful
//! resolution does not guarantee the later copy will succeed.

use crate::core::error::PublishError;
use tokio::net::lookup_host;

/// Port used to form the lookup query; never actually connected to
const PROBE_PORT: u16 = 443;

/// Name-resolution probe against a fixed host
pub struct ConnectivityCheck {
    host: String,
}

impl ConnectivityCheck {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// The host this check probes
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolve the host name, failing with `ConnectivityFailed` otherwise
    pub async fn verify(&self) -> Result<(), PublishError> {
        let mut addresses = lookup_host((self.host.as_str(), PROBE_PORT))
            .await
            .map_err(|e| PublishError::ConnectivityFailed {
                host: self.host.clone(),
                message: e.to_string(),
            })?;

        if addresses.next().is_none() {
            return Err(PublishError::ConnectivityFailed {
                host: self.host.clone(),
                message: "no addresses resolved".to_string(),
            });
        }

        Ok(())
    }
}
