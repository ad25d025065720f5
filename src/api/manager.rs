use super::client::ContentfulClient;
use super::models::Environment;
use super::resilience::ResilienceConfig;
use anyhow::Context;
use log::info;

/// Resolved connection parameters for a duplication run
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub base_url: String,
    pub space_id: String,
    pub access_token: String,
    pub environment: String,
    pub target_environment: String,
    /// Duplicate into another space (defaults to `space_id`)
    pub target_space_id: Option<String>,
    /// Token for the target space (defaults to `access_token`)
    pub target_access_token: Option<String>,
}

impl ConnectionSettings {
    pub fn source(&self) -> Environment {
        Environment {
            base_url: self.base_url.clone(),
            space_id: self.space_id.clone(),
            environment_id: self.environment.clone(),
            access_token: self.access_token.clone(),
        }
    }

    pub fn target(&self) -> Environment {
        Environment {
            base_url: self.base_url.clone(),
            space_id: self
                .target_space_id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| self.space_id.clone()),
            environment_id: self.target_environment.clone(),
            access_token: self
                .target_access_token
                .clone()
                .filter(|token| !token.is_empty())
                .unwrap_or_else(|| self.access_token.clone()),
        }
    }
}

/// Holds the source and target clients for one run
pub struct ClientManager {
    source: ContentfulClient,
    target: ContentfulClient,
}

impl ClientManager {
    /// Build both clients and verify that each environment is reachable
    pub async fn connect(settings: &ConnectionSettings, resilience: ResilienceConfig) -> anyhow::Result<Self> {
        let source_env = settings.source();
        let target_env = settings.target();

        let mut source = ContentfulClient::with_resilience(source_env.clone(), resilience.clone())
            .context("Failed to build source client")?;
        source
            .resolve_environment_name()
            .await
            .with_context(|| format!("Failed to open source environment '{}' in space '{}'", source_env.environment_id, source_env.space_id))?;

        let mut target = ContentfulClient::with_resilience(target_env.clone(), resilience)
            .context("Failed to build target client")?;
        target
            .resolve_environment_name()
            .await
            .with_context(|| format!("Failed to open target environment '{}' in space '{}'", target_env.environment_id, target_env.space_id))?;

        info!(
            "Connected: {}/{} -> {}/{}",
            source_env.space_id, source_env.environment_id, target_env.space_id, target_env.environment_id
        );

        Ok(Self { source, target })
    }

    pub fn source(&self) -> &ContentfulClient {
        &self.source
    }

    pub fn target(&self) -> &ContentfulClient {
        &self.target
    }
}
