use super::SessionIdConfig;
use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use std::path::Path;

/// The prefix for environment variables that override file-based configuration,
/// e.g. `SESSION_ID_COOKIE_DOMAIN`.
pub(crate) const ENV_PREFIX: &str = "SESSION_ID_";

impl SessionIdConfig {
    /// Load the configuration by merging together three sources:
    ///
    /// 1. Environment variables (`SESSION_ID_*`, e.g. `SESSION_ID_COOKIE_DOMAIN`)
    /// 2. The YAML file at `path`, if provided
    /// 3. The default configuration
    ///
    /// The list above is ordered by precedence: environment variables take precedence
    /// over the configuration file, which in turn takes precedence over the defaults.
    ///
    /// It fails if `path` is provided but doesn't exist, or if any of the
    /// sources contains values of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let span = tracing::info_span!(
            "Loading session configuration",
            configuration.file = ?path,
        );
        let _guard = span.enter();

        let mut figment = Figment::from(Serialized::defaults(SessionIdConfig::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError(anyhow::anyhow!(
                    "The configuration file `{}` doesn't exist",
                    path.display()
                )));
            }
            figment = figment.merge(Yaml::file(path));
        }
        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: SessionIdConfig = figment
            .extract()
            .context("Failed to load hierarchical configuration")
            .map_err(ConfigError)?;
        tracing::info!(cookie_domain = %config.cookie_domain, "Loaded session configuration");
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to load the session configuration")]
/// The error returned by [`SessionIdConfig::load`].
pub struct ConfigError(#[source] anyhow::Error);
