//! Script generation backends.
//!
//! Both backends sit behind [`ScriptBackend`]; [`Backend`] is the closed set
//! the rest of the crate dispatches through. All configuration checks happen
//! when a backend is constructed, so a misconfigured request never reaches the
//! network.

mod cloud;
mod local;

use async_trait::async_trait;

pub use cloud::CloudBackend;
pub use local::LocalBackend;

use crate::{
    config::Settings,
    error::{Result, ScriptError},
    provider::{Provider, ProviderSelection},
    types::ScriptSegment,
};

#[async_trait]
pub trait ScriptBackend: Send + Sync {
    fn provider(&self) -> Provider;

    /// Submit a prompt and decode the returned script.
    async fn generate(&self, prompt: &str) -> Result<Vec<ScriptSegment>>;
}

#[derive(Debug, Clone)]
pub enum Backend {
    Cloud(CloudBackend),
    Local(LocalBackend),
}

impl Backend {
    /// Build the backend for `selection`, failing on missing credentials or endpoints.
    pub fn for_selection(
        selection: &ProviderSelection,
        settings: &Settings,
        client: reqwest::Client,
    ) -> Result<Self> {
        match selection.provider {
            Provider::Cloud => Ok(Backend::Cloud(CloudBackend::new(client, &settings.cloud)?)),
            Provider::Local => {
                let endpoint = selection.endpoint().ok_or(ScriptError::MissingEndpoint)?;
                Ok(Backend::Local(LocalBackend::new(
                    client,
                    endpoint,
                    &settings.local.model,
                )?))
            }
        }
    }
}

#[async_trait]
impl ScriptBackend for Backend {
    fn provider(&self) -> Provider {
        match self {
            Backend::Cloud(backend) => backend.provider(),
            Backend::Local(backend) => backend.provider(),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<ScriptSegment>> {
        match self {
            Backend::Cloud(backend) => backend.generate(prompt).await,
            Backend::Local(backend) => backend.generate(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloudConfig;

    #[test]
    fn local_without_endpoint_is_rejected() {
        let selection = ProviderSelection {
            provider: Provider::Local,
            endpoint: None,
        };
        let err =
            Backend::for_selection(&selection, &Settings::default(), reqwest::Client::new())
                .unwrap_err();
        assert!(matches!(err, ScriptError::MissingEndpoint));
    }

    #[test]
    fn cloud_without_key_is_rejected() {
        let err = Backend::for_selection(
            &ProviderSelection::cloud(),
            &Settings::default(),
            reqwest::Client::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::MissingApiKey));
    }

    #[test]
    fn selection_picks_matching_variant() {
        let settings = Settings {
            cloud: CloudConfig {
                api_key: Some("k".into()),
                ..CloudConfig::default()
            },
            ..Settings::default()
        };

        let cloud = Backend::for_selection(
            &ProviderSelection::cloud(),
            &settings,
            reqwest::Client::new(),
        )
        .unwrap();
        assert_eq!(cloud.provider(), Provider::Cloud);

        let local = Backend::for_selection(
            &ProviderSelection::local("http://localhost:11434/api/generate"),
            &settings,
            reqwest::Client::new(),
        )
        .unwrap();
        assert_eq!(local.provider(), Provider::Local);
    }
}
