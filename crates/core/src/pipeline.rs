use std::path::Path;

use tokio::fs;

use crate::{
    backends::{Backend, ScriptBackend},
    config::Settings,
    error::{GenerationError, Result},
    provider::ProviderSelection,
    types::{GenerationRequest, ScriptSegment},
};

/// Turns a validated request into a script using the selected backend.
///
/// Holds the settings read at startup, including the cloud credential, and a
/// shared HTTP client. Every failure comes back as one [`GenerationError`].
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    settings: Settings,
    client: reqwest::Client,
}

impl ScriptGenerator {
    pub fn new(settings: Settings) -> Self {
        Self::with_client(settings, reqwest::Client::new())
    }

    pub fn with_client(settings: Settings, client: reqwest::Client) -> Self {
        Self { settings, client }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
        selection: &ProviderSelection,
    ) -> std::result::Result<Vec<ScriptSegment>, GenerationError> {
        let prompt = request.prompt();
        self.generate_from_prompt(&prompt, selection).await
    }

    /// Send an already built prompt.
    pub async fn generate_from_prompt(
        &self,
        prompt: &str,
        selection: &ProviderSelection,
    ) -> std::result::Result<Vec<ScriptSegment>, GenerationError> {
        let provider = selection.provider;
        let result = async {
            let backend = Backend::for_selection(selection, &self.settings, self.client.clone())?;
            tracing::info!(provider = %provider, "Requesting script");
            backend.generate(prompt).await
        }
        .await;

        match result {
            Ok(segments) => {
                tracing::info!(provider = %provider, segments = segments.len(), "Script generated");
                Ok(segments)
            }
            Err(e) => {
                tracing::warn!(provider = %provider, error = %e, "Error generating script");
                Err(GenerationError::from(e))
            }
        }
    }
}

/// Where a session stands. Each finished request replaces the previous
/// result or error wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    InFlight,
    Ready(Vec<ScriptSegment>),
    Failed(String),
}

impl GenerationState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, GenerationState::InFlight)
    }

    pub fn script(&self) -> Option<&[ScriptSegment]> {
        match self {
            GenerationState::Ready(segments) => Some(segments),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            GenerationState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A generator plus the latest outcome. `generate` takes `&mut self`, so a
/// session never has two requests outstanding.
#[derive(Debug)]
pub struct ScriptSession {
    generator: ScriptGenerator,
    state: GenerationState,
}

impl ScriptSession {
    pub fn new(generator: ScriptGenerator) -> Self {
        Self {
            generator,
            state: GenerationState::Idle,
        }
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub async fn generate(
        &mut self,
        request: &GenerationRequest,
        selection: &ProviderSelection,
    ) -> &GenerationState {
        self.state = GenerationState::InFlight;
        self.state = match self.generator.generate(request, selection).await {
            Ok(segments) => GenerationState::Ready(segments),
            Err(e) => GenerationState::Failed(e.to_string()),
        };
        &self.state
    }
}

/// Load a script previously written with [`save_script`]
pub async fn load_script(path: &Path) -> Result<Vec<ScriptSegment>> {
    let json_content = fs::read_to_string(path).await?;
    let script: Vec<ScriptSegment> = serde_json::from_str(&json_content)?;
    Ok(script)
}

/// Save a script as pretty-printed JSON
pub async fn save_script(script: &[ScriptSegment], path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(script)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}
