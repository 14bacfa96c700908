use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Cloud,
    Local,
}

impl Provider {
    /// Short name used in error messages and logs
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Cloud => "Cloud",
            Provider::Local => "Local",
        }
    }

    /// Human-facing label of the backend behind this provider
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Cloud => "Cloud AI (Gemini)",
            Provider::Local => "Local Ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which backend handles a request, plus the endpoint the local one needs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderSelection {
    pub provider: Provider,
    pub endpoint: Option<String>,
}

impl ProviderSelection {
    pub fn cloud() -> Self {
        Self {
            provider: Provider::Cloud,
            endpoint: None,
        }
    }

    pub fn local(endpoint: impl Into<String>) -> Self {
        Self {
            provider: Provider::Local,
            endpoint: Some(endpoint.into()),
        }
    }

    /// The endpoint, ignoring blank input.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
