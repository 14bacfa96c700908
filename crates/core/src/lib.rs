//! Reelscript Core Library
//!
//! Builds a scriptwriting prompt from a title, outline and target duration,
//! sends it to a cloud (Gemini) or local (Ollama) model, and decodes the reply
//! into narration/B-roll segments.

pub mod backends;
pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod types;

// Re-export commonly used items at crate root
pub use backends::{Backend, CloudBackend, LocalBackend, ScriptBackend};
pub use config::{CloudConfig, LocalConfig, Settings};
pub use decode::parse_segments;
pub use error::{ErrorKind, GenerationError, Result, ScriptError};
pub use format::{format_script_plain, format_script_readable};
pub use pipeline::{GenerationState, ScriptGenerator, ScriptSession, load_script, save_script};
pub use prompt::build_prompt;
pub use provider::{Provider, ProviderSelection};
pub use types::{GenerationRequest, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES, ScriptSegment};
