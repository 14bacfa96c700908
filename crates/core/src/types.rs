use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, ScriptError},
    prompt::build_prompt,
};

pub const MIN_DURATION_MINUTES: u32 = 1;
pub const MAX_DURATION_MINUTES: u32 = 60;

/// One unit of a generated script: what is said, what is shown, and roughly when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub timestamp: String,
    pub narration: String,
    pub broll: String,
}

/// Validated input for a single generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    title: String,
    outline: String,
    duration_minutes: u32,
}

impl GenerationRequest {
    pub fn new(
        title: impl Into<String>,
        outline: impl Into<String>,
        duration_minutes: u32,
    ) -> Result<Self> {
        let title = title.into();
        let outline = outline.into();

        if title.trim().is_empty() {
            return Err(ScriptError::EmptyField { field: "Title" });
        }
        if outline.trim().is_empty() {
            return Err(ScriptError::EmptyField { field: "Outline" });
        }
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
            return Err(ScriptError::InvalidDuration {
                got: duration_minutes,
                min: MIN_DURATION_MINUTES,
                max: MAX_DURATION_MINUTES,
            });
        }

        Ok(Self {
            title,
            outline,
            duration_minutes,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn outline(&self) -> &str {
        &self.outline
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn prompt(&self) -> String {
        build_prompt(&self.title, &self.outline, self.duration_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn accepts_valid_input() {
        let req = GenerationRequest::new("Intro to Sourdough", "- Hook\n- Bake", 5).unwrap();
        assert_eq!(req.title(), "Intro to Sourdough");
        assert_eq!(req.duration_minutes(), 5);
    }

    #[test]
    fn rejects_blank_title_and_outline() {
        let err = GenerationRequest::new("   ", "outline", 5).unwrap_err();
        assert!(matches!(err, ScriptError::EmptyField { field: "Title" }));

        let err = GenerationRequest::new("title", "\n", 5).unwrap_err();
        assert!(matches!(err, ScriptError::EmptyField { field: "Outline" }));
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn duration_bounds_are_inclusive() {
        assert!(GenerationRequest::new("t", "o", 1).is_ok());
        assert!(GenerationRequest::new("t", "o", 60).is_ok());
        assert!(GenerationRequest::new("t", "o", 0).is_err());
        assert!(matches!(
            GenerationRequest::new("t", "o", 61).unwrap_err(),
            ScriptError::InvalidDuration { got: 61, .. }
        ));
    }

    #[test]
    fn segment_uses_plain_field_names() {
        let segment = ScriptSegment {
            timestamp: "00:00 - 00:15".into(),
            narration: "Hi".into(),
            broll: "Logo".into(),
        };
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"timestamp": "00:00 - 00:15", "narration": "Hi", "broll": "Logo"})
        );
    }
}
