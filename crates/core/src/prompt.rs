/// Build the scriptwriting instruction sent to every backend.
///
/// Title and outline are interpolated verbatim; callers validate them first.
pub fn build_prompt(title: &str, outline: &str, duration_minutes: u32) -> String {
    format!(
        r#"You are an expert YouTube scriptwriter. Your task is to generate a detailed video script based on a title, a high-level outline, and a target duration.

The output must be a valid JSON array of objects. Each object in the array represents a segment of the video and must have exactly the following three string properties:
1. "timestamp": The estimated start and end time of the segment (e.g., "00:00 - 00:15"). Calculate these timestamps to roughly match the target duration.
2. "narration": The narrator's script for this segment. This is what the speaker will say.
3. "broll": A description of the visual elements, B-roll footage, on-screen text, or actions that should be shown while the narration is happening.

Based on the following inputs, generate the script:

Video Title: "{title}"
Video Outline:
---
{outline}
---
Target Duration: {duration_minutes} minutes.

Please ensure the entire script flows logically, the timestamps are consistent with each other, and they collectively add up to the target duration of {duration_minutes} minutes. Generate only the raw JSON array, with no other text, explanations, or markdown formatting like ```json."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_inputs_literally() {
        let prompt = build_prompt("Intro to Sourdough", "- Hook\n- Prep\n- Bake", 5);
        assert!(prompt.contains("Intro to Sourdough"));
        assert!(prompt.contains("- Hook\n- Prep\n- Bake"));
        assert!(prompt.contains("Target Duration: 5 minutes."));
    }

    #[test]
    fn does_not_escape_quotes_or_braces() {
        let prompt = build_prompt(r#"The "best" {bread}"#, "{ \"a\": 1 }", 12);
        assert!(prompt.contains(r#""The "best" {bread}""#));
        assert!(prompt.contains("{ \"a\": 1 }"));
        assert!(prompt.contains("12 minutes"));
    }

    #[test]
    fn describes_output_shape() {
        let prompt = build_prompt("t", "o", 1);
        for field in ["\"timestamp\"", "\"narration\"", "\"broll\""] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("JSON array"));
        assert!(prompt.contains("only the raw JSON array"));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(build_prompt("a", "b", 3), build_prompt("a", "b", 3));
    }
}
