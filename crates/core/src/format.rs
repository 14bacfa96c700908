use crate::types::ScriptSegment;

const DIVIDER: &str = "--------------------";

/// Format a script as the plain-text export
pub fn format_script_plain(script: &[ScriptSegment]) -> String {
    script
        .iter()
        .map(|segment| {
            format!(
                "[{}]\n\nNARRATION:\n{}\n\nB-ROLL / VISUALS:\n{}\n\n{}\n",
                segment.timestamp, segment.narration, segment.broll, DIVIDER
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a script as human-readable markdown
pub fn format_script_readable(title: Option<&str>, script: &[ScriptSegment]) -> String {
    let mut output = String::new();

    if let Some(title) = title {
        output.push_str(&format!("# {}\n\n", title));
    }

    output.push_str(&format!("**Segments:** {}\n\n", script.len()));

    for segment in script {
        output.push_str(&format!("## ⏱ {}\n\n", segment.timestamp));

        output.push_str("### Narration\n\n");
        output.push_str(segment.narration.trim());
        output.push_str("\n\n");

        output.push_str("### Visuals (B-Roll)\n\n");
        output.push_str(segment.broll.trim());
        output.push_str("\n\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(timestamp: &str, narration: &str, broll: &str) -> ScriptSegment {
        ScriptSegment {
            timestamp: timestamp.into(),
            narration: narration.into(),
            broll: broll.into(),
        }
    }

    #[test]
    fn plain_export_matches_layout() {
        let script = vec![
            segment("00:00 - 00:15", "Welcome!", "Logo reveal"),
            segment("00:15 - 00:45", "Let's bake.", "Flour on a bench"),
        ];
        let expected = "[00:00 - 00:15]\n\nNARRATION:\nWelcome!\n\nB-ROLL / VISUALS:\nLogo reveal\n\n--------------------\n\
\n[00:15 - 00:45]\n\nNARRATION:\nLet's bake.\n\nB-ROLL / VISUALS:\nFlour on a bench\n\n--------------------\n";
        assert_eq!(format_script_plain(&script), expected);
    }

    #[test]
    fn plain_export_of_empty_script_is_empty() {
        assert_eq!(format_script_plain(&[]), "");
    }

    #[test]
    fn readable_lists_segments_in_order() {
        let script = vec![segment("00:00 - 00:10", "one", "a"), segment("00:10 - 00:20", "two", "b")];
        let out = format_script_readable(Some("Sourdough"), &script);
        assert!(out.starts_with("# Sourdough\n\n**Segments:** 2"));
        let first = out.find("00:00 - 00:10").unwrap();
        let second = out.find("00:10 - 00:20").unwrap();
        assert!(first < second);
        assert!(out.contains("### Visuals (B-Roll)\n\nb"));
    }

    #[test]
    fn readable_without_title_starts_with_count() {
        let out = format_script_readable(None, &[segment("00:00 - 00:10", "one", "a")]);
        assert!(out.starts_with("**Segments:** 1\n\n## ⏱ 00:00 - 00:10"));
        assert!(!out.contains("# \n"));
    }
}
