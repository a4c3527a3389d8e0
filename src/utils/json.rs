//! JSON Extraction
//!
//! Model responses frequently wrap JSON payloads in markdown fences or
//! surrounding prose. This helper isolates the JSON before strict parsing.

/// Extract JSON from a model response string, handling markdown fences.
pub fn extract_json_from_response(text: &str) -> String {
    let trimmed = text.trim();

    // Try markdown code fences
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let content_start = if let Some(nl) = after_fence.find('\n') {
            nl + 1
        } else {
            0
        };
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim().to_string();
        }
    }

    // Try JSON object { ... }
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start <= end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bare_json() {
        let text = r#"{"objectives": []}"#;
        assert_eq!(extract_json_from_response(text), r#"{"objectives": []}"#);
    }

    #[test]
    fn test_extract_fenced_json() {
        let text = "```json\n{\"objectives\": []}\n```";
        assert_eq!(extract_json_from_response(text), r#"{"objectives": []}"#);
    }

    #[test]
    fn test_extract_json_with_prose() {
        let text = "Here is the analysis:\n{\"objectives\": [\"a\"]}\nLet me know.";
        assert_eq!(
            extract_json_from_response(text),
            r#"{"objectives": ["a"]}"#
        );
    }

    #[test]
    fn test_extract_non_json_passthrough() {
        let text = "not json at all";
        assert_eq!(extract_json_from_response(text), "not json at all");
    }
}
