//! Style prompt builder.
//!
//! The prompt wraps the query in `<original>` markers and ends with an open
//! `<rewritten>` marker. The model is told to close it with `</rewritten>`,
//! which is what [`crate::normalize`] keys on.

use stylecraft_core::{Style, TransformError};

pub const ORIGINAL_OPEN: &str = "<original>";
pub const ORIGINAL_CLOSE: &str = "</original>";
pub const REWRITTEN_OPEN: &str = "<rewritten>";
pub const REWRITTEN_CLOSE: &str = "</rewritten>";

/// The tone each style asks for.
pub fn guidance(style: Style) -> &'static str {
    match style {
        Style::Casual => "casual, friendly, and engaging",
        Style::Formal => "strictly formal, professional, and highly articulate",
    }
}

/// Build the model prompt for `query` in `style`.
///
/// Deterministic. The query is embedded verbatim.
pub fn build_prompt(query: &str, style: Style) -> Result<String, TransformError> {
    if query.trim().is_empty() {
        return Err(TransformError::InvalidInput(
            "query must not be empty".into(),
        ));
    }

    Ok(format!(
        "You are an AI assistant. Your task is to rephrase the user's input into a {tone} tone. \
         Provide only the rephrased text, without any preamble or conversational filler.\n\
         The text to rephrase appears between {ORIGINAL_OPEN} and {ORIGINAL_CLOSE}. \
         Write the rephrased text after {REWRITTEN_OPEN} and end it with {REWRITTEN_CLOSE}.\n\n\
         {ORIGINAL_OPEN}\n{query}\n{ORIGINAL_CLOSE}\n{REWRITTEN_OPEN}",
        tone = guidance(style),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        for style in Style::ALL {
            let a = build_prompt("see you tomorrow", style).unwrap();
            let b = build_prompt("see you tomorrow", style).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn embeds_style_guidance_and_query() {
        let prompt = build_prompt("please send me the report", Style::Formal).unwrap();
        assert!(prompt.contains("strictly formal, professional, and highly articulate"));
        assert!(prompt.contains("<original>\nplease send me the report\n</original>"));
        assert!(prompt.ends_with(REWRITTEN_OPEN));

        let casual = build_prompt("please send me the report", Style::Casual).unwrap();
        assert!(casual.contains("casual, friendly, and engaging"));
        assert_ne!(prompt, casual);
    }

    #[test]
    fn query_is_verbatim() {
        let query = "  keep   my\nspacing  ";
        let prompt = build_prompt(query, Style::Casual).unwrap();
        assert!(prompt.contains(query));
    }

    #[test]
    fn rejects_blank_query() {
        for query in ["", "  ", "\n\t "] {
            assert!(matches!(
                build_prompt(query, Style::Casual),
                Err(TransformError::InvalidInput(_))
            ));
        }
    }
}
