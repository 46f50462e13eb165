//! Response normalizer.

use stylecraft_core::NormalizationError;

use crate::prompt::{REWRITTEN_CLOSE, REWRITTEN_OPEN};

/// Reduce a raw completion to the rewritten text.
///
/// Everything up to and including the last `<rewritten>` is an echoed prompt
/// and is dropped, as is everything from the first `</rewritten>` after it.
/// The rest is trimmed and must not be empty.
pub fn normalize(raw: &str) -> Result<String, NormalizationError> {
    let mut text = raw;

    if let Some((_, after)) = text.rsplit_once(REWRITTEN_OPEN) {
        text = after;
    }
    if let Some((before, _)) = text.split_once(REWRITTEN_CLOSE) {
        text = before;
    }

    let text = text.trim();
    if text.is_empty() {
        return Err(NormalizationError::EmptyResponse);
    }
    Ok(text.to_string())
}
