use std::sync::OnceLock;

use paracopy_config::OutputMode;
use regex::Regex;

use crate::content::BlockContent;

/// Clean one section fragment for the clipboard.
///
/// Injected widgets are removed from a copy of the content, the result is
/// serialized per `mode` (falling back to visible text when the content has no
/// markup form), trimmed, and a trailing block anchor such as `^abc-123` is
/// dropped.
pub fn sanitize(content: &BlockContent, mode: OutputMode) -> String {
    let cleaned = content.without_decorations();
    let serialized = match mode {
        OutputMode::Plain => cleaned.visible_text(),
        OutputMode::Structured => cleaned
            .to_markup()
            .unwrap_or_else(|| cleaned.visible_text()),
    };
    strip_block_anchor(serialized.trim())
}

/// Remove a trailing ` ^block-id` reference.
pub fn strip_block_anchor(text: &str) -> String {
    static BLOCK_ANCHOR: OnceLock<Regex> = OnceLock::new();
    let block_anchor = BLOCK_ANCHOR
        .get_or_init(|| Regex::new(r"\s*\^[A-Za-z0-9_-]+$").expect("Invalid block anchor regex"));

    block_anchor.replace(text, "").into_owned()
}

/// Sanitize every fragment and join them with newlines, in order.
pub fn serialize_section(fragments: &[BlockContent], mode: OutputMode) -> String {
    fragments
        .iter()
        .map(|fragment| sanitize(fragment, mode))
        .collect::<Vec<_>>()
        .join("\n")
}
