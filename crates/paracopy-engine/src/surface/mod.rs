//! # Rendered Surface
//!
//! The capability the engine needs from a host's rendered output. The engine
//! never owns blocks: it enumerates them in order, reads their structural
//! content, and annotates them with an affordance and an indentation marker.
//!
//! Handles are cheap to clone and share the underlying block, the way DOM
//! element references do, so mutation goes through `&self`.
//!
//! [`memory`] provides an in-memory implementation used by the markdown render
//! feed and the tests.

pub mod memory;

use paracopy_config::IndentMode;
use thiserror::Error;

use crate::content::BlockContent;
use crate::i18n::{Locale, Message, text};

pub use memory::{MemoryBlock, MemoryRoot};

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Block {index} is no longer attached to the rendered document")]
    Detached { index: usize },
    #[error("Host rejected block update: {0}")]
    Host(String),
}

/// Indentation class applied to every block in a decorated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentMarker {
    FirstLine,
    Hanging,
    NoIndent,
}

impl IndentMarker {
    pub const ALL: [IndentMarker; 3] = [
        IndentMarker::FirstLine,
        IndentMarker::Hanging,
        IndentMarker::NoIndent,
    ];

    pub fn class_name(self) -> &'static str {
        match self {
            IndentMarker::FirstLine => "lac-indent-first",
            IndentMarker::Hanging => "lac-indent-hanging",
            IndentMarker::NoIndent => "lac-no-indent",
        }
    }
}

impl From<IndentMode> for IndentMarker {
    fn from(mode: IndentMode) -> Self {
        match mode {
            IndentMode::First => IndentMarker::FirstLine,
            IndentMode::Hanging => IndentMarker::Hanging,
            IndentMode::None => IndentMarker::NoIndent,
        }
    }
}

/// Presentation of the copy affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affordance {
    pub label: String,
    pub title: String,
    pub aria_label: String,
}

impl Affordance {
    pub fn localized(locale: Locale) -> Self {
        Self {
            label: text(locale, Message::CopyButtonIcon).to_string(),
            title: text(locale, Message::CopyButtonTitle).to_string(),
            aria_label: text(locale, Message::CopyButtonAria).to_string(),
        }
    }
}

/// One rendered block as seen by the engine.
pub trait RenderedBlock {
    /// A structural copy of the block's current content, injected widgets included.
    fn content(&self) -> BlockContent;

    fn visible_text(&self) -> String {
        self.content().visible_text()
    }

    fn has_affordance(&self) -> bool;

    /// Prepend the copy affordance to the block.
    fn attach_affordance(&self, affordance: &Affordance) -> Result<(), SurfaceError>;

    /// Change the visible label of an attached affordance. No-op when there is none.
    fn set_affordance_label(&self, label: &str);

    /// Clear every [`IndentMarker`] on the block and apply `marker`.
    fn set_indent_marker(&self, marker: IndentMarker) -> Result<(), SurfaceError>;
}

/// The output of one render pass: blocks in document order.
pub trait RenderedRoot {
    type Block: RenderedBlock + Clone;

    fn blocks(&self) -> Vec<Self::Block>;
}
