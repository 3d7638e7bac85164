//! # paracopy engine
//!
//! Detects section-start paragraphs in a rendered note using user patterns,
//! decorates them with a copy affordance, and serializes a section (the start
//! paragraph plus everything up to the next start) for the clipboard.
//!
//! ## Modules
//!
//! - **`patterns`**: compile pattern lines into a [`PatternSet`]
//! - **`sections`**: classify blocks and extract section ranges
//! - **`sanitize`**: strip widgets and block anchors, serialize fragments
//! - **`decorate`**: the per-render decoration pass
//! - **`action`**: the per-affordance copy action and host collaborators
//! - **`surface`**: the rendered-block capability and its in-memory implementation
//! - **`render`**: markdown to in-memory blocks
//! - **`scope`**, **`i18n`**, **`io`**: folder whitelist, UI strings, notes folder access

pub mod action;
pub mod content;
pub mod decorate;
pub mod i18n;
pub mod io;
pub mod patterns;
pub mod render;
pub mod sanitize;
pub mod scope;
pub mod sections;
pub mod surface;

// Re-export key types for easier usage
pub use action::{
    ClipboardError, ClipboardSink, CopyError, CopyHost, LABEL_REVERT_DELAY, Notifier, Scheduler,
    SectionAction, TaskQueue,
};
pub use content::{BlockContent, DecorationKind, Inline};
pub use decorate::{Decoration, PassOutcome, decorate_render};
pub use i18n::{Locale, Message};
pub use patterns::{CompiledPatterns, PatternError, PatternSet};
pub use render::render_markdown;
pub use sanitize::{sanitize, serialize_section};
pub use scope::ScopeFilter;
pub use sections::{extract_section, is_section_start, section_range};
pub use surface::{
    Affordance, IndentMarker, MemoryBlock, MemoryRoot, RenderedBlock, RenderedRoot, SurfaceError,
};
