//! # Block Content
//!
//! The structural projection of a rendered block: a small inline tree that
//! keeps emphasis, links and code apart from plain text, plus the decoration
//! nodes that the host (or third-party widgets) inject into a live block.
//!
//! Two projections are derived from it:
//! - [`BlockContent::visible_text`]: what a reader sees, markup dropped
//! - [`BlockContent::to_markup`]: inline markup kept in markdown syntax

/// A widget injected into a rendered block on top of the document's own content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationKind {
    /// The copy affordance attached by the decoration pass.
    CopyAffordance,
    /// Block reference preview inserted by the strange-new-worlds plugin.
    BlockPreview,
    /// Link reference preview inserted by the strange-new-worlds plugin.
    LinkPreview,
    /// Any other injected widget, identified by its class name.
    Other(String),
}

impl DecorationKind {
    pub fn class_name(&self) -> &str {
        match self {
            DecorationKind::CopyAffordance => "law-copy-btn",
            DecorationKind::BlockPreview => "snw-block-preview",
            DecorationKind::LinkPreview => "snw-link-preview",
            DecorationKind::Other(class) => class,
        }
    }

    pub fn from_class_name(class: &str) -> Self {
        match class {
            "law-copy-btn" => DecorationKind::CopyAffordance,
            "snw-block-preview" => DecorationKind::BlockPreview,
            "snw-link-preview" => DecorationKind::LinkPreview,
            other => DecorationKind::Other(other.to_string()),
        }
    }

    /// Whether copied output drops this decoration. Unknown widgets are kept.
    pub fn is_stripped(&self) -> bool {
        !matches!(self, DecorationKind::Other(_))
    }
}

/// A node of a block's inline tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link { url: String, children: Vec<Inline> },
    Image { url: String, alt: Vec<Inline> },
    SoftBreak,
    HardBreak,
    /// Raw inline HTML. Renders invisibly and has no markup equivalent.
    Html(String),
    Decoration {
        kind: DecorationKind,
        children: Vec<Inline>,
    },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text(text.into())
    }

    fn push_visible_text(&self, out: &mut String) {
        match self {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Link { children, .. }
            | Inline::Decoration { children, .. } => {
                children.iter().for_each(|c| c.push_visible_text(out))
            }
            Inline::SoftBreak | Inline::HardBreak => out.push('\n'),
            Inline::Image { .. } | Inline::Html(_) => {}
        }
    }

    fn push_markup(&self, out: &mut String) -> Option<()> {
        match self {
            Inline::Text(text) => push_escaped(out, text),
            Inline::Code(code) => push_code_span(out, code),
            Inline::Emphasis(children) => wrap_markup(out, "*", children, "*")?,
            Inline::Strong(children) => wrap_markup(out, "**", children, "**")?,
            Inline::Strikethrough(children) => wrap_markup(out, "~~", children, "~~")?,
            Inline::Link { url, children } => {
                wrap_markup(out, "[", children, "](")?;
                out.push_str(url);
                out.push(')');
            }
            Inline::Image { url, alt } => {
                wrap_markup(out, "![", alt, "](")?;
                out.push_str(url);
                out.push(')');
            }
            Inline::SoftBreak | Inline::HardBreak => out.push('\n'),
            Inline::Html(_) | Inline::Decoration { .. } => return None,
        }
        Some(())
    }

    fn strip_decorations(&self) -> Option<Inline> {
        let strip_all = |children: &[Inline]| -> Vec<Inline> {
            children.iter().filter_map(Inline::strip_decorations).collect()
        };
        Some(match self {
            Inline::Decoration { kind, .. } if kind.is_stripped() => return None,
            Inline::Decoration { kind, children } => Inline::Decoration {
                kind: kind.clone(),
                children: strip_all(children),
            },
            Inline::Emphasis(children) => Inline::Emphasis(strip_all(children)),
            Inline::Strong(children) => Inline::Strong(strip_all(children)),
            Inline::Strikethrough(children) => Inline::Strikethrough(strip_all(children)),
            Inline::Link { url, children } => Inline::Link {
                url: url.clone(),
                children: strip_all(children),
            },
            other => other.clone(),
        })
    }

    fn contains_decoration(&self, wanted: &DecorationKind) -> bool {
        match self {
            Inline::Decoration { kind, .. } if kind == wanted => true,
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Link { children, .. }
            | Inline::Decoration { children, .. } => {
                children.iter().any(|c| c.contains_decoration(wanted))
            }
            _ => false,
        }
    }
}

/// Backslash-escape characters that would otherwise open inline markup.
///
/// An underscore between two alphanumerics cannot delimit emphasis and is left
/// bare, so block ids like `^art_5` stay recognisable.
fn push_escaped(out: &mut String, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        let intraword_underscore = c == '_'
            && i > 0
            && chars[i - 1].is_alphanumeric()
            && chars.get(i + 1).is_some_and(|next| next.is_alphanumeric());
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '~') && !intraword_underscore {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Code span whose fence is one backtick longer than any run inside `code`.
fn push_code_span(out: &mut String, code: &str) {
    let longest_run = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run + 1);
    // CommonMark strips one space from each side of a padded span
    let pad = code.starts_with('`')
        || code.ends_with('`')
        || (code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty());

    out.push_str(&fence);
    if pad {
        out.push(' ');
    }
    out.push_str(code);
    if pad {
        out.push(' ');
    }
    out.push_str(&fence);
}

fn wrap_markup(out: &mut String, open: &str, children: &[Inline], close: &str) -> Option<()> {
    out.push_str(open);
    for child in children {
        child.push_markup(out)?;
    }
    out.push_str(close);
    Some(())
}

/// Structural content of one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockContent {
    pub inlines: Vec<Inline>,
}

impl BlockContent {
    pub fn new(inlines: Vec<Inline>) -> Self {
        Self { inlines }
    }

    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        for inline in &self.inlines {
            inline.push_visible_text(&mut out);
        }
        out
    }

    /// Markdown-flavoured serialization of the inline tree.
    ///
    /// Returns `None` when the content holds something with no markup form,
    /// such as raw HTML or an unrecognised widget.
    pub fn to_markup(&self) -> Option<String> {
        let mut out = String::new();
        for inline in &self.inlines {
            inline.push_markup(&mut out)?;
        }
        Some(out)
    }

    /// A copy with the affordance and known preview widgets removed.
    pub fn without_decorations(&self) -> BlockContent {
        BlockContent {
            inlines: self
                .inlines
                .iter()
                .filter_map(Inline::strip_decorations)
                .collect(),
        }
    }

    pub fn contains_decoration(&self, kind: &DecorationKind) -> bool {
        self.inlines.iter().any(|i| i.contains_decoration(kind))
    }
}

impl From<&str> for BlockContent {
    fn from(text: &str) -> Self {
        BlockContent::new(vec![Inline::text(text)])
    }
}
