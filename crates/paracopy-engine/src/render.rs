//! Markdown render feed: turns note source into a [`MemoryRoot`] of paragraph blocks.
//!
//! Only paragraphs become blocks, including those nested in block quotes and
//! loose list items. Headings, code blocks, tables and tight list items are
//! skipped, matching a viewer that decorates paragraph elements only.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::content::{BlockContent, Inline};
use crate::surface::MemoryRoot;

enum Frame {
    Paragraph,
    Emphasis,
    Strong,
    Strikethrough,
    Link(String),
    Image(String),
}

struct OpenInline {
    frame: Frame,
    children: Vec<Inline>,
}

pub fn render_markdown(source: &str) -> MemoryRoot {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut root = MemoryRoot::new();
    // Empty outside paragraphs; the bottom frame is always the paragraph
    let mut stack: Vec<OpenInline> = Vec::new();

    for event in Parser::new_ext(source, options) {
        match event {
            Event::Start(Tag::Paragraph) => stack.push(open(Frame::Paragraph)),
            Event::End(TagEnd::Paragraph) => {
                if let Some(paragraph) = stack.pop() {
                    root.push(BlockContent::new(paragraph.children));
                }
                stack.clear();
            }
            _ if stack.is_empty() => {}
            Event::Start(Tag::Emphasis) => stack.push(open(Frame::Emphasis)),
            Event::Start(Tag::Strong) => stack.push(open(Frame::Strong)),
            Event::Start(Tag::Strikethrough) => stack.push(open(Frame::Strikethrough)),
            Event::Start(Tag::Link { dest_url, .. }) => {
                stack.push(open(Frame::Link(dest_url.to_string())))
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                stack.push(open(Frame::Image(dest_url.to_string())))
            }
            Event::End(
                TagEnd::Emphasis
                | TagEnd::Strong
                | TagEnd::Strikethrough
                | TagEnd::Link
                | TagEnd::Image,
            ) => close(&mut stack),
            Event::Text(text) => push_text(&mut stack, &text),
            Event::Code(code) => push_inline(&mut stack, Inline::Code(code.to_string())),
            Event::InlineHtml(html) => push_inline(&mut stack, Inline::Html(html.to_string())),
            Event::SoftBreak => push_inline(&mut stack, Inline::SoftBreak),
            Event::HardBreak => push_inline(&mut stack, Inline::HardBreak),
            _ => {}
        }
    }

    root
}

fn open(frame: Frame) -> OpenInline {
    OpenInline {
        frame,
        children: Vec::new(),
    }
}

fn close(stack: &mut Vec<OpenInline>) {
    if stack.len() < 2 {
        return;
    }
    let Some(OpenInline { frame, children }) = stack.pop() else {
        return;
    };
    let inline = match frame {
        Frame::Emphasis => Inline::Emphasis(children),
        Frame::Strong => Inline::Strong(children),
        Frame::Strikethrough => Inline::Strikethrough(children),
        Frame::Link(url) => Inline::Link { url, children },
        Frame::Image(url) => Inline::Image { url, alt: children },
        Frame::Paragraph => return,
    };
    push_inline(stack, inline);
}

fn push_inline(stack: &mut [OpenInline], inline: Inline) {
    if let Some(top) = stack.last_mut() {
        top.children.push(inline);
    }
}

/// Append text, merging with a preceding text node.
fn push_text(stack: &mut [OpenInline], text: &str) {
    let Some(top) = stack.last_mut() else {
        return;
    };
    match top.children.last_mut() {
        Some(Inline::Text(previous)) => previous.push_str(text),
        _ => top.children.push(Inline::text(text)),
    }
}
