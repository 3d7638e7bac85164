use std::cell::RefCell;
use std::rc::Rc;

use crate::content::{BlockContent, DecorationKind, Inline};

use super::{Affordance, IndentMarker, RenderedBlock, RenderedRoot, SurfaceError};

#[derive(Debug)]
struct BlockState {
    index: usize,
    content: BlockContent,
    classes: Vec<String>,
    affordance: Option<Affordance>,
    detached: bool,
}

/// Shared handle to an in-memory rendered block.
#[derive(Debug, Clone)]
pub struct MemoryBlock(Rc<RefCell<BlockState>>);

impl MemoryBlock {
    pub fn new(index: usize, content: BlockContent) -> Self {
        Self(Rc::new(RefCell::new(BlockState {
            index,
            content,
            classes: Vec::new(),
            affordance: None,
            detached: false,
        })))
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn indent_marker(&self) -> Option<IndentMarker> {
        let state = self.0.borrow();
        IndentMarker::ALL
            .into_iter()
            .find(|m| state.classes.iter().any(|c| c.as_str() == m.class_name()))
    }

    pub fn affordance(&self) -> Option<Affordance> {
        self.0.borrow().affordance.clone()
    }

    /// Number of copy affordances present in the block's top-level content.
    pub fn affordance_count(&self) -> usize {
        self.0
            .borrow()
            .content
            .inlines
            .iter()
            .filter(|i| {
                matches!(i, Inline::Decoration { kind, .. } if *kind == DecorationKind::CopyAffordance)
            })
            .count()
    }

    pub fn add_class(&self, class: &str) {
        self.0.borrow_mut().classes.push(class.to_string());
    }

    /// Simulate a third-party widget inserting itself at the end of the block.
    pub fn append_decoration(&self, kind: DecorationKind, text: &str) {
        self.0.borrow_mut().content.inlines.push(Inline::Decoration {
            kind,
            children: vec![Inline::text(text)],
        });
    }

    /// Simulate the host dropping the block from its rendered document.
    pub fn detach(&self) {
        self.0.borrow_mut().detached = true;
    }

    fn ensure_attached(state: &BlockState) -> Result<(), SurfaceError> {
        if state.detached {
            return Err(SurfaceError::Detached { index: state.index });
        }
        Ok(())
    }
}

impl RenderedBlock for MemoryBlock {
    fn content(&self) -> BlockContent {
        self.0.borrow().content.clone()
    }

    fn has_affordance(&self) -> bool {
        self.0
            .borrow()
            .content
            .contains_decoration(&DecorationKind::CopyAffordance)
    }

    fn attach_affordance(&self, affordance: &Affordance) -> Result<(), SurfaceError> {
        let mut state = self.0.borrow_mut();
        Self::ensure_attached(&state)?;

        state.content.inlines.insert(
            0,
            Inline::Decoration {
                kind: DecorationKind::CopyAffordance,
                children: vec![Inline::text(affordance.label.as_str())],
            },
        );
        state.affordance = Some(affordance.clone());
        Ok(())
    }

    fn set_affordance_label(&self, label: &str) {
        let mut state = self.0.borrow_mut();
        let mut found = false;
        for inline in state.content.inlines.iter_mut() {
            if let Inline::Decoration { kind, children } = inline
                && *kind == DecorationKind::CopyAffordance
            {
                *children = vec![Inline::text(label)];
                found = true;
            }
        }
        if found && let Some(affordance) = state.affordance.as_mut() {
            affordance.label = label.to_string();
        }
    }

    fn set_indent_marker(&self, marker: IndentMarker) -> Result<(), SurfaceError> {
        let mut state = self.0.borrow_mut();
        Self::ensure_attached(&state)?;

        state
            .classes
            .retain(|c| !IndentMarker::ALL.iter().any(|m| m.class_name() == c.as_str()));
        state.classes.push(marker.class_name().to_string());
        Ok(())
    }
}

/// In-memory rendered document: an ordered list of blocks.
#[derive(Debug, Clone, Default)]
pub struct MemoryRoot {
    blocks: Vec<MemoryBlock>,
}

impl MemoryRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// One plain-text block per item.
    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut root = Self::new();
        for text in texts {
            root.push(BlockContent::from(text));
        }
        root
    }

    pub fn push(&mut self, content: BlockContent) -> MemoryBlock {
        let block = MemoryBlock::new(self.blocks.len(), content);
        self.blocks.push(block.clone());
        block
    }

    pub fn block(&self, index: usize) -> Option<&MemoryBlock> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl RenderedRoot for MemoryRoot {
    type Block = MemoryBlock;

    fn blocks(&self) -> Vec<MemoryBlock> {
        self.blocks.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_handles_share_state() {
        let mut root = MemoryRoot::new();
        let block = root.push(BlockContent::from("Article 1"));

        let other_handle = root.blocks()[0].clone();
        other_handle.attach_affordance(&Affordance::localized(Locale::En)).unwrap();

        assert!(block.has_affordance());
        assert_eq!(block.visible_text(), "📋Article 1");
    }

    #[test]
    fn test_indent_marker_replaces_previous_marker() {
        let root = MemoryRoot::from_texts(["Article 1"]);
        let block = root.block(0).unwrap();
        block.add_class("callout");

        block.set_indent_marker(IndentMarker::FirstLine).unwrap();
        block.set_indent_marker(IndentMarker::Hanging).unwrap();

        assert_eq!(block.indent_marker(), Some(IndentMarker::Hanging));
        assert_eq!(block.classes(), vec!["callout", "lac-indent-hanging"]);
    }

    #[test]
    fn test_label_changes_only_touch_the_affordance() {
        let root = MemoryRoot::from_texts(["Article 1"]);
        let block = root.block(0).unwrap();
        block.set_affordance_label("✅");
        assert_eq!(block.visible_text(), "Article 1");

        block.attach_affordance(&Affordance::localized(Locale::En)).unwrap();
        block.set_affordance_label("✅");

        assert_eq!(block.visible_text(), "✅Article 1");
        assert_eq!(block.affordance().map(|a| a.label), Some("✅".to_string()));
    }

    #[test]
    fn test_detached_blocks_reject_annotation() {
        let root = MemoryRoot::from_texts(["Article 1"]);
        let block = root.block(0).unwrap();
        block.detach();

        let result = block.set_indent_marker(IndentMarker::NoIndent);

        assert!(matches!(result, Err(SurfaceError::Detached { index: 0 })));
        assert_eq!(block.indent_marker(), None);
    }
}
