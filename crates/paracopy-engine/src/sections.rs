use std::ops::Range;

use crate::content::BlockContent;
use crate::patterns::PatternSet;
use crate::surface::RenderedBlock;

/// Text a block is classified on: its visible text with injected widgets removed.
///
/// Classifying on the undecorated text keeps already-decorated blocks
/// recognisable on later passes.
pub fn classification_text<B: RenderedBlock + ?Sized>(block: &B) -> String {
    block.content().without_decorations().visible_text()
}

pub fn is_section_start<B: RenderedBlock + ?Sized>(block: &B, patterns: &PatternSet) -> bool {
    patterns.matches(&classification_text(block))
}

/// Block range `[start, end)` of the section opened by `blocks[start]`.
///
/// `blocks[start]` is not re-checked: the range always contains it when
/// `start` is in bounds. The scan stops at the next section start. An
/// out-of-bounds `start` gives the empty range at the end of `blocks`.
pub fn section_range<B: RenderedBlock>(
    blocks: &[B],
    start: usize,
    patterns: &PatternSet,
) -> Range<usize> {
    if start >= blocks.len() {
        return blocks.len()..blocks.len();
    }
    let end = blocks[start + 1..]
        .iter()
        .position(|block| is_section_start(block, patterns))
        .map_or(blocks.len(), |offset| start + 1 + offset);
    start..end
}

/// Structural copies of every block in the section opened by `blocks[start]`.
pub fn extract_section<B: RenderedBlock>(
    blocks: &[B],
    start: usize,
    patterns: &PatternSet,
) -> Vec<BlockContent> {
    blocks[section_range(blocks, start, patterns)]
        .iter()
        .map(RenderedBlock::content)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DecorationKind;
    use crate::surface::{Affordance, MemoryRoot, RenderedRoot};
    use crate::i18n::Locale;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn article_patterns() -> PatternSet {
        PatternSet::compile(["^Article"]).patterns
    }

    fn texts(fragments: &[BlockContent]) -> Vec<String> {
        fragments.iter().map(BlockContent::visible_text).collect()
    }

    #[test]
    fn test_blank_blocks_are_never_section_starts() {
        let root = MemoryRoot::from_texts(["", "   "]);
        let match_all = PatternSet::compile([".*"]).patterns;

        for block in root.blocks() {
            assert!(!is_section_start(&block, &match_all));
        }
    }

    #[test]
    fn test_decorated_blocks_still_classify() {
        let root = MemoryRoot::from_texts(["Article 1"]);
        let block = root.block(0).unwrap();
        block
            .attach_affordance(&Affordance::localized(Locale::En))
            .unwrap();
        block.append_decoration(DecorationKind::LinkPreview, "2 links");

        assert!(is_section_start(block, &article_patterns()));
    }

    #[rstest]
    #[case(0, 0..2)]
    #[case(2, 2..4)]
    #[case(3, 3..4)]
    fn test_section_ranges(#[case] start: usize, #[case] expected: Range<usize>) {
        let blocks = MemoryRoot::from_texts(["Article 1", "Body text A", "Article 2", "Body text B"])
            .blocks();

        assert_eq!(section_range(&blocks, start, &article_patterns()), expected);
    }

    #[test]
    fn test_extraction_stops_before_next_section_start() {
        let blocks = MemoryRoot::from_texts(["Article 1", "Body text A", "Article 2", "Body text B"])
            .blocks();

        let section = extract_section(&blocks, 0, &article_patterns());

        assert_eq!(texts(&section), vec!["Article 1", "Body text A"]);
    }

    #[test]
    fn test_adjacent_section_starts_yield_single_fragment() {
        let blocks = MemoryRoot::from_texts(["Article 1", "Article 2", "Body"]).blocks();

        let section = extract_section(&blocks, 0, &article_patterns());

        assert_eq!(texts(&section), vec!["Article 1"]);
    }

    #[test]
    fn test_start_block_is_not_revalidated() {
        let blocks = MemoryRoot::from_texts(["Preamble", "Recital", "Article 1"]).blocks();

        let section = extract_section(&blocks, 0, &article_patterns());

        assert_eq!(texts(&section), vec!["Preamble", "Recital"]);
    }

    #[test]
    fn test_blank_blocks_inside_a_section_are_kept() {
        let blocks = MemoryRoot::from_texts(["Article 1", "", "tail", "Article 2"]).blocks();

        let section = extract_section(&blocks, 0, &article_patterns());

        assert_eq!(texts(&section), vec!["Article 1", "", "tail"]);
    }

    #[test]
    fn test_out_of_bounds_start_is_empty() {
        let blocks = MemoryRoot::from_texts(["Article 1"]).blocks();

        assert_eq!(section_range(&blocks, 5, &article_patterns()), 1..1);
        assert!(extract_section(&blocks, 5, &article_patterns()).is_empty());
        assert!(extract_section(&blocks, 1, &article_patterns()).is_empty());
    }
}
