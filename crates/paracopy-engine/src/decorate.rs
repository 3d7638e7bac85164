//! # Decoration Pass
//!
//! Runs once per render of a document. Re-reads the configuration every time,
//! so passes never depend on state cached from earlier renders.
//!
//! Order of work:
//! 1. scope check: out-of-scope documents are left untouched
//! 2. pattern compilation: an empty set disables the pass
//! 3. per block: reapply the indentation marker, then attach an affordance to
//!    section starts that do not already carry one
//!
//! Indentation markers are reset on every pass, while affordances are guarded
//! so repeated passes over the same output never duplicate them. Any surface
//! failure aborts the pass at this boundary and is logged, never propagated.

use std::rc::Rc;

use paracopy_config::Config;
use relative_path::RelativePath;

use crate::action::SectionAction;
use crate::i18n::Locale;
use crate::patterns::PatternSet;
use crate::scope::ScopeFilter;
use crate::sections::is_section_start;
use crate::surface::{Affordance, IndentMarker, RenderedBlock, RenderedRoot, SurfaceError};

/// What a decoration pass did.
#[derive(Debug)]
pub enum PassOutcome<B> {
    /// The document is outside the scope filter; nothing was inspected.
    OutOfScope,
    /// No pattern compiled; nothing was changed.
    NoPatterns,
    Decorated(Decoration<B>),
    /// A block rejected an update. Changes made before the failure remain.
    Aborted,
}

impl<B> PassOutcome<B> {
    /// Actions for affordances attached by this pass.
    pub fn actions(&self) -> &[SectionAction<B>] {
        match self {
            PassOutcome::Decorated(decoration) => &decoration.actions,
            _ => &[],
        }
    }

    pub fn into_actions(self) -> Vec<SectionAction<B>> {
        match self {
            PassOutcome::Decorated(decoration) => decoration.actions,
            _ => Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct Decoration<B> {
    /// Every section start in the document, decorated earlier or now.
    pub section_starts: Vec<usize>,
    /// One action per affordance attached during this pass.
    pub actions: Vec<SectionAction<B>>,
}

/// Decorate one rendered document according to `config`.
pub fn decorate_render<R>(
    root: &R,
    document_path: &RelativePath,
    config: &Config,
) -> PassOutcome<R::Block>
where
    R: RenderedRoot,
    R::Block: 'static,
{
    let scope = ScopeFilter::new(&config.whitelist_folders);
    if !scope.is_eligible(document_path) {
        log::debug!("Skipping {document_path}: outside whitelist folders");
        return PassOutcome::OutOfScope;
    }

    let compiled = PatternSet::compile(config.pattern_lines());
    if compiled.patterns.is_empty() {
        log::debug!("Skipping {document_path}: no usable patterns");
        return PassOutcome::NoPatterns;
    }

    match decorate_blocks(root, Rc::new(compiled.patterns), config) {
        Ok(decoration) => {
            log::debug!(
                "Decorated {document_path}: {} section starts, {} new affordances",
                decoration.section_starts.len(),
                decoration.actions.len()
            );
            PassOutcome::Decorated(decoration)
        }
        Err(err) => {
            log::error!("Decoration pass aborted for {document_path}: {err}");
            PassOutcome::Aborted
        }
    }
}

fn decorate_blocks<R>(
    root: &R,
    patterns: Rc<PatternSet>,
    config: &Config,
) -> Result<Decoration<R::Block>, SurfaceError>
where
    R: RenderedRoot,
    R::Block: 'static,
{
    let blocks: Rc<[R::Block]> = root.blocks().into();
    let marker = IndentMarker::from(config.indent_type);
    let locale = config
        .language
        .as_deref()
        .map(Locale::from_tag)
        .unwrap_or_default();
    let affordance = Affordance::localized(locale);

    let mut decoration = Decoration {
        section_starts: Vec::new(),
        actions: Vec::new(),
    };

    for (index, block) in blocks.iter().enumerate() {
        block.set_indent_marker(marker)?;

        if !is_section_start(block, &patterns) {
            continue;
        }
        decoration.section_starts.push(index);

        if block.has_affordance() {
            continue;
        }
        block.attach_affordance(&affordance)?;
        decoration.actions.push(SectionAction::new(
            Rc::clone(&blocks),
            index,
            Rc::clone(&patterns),
            config.output_mode,
            locale,
        ));
    }

    Ok(decoration)
}
