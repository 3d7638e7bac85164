//! # Copy Action
//!
//! The invocation side of an affordance. Each decorated block gets a
//! [`SectionAction`] built once during the decoration pass. It holds the pass's
//! block sequence, its own index and the pattern snapshot, so later
//! configuration changes do not affect it until the next pass.
//!
//! Activation extracts the section, writes it to the host clipboard and flips
//! the affordance label to the success icon, scheduling a revert. Failures are
//! reported through the host's notifier and never retried.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;
use std::time::Duration;

use paracopy_config::OutputMode;
use thiserror::Error;

use crate::i18n::{Locale, Message, text};
use crate::patterns::PatternSet;
use crate::sanitize::serialize_section;
use crate::sections::{extract_section, section_range};
use crate::surface::RenderedBlock;

/// Delay before the success icon reverts to the idle icon.
pub const LABEL_REVERT_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Error)]
#[error("Clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

#[derive(Debug, Error)]
pub enum CopyError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// Host clipboard.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Transient user notifications.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Fire-and-forget delayed tasks on the UI thread.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Host collaborators used by an activation.
pub struct CopyHost<'a> {
    pub clipboard: &'a mut dyn ClipboardSink,
    pub notifier: &'a dyn Notifier,
    pub scheduler: &'a dyn Scheduler,
}

/// Invocation record for one attached affordance.
#[derive(Debug, Clone)]
pub struct SectionAction<B> {
    blocks: Rc<[B]>,
    block_index: usize,
    patterns: Rc<PatternSet>,
    output_mode: OutputMode,
    locale: Locale,
}

impl<B: RenderedBlock + Clone + 'static> SectionAction<B> {
    pub fn new(
        blocks: Rc<[B]>,
        block_index: usize,
        patterns: Rc<PatternSet>,
        output_mode: OutputMode,
        locale: Locale,
    ) -> Self {
        Self {
            blocks,
            block_index,
            patterns,
            output_mode,
            locale,
        }
    }

    pub fn block_index(&self) -> usize {
        self.block_index
    }

    pub fn section(&self) -> Range<usize> {
        section_range(&self.blocks, self.block_index, &self.patterns)
    }

    /// The clipboard text for this section, read from the blocks as they are now.
    pub fn payload(&self) -> String {
        let fragments = extract_section(&self.blocks, self.block_index, &self.patterns);
        serialize_section(&fragments, self.output_mode)
    }

    pub fn invoke(&self, host: &mut CopyHost<'_>) -> Result<(), CopyError> {
        let payload = self.payload();

        if let Err(err) = host.clipboard.write_text(&payload) {
            log::warn!("Copy of section at block {} failed: {err}", self.block_index);
            host.notifier.notify(text(self.locale, Message::CopyFailed));
            return Err(err.into());
        }

        let Some(block) = self.blocks.get(self.block_index) else {
            return Ok(());
        };
        block.set_affordance_label(text(self.locale, Message::CopySuccessIcon));

        let block = block.clone();
        let idle = text(self.locale, Message::CopyButtonIcon);
        host.scheduler.schedule(
            LABEL_REVERT_DELAY,
            Box::new(move || block.set_affordance_label(idle)),
        );
        Ok(())
    }
}

/// Scheduler that queues tasks until the host drains them.
#[derive(Default)]
pub struct TaskQueue {
    tasks: RefCell<Vec<(Duration, Box<dyn FnOnce()>)>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Delays of the queued tasks, in scheduling order.
    pub fn delays(&self) -> Vec<Duration> {
        self.tasks.borrow().iter().map(|(delay, _)| *delay).collect()
    }

    /// Run every queued task regardless of its delay.
    pub fn run_all(&self) {
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        for (_, task) in tasks {
            task();
        }
    }
}

impl Scheduler for TaskQueue {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        self.tasks.borrow_mut().push((delay, task));
    }
}
