//! The drawing widget: one canvas, one history, one pen.
//!
//! The host forwards contact events and button presses here; everything that
//! changes pixels goes through this type.

use crate::export::{self, ImageSink};
use crate::history::{History, HistoryManager};
use crate::input::ContactEvent;
use crate::stroke::{self, PenState, StrokeStep};
use crate::surface::Surface;
use crate::types::PenStyle;
use std::num::NonZeroUsize;
use std::path::PathBuf;

pub struct Sketchpad<S: Surface> {
    surface: S,
    history: HistoryManager,
    pen: PenState,
}

impl<S: Surface> Sketchpad<S> {
    /// Configure the pen and record the blank baseline, so undo always has
    /// somewhere to land.
    pub fn setup(mut surface: S, style: PenStyle, history_limit: Option<NonZeroUsize>) -> Self {
        surface.set_pen(style);
        let mut history = HistoryManager::new(history_limit);
        history.capture_and_commit(&surface);
        tracing::debug!(
            width = surface.width(),
            height = surface.height(),
            "sketchpad ready"
        );
        Self { surface, history, pen: PenState::Idle }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// For host-side changes that are not drawing (e.g. moving the canvas).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn history(&self) -> &History {
        self.history.history()
    }

    pub fn pen(&self) -> PenState {
        self.pen
    }

    /// Route one contact event; a finished stroke is committed to history.
    pub fn handle_contact(&mut self, event: &mut ContactEvent) {
        match stroke::handle_contact(self.pen, event, &mut self.surface) {
            StrokeStep::Continue(pen) | StrokeStep::Ignored(pen) => self.pen = pen,
            StrokeStep::Finished(pen) => {
                self.pen = pen;
                self.history.capture_and_commit(&self.surface);
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.surface)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.surface)
    }

    /// Wipe the canvas; this is itself undoable.
    pub fn clear(&mut self) {
        self.history.clear(&mut self.surface);
        tracing::info!(entries = self.history().len(), "canvas cleared");
    }

    /// Save the current canvas as PNG. `None` when saving failed (logged).
    pub fn export_image<K: ImageSink + ?Sized>(&self, sink: &mut K) -> Option<PathBuf> {
        export::export_image(&self.surface, sink)
    }
}
