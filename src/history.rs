//! Snapshot-based undo/redo.
//!
//! Every committed action (a finished stroke, a clear) stores a full copy of
//! the canvas. Undo and redo move a cursor over that list and paint the
//! snapshot under it back onto the surface.

use crate::surface::Surface;
use crate::types::PixelBuffer;
use std::num::NonZeroUsize;

/// Frozen copy of the whole canvas at one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pixels: PixelBuffer,
}

impl Snapshot {
    /// Take ownership of a pixel copy; nothing else can reach it afterwards.
    pub fn capture(pixels: PixelBuffer) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }
}

/// Linear list of snapshots plus a cursor.
///
/// `cursor < len` holds whenever the list is non-empty. The only structural
/// change is [`History::commit`], which drops everything after the cursor
/// before appending.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: usize,
    limit: Option<NonZeroUsize>,
}

impl History {
    /// Keep at most `limit` snapshots; the oldest are evicted first.
    pub fn with_limit(limit: Option<NonZeroUsize>) -> Self {
        Self { limit, ..Self::default() }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Index of the snapshot the canvas currently shows.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.cursor)
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Truncate the undone future, append, point at the new entry.
    fn commit(&mut self, snapshot: Snapshot) {
        if !self.is_empty() {
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots.push(snapshot);

        if let Some(limit) = self.limit {
            let excess = self.snapshots.len().saturating_sub(limit.get());
            if excess > 0 {
                self.snapshots.drain(..excess);
            }
        }
        self.cursor = self.snapshots.len() - 1;
        self.check_invariants();
    }

    fn step_back(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        self.check_invariants();
        true
    }

    fn step_forward(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        self.check_invariants();
        true
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.is_empty() || self.cursor < self.snapshots.len(),
            "history cursor {} out of range (len {})",
            self.cursor,
            self.snapshots.len()
        );
        if let Some(limit) = self.limit {
            debug_assert!(self.snapshots.len() <= limit.get());
        }
    }
}

/// Owns the history and applies it to a surface.
#[derive(Debug, Default)]
pub struct HistoryManager {
    history: History,
}

impl HistoryManager {
    pub fn new(limit: Option<NonZeroUsize>) -> Self {
        Self { history: History::with_limit(limit) }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Copy the whole canvas into a new entry after the cursor.
    pub fn capture_and_commit<S: Surface + ?Sized>(&mut self, surface: &S) {
        let snapshot = Snapshot::capture(surface.get_pixels(surface.full_rect()));
        self.history.commit(snapshot);
        tracing::debug!(
            cursor = self.history.cursor(),
            len = self.history.len(),
            "committed snapshot"
        );
    }

    /// Step back one entry. Returns false (and does nothing) at the oldest.
    pub fn undo<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if !self.history.step_back() {
            return false;
        }
        self.restore(surface);
        tracing::debug!(cursor = self.history.cursor(), "undo");
        true
    }

    /// Step forward one entry. Returns false (and does nothing) at the newest.
    pub fn redo<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if !self.history.step_forward() {
            return false;
        }
        self.restore(surface);
        tracing::debug!(cursor = self.history.cursor(), "redo");
        true
    }

    /// Overwrite the whole surface with the snapshot under the cursor.
    fn restore<S: Surface + ?Sized>(&self, surface: &mut S) {
        let Some(snapshot) = self.history.current() else {
            return;
        };
        debug_assert_eq!(
            (snapshot.width(), snapshot.height()),
            (surface.width(), surface.height()),
            "snapshot size differs from the surface"
        );
        surface.put_pixels(snapshot.pixels(), 0, 0);
    }

    /// Wipe the canvas and record that as its own undoable entry.
    pub fn clear<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear_rect(surface.full_rect());
        self.capture_and_commit(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RasterSurface;
    use crate::types::{Point, Rgba};
    use proptest::prelude::*;

    fn blank() -> (RasterSurface, HistoryManager) {
        let surface = RasterSurface::new(24, 24).unwrap();
        let mut manager = HistoryManager::default();
        manager.capture_and_commit(&surface);
        (surface, manager)
    }

    fn stroke(surface: &mut RasterSurface, manager: &mut HistoryManager, y: f32) {
        surface.draw_line(Point::new(2.0, y), Point::new(22.0, y));
        manager.capture_and_commit(surface);
    }

    fn pixels(surface: &RasterSurface) -> PixelBuffer {
        surface.get_pixels(surface.full_rect())
    }

    #[test]
    fn baseline_then_strokes_counts_entries() {
        let (mut surface, mut manager) = blank();
        assert_eq!((manager.history().len(), manager.history().cursor()), (1, 0));
        for i in 0..3 {
            stroke(&mut surface, &mut manager, 4.0 + i as f32 * 5.0);
        }
        assert_eq!((manager.history().len(), manager.history().cursor()), (4, 3));
    }

    #[test]
    fn undo_at_oldest_and_redo_at_newest_are_noops() {
        let (mut surface, mut manager) = blank();
        let before = pixels(&surface);
        assert!(!manager.undo(&mut surface));
        assert!(!manager.redo(&mut surface));
        assert_eq!(manager.history().cursor(), 0);
        assert_eq!(pixels(&surface), before);

        stroke(&mut surface, &mut manager, 10.0);
        let drawn = pixels(&surface);
        assert!(!manager.redo(&mut surface));
        assert_eq!(manager.history().cursor(), 1);
        assert_eq!(pixels(&surface), drawn);
    }

    #[test]
    fn undo_then_redo_is_pixel_identical() {
        let (mut surface, mut manager) = blank();
        stroke(&mut surface, &mut manager, 6.0);
        stroke(&mut surface, &mut manager, 12.0);
        let drawn = pixels(&surface);

        assert!(manager.undo(&mut surface));
        assert_ne!(pixels(&surface), drawn);
        assert!(manager.redo(&mut surface));
        assert_eq!(pixels(&surface), drawn);
    }

    #[test]
    fn new_stroke_after_undo_discards_future() {
        // S0 -> A -> undo -> B: history is [S0, S2] and redo has nowhere to go.
        let (mut surface, mut manager) = blank();
        let s0 = pixels(&surface);

        stroke(&mut surface, &mut manager, 5.0);
        let s1 = pixels(&surface);
        assert_eq!((manager.history().len(), manager.history().cursor()), (2, 1));

        assert!(manager.undo(&mut surface));
        assert_eq!(manager.history().cursor(), 0);
        assert_eq!(pixels(&surface), s0);

        stroke(&mut surface, &mut manager, 18.0);
        let s2 = pixels(&surface);
        assert_eq!((manager.history().len(), manager.history().cursor()), (2, 1));
        assert_eq!(manager.history().get(1).unwrap().pixels(), &s2);
        assert_ne!(s1, s2);

        assert!(!manager.redo(&mut surface));
        assert_eq!(pixels(&surface), s2);
    }

    #[test]
    fn clear_is_recorded_and_undoable() {
        let (mut surface, mut manager) = blank();
        stroke(&mut surface, &mut manager, 8.0);
        let drawing = pixels(&surface);

        manager.clear(&mut surface);
        assert_eq!(manager.history().len(), 3);
        assert!(manager.history().current().unwrap().pixels().is_uniform(Rgba::TRANSPARENT));
        assert!(pixels(&surface).is_uniform(Rgba::TRANSPARENT));

        assert!(manager.undo(&mut surface));
        assert_eq!(pixels(&surface), drawing);
    }

    #[test]
    fn snapshots_do_not_follow_later_paint() {
        let (mut surface, manager) = blank();
        surface.draw_line(Point::new(0.0, 0.0), Point::new(24.0, 24.0));
        assert!(manager.history().get(0).unwrap().pixels().is_uniform(Rgba::TRANSPARENT));
        let first = manager.history().get(0).unwrap();
        assert_eq!((first.width(), first.height()), (24, 24));
    }

    #[test]
    fn limit_evicts_oldest_and_keeps_cursor_valid() {
        let mut surface = RasterSurface::new(24, 24).unwrap();
        let mut manager = HistoryManager::new(NonZeroUsize::new(3));
        manager.capture_and_commit(&surface);
        for i in 0..5 {
            stroke(&mut surface, &mut manager, 2.0 + i as f32 * 4.0);
        }
        assert_eq!((manager.history().len(), manager.history().cursor()), (3, 2));

        assert!(manager.undo(&mut surface));
        assert!(manager.undo(&mut surface));
        assert!(!manager.undo(&mut surface));
        // the blank baseline was evicted; oldest retained still has ink
        assert!(!pixels(&surface).is_uniform(Rgba::TRANSPARENT));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Stroke(u8),
        Undo,
        Redo,
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..24).prop_map(Op::Stroke),
            Just(Op::Undo),
            Just(Op::Redo),
            Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn n_strokes_give_n_plus_one_entries(rows in proptest::collection::vec(0u8..24, 0..20)) {
            let (mut surface, mut manager) = blank();
            for &y in &rows {
                stroke(&mut surface, &mut manager, y as f32);
            }
            prop_assert_eq!(manager.history().len(), rows.len() + 1);
            prop_assert_eq!(manager.history().cursor(), rows.len());
        }

        #[test]
        fn undo_k_then_stroke_truncates(n in 1usize..10, k_seed in any::<usize>()) {
            let (mut surface, mut manager) = blank();
            for i in 0..n {
                stroke(&mut surface, &mut manager, (i * 2) as f32);
            }
            let k = k_seed % (n + 1);
            let before = manager.history().len();
            for _ in 0..k {
                prop_assert!(manager.undo(&mut surface));
            }
            stroke(&mut surface, &mut manager, 23.0);
            prop_assert_eq!(manager.history().len(), before - k + 1);
            prop_assert!(!manager.history().can_redo());
        }

        #[test]
        fn cursor_stays_in_range_and_canvas_matches_cursor(ops in proptest::collection::vec(op_strategy(), 0..40)) {
            let (mut surface, mut manager) = blank();
            for op in ops {
                match op {
                    Op::Stroke(y) => stroke(&mut surface, &mut manager, y as f32),
                    Op::Undo => { manager.undo(&mut surface); }
                    Op::Redo => { manager.redo(&mut surface); }
                    Op::Clear => manager.clear(&mut surface),
                }
                let history = manager.history();
                prop_assert!(history.cursor() < history.len());
                prop_assert_eq!(history.current().unwrap().pixels(), &pixels(&surface));
            }
        }

        #[test]
        fn undo_redo_round_trip_anywhere(n in 1usize..8, back_seed in any::<usize>()) {
            let (mut surface, mut manager) = blank();
            for i in 0..n {
                stroke(&mut surface, &mut manager, (i * 3) as f32);
            }
            for _ in 0..(back_seed % n) {
                manager.undo(&mut surface);
            }
            let here = pixels(&surface);
            let cursor = manager.history().cursor();
            prop_assume!(cursor > 0);
            prop_assert!(manager.undo(&mut surface));
            prop_assert!(manager.redo(&mut surface));
            prop_assert_eq!(manager.history().cursor(), cursor);
            prop_assert_eq!(pixels(&surface), here);
        }
    }
}
