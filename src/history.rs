//! Undo/redo history as a bounded ring of grid snapshots.
//!
//! Every committed edit stores a full copy of the grid. The current index
//! points at the snapshot matching what is on screen; undo and redo move the
//! index and hand back the snapshot to restore. Committing after an undo
//! discards the redo branch. When the ring is full the oldest snapshot is
//! evicted.

use std::collections::VecDeque;

use crate::grid::PixelGrid;

/// Bounded snapshot history.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<PixelGrid>,
    index: usize,
    capacity: usize,
}

impl History {
    /// Create a history seeded with `initial` as its only snapshot.
    pub fn new(initial: &PixelGrid, capacity: usize) -> Self {
        let mut history = Self { snapshots: VecDeque::new(), index: 0, capacity: capacity.max(1) };
        history.reset(initial);
        history
    }

    /// Drop all snapshots and start over from `grid`.
    pub fn reset(&mut self, grid: &PixelGrid) {
        self.snapshots.clear();
        self.snapshots.push_back(grid.clone());
        self.index = 0;
    }

    /// Record `grid` as the newest state.
    pub fn commit(&mut self, grid: &PixelGrid) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push_back(grid.clone());
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
        self.index = self.snapshots.len() - 1;
        tracing::debug!(index = self.index, len = self.snapshots.len(), "history commit");
    }

    /// Step back one snapshot. Returns the grid to restore, or `None` at the oldest state.
    pub fn undo(&mut self) -> Option<&PixelGrid> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.snapshots.get(self.index)
    }

    /// Step forward one snapshot. Returns the grid to restore, or `None` at the newest state.
    pub fn redo(&mut self) -> Option<&PixelGrid> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.snapshots.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// The snapshot at the current index.
    pub fn current(&self) -> Option<&PixelGrid> {
        self.snapshots.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
