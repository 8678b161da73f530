//! Swatch palette and recently used colors

use std::collections::VecDeque;

use crate::color::Color;

/// The stock 32-swatch palette, four rows of eight.
pub const DEFAULT_PALETTE: [&str; 32] = [
    // Reds & pinks
    "#ff6b6b", "#ee5a5a", "#d63384", "#ff6b9d", "#f783ac", "#ffa8a8", "#be4bdb", "#9775fa",
    // Blues & cyans
    "#4e8cff", "#339af0", "#228be6", "#1c7ed6", "#15aabf", "#22b8cf", "#3bc9db", "#66d9e8",
    // Greens & yellows
    "#22c55e", "#40c057", "#51cf66", "#8ce99a", "#facc15", "#ffd43b", "#fab005", "#fb923c",
    // Earth tones & neutrals
    "#e67700", "#d9480f", "#a0522d", "#8b4513", "#adb5bd", "#868e96", "#495057", "#212529",
];

/// Most-recent-first list of picked colors, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentColors {
    colors: VecDeque<Color>,
    capacity: usize,
}

impl RecentColors {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { colors: VecDeque::with_capacity(capacity + 1), capacity }
    }

    /// Move `color` to the front, dropping the oldest entry when full.
    pub fn push(&mut self, color: Color) {
        self.colors.retain(|c| *c != color);
        self.colors.push_front(color);
        self.colors.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recent color, if any.
    pub fn latest(&self) -> Option<&Color> {
        self.colors.front()
    }
}

/// The swatches on offer plus the recent-colors strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    swatches: Vec<Color>,
    recent: RecentColors,
}

impl Palette {
    pub fn new(swatches: impl IntoIterator<Item = impl Into<Color>>, recent_capacity: usize) -> Self {
        Self {
            swatches: swatches.into_iter().map(Into::into).collect(),
            recent: RecentColors::new(recent_capacity),
        }
    }

    pub fn swatches(&self) -> &[Color] {
        &self.swatches
    }

    pub fn recent(&self) -> &RecentColors {
        &self.recent
    }

    /// Record a pick in the recent strip.
    pub fn record(&mut self, color: &Color) {
        self.recent.push(color.clone());
    }

    /// Index of the swatch that should show as selected for `color`.
    ///
    /// Swatches match case-insensitively, so a picker value of `#FF6B6B`
    /// highlights the `#ff6b6b` swatch.
    pub fn selected_index(&self, color: &Color) -> Option<usize> {
        self.swatches.iter().position(|s| s.as_str().eq_ignore_ascii_case(color.as_str()))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE, 8)
    }
}
