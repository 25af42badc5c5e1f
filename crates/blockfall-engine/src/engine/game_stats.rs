use serde::Serialize;

use crate::core::PIECE_SIZE;

/// Game statistics tracking score, cleared rows and locked pieces.
///
/// Score is a flat bonus per cleared row; clearing several rows with one piece earns no extra.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_lock(2, 100);
/// stats.record_lock(0, 100);
///
/// assert_eq!(stats.score(), 200);
/// assert_eq!(stats.completed_pieces(), 2);
/// assert_eq!(stats.line_cleared_counter(), &[1, 0, 1, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; PIECE_SIZE + 1],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; PIECE_SIZE + 1],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the number of pieces locked into the grid.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by the number of rows each cleared (index 0 to 4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; PIECE_SIZE + 1] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece locks and `cleared_lines` rows are removed.
    ///
    /// The score saturates at `u64::MAX`.
    pub fn record_lock(&mut self, cleared_lines: usize, line_bonus: u64) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        let gained = line_bonus.saturating_mul(cleared_lines as u64);
        self.score = self.score.saturating_add(gained);
    }
}
