use std::time::Duration;

/// Score values for simultaneously cleared rows.
///
/// Indexed by the number of rows cleared in one landing and scaled by the
/// current level:
/// - 1 row: 50 points
/// - 2 rows: 150 points
/// - 3 rows: 350 points
/// - 4 rows: 1000 points
const POINTS: [usize; 5] = [0, 50, 150, 350, 1000];

/// Cleared-row quota governing level advancement.
const ROWS_PER_LEVEL: usize = 12;

/// Fastest permitted automatic descent interval.
const FALL_INTERVAL_FLOOR: Duration = Duration::from_millis(50);

/// Score, level, and cleared-row accounting.
///
/// The level starts at 1 and never decreases. It advances only on a landing
/// that cleared at least one row while the cumulative total sits in the
/// narrow band just past a multiple of the row quota; the band makes the
/// difficulty ramp deliberately sparse, so the modular condition is exact,
/// not an approximation.
///
/// # Example
///
/// ```
/// use blockfall_engine::Progression;
///
/// let mut progression = Progression::new();
/// progression.record_landing(2);
///
/// assert_eq!(progression.score(), 150);
/// assert_eq!(progression.total_rows_cleared(), 2);
/// assert_eq!(progression.level(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    score: usize,
    level: usize,
    total_rows_cleared: usize,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    /// Creates the starting progression: no score, level 1, no rows.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            total_rows_cleared: 0,
        }
    }

    /// Returns the current score.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the current level (1-based).
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Returns the total number of rows cleared over the session.
    #[must_use]
    pub const fn total_rows_cleared(&self) -> usize {
        self.total_rows_cleared
    }

    /// Records the outcome of one landing event.
    ///
    /// Awards `level * POINTS[rows_cleared]`, adds the rows to the running
    /// total, and advances the level when the landing cleared rows inside
    /// the level-up band.
    pub fn record_landing(&mut self, rows_cleared: usize) {
        debug_assert!(rows_cleared <= 4);
        self.score += self.level * POINTS[rows_cleared];
        self.total_rows_cleared += rows_cleared;
        if rows_cleared > 0 && self.in_level_up_band() {
            self.level += 1;
        }
    }

    /// The level advances only while the cumulative total sits at most
    /// three rows past a multiple of the quota.
    const fn in_level_up_band(&self) -> bool {
        self.total_rows_cleared >= ROWS_PER_LEVEL
            && self.total_rows_cleared % ROWS_PER_LEVEL <= 3
    }

    /// Elapsed time between automatic one-cell descents at the current
    /// level.
    ///
    /// Starts at one second and shrinks by 100ms per level, clamped to a
    /// 50ms floor so high levels stay finite.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        let millis = 1000_u64.saturating_sub((self.level as u64 - 1) * 100);
        Duration::from_millis(millis).max(FALL_INTERVAL_FLOOR)
    }
}
