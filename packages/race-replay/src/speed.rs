//! speed.rs — Replay speed ladder
//!
//! Discrete multipliers from ×1/16 to ×64. Stepping past either end is a no-op.

/// Ascending speed multipliers.
pub const SPEED_LADDER: [f64; 11] = [
    0.0625, 0.125, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0,
];

/// Index of ×1 in `SPEED_LADDER`.
pub const NEUTRAL_INDEX: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedControl {
    idx: usize,
}

impl Default for SpeedControl {
    fn default() -> Self {
        Self { idx: NEUTRAL_INDEX }
    }
}

impl SpeedControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        SPEED_LADDER[self.idx]
    }

    pub fn increase(&mut self) -> f64 {
        if self.idx < SPEED_LADDER.len() - 1 {
            self.idx += 1;
        }
        self.value()
    }

    pub fn decrease(&mut self) -> f64 {
        self.idx = self.idx.saturating_sub(1);
        self.value()
    }

    pub fn reset(&mut self) {
        self.idx = NEUTRAL_INDEX;
    }

    /// Virtual milliseconds added to the race clock per tick.
    pub fn ms_per_tick(&self, tick_base_ms: u64) -> i64 {
        (self.value() * tick_base_ms as f64).round() as i64
    }
}
