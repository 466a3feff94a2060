//! Temporal stabilization of per-sticker classifications.
//!
//! A single frame is not trusted. Each of the nine grid slots keeps a short
//! history of its recent classifications; a face is accepted only once
//! every slot has enough valid samples, and each slot then reports its
//! plurality color. A cooldown after each acceptance keeps the same
//! physical face from being committed twice in a row.

use crate::color::ReferenceColor;
use crate::config::ConfigError;
use crate::detection::GRID_SIZE;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Stabilizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Samples retained per slot.
    pub history_capacity: usize,
    /// Valid samples every slot needs before a face is accepted.
    pub min_valid_samples: usize,
    /// Quiet period after an accepted face, in milliseconds.
    pub cooldown_ms: u64,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            min_valid_samples: 5,
            cooldown_ms: 2000,
        }
    }
}

impl StabilizerConfig {
    /// Validates the settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history capacity must be positive".into()));
        }
        if self.min_valid_samples == 0 || self.min_valid_samples > self.history_capacity {
            return Err(ConfigError::Invalid(format!(
                "min valid samples must be within 1..={}",
                self.history_capacity
            )));
        }
        Ok(())
    }

    /// Cooldown as a duration.
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Bounded history of one slot's classifications, oldest first.
#[derive(Debug, Clone)]
pub struct SlotHistory {
    samples: VecDeque<Option<ReferenceColor>>,
    capacity: usize,
}

impl SlotHistory {
    /// Creates an empty history.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest beyond capacity.
    pub fn push(&mut self, sample: Option<ReferenceColor>) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Number of retained samples, including unclassified ones.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of classified samples.
    pub fn valid_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_some()).count()
    }

    /// Most frequent classified color; ties go to the one seen first.
    pub fn plurality(&self) -> Option<ReferenceColor> {
        let mut counts = [0usize; 6];
        let mut order: Vec<ReferenceColor> = Vec::with_capacity(6);

        for color in self.samples.iter().flatten() {
            if counts[color.index()] == 0 {
                order.push(*color);
            }
            counts[color.index()] += 1;
        }

        let mut best: Option<(ReferenceColor, usize)> = None;
        for color in order {
            let count = counts[color.index()];
            match best {
                Some((_, top)) if top >= count => {}
                _ => best = Some((color, count)),
            }
        }
        best.map(|(color, _)| color)
    }

    /// Plurality color, if at least `min_valid` samples are classified.
    pub fn resolve(&self, min_valid: usize) -> Option<ReferenceColor> {
        if self.valid_count() < min_valid {
            return None;
        }
        self.plurality()
    }

    /// Drops every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Result of feeding one frame's classifications to the stabilizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StabilizerVerdict {
    /// A face was accepted recently; the sample was discarded.
    CoolingDown {
        /// Time left before samples are counted again.
        remaining: Duration,
    },
    /// Still collecting; `ready_slots` slots have enough valid samples.
    Pending {
        /// Slots that already meet the sample threshold.
        ready_slots: usize,
    },
    /// Every slot resolved; histories have been cleared.
    Accepted([ReferenceColor; GRID_SIZE]),
}

/// Majority-vote stabilizer over the nine grid slots.
#[derive(Debug, Clone)]
pub struct TemporalStabilizer {
    config: StabilizerConfig,
    slots: [SlotHistory; GRID_SIZE],
    last_accept: Option<Instant>,
}

impl TemporalStabilizer {
    /// Creates a stabilizer with the given settings.
    pub fn new(config: StabilizerConfig) -> Self {
        let slots = std::array::from_fn(|_| SlotHistory::new(config.history_capacity));
        Self {
            config,
            slots,
            last_accept: None,
        }
    }

    /// Returns the settings.
    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// Per-slot histories.
    pub fn slots(&self) -> &[SlotHistory; GRID_SIZE] {
        &self.slots
    }

    /// Time left in the cooldown at `now`, if any.
    pub fn cooldown_remaining(&self, now: Instant) -> Option<Duration> {
        let last = self.last_accept?;
        let elapsed = now.saturating_duration_since(last);
        self.config.cooldown().checked_sub(elapsed).filter(|d| !d.is_zero())
    }

    /// Records one frame of classifications and tries to accept a face.
    pub fn observe(
        &mut self,
        samples: [Option<ReferenceColor>; GRID_SIZE],
        now: Instant,
    ) -> StabilizerVerdict {
        if let Some(remaining) = self.cooldown_remaining(now) {
            return StabilizerVerdict::CoolingDown { remaining };
        }

        for (slot, sample) in self.slots.iter_mut().zip(samples) {
            slot.push(sample);
        }

        let min_valid = self.config.min_valid_samples;
        let resolved: Vec<Option<ReferenceColor>> =
            self.slots.iter().map(|s| s.resolve(min_valid)).collect();
        let ready_slots = resolved.iter().filter(|r| r.is_some()).count();

        if ready_slots < GRID_SIZE {
            tracing::trace!(ready_slots, "Stabilizer collecting samples");
            return StabilizerVerdict::Pending { ready_slots };
        }

        let mut colors = [ReferenceColor::White; GRID_SIZE];
        for (out, color) in colors.iter_mut().zip(resolved.into_iter().flatten()) {
            *out = color;
        }

        self.clear_histories();
        self.last_accept = Some(now);
        tracing::debug!(center = %colors[crate::detection::CENTER], "Stabilizer accepted face");
        StabilizerVerdict::Accepted(colors)
    }

    /// Clears all slot histories, keeping the cooldown.
    pub fn clear_histories(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    /// Clears histories and the cooldown.
    pub fn reset(&mut self) {
        self.clear_histories();
        self.last_accept = None;
    }
}

impl Default for TemporalStabilizer {
    fn default() -> Self {
        Self::new(StabilizerConfig::default())
    }
}
