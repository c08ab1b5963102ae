//! Helpers for agents that consume governor settings.
//!
//! Agents do not react to every frame. A [`SettingsWatcher`] polls the
//! governor on a fixed frame cadence and only hands back settings when
//! the tier index actually changed. Tier names are not compared, so a
//! ladder may reuse names. The agent then feeds those settings to an
//! [`EntityBudget`] to learn how many entities to spawn or retire.

use tracing::debug;

use crate::clock::FrameClock;
use crate::governor::QualityGovernor;
use crate::settings::QualitySettings;

/// Default number of frames between watcher polls.
pub const DEFAULT_POLL_INTERVAL_FRAMES: u32 = 30;

/// Adjustment an agent must apply to its entity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetChange {
    /// The entity count already matches the tier.
    Unchanged,
    /// Spawn this many entities.
    Grow(u32),
    /// Retire this many entities.
    Shrink(u32),
}

/// The entity count an agent currently holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityBudget {
    current: u32,
}

impl EntityBudget {
    /// A budget starting from `current` live entities.
    pub const fn new(current: u32) -> Self {
        Self { current }
    }

    /// Live entity count.
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Move the count to the tier's `max_entities` and report the delta.
    pub const fn sync(&mut self, settings: &QualitySettings) -> BudgetChange {
        let target = settings.max_entities;
        let change = if target > self.current {
            BudgetChange::Grow(target.saturating_sub(self.current))
        } else if target < self.current {
            BudgetChange::Shrink(self.current.saturating_sub(target))
        } else {
            BudgetChange::Unchanged
        };
        self.current = target;
        change
    }
}

/// Polls a governor every N frames and reports tier changes.
#[derive(Debug, Clone)]
pub struct SettingsWatcher {
    poll_interval_frames: u32,
    frames_since_poll: u32,
    last_index: Option<usize>,
}

impl SettingsWatcher {
    /// A watcher polling every `poll_interval_frames` frames (at least 1).
    pub fn new(poll_interval_frames: u32) -> Self {
        Self {
            poll_interval_frames: poll_interval_frames.max(1),
            frames_since_poll: 0,
            last_index: None,
        }
    }

    /// Frames between polls.
    pub const fn poll_interval_frames(&self) -> u32 {
        self.poll_interval_frames
    }

    /// Count one frame and poll if the cadence is due.
    ///
    /// Returns settings when the governor's tier index differs from the
    /// last one seen. The very first poll always reports.
    pub fn tick<C: FrameClock>(&mut self, governor: &QualityGovernor<C>) -> Option<QualitySettings> {
        self.frames_since_poll = self.frames_since_poll.saturating_add(1);
        if self.frames_since_poll < self.poll_interval_frames {
            return None;
        }
        self.poll_now(governor)
    }

    /// Poll immediately, regardless of cadence.
    pub fn poll_now<C: FrameClock>(
        &mut self,
        governor: &QualityGovernor<C>,
    ) -> Option<QualitySettings> {
        self.frames_since_poll = 0;
        let index = governor.level_index();
        if self.last_index == Some(index) {
            return None;
        }
        let settings = governor.settings();
        debug!(
            previous = ?self.last_index,
            index,
            level = settings.level.as_str(),
            "Settings change observed"
        );
        self.last_index = Some(index);
        Some(settings)
    }
}

impl Default for SettingsWatcher {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL_FRAMES)
    }
}
