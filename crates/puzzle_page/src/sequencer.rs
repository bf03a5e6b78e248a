use core::time::Duration;

use bevy::prelude::*;
use bevy::time::Stopwatch;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Visual stage of a puzzle session. Only ever moves forward within a session.
#[derive(
    States, Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter,
)]
pub enum SessionPhase {
    #[default]
    Playing,
    GridDisappearing,
    ShowingFullImage,
    ShowingOverlay,
}

impl SessionPhase {
    /// The picture is whole again, from the full image reveal on.
    pub fn is_complete(self) -> bool {
        self >= Self::ShowingFullImage
    }
}

/// One-shot timeline played once the last tile is placed.
#[derive(Resource, Debug)]
pub struct CompletionSequencer {
    phase: SessionPhase,
    since_start: Option<Stopwatch>,
    grid_disappear: Duration,
    full_image_hold: Duration,
    continued: bool,
}

impl CompletionSequencer {
    pub const fn new(grid_disappear: Duration, full_image_hold: Duration) -> Self {
        Self {
            phase: SessionPhase::Playing,
            since_start: None,
            grid_disappear,
            full_image_hold,
            continued: false,
        }
    }

    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub const fn is_started(&self) -> bool {
        self.since_start.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.since_start
            .as_ref()
            .map_or(Duration::ZERO, Stopwatch::elapsed)
    }

    /// How far the grid has faded out, from 0 to 1.
    pub fn grid_fade(&self) -> f32 {
        (self.elapsed().as_secs_f32() / self.grid_disappear.as_secs_f32()).min(1.0)
    }

    /// Starts the timeline. Returns `false` if it was already running.
    pub fn start(&mut self) -> bool {
        if self.is_started() {
            return false;
        }

        self.since_start = Some(Stopwatch::new());
        self.phase = SessionPhase::GridDisappearing;
        true
    }

    /// Phase the timeline is in `elapsed` after [`Self::start`].
    pub fn phase_at(&self, elapsed: Duration) -> SessionPhase {
        if elapsed < self.grid_disappear {
            SessionPhase::GridDisappearing
        } else if elapsed < self.grid_disappear + self.full_image_hold {
            SessionPhase::ShowingFullImage
        } else {
            SessionPhase::ShowingOverlay
        }
    }

    /// Advances the timeline and returns the phases entered, in order.
    ///
    /// A long frame can cross several phases at once, none of them is skipped.
    pub fn tick(&mut self, delta: Duration) -> Vec<SessionPhase> {
        let Some(stopwatch) = self.since_start.as_mut() else {
            return Vec::new();
        };

        let elapsed = stopwatch.tick(delta).elapsed();
        let target = self.phase_at(elapsed);
        let entered = SessionPhase::iter()
            .filter(|phase| *phase > self.phase && *phase <= target)
            .collect::<Vec<_>>();

        self.phase = self.phase.max(target);
        entered
    }

    /// Records the user's "continue". True only the first time, once the overlay is up.
    pub fn take_continue(&mut self) -> bool {
        if self.phase != SessionPhase::ShowingOverlay || self.continued {
            return false;
        }

        self.continued = true;
        true
    }
}
