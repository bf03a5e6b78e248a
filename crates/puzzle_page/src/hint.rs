use core::time::Duration;

use bevy::prelude::*;

/// Nudge shown when nobody touched a tile for a while after the session started.
#[derive(Resource, Debug)]
pub struct HintFlag {
    delay: Timer,
    visible: bool,
    dismissed: bool,
}

impl HintFlag {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: Timer::new(delay, TimerMode::Once),
            visible: false,
            dismissed: false,
        }
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns `true` on the tick the hint shows up.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.dismissed || self.visible {
            return false;
        }

        self.visible = self.delay.tick(delta).finished();
        self.visible
    }

    /// Hides the hint for good.
    pub const fn dismiss(&mut self) {
        self.visible = false;
        self.dismissed = true;
    }
}
