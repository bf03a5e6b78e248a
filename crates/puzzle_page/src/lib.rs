use bevy::prelude::*;

mod board;
mod config;
mod effects;
mod hint;
mod host;
mod input;
mod interaction;
mod layout;
mod overlay;
mod render;
mod sequencer;
mod session;
mod tile;

pub use config::PuzzleConfig;
pub use host::{OnComplete, PuzzleHost};
pub use sequencer::SessionPhase;
pub use session::SessionCommand;

use effects::EffectsPlugin;
use host::HostPlugin;
use input::PointerPlugin;
use interaction::InteractionPlugin;
use overlay::OverlayPlugin;
use render::PuzzleRenderPlugin;
use session::SessionPlugin;

/// Order of the puzzle systems inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PuzzleSet {
    /// Pointer to drag events
    Input,
    /// Hint and rejection timers
    Timers,
    /// Drag events applied to the board
    Interaction,
    /// Sprites and texts follow the state
    Render,
}

/// Rules, timers and host bridge of the puzzle, without window or rendering.
pub struct PuzzleLogicPlugin;

impl Plugin for PuzzleLogicPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                PuzzleSet::Input,
                PuzzleSet::Timers,
                PuzzleSet::Interaction,
                PuzzleSet::Render,
            )
                .chain(),
        )
        .add_plugins((SessionPlugin, InteractionPlugin, HostPlugin));
    }
}

/// The whole page: logic plus pointer input and everything drawn on screen.
pub struct PuzzlePagePlugin;

impl Plugin for PuzzlePagePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            PuzzleLogicPlugin,
            PointerPlugin,
            PuzzleRenderPlugin,
            EffectsPlugin,
            OverlayPlugin,
        ))
        .add_systems(Startup, spawn_camera);
    }
}

pub fn run() {
    page_helpers::get_default_app::<PuzzleHost>(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    )
    .add_plugins(PuzzlePagePlugin)
    .run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
