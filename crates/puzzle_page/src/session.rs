use bevy::prelude::*;
use page_helpers::cleanup::despawn_marked;

use crate::board::PuzzleBoard;
use crate::config::PuzzleConfig;
use crate::hint::HintFlag;
use crate::input::PointerDrag;
use crate::interaction::DropTarget;
use crate::layout::scatter_tiles;
use crate::sequencer::{CompletionSequencer, SessionPhase};

/// Marks entities that belong to the current session and go away with it.
#[derive(Component)]
pub struct SessionScoped;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Drop the current session, if any, and start a fresh one.
    Restart,
    /// Drop the current session. Pending timers die with it.
    Teardown,
}

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PuzzleConfig>()
            .init_state::<SessionPhase>()
            .add_event::<SessionCommand>()
            .add_systems(Startup, start_session)
            .add_systems(
                PostUpdate,
                (
                    (despawn_marked::<SessionScoped>, end_session),
                    start_session.run_if(restart_requested),
                )
                    .chain()
                    .run_if(on_event::<SessionCommand>),
            );
    }
}

fn restart_requested(mut session_commands: EventReader<SessionCommand>) -> bool {
    session_commands
        .read()
        .last()
        .is_some_and(|command| *command == SessionCommand::Restart)
}

/// Builds the state of a new session: scattered tiles, idle timeline, hint countdown, no drag.
pub fn start_session(
    mut commands: Commands,
    config: Res<PuzzleConfig>,
    mut next_phase: ResMut<NextState<SessionPhase>>,
) {
    let mut rng = config
        .layout_seed
        .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

    commands.insert_resource(PuzzleBoard::new(
        scatter_tiles(&mut rng),
        config.rejection_duration,
    ));
    commands.insert_resource(CompletionSequencer::new(
        config.grid_disappear_duration,
        config.full_image_duration,
    ));
    commands.insert_resource(HintFlag::new(config.hint_delay));
    commands.insert_resource(PointerDrag::default());
    commands.insert_resource(DropTarget::default());
    next_phase.set(SessionPhase::Playing);

    info!("Puzzle session started");
}

pub fn end_session(mut commands: Commands, board: Option<Res<PuzzleBoard>>) {
    if board.is_none() {
        return;
    }

    commands.remove_resource::<PuzzleBoard>();
    commands.remove_resource::<CompletionSequencer>();
    commands.remove_resource::<HintFlag>();
    commands.remove_resource::<PointerDrag>();
    commands.remove_resource::<DropTarget>();

    info!("Puzzle session ended");
}
