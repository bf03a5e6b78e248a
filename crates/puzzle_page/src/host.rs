use bevy::prelude::*;
use page_helpers::{HostMessageHandler, PageMessage, send_page_message};

use crate::PuzzleSet;
use crate::sequencer::CompletionSequencer;
use crate::session::SessionCommand;

/// The overlay's "continue" button was pressed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuePressed;

/// What happens once the user is done with the page. Called at most once per session.
///
/// Defaults to telling the host page to move on.
#[derive(Resource)]
pub struct OnComplete(Box<dyn Fn() + Send + Sync>);

impl OnComplete {
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Box::new(callback))
    }
}

impl Default for OnComplete {
    fn default() -> Self {
        Self::new(|| {
            if let Err(err) = send_page_message(PageMessage::Complete) {
                error!("Could not tell the host the puzzle is done: {err}");
            }
        })
    }
}

pub struct HostPlugin;

impl Plugin for HostPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ContinuePressed>()
            .init_resource::<OnComplete>()
            .add_systems(
                Update,
                notify_completion
                    .in_set(PuzzleSet::Interaction)
                    .run_if(resource_exists::<CompletionSequencer>)
                    .run_if(on_event::<ContinuePressed>),
            );
    }
}

fn notify_completion(
    mut presses: EventReader<ContinuePressed>,
    mut sequencer: ResMut<CompletionSequencer>,
    on_complete: Res<OnComplete>,
) {
    for _ in presses.read() {
        if sequencer.take_continue() {
            info!("Continue pressed, leaving the puzzle");
            (on_complete.0)();
        }
    }
}

#[derive(Default, Clone, Copy)]
pub struct PuzzleHost;

impl HostMessageHandler for PuzzleHost {
    fn restart(world: &mut World) {
        info!("Restarting the puzzle");
        world.send_event(SessionCommand::Restart);
    }

    fn teardown(world: &mut World) {
        info!("Tearing the puzzle down");
        world.send_event(SessionCommand::Teardown);
    }
}
