use bevy::prelude::*;

use crate::PuzzleSet;
use crate::board::{DropOutcome, PuzzleBoard};
use crate::hint::HintFlag;
use crate::sequencer::{CompletionSequencer, SessionPhase};
use crate::tile::{Cell, TOTAL_TILES, TileId};

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragStarted {
    pub tile: TileId,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraggedOver {
    pub cell: Cell,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroppedOn {
    pub cell: Cell,
}

/// The pointer let go of a tile away from the grid.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnded;

/// Sent once per session, by the drop that placed the last tile.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleCompleted;

/// Cell currently offering to take the dragged tile.
#[derive(Resource, Debug, Default, PartialEq, Eq)]
pub struct DropTarget(pub Option<Cell>);

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DragStarted>()
            .add_event::<DraggedOver>()
            .add_event::<DroppedOn>()
            .add_event::<DragEnded>()
            .add_event::<PuzzleCompleted>()
            // Before `StateTransition`, so a phase is on screen the frame it is entered
            .add_systems(
                PreUpdate,
                (advance_sequencer, mirror_phase)
                    .chain()
                    .run_if(resource_exists::<PuzzleBoard>),
            )
            .add_systems(
                Update,
                (
                    tick_rejections,
                    tick_hint.run_if(in_state(SessionPhase::Playing)),
                )
                    .in_set(PuzzleSet::Timers)
                    .run_if(resource_exists::<PuzzleBoard>),
            )
            .add_systems(
                Update,
                (start_drags, track_drag_over, resolve_drops, end_drags)
                    .chain()
                    .in_set(PuzzleSet::Interaction)
                    .run_if(resource_exists::<PuzzleBoard>)
                    .run_if(in_state(SessionPhase::Playing)),
            );
    }
}

fn tick_rejections(time: Res<Time>, mut board: ResMut<PuzzleBoard>) {
    board.tick_rejections(time.delta());
}

fn tick_hint(time: Res<Time>, mut hint: ResMut<HintFlag>) {
    if hint.tick(time.delta()) {
        info!("No drag yet, showing the hint");
    }
}

fn advance_sequencer(
    time: Res<Time>,
    mut sequencer: ResMut<CompletionSequencer>,
    mut hint: ResMut<HintFlag>,
) {
    for phase in sequencer.tick(time.delta()) {
        info!("Completion sequence: {phase}");
        if phase.is_complete() {
            hint.dismiss();
        }
    }
}

fn start_drags(
    mut drags: EventReader<DragStarted>,
    mut board: ResMut<PuzzleBoard>,
    mut hint: ResMut<HintFlag>,
) {
    for drag in drags.read() {
        match board.begin_drag(drag.tile) {
            Ok(()) => {
                hint.dismiss();
                debug!("Dragging tile {}", drag.tile);
            }
            Err(err) => warn!("{err}"),
        }
    }
}

fn track_drag_over(
    mut hovers: EventReader<DraggedOver>,
    board: Res<PuzzleBoard>,
    mut target: ResMut<DropTarget>,
) {
    for hover in hovers.read() {
        match board.drag_over(hover.cell) {
            Ok(_) => target.0 = Some(hover.cell),
            Err(err) => warn!("{err}"),
        }
    }
}

fn resolve_drops(
    mut drops: EventReader<DroppedOn>,
    mut board: ResMut<PuzzleBoard>,
    mut sequencer: ResMut<CompletionSequencer>,
    mut hint: ResMut<HintFlag>,
    mut target: ResMut<DropTarget>,
    mut completed: EventWriter<PuzzleCompleted>,
) {
    for drop in drops.read() {
        target.0 = None;
        match board.drop_on(drop.cell) {
            Ok(DropOutcome::Placed { tile, completed: last }) => {
                info!("Tile {tile} placed ({}/{TOTAL_TILES})", board.placed_count());
                if last && sequencer.start() {
                    info!("Puzzle complete, starting the reveal");
                    hint.dismiss();
                    completed.send(PuzzleCompleted);
                }
            }
            Ok(DropOutcome::Rejected { tile }) => {
                debug!("Tile {tile} does not go in {:?}", drop.cell);
            }
            Ok(DropOutcome::Ignored) => {}
            Err(err) => warn!("{err}"),
        }
    }
}

fn end_drags(
    mut ends: EventReader<DragEnded>,
    mut board: ResMut<PuzzleBoard>,
    mut target: ResMut<DropTarget>,
) {
    for _ in ends.read() {
        target.0 = None;
        if let Some(tile) = board.end_drag() {
            debug!("Tile {tile} released away from the grid");
        }
    }
}

/// Keeps the `SessionPhase` state in step with the completion timeline.
fn mirror_phase(
    sequencer: Res<CompletionSequencer>,
    phase: Res<State<SessionPhase>>,
    mut next_phase: ResMut<NextState<SessionPhase>>,
) {
    if sequencer.phase() > *phase.get() {
        next_phase.set(sequencer.phase());
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::*;
    use crate::test_support::{FRAME, headless_app, run_for, solve};

    #[derive(Resource, Default)]
    struct Completions(usize);

    fn count_completions(mut events: EventReader<PuzzleCompleted>, mut count: ResMut<Completions>) {
        count.0 += events.read().count();
    }

    fn drag_and_drop(app: &mut App, tile: TileId, cell: Cell) {
        app.world_mut().send_event(DragStarted { tile });
        app.world_mut().send_event(DroppedOn { cell });
        app.update();
    }

    fn phase(app: &App) -> SessionPhase {
        *app.world().resource::<State<SessionPhase>>().get()
    }

    #[test]
    fn drop_on_the_right_cell_places_the_tile() {
        let mut app = headless_app();

        drag_and_drop(&mut app, 5, Cell::new(0, 0));
        assert_eq!(
            app.world().resource::<PuzzleBoard>().placed_count(),
            0,
            "(0, 0) is not tile 5's cell"
        );

        drag_and_drop(&mut app, 5, Cell::new(1, 1));
        let board = app.world().resource::<PuzzleBoard>();
        assert!(board.is_placed(5), "tile 5 locked into (1, 1)");
        assert_eq!(board.placed_count(), 1, "only tile 5 placed");
    }

    #[test]
    fn placing_every_tile_plays_the_reveal_once() {
        let mut app = headless_app();
        app.init_resource::<Completions>()
            .add_systems(Update, count_completions.after(PuzzleSet::Interaction));

        // Odd ids first, then even ones, with a wrong drop before each.
        let order = (0..TOTAL_TILES)
            .filter(|id| id % 2 == 1)
            .chain((0..TOTAL_TILES).filter(|id| id % 2 == 0));
        for tile in order {
            drag_and_drop(&mut app, tile, Cell::from_index((tile + 3) % TOTAL_TILES));
            drag_and_drop(&mut app, tile, Cell::from_index(tile));
        }

        assert!(app.world().resource::<PuzzleBoard>().is_complete(), "all placed");
        assert_eq!(app.world().resource::<Completions>().0, 1, "reveal started once");

        app.update();
        assert_eq!(phase(&app), SessionPhase::GridDisappearing, "grid fades first");

        run_for(&mut app, Duration::from_millis(1200));
        assert_eq!(phase(&app), SessionPhase::GridDisappearing, "still fading");

        run_for(&mut app, Duration::from_millis(600));
        assert_eq!(phase(&app), SessionPhase::ShowingFullImage, "full image");

        run_for(&mut app, Duration::from_millis(3000));
        assert_eq!(phase(&app), SessionPhase::ShowingOverlay, "overlay at the end");

        // Nothing left to drop, and no second reveal
        drag_and_drop(&mut app, 0, Cell::new(0, 0));
        run_for(&mut app, FRAME * 5);
        assert_eq!(app.world().resource::<Completions>().0, 1, "still once");
        assert_eq!(phase(&app), SessionPhase::ShowingOverlay, "terminal");
    }

    #[test]
    fn phases_are_entered_on_the_exact_frame() {
        let mut app = headless_app();
        solve(&mut app);

        run_for(&mut app, Duration::from_millis(1400));
        assert_eq!(phase(&app), SessionPhase::GridDisappearing, "T+1400");
        app.update();
        assert_eq!(phase(&app), SessionPhase::ShowingFullImage, "T+1500");

        run_for(&mut app, Duration::from_millis(2900));
        assert_eq!(phase(&app), SessionPhase::ShowingFullImage, "T+4400");
        app.update();
        assert_eq!(phase(&app), SessionPhase::ShowingOverlay, "T+4500");
    }

    #[test]
    fn first_drag_dismisses_the_hint_for_good() {
        let mut app = headless_app();
        run_for(&mut app, Duration::from_secs(21));
        assert!(app.world().resource::<HintFlag>().is_visible(), "idle for 21s");

        app.world_mut().send_event(DragStarted { tile: 4 });
        app.update();
        assert!(!app.world().resource::<HintFlag>().is_visible(), "drag hides it");

        app.world_mut().send_event(DragEnded);
        run_for(&mut app, Duration::from_secs(30));
        assert!(!app.world().resource::<HintFlag>().is_visible(), "never returns");
    }

    #[test]
    fn hovering_a_cell_marks_it_as_drop_target() {
        let mut app = headless_app();
        app.world_mut().send_event(DragStarted { tile: 2 });
        app.world_mut().send_event(DraggedOver {
            cell: Cell::new(3, 1),
        });
        app.update();
        assert_eq!(
            *app.world().resource::<DropTarget>(),
            DropTarget(Some(Cell::new(3, 1))),
            "any cell accepts the drag"
        );

        app.world_mut().send_event(DragEnded);
        app.update();
        assert_eq!(*app.world().resource::<DropTarget>(), DropTarget(None), "cleared");
        assert_eq!(app.world().resource::<PuzzleBoard>().dragged(), None, "drag over");
    }
}
