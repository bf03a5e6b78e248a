use bevy::prelude::*;
use page_helpers::input::{
    held_world_position, just_pressed_world_position, just_released_world_position,
    pointer_just_canceled, pointer_just_released,
};

use crate::PuzzleSet;
use crate::board::PuzzleBoard;
use crate::config::PuzzleConfig;
use crate::interaction::{DragEnded, DragStarted, DraggedOver, DropTarget, DroppedOn};
use crate::render::FloatingTile;
use crate::sequencer::SessionPhase;
use crate::tile::{Cell, TileId};

/// Where the pointer is while it carries a tile.
#[derive(Resource, Debug, Default)]
pub struct PointerDrag {
    pub tile: Option<TileId>,
    pub position: Vec2,
    pub hovered: Option<Cell>,
}

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (pick_up_tile, follow_pointer, release_tile)
                .chain()
                .in_set(PuzzleSet::Input)
                .run_if(resource_exists::<PuzzleBoard>)
                .run_if(in_state(SessionPhase::Playing)),
        );
    }
}

fn pick_up_tile(
    window: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    tiles: Query<(&FloatingTile, &Transform, &Sprite)>,
    mut drag: ResMut<PointerDrag>,
    mut started: EventWriter<DragStarted>,
) {
    let Some(world_position) =
        just_pressed_world_position(&mouse_button_input, &touch_input, &window, &camera)
    else {
        return;
    };

    let Some(tile) = topmost_tile_at(world_position, &tiles) else {
        return;
    };

    *drag = PointerDrag {
        tile: Some(tile),
        position: world_position,
        hovered: None,
    };
    started.send(DragStarted { tile });
}

fn follow_pointer(
    window: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    config: Res<PuzzleConfig>,
    mut drag: ResMut<PointerDrag>,
    mut target: ResMut<DropTarget>,
    mut hovers: EventWriter<DraggedOver>,
) {
    if drag.tile.is_none() {
        return;
    }
    let Some(world_position) =
        held_world_position(&mouse_button_input, &touch_input, &window, &camera)
    else {
        return;
    };

    drag.position = world_position;
    let cell = config.cell_at(world_position);
    if cell == drag.hovered {
        return;
    }

    drag.hovered = cell;
    if let Some(cell) = cell {
        hovers.send(DraggedOver { cell });
    } else {
        // Left the grid
        target.0 = None;
    }
}

fn release_tile(
    window: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    config: Res<PuzzleConfig>,
    mut drag: ResMut<PointerDrag>,
    mut drops: EventWriter<DroppedOn>,
    mut ends: EventWriter<DragEnded>,
) {
    if drag.tile.is_none() {
        return;
    }

    let released_at = if pointer_just_released(&mouse_button_input, &touch_input) {
        Some(
            just_released_world_position(&mouse_button_input, &touch_input, &window, &camera)
                .unwrap_or(drag.position),
        )
    } else if pointer_just_canceled(&touch_input) {
        // A canceled touch never lands on a cell
        None
    } else {
        return;
    };
    *drag = PointerDrag::default();

    match released_at.and_then(|position| config.cell_at(position)) {
        Some(cell) => {
            drops.send(DroppedOn { cell });
        }
        None => {
            ends.send(DragEnded);
        }
    }
}

fn topmost_tile_at(
    position: Vec2,
    tiles: &Query<(&FloatingTile, &Transform, &Sprite)>,
) -> Option<TileId> {
    tiles
        .iter()
        .filter(|(_, transform, sprite)| {
            let size = sprite.custom_size.unwrap_or(Vec2::ONE);
            Rect::from_center_size(transform.translation.truncate(), size).contains(position)
        })
        .max_by(|(_, a, _), (_, b, _)| a.translation.z.total_cmp(&b.translation.z))
        .map(|(tile, ..)| tile.id)
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use bevy::input::touch::{TouchInput, TouchPhase, touch_screen_input_system};

    use super::*;

    fn tile_sprite(world: &mut World, id: TileId, center: Vec2, z: f32) {
        world.spawn((
            FloatingTile { id, resting_z: z },
            Transform::from_translation(center.extend(z)),
            Sprite::from_color(Color::WHITE, Vec2::splat(50.)),
        ));
    }

    fn tile_at(world: &mut World, position: Vec2) -> Option<TileId> {
        world
            .run_system_once(move |tiles: Query<(&FloatingTile, &Transform, &Sprite)>| {
                topmost_tile_at(position, &tiles)
            })
            .expect("the query runs on any world")
    }

    /// A world where tile 2 is carried to `position`, with no window so releases fall back to it.
    fn dragging_world(position: Vec2) -> World {
        let mut world = World::new();
        world.init_resource::<PuzzleConfig>();
        world.init_resource::<ButtonInput<MouseButton>>();
        world.init_resource::<Touches>();
        world.init_resource::<Events<DroppedOn>>();
        world.init_resource::<Events<DragEnded>>();
        world.init_resource::<Events<TouchInput>>();
        world.insert_resource(PointerDrag {
            tile: Some(2),
            position,
            hovered: None,
        });
        world
    }

    fn release(world: &mut World) -> (Vec<DroppedOn>, usize) {
        world
            .run_system_once(release_tile)
            .expect("release runs on the test world");
        let drops = world
            .resource::<Events<DroppedOn>>()
            .iter_current_update_events()
            .copied()
            .collect();
        let ends = world
            .resource::<Events<DragEnded>>()
            .iter_current_update_events()
            .count();
        (drops, ends)
    }

    fn release_mouse(world: &mut World) {
        let mut mouse = world.resource_mut::<ButtonInput<MouseButton>>();
        mouse.press(MouseButton::Left);
        mouse.release(MouseButton::Left);
    }

    #[test]
    fn the_topmost_tile_is_picked() {
        let mut world = World::new();
        tile_sprite(&mut world, 1, Vec2::ZERO, 2.1);
        tile_sprite(&mut world, 7, Vec2::new(20., 0.), 2.6);
        tile_sprite(&mut world, 4, Vec2::new(-10., 0.), 2.3);

        assert_eq!(tile_at(&mut world, Vec2::new(5., 0.)), Some(7), "highest z wins");
        assert_eq!(tile_at(&mut world, Vec2::new(-30., 0.)), Some(4), "only tile 4 there");
        assert_eq!(tile_at(&mut world, Vec2::new(0., 200.)), None, "empty spot");
    }

    #[test]
    fn release_over_a_cell_drops_on_it() {
        let config = PuzzleConfig::default();
        let cell = Cell::new(1, 2);
        let mut world = dragging_world(config.cell_center(cell));
        release_mouse(&mut world);

        let (drops, ends) = release(&mut world);
        assert_eq!(drops, vec![DroppedOn { cell }], "dropped on the cell under the tile");
        assert_eq!(ends, 0, "no plain release");
        assert_eq!(world.resource::<PointerDrag>().tile, None, "pointer free again");
    }

    #[test]
    fn release_off_the_grid_ends_the_drag() {
        let config = PuzzleConfig::default();
        let outside = config.play_area_center + config.grid_size();
        let mut world = dragging_world(outside);
        release_mouse(&mut world);

        let (drops, ends) = release(&mut world);
        assert!(drops.is_empty(), "nothing to drop on");
        assert_eq!(ends, 1, "drag ended");
    }

    #[test]
    fn a_canceled_touch_never_drops() {
        let config = PuzzleConfig::default();
        let mut world = dragging_world(config.cell_center(Cell::new(0, 0)));
        let window = world.spawn_empty().id();
        for phase in [TouchPhase::Started, TouchPhase::Canceled] {
            world.send_event(TouchInput {
                phase,
                position: Vec2::ZERO,
                window,
                force: None,
                id: 0,
            });
        }
        world
            .run_system_once(touch_screen_input_system)
            .expect("touch input runs on the test world");

        let (drops, ends) = release(&mut world);
        assert!(drops.is_empty(), "canceled over a cell, still no drop");
        assert_eq!(ends, 1, "drag ended");
    }

    #[test]
    fn nothing_happens_while_the_pointer_is_held() {
        let config = PuzzleConfig::default();
        let mut world = dragging_world(config.cell_center(Cell::new(0, 0)));
        world
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);

        let (drops, ends) = release(&mut world);
        assert!(drops.is_empty() && ends == 0, "still dragging");
        assert_eq!(world.resource::<PointerDrag>().tile, Some(2), "tile still held");
    }
}
