use bevy::asset::LoadState;
use bevy::prelude::*;
use page_helpers::FONT;

use crate::PuzzleSet;
use crate::board::PuzzleBoard;
use crate::config::PuzzleConfig;
use crate::effects::shake_offset;
use crate::hint::HintFlag;
use crate::input::PointerDrag;
use crate::interaction::DropTarget;
use crate::sequencer::{CompletionSequencer, SessionPhase};
use crate::session::SessionScoped;
use crate::tile::{Cell, TOTAL_TILES, TileId, pixel_region};

const TITLE: &str = "Piece Together Us";
const SUBTITLE_PLAYING: &str = "Can you put us back together?";
const SUBTITLE_COMPLETE: &str = "See? We fit perfectly together";
const HINT_TEXT: &str = "Drag the pieces to the grid! They'll only fit in the right spot.";

const TEXT_COLOR: Color = Color::srgb(0.55, 0.16, 0.35);
const FRAME_COLOR: Color = Color::srgb(0.96, 0.72, 0.80);
const ZONE_COLOR: Color = Color::srgb(1.0, 0.97, 0.98);
const ZONE_HIGHLIGHT: Color = Color::srgb(1.0, 0.82, 0.89);
/// Drawn instead of the picture until it is loaded
const PLACEHOLDER_COLOR: Color = Color::srgb(0.93, 0.60, 0.72);

/// Space between neighbouring drop zones
const ZONE_GAP: f32 = 2.0;
const DRAGGED_Z: f32 = 20.0;

/// The picture and its split into cells, once its size is known.
#[derive(Resource, Debug)]
pub struct PuzzleImage {
    image: Handle<Image>,
    atlas: Option<Handle<TextureAtlasLayout>>,
    failed: bool,
}

impl PuzzleImage {
    /// Sprite showing the part of the picture that belongs in `cell`.
    fn cell_sprite(&self, cell: Cell, size: Vec2) -> Sprite {
        let Some(layout) = self.atlas.clone() else {
            return Sprite::from_color(PLACEHOLDER_COLOR, size);
        };

        Sprite {
            custom_size: Some(size),
            ..Sprite::from_atlas_image(
                self.image.clone(),
                TextureAtlas {
                    layout,
                    index: cell.index(),
                },
            )
        }
    }

    fn full_sprite(&self, size: Vec2) -> Sprite {
        if self.atlas.is_none() {
            return Sprite::from_color(PLACEHOLDER_COLOR, size);
        }

        Sprite {
            custom_size: Some(size),
            ..Sprite::from_image(self.image.clone())
        }
    }
}

/// A tile still waiting to be placed.
#[derive(Component, Debug)]
pub struct FloatingTile {
    pub id: TileId,
    pub resting_z: f32,
}

/// Shows the picture part of a cell, whether the tile is floating or placed.
#[derive(Component)]
struct CellImage(Cell);

#[derive(Component)]
struct DropZone(Cell);

/// Fades out with the grid when the puzzle is complete.
#[derive(Component)]
struct GridPart;

#[derive(Component)]
struct FullImage;

#[derive(Component)]
struct Subtitle;

#[derive(Component)]
struct ProgressText;

pub struct PuzzleRenderPlugin;

impl Plugin for PuzzleRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_puzzle_image)
            .add_systems(
                Update,
                (
                    prepare_atlas,
                    apply_cell_images.run_if(resource_changed::<PuzzleImage>),
                )
                    .chain()
                    .in_set(PuzzleSet::Render)
                    .run_if(resource_exists::<PuzzleImage>),
            )
            .add_systems(
                Update,
                (
                    spawn_scene.run_if(resource_added::<PuzzleBoard>),
                    lock_placed_tiles,
                    position_floating_tiles,
                    highlight_drop_target.run_if(in_state(SessionPhase::Playing)),
                    fade_grid.run_if(in_state(SessionPhase::GridDisappearing)),
                    show_phase.run_if(state_changed::<SessionPhase>),
                    update_progress,
                )
                    .chain()
                    .in_set(PuzzleSet::Render)
                    .after(apply_cell_images)
                    .run_if(resource_exists::<PuzzleBoard>)
                    .run_if(resource_exists::<PuzzleImage>),
            );
    }
}

fn load_puzzle_image(
    mut commands: Commands,
    config: Res<PuzzleConfig>,
    asset_server: Res<AssetServer>,
) {
    commands.insert_resource(PuzzleImage {
        image: asset_server.load(config.image_path),
        atlas: None,
        failed: false,
    });
}

/// Splits the picture into cells as soon as it is loaded.
fn prepare_atlas(
    mut puzzle_image: ResMut<PuzzleImage>,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    if puzzle_image.atlas.is_some() || puzzle_image.failed {
        return;
    }

    match asset_server.load_state(puzzle_image.image.id()) {
        LoadState::Loaded => {
            let Some(image) = images.get(&puzzle_image.image) else {
                return;
            };

            let size = image.size();
            let layout = TextureAtlasLayout {
                size,
                textures: Cell::all().map(|cell| pixel_region(cell, size)).collect(),
            };
            puzzle_image.atlas = Some(layouts.add(layout));
            info!("Puzzle image loaded ({}x{})", size.x, size.y);
        }
        LoadState::Failed(err) => {
            error!("Puzzle image could not be loaded, showing blank tiles: {err}");
            puzzle_image.failed = true;
        }
        LoadState::NotLoaded | LoadState::Loading => {}
    }
}

fn apply_cell_images(
    puzzle_image: Res<PuzzleImage>,
    mut cells: Query<(&CellImage, &mut Sprite), Without<FullImage>>,
    mut full_image: Query<&mut Sprite, With<FullImage>>,
) {
    for (cell_image, mut sprite) in &mut cells {
        let size = sprite.custom_size.unwrap_or(Vec2::ONE);
        *sprite = puzzle_image.cell_sprite(cell_image.0, size);
    }

    for mut sprite in &mut full_image {
        let size = sprite.custom_size.unwrap_or(Vec2::ONE);
        *sprite = puzzle_image.full_sprite(size);
    }
}

fn spawn_scene(
    mut commands: Commands,
    board: Res<PuzzleBoard>,
    config: Res<PuzzleConfig>,
    puzzle_image: Res<PuzzleImage>,
    asset_server: Res<AssetServer>,
) {
    let font = asset_server.load(FONT);
    let text = |content: &str, font_size: f32| {
        (
            Text2d::new(content),
            TextFont {
                font: font.clone(),
                font_size,
                ..default()
            },
            TextColor(TEXT_COLOR),
            TextLayout::new_with_justify(JustifyText::Center),
        )
    };

    commands.spawn((
        text(TITLE, 30.),
        Transform::from_xyz(0., 285., 10.),
        SessionScoped,
    ));
    commands.spawn((
        text(SUBTITLE_PLAYING, 16.),
        Subtitle,
        Transform::from_xyz(0., 252., 10.),
        SessionScoped,
    ));

    // Grid
    commands.spawn((
        GridPart,
        Sprite::from_color(FRAME_COLOR, config.grid_size() + Vec2::splat(4. * ZONE_GAP)),
        Transform::from_translation(config.play_area_center.extend(-1.)),
        SessionScoped,
    ));
    let zone_size = Vec2::splat(config.cell_size - ZONE_GAP);
    for cell in Cell::all() {
        commands.spawn((
            DropZone(cell),
            GridPart,
            Sprite::from_color(ZONE_COLOR, zone_size),
            Transform::from_translation(config.cell_center(cell).extend(0.)),
            SessionScoped,
        ));
    }

    commands.spawn((
        FullImage,
        puzzle_image.full_sprite(config.grid_size()),
        Transform::from_translation(config.play_area_center.extend(1.)),
        Visibility::Hidden,
        SessionScoped,
    ));

    // Later tiles are drawn on top, and picked first
    for (order, tile) in board.unplaced().iter().enumerate() {
        let resting_z = 2. + order as f32 / TOTAL_TILES as f32;
        commands.spawn((
            FloatingTile {
                id: tile.id(),
                resting_z,
            },
            CellImage(tile.correct_cell()),
            puzzle_image.cell_sprite(tile.correct_cell(), Vec2::splat(config.cell_size)),
            Transform::from_translation(config.tile_position(tile).extend(resting_z)),
            SessionScoped,
        ));
    }

    if config.show_progress {
        commands.spawn((
            text("", 13.),
            ProgressText,
            Transform::from_xyz(0., -295., 10.),
            SessionScoped,
        ));
    }
}

/// Moves tiles that were just placed from the scattered area into the grid.
fn lock_placed_tiles(
    mut commands: Commands,
    board: Res<PuzzleBoard>,
    config: Res<PuzzleConfig>,
    puzzle_image: Res<PuzzleImage>,
    tiles: Query<(Entity, &FloatingTile)>,
) {
    for (entity, tile) in &tiles {
        if !board.is_placed(tile.id) {
            continue;
        }

        commands.entity(entity).despawn_recursive();

        let cell = Cell::from_index(tile.id);
        commands.spawn((
            GridPart,
            CellImage(cell),
            puzzle_image.cell_sprite(cell, Vec2::splat(config.cell_size - ZONE_GAP)),
            Transform::from_translation(config.cell_center(cell).extend(0.5)),
            SessionScoped,
        ));
    }
}

/// The dragged tile sticks to the pointer, the others rest (or shake) where they were scattered.
fn position_floating_tiles(
    board: Res<PuzzleBoard>,
    config: Res<PuzzleConfig>,
    drag: Option<Res<PointerDrag>>,
    mut tiles: Query<(&FloatingTile, &mut Transform)>,
) {
    for (floating, mut transform) in &mut tiles {
        let Some(tile) = board.unplaced_tile(floating.id) else {
            continue;
        };

        if let Some(drag) = drag.as_ref().filter(|_| board.dragged() == Some(floating.id)) {
            transform.translation = drag.position.extend(DRAGGED_Z);
            continue;
        }

        let shake = board.rejection_progress(floating.id).map_or(0., shake_offset);
        transform.translation =
            (config.tile_position(tile) + Vec2::X * shake).extend(floating.resting_z);
    }
}

fn highlight_drop_target(target: Res<DropTarget>, mut zones: Query<(&DropZone, &mut Sprite)>) {
    for (zone, mut sprite) in &mut zones {
        sprite.color = if target.0 == Some(zone.0) {
            ZONE_HIGHLIGHT
        } else {
            ZONE_COLOR
        };
    }
}

fn fade_grid(
    sequencer: Res<CompletionSequencer>,
    mut grid: Query<&mut Sprite, With<GridPart>>,
) {
    let alpha = 1. - sequencer.grid_fade();
    for mut sprite in &mut grid {
        sprite.color.set_alpha(alpha);
    }
}

fn show_phase(
    phase: Res<State<SessionPhase>>,
    mut floating: Query<&mut Visibility, (With<FloatingTile>, Without<GridPart>, Without<FullImage>)>,
    mut grid: Query<&mut Visibility, (With<GridPart>, Without<FullImage>)>,
    mut full_image: Query<&mut Visibility, (With<FullImage>, Without<FloatingTile>)>,
    mut subtitle: Query<&mut Text2d, With<Subtitle>>,
) {
    let phase = *phase.get();
    let shown = |visible: bool| {
        if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        }
    };

    for mut visibility in &mut floating {
        *visibility = shown(phase == SessionPhase::Playing);
    }
    for mut visibility in &mut grid {
        *visibility = shown(!phase.is_complete());
    }
    for mut visibility in &mut full_image {
        *visibility = shown(phase.is_complete());
    }
    for mut text in &mut subtitle {
        **text = if phase.is_complete() {
            SUBTITLE_COMPLETE
        } else {
            SUBTITLE_PLAYING
        }
        .to_string();
    }
}

fn update_progress(
    board: Res<PuzzleBoard>,
    hint: Res<HintFlag>,
    phase: Res<State<SessionPhase>>,
    mut progress: Query<&mut Text2d, With<ProgressText>>,
) {
    for mut text in &mut progress {
        let mut content = format!("Pieces placed: {} / {TOTAL_TILES}", board.placed_count());
        if hint.is_visible() && !phase.get().is_complete() {
            content.push('\n');
            content.push_str(HINT_TEXT);
        }
        **text = content;
    }
}
