use bevy::prelude::*;
use page_helpers::FONT;

use crate::PuzzleSet;
use crate::board::PuzzleBoard;
use crate::config::PuzzleConfig;
use crate::effects::spawn_confetti;
use crate::host::ContinuePressed;
use crate::sequencer::SessionPhase;
use crate::session::SessionScoped;

const DIM_COLOR: Color = Color::srgba(0.0, 0.0, 0.0, 0.6);
const CARD_COLOR: Color = Color::srgb(1.0, 0.97, 0.98);
const ACCENT_COLOR: Color = Color::srgb(0.91, 0.33, 0.55);
const ACCENT_HOVER_COLOR: Color = Color::srgb(0.80, 0.24, 0.45);
const TEXT_COLOR: Color = Color::srgb(0.55, 0.16, 0.35);

#[derive(Component)]
struct ContinueButton;

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(SessionPhase::ShowingOverlay),
            spawn_overlay.run_if(resource_exists::<PuzzleBoard>),
        )
        .add_systems(
            Update,
            press_continue
                .in_set(PuzzleSet::Input)
                .run_if(in_state(SessionPhase::ShowingOverlay)),
        );
    }
}

fn spawn_overlay(
    mut commands: Commands,
    config: Res<PuzzleConfig>,
    asset_server: Res<AssetServer>,
) {
    let font = asset_server.load(FONT);
    let mut rng = fastrand::Rng::new();

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.),
                height: Val::Percent(100.),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(DIM_COLOR),
            SessionScoped,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(12.),
                        padding: UiRect::all(Val::Px(24.)),
                        ..default()
                    },
                    BackgroundColor(CARD_COLOR),
                    BorderRadius::all(Val::Px(20.)),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new("You did it!"),
                        TextFont {
                            font: font.clone(),
                            font_size: 32.,
                            ..default()
                        },
                        TextColor(ACCENT_COLOR),
                    ));
                    card.spawn((
                        Text::new("We fit perfectly together"),
                        TextFont {
                            font: font.clone(),
                            font_size: 18.,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                    ));
                    card.spawn((
                        Button,
                        ContinueButton,
                        Node {
                            padding: UiRect::axes(Val::Px(28.), Val::Px(10.)),
                            margin: UiRect::top(Val::Px(8.)),
                            ..default()
                        },
                        BackgroundColor(ACCENT_COLOR),
                        BorderRadius::MAX,
                    ))
                    .with_child((
                        Text::new("Continue →"),
                        TextFont {
                            font: font.clone(),
                            font_size: 20.,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });

            spawn_confetti(overlay, &config, &font, &mut rng);
        });

    info!("Showing the completion overlay");
}

fn press_continue(
    mut buttons: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<ContinueButton>),
    >,
    mut presses: EventWriter<ContinuePressed>,
) {
    for (interaction, mut color) in &mut buttons {
        match interaction {
            Interaction::Pressed => {
                presses.send(ContinuePressed);
            }
            Interaction::Hovered => color.0 = ACCENT_HOVER_COLOR,
            Interaction::None => color.0 = ACCENT_COLOR,
        }
    }
}
