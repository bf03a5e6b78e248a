use core::f32::consts::TAU;
use core::time::Duration;

use bevy::prelude::*;

use crate::PuzzleSet;
use crate::config::PuzzleConfig;
use crate::hint::HintFlag;
use crate::render::FloatingTile;
use crate::sequencer::SessionPhase;

const SHAKE_AMPLITUDE: f32 = 6.0;
const SHAKE_CYCLES: f32 = 4.0;

const HINT_PULSE_SCALE: f32 = 0.08;
const HINT_PULSE_PERIOD: f32 = 1.2;

/// Horizontal offset of a rejected tile, `progress` going from 0 to 1 over the shake.
pub fn shake_offset(progress: f32) -> f32 {
    (progress * SHAKE_CYCLES * TAU).sin() * SHAKE_AMPLITUDE * (1.0 - progress)
}

/// A glyph falling over the completion overlay.
#[derive(Component, Debug)]
pub struct Confetti {
    delay: Timer,
    fall: Timer,
}

/// Adds the confetti burst under `parent`, a full-screen UI node.
pub fn spawn_confetti(
    parent: &mut ChildBuilder,
    config: &PuzzleConfig,
    font: &Handle<Font>,
    rng: &mut fastrand::Rng,
) {
    for _ in 0..config.confetti_count {
        let Some(glyph) = rng.choice(config.confetti_glyphs) else {
            return;
        };

        parent.spawn((
            Confetti {
                delay: Timer::from_seconds(rng.f32() * 0.5, TimerMode::Once),
                fall: Timer::new(
                    Duration::from_secs_f32(2.0 + rng.f32() * 2.0),
                    TimerMode::Once,
                ),
            },
            Text::new(glyph),
            TextFont {
                font: font.clone(),
                font_size: 22.,
                ..default()
            },
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(rng.f32() * 100.),
                top: Val::Percent(-10.),
                ..default()
            },
            Visibility::Hidden,
        ));
    }
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                pulse_hint
                    .run_if(resource_exists::<HintFlag>)
                    .run_if(in_state(SessionPhase::Playing)),
                fall_confetti.run_if(in_state(SessionPhase::ShowingOverlay)),
            )
                .in_set(PuzzleSet::Render),
        );
    }
}

/// Floating tiles breathe while the hint is up.
fn pulse_hint(
    time: Res<Time>,
    hint: Res<HintFlag>,
    mut tiles: Query<&mut Transform, With<FloatingTile>>,
) {
    let scale = if hint.is_visible() {
        let wave = (time.elapsed_secs() / HINT_PULSE_PERIOD * TAU).sin();
        HINT_PULSE_SCALE.mul_add(wave, 1.0)
    } else {
        1.0
    };

    for mut transform in &mut tiles {
        transform.scale = Vec3::splat(scale);
    }
}

fn fall_confetti(
    time: Res<Time>,
    mut confetti: Query<(&mut Confetti, &mut Node, &mut Visibility)>,
) {
    for (mut piece, mut node, mut visibility) in &mut confetti {
        if !piece.delay.tick(time.delta()).finished() {
            continue;
        }

        let fraction = piece.fall.tick(time.delta()).fraction();
        node.top = Val::Percent(fraction.mul_add(110., -10.));
        *visibility = if piece.fall.finished() {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
}
