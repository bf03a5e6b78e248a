use bevy::prelude::*;

use crate::{FONT, HOST_MESSAGE_QUEUE, HostMessage, PAGE_MESSAGE_QUEUE, PageMessage};

/// Stands in for the host page when a page runs natively.
///
/// `R` asks the page to restart and `T` to tear down, like the host page
/// would. Page messages are logged, and `Complete` shows the banner the host
/// would replace with the next page of the flow.
pub struct HostSimulation;

impl Plugin for HostSimulation {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (simulate_host_controls, drain_page_messages));
    }
}

/// Banner standing in for the next page of the flow
#[derive(Component)]
pub struct NextPageBanner;

fn simulate_host_controls(
    mut commands: Commands,
    keycode: Res<ButtonInput<KeyCode>>,
    banners: Query<Entity, With<NextPageBanner>>,
) {
    let message = if keycode.just_pressed(KeyCode::KeyR) {
        HostMessage::Restart
    } else if keycode.just_pressed(KeyCode::KeyT) {
        HostMessage::Teardown
    } else {
        return;
    };

    HOST_MESSAGE_QUEUE.lock().push(message);
    for entity in &banners {
        commands.entity(entity).despawn_recursive();
    }
}

fn drain_page_messages(mut commands: Commands, asset_server: Res<AssetServer>) {
    let messages: Vec<_> = PAGE_MESSAGE_QUEUE.lock().drain(..).collect();
    for message in messages {
        info!("Page message: {message:?}");
        if message == PageMessage::Complete {
            spawn_next_page_banner(&mut commands, &asset_server);
        }
    }
}

fn spawn_next_page_banner(commands: &mut Commands, asset_server: &Res<AssetServer>) {
    commands
        .spawn((
            NextPageBanner,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
            // Above whatever UI the page shows
            GlobalZIndex(i32::MAX),
        ))
        .with_child((
            Text::new("Next page would open here\n\nPress 'R' to replay"),
            TextFont {
                font: asset_server.load(FONT),
                font_size: 24.0,
                ..default()
            },
            TextLayout::new_with_justify(JustifyText::Center),
            TextColor(Color::WHITE),
        ));
}
