#![allow(
    clippy::allow_attributes,
    reason = "allow attributes are needed for wasm"
)]

use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::window::WindowResolution;

#[cfg(not(target_arch = "wasm32"))]
use crate::HostSimulation;
#[cfg(target_arch = "wasm32")]
use crate::window_resizing::handle_browser_resize;
use crate::{HostCommunicationPlugin, HostMessageHandler};

#[cfg(not(target_arch = "wasm32"))]
pub const FONT: &str = "../../page_helpers/assets/fonts/FiraSans-Bold.ttf";
#[cfg(target_arch = "wasm32")]
pub const FONT: &str = concat!(
    "../../page_helpers-",
    env!("CARGO_PKG_VERSION"),
    "/assets/fonts/FiraSans-Bold.ttf"
);

// Pages are shown on phones first, so the layout targets a 9:16 portrait screen
pub const WINDOW_WIDTH: f32 = 360.0;
pub const WINDOW_HEIGHT: f32 = 640.0;

/// Background shared by every page of the flow.
pub const PAGE_BACKGROUND: Color = Color::srgb(0.99, 0.89, 0.92);

/// Creates the Bevy app every page of the flow runs in.
///
/// Sets up the canvas and asset root the host page expects, and
/// wires the host message bridge for the page's handler `T`.
#[allow(unused_variables, reason = "page_version is used in wasm")]
pub fn get_default_app<T: HostMessageHandler>(page_name: &str, page_version: &str) -> App {
    let mut app = App::new();

    let asset_plugin = AssetPlugin {
        #[cfg(target_arch = "wasm32")]
        file_path: format!("pages/{page_name}-{page_version}/assets"),
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: page_name.to_string(),
            resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            canvas: Some("#page".into()),
            fit_canvas_to_parent: true,
            // The host page keeps its own shortcuts (F5, Ctrl+R)
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    };

    app.add_plugins(DefaultPlugins.set(asset_plugin).set(window_plugin));

    // Saves battery on phones, the pages are mostly static between drags.
    app.add_plugins(bevy_framepace::FramepacePlugin);

    app.insert_resource(ClearColor(PAGE_BACKGROUND));
    app.add_plugins(HostCommunicationPlugin::<T>::default());

    #[cfg(target_arch = "wasm32")]
    app.add_systems(PreUpdate, handle_browser_resize);

    #[cfg(not(target_arch = "wasm32"))]
    app.add_plugins(HostSimulation);

    app
}
