/// Target window size for a browser viewport, clamped to what every backend accepts.
#[cfg_attr(
    all(not(target_arch = "wasm32"), not(test)),
    expect(dead_code, reason = "used by the wasm resize system")
)]
fn clamped_resolution(viewport_width: f32, viewport_height: f32) -> (f32, f32) {
    // wgpu refuses surfaces larger than the maximum texture size of WebGL2 devices
    const MAX_SURFACE_SIZE: f32 = 2048.0;

    (
        viewport_width.clamp(1.0, MAX_SURFACE_SIZE),
        viewport_height.clamp(1.0, MAX_SURFACE_SIZE),
    )
}

#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(
    mut primary_query: bevy::ecs::system::Query<
        &mut bevy::window::Window,
        bevy::ecs::query::With<bevy::window::PrimaryWindow>,
    >,
) {
    let Some(browser_window) = web_sys::window() else {
        return;
    };
    let (Ok(inner_width), Ok(inner_height)) =
        (browser_window.inner_width(), browser_window.inner_height())
    else {
        return;
    };
    let (Some(viewport_width), Some(viewport_height)) = (inner_width.as_f64(), inner_height.as_f64())
    else {
        return;
    };

    let (width, height) = clamped_resolution(viewport_width as f32, viewport_height as f32);

    for mut window in &mut primary_query {
        if (window.resolution.width() - width).abs() > f32::EPSILON
            || (window.resolution.height() - height).abs() > f32::EPSILON
        {
            window.resolution.set(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_viewports_are_clamped_per_axis() {
        assert_eq!(
            clamped_resolution(1284.0, 2418.0),
            (1284.0, 2048.0),
            "only the oversized axis is clamped"
        );
    }

    #[test]
    fn degenerate_viewports_keep_a_drawable_surface() {
        assert_eq!(clamped_resolution(0.0, -5.0), (1.0, 1.0), "never zero-sized");
    }
}
