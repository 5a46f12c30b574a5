//! softrast: software 3D rasterizer
//!
//! Renders a mesh on the CPU and shows the result in a window:
//! - Perspective-correct triangle rasterization with a Z-buffer
//! - Directional light, Lambert shading
//! - DDA wireframe overlay
//! - Optional mirroring into a raw framebuffer device
//!
//! Usage: `softrast [config.ron]`. A config path that does not exist yet is
//! created with the default settings.
//!
//! Keys: Space pauses, W toggles the wireframe and focus marker, P saves a
//! snapshot, Escape quits.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod logging;
mod mesh;
mod output;
mod rasterizer;
mod scene;

use std::path::PathBuf;

use config::{load_config, save_config, ConfigError, RenderConfig};
use logging::{init_logging, LoggingConfig};
use macroquad::prelude::*;
use mesh::load_obj;
use output::{save_png, DeviceWriter};
use rasterizer::{Compositor, Framebuffer, Mesh as RasterMesh};
use scene::Scene;

fn config_path() -> Option<PathBuf> {
    std::env::args_os().nth(1).map(PathBuf::from)
}

fn read_config() -> Result<RenderConfig, ConfigError> {
    match config_path() {
        Some(path) if !path.exists() => {
            let config = RenderConfig::default();
            save_config(&config, &path)?;
            log::info!("Wrote default config to {}", path.display());
            Ok(config)
        }
        Some(path) => load_config(path),
        None => Ok(RenderConfig::default()),
    }
}

fn window_conf() -> Conf {
    // Errors are reported (and a missing file written) once logging is up, in main
    let config = config_path()
        .and_then(|path| load_config(path).ok())
        .unwrap_or_default();
    Conf {
        window_title: format!("softrast v{}", VERSION),
        window_width: (config.width * config.window_scale) as i32,
        window_height: (config.height * config.window_scale) as i32,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_logging(LoggingConfig::default());

    let config = match read_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config: {}", e);
            return;
        }
    };

    let mesh = match &config.mesh {
        Some(path) => match load_obj(path) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::error!("Failed to load mesh {}: {}", path.display(), e);
                return;
            }
        },
        None => {
            log::info!("No mesh configured, showing the test cube");
            RasterMesh::cube()
        }
    };

    let mut device = match &config.device {
        Some(path) => match DeviceWriter::open(path, config.resolution()) {
            Ok(writer) => Some(writer),
            Err(e) => {
                log::error!("Failed to open output device {}: {}", path.display(), e);
                return;
            }
        },
        None => None,
    };

    let resolution = config.resolution();
    let mut fb = Framebuffer::new(resolution);
    let mut compositor = Compositor::new(resolution, config.render_settings());
    let mut scene = Scene::new(mesh, &config);

    log::info!(
        "=== softrast v{} === {}x{}, {} triangles",
        VERSION,
        resolution.width(),
        resolution.height(),
        scene.mesh.triangle_count()
    );

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::Space) {
            scene.paused = !scene.paused;
        }
        if is_key_pressed(KeyCode::W) {
            let on = !compositor.settings().wireframe;
            compositor.set_wireframe(on);
        }

        fb.clear(config.clear_color);
        compositor.begin_frame();
        let stats = compositor.render_mesh(&mut fb, &scene.mesh, &scene.camera(), &scene.model_transform());
        if compositor.settings().wireframe {
            compositor.draw_focus_marker(&mut fb, scene.orbit.radius, config.wire_color);
        }

        if is_key_pressed(KeyCode::P) {
            if let Err(e) = save_png(&fb, &config.snapshot_path) {
                log::error!("Failed to save snapshot: {}", e);
            }
        }

        if let Some(writer) = device.as_mut() {
            if let Err(e) = writer.flush(&fb) {
                log::error!("Write to {} failed, disabling it: {}", writer.path().display(), e);
                device = None;
            }
        }

        // Convert framebuffer to texture and draw it scaled to the window.
        // Config validation keeps both sides within u16.
        let texture = Texture2D::from_rgba8(fb.width() as u16, fb.height() as u16, &fb.to_rgba());
        texture.set_filter(FilterMode::Nearest);

        let scale = (screen_width() / fb.width() as f32).min(screen_height() / fb.height() as f32);
        let draw_w = fb.width() as f32 * scale;
        let draw_h = fb.height() as f32 * scale;

        clear_background(BLACK);
        draw_texture_ex(
            &texture,
            (screen_width() - draw_w) * 0.5,
            (screen_height() - draw_h) * 0.5,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );

        draw_text(
            &format!(
                "{} tris | {} fragments | {} written{}",
                stats.triangles,
                stats.fragments,
                stats.written,
                if scene.paused { " | paused" } else { "" }
            ),
            8.0,
            20.0,
            18.0,
            Color::from_rgba(200, 200, 200, 255),
        );

        scene.advance();
        next_frame().await;
    }

    log::info!("Exiting");
}
