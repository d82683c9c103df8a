use crate::core::rasterizer::CullMode;
use crate::io::config::Config;
use crate::io::image::save_buffer_to_image;
use crate::pipeline::passes::{post_process_to_buffer, render_main_pass};
use crate::pipeline::renderer::Renderer;
use crate::scene::loader::{init_scene_resources, reload_scene};
use crate::ui::input::OrbitController;
use log::{error, info, warn};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::time::Instant;

fn cull_mode_from_config(config: &Config) -> CullMode {
    match config.render.cull_mode.as_str() {
        "front" => CullMode::Front,
        "none" => CullMode::None,
        _ => CullMode::Back,
    }
}

/// Runs the interactive viewer: a window fed by the software rasterizer,
/// with drag-to-orbit and wheel-to-dolly camera controls.
pub fn run_gui(config: Config, config_path: &str) {
    let mut config = config;
    let width = config.render.width;
    let height = config.render.height;

    info!("Starting viewer ({width}x{height})...");
    info!("Controls: LeftDrag=Orbit, Wheel=Dolly, Space=Spin, C=Cull mode, R=Reload, Esc=Quit");

    let mut window = Window::new(
        "orbitview",
        width,
        height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )
    .unwrap_or_else(|e| panic!("{}", e));

    window.set_target_fps(60);

    let mut context = match init_scene_resources(&config) {
        Ok(context) => context,
        Err(e) => {
            error!("Failed to initialize scene: {e}");
            return;
        }
    };

    let mut renderer = Renderer::new(width, height);
    renderer.rasterizer.set_cull_mode(cull_mode_from_config(&config));

    let mut controller = OrbitController::new(config.camera.sensitivity);
    let mut buffer = vec![0u32; width * height];

    let start_time = Instant::now();
    let mut last_frame_time = Instant::now();
    let mut frame_count = 0;
    let mut last_fps_update = Instant::now();
    let mut needs_render = true;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        // --- Hot Reloading ---
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            info!("Reloading configuration...");
            match Config::load(config_path) {
                Ok(new_config) => match reload_scene(&mut context, &new_config) {
                    Ok(()) => {
                        renderer
                            .rasterizer
                            .set_cull_mode(cull_mode_from_config(&new_config));
                        controller.sensitivity = new_config.camera.sensitivity;
                        config.render = new_config.render;
                        config.object = new_config.object;
                        needs_render = true;
                        info!("Hot reload successful!");
                    }
                    Err(e) => warn!("Failed to apply config: {e}"),
                },
                Err(e) => warn!("Failed to reload config: {e}"),
            }
        }

        if window.is_key_pressed(Key::C, KeyRepeat::No) {
            let next = match renderer.rasterizer.cull_mode {
                CullMode::Back => CullMode::Front,
                CullMode::Front => CullMode::None,
                CullMode::None => CullMode::Back,
            };
            renderer.rasterizer.set_cull_mode(next);
            needs_render = true;
            info!("Cull mode changed to: {next:?}");
        }

        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            context.spin.enabled = !context.spin.enabled;
            info!("Spin: {}", context.spin.enabled);
        }

        // --- Input ---
        let camera_changed = controller.update(&window, &mut context.camera);

        // --- Update tick ---
        let animating = context.is_animating();
        if animating {
            context.advance_animation(dt, start_time.elapsed().as_secs_f32());
        }

        // --- Render ---
        // Continuous mode redraws every tick; otherwise only when some state
        // actually moved.
        if config.render.continuous || camera_changed || animating || needs_render {
            render_main_pass(&config, &context, &mut renderer);
            post_process_to_buffer(&renderer.framebuffer, &mut buffer);
            needs_render = false;
        }

        // --- Display ---
        window.update_with_buffer(&buffer, width, height).unwrap();

        window.set_title(&format!(
            "orbitview - {:.1} FPS - dist {:.1}",
            1.0 / dt.max(1e-6),
            context.camera.distance
        ));

        frame_count += 1;
        if last_fps_update.elapsed().as_secs_f32() >= 2.0 {
            info!(
                "Average FPS: {:.1}",
                frame_count as f32 / last_fps_update.elapsed().as_secs_f32()
            );
            frame_count = 0;
            last_fps_update = Instant::now();
        }
    }
}

/// Renders a single frame headless and saves it as a PNG.
pub fn run_cli(config: Config) {
    info!("Starting headless render...");
    let context = match init_scene_resources(&config) {
        Ok(context) => context,
        Err(e) => {
            error!("Failed to initialize scene: {e}");
            return;
        }
    };

    let start_time = Instant::now();
    let mut renderer = Renderer::new(config.render.width, config.render.height);
    renderer.rasterizer.set_cull_mode(cull_mode_from_config(&config));

    render_main_pass(&config, &context, &mut renderer);
    info!("Render completed in {:.2?}", start_time.elapsed());

    let output = config.render.output.clone().unwrap_or_else(|| {
        format!(
            "render_{}.png",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        )
    });

    info!("Saving output to '{output}'...");
    let mut buffer = vec![0u32; config.render.width * config.render.height];
    post_process_to_buffer(&renderer.framebuffer, &mut buffer);
    save_buffer_to_image(&buffer, config.render.width, config.render.height, &output);
    info!("Done.");
}
