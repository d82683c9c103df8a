use crate::core::framebuffer::FrameBuffer;
use crate::core::math::transform::TransformFactory;
use crate::io::config::Config;
use crate::pipeline::renderer::{ClearOptions, Renderer};
use crate::scene::context::RenderContext;
use nalgebra::Vector3;
use rayon::prelude::*;

/// Executes the main rendering pass: clear depth, paint the background
/// gradient, then pose and draw the active mesh.
pub fn render_main_pass(config: &Config, context: &RenderContext, renderer: &mut Renderer) {
    renderer.clear_with_options(ClearOptions {
        gradient: Some((
            Vector3::from(config.render.background_gradient_top),
            Vector3::from(config.render.background_gradient_bottom),
        )),
        ..Default::default()
    });

    if let Some(mesh) = &context.mesh {
        // Spin about Y first, then bob along Y.
        let model = TransformFactory::translation(&Vector3::new(0.0, context.spin.y_offset, 0.0))
            * TransformFactory::rotation_y(context.spin.angle);

        renderer.draw_mesh(mesh, &model, &context.camera);
    }
}

/// Packs the framebuffer into a presentable 0xAARRGGBB buffer.
///
/// Channel values are raw interpolation results in 0..255 and can overshoot
/// either end; they are clamped here, at the 8-bit boundary.
pub fn post_process_to_buffer(framebuffer: &FrameBuffer, buffer: &mut [u32]) {
    buffer
        .par_chunks_mut(framebuffer.width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                if let Some(color) = framebuffer.get_pixel(x, y) {
                    let r = color.x.clamp(0.0, 255.0) as u32;
                    let g = color.y.clamp(0.0, 255.0) as u32;
                    let b = color.z.clamp(0.0, 255.0) as u32;

                    *pixel = (255 << 24) | (r << 16) | (g << 8) | b;
                } else {
                    *pixel = 255 << 24;
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::loader::init_scene_resources;

    #[test]
    fn pack_clamps_overshooting_channels() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.fill_color(Vector3::new(300.0, -20.0, 128.0));

        let mut buffer = vec![0u32; 2];
        post_process_to_buffer(&fb, &mut buffer);

        assert_eq!(buffer[0], 0xFF_FF_00_80);
        assert_eq!(buffer[1], 0xFF_FF_00_80);
    }

    #[test]
    fn empty_scene_renders_the_gradient_only() {
        let config = Config::default();
        let context = init_scene_resources(&config).unwrap();
        let mut renderer = Renderer::new(config.render.width, config.render.height);

        render_main_pass(&config, &context, &mut renderer);

        let top = renderer.framebuffer.get_pixel(0, 0).unwrap();
        let bottom = renderer
            .framebuffer
            .get_pixel(0, config.render.height - 1)
            .unwrap();
        assert!((top.x - 80.0).abs() < 1.0);
        assert!(bottom.x < 1.0);

        // Nothing drawn: depth stays cleared everywhere.
        assert!(renderer.framebuffer.get_depth(10, 10).unwrap().is_infinite());
    }
}
