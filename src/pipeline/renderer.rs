use crate::core::framebuffer::FrameBuffer;
use crate::core::math::transform::vertex_to_raster;
use crate::core::rasterizer::Rasterizer;
use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Vector3};

/// How the buffers are reset at the start of a frame.
pub struct ClearOptions {
    /// Fill color used when no gradient is set.
    pub color: Vector3<f32>,
    /// Vertical gradient, (top, bottom). Takes precedence over `color`.
    pub gradient: Option<(Vector3<f32>, Vector3<f32>)>,
    pub depth: f32,
}

impl Default for ClearOptions {
    fn default() -> Self {
        Self {
            color: Vector3::zeros(),
            gradient: None,
            depth: f32::INFINITY,
        }
    }
}

/// The high-level renderer that owns the rasterizer and the frame buffers.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
        }
    }

    /// Clears color and depth according to `options`.
    pub fn clear_with_options(&mut self, options: ClearOptions) {
        match options.gradient {
            Some((top, bottom)) => self.framebuffer.fill_gradient(top, bottom),
            None => self.framebuffer.fill_color(options.color),
        }
        self.framebuffer.clear_depth(options.depth);
    }

    /// Draws a mesh: per triangle, fetch vertices and colors, apply the
    /// object pose, project to raster space and rasterize.
    pub fn draw_mesh(&mut self, mesh: &Mesh, model: &Matrix4<f32>, camera: &Camera) {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let width = self.framebuffer.width as f32;
        let height = self.framebuffer.height as f32;

        for triangle in 0..mesh.triangle_count() {
            let colors = mesh.triangle_colors(triangle);

            let raster = mesh
                .triangle_positions(triangle)
                .map(|p| vertex_to_raster(&model.transform_point(&p), &view, &projection, width, height));

            self.rasterizer
                .rasterize_triangle(&self.framebuffer, &raster, &colors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_without_gradient_uses_solid_color() {
        let mut renderer = Renderer::new(4, 4);
        renderer.clear_with_options(ClearOptions {
            color: Vector3::new(10.0, 20.0, 30.0),
            ..Default::default()
        });

        let pixel = renderer.framebuffer.get_pixel(2, 2).unwrap();
        assert_eq!(pixel, Vector3::new(10.0, 20.0, 30.0));
        assert!(renderer.framebuffer.get_depth(2, 2).unwrap().is_infinite());
    }

    #[test]
    fn draw_mesh_shades_the_facing_triangle() {
        let mut renderer = Renderer::new(64, 64);
        renderer.clear_with_options(ClearOptions::default());

        // Camera on the +Z side of the target, facing the unit triangle's
        // counter-clockwise front.
        let mut camera = Camera::new(35.0, 1.995, 1.5, 0.1, 64, 64).unwrap();
        camera.set_orbit(0.0, 0.0, 5.0, 3.0);

        let mesh = Mesh::unit_triangle();
        renderer.draw_mesh(&mesh, &Matrix4::identity(), &camera);

        // The triangle straddles the view center; its center pixel is shaded
        // with a finite depth near the orbit distance.
        let depth = renderer.framebuffer.get_depth(32, 32).unwrap();
        assert!(depth.is_finite());
        assert!((depth - 5.0).abs() < 0.5);

        let color = renderer.framebuffer.get_pixel(32, 32).unwrap();
        assert!(color.norm() > 0.0);
    }
}
