use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{
    edge_function, perspective_correct_blend, perspective_correct_depth,
};
use nalgebra::{Point2, Point3, Vector3};
use rayon::prelude::*;

/// The Rasterizer draws raster-space triangles into a FrameBuffer.
pub struct Rasterizer {
    pub cull_mode: CullMode,
}

/// Which winding survives rasterization.
///
/// `Back` (the default) shades only counter-clockwise triangles: the
/// inside test requires all edge weights to be non-negative, so clockwise
/// triangles are never inside. `None` renders both windings two-sided.
#[derive(PartialEq, Copy, Clone, Debug)]
pub enum CullMode {
    Back,
    Front,
    None,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
        }
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    /// Rasterizes one triangle with depth-tested, perspective-correct
    /// vertex-color interpolation.
    ///
    /// `raster` holds the three vertices in raster space: x/y in pixels,
    /// z the view-space depth. `colors` are the matching vertex colors with
    /// channels in 0..255.
    ///
    /// Triangles are not clipped against the view frustum; geometry behind
    /// or straddling the camera plane can rasterize incorrectly. Its
    /// non-finite depths are rejected below so it cannot corrupt the depth
    /// buffer.
    pub fn rasterize_triangle(
        &self,
        framebuffer: &FrameBuffer,
        raster: &[Point3<f32>; 3],
        colors: &[Vector3<f32>; 3],
    ) {
        let p0 = Point2::new(raster[0].x, raster[0].y);
        let p1 = Point2::new(raster[1].x, raster[1].y);
        let p2 = Point2::new(raster[2].x, raster[2].y);

        // Twice the signed triangle area; the sign encodes the winding.
        // Zero-area triangles produce non-finite weights downstream and
        // shade nothing.
        let signed_area = edge_function(p0, p1, p2);

        match self.cull_mode {
            CullMode::Back if signed_area <= 0.0 => return,
            CullMode::Front if signed_area >= 0.0 => return,
            CullMode::None if signed_area == 0.0 => return,
            _ => {}
        }

        let depths = [raster[0].z, raster[1].z, raster[2].z];

        // Integer pixel bounding box, clamped to the buffer.
        let (min_x, min_y, max_x, max_y) = compute_bounding_box(&[p0, p1, p2]);
        if max_x <= 0
            || max_y <= 0
            || min_x >= framebuffer.width as i32
            || min_y >= framebuffer.height as i32
        {
            return;
        }

        let start_x = min_x.max(0) as usize;
        let end_x = max_x.min(framebuffer.width as i32) as usize;
        let start_y = min_y.max(0) as usize;
        let end_y = max_y.min(framebuffer.height as i32) as usize;

        // Row-parallel pixel loop; the framebuffer's depth CAS keeps the
        // nearest-wins invariant across rows.
        (start_y..end_y).into_par_iter().for_each(|y| {
            for x in start_x..end_x {
                let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                let w0 = edge_function(p1, p2, pixel_center);
                let w1 = edge_function(p2, p0, pixel_center);
                let w2 = edge_function(p0, p1, pixel_center);

                // Inside iff all weights carry the triangle's own sign, so
                // CullMode::None accepts clockwise triangles with uniformly
                // non-positive weights.
                let inside = if signed_area > 0.0 {
                    w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
                } else {
                    w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
                };
                if !inside {
                    continue;
                }

                // Normalize to barycentric weights summing to 1.
                let weights =
                    Vector3::new(w0 / signed_area, w1 / signed_area, w2 / signed_area);

                let point_depth = perspective_correct_depth(&weights, &depths);

                // Camera-plane or degenerate geometry; never shade it.
                if !point_depth.is_finite() {
                    continue;
                }

                if framebuffer.depth_test_and_update(x, y, point_depth) {
                    let color =
                        perspective_correct_blend(&weights, colors, &depths, point_depth);
                    framebuffer.set_pixel_safe(x, y, color);
                }
            }
        });
    }
}

/// Min/max of the three vertices, floored/ceiled to pixel bounds.
/// The max side is exclusive.
fn compute_bounding_box(points: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
    let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32;
    let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32;
    (min_x, min_y, max_x, max_y)
}
