use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3};
use std::f32::consts::{FRAC_PI_2, TAU};

pub const MM_PER_INCH: f32 = 25.4;

/// Far clip distance. Fixed; only the near plane is a camera parameter.
const FAR_PLANE: f32 = 100.0;

/// Film-gate perspective camera orbiting a target point.
///
/// Intrinsics are physical: focal length in millimetres, film aperture in
/// millimetres (constructed from inch inputs), near clip distance, output
/// resolution. The canvas half-extents derived from them define the field
/// of view implicitly.
///
/// Orbit state is a fixed target, a distance clamped to a minimum, a
/// horizontal angle wrapped into [0, 2pi) and a vertical angle clamped into
/// [-pi/2, pi/2]. Only the orbit controller (and scene loading) mutates the
/// camera; rendering reads it per frame.
#[derive(Debug, Clone)]
pub struct Camera {
    // --- Intrinsics ---
    pub focal_length_mm: f32,
    pub aperture_width_mm: f32,
    pub aperture_height_mm: f32,
    pub near: f32,
    pub resolution_width: usize,
    pub resolution_height: usize,

    // --- Derived film plane (always positive) ---
    pub canvas_right: f32,
    pub canvas_top: f32,

    // --- Orbit state ---
    pub target: Point3<f32>,
    pub distance: f32,
    pub min_distance: f32,
    pub orbit_h: f32,
    pub orbit_v: f32,

    // --- Cached matrices ---
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    /// Builds a camera from physical parameters. Apertures are in inches
    /// (film-gate convention); everything else in millimetres/pixels.
    pub fn new(
        focal_length_mm: f32,
        aperture_width_in: f32,
        aperture_height_in: f32,
        near: f32,
        resolution_width: usize,
        resolution_height: usize,
    ) -> Result<Self, String> {
        if focal_length_mm <= 0.0 {
            return Err(format!(
                "focal length must be positive, got {focal_length_mm}"
            ));
        }
        if aperture_width_in <= 0.0 || aperture_height_in <= 0.0 {
            return Err(format!(
                "film aperture must be positive, got {aperture_width_in}x{aperture_height_in}"
            ));
        }
        if near <= 0.0 {
            return Err(format!("near clip distance must be positive, got {near}"));
        }

        let aperture_width_mm = aperture_width_in * MM_PER_INCH;
        let aperture_height_mm = aperture_height_in * MM_PER_INCH;

        // Film plane extents in the near plane; the implicit field of view.
        let canvas_top = aperture_height_mm / 2.0 / focal_length_mm * near;
        let canvas_right = canvas_top * (aperture_width_mm / aperture_height_mm);

        let mut camera = Self {
            focal_length_mm,
            aperture_width_mm,
            aperture_height_mm,
            near,
            resolution_width,
            resolution_height,
            canvas_right,
            canvas_top,
            target: Point3::origin(),
            distance: 15.0,
            min_distance: 3.0,
            orbit_h: std::f32::consts::PI,
            orbit_v: 0.6,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        camera.update_matrices();
        Ok(camera)
    }

    /// Replaces the orbit pose wholesale (scene setup / hot reload).
    pub fn set_orbit(&mut self, horizontal: f32, vertical: f32, distance: f32, min_distance: f32) {
        self.min_distance = min_distance;
        self.distance = distance.max(min_distance);
        self.orbit_h = horizontal.rem_euclid(TAU);
        self.orbit_v = vertical.clamp(-FRAC_PI_2, FRAC_PI_2);
        self.update_matrices();
    }

    /// Recalculates the cached view and projection matrices from the current
    /// parameters.
    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::orbit_view(self.orbit_h, self.orbit_v, self.distance);
        self.projection_matrix = TransformFactory::film_gate_perspective(
            self.focal_length_mm,
            self.aperture_width_mm,
            self.aperture_height_mm,
            self.near,
            FAR_PLANE,
        );
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    /// Adds pointer-drag deltas to the orbit angles. The horizontal angle
    /// wraps into [0, 2pi); the vertical angle saturates at +-pi/2 without
    /// erroring.
    pub fn rotate_orbit(&mut self, delta_h: f32, delta_v: f32) {
        self.orbit_h = (self.orbit_h + delta_h).rem_euclid(TAU);
        self.orbit_v = (self.orbit_v + delta_v).clamp(-FRAC_PI_2, FRAC_PI_2);
        self.update_matrices();
    }

    /// Moves the camera along the view axis. Distance never drops below the
    /// configured minimum.
    pub fn zoom_dolly(&mut self, delta: f32) {
        self.distance = (self.distance + delta).max(self.min_distance);
        self.update_matrices();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::apply_perspective_division;
    use nalgebra::Vector4;

    const EPS: f32 = 1e-5;

    fn test_camera() -> Camera {
        Camera::new(35.0, 1.995, 1.5, 0.1, 640, 480).unwrap()
    }

    #[test]
    fn rejects_non_positive_parameters() {
        assert!(Camera::new(0.0, 1.995, 1.5, 0.1, 640, 480).is_err());
        assert!(Camera::new(35.0, -1.0, 1.5, 0.1, 640, 480).is_err());
        assert!(Camera::new(35.0, 1.995, 0.0, 0.1, 640, 480).is_err());
        assert!(Camera::new(35.0, 1.995, 1.5, 0.0, 640, 480).is_err());
    }

    #[test]
    fn film_plane_is_positive_and_keeps_gate_ratio() {
        let camera = test_camera();
        assert!(camera.canvas_top > 0.0);
        assert!(camera.canvas_right > 0.0);

        let gate_ratio = camera.aperture_width_mm / camera.aperture_height_mm;
        assert!((camera.canvas_right / camera.canvas_top - gate_ratio).abs() < EPS);
    }

    #[test]
    fn vertical_orbit_saturates_at_half_pi() {
        let mut camera = test_camera();
        camera.rotate_orbit(0.0, 10.0);
        assert_eq!(camera.orbit_v, FRAC_PI_2);

        camera.rotate_orbit(0.0, -100.0);
        assert_eq!(camera.orbit_v, -FRAC_PI_2);
    }

    #[test]
    fn horizontal_orbit_wraps_into_full_turn() {
        let mut camera = test_camera();
        for _ in 0..100 {
            camera.rotate_orbit(1.7, 0.0);
            assert!(camera.orbit_h >= 0.0 && camera.orbit_h < TAU);
        }
        for _ in 0..100 {
            camera.rotate_orbit(-2.3, 0.0);
            assert!(camera.orbit_h >= 0.0 && camera.orbit_h < TAU);
        }
    }

    #[test]
    fn dolly_clamps_to_minimum_distance() {
        let mut camera = test_camera();
        camera.zoom_dolly(-1000.0);
        assert_eq!(camera.distance, camera.min_distance);

        camera.zoom_dolly(4.5);
        assert!((camera.distance - (camera.min_distance + 4.5)).abs() < EPS);
    }

    #[test]
    fn projection_matrix_matches_per_point_formulation() {
        // The matrix path must land every point on the same NDC x/y as the
        // direct near-plane divide against the film-gate extents.
        let camera = test_camera();
        let projection = camera.projection_matrix();

        let samples = [
            Point3::new(1.0, 2.0, -5.0),
            Point3::new(-3.0, 0.5, -12.0),
            Point3::new(0.25, -4.0, -0.7),
        ];
        for cam_point in samples {
            let clip = projection * cam_point.to_homogeneous();
            let ndc = apply_perspective_division(&clip);

            let screen_x = cam_point.x / -cam_point.z * camera.near;
            let screen_y = cam_point.y / -cam_point.z * camera.near;
            assert!((ndc.x - screen_x / camera.canvas_right).abs() < EPS);
            assert!((ndc.y - screen_y / camera.canvas_top).abs() < EPS);
        }

        // And the divide is by the view-space depth.
        let clip = projection * Vector4::new(0.0, 0.0, -5.0, 1.0);
        assert!((clip.w - 5.0).abs() < EPS);
    }
}
