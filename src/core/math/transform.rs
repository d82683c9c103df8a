use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the transformation matrices used by the pipeline.
/// Manually implemented to keep the coordinate system explicit
/// (right-handed, camera looking down -Z, column-vector convention).
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a film-gate perspective projection matrix.
    ///
    /// The field of view is implied by the physical camera parameters: a
    /// point at view-space depth -z lands at x * focal / (aperture_w / 2) / -z
    /// in NDC. The bottom row copies -z into w, so the perspective divide is
    /// by the view-space depth. Z is remapped to the usual non-linear
    /// [-1, 1] depth between the near and far planes.
    pub fn film_gate_perspective(
        focal_length_mm: f32,
        aperture_width_mm: f32,
        aperture_height_mm: f32,
        near: f32,
        far: f32,
    ) -> Matrix4<f32> {
        let zoom_x = focal_length_mm / (aperture_width_mm / 2.0);
        let zoom_y = focal_length_mm / (aperture_height_mm / 2.0);
        let zz = -(far + near) / (far - near);
        let zw = -2.0 * far * near / (far - near);

        Matrix4::new(
            zoom_x, 0.0,    0.0, 0.0,
            0.0,    zoom_y, 0.0, 0.0,
            0.0,    0.0,    zz,  zw,
            0.0,    0.0,   -1.0, 0.0,
        )
    }

    /// Creates the orbit view matrix: rotate about Y by the horizontal angle,
    /// then about X by the vertical angle, then back the camera away from the
    /// target along Z. The composition order is fixed; changing it changes
    /// the orbit semantics.
    pub fn orbit_view(horizontal: f32, vertical: f32, distance: f32) -> Matrix4<f32> {
        Self::translation(&Vector3::new(0.0, 0.0, -distance))
            * Self::rotation_x(vertical)
            * Self::rotation_y(horizontal)
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs perspective division: Clip Space -> NDC.
///
/// A point with w near zero sits on the camera plane; it is mapped to the
/// NDC origin instead of diverging. Degenerate-case guard, not clipping.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Point3<f32> {
    let w = clip.w;
    if w.abs() > 1e-6 {
        Point3::new(clip.x / w, clip.y / w, clip.z / w)
    } else {
        Point3::origin()
    }
}

/// Converts NDC coordinates to Screen coordinates (Viewport Transform).
/// Note: Y-axis is flipped (NDC +Y is up, Screen +Y is down).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new(
        (ndc_x + 1.0) * 0.5 * width,
        (1.0 - (ndc_y + 1.0) * 0.5) * height,
    )
}

/// Projects a world-space point into raster space.
///
/// The returned x/y are pixel coordinates; z is the view-space depth
/// (-z in camera space), which the rasterizer needs for the depth test and
/// perspective-correct interpolation.
pub fn vertex_to_raster(
    world: &Point3<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
    width: f32,
    height: f32,
) -> Point3<f32> {
    let cam = view.transform_point(world);
    let clip = projection * cam.to_homogeneous();
    let ndc = apply_perspective_division(&clip);
    let screen = ndc_to_screen(ndc.x, ndc.y, width, height);

    Point3::new(screen.x, screen.y, -cam.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    #[test]
    fn rotation_y_quarter_turn() {
        let m = TransformFactory::rotation_y(FRAC_PI_2);
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(p.x.abs() < EPS);
        assert!((p.z - (-1.0)).abs() < EPS);
    }

    #[test]
    fn orbit_view_backs_away_from_target() {
        // With zero angles the target ends up straight ahead of the camera.
        let view = TransformFactory::orbit_view(0.0, 0.0, 5.0);
        let p = view.transform_point(&Point3::origin());
        assert!(p.x.abs() < EPS);
        assert!(p.y.abs() < EPS);
        assert!((p.z - (-5.0)).abs() < EPS);
    }

    #[test]
    fn orbit_view_rotates_before_translating() {
        // A point off to the side of the target swings around the target,
        // not around the camera.
        let view = TransformFactory::orbit_view(FRAC_PI_2, 0.0, 5.0);
        let p = view.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(p.x.abs() < EPS);
        assert!((p.z - (-4.0)).abs() < EPS);
    }

    #[test]
    fn ndc_to_screen_flips_y() {
        let top_left = ndc_to_screen(-1.0, 1.0, 640.0, 480.0);
        assert!(top_left.x.abs() < EPS);
        assert!(top_left.y.abs() < EPS);

        let bottom_right = ndc_to_screen(1.0, -1.0, 640.0, 480.0);
        assert!((bottom_right.x - 640.0).abs() < EPS);
        assert!((bottom_right.y - 480.0).abs() < EPS);

        let center = ndc_to_screen(0.0, 0.0, 640.0, 480.0);
        assert!((center.x - 320.0).abs() < EPS);
        assert!((center.y - 240.0).abs() < EPS);
    }

    #[test]
    fn perspective_division_guards_camera_plane() {
        let on_plane = Vector4::new(2.0, -3.0, 0.5, 0.0);
        let ndc = apply_perspective_division(&on_plane);
        assert_eq!(ndc, Point3::origin());
    }

    #[test]
    fn vertex_to_raster_carries_view_depth() {
        let view = TransformFactory::orbit_view(0.0, 0.0, 10.0);
        let projection = TransformFactory::film_gate_perspective(35.0, 50.673, 38.1, 0.1, 100.0);
        let raster = vertex_to_raster(&Point3::origin(), &view, &projection, 640.0, 480.0);

        // The orbit target sits dead center, 10 units in front of the camera.
        assert!((raster.x - 320.0).abs() < EPS);
        assert!((raster.y - 240.0).abs() < EPS);
        assert!((raster.z - 10.0).abs() < EPS);
    }
}
