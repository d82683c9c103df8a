use nalgebra::{Point2, Vector3};

/// Signed edge function for the directed edge (a -> b) and query point c.
///
/// This is twice the signed area of the triangle (a, b, c); its sign tells
/// which side of the edge the point lies on. Applied to a triangle's three
/// vertices it yields the triangle's doubled signed area, whose sign encodes
/// the winding.
#[inline]
pub fn edge_function(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// Reconstructs the view-space depth at a point inside a projected triangle.
///
/// Depth does not vary linearly across a projected triangle, but its
/// reciprocal does, so the barycentric blend runs over 1/z and the result is
/// inverted back. `weights` must be normalized barycentric weights; `depths`
/// are the three vertices' view-space depths.
///
/// Degenerate input (zero-area weights, camera-plane depths) propagates as a
/// non-finite result; callers reject those instead of shading.
#[inline]
pub fn perspective_correct_depth(weights: &Vector3<f32>, depths: &[f32; 3]) -> f32 {
    1.0 / (weights.x / depths[0] + weights.y / depths[1] + weights.z / depths[2])
}

/// Blends a per-vertex attribute with perspective correction.
///
/// Each attribute is divided by its vertex depth before the barycentric
/// blend, and the sum is re-multiplied by the reconstructed point depth.
#[inline]
pub fn perspective_correct_blend(
    weights: &Vector3<f32>,
    values: &[Vector3<f32>; 3],
    depths: &[f32; 3],
    point_depth: f32,
) -> Vector3<f32> {
    (values[0] * (weights.x / depths[0])
        + values[1] * (weights.y / depths[1])
        + values[2] * (weights.z / depths[2]))
        * point_depth
}
