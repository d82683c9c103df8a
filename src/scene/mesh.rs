use nalgebra::{Point3, Vector3};

/// Default channel value for vertices without an imported color: opaque white.
pub const DEFAULT_VERTEX_COLOR: f32 = 255.0;

/// A triangle mesh stored as flat arrays.
///
/// `positions` holds x,y,z triples (stride 3), `triangles` holds three
/// 0-based vertex indices per triangle, `vertex_colors` holds r,g,b triples
/// in 0..255 with the same vertex count as `positions`.
///
/// The invariants (array strides, color length, index range) are validated
/// by [`Mesh::new`]; everything downstream indexes without re-checking.
/// A mesh is immutable once constructed; loading a new model replaces the
/// active mesh wholesale.
#[derive(Debug)]
pub struct Mesh {
    pub positions: Vec<f32>,
    pub triangles: Vec<u32>,
    pub vertex_colors: Vec<f32>,
}

impl Mesh {
    /// Builds a mesh, validating the flat-array invariants.
    /// `vertex_colors: None` defaults every vertex to opaque white.
    pub fn new(
        positions: Vec<f32>,
        triangles: Vec<u32>,
        vertex_colors: Option<Vec<f32>>,
    ) -> Result<Self, String> {
        if positions.len() % 3 != 0 {
            return Err(format!(
                "vertex positions must come in x,y,z triples, got {} values",
                positions.len()
            ));
        }
        if triangles.len() % 3 != 0 {
            return Err(format!(
                "triangle indices must come in triples, got {} values",
                triangles.len()
            ));
        }

        let vertex_count = positions.len() / 3;
        if let Some(&bad) = triangles.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(format!(
                "triangle index {bad} out of range for {vertex_count} vertices"
            ));
        }

        let vertex_colors = match vertex_colors {
            Some(colors) => {
                if colors.len() != positions.len() {
                    return Err(format!(
                        "expected {} vertex color values, got {}",
                        positions.len(),
                        colors.len()
                    ));
                }
                colors
            }
            None => vec![DEFAULT_VERTEX_COLOR; positions.len()],
        };

        Ok(Self {
            positions,
            triangles,
            vertex_colors,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// The three vertex positions of triangle `triangle`.
    pub fn triangle_positions(&self, triangle: usize) -> [Point3<f32>; 3] {
        [
            self.position_at(self.triangles[triangle * 3] as usize),
            self.position_at(self.triangles[triangle * 3 + 1] as usize),
            self.position_at(self.triangles[triangle * 3 + 2] as usize),
        ]
    }

    /// The three vertex colors of triangle `triangle`, channels in 0..255.
    pub fn triangle_colors(&self, triangle: usize) -> [Vector3<f32>; 3] {
        [
            self.color_at(self.triangles[triangle * 3] as usize),
            self.color_at(self.triangles[triangle * 3 + 1] as usize),
            self.color_at(self.triangles[triangle * 3 + 2] as usize),
        ]
    }

    fn position_at(&self, vertex: usize) -> Point3<f32> {
        Point3::new(
            self.positions[vertex * 3],
            self.positions[vertex * 3 + 1],
            self.positions[vertex * 3 + 2],
        )
    }

    fn color_at(&self, vertex: usize) -> Vector3<f32> {
        Vector3::new(
            self.vertex_colors[vertex * 3],
            self.vertex_colors[vertex * 3 + 1],
            self.vertex_colors[vertex * 3 + 2],
        )
    }

    /// A single counter-clockwise triangle with primary-colored corners,
    /// handy for tests and as a fallback scene.
    pub fn unit_triangle() -> Self {
        let positions = vec![
            0.0, 1.0, 0.0, // top
            -1.0, -1.0, 0.0, // bottom left
            1.0, -1.0, 0.0, // bottom right
        ];
        let triangles = vec![0, 1, 2];
        let vertex_colors = vec![
            255.0, 0.0, 0.0, //
            0.0, 255.0, 0.0, //
            0.0, 0.0, 255.0,
        ];

        Self::new(positions, triangles, Some(vertex_colors))
            .expect("unit triangle is well-formed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_colors_default_to_white() {
        let mesh = Mesh::new(vec![0.0; 9], vec![0, 1, 2], None).unwrap();
        assert_eq!(mesh.vertex_colors.len(), 9);
        for color in mesh.triangle_colors(0) {
            assert_eq!(color, Vector3::new(255.0, 255.0, 255.0));
        }
    }

    #[test]
    fn accessors_fetch_by_triangle_index() {
        let positions = vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, 1.0, 0.0,
        ];
        let triangles = vec![0, 1, 2, 2, 1, 3];
        let mesh = Mesh::new(positions, triangles, None).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);

        let [a, b, c] = mesh.triangle_positions(1);
        assert_eq!(a, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(b, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(c, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let result = Mesh::new(vec![0.0; 9], vec![0, 1, 3], None);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("out of range"));
    }

    #[test]
    fn ragged_arrays_are_rejected() {
        assert!(Mesh::new(vec![0.0; 8], vec![], None).is_err());
        assert!(Mesh::new(vec![0.0; 9], vec![0, 1], None).is_err());
        assert!(Mesh::new(vec![0.0; 9], vec![0, 1, 2], Some(vec![255.0; 6])).is_err());
    }
}
