/// Geometry primitives for the tile scene
use nalgebra::Point3;

use crate::shading::Material;
use crate::transform::Placement;

/// One triangle of a tile with its flat colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f64>; 3],
    pub color: [u8; 4],
}

impl Triangle {
    pub fn new(vertices: [Point3<f64>; 3], color: [u8; 4]) -> Self {
        Self { vertices, color }
    }

    pub fn centroid(&self) -> Point3<f64> {
        let [a, b, c] = self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }
}

/// A tile's triangle soup with one colour per vertex.
///
/// `vertices` are in scene space: the placement has already been applied.
/// Both arrays always hold three entries per source pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMesh {
    pub vertices: Vec<Point3<f64>>,
    pub colors: Vec<[u8; 4]>,
    pub placement: Placement,
    pub material: Material,
}

impl TileMesh {
    pub fn with_capacity(triangles: usize, placement: Placement) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 3),
            colors: Vec::with_capacity(triangles * 3),
            placement,
            material: Material::default(),
        }
    }

    pub fn add_triangle(&mut self, vertices: [Point3<f64>; 3], color: [u8; 4]) {
        self.vertices.extend_from_slice(&vertices);
        self.colors.extend_from_slice(&[color; 3]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Regroup the vertex stream into triangles.
    ///
    /// All three vertices of a tile triangle share a colour, so the first one
    /// stands for the face.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.vertices
            .chunks_exact(3)
            .zip(self.colors.chunks_exact(3))
            .map(|(v, c)| Triangle::new([v[0], v[1], v[2]], c[0]))
    }
}

/// Unlit line segments drawn in a single colour
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegments {
    pub segments: Vec<[Point3<f64>; 2]>,
    pub color: [u8; 3],
}

impl LineSegments {
    pub fn new(color: [u8; 3]) -> Self {
        Self {
            segments: Vec::new(),
            color,
        }
    }

    pub fn add_segment(&mut self, from: Point3<f64>, to: Point3<f64>) {
        self.segments.push([from, to]);
    }

    /// The 12 edges of an axis-aligned cube centred at the origin
    pub fn box_edges(size: f64, color: [u8; 3]) -> Self {
        let half = size / 2.0;
        let corner = |x: f64, y: f64, z: f64| Point3::new(x * half, y * half, z * half);
        let mut lines = Self::new(color);

        for &z in &[-1.0, 1.0] {
            // Bottom and top rings
            lines.add_segment(corner(-1.0, -1.0, z), corner(1.0, -1.0, z));
            lines.add_segment(corner(1.0, -1.0, z), corner(1.0, 1.0, z));
            lines.add_segment(corner(1.0, 1.0, z), corner(-1.0, 1.0, z));
            lines.add_segment(corner(-1.0, 1.0, z), corner(-1.0, -1.0, z));
        }

        // Verticals
        for &(x, y) in &[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            lines.add_segment(corner(x, y, -1.0), corner(x, y, 1.0));
        }

        lines
    }

    /// Red, green and blue unit markers along +x, +y and +z
    pub fn axes(length: f64) -> [Self; 3] {
        let origin = Point3::origin();
        let axis = |tip: Point3<f64>, color: [u8; 3]| {
            let mut lines = Self::new(color);
            lines.add_segment(origin, tip);
            lines
        };

        [
            axis(Point3::new(length, 0.0, 0.0), [255, 0, 0]),
            axis(Point3::new(0.0, length, 0.0), [0, 255, 0]),
            axis(Point3::new(0.0, 0.0, length), [0, 0, 255]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_triangle_repeats_color() {
        let mut mesh = TileMesh::with_capacity(1, Placement::default());
        let v = [Point3::origin(); 3];
        mesh.add_triangle(v, [1, 2, 3, 4]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.colors, vec![[1, 2, 3, 4]; 3]);
        assert_eq!(mesh.triangles().count(), 1);
    }

    #[test]
    fn test_triangle_centroid() {
        let tri = Triangle::new(
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
                Point3::new(0.0, 3.0, 3.0),
            ],
            [0; 4],
        );
        assert_eq!(tri.centroid(), Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_box_edges() {
        let edges = LineSegments::box_edges(1.0, [0xcc, 0xcc, 0xcc]);
        assert_eq!(edges.segments.len(), 12);
        for [a, b] in &edges.segments {
            // Every edge has unit length and stays on the box surface.
            assert!(((a - b).norm() - 1.0).abs() < 1e-12);
            for p in [a, b] {
                assert!(p.coords.iter().all(|c| c.abs() == 0.5));
            }
        }
    }

    #[test]
    fn test_axes_colors() {
        let [x, y, z] = LineSegments::axes(1.0);
        assert_eq!(x.color, [255, 0, 0]);
        assert_eq!(y.segments[0][1], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(z.segments[0][0], Point3::origin());
    }
}
