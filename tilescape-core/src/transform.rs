/// Euler rotations and tile placements
use nalgebra::{Point3, Rotation3, Vector3};

/// Euler angles in radians, applied in XYZ order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerXyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerXyz {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Default for EulerXyz {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation for XYZ Euler angles: `Rx * Ry * Rz`
    pub fn rotation(euler: &EulerXyz) -> Rotation3<f64> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), euler.x);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), euler.y);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), euler.z);

        rx * ry * rz
    }
}

/// Where a tile sits in the scene.
///
/// Scale is baked into the geometry first, then the rotation and the
/// translation are applied as a static object transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Translation, defaults to the origin.
    pub position: Vector3<f64>,
    /// Euler XYZ rotation in radians, defaults to none.
    pub rotation: EulerXyz,
    /// Per-axis geometry scale, defaults to `(1, 1, 1)`.
    pub scale: Vector3<f64>,
}

impl Placement {
    pub fn new(position: Vector3<f64>, rotation: EulerXyz, scale: Vector3<f64>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, rotation: EulerXyz) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, sx: f64, sy: f64, sz: f64) -> Self {
        self.scale = Vector3::new(sx, sy, sz);
        self
    }

    /// Bind this placement to a reusable point transformer
    pub fn transformer(&self) -> PlacementTransform {
        PlacementTransform {
            scale: self.scale,
            rotation: Transform::rotation(&self.rotation),
            translation: self.position,
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: EulerXyz::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Precomputed placement, applied per vertex while building a tile
#[derive(Debug, Clone, Copy)]
pub struct PlacementTransform {
    scale: Vector3<f64>,
    rotation: Rotation3<f64>,
    translation: Vector3<f64>,
}

impl PlacementTransform {
    pub fn apply(&self, point: Point3<f64>) -> Point3<f64> {
        let scaled = Point3::from(point.coords.component_mul(&self.scale));
        self.rotation * scaled + self.translation
    }

    /// Undo translation and rotation, leaving the scaled tile-local position
    pub fn to_local(&self, point: Point3<f64>) -> Point3<f64> {
        self.rotation.inverse() * (point - self.translation)
    }
}
