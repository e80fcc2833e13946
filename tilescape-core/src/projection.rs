/// Perspective camera and viewport tracking
use nalgebra::{Matrix4, Point3, Vector3};

/// A point after projection: pixel coordinates plus NDC depth in `[-1, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

/// Perspective camera for the tile scene
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    /// Vertical field of view in radians.
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    viewport: (u32, u32),
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 1.5),
            target: Point3::origin(),
            // z-up scene; orbit controls rotate around this axis
            up: Vector3::new(0.0, 0.0, 1.0),
            fov: 75f64.to_radians(),
            aspect: aspect_ratio(width, height),
            near: 0.001,
            far: 1000.0,
            viewport: (width, height),
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Follow the host surface size. Returns `true` if the projection changed.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if self.viewport == (width, height) {
            return false;
        }
        self.viewport = (width, height);
        self.aspect = aspect_ratio(width, height);
        true
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a scene-space point into the current viewport.
    ///
    /// `view_projection` is passed in so callers can compute it once per frame.
    /// Returns `None` for points behind the camera or outside the depth range.
    pub fn project_to_screen(
        &self,
        view_projection: &Matrix4<f64>,
        point: &Point3<f64>,
    ) -> Option<ScreenPoint> {
        let clip = view_projection * point.to_homogeneous();

        // Behind the eye or on the camera plane
        if clip.w <= 1e-12 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        let (width, height) = self.viewport;
        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width as f64,
            y: (1.0 - ndc.y) * 0.5 * height as f64,
            depth: ndc.z,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

fn aspect_ratio(width: u32, height: u32) -> f64 {
    width.max(1) as f64 / height.max(1) as f64
}
