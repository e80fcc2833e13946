/// Orbit, pan and zoom camera controls
use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Point3, Rotation3, Unit, Vector3};

use crate::projection::Camera;

/// Keeps the view direction off the up axis
const EPS: f64 = 1e-6;

/// Orbit controller around a target point.
///
/// The camera offset is kept in spherical coordinates about the camera's up
/// axis: `radius`, azimuth `theta`, and polar angle `phi` measured from up.
/// Input methods accumulate; [`update`](Self::update) writes the result into
/// the camera and reports whether it moved.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f64>,
    pub min_distance: f64,
    pub max_distance: f64,
    radius: f64,
    theta: f64,
    phi: f64,
    /// Maps the up axis onto +z so the spherical math can assume z-up.
    to_z_up: Rotation3<f64>,
}

impl OrbitControls {
    pub fn new(camera: &Camera) -> Self {
        let to_z_up = Rotation3::rotation_between(&camera.up, &Vector3::z())
            .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI));

        let offset = to_z_up * (camera.position - camera.target);
        let radius = offset.norm();
        // Straight above the target: approach from -y so +x reads left to right.
        let theta = if offset.x == 0.0 && offset.y == 0.0 {
            -FRAC_PI_2
        } else {
            offset.y.atan2(offset.x)
        };
        let phi = if radius > 0.0 {
            (offset.z / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        Self {
            target: camera.target,
            min_distance: 0.0,
            max_distance: f64::INFINITY,
            radius,
            theta,
            phi,
            to_z_up,
        }
    }

    pub fn distance(&self) -> f64 {
        self.radius
    }

    /// Orbit by azimuth and polar deltas (radians)
    pub fn rotate(&mut self, d_theta: f64, d_phi: f64) {
        self.theta += d_theta;
        self.phi += d_phi;
    }

    /// Scale the distance to the target; `factor < 1` zooms in
    pub fn dolly(&mut self, factor: f64) {
        if factor > 0.0 {
            self.radius *= factor;
        }
    }

    /// Slide camera and target along the view plane.
    ///
    /// `dx`/`dy` are fractions of the current distance, so panning feels the
    /// same at any zoom level.
    pub fn pan(&mut self, camera: &Camera, dx: f64, dy: f64) {
        let forward = (camera.target - camera.position).normalize();
        let right = forward.cross(&camera.up);
        if right.norm() < 1e-12 {
            return;
        }
        let right = right.normalize();
        let up = right.cross(&forward);

        self.target += (right * dx + up * dy) * self.radius;
    }

    /// Apply pending input to `camera`. Returns `true` if the camera changed.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        self.phi = self.phi.clamp(EPS, PI - EPS);
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);

        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let offset = Vector3::new(
            self.radius * sin_phi * cos_theta,
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
        );

        let position = self.target + self.to_z_up.inverse() * offset;
        let changed = (position - camera.position).norm() > 1e-12
            || (self.target - camera.target).norm() > 1e-12;

        camera.position = position;
        camera.target = self.target;
        changed
    }

    /// Orbit axis in scene space
    pub fn up_axis(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.to_z_up.inverse() * Vector3::z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Camera, OrbitControls) {
        let mut camera = Camera::new(80, 40);
        let mut controls = OrbitControls::new(&camera);
        controls.update(&mut camera);
        (camera, controls)
    }

    #[test]
    fn test_first_update_moves_off_the_pole() {
        let (camera, controls) = setup();
        // Straight above the target the polar angle is clamped to EPS.
        assert!(camera.position.y < 0.0);
        assert!(camera.position.x.abs() < 1e-12);
        assert!((controls.distance() - 1.5).abs() < 1e-9);
        assert!((camera.position.z - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_update_without_input_reports_no_change() {
        let (mut camera, mut controls) = setup();
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn test_rotate_keeps_distance() {
        let (mut camera, mut controls) = setup();
        controls.rotate(0.7, 0.4);
        assert!(controls.update(&mut camera));
        assert!(((camera.position - camera.target).norm() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let (mut camera, mut controls) = setup();
        controls.rotate(0.0, 10.0);
        controls.update(&mut camera);
        // Just above the bottom pole, never through it.
        assert!(camera.position.z < -1.49);
        assert!(camera.position.x.abs() > 0.0 || camera.position.y.abs() > 0.0);
    }

    #[test]
    fn test_dolly_respects_limits() {
        let (mut camera, mut controls) = setup();
        controls.min_distance = 1.0;
        controls.dolly(0.1);
        controls.update(&mut camera);
        assert!((controls.distance() - 1.0).abs() < 1e-12);

        controls.dolly(-3.0);
        assert!((controls.distance() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let (mut camera, mut controls) = setup();
        controls.rotate(0.0, 0.5);
        controls.update(&mut camera);
        let before = camera.position - camera.target;

        controls.pan(&camera, 0.2, 0.0);
        assert!(controls.update(&mut camera));

        assert!(camera.target != Point3::origin());
        assert!(((camera.position - camera.target) - before).norm() < 1e-9);
    }

    #[test]
    fn test_up_axis_matches_camera() {
        let (camera, controls) = setup();
        assert!((controls.up_axis().into_inner() - camera.up).norm() < 1e-12);
    }
}
