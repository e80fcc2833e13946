/// Tile material and per-fragment colour shading
use nalgebra::Point3;

/// Time-driven colour perturbation: `(rgba, position, time) -> rgba`
pub type ColorAnimation = fn([f32; 4], &Point3<f64>, f64) -> [f32; 4];

/// Fragment stage configuration.
///
/// With no animation the byte colour is normalized and passed through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    pub time: f64,
    pub animation: Option<ColorAnimation>,
}

impl Shading {
    pub fn animated(animation: ColorAnimation) -> Self {
        Self {
            time: 1.0,
            animation: Some(animation),
        }
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Colour of a fragment at `position`, channels in `[0, 1]`
    pub fn shade(&self, color: [u8; 4], position: &Point3<f64>) -> [f32; 4] {
        let rgba = normalize(color);
        match self.animation {
            Some(animate) => animate(rgba, position, self.time).map(|c| c.clamp(0.0, 1.0)),
            None => rgba,
        }
    }
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            time: 1.0,
            animation: None,
        }
    }
}

/// Render state for a tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Draw both faces; no back-face culling.
    pub double_sided: bool,
    /// Blend with what is already drawn using the vertex alpha.
    pub transparent: bool,
    pub shading: Shading,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            double_sided: true,
            transparent: true,
            shading: Shading::default(),
        }
    }
}

/// Map byte channels onto `[0, 1]`
pub fn normalize(color: [u8; 4]) -> [f32; 4] {
    color.map(|c| c as f32 / 255.0)
}

/// Ripple the red channel along x: `r += sin(x * 10 + time) * 0.5`
pub fn wave_red(mut rgba: [f32; 4], position: &Point3<f64>, time: f64) -> [f32; 4] {
    rgba[0] += ((position.x * 10.0 + time).sin() * 0.5) as f32;
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_passes_color_through() {
        let shading = Shading::default();
        let out = shading.shade([255, 0, 51, 255], &Point3::new(0.3, 0.0, 0.0));
        assert_eq!(out, [1.0, 0.0, 0.2, 1.0]);
    }

    #[test]
    fn test_time_alone_changes_nothing() {
        let mut shading = Shading::default();
        let p = Point3::new(0.5, 0.5, 0.0);
        let before = shading.shade([10, 20, 30, 40], &p);
        shading.set_time(42.0);
        assert_eq!(shading.shade([10, 20, 30, 40], &p), before);
    }

    #[test]
    fn test_wave_red_perturbs_red_only() {
        let mut shading = Shading::animated(wave_red);
        shading.set_time(std::f64::consts::FRAC_PI_2);
        // sin(0 * 10 + pi/2) = 1, so red gains 0.5.
        let out = shading.shade([0, 51, 0, 255], &Point3::origin());
        assert!((out[0] - 0.5).abs() < 1e-6);
        assert_eq!(&out[1..], &[0.2, 0.0, 1.0]);
    }

    #[test]
    fn test_animation_output_is_clamped() {
        let mut shading = Shading::animated(wave_red);
        shading.set_time(std::f64::consts::FRAC_PI_2);
        let out = shading.shade([255, 0, 0, 255], &Point3::origin());
        assert_eq!(out[0], 1.0);
    }

    #[test]
    fn test_default_material() {
        let material = Material::default();
        assert!(material.double_sided);
        assert!(material.transparent);
        assert!(material.shading.animation.is_none());
    }
}
