/// Pixel-to-geometry conversion for image tiles
use nalgebra::Point3;

use crate::geometry::TileMesh;
use crate::pixels::PixelBuffer;
use crate::shading::Material;
use crate::transform::Placement;

/// Grid pitch: one pixel spans this many scene units before scaling
pub const PIXEL_SIZE: f64 = 0.001;

/// Height of a pure white pixel
pub const MAX_THICKNESS: f64 = 0.01;

/// Extrusion height for a pixel: normalized `r + g + b` times the max thickness
pub fn intensity(rgba: [u8; 4]) -> f64 {
    let [r, g, b, _] = rgba;
    let sum = r as f64 + g as f64 + b as f64;
    sum / (255.0 * 3.0) * MAX_THICKNESS
}

/// Turn every pixel into one flat right triangle raised by its intensity.
///
/// The triangle's legs run along +x and +y from the pixel's grid corner; the
/// opposite diagonal is left open, so a tile is not a closed quad surface.
pub fn build(pixels: &PixelBuffer, placement: &Placement) -> TileMesh {
    build_with_material(pixels, placement, Material::default())
}

/// Same as [`build`] with an explicit material
pub fn build_with_material(
    pixels: &PixelBuffer,
    placement: &Placement,
    material: Material,
) -> TileMesh {
    let transform = placement.transformer();
    let mut mesh = TileMesh::with_capacity(pixels.pixel_count(), *placement);
    mesh.material = material;

    for (x, y, rgba) in pixels.walk() {
        let z = intensity(rgba);
        let x0 = x as f64 / 1000.0;
        let y0 = y as f64 / 1000.0;

        mesh.add_triangle(
            [
                transform.apply(Point3::new(x0, y0, z)),
                transform.apply(Point3::new(x0 + PIXEL_SIZE, y0, z)),
                transform.apply(Point3::new(x0, y0 + PIXEL_SIZE, z)),
            ],
            rgba,
        );
    }

    mesh
}
