/// Tilescape Web - WASM bindings for the tile mesh builder
///
/// The browser host decodes images and owns the WebGL scene; this module turns
/// decoded RGBA pixels into flat vertex and colour arrays ready for a buffer
/// geometry (positions as xyz triples, colours as normalized rgba bytes).

use nalgebra::Vector3;
use tilescape_core::{tile, EulerXyz, PixelBuffer, Placement, TileMesh};
use wasm_bindgen::prelude::*;

/// A built tile, flattened for GPU upload
#[wasm_bindgen]
pub struct WebTileMesh {
    positions: Vec<f32>,
    colors: Vec<u8>,
}

#[wasm_bindgen]
impl WebTileMesh {
    /// Vertex positions, three floats per vertex
    pub fn positions(&self) -> Vec<f32> {
        self.positions.clone()
    }

    /// Vertex colours, four bytes per vertex
    pub fn colors(&self) -> Vec<u8> {
        self.colors.clone()
    }

    #[wasm_bindgen(js_name = vertexCount)]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

impl From<&TileMesh> for WebTileMesh {
    fn from(mesh: &TileMesh) -> Self {
        Self {
            positions: mesh
                .vertices
                .iter()
                .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
                .collect(),
            colors: mesh.colors.iter().flatten().copied().collect(),
        }
    }
}

/// Build a tile from decoded RGBA pixels and a placement.
///
/// `position`, `rotation` (Euler XYZ radians) and `scale` must each hold three
/// numbers. Throws on a malformed pixel buffer or placement.
#[wasm_bindgen(js_name = buildTile)]
pub fn build_tile(
    width: u32,
    height: u32,
    data: Vec<u8>,
    position: &[f64],
    rotation: &[f64],
    scale: &[f64],
) -> Result<WebTileMesh, JsValue> {
    build_mesh(width, height, data, position, rotation, scale)
        .map(|mesh| WebTileMesh::from(&mesh))
        .map_err(|e| JsValue::from_str(&e))
}

fn build_mesh(
    width: u32,
    height: u32,
    data: Vec<u8>,
    position: &[f64],
    rotation: &[f64],
    scale: &[f64],
) -> Result<TileMesh, String> {
    let pixels = PixelBuffer::new(width, height, data).map_err(|e| e.to_string())?;
    let [px, py, pz] = triple("position", position)?;
    let [rx, ry, rz] = triple("rotation", rotation)?;
    let [sx, sy, sz] = triple("scale", scale)?;

    let placement = Placement::new(
        Vector3::new(px, py, pz),
        EulerXyz::new(rx, ry, rz),
        Vector3::new(sx, sy, sz),
    );
    Ok(tile::build(&pixels, &placement))
}

fn triple(name: &str, values: &[f64]) -> Result<[f64; 3], String> {
    <[f64; 3]>::try_from(values)
        .map_err(|_| format!("{name} needs 3 components, got {}", values.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: [f64; 3] = [0.0, 0.0, 0.0];
    const UNIT: [f64; 3] = [1.0, 1.0, 1.0];

    #[test]
    fn test_flattened_arrays() {
        let mesh = build_mesh(1, 1, vec![255, 255, 255, 255], &ORIGIN, &ORIGIN, &UNIT).unwrap();
        let web = WebTileMesh::from(&mesh);

        assert_eq!(web.vertex_count(), 3);
        assert_eq!(
            web.positions(),
            vec![0.0, 0.0, 0.01, 0.001, 0.0, 0.01, 0.0, 0.001, 0.01]
        );
        assert_eq!(web.colors(), vec![255; 12]);
    }

    #[test]
    fn test_placement_is_applied() {
        let mesh = build_mesh(1, 1, vec![0; 4], &[2.0, 0.0, 0.0], &ORIGIN, &UNIT).unwrap();
        assert_eq!(mesh.vertices[0].x, 2.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(build_mesh(2, 2, vec![0; 4], &ORIGIN, &ORIGIN, &UNIT)
            .unwrap_err()
            .contains("does not match"));
        assert_eq!(
            build_mesh(1, 1, vec![0; 4], &[1.0, 2.0], &ORIGIN, &UNIT).unwrap_err(),
            "position needs 3 components, got 2"
        );
    }

    #[test]
    fn test_rejects_overflowing_dimensions() {
        let err = build_mesh(u32::MAX, u32::MAX, Vec::new(), &ORIGIN, &ORIGIN, &UNIT).unwrap_err();
        assert!(err.contains("does not fit"));
    }

    #[test]
    fn test_empty_image() {
        let mesh = build_mesh(0, 0, Vec::new(), &ORIGIN, &ORIGIN, &UNIT).unwrap();
        assert_eq!(WebTileMesh::from(&mesh).vertex_count(), 0);
    }
}
