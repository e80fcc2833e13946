/// Truecolor rasterizer for terminal rendering
///
/// Each terminal cell shows two framebuffer pixels: the upper half block is
/// drawn in the top pixel's colour over a background of the bottom pixel's.
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Matrix4;
use std::io::Write;
use tilescape_core::{Camera, LineSegments, Scene, SceneObject, ScreenPoint, TileMesh};

const HALF_BLOCK: char = '\u{2580}';

/// Clear colour
const BACKGROUND: [f32; 3] = [0.0, 0.0, 0.0];

/// Framebuffer renderer that draws a tile scene into terminal cells
pub struct TileRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    color_buffer: Vec<[f32; 3]>,
}

impl TileRenderer {
    /// `height` is in framebuffer pixels, two per terminal row
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            color_buffer: vec![BACKGROUND; size],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Reallocate for a new surface size. Returns `false` if nothing changed.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if (width, height) == (self.width, self.height) {
            return false;
        }
        *self = Self::new(width, height);
        true
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.color_buffer.fill(BACKGROUND);
    }

    /// Colour of one framebuffer pixel, channels in `[0, 1]`
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        self.color_buffer[y * self.width + x]
    }

    pub fn render_scene(&mut self, scene: &Scene, camera: &Camera) {
        let view_projection = camera.view_projection();
        for object in scene.objects() {
            match object {
                SceneObject::Lines(lines) => self.render_lines(lines, camera, &view_projection),
                SceneObject::Tile(tile) => self.render_tile(tile, camera, &view_projection),
            }
        }
    }

    fn render_lines(&mut self, lines: &LineSegments, camera: &Camera, vp: &Matrix4<f64>) {
        let color = lines.color.map(|c| c as f32 / 255.0);
        let rgba = [color[0], color[1], color[2], 1.0];

        for [from, to] in &lines.segments {
            let (Some(a), Some(b)) = (
                camera.project_to_screen(vp, from),
                camera.project_to_screen(vp, to),
            ) else {
                continue; // Segment is clipped
            };

            let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
            for i in 0..=steps {
                let t = i as f64 / steps as f64;
                let x = a.x + (b.x - a.x) * t;
                let y = a.y + (b.y - a.y) * t;
                let depth = a.depth + (b.depth - a.depth) * t;
                self.plot(x.floor() as i64, y.floor() as i64, depth, rgba);
            }
        }
    }

    fn render_tile(&mut self, tile: &TileMesh, camera: &Camera, vp: &Matrix4<f64>) {
        let material = &tile.material;
        let placement = tile.placement.transformer();

        for triangle in tile.triangles() {
            // Project vertices to screen space
            let mut screen = [ScreenPoint {
                x: 0.0,
                y: 0.0,
                depth: 0.0,
            }; 3];
            let mut clipped = false;
            for (slot, vertex) in screen.iter_mut().zip(&triangle.vertices) {
                match camera.project_to_screen(vp, vertex) {
                    Some(point) => *slot = point,
                    None => clipped = true,
                }
            }
            if clipped {
                continue;
            }

            // Front faces wind clockwise once y points down.
            if !material.double_sided && signed_area(&screen) > 0.0 {
                continue;
            }

            let local = placement.to_local(triangle.centroid());
            let mut rgba = material.shading.shade(triangle.color, &local);
            if !material.transparent {
                rgba[3] = 1.0;
            }

            self.rasterize_triangle(&screen, rgba);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint; 3], rgba: [f32; 4]) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x);
        let max_x = v0.x.max(v1.x).max(v2.x);
        let min_y = v0.y.min(v1.y).min(v2.y);
        let max_y = v0.y.max(v1.y).max(v2.y);

        // Smaller than a pixel: no pixel centre would land inside, so splat it.
        if max_x - min_x < 1.0 && max_y - min_y < 1.0 {
            let cx = (v0.x + v1.x + v2.x) / 3.0;
            let cy = (v0.y + v1.y + v2.y) / 3.0;
            let depth = (v0.depth + v1.depth + v2.depth) / 3.0;
            self.plot(cx.floor() as i64, cy.floor() as i64, depth, rgba);
            return;
        }

        // Clip to screen bounds
        let min_x = (min_x.floor() as i64).max(0);
        let max_x = (max_x.ceil() as i64).min(self.width as i64 - 1);
        let min_y = (min_y.floor() as i64).max(0);
        let max_y = (max_y.ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                        self.plot(x, y, depth, rgba);
                    }
                }
            }
        }
    }

    /// Depth-tested, alpha-blended write of one pixel
    fn plot(&mut self, x: i64, y: i64, depth: f64, rgba: [f32; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }

        let idx = y as usize * self.width + x as usize;
        if depth >= self.depth_buffer[idx] {
            return;
        }

        let alpha = rgba[3].clamp(0.0, 1.0);
        if alpha == 0.0 {
            return;
        }

        let dst = &mut self.color_buffer[idx];
        for (d, s) in dst.iter_mut().zip(&rgba[..3]) {
            *d = s * alpha + *d * (1.0 - alpha);
        }
        self.depth_buffer[idx] = depth;
    }

    /// Queue the framebuffer as half-block cells starting at terminal row `top`
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        for row in 0..self.height / 2 {
            writer.queue(cursor::MoveTo(0, top + row as u16))?;

            let mut last: Option<(Color, Color)> = None;
            for x in 0..self.width {
                let fg = to_color(self.pixel(x, row * 2));
                let bg = to_color(self.pixel(x, row * 2 + 1));

                if last != Some((fg, bg)) {
                    writer.queue(SetForegroundColor(fg))?;
                    writer.queue(SetBackgroundColor(bg))?;
                    last = Some((fg, bg));
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_color(rgb: [f32; 3]) -> Color {
    let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color::Rgb { r, g, b }
}

/// Twice the signed screen-space area of a triangle
fn signed_area(v: &[ScreenPoint; 3]) -> f64 {
    (v[1].x - v[0].x) * (v[2].y - v[0].y) - (v[1].y - v[0].y) * (v[2].x - v[0].x)
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
