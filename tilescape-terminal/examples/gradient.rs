/// Example: Render a generated gradient tile without any image files
///
/// Usage: cargo run --example gradient

use std::io;
use tilescape_core::{tile, PixelBuffer, Placement, Scene, SceneObject};
use tilescape_terminal::TerminalApp;

const SIZE: u32 = 64;

fn main() -> io::Result<()> {
    // Red rises to the right, green rises upward, alpha fades in from the left
    let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for row in 0..SIZE {
        for col in 0..SIZE {
            let r = (col * 255 / (SIZE - 1)) as u8;
            let g = ((SIZE - 1 - row) * 255 / (SIZE - 1)) as u8;
            data.extend_from_slice(&[r, g, 96, r.max(64)]);
        }
    }
    let pixels = PixelBuffer::new(SIZE, SIZE, data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let placement = Placement::default()
        .with_position(-0.5, -0.5, 0.0)
        .with_scale(1000.0 / SIZE as f64, 1000.0 / SIZE as f64, 20.0);

    let mut scene = Scene::with_helpers();
    scene.add(SceneObject::Tile(tile::build(&pixels, &placement)));

    let mut app = TerminalApp::new(scene, None)?;
    app.run()
}
