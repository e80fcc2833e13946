/// Tilescape Terminal - image tiles as 3D geometry
///
/// Loads the built-in tile table, extrudes every image into a tile mesh and
/// renders the scene in the terminal. Images that fail to load are logged and
/// left out.
/// Controls:
///   - Left drag / WASD / Arrow Keys: Orbit
///   - Right drag / Shift+Arrows: Pan
///   - Mouse wheel / +/-: Zoom
///   - Q/ESC: Quit

use anyhow::Context;
use log::info;
use std::fs::File;
use std::path::PathBuf;
use tilescape_core::{default_table, Scene, SceneAssembler};
use tilescape_terminal::TerminalApp;

fn main() -> anyhow::Result<()> {
    // stdout is the framebuffer, so logs go to a file
    let log_path = init_logging()?;

    let table = default_table();
    info!("loading {} tiles", table.len());
    let assembler = SceneAssembler::start(&table);

    let mut app = TerminalApp::new(Scene::with_helpers(), Some(assembler))
        .context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    println!("Log written to {}", log_path.display());
    Ok(())
}

fn init_logging() -> anyhow::Result<PathBuf> {
    let path = std::env::temp_dir().join("tilescape.log");
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(path)
}
