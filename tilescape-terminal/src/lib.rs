/// Terminal front-end for the tile scene
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::debug;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tilescape_core::{Camera, OrbitControls, RedrawRequest, Scene, SceneAssembler};

pub mod renderer;
pub mod stats;

pub use renderer::TileRenderer;
pub use stats::RenderStats;

/// How long to wait for input before checking on image loads
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Radians of orbit per key press
const KEY_ROTATE: f64 = 0.1;
/// Radians of orbit per dragged cell
const DRAG_ROTATE: f64 = 0.05;
/// Pan per key press or dragged cell, as a fraction of the camera distance
const PAN_STEP: f64 = 0.05;
const ZOOM_STEP: f64 = 1.1;

/// Framebuffer size for a terminal of `cols x rows`: the top row holds the
/// stats overlay and every other row carries two pixels.
pub fn framebuffer_size(cols: u16, rows: u16) -> (usize, usize) {
    (cols as usize, rows.saturating_sub(1) as usize * 2)
}

/// Undo the screen setup of [`TerminalApp::run`].
///
/// Both steps always run; the first error is returned.
fn restore_terminal<W: Write>(
    out: &mut W,
    disable_raw_mode: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
    raw.and(screen)
}

/// Main application struct for terminal tile rendering
pub struct TerminalApp {
    scene: Scene,
    assembler: Option<SceneAssembler>,
    camera: Camera,
    controls: OrbitControls,
    renderer: TileRenderer,
    redraw: RedrawRequest,
    stats: RenderStats,
    running: bool,
    drag: Option<(MouseButton, u16, u16)>,
}

impl TerminalApp {
    /// `assembler` keeps feeding tiles into `scene` while the app runs
    pub fn new(scene: Scene, assembler: Option<SceneAssembler>) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_size(scene, assembler, cols, rows))
    }

    fn with_size(scene: Scene, assembler: Option<SceneAssembler>, cols: u16, rows: u16) -> Self {
        let (width, height) = framebuffer_size(cols, rows);
        let mut camera = Camera::new(width as u32, height as u32);
        let mut controls = OrbitControls::new(&camera);
        controls.update(&mut camera);

        let mut redraw = RedrawRequest::default();
        redraw.request(); // first frame

        Self {
            scene,
            assembler,
            camera,
            controls,
            renderer: TileRenderer::new(width, height),
            redraw,
            stats: RenderStats::default(),
            running: true,
            drag: None,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();
        let cleanup = restore_terminal(&mut stdout(), terminal::disable_raw_mode);

        result.and(cleanup)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            // Handle input
            if event::poll(POLL_INTERVAL)? {
                self.handle_event(event::read()?);
                while self.running && event::poll(Duration::ZERO)? {
                    self.handle_event(event::read()?);
                }
            }

            self.update();

            if self.redraw.take() {
                self.render()?;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(..) => self.redraw.request(),
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, modifiers, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }

        let pan = modifiers.contains(KeyModifiers::SHIFT);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Up if pan => self.controls.pan(&self.camera, 0.0, PAN_STEP),
            KeyCode::Down if pan => self.controls.pan(&self.camera, 0.0, -PAN_STEP),
            KeyCode::Left if pan => self.controls.pan(&self.camera, -PAN_STEP, 0.0),
            KeyCode::Right if pan => self.controls.pan(&self.camera, PAN_STEP, 0.0),
            KeyCode::Char('w') | KeyCode::Up => self.controls.rotate(0.0, -KEY_ROTATE),
            KeyCode::Char('s') | KeyCode::Down => self.controls.rotate(0.0, KEY_ROTATE),
            KeyCode::Char('a') | KeyCode::Left => self.controls.rotate(-KEY_ROTATE, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.controls.rotate(KEY_ROTATE, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.controls.dolly(1.0 / ZOOM_STEP),
            KeyCode::Char('-') => self.controls.dolly(ZOOM_STEP),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, MouseEvent { kind, column, row, .. }: MouseEvent) {
        match kind {
            MouseEventKind::Down(button) => self.drag = Some((button, column, row)),
            MouseEventKind::Up(_) => self.drag = None,
            MouseEventKind::Drag(button) => {
                let Some((_, last_col, last_row)) = self.drag else {
                    self.drag = Some((button, column, row));
                    return;
                };
                let dx = column as f64 - last_col as f64;
                let dy = row as f64 - last_row as f64;

                match button {
                    MouseButton::Left => self.controls.rotate(-dx * DRAG_ROTATE, -dy * DRAG_ROTATE),
                    _ => self.controls.pan(&self.camera, -dx * PAN_STEP, dy * PAN_STEP),
                }
                self.drag = Some((button, column, row));
            }
            MouseEventKind::ScrollUp => self.controls.dolly(1.0 / ZOOM_STEP),
            MouseEventKind::ScrollDown => self.controls.dolly(ZOOM_STEP),
            _ => {}
        }
    }

    /// Fold in finished loads and camera input; both request a redraw on change
    fn update(&mut self) {
        if let Some(assembler) = self.assembler.as_mut() {
            assembler.poll(&mut self.scene, &mut self.redraw);
        }

        if self.controls.update(&mut self.camera) {
            self.redraw.request();
        }
    }

    /// Match the framebuffer and camera to the terminal's current size
    fn sync_viewport(&mut self, cols: u16, rows: u16) {
        let (width, height) = framebuffer_size(cols, rows);
        if self.renderer.resize(width, height) {
            debug!("viewport resized to {}x{}", width, height);
        }
        self.camera.set_viewport(width as u32, height as u32);
    }

    fn render(&mut self) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        self.sync_viewport(cols, rows);

        let start = Instant::now();
        self.renderer.clear();
        self.renderer.render_scene(&self.scene, &self.camera);

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout, 1)?;
        self.stats.record(start.elapsed());

        // Draw UI overlay
        let pending = self.assembler.as_ref().map_or(0, SceneAssembler::pending);
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.stats.overlay(self.scene.tile_count(), pending, cols as usize)),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
