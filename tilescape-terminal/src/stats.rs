/// Render timing for the overlay line
use std::time::Duration;

/// Milliseconds spent in the last render, like a frame-time panel
#[derive(Debug, Default, Clone)]
pub struct RenderStats {
    last_ms: f64,
    frames: u64,
}

impl RenderStats {
    pub fn record(&mut self, elapsed: Duration) {
        self.last_ms = elapsed.as_secs_f64() * 1000.0;
        self.frames += 1;
    }

    pub fn last_ms(&self) -> f64 {
        self.last_ms
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Overlay text, cut to fit `width` columns
    pub fn overlay(&self, tiles: usize, pending: usize, width: usize) -> String {
        let mut text = format!(
            "{:.1} ms | tiles: {} | loading: {} | drag/arrows=orbit  right-drag/shift+arrows=pan  wheel/+/-=zoom  q=quit",
            self.last_ms, tiles, pending
        );
        if let Some((cut, _)) = text.char_indices().nth(width) {
            text.truncate(cut);
        }
        text
    }
}
