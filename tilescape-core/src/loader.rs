/// Local image loading into RGBA pixel buffers
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;

use log::info;
use thiserror::Error;

use crate::pixels::PixelBuffer;

/// The only recoverable runtime error: an image that could not be turned into pixels
#[derive(Debug, Error)]
#[error("bad image uri: {uri} ({reason})")]
pub struct ImageLoadFailure {
    pub uri: String,
    pub reason: String,
}

impl ImageLoadFailure {
    fn new(uri: &str, reason: impl ToString) -> Self {
        Self {
            uri: uri.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result of one asynchronous load, tagged with the table index that asked for it
#[derive(Debug)]
pub struct LoadOutcome {
    pub index: usize,
    pub result: Result<PixelBuffer, ImageLoadFailure>,
}

/// Resolve a local image URI to a filesystem path.
///
/// Accepts bare paths and `file://` URIs. Other schemes are refused.
pub fn resolve_uri(uri: &str) -> Result<PathBuf, ImageLoadFailure> {
    if let Some(path) = uri.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }

    match uri.split_once("://") {
        Some((scheme, _)) => Err(ImageLoadFailure::new(
            uri,
            format!("unsupported scheme '{scheme}'"),
        )),
        None => Ok(PathBuf::from(uri)),
    }
}

/// Decode an encoded image held in memory
pub fn decode(uri: &str, bytes: &[u8]) -> Result<PixelBuffer, ImageLoadFailure> {
    let image = image::load_from_memory(bytes).map_err(|e| ImageLoadFailure::new(uri, e))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    PixelBuffer::new(width, height, rgba.into_raw()).map_err(|e| ImageLoadFailure::new(uri, e))
}

/// Read and decode an image, blocking the caller.
///
/// Every call goes back to the file; nothing is cached.
pub fn load(uri: &str) -> Result<PixelBuffer, ImageLoadFailure> {
    let path = resolve_uri(uri)?;
    let bytes = std::fs::read(&path).map_err(|e| ImageLoadFailure::new(uri, e))?;
    let pixels = decode(uri, &bytes)?;

    info!("got pixels {:?} from {}", pixels.shape(), uri);
    Ok(pixels)
}

/// Start loading `uri` in the background and post the outcome to `outcomes`.
///
/// Returns immediately. If the receiving side is gone the outcome is dropped.
pub fn spawn_load(index: usize, uri: String, outcomes: Sender<LoadOutcome>) {
    thread::spawn(move || {
        let result = load(&uri);
        let _ = outcomes.send(LoadOutcome { index, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn write_png(dir: &tempfile::TempDir, name: &str, width: u32, height: u32) -> String {
        let path = dir.path().join(name);
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([x as u8 * 40, y as u8 * 40, 7, 255])
        });
        img.save(&path).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_resolve_uri() {
        assert_eq!(resolve_uri("./img/a.png").unwrap(), PathBuf::from("./img/a.png"));
        assert_eq!(resolve_uri("file:///tmp/a.png").unwrap(), PathBuf::from("/tmp/a.png"));
        let err = resolve_uri("https://example.com/a.png").unwrap_err();
        assert_eq!(err.uri, "https://example.com/a.png");
    }

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_png(&dir, "tile.png", 3, 2);

        let pixels = load(&uri).unwrap();
        assert_eq!((pixels.width(), pixels.height()), (3, 2));
        // Second pixel of the top row.
        assert_eq!(&pixels.data()[4..8], &[40, 0, 7, 255]);
    }

    #[test]
    fn test_missing_file_keeps_uri() {
        let err = load("./definitely/not/here.png").unwrap_err();
        assert_eq!(err.uri, "./definitely/not/here.png");
        assert!(err.to_string().starts_with("bad image uri: ./definitely/not/here.png"));
    }

    #[test]
    fn test_corrupt_image_fails() {
        let err = decode("junk.png", b"not an image").unwrap_err();
        assert_eq!(err.uri, "junk.png");
    }

    #[test]
    fn test_spawn_load_reports_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_png(&dir, "tile.png", 1, 1);
        let (tx, rx) = mpsc::channel();

        spawn_load(4, uri, tx.clone());
        spawn_load(5, "missing.png".to_string(), tx);

        let mut outcomes: Vec<_> = rx.iter().collect();
        outcomes.sort_by_key(|o| o.index);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
    }
}
