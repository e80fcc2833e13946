/// Scene contents, redraw signalling and tile assembly
use crate::geometry::{LineSegments, TileMesh};

/// Edge colour of the bounding box
pub const BOX_COLOR: [u8; 3] = [0xcc, 0xcc, 0xcc];

/// Anything the renderer knows how to draw
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    Lines(LineSegments),
    Tile(TileMesh),
}

/// Flat list of scene objects, drawn in insertion order
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene holding the unit wireframe box and the axes helper
    pub fn with_helpers() -> Self {
        let mut scene = Self::new();
        scene.add(SceneObject::Lines(LineSegments::box_edges(1.0, BOX_COLOR)));
        for axis in LineSegments::axes(1.0) {
            scene.add(SceneObject::Lines(axis));
        }
        scene
    }

    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn tiles(&self) -> impl Iterator<Item = &TileMesh> {
        self.objects.iter().filter_map(|object| match object {
            SceneObject::Tile(tile) => Some(tile),
            SceneObject::Lines(_) => None,
        })
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }
}

/// Coalescing "render again" flag.
///
/// Any number of requests between two frames collapse into one render.
#[derive(Debug, Default)]
pub struct RedrawRequest {
    pending: bool,
}

impl RedrawRequest {
    pub fn request(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Clear the flag, returning whether a render is due
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use assembly::SceneAssembler;

#[cfg(not(target_arch = "wasm32"))]
mod assembly {
    use std::sync::mpsc::{self, Receiver, TryRecvError};

    use log::warn;

    use super::{RedrawRequest, Scene, SceneObject};
    use crate::loader::{self, LoadOutcome};
    use crate::table::TileEntry;
    use crate::tile;
    use crate::transform::Placement;

    /// Drives one load per table entry and folds finished loads into a scene.
    ///
    /// Outcomes are applied only by whoever calls [`poll`](Self::poll) or
    /// [`wait`](Self::wait), so the scene has a single mutator.
    pub struct SceneAssembler {
        placements: Vec<Placement>,
        outcomes: Receiver<LoadOutcome>,
        pending: usize,
    }

    impl SceneAssembler {
        /// Kick off every load in the table; returns without waiting
        pub fn start(table: &[TileEntry]) -> Self {
            let (tx, rx) = mpsc::channel();
            for (index, entry) in table.iter().enumerate() {
                loader::spawn_load(index, entry.uri.clone(), tx.clone());
            }

            Self {
                placements: table.iter().map(|entry| entry.placement).collect(),
                outcomes: rx,
                pending: table.len(),
            }
        }

        /// Loads that have not reported yet
        pub fn pending(&self) -> usize {
            self.pending
        }

        pub fn is_finished(&self) -> bool {
            self.pending == 0
        }

        /// Apply every outcome that is already available. Returns how many tiles were added.
        pub fn poll(&mut self, scene: &mut Scene, redraw: &mut RedrawRequest) -> usize {
            let mut added = 0;
            while self.pending > 0 {
                match self.outcomes.try_recv() {
                    Ok(outcome) => {
                        if self.apply(outcome, scene, redraw) {
                            added += 1;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        warn!("{} image loads never reported", self.pending);
                        self.pending = 0;
                    }
                }
            }
            added
        }

        /// Block until every load has reported. Returns how many tiles were added.
        pub fn wait(&mut self, scene: &mut Scene, redraw: &mut RedrawRequest) -> usize {
            let mut added = 0;
            while self.pending > 0 {
                match self.outcomes.recv() {
                    Ok(outcome) => {
                        if self.apply(outcome, scene, redraw) {
                            added += 1;
                        }
                    }
                    Err(_) => {
                        warn!("{} image loads never reported", self.pending);
                        self.pending = 0;
                    }
                }
            }
            added
        }

        fn apply(
            &mut self,
            outcome: LoadOutcome,
            scene: &mut Scene,
            redraw: &mut RedrawRequest,
        ) -> bool {
            self.pending -= 1;
            match outcome.result {
                Ok(pixels) => {
                    let placement = &self.placements[outcome.index];
                    scene.add(SceneObject::Tile(tile::build(&pixels, placement)));
                    redraw.request();
                    true
                }
                Err(failure) => {
                    warn!("{failure}");
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers() {
        let scene = Scene::with_helpers();
        assert_eq!(scene.objects().len(), 4);
        assert_eq!(scene.tile_count(), 0);
        match &scene.objects()[0] {
            SceneObject::Lines(lines) => assert_eq!(lines.color, BOX_COLOR),
            other => panic!("expected box edges, got {other:?}"),
        }
    }

    #[test]
    fn test_redraw_requests_coalesce() {
        let mut redraw = RedrawRequest::default();
        assert!(!redraw.take());

        redraw.request();
        redraw.request();
        redraw.request();
        assert!(redraw.is_pending());
        assert!(redraw.take());
        assert!(!redraw.take());
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod assembly {
        use super::super::*;
        use crate::table::TileEntry;

        fn write_png(dir: &tempfile::TempDir, name: &str) -> String {
            let path = dir.path().join(name);
            image::RgbaImage::from_pixel(4, 3, image::Rgba([200, 100, 50, 255]))
                .save(&path)
                .unwrap();
            path.to_string_lossy().into_owned()
        }

        #[test]
        fn test_failed_load_is_skipped() {
            let dir = tempfile::tempdir().unwrap();
            let good = write_png(&dir, "good.png");
            let table = vec![
                TileEntry::new("./missing/first.png"),
                TileEntry::new(good.clone()).at(1.0, 0.0, 0.0),
                TileEntry::new("./missing/second.png"),
                TileEntry::new(good).scaled(8.0),
            ];

            let mut scene = Scene::with_helpers();
            let mut redraw = RedrawRequest::default();
            let mut assembler = SceneAssembler::start(&table);
            assert_eq!(assembler.pending(), 4);

            let added = assembler.wait(&mut scene, &mut redraw);

            assert_eq!(added, 2);
            assert!(assembler.is_finished());
            assert_eq!(scene.tile_count(), 2);
            assert_eq!(scene.objects().len(), 6);
            assert!(redraw.take());
            for tile in scene.tiles() {
                assert_eq!(tile.vertex_count(), 3 * 4 * 3);
            }
        }

        #[test]
        fn test_all_failed_adds_nothing() {
            let table = vec![TileEntry::new("nope.png"), TileEntry::new("http://x/y.png")];
            let mut scene = Scene::new();
            let mut redraw = RedrawRequest::default();

            let added = SceneAssembler::start(&table).wait(&mut scene, &mut redraw);

            assert_eq!(added, 0);
            assert_eq!(scene.objects().len(), 0);
            assert!(!redraw.is_pending());
        }

        #[test]
        fn test_tiles_keep_their_table_placement() {
            let dir = tempfile::tempdir().unwrap();
            let good = write_png(&dir, "good.png");
            let table = vec![
                TileEntry::new(good.clone()).at(5.0, 0.0, 0.0),
                TileEntry::new(good).at(-5.0, 0.0, 0.0),
            ];
            let mut scene = Scene::new();
            let mut redraw = RedrawRequest::default();
            let mut assembler = SceneAssembler::start(&table);

            // Completion order is not fixed; poll until both land.
            while !assembler.is_finished() {
                assembler.poll(&mut scene, &mut redraw);
                std::thread::yield_now();
            }

            let mut xs: Vec<f64> = scene.tiles().map(|t| t.placement.position.x).collect();
            xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(xs, vec![-5.0, 5.0]);
            for tile in scene.tiles() {
                let offset = tile.placement.position.x;
                assert!(tile.vertices.iter().all(|v| (v.x - offset).abs() < 0.01));
            }
        }

        #[test]
        fn test_empty_table_is_finished() {
            let mut assembler = SceneAssembler::start(&[]);
            let mut scene = Scene::new();
            let mut redraw = RedrawRequest::default();
            assert!(assembler.is_finished());
            assert_eq!(assembler.poll(&mut scene, &mut redraw), 0);
        }
    }
}
