/// The static tile table: which images go where
use std::f64::consts::{FRAC_PI_2, PI};

use crate::transform::{EulerXyz, Placement};

/// Rotations that stand a tile upright and turn it to face outward
pub mod facing {
    use super::*;

    pub const WEST: EulerXyz = EulerXyz::new(FRAC_PI_2, FRAC_PI_2, 0.0);
    pub const SOUTH: EulerXyz = EulerXyz::new(FRAC_PI_2, PI, 0.0);
    pub const EAST: EulerXyz = EulerXyz::new(FRAC_PI_2, -FRAC_PI_2, 0.0);
    pub const NORTH: EulerXyz = EulerXyz::new(FRAC_PI_2, 0.0, 0.0);
}

/// One row of the table.
///
/// Unset fields keep the [`Placement`] defaults: position `(0, 0, 0)`,
/// rotation `(0, 0, 0)`, scale `(1, 1, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TileEntry {
    pub uri: String,
    pub placement: Placement,
}

impl TileEntry {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            placement: Placement::default(),
        }
    }

    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.placement = self.placement.with_position(x, y, z);
        self
    }

    pub fn facing(mut self, rotation: EulerXyz) -> Self {
        self.placement = self.placement.with_rotation(rotation);
        self
    }

    pub fn scaled(mut self, s: f64) -> Self {
        self.placement = self.placement.with_scale(s, s, s);
        self
    }
}

/// The demo scene: three dragons and two rings of emoji on two levels
pub fn default_table() -> Vec<TileEntry> {
    use facing::*;

    let emoji = |code: &str| format!("./img/{code}.png");
    let mut table = vec![
        TileEntry::new("./img/dragon.png"),
        TileEntry::new("./img/dragon.png")
            .at(-2.0, 3.0, -1.0)
            .facing(NORTH)
            .scaled(8.0),
        TileEntry::new("./img/dragon.png")
            .at(3.0, 0.0, -1.0)
            .facing(EAST)
            .scaled(8.0),
    ];

    // 1f680..1f68f: rings of radius 1 and 2, then the same one level up.
    let mut code = 0x1f680;
    for z in [0.0, 1.0] {
        for r in [1.0, 2.0] {
            for (x, y, rotation) in [
                (0.0, r, NORTH),
                (0.0, -r, SOUTH),
                (r, 0.0, EAST),
                (-r, 0.0, WEST),
            ] {
                table.push(
                    TileEntry::new(emoji(&format!("{code:x}")))
                        .at(x, y, z)
                        .facing(rotation)
                        .scaled(8.0),
                );
                code += 1;
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_entry_defaults() {
        let entry = TileEntry::new("a.png");
        assert_eq!(entry.placement.position, Vector3::zeros());
        assert_eq!(entry.placement.rotation, EulerXyz::zero());
        assert_eq!(entry.placement.scale, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_default_table_layout() {
        let table = default_table();
        assert_eq!(table.len(), 19);
        assert_eq!(table[0], TileEntry::new("./img/dragon.png"));

        assert_eq!(table[3].uri, "./img/1f680.png");
        assert_eq!(table[3].placement.position, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(table[3].placement.rotation, facing::NORTH);

        assert_eq!(table[10].uri, "./img/1f687.png");
        assert_eq!(table[10].placement.position, Vector3::new(-2.0, 0.0, 0.0));
        assert_eq!(table[10].placement.rotation, facing::WEST);

        let last = table.last().unwrap();
        assert_eq!(last.uri, "./img/1f68f.png");
        assert_eq!(last.placement.position, Vector3::new(-2.0, 0.0, 1.0));
        assert_eq!(last.placement.scale, Vector3::new(8.0, 8.0, 8.0));
    }
}
