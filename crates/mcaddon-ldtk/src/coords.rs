//! Tile grid to world coordinate mapping.
//!
//! All placements (tiles, entities and point fields) go through
//! [`map_coordinates`]; nothing else computes world positions.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConvertError;

/// Y of the bottom of the overworld; the vertical plane hangs down from here.
pub const WORLD_BOTTOM: f64 = -64.0;

/// Which world plane the 2D map is laid onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// `"xy"` / `"yx"`: the map stands upright, map rows become world Y.
    Vertical,
    /// `"xz"` / `"zx"`: the map lies flat, map rows become world Z.
    Horizontal,
}

impl FromStr for Plane {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xy" | "yx" => Ok(Plane::Vertical),
            "xz" | "zx" => Ok(Plane::Horizontal),
            other => Err(ConvertError::UnsupportedPlane(other.to_string())),
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Plane::Vertical => "xy",
            Plane::Horizontal => "xz",
        })
    }
}

/// User offset added to every mapped position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl From<[i32; 3]> for Offset {
    fn from([dx, dy, dz]: [i32; 3]) -> Self {
        Self {
            dx: dx as f64,
            dy: dy as f64,
            dz: dz as f64,
        }
    }
}

/// An absolute block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPos {
    /// The world axis that map rows run along for `plane`.
    pub fn vertical(&self, plane: Plane) -> i32 {
        match plane {
            Plane::Vertical => self.y,
            Plane::Horizontal => self.z,
        }
    }
}

/// Map a tile-unit position inside a level to a world position.
///
/// `origin` is the level origin and `(x, y)` the local position, both in tile
/// units; `layer` is the level depth. Components are truncated only at the end.
pub fn map_coordinates(
    origin: (i32, i32),
    (x, y): (f64, f64),
    layer: i32,
    offset: Offset,
    plane: Plane,
) -> WorldPos {
    let (ox, oy) = (origin.0 as f64, origin.1 as f64);
    let layer = layer as f64;
    let (wx, wy, wz) = match plane {
        Plane::Vertical => (
            ox + x + offset.dx,
            WORLD_BOTTOM + oy - y + offset.dy,
            offset.dz - layer,
        ),
        Plane::Horizontal => (ox + x + offset.dx, offset.dy - layer, oy + y + offset.dz),
    };
    WorldPos {
        x: wx as i32,
        y: wy as i32,
        z: wz as i32,
    }
}
