//! Axial grid → pixel projection.
//!
//! The default provider follows the hexjson conventions: offset coordinates with the row axis
//! pointing up (`rc = rMax - r`), hexes sized to the largest radius that fits both dimensions, and
//! shared vertex offsets relative to each hex center.

use hexmap_core::{HexLayoutMode, RegionLayout};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxialHex {
    pub q: i32,
    pub r: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Pixel placement of one hex: its center and outline vertices relative to that center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexShape {
    pub center: Point,
    pub vertices: Vec<Point>,
}

impl HexShape {
    /// Whether a point in the same coordinate space as `center` lies inside the outline.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let px = x - self.center.x;
        let py = y - self.center.y;
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (self.vertices[i], self.vertices[j]);
            if (a.y > py) != (b.y > py) && px < (b.x - a.x) * (py - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// SVG `points` attribute: `"x,y x,y ..."`.
pub fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|v| format!("{},{}", crate::svg::fmt(v.x), crate::svg::fmt(v.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Projects a keyed table of axial hexes into pixel space.
///
/// Output keys must match input keys; callers match results back to regions by key.
pub trait HexGeometry {
    fn project(
        &self,
        hexes: &IndexMap<String, AxialHex>,
        mode: HexLayoutMode,
        width: f64,
        height: f64,
    ) -> IndexMap<String, HexShape>;
}

pub fn axial_table(layout: &RegionLayout) -> IndexMap<String, AxialHex> {
    layout
        .iter()
        .map(|(key, def)| {
            (
                key.to_string(),
                AxialHex {
                    q: def.axial_column,
                    r: def.axial_row,
                },
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HexJsonGeometry;

impl HexGeometry for HexJsonGeometry {
    fn project(
        &self,
        hexes: &IndexMap<String, AxialHex>,
        mode: HexLayoutMode,
        width: f64,
        height: f64,
    ) -> IndexMap<String, HexShape> {
        let Some(extent) = GridExtent::of(hexes.values()) else {
            return IndexMap::new();
        };
        let radius = fit_radius(&extent, mode, width.max(0.0), height.max(0.0));
        let hex_width = radius * 3f64.sqrt();
        let vertices = vertices(mode, hex_width, radius);

        hexes
            .iter()
            .map(|(key, hex)| {
                let qc = hex.q - extent.q_min;
                let rc = extent.r_max - hex.r;
                let center = Point {
                    x: center_x(mode, qc, rc, hex_width, radius),
                    y: center_y(mode, qc, rc, hex_width, radius),
                };
                (
                    key.clone(),
                    HexShape {
                        center,
                        vertices: vertices.clone(),
                    },
                )
            })
            .collect()
    }
}

struct GridExtent {
    q_min: i32,
    q_max: i32,
    r_min: i32,
    r_max: i32,
}

impl GridExtent {
    fn of<'a>(hexes: impl IntoIterator<Item = &'a AxialHex>) -> Option<Self> {
        let mut it = hexes.into_iter();
        let first = it.next()?;
        let mut e = Self {
            q_min: first.q,
            q_max: first.q,
            r_min: first.r,
            r_max: first.r,
        };
        for h in it {
            e.q_min = e.q_min.min(h.q);
            e.q_max = e.q_max.max(h.q);
            e.r_min = e.r_min.min(h.r);
            e.r_max = e.r_max.max(h.r);
        }
        Some(e)
    }

    fn columns(&self) -> f64 {
        f64::from(self.q_max - self.q_min + 1)
    }

    fn rows(&self) -> f64 {
        f64::from(self.r_max - self.r_min + 1)
    }
}

fn fit_radius(extent: &GridExtent, mode: HexLayoutMode, width: f64, height: f64) -> f64 {
    let sqrt3 = 3f64.sqrt();
    let (q, r) = (extent.columns(), extent.rows());
    if mode.is_row_offset() {
        f64::min(
            width / ((q + 0.5) * sqrt3),
            height / ((r + 1.0 / 3.0) * 1.5),
        )
    } else {
        f64::min(
            (sqrt3 * width) / ((q + 1.0 / 3.0) * 3.0),
            height / ((r + 0.5) * sqrt3),
        )
    }
}

fn is_odd(v: i32) -> bool {
    v.rem_euclid(2) == 1
}

fn center_x(mode: HexLayoutMode, qc: i32, rc: i32, hex_width: f64, radius: f64) -> f64 {
    let qc = f64::from(qc);
    match mode {
        HexLayoutMode::OddR => {
            let offset = if is_odd(rc) { hex_width } else { hex_width / 2.0 };
            qc * hex_width + offset
        }
        HexLayoutMode::EvenR => {
            let offset = if is_odd(rc) { hex_width / 2.0 } else { hex_width };
            qc * hex_width + offset
        }
        HexLayoutMode::OddQ | HexLayoutMode::EvenQ => qc * radius * 1.5 + radius,
    }
}

fn center_y(mode: HexLayoutMode, qc: i32, rc: i32, hex_width: f64, radius: f64) -> f64 {
    let rcf = f64::from(rc);
    match mode {
        HexLayoutMode::OddR | HexLayoutMode::EvenR => rcf * radius * 1.5 + radius,
        HexLayoutMode::OddQ => {
            let offset = if is_odd(qc) { hex_width } else { hex_width / 2.0 };
            rcf * hex_width + offset
        }
        HexLayoutMode::EvenQ => {
            let offset = if is_odd(qc) { hex_width / 2.0 } else { hex_width };
            rcf * hex_width + offset
        }
    }
}

fn vertices(mode: HexLayoutMode, hex_width: f64, radius: f64) -> Vec<Point> {
    let p = |x: f64, y: f64| Point { x, y };
    let hw = hex_width * 0.5;
    if mode.is_row_offset() {
        vec![
            p(0.0, -radius),
            p(hw, -0.5 * radius),
            p(hw, 0.5 * radius),
            p(0.0, radius),
            p(-hw, 0.5 * radius),
            p(-hw, -0.5 * radius),
        ]
    } else {
        vec![
            p(-radius, 0.0),
            p(-0.5 * radius, -hw),
            p(0.5 * radius, -hw),
            p(radius, 0.0),
            p(0.5 * radius, hw),
            p(-0.5 * radius, hw),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(cells: &[(&str, i32, i32)]) -> IndexMap<String, AxialHex> {
        cells
            .iter()
            .map(|&(k, q, r)| (k.to_string(), AxialHex { q, r }))
            .collect()
    }

    #[test]
    fn empty_table_projects_to_nothing() {
        let out = HexJsonGeometry.project(&IndexMap::new(), HexLayoutMode::OddR, 100.0, 100.0);
        assert!(out.is_empty());
    }

    #[test]
    fn odd_r_rows_grow_upwards_and_odd_rows_shift_right() {
        let hexes = table(&[("bottom", 0, 0), ("top", 0, 1)]);
        let out = HexJsonGeometry.project(&hexes, HexLayoutMode::OddR, 1000.0, 1000.0);
        let bottom = &out["bottom"];
        let top = &out["top"];
        // r=1 is the top row (rc=0), r=0 is the bottom row (rc=1, odd, shifted).
        assert!(top.center.y < bottom.center.y);
        assert!(bottom.center.x > top.center.x);
    }

    #[test]
    fn radius_fits_the_tighter_dimension() {
        let hexes = table(&[("a", 0, 0), ("b", 1, 0)]);
        let wide = HexJsonGeometry.project(&hexes, HexLayoutMode::OddR, 1000.0, 30.0);
        let radius = wide["a"].vertices[3].y;
        assert!((radius - 30.0 / ((1.0 + 1.0 / 3.0) * 1.5)).abs() < 1e-9);
    }

    #[test]
    fn all_hexes_fit_inside_the_box() {
        let layout = RegionLayout::us_states();
        let (w, h) = (580.0, 380.0);
        let out = HexJsonGeometry.project(&axial_table(&layout), layout.mode, w, h);
        assert_eq!(out.len(), layout.len());
        for shape in out.values() {
            for v in &shape.vertices {
                let (x, y) = (shape.center.x + v.x, shape.center.y + v.y);
                assert!(x >= -1e-9 && x <= w + 1e-9, "x={x}");
                assert!(y >= -1e-9 && y <= h + 1e-9, "y={y}");
            }
        }
    }

    #[test]
    fn contains_hits_center_and_misses_outside() {
        let hexes = table(&[("a", 0, 0)]);
        let out = HexJsonGeometry.project(&hexes, HexLayoutMode::OddR, 100.0, 100.0);
        let a = &out["a"];
        assert!(a.contains(a.center.x, a.center.y));
        assert!(!a.contains(a.center.x + 1000.0, a.center.y));
    }
}
