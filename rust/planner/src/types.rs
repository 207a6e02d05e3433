// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for floor plans, openings and furniture

use roomplan_geometry::{OrientedRect, Point2D};
use serde::{Deserialize, Serialize};

/// Default wall thickness (feet)
pub const DEFAULT_WALL_THICKNESS: f64 = 0.3;

/// Default furniture color
pub const DEFAULT_ITEM_COLOR: &str = "#c46f37";

/// Wall classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WallKind {
    Exterior,
    Interior,
}

fn default_wall_thickness() -> f64 {
    DEFAULT_WALL_THICKNESS
}

/// A wall run, described by its centerline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub id: String,
    pub kind: WallKind,
    /// Centerline vertices; more than two make a multi-segment run
    pub polyline: Vec<Point2D>,
    #[serde(default = "default_wall_thickness")]
    pub thickness: f64,
    /// Connect the last vertex back to the first
    #[serde(default)]
    pub closed: bool,
}

impl Wall {
    pub fn new(id: impl Into<String>, kind: WallKind, polyline: Vec<Point2D>) -> Self {
        Self {
            id: id.into(),
            kind,
            polyline,
            thickness: DEFAULT_WALL_THICKNESS,
            closed: false,
        }
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Consecutive vertex pairs, including the closing pair for closed walls
    pub fn vertex_pairs(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        let n = self.polyline.len();
        let pair_count = match (n, self.closed) {
            (0 | 1, _) => 0,
            (2, _) | (_, false) => n - 1,
            (_, true) => n,
        };
        (0..pair_count).map(move |i| (self.polyline[i], self.polyline[(i + 1) % n]))
    }

    /// Total centerline length
    pub fn length(&self) -> f64 {
        self.vertex_pairs().map(|(a, b)| a.distance_to(&b)).sum()
    }
}

/// Side of the door leaf that carries the hinge, seen from the wall's
/// start vertex looking towards its end: `Left` hinges on the opening's
/// start edge, `Right` on its end edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Hinge {
    Left,
    Right,
}

/// Which side of the wall the door leaf sweeps into. `In` is the left-hand
/// side of the host segment's direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Swing {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Door,
    Window,
}

/// Default opening dimensions used when an opening leaves them out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OpeningDefaults {
    pub door_width: f64,
    pub door_height: f64,
    pub window_width: f64,
    pub window_height: f64,
    pub window_sill_height: f64,
}

impl Default for OpeningDefaults {
    fn default() -> Self {
        Self {
            door_width: 3.0,
            door_height: 6.8,
            window_width: 3.0,
            window_height: 4.0,
            window_sill_height: 3.0,
        }
    }
}

/// A door, positioned by its start edge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoorSpec {
    pub id: String,
    pub host_wall_id: String,
    /// Distance along the host wall to the door's start edge
    pub offset_along_wall: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    pub hinge: Hinge,
    pub swing: Swing,
}

/// A window, positioned by its center
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowSpec {
    pub id: String,
    pub host_wall_id: String,
    /// Distance along the host wall to the window's center
    pub center_offset_along_wall: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sill_height: Option<f64>,
}

/// An architectural opening cut into a named wall
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Opening {
    Door(DoorSpec),
    Window(WindowSpec),
}

impl Opening {
    pub fn id(&self) -> &str {
        match self {
            Opening::Door(d) => &d.id,
            Opening::Window(w) => &w.id,
        }
    }

    pub fn host_wall_id(&self) -> &str {
        match self {
            Opening::Door(d) => &d.host_wall_id,
            Opening::Window(w) => &w.host_wall_id,
        }
    }

    pub fn kind(&self) -> OpeningKind {
        match self {
            Opening::Door(_) => OpeningKind::Door,
            Opening::Window(_) => OpeningKind::Window,
        }
    }

    pub fn width(&self, defaults: &OpeningDefaults) -> f64 {
        match self {
            Opening::Door(d) => d.width.unwrap_or(defaults.door_width),
            Opening::Window(w) => w.width.unwrap_or(defaults.window_width),
        }
    }

    /// `(start, end)` along the host wall, before any clamping
    pub fn wall_span(&self, defaults: &OpeningDefaults) -> (f64, f64) {
        let width = self.width(defaults);
        match self {
            Opening::Door(d) => (d.offset_along_wall, d.offset_along_wall + width),
            Opening::Window(w) => (
                w.center_offset_along_wall - width / 2.0,
                w.center_offset_along_wall + width / 2.0,
            ),
        }
    }

    /// `(bottom, top)` above the floor, before any clamping
    pub fn vertical_span(&self, defaults: &OpeningDefaults) -> (f64, f64) {
        match self {
            Opening::Door(d) => (0.0, d.height.unwrap_or(defaults.door_height)),
            Opening::Window(w) => {
                let sill = w.sill_height.unwrap_or(defaults.window_sill_height);
                (sill, sill + w.height.unwrap_or(defaults.window_height))
            }
        }
    }

    pub fn center_along_wall(&self, defaults: &OpeningDefaults) -> f64 {
        let (start, end) = self.wall_span(defaults);
        (start + end) / 2.0
    }

    pub fn door_hinge_and_swing(&self) -> Option<(Hinge, Swing)> {
        match self {
            Opening::Door(d) => Some((d.hinge, d.swing)),
            Opening::Window(_) => None,
        }
    }
}

fn default_item_color() -> String {
    DEFAULT_ITEM_COLOR.to_string()
}

/// Stored furniture record, as written by older plans.
///
/// Older records keep the second coordinate in `y` and may carry the
/// rotation as `rotationY` in radians.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FurnitureRecord {
    id: String,
    #[serde(default)]
    name: String,
    width: f64,
    depth: f64,
    #[serde(default)]
    height: f64,
    x: f64,
    #[serde(alias = "y")]
    z: f64,
    #[serde(default)]
    rotation: Option<f64>,
    #[serde(default)]
    rotation_y: Option<f64>,
    #[serde(default = "default_item_color")]
    color: String,
}

impl From<FurnitureRecord> for FurnitureItem {
    fn from(r: FurnitureRecord) -> Self {
        let rotation = r
            .rotation
            .filter(|v| v.is_finite())
            .or_else(|| r.rotation_y.filter(|v| v.is_finite()).map(f64::to_degrees))
            .unwrap_or(0.0);

        Self {
            id: r.id,
            name: r.name,
            width: r.width,
            depth: r.depth,
            height: r.height,
            x: r.x,
            z: r.z,
            rotation,
            color: r.color,
        }
    }
}

/// A piece of furniture on the floor plan.
///
/// Only the `width` x `depth` footprint at `rotation` takes part in
/// collision; `height`, `color` and `name` are carried for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "FurnitureRecord")]
pub struct FurnitureItem {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub x: f64,
    pub z: f64,
    /// Rotation in degrees
    pub rotation: f64,
    pub color: String,
}

impl FurnitureItem {
    /// New item at the origin with no rotation
    pub fn new(id: impl Into<String>, name: impl Into<String>, width: f64, depth: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width,
            depth,
            height,
            x: 0.0,
            z: 0.0,
            rotation: 0.0,
            color: DEFAULT_ITEM_COLOR.to_string(),
        }
    }

    pub fn at(mut self, position: Point2D) -> Self {
        self.x = position.x;
        self.z = position.z;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.z)
    }

    pub fn footprint(&self) -> OrientedRect {
        OrientedRect::new(self.position(), self.width, self.depth, self.rotation)
    }

    /// Positive, finite footprint and a finite pose
    pub fn has_valid_dimensions(&self) -> bool {
        self.width.is_finite()
            && self.depth.is_finite()
            && self.width > 0.0
            && self.depth > 0.0
            && self.x.is_finite()
            && self.z.is_finite()
            && self.rotation.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wall_vertex_pairs() {
        let open = Wall::new(
            "w",
            WallKind::Interior,
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(4.0, 0.0),
                Point2D::new(4.0, 3.0),
            ],
        );
        assert_eq!(open.vertex_pairs().count(), 2);
        assert_eq!(open.length(), 7.0);

        let closed = open.clone().closed();
        assert_eq!(closed.vertex_pairs().count(), 3);
        assert_eq!(closed.length(), 12.0);
    }

    #[test]
    fn test_two_point_closed_wall_is_one_segment() {
        let w = Wall::new(
            "w",
            WallKind::Exterior,
            vec![Point2D::new(0.0, 0.0), Point2D::new(4.0, 0.0)],
        )
        .closed();
        assert_eq!(w.vertex_pairs().count(), 1);
    }

    #[test]
    fn test_door_and_window_spans() {
        let defaults = OpeningDefaults::default();
        let door = Opening::Door(DoorSpec {
            id: "d".into(),
            host_wall_id: "w".into(),
            offset_along_wall: 2.0,
            width: None,
            height: Some(7.0),
            hinge: Hinge::Left,
            swing: Swing::In,
        });
        assert_eq!(door.wall_span(&defaults), (2.0, 5.0));
        assert_eq!(door.vertical_span(&defaults), (0.0, 7.0));
        assert_eq!(door.center_along_wall(&defaults), 3.5);

        let window = Opening::Window(WindowSpec {
            id: "win".into(),
            host_wall_id: "w".into(),
            center_offset_along_wall: 5.0,
            width: Some(2.0),
            height: None,
            sill_height: None,
        });
        assert_eq!(window.wall_span(&defaults), (4.0, 6.0));
        assert_eq!(window.vertical_span(&defaults), (3.0, 7.0));
        assert!(window.door_hinge_and_swing().is_none());
    }

    #[test]
    fn test_opening_json_is_tagged() {
        let json = r#"[
            {"type": "door", "id": "d1", "hostWallId": "w1", "offsetAlongWall": 1.5,
             "hinge": "left", "swing": "in"},
            {"type": "window", "id": "n1", "hostWallId": "w1", "centerOffsetAlongWall": 6.0,
             "sillHeight": 2.5}
        ]"#;
        let openings: Vec<Opening> = serde_json::from_str(json).unwrap();
        assert_eq!(openings[0].kind(), OpeningKind::Door);
        assert_eq!(openings[1].kind(), OpeningKind::Window);
        assert_eq!(openings[1].host_wall_id(), "w1");
    }

    #[test]
    fn test_door_requires_hinge_and_swing() {
        let json = r#"{"type": "door", "id": "d1", "hostWallId": "w1", "offsetAlongWall": 1.5}"#;
        assert!(serde_json::from_str::<Opening>(json).is_err());
    }

    #[test]
    fn test_legacy_furniture_record() {
        let json = r#"{"id": "a", "name": "Sofa", "width": 7.5, "depth": 3.1, "height": 2.9,
                       "x": 1.0, "y": 2.0, "rotationY": 1.5707963267948966}"#;
        let item: FurnitureItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.z, 2.0);
        assert_abs_diff_eq!(item.rotation, 90.0, epsilon = 1e-9);
        assert_eq!(item.color, DEFAULT_ITEM_COLOR);
    }

    #[test]
    fn test_rotation_field_wins_over_legacy() {
        let json = r#"{"id": "a", "width": 1.0, "depth": 1.0, "x": 0.0, "z": 0.0,
                       "rotation": 180.0, "rotationY": 0.5}"#;
        let item: FurnitureItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.rotation, 180.0);
    }

    #[test]
    fn test_furniture_round_trips_through_json() {
        let item = FurnitureItem::new("bed", "Queen Bed", 5.2, 6.8, 2.0)
            .at(Point2D::new(3.0, 4.0))
            .with_rotation(90.0);
        let json = serde_json::to_string(&item).unwrap();
        let back: FurnitureItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(!FurnitureItem::new("a", "", 0.0, 1.0, 1.0).has_valid_dimensions());
        assert!(!FurnitureItem::new("a", "", 1.0, -2.0, 1.0).has_valid_dimensions());
        assert!(FurnitureItem::new("a", "", 1.0, 2.0, 0.0).has_valid_dimensions());
    }
}
