//! Shape definitions for the slide canvas.

mod ellipse;
mod rectangle;
mod text;
mod triangle;

pub use ellipse::Ellipse;
pub use rectangle::Rectangle;
pub use text::Text;
pub use triangle::Triangle;

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color: {0}")]
pub struct ColorParseError(pub String);

/// Serializable color representation (RGBA8), stored as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn blue() -> Self {
        Self::new(0, 0, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (also accepts `transparent`).
    pub fn from_hex(color: &str) -> Result<Self, ColorParseError> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Ok(Self::transparent());
        }

        let err = || ColorParseError(color.to_string());
        let hex = color.strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());

        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Ok(Self::new(r, g, b, 255))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => Err(err()),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for SerializableColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Shape of the resize corners drawn around a selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CornerStyle {
    #[default]
    Circle,
    Rect,
}

/// Selection chrome drawn by the host around a selected object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlStyle {
    pub border_color: SerializableColor,
    pub corner_color: SerializableColor,
    pub corner_stroke_color: SerializableColor,
    /// Corner handle size in pixels.
    pub corner_size: f64,
    pub corner_style: CornerStyle,
    pub transparent_corners: bool,
    /// Gap between the object and its selection border.
    pub padding: f64,
}

impl Default for ControlStyle {
    fn default() -> Self {
        Self {
            border_color: SerializableColor::blue(),
            corner_color: SerializableColor::white(),
            corner_stroke_color: SerializableColor::blue(),
            corner_size: 10.0,
            corner_style: CornerStyle::Circle,
            transparent_corners: false,
            padding: 0.0,
        }
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width (0 = no outline).
    pub stroke_width: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Selection chrome.
    #[serde(default)]
    pub controls: ControlStyle,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill_color: None,
            stroke_color: SerializableColor::black(),
            stroke_width: 0.0,
            opacity: 1.0,
            controls: ControlStyle::default(),
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in canvas coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Apply a transform to this shape.
    fn transform(&mut self, affine: Affine);
}

/// Enum wrapper for all shape types (for serialization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Triangle(Triangle),
    Text(Text),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Ellipse(s) => s.id(),
            Shape::Triangle(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Triangle(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
        }
    }

    /// Bounds usable as a snap candidate, or `None` if the geometry is degenerate.
    pub fn snap_bounds(&self) -> Option<Rect> {
        let bounds = self.bounds();
        let finite = [bounds.x0, bounds.y0, bounds.x1, bounds.y1]
            .iter()
            .all(|v| v.is_finite());
        finite.then_some(bounds)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Move the shape so its bounding box's top-left lands on `top_left`.
    pub fn set_position(&mut self, top_left: Point) {
        let origin = self.bounds().origin();
        let delta = top_left - origin;
        self.transform(Affine::translate(delta));
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance),
            Shape::Ellipse(s) => s.hit_test(point, tolerance),
            Shape::Triangle(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Ellipse(s) => s.style(),
            Shape::Triangle(s) => s.style(),
            Shape::Text(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Ellipse(s) => s.style_mut(),
            Shape::Triangle(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
        }
    }

    pub fn transform(&mut self, affine: Affine) {
        match self {
            Shape::Rectangle(s) => s.transform(affine),
            Shape::Ellipse(s) => s.transform(affine),
            Shape::Triangle(s) => s.transform(affine),
            Shape::Text(s) => s.transform(affine),
        }
    }

    /// Locked shapes stay where they are; they can still be snapped against.
    pub fn is_locked(&self) -> bool {
        match self {
            Shape::Rectangle(s) => s.locked,
            Shape::Ellipse(s) => s.locked,
            Shape::Triangle(s) => s.locked,
            Shape::Text(s) => s.locked,
        }
    }

    pub fn set_locked(&mut self, locked: bool) {
        match self {
            Shape::Rectangle(s) => s.locked = locked,
            Shape::Ellipse(s) => s.locked = locked,
            Shape::Triangle(s) => s.locked = locked,
            Shape::Text(s) => s.locked = locked,
        }
    }

    /// Short name used in log messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Triangle(_) => "triangle",
            Shape::Text(_) => "text",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Shape::Text(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(
            SerializableColor::from_hex("#2dd881").unwrap(),
            SerializableColor::new(0x2d, 0xd8, 0x81, 255)
        );
        assert_eq!(
            SerializableColor::from_hex("#fff").unwrap(),
            SerializableColor::white()
        );
        assert_eq!(
            SerializableColor::from_hex("#00000080").unwrap(),
            SerializableColor::new(0, 0, 0, 0x80)
        );
        assert_eq!(
            "transparent".parse::<SerializableColor>().unwrap(),
            SerializableColor::transparent()
        );
    }

    #[test]
    fn test_color_from_hex_invalid() {
        assert!(SerializableColor::from_hex("2dd881").is_err());
        assert!(SerializableColor::from_hex("#12345").is_err());
        assert!(SerializableColor::from_hex("#gggggg").is_err());
        assert!(SerializableColor::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(SerializableColor::new(0x2d, 0xd8, 0x81, 255).to_hex(), "#2dd881");
        assert_eq!(SerializableColor::transparent().to_string(), "#00000000");
    }

    #[test]
    fn test_color_serde_as_hex() {
        let json = serde_json::to_string(&SerializableColor::new(255, 0, 0, 255)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: SerializableColor = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(back, SerializableColor::new(0, 255, 0, 255));
        assert!(serde_json::from_str::<SerializableColor>("\"green\"").is_err());
    }

    #[test]
    fn test_set_position_moves_bounds_origin() {
        let mut shape = Shape::Ellipse(Ellipse::new(Point::new(50.0, 50.0), 30.0, 20.0));
        shape.set_position(Point::new(100.0, 200.0));
        let bounds = shape.bounds();
        assert!((bounds.x0 - 100.0).abs() < 1e-9);
        assert!((bounds.y0 - 200.0).abs() < 1e-9);
        assert!((bounds.width() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_snap_bounds_rejects_non_finite() {
        let shape = Shape::Rectangle(Rectangle::new(Point::new(f64::NAN, 0.0), 10.0, 10.0));
        assert!(shape.snap_bounds().is_none());

        let shape = Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0));
        assert!(shape.snap_bounds().is_some());
    }

    #[test]
    fn test_lock_flag() {
        let mut shape = Shape::Triangle(Triangle::new(Point::ZERO, 75.0, 50.0));
        assert!(!shape.is_locked());
        shape.set_locked(true);
        assert!(shape.is_locked());
    }
}
