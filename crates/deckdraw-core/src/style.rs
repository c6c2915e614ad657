//! Style configuration and the factory that stamps it onto new shapes.

use crate::shapes::{
    ControlStyle, Ellipse, Rectangle, SerializableColor, Shape, ShapeStyle, Text, Triangle,
};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Shapes offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Square,
    Rectangle,
    Triangle,
    Ellipse,
}

impl ShapeKind {
    /// Get all toolbar shapes in display order.
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Circle,
            ShapeKind::Square,
            ShapeKind::Rectangle,
            ShapeKind::Triangle,
            ShapeKind::Ellipse,
        ]
    }

    /// Size of a freshly created shape of this kind.
    pub fn default_size(self) -> Size {
        match self {
            ShapeKind::Circle => Size::new(100.0, 100.0),
            ShapeKind::Square => Size::new(50.0, 50.0),
            ShapeKind::Rectangle | ShapeKind::Triangle | ShapeKind::Ellipse => {
                Size::new(75.0, 50.0)
            }
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "Circle",
            ShapeKind::Square => "Square",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Ellipse => "Ellipse",
        }
    }
}

/// Defaults applied to every shape the factory creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Fill for new shapes (the toolbar's current color).
    pub fill_color: SerializableColor,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    pub opacity: f64,
    /// Fill for new text boxes.
    pub text_color: SerializableColor,
    pub font_size: f64,
    /// Selection chrome for new shapes.
    pub controls: ControlStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            fill_color: SerializableColor::new(0x2d, 0xd8, 0x81, 255),
            stroke_color: SerializableColor::black(),
            stroke_width: 0.0,
            opacity: 1.0,
            text_color: SerializableColor::black(),
            font_size: Text::DEFAULT_FONT_SIZE,
            controls: ControlStyle::default(),
        }
    }
}

impl StyleConfig {
    /// Style for a new geometric shape.
    pub fn shape_style(&self) -> ShapeStyle {
        ShapeStyle {
            fill_color: Some(self.fill_color),
            stroke_color: self.stroke_color,
            stroke_width: self.stroke_width,
            opacity: self.opacity,
            controls: self.controls.clone(),
        }
    }

    /// Style for a new text box.
    pub fn text_style(&self) -> ShapeStyle {
        ShapeStyle {
            fill_color: Some(self.text_color),
            stroke_width: 0.0,
            ..self.shape_style()
        }
    }
}

/// Creates shapes with an explicit style instead of mutating shared defaults.
#[derive(Debug, Clone)]
pub struct ShapeFactory {
    style: StyleConfig,
    canvas: Size,
}

impl ShapeFactory {
    pub fn new(style: StyleConfig, canvas: Size) -> Self {
        Self { style, canvas }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Change the fill used for shapes created from now on.
    pub fn set_fill_color(&mut self, color: SerializableColor) {
        self.style.fill_color = color;
    }

    /// Create a shape centered on the canvas.
    pub fn create(&self, kind: ShapeKind) -> Shape {
        let size = kind.default_size();
        let top_left = self.centered_origin(size);
        self.create_at(kind, top_left)
    }

    /// Create a shape whose bounding box starts at `top_left`.
    pub fn create_at(&self, kind: ShapeKind, top_left: Point) -> Shape {
        let size = kind.default_size();
        let style = self.style.shape_style();
        match kind {
            ShapeKind::Circle => {
                let mut circle = Ellipse::circle(
                    Point::new(top_left.x + size.width / 2.0, top_left.y + size.height / 2.0),
                    size.width / 2.0,
                );
                circle.style = style;
                Shape::Ellipse(circle)
            }
            ShapeKind::Ellipse => {
                let mut ellipse = Ellipse::from_rect(Rect::from_origin_size(top_left, size));
                ellipse.style = style;
                Shape::Ellipse(ellipse)
            }
            ShapeKind::Square | ShapeKind::Rectangle => {
                let mut rect = Rectangle::new(top_left, size.width, size.height);
                rect.style = style;
                Shape::Rectangle(rect)
            }
            ShapeKind::Triangle => {
                let mut tri = Triangle::new(top_left, size.width, size.height);
                tri.style = style;
                Shape::Triangle(tri)
            }
        }
    }

    /// Create a text box centered on the canvas.
    pub fn create_text(&self, content: impl Into<String>) -> Shape {
        let mut text = Text::new(Point::ZERO, content.into()).with_font_size(self.style.font_size);
        text.style = self.style.text_style();
        let mut shape = Shape::Text(text);
        let size = shape.bounds().size();
        shape.set_position(self.centered_origin(size));
        shape
    }

    /// Each axis is offset by its own half extent.
    fn centered_origin(&self, size: Size) -> Point {
        Point::new(
            (self.canvas.width - size.width) / 2.0,
            (self.canvas.height - size.height) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> ShapeFactory {
        ShapeFactory::new(StyleConfig::default(), Size::new(1200.0, 800.0))
    }

    #[test]
    fn test_create_centers_on_canvas() {
        for &kind in ShapeKind::all() {
            let shape = factory().create(kind);
            let center = shape.center();
            assert!((center.x - 600.0).abs() < 1e-9, "{kind:?}");
            assert!((center.y - 400.0).abs() < 1e-9, "{kind:?}");
        }
    }

    #[test]
    fn test_wide_shape_offsets_use_own_axis() {
        let bounds = factory().create(ShapeKind::Rectangle).bounds();
        assert_eq!(bounds.origin(), Point::new(562.5, 375.0));
        assert_eq!(bounds.size(), Size::new(75.0, 50.0));
    }

    #[test]
    fn test_default_sizes() {
        let f = factory();
        assert!((f.create(ShapeKind::Circle).bounds().width() - 100.0).abs() < 1e-9);
        assert!((f.create(ShapeKind::Square).bounds().height() - 50.0).abs() < 1e-9);
        let rect = f.create(ShapeKind::Rectangle).bounds();
        assert!((rect.width() - 75.0).abs() < 1e-9);
        assert!((rect.height() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_factory_applies_style() {
        let mut f = factory();
        let red = SerializableColor::new(255, 0, 0, 255);
        f.set_fill_color(red);

        let shape = f.create(ShapeKind::Triangle);
        assert_eq!(shape.style().fill_color, Some(red));
        assert_eq!(shape.style().controls, ControlStyle::default());
    }

    #[test]
    fn test_styles_are_independent() {
        let f = factory();
        let mut a = f.create(ShapeKind::Square);
        let b = f.create(ShapeKind::Square);
        a.style_mut().opacity = 0.5;
        assert!((b.style().opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_create_text_uses_text_style() {
        let shape = factory().create_text("Title");
        assert!(shape.is_text());
        assert_eq!(shape.style().fill_color, Some(SerializableColor::black()));
        assert!((shape.center().x - 600.0).abs() < 1e-9);
    }
}
