//! Draw-command surface
//!
//! Scene code never touches the GPU. It issues primitive commands in the
//! logical 1280x720 space against a [`Surface`]; backends decide how to
//! rasterize them. [`DrawList`] records commands so they can be tessellated
//! later or inspected in tests.

use glam::Vec2;

use crate::Color;
use crate::sim::Rect;

/// Horizontal anchoring of a text command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// `pos` is the top-left corner
    TopLeft,
    /// `pos` is the center of the text box
    Center,
}

/// One primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle, or an outline of `outline` pixels when set
    Rect {
        rect: Rect,
        color: Color,
        radius: f32,
        outline: Option<f32>,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Ellipse inscribed in `bounds`
    Ellipse { bounds: Rect, color: Color },
    /// Filled polygon
    Polygon { points: Vec<Vec2>, color: Color },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
        anchor: TextAnchor,
    },
}

/// Anything that accepts draw commands
pub trait Surface {
    fn submit(&mut self, command: DrawCommand);

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.submit(DrawCommand::Rect {
            rect,
            color,
            radius: 0.0,
            outline: None,
        });
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.submit(DrawCommand::Rect {
            rect,
            color,
            radius,
            outline: None,
        });
    }

    fn outline_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Color) {
        self.submit(DrawCommand::Rect {
            rect,
            color,
            radius,
            outline: Some(width),
        });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.submit(DrawCommand::Circle { center, radius, color });
    }

    fn ellipse(&mut self, bounds: Rect, color: Color) {
        self.submit(DrawCommand::Ellipse { bounds, color });
    }

    fn polygon(&mut self, points: Vec<Vec2>, color: Color) {
        self.submit(DrawCommand::Polygon { points, color });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.submit(DrawCommand::Line { from, to, width, color });
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, anchor: TextAnchor) {
        self.submit(DrawCommand::Text {
            text: text.to_owned(),
            pos,
            size,
            color,
            anchor,
        });
    }
}

/// Recording surface
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Every text string, in submission order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
