//! 2D rendering
//!
//! Drawing goes through the [`Surface`] trait so the scene code is shared
//! between the browser canvas and the recording [`CommandList`] used by the
//! headless host and tests. Coordinates are pixels, origin top-left.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod effects;
pub mod scene;

use glam::Vec2;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use effects::Effects;
pub use scene::draw_frame;

/// RGBA, components in 0-1
pub type Color = [f32; 4];

/// Opaque color from a `0xRRGGBB` literal
pub const fn hex(rgb: u32) -> Color {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Same color with a different alpha
pub const fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}

/// Colors for game elements
pub mod colors {
    use super::{Color, hex};

    pub const BACKGROUND: Color = [0.04, 0.05, 0.1, 1.0];
    pub const GRID_LINE: Color = [0.25, 0.61, 1.0, 0.1];
    pub const SNAKE_HEAD: Color = hex(0x00ff9d);
    pub const SNAKE_HEAD_EDGE: Color = hex(0x00cc7a);
    pub const SNAKE_OUTLINE: Color = hex(0x007a49);
    pub const SNAKE_EYE: Color = hex(0x000000);
    pub const TONGUE: Color = hex(0xff0000);
    pub const APPLE: Color = hex(0xff6b81);
    pub const APPLE_EDGE: Color = hex(0xff4757);
    pub const APPLE_HUNT_EDGE: Color = hex(0xff002b);
    pub const STEM: Color = hex(0x8b4513);
    pub const LEAF: Color = hex(0x2e8b57);
    pub const SPEED_UP: Color = hex(0xffaa00);
    pub const HIT: Color = hex(0xff4757);
    pub const WHITE: Color = hex(0xffffff);
    pub const PANEL: Color = [0.0, 0.0, 0.0, 0.7];
}

/// How a closed shape is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Color),
    /// Radial gradient from the shape's center out to `radius`
    Radial {
        inner: Color,
        outer: Color,
        radius: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
}

/// Font and placement for a text run (vertically centered on its anchor)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub align: TextAlign,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            bold: false,
            align: TextAlign::Center,
            color,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn left(mut self) -> Self {
        self.align = TextAlign::Left;
        self
    }
}

/// A 2D display surface
pub trait Surface {
    /// Size in pixels
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);
    fn fill_rect(&mut self, min: Vec2, size: Vec2, fill: Fill);
    fn stroke_rect(&mut self, min: Vec2, size: Vec2, width: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    fn text(&mut self, pos: Vec2, text: &str, style: TextStyle);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillCircle { center: Vec2, radius: f32, fill: Fill },
    StrokeCircle { center: Vec2, radius: f32, width: f32, color: Color },
    FillRect { min: Vec2, size: Vec2, fill: Fill },
    StrokeRect { min: Vec2, size: Vec2, width: f32, color: Color },
    Line { from: Vec2, to: Vec2, width: f32, color: Color },
    Text { pos: Vec2, text: String, style: TextStyle },
}

/// Surface that records what was drawn
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    size: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    /// Commands since the last clear
    pub fn frame(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text runs in the current frame
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.frame().iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for CommandList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        // Keep only the latest frame
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill) {
        self.commands.push(DrawCommand::FillCircle { center, radius, fill });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            color,
        });
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, fill: Fill) {
        self.commands.push(DrawCommand::FillRect { min, size, fill });
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeRect {
            min,
            size,
            width,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn text(&mut self, pos: Vec2, text: &str, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            style,
        });
    }
}
