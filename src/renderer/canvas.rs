//! Canvas 2D surface for the browser

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, Fill, Surface, TextAlign, TextStyle};
use crate::error::{GameError, GameResult};

/// CSS `rgba()` string
pub fn css(color: Color) -> String {
    let [r, g, b, a] = color;
    format!(
        "rgba({}, {}, {}, {:.3})",
        (r.clamp(0.0, 1.0) * 255.0).round() as u8,
        (g.clamp(0.0, 1.0) * 255.0).round() as u8,
        (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        a.clamp(0.0, 1.0)
    )
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> GameResult<Self> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| GameError::Display(format!("{e:?}")))?
            .ok_or_else(|| GameError::Display("2d context unavailable".into()))?
            .dyn_into()
            .map_err(|_| GameError::Display("not a 2d context".into()))?;
        Ok(Self { canvas, ctx })
    }

    /// Glow around the canvas, `None` for the resting shadow
    pub fn set_glow(&self, color: Option<Color>) {
        let shadow = match color {
            Some(c) => format!("0 0 30px {}", css(c)),
            None => "0 0 30px rgba(0, 0, 0, 0.7)".to_string(),
        };
        let _ = self.canvas.style().set_property("box-shadow", &shadow);
    }

    fn apply_fill(&self, fill: Fill, center: Vec2) {
        match fill {
            Fill::Solid(color) => self.ctx.set_fill_style_str(&css(color)),
            Fill::Radial { inner, outer, radius } => {
                let (x, y) = (center.x as f64, center.y as f64);
                match self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius as f64) {
                    Ok(gradient) => {
                        let _ = gradient.add_color_stop(0.0, &css(inner));
                        let _ = gradient.add_color_stop(1.0, &css(outer));
                        self.ctx.set_fill_style_canvas_gradient(&gradient);
                    }
                    Err(_) => self.ctx.set_fill_style_str(&css(inner)),
                }
            }
        }
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self, color: Color) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill) {
        self.apply_fill(fill, center);
        self.circle_path(center, radius);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.ctx.set_stroke_style_str(&css(color));
        self.ctx.set_line_width(width as f64);
        self.circle_path(center, radius);
        self.ctx.stroke();
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, fill: Fill) {
        self.apply_fill(fill, min + size / 2.0);
        self.ctx
            .fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, width: f32, color: Color) {
        self.ctx.set_stroke_style_str(&css(color));
        self.ctx.set_line_width(width as f64);
        self.ctx
            .stroke_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.ctx.set_stroke_style_str(&css(color));
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn text(&mut self, pos: Vec2, text: &str, style: TextStyle) {
        let weight = if style.bold { "bold " } else { "" };
        self.ctx.set_font(&format!("{weight}{}px Arial", style.size));
        self.ctx.set_text_align(match style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        });
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&css(style.color));
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}
