//! Chart painting on top of host drawing primitives.
//!
//! [`ChartRenderer`] turns a [`ChartGeometry`] into grid lines, polylines,
//! hover markers and labels through the small [`ChartCanvas`] trait. The trait
//! is implemented for [`egui::Painter`]; other hosts can implement it for
//! their own surface.

use egui::{pos2, Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, StrokeKind};

use crate::config::{GraphConfig, Theme};
use crate::data::scroll::ScrollState;
use crate::data::viewport::ChartGeometry;

/// Drawing primitives a host has to supply.
pub trait ChartCanvas {
    /// Filled rectangle with a 1px outline.
    fn draw_frame(&mut self, rect: Rect, fill: Color32, outline: Color32);
    fn draw_line(&mut self, a: Pos2, b: Pos2, color: Color32);
    fn draw_polyline(&mut self, points: &[Pos2], width: f32, color: Color32);
    fn draw_disc(&mut self, center: Pos2, radius: f32, color: Color32);
    fn draw_label(&mut self, text: &str, pos: Pos2, anchor: Align2, color: Color32);
}

impl ChartCanvas for egui::Painter {
    fn draw_frame(&mut self, rect: Rect, fill: Color32, outline: Color32) {
        self.rect_filled(rect, 0.0, fill);
        self.rect_stroke(rect, 0.0, Stroke::new(1.0, outline), StrokeKind::Inside);
    }

    fn draw_line(&mut self, a: Pos2, b: Pos2, color: Color32) {
        self.line_segment([a, b], Stroke::new(1.0, color));
    }

    fn draw_polyline(&mut self, points: &[Pos2], width: f32, color: Color32) {
        if points.len() >= 2 {
            self.add(Shape::line(points.to_vec(), Stroke::new(width, color)));
        }
    }

    fn draw_disc(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.circle_filled(center, radius, color);
    }

    fn draw_label(&mut self, text: &str, pos: Pos2, anchor: Align2, color: Color32) {
        self.text(pos, anchor, text, FontId::proportional(11.0), color);
    }
}

const HOVER_RADIUS: f32 = 5.0;
const VALUE_ROW: f32 = 15.0;
const NAME_ROW: f32 = 14.0;

/// Paints charts with one theme and label precision.
#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    pub theme: Theme,
    pub grid_size: f32,
    pub precision: usize,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::from_config(&GraphConfig::default())
    }
}

impl ChartRenderer {
    pub fn from_config(cfg: &GraphConfig) -> Self {
        Self {
            theme: cfg.theme,
            grid_size: cfg.grid_size,
            precision: cfg.label_precision,
        }
    }

    fn format_value(&self, v: f32) -> String {
        format!("{:.*}", self.precision, v)
    }

    /// Paint a chart.
    ///
    /// Every member gets its polyline. While hovered each member shows its
    /// hovered value; otherwise a single-series chart shows its min/max. Group
    /// charts label their members along the top left.
    pub fn paint(&self, canvas: &mut impl ChartCanvas, chart: &ChartGeometry) {
        let rect = chart.rect;
        let theme = self.theme;

        canvas.draw_frame(rect, theme.background(), Color32::GRAY);
        self.paint_grid(canvas, rect, chart.grid_offset);

        if let Some(x) = chart.cursor_x {
            canvas.draw_line(pos2(x, rect.min.y), pos2(x, rect.max.y), theme.axis());
        }

        let single = chart.series.len() == 1;
        for (i, series) in chart.series.iter().enumerate() {
            let color = series.color.unwrap_or(theme.foreground());
            canvas.draw_polyline(&series.points, series.line_width, color);

            if let Some(hover) = series.hover {
                canvas.draw_disc(hover.pos, HOVER_RADIUS, color);
                canvas.draw_label(
                    &self.format_value(hover.value),
                    pos2(rect.max.x - 4.0, rect.min.y + 5.0 + VALUE_ROW * i as f32),
                    Align2::RIGHT_TOP,
                    color,
                );
            } else if single && !chart.is_hovered() {
                let (min, max) = series.bounds;
                canvas.draw_label(
                    &self.format_value(max),
                    pos2(rect.max.x - 4.0, rect.min.y + 5.0),
                    Align2::RIGHT_TOP,
                    theme.axis(),
                );
                canvas.draw_label(
                    &self.format_value(min),
                    pos2(rect.max.x - 4.0, rect.max.y - 5.0),
                    Align2::RIGHT_BOTTOM,
                    theme.axis(),
                );
            }
        }

        if chart.series.len() > 1 && chart.group.is_some() {
            for (i, series) in chart.series.iter().enumerate() {
                let color = series.color.unwrap_or(theme.foreground());
                canvas.draw_label(
                    &series.label,
                    pos2(rect.min.x + 6.0, rect.min.y + 3.0 + NAME_ROW * i as f32),
                    Align2::LEFT_TOP,
                    color,
                );
            }
        }
    }

    fn paint_grid(&self, canvas: &mut impl ChartCanvas, rect: Rect, offset: f32) {
        if !(self.grid_size > 0.0) {
            return;
        }
        let color = self.theme.grid();
        let mut x = rect.min.x + offset;
        while x < rect.max.x {
            canvas.draw_line(pos2(x, rect.min.y), pos2(x, rect.max.y), color);
            x += self.grid_size;
        }
        let mut y = rect.min.y;
        while y < rect.max.y {
            canvas.draw_line(pos2(rect.min.x, y), pos2(rect.max.x, y), color);
            y += self.grid_size;
        }
    }

    /// Scrollbar track and thumb, drawn only while scrolling is possible.
    pub fn paint_scrollbar(&self, canvas: &mut impl ChartCanvas, track: Rect, state: &ScrollState) {
        if !state.is_scrollable() {
            return;
        }
        let theme = self.theme;
        canvas.draw_frame(track, theme.label_backdrop(), theme.grid());
        let thumb = state.thumb_rect(track);
        canvas.draw_frame(thumb, theme.axis(), theme.axis());
    }
}
