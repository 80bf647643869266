//! Viewport mapping: from a ring buffer and a draw rectangle to screen points.
//!
//! Samples are laid out left to right at a fixed pixel step. When the buffer
//! is wider than the rectangle the chart becomes scrollable, and the first
//! time that happens it jumps to the newest data. Values are normalized
//! against fixed limits, or the min/max of the visible slice.

use egui::{Color32, Pos2, Rect};

use crate::config::GraphConfig;
use crate::data::group::strip_group_prefix;
use crate::data::series::{Series, NO_SCROLL};

/// Widens `width / step` just enough that an exact fit is not lost to rounding.
const FIT_EPSILON: f32 = 1e-3;

/// The sample closest to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverPoint {
    /// Index into the series' sample buffer.
    pub index: usize,
    pub pos: Pos2,
    pub value: f32,
}

/// Mapped geometry of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesGeometry {
    pub name: String,
    /// Name shown inside a group chart, with the group prefix removed.
    pub label: String,
    pub color: Option<Color32>,
    pub line_width: f32,
    /// Visible buffer range `[start, end)`.
    pub start: usize,
    pub end: usize,
    pub step: f32,
    pub overflow: bool,
    /// Scroll ratio after the overflow latch was applied.
    pub scroll: f32,
    /// Normalization bounds `(min, max)` used for the y axis.
    pub bounds: (f32, f32),
    pub points: Vec<Pos2>,
    pub hover: Option<HoverPoint>,
}

/// Mapped geometry of a whole chart (a group or one series).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub rect: Rect,
    /// Shared group name when every member belongs to the same group.
    pub group: Option<String>,
    pub series: Vec<SeriesGeometry>,
    /// Pointer x when the pointer is over the chart.
    pub cursor_x: Option<f32>,
    /// Horizontal offset of the first vertical grid line, in `[0, grid_size)`.
    pub grid_offset: f32,
}

impl ChartGeometry {
    pub fn is_hovered(&self) -> bool {
        self.cursor_x.is_some()
    }
}

/// Maps series onto a rectangle. Stateless apart from the grid size.
#[derive(Debug, Clone, Copy)]
pub struct ViewportMapper {
    pub grid_size: f32,
}

impl Default for ViewportMapper {
    fn default() -> Self {
        Self::from_config(&GraphConfig::default())
    }
}

impl ViewportMapper {
    pub fn from_config(cfg: &GraphConfig) -> Self {
        Self {
            grid_size: cfg.grid_size,
        }
    }

    /// Map one series, latching its scroll ratio.
    ///
    /// The first time the buffer overflows `rect` an unscrolled series jumps
    /// to the newest sample; once everything fits again the ratio resets to
    /// [`NO_SCROLL`].
    pub fn map_series(&self, series: &mut Series, rect: Rect, pointer: Option<Pos2>) -> SeriesGeometry {
        let mut geom = SeriesGeometry {
            name: series.name().to_string(),
            label: series.name().to_string(),
            color: series.color(),
            line_width: series.line_width(),
            start: 0,
            end: 0,
            step: 0.0,
            overflow: false,
            scroll: NO_SCROLL,
            bounds: (0.0, 1.0),
            points: Vec::new(),
            hover: None,
        };

        let total = series.len();
        if total == 0 {
            series.scroll = NO_SCROLL;
            series.view_ratio = 1.0;
            return geom;
        }

        let width = rect.width();
        let step = (width / total as f32).max(series.min_step());
        let step = if step.is_finite() && step > 0.0 { step } else { f32::EPSILON };

        let visible = (((width / step) + FIT_EPSILON).floor().max(0.0) as usize).min(total);
        let scroll_space = (total - 1) as f32 * step - width;
        let overflow = scroll_space > 0.0;

        if overflow {
            if series.scroll < 0.0 {
                log::trace!("series {:?} overflowed, scrolling to latest", series.name());
                series.scroll = 1.0;
            }
            series.view_ratio = (width / (width + scroll_space)).clamp(0.0, 1.0);
        } else {
            series.scroll = NO_SCROLL;
            series.view_ratio = 1.0;
        }

        let effective = series.scroll.clamp(0.0, 1.0);
        let position = scroll_space.max(0.0) * effective;
        let delta = position % step;

        let mut start = ((total - visible) as f32 * effective).round() as usize;
        start = start.min(total);
        let mut end = (start + visible).min(total);
        if start >= end {
            // Narrower than a single step: draw the whole buffer.
            start = 0;
            end = total;
        }

        let bounds = match series.limits() {
            Some(limits) => limits,
            None => value_bounds(series.samples().range(start..end).copied()),
        };

        let index_shift = if overflow { start } else { 0 };
        let x_shift = if overflow { -delta } else { 0.0 };

        let hover_index = pointer.filter(|p| rect.contains(*p)).map(|p| {
            let rel = (p.x - rect.min.x - x_shift) / step + index_shift as f32;
            (rel.round().max(0.0) as usize).clamp(start, end - 1)
        });

        geom.points.reserve(end - start);
        for (j, value) in series.samples().range(start..end).copied().enumerate().map(|(k, v)| (k + start, v)) {
            let x = rect.min.x + (j - index_shift) as f32 * step + x_shift;
            let y = rect.min.y + rect.height() * normalize(value, bounds);
            let pos = Pos2::new(x, y);
            geom.points.push(pos);
            if hover_index == Some(j) {
                geom.hover = Some(HoverPoint { index: j, pos, value });
            }
        }

        geom.start = start;
        geom.end = end;
        geom.step = step;
        geom.overflow = overflow;
        geom.scroll = series.scroll;
        geom.bounds = bounds;
        geom
    }

    /// Map every member of a chart onto the same rectangle.
    pub fn map_chart(&self, members: &mut [&mut Series], rect: Rect, pointer: Option<Pos2>) -> ChartGeometry {
        let group = shared_group(members);
        let series: Vec<SeriesGeometry> = members
            .iter_mut()
            .map(|s| {
                let mut geom = self.map_series(s, rect, pointer);
                if let Some(g) = &group {
                    geom.label = strip_group_prefix(&geom.name, g).to_string();
                }
                geom
            })
            .collect();

        let first_scroll = series.first().map_or(NO_SCROLL, |s| s.scroll);
        ChartGeometry {
            rect,
            group,
            series,
            cursor_x: pointer.filter(|p| rect.contains(*p)).map(|p| p.x),
            grid_offset: self.grid_offset(first_scroll, rect.width()),
        }
    }

    /// Offset of the first vertical grid line so the grid scrolls with the data.
    pub fn grid_offset(&self, scroll: f32, width: f32) -> f32 {
        let grid = self.grid_size;
        if !(grid > 0.0) {
            return 0.0;
        }
        let offset = (-scroll.clamp(0.0, 1.0) * width) % grid;
        if offset < 0.0 {
            offset + grid
        } else {
            offset
        }
    }
}

fn shared_group(members: &[&mut Series]) -> Option<String> {
    let first = members.first()?.group()?;
    members
        .iter()
        .all(|s| s.group() == Some(first))
        .then(|| first.to_string())
}

/// Min/max of a slice with more than two finite samples, else `(0, 1)`.
pub fn value_bounds(values: impl Iterator<Item = f32>) -> (f32, f32) {
    let mut count = 0usize;
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        count += 1;
        min = min.min(v);
        max = max.max(v);
    }
    if count > 2 {
        (min, max)
    } else {
        (0.0, 1.0)
    }
}

/// Fraction of the chart height from the top, in `[0, 1]`.
///
/// A flat range (`min == max`) or a non-finite value lands on the midline.
pub fn normalize(value: f32, (min, max): (f32, f32)) -> f32 {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        return 0.5;
    }
    let y = 1.0 - (value - min) / span;
    if y.is_finite() {
        y.clamp(0.0, 1.0)
    } else {
        0.5
    }
}
