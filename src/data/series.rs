//! Series: one named, bounded history of scalar samples plus its style.

use std::collections::VecDeque;

use egui::Color32;

use crate::config::{non_negative, GraphConfig};

/// Scroll ratio meaning "everything fits, no scrollbar".
pub const NO_SCROLL: f32 = -1.0;

/// The visual presentation of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLook {
    /// `None` draws with the theme foreground colour.
    pub color: Option<Color32>,
    pub line_width: f32,
    pub visible: bool,
}

impl Default for SeriesLook {
    fn default() -> Self {
        Self {
            color: None,
            line_width: 1.5,
            visible: true,
        }
    }
}

/// A named ring buffer of samples.
///
/// Samples are appended at the tail; once `capacity` is exceeded the oldest
/// sample is dropped. The setters mutate in place and return `&mut Self` so
/// calls can be chained straight off [`SeriesStore::get`](crate::SeriesStore::get).
#[derive(Debug, Clone)]
pub struct Series {
    name: String,
    group: Option<String>,
    samples: VecDeque<f32>,
    capacity: usize,
    pub(crate) look: SeriesLook,
    min_step: f32,
    preferred_height: f32,
    limits: Option<(f32, f32)>,
    /// -1 until the data overflows the chart, then the scrolled fraction in [0, 1].
    pub(crate) scroll: f32,
    /// Visible width over total content width, from the last layout.
    pub(crate) view_ratio: f32,
}

impl Series {
    pub fn new(name: impl Into<String>, cfg: &GraphConfig) -> Self {
        let capacity = cfg.capacity.max(1);
        Self {
            name: name.into(),
            group: None,
            samples: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            look: SeriesLook {
                color: None,
                line_width: cfg.line_width,
                visible: true,
            },
            min_step: cfg.step_size,
            preferred_height: cfg.graph_height,
            limits: None,
            scroll: NO_SCROLL,
            view_ratio: 0.5,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn in_group(&self) -> bool {
        self.group.is_some()
    }

    pub fn samples(&self) -> &VecDeque<f32> {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn look(&self) -> &SeriesLook {
        &self.look
    }

    pub fn color(&self) -> Option<Color32> {
        self.look.color
    }

    pub fn line_width(&self) -> f32 {
        self.look.line_width
    }

    pub fn is_visible(&self) -> bool {
        self.look.visible
    }

    pub fn min_step(&self) -> f32 {
        self.min_step
    }

    pub fn preferred_height(&self) -> f32 {
        self.preferred_height
    }

    pub fn limits(&self) -> Option<(f32, f32)> {
        self.limits
    }

    pub fn scroll_ratio(&self) -> f32 {
        self.scroll
    }

    pub fn view_ratio(&self) -> f32 {
        self.view_ratio
    }

    /// Append a sample, evicting from the front while over capacity.
    pub fn push(&mut self, value: f32) {
        self.samples.push_back(value);
        self.enforce_capacity();
    }

    fn enforce_capacity(&mut self) {
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn clear_samples(&mut self) {
        self.samples.clear();
        self.scroll = NO_SCROLL;
    }

    // --- fluent style setters ---

    pub fn set_color(&mut self, color: Color32) -> &mut Self {
        self.look.color = Some(color);
        self
    }

    /// Render together with every other series of the same group.
    ///
    /// An empty name is the same as [`remove_from_group`](Self::remove_from_group).
    pub fn set_group(&mut self, group: impl Into<String>) -> &mut Self {
        let group = group.into();
        self.group = if group.is_empty() { None } else { Some(group) };
        self
    }

    pub fn remove_from_group(&mut self) -> &mut Self {
        self.group = None;
        self
    }

    /// Minimum horizontal distance between samples.
    pub fn set_step_size(&mut self, step: f32) -> &mut Self {
        self.min_step = non_negative(step);
        self
    }

    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.look.line_width = non_negative(width);
        self
    }

    /// Chart height; inside a group the tallest member wins.
    pub fn set_graph_height(&mut self, height: f32) -> &mut Self {
        self.preferred_height = non_negative(height);
        self
    }

    /// Change the ring buffer capacity. Excess old samples are dropped now.
    pub fn set_length_limit(&mut self, capacity: usize) -> &mut Self {
        self.capacity = capacity.max(1);
        self.enforce_capacity();
        self
    }

    /// Pin the value axis instead of fitting it to the visible samples.
    pub fn set_limits(&mut self, min: f32, max: f32) -> &mut Self {
        self.limits = Some((min, max));
        self
    }

    pub fn clear_limits(&mut self) -> &mut Self {
        self.limits = None;
        self
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.look.visible = visible;
        self
    }

    /// `"(n)"` for header display.
    pub fn count_label(&self) -> String {
        format!("({})", self.len())
    }

    /// `"(v)"` with two decimals; `0.00` when there are no samples yet.
    pub fn last_value_label(&self) -> String {
        format!("({:.2})", self.last().unwrap_or(0.0))
    }
}
