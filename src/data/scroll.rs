//! Shared horizontal scrolling for a chart and all of its members.

use egui::{pos2, Pos2, Rect};

use crate::config::GraphConfig;
use crate::data::series::{Series, NO_SCROLL};

/// Scroll state of one chart after input was applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    /// Shared ratio written back to every member ([`NO_SCROLL`] when nothing overflows).
    pub ratio: f32,
    /// Scrollbar thumb size as a fraction of the track.
    pub thumb: f32,
    /// Pointer is in the scrollbar region of a scrollable chart.
    pub active: bool,
}

impl ScrollState {
    pub fn is_scrollable(&self) -> bool {
        self.ratio > NO_SCROLL
    }

    /// Thumb rectangle inside `track`.
    pub fn thumb_rect(&self, track: Rect) -> Rect {
        let thumb_w = (track.width() * self.thumb).max(track.height().min(track.width()));
        let free = (track.width() - thumb_w).max(0.0);
        let x = track.min.x + free * self.ratio.clamp(0.0, 1.0);
        Rect::from_min_max(pos2(x, track.min.y), pos2(x + thumb_w, track.max.y))
    }
}

/// Turns scrollbar drags into a shared scroll ratio.
#[derive(Debug, Clone, Copy)]
pub struct ScrollController {
    /// How far below the chart the scrollbar region reaches.
    pub margin: f32,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::from_config(&GraphConfig::default())
    }
}

impl ScrollController {
    pub fn from_config(cfg: &GraphConfig) -> Self {
        Self {
            margin: cfg.scrollbar_margin,
        }
    }

    /// Lower half of the chart plus the margin below it.
    pub fn hit_region(&self, rect: Rect) -> Rect {
        Rect::from_min_max(
            pos2(rect.min.x, rect.center().y),
            pos2(rect.max.x, rect.max.y + self.margin),
        )
    }

    /// Largest member ratio; any scrolled member makes the chart scrolled.
    pub fn shared_ratio<'a>(members: impl IntoIterator<Item = &'a Series>) -> f32 {
        members
            .into_iter()
            .map(Series::scroll_ratio)
            .fold(NO_SCROLL, f32::max)
    }

    /// Smallest member view ratio, so the thumb fits the widest content.
    pub fn thumb_ratio<'a>(members: impl IntoIterator<Item = &'a Series>) -> f32 {
        let thumb = members
            .into_iter()
            .map(Series::view_ratio)
            .fold(1.0, f32::min);
        if thumb.is_finite() {
            thumb.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Move `ratio` by a drag of `delta_px` along a track `track_width` wide.
    pub fn drag(ratio: f32, thumb: f32, delta_px: f32, track_width: f32) -> f32 {
        let travel = track_width * (1.0 - thumb);
        if !(travel > 0.0) || !delta_px.is_finite() {
            return ratio;
        }
        (ratio.max(0.0) + delta_px / travel).clamp(0.0, 1.0)
    }

    /// Apply pointer input and write one ratio back to every member.
    ///
    /// Dragging only counts while the pointer is in the [hit region](Self::hit_region)
    /// and at least one member overflows.
    pub fn update(
        &self,
        members: &mut [&mut Series],
        rect: Rect,
        pointer: Option<Pos2>,
        drag_dx: f32,
    ) -> ScrollState {
        let mut ratio = Self::shared_ratio(members.iter().map(|s| &**s));
        let thumb = Self::thumb_ratio(members.iter().map(|s| &**s));
        let hovered = pointer.is_some_and(|p| self.hit_region(rect).contains(p));
        let active = hovered && ratio > NO_SCROLL;

        if active && drag_dx != 0.0 {
            ratio = Self::drag(ratio, thumb, drag_dx, rect.width());
        }
        for s in members.iter_mut() {
            s.scroll = ratio;
        }
        ScrollState {
            ratio,
            thumb,
            active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::viewport::ViewportMapper;
    use egui::vec2;

    fn filled(n: usize) -> Series {
        let mut s = Series::new("s", &GraphConfig::default());
        for v in 0..n {
            s.push(v as f32);
        }
        s
    }

    fn chart() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(100.0, 50.0))
    }

    #[test]
    fn hit_region_is_lower_half_plus_margin() {
        let region = ScrollController::default().hit_region(chart());
        assert!(region.contains(pos2(50.0, 30.0)));
        assert!(region.contains(pos2(50.0, 75.0)));
        assert!(!region.contains(pos2(50.0, 10.0)));
        assert!(!region.contains(pos2(50.0, 90.0)));
    }

    #[test]
    fn drag_moves_and_clamps() {
        assert_eq!(ScrollController::drag(0.5, 0.5, 25.0, 100.0), 1.0);
        assert!((ScrollController::drag(0.5, 0.5, -10.0, 100.0) - 0.3).abs() < 1e-6);
        assert_eq!(ScrollController::drag(0.5, 1.0, 10.0, 100.0), 0.5);
    }

    #[test]
    fn fitting_chart_ignores_drags() {
        let mut a = filled(5);
        ViewportMapper::default().map_series(&mut a, chart(), None);
        let state = ScrollController::default().update(&mut [&mut a], chart(), Some(pos2(50.0, 40.0)), 30.0);
        assert!(!state.active);
        assert_eq!(state.ratio, NO_SCROLL);
        assert_eq!(a.scroll_ratio(), NO_SCROLL);
    }

    #[test]
    fn group_members_share_one_ratio() {
        let mut long = filled(60);
        let mut short = filled(5);
        let mapper = ViewportMapper::default();
        mapper.map_series(&mut long, chart(), None);
        mapper.map_series(&mut short, chart(), None);
        assert_eq!(long.scroll_ratio(), 1.0);
        assert_eq!(short.scroll_ratio(), NO_SCROLL);

        let ctrl = ScrollController::default();
        let state = ctrl.update(&mut [&mut long, &mut short], chart(), Some(pos2(50.0, 40.0)), -20.0);
        assert!(state.active);
        assert!(state.ratio < 1.0);
        assert_eq!(long.scroll_ratio(), state.ratio);
        assert_eq!(short.scroll_ratio(), state.ratio);
    }

    #[test]
    fn pointer_outside_region_keeps_ratio() {
        let mut long = filled(60);
        ViewportMapper::default().map_series(&mut long, chart(), None);
        let state = ScrollController::default().update(&mut [&mut long], chart(), Some(pos2(50.0, 5.0)), -20.0);
        assert!(!state.active);
        assert_eq!(state.ratio, 1.0);
    }

    #[test]
    fn thumb_rect_tracks_ratio() {
        let track = Rect::from_min_size(pos2(0.0, 50.0), vec2(100.0, 16.0));
        let state = ScrollState {
            ratio: 1.0,
            thumb: 0.25,
            active: true,
        };
        let thumb = state.thumb_rect(track);
        assert_eq!(thumb.max.x, 100.0);
        assert_eq!(thumb.width(), 25.0);
    }
}
