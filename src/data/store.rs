//! SeriesStore: the registry every writer pushes samples into.
//!
//! Series are created on first write (or first [`get`](SeriesStore::get)) and
//! live until an explicit clear. Groups are not stored; they are derived from
//! the `group` field of each series whenever the renderer asks for them.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::mpsc::Receiver;

use egui::{Color32, Pos2, Rect};

use crate::config::GraphConfig;
use crate::data::group::SeriesGroup;
use crate::data::scroll::{ScrollController, ScrollState};
use crate::data::series::Series;
use crate::data::viewport::{ChartGeometry, ViewportMapper};
use crate::events::{EventController, EventFilter, EventKind, GraphEvent};

/// Identifies one chart: a whole group or a single ungrouped series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChartKey {
    Group(String),
    Series(String),
}

/// Owner of all series, keyed by name.
#[derive(Debug)]
pub struct SeriesStore {
    cfg: GraphConfig,
    series: HashMap<String, Series>,
    /// Insertion sequence per series name; defines member and chart order.
    order: HashMap<String, u64>,
    next_seq: u64,
    /// Names already expanded into per-axis children by a vector write.
    composites: HashSet<String>,
    /// Scratch series handed back for unnamed writes; never stored or drawn.
    detached: Series,
    events: EventController,
}

impl Default for SeriesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(cfg: GraphConfig) -> Self {
        let cfg = cfg.sanitized();
        Self {
            detached: Series::new("", &cfg),
            cfg,
            series: HashMap::new(),
            order: HashMap::new(),
            next_seq: 0,
            composites: HashSet::new(),
            events: EventController::new(),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.cfg
    }

    /// Controller for change notifications; clone it to subscribe from elsewhere.
    pub fn events(&self) -> &EventController {
        &self.events
    }

    pub fn subscribe(&self, filter: EventFilter) -> Receiver<GraphEvent> {
        self.events.subscribe(filter)
    }

    pub(crate) fn notify(&self, event: GraphEvent) {
        self.events.emit(event);
    }

    /// Fetch or create `name` without emitting anything.
    ///
    /// An empty name yields a fresh detached series instead.
    pub(crate) fn entry(&mut self, name: &str) -> &mut Series {
        if name.is_empty() {
            log::warn!("series name must not be empty; ignoring access");
            return self.detached();
        }
        entry_in(&mut self.series, &mut self.order, &mut self.next_seq, &self.cfg, name)
    }

    fn detached(&mut self) -> &mut Series {
        self.detached = Series::new("", &self.cfg);
        &mut self.detached
    }

    fn seq(&self, name: &str) -> u64 {
        self.order.get(name).copied().unwrap_or(u64::MAX)
    }

    // ── write API ───────────────────────────────────────────────────────

    /// Append `value` to `name`, creating the series on first use.
    pub fn add(&mut self, name: &str, value: f32) -> &mut Series {
        self.add_styled(name, value, None, None)
    }

    /// Like [`add`](Self::add), also (re)assigning the series colour.
    pub fn add_with_color(&mut self, name: &str, value: f32, color: Color32) -> &mut Series {
        self.add_styled(name, value, Some(color), None)
    }

    /// Append `value`, applying `color` and `group` when given.
    ///
    /// Style arguments apply on every call, not only at creation. An empty
    /// group string leaves the current group untouched. Writes to an empty
    /// name are dropped with a warning and nothing is stored or notified.
    pub fn add_styled(
        &mut self,
        name: &str,
        value: f32,
        color: Option<Color32>,
        group: Option<&str>,
    ) -> &mut Series {
        if name.is_empty() {
            log::warn!("dropping sample {value} written to an unnamed series");
            return self.detached();
        }
        let series = entry_in(&mut self.series, &mut self.order, &mut self.next_seq, &self.cfg, name);
        if let Some(c) = color {
            series.set_color(c);
        }
        if let Some(g) = group.filter(|g| !g.is_empty()) {
            series.set_group(g);
        }
        series.push(value);
        self.events.emit(
            GraphEvent::new(EventKind::INPUT)
                .with_series(vec![name.to_string()])
                .with_values(vec![value]),
        );
        series
    }

    /// Return the series, creating an empty one if needed.
    ///
    /// Use this to configure style before any data arrives.
    pub fn get(&mut self, name: &str) -> &mut Series {
        self.entry(name)
    }

    /// Samples of `name`, creating the series if needed.
    pub fn samples(&mut self, name: &str) -> &VecDeque<f32> {
        self.entry(name).samples()
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    pub fn series_mut(&mut self, name: &str) -> Option<&mut Series> {
        self.series.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// True if `name` is a series or a name already expanded by a vector write.
    pub fn exists(&self, name: &str) -> bool {
        self.series.contains_key(name) || self.composites.contains(name)
    }

    pub(crate) fn mark_composite(&mut self, name: &str) {
        self.composites.insert(name.to_string());
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// True once at least one series exists.
    pub fn has_data(&self) -> bool {
        !self.series.is_empty()
    }

    /// Series names in creation order.
    pub fn names(&self) -> Vec<&str> {
        let mut all: Vec<&Series> = self.series.values().collect();
        all.sort_by_key(|s| self.seq(s.name()));
        all.into_iter().map(Series::name).collect()
    }

    // ── clearing ────────────────────────────────────────────────────────

    /// Drop every series.
    pub fn clear_all(&mut self) {
        let count = self.series.len();
        self.series.clear();
        self.order.clear();
        self.composites.clear();
        log::debug!("cleared all {count} series");
        self.notify(GraphEvent::new(EventKind::INPUT | EventKind::CLEARED));
    }

    /// Remove the series called `key`, or if there is none, every series in
    /// group `key`.
    ///
    /// A series name wins over a group of the same name. Notifies even when
    /// nothing matched.
    pub fn clear(&mut self, key: &str) {
        let removed: Vec<String> = if self.series.remove(key).is_some() {
            self.order.remove(key);
            vec![key.to_string()]
        } else {
            let members: Vec<String> = self
                .series
                .values()
                .filter(|s| s.group() == Some(key))
                .map(|s| s.name().to_string())
                .collect();
            for name in &members {
                self.series.remove(name);
                self.order.remove(name);
            }
            self.composites.remove(key);
            members
        };
        log::debug!("clear {key:?} removed {} series", removed.len());
        self.notify(GraphEvent::new(EventKind::INPUT | EventKind::CLEARED).with_series(removed));
    }

    // ── read API for the render boundary ────────────────────────────────

    /// All groups, ordered by their first member; members in creation order.
    pub fn grouped_series(&self) -> Vec<SeriesGroup<'_>> {
        let mut members: Vec<&Series> = self.series.values().filter(|s| s.in_group()).collect();
        members.sort_by_key(|s| self.seq(s.name()));

        let mut groups: Vec<SeriesGroup<'_>> = Vec::new();
        for s in members {
            let Some(name) = s.group() else { continue };
            match groups.iter_mut().find(|g| g.name == name) {
                Some(g) => g.members.push(s),
                None => groups.push(SeriesGroup {
                    name,
                    members: vec![s],
                }),
            }
        }
        groups
    }

    /// One group by name, if it has any members.
    pub fn group(&self, name: &str) -> Option<SeriesGroup<'_>> {
        let mut members: Vec<&Series> = self
            .series
            .values()
            .filter(|s| s.group() == Some(name))
            .collect();
        if members.is_empty() {
            return None;
        }
        members.sort_by_key(|s| self.seq(s.name()));
        let name = members[0].group()?;
        Some(SeriesGroup { name, members })
    }

    /// Series without a group, in creation order.
    pub fn ungrouped_series(&self) -> Vec<&Series> {
        let mut out: Vec<&Series> = self.series.values().filter(|s| !s.in_group()).collect();
        out.sort_by_key(|s| self.seq(s.name()));
        out
    }

    /// Every chart to draw: groups first, then ungrouped series.
    pub fn charts(&self) -> Vec<ChartKey> {
        let groups = self
            .grouped_series()
            .into_iter()
            .map(|g| ChartKey::Group(g.name.to_string()));
        let singles = self
            .ungrouped_series()
            .into_iter()
            .map(|s| ChartKey::Series(s.name().to_string()));
        groups.chain(singles).collect()
    }

    /// True if at least one member of `group` is visible.
    pub fn is_any_visible(&self, group: &str) -> bool {
        self.series
            .values()
            .any(|s| s.group() == Some(group) && s.is_visible())
    }

    /// Show or hide every member of `group`.
    pub fn set_visible(&mut self, group: &str, visible: bool) {
        let mut touched = Vec::new();
        for s in self.series.values_mut().filter(|s| s.group() == Some(group)) {
            s.set_visible(visible);
            touched.push(s.name().to_string());
        }
        self.notify(GraphEvent::new(EventKind::INPUT | EventKind::VISIBILITY).with_series(touched));
    }

    pub fn set_series_visible(&mut self, name: &str, visible: bool) {
        self.entry(name).set_visible(visible);
        self.notify(
            GraphEvent::new(EventKind::INPUT | EventKind::VISIBILITY)
                .with_series(vec![name.to_string()]),
        );
    }

    /// Expand or collapse every chart at once.
    pub fn set_all_visible(&mut self, visible: bool) {
        for s in self.series.values_mut() {
            s.set_visible(visible);
        }
        self.notify(GraphEvent::new(EventKind::INPUT | EventKind::VISIBILITY));
    }

    pub fn is_chart_visible(&self, key: &ChartKey) -> bool {
        match key {
            ChartKey::Group(g) => self.is_any_visible(g),
            ChartKey::Series(n) => self.series.get(n).is_some_and(Series::is_visible),
        }
    }

    pub fn set_chart_visible(&mut self, key: &ChartKey, visible: bool) {
        match key {
            ChartKey::Group(g) => self.set_visible(g, visible),
            ChartKey::Series(n) => self.set_series_visible(n, visible),
        }
    }

    // ── per-frame layout ────────────────────────────────────────────────

    /// Mutable handles to `names`, in the order given. Missing names are skipped.
    pub(crate) fn series_by_names_mut(&mut self, names: &[String]) -> Vec<&mut Series> {
        let mut found: Vec<(usize, &mut Series)> = self
            .series
            .values_mut()
            .filter_map(|s| names.iter().position(|n| n == s.name()).map(|i| (i, s)))
            .collect();
        found.sort_by_key(|(i, _)| *i);
        found.into_iter().map(|(_, s)| s).collect()
    }

    /// Members of a chart in draw order.
    pub(crate) fn chart_members_mut(&mut self, key: &ChartKey) -> Vec<&mut Series> {
        match key {
            ChartKey::Series(name) => self.series.get_mut(name).into_iter().collect(),
            ChartKey::Group(group) => {
                let order = &self.order;
                let mut members: Vec<&mut Series> = self
                    .series
                    .values_mut()
                    .filter(|s| s.group() == Some(group.as_str()))
                    .collect();
                members.sort_by_key(|s| order.get(s.name()).copied().unwrap_or(u64::MAX));
                members
            }
        }
    }

    /// Map a chart onto `rect`. `None` when the chart has no members.
    ///
    /// Updates each member's scroll latch as a side effect.
    pub fn layout(&mut self, key: &ChartKey, rect: Rect, pointer: Option<Pos2>) -> Option<ChartGeometry> {
        let mapper = ViewportMapper::from_config(&self.cfg);
        let mut members = self.chart_members_mut(key);
        if members.is_empty() {
            return None;
        }
        Some(mapper.map_chart(&mut members, rect, pointer))
    }

    /// Apply pointer/scrollbar input to a chart and share the result across
    /// its members.
    pub fn scroll(
        &mut self,
        key: &ChartKey,
        rect: Rect,
        pointer: Option<Pos2>,
        drag_dx: f32,
    ) -> ScrollState {
        let controller = ScrollController::from_config(&self.cfg);
        let mut members = self.chart_members_mut(key);
        controller.update(&mut members, rect, pointer, drag_dx)
    }
}

fn entry_in<'a>(
    series: &'a mut HashMap<String, Series>,
    order: &mut HashMap<String, u64>,
    next_seq: &mut u64,
    cfg: &GraphConfig,
    name: &str,
) -> &'a mut Series {
    series.entry(name.to_string()).or_insert_with(|| {
        log::debug!("creating series {name:?}");
        order.insert(name.to_string(), *next_seq);
        *next_seq += 1;
        Series::new(name, cfg)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_creates_then_appends() {
        let mut store = SeriesStore::new();
        store.add("a", 1.0);
        store.add("a", 2.0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.samples("a").iter().copied().collect::<Vec<_>>(), vec![1.0, 2.0]);
    }

    #[test]
    fn style_arguments_apply_on_every_call() {
        let mut store = SeriesStore::new();
        store.add("a", 1.0);
        store.add_with_color("a", 2.0, Color32::RED);
        assert_eq!(store.series("a").unwrap().color(), Some(Color32::RED));
        store.add_styled("a", 3.0, None, Some("g"));
        assert_eq!(store.series("a").unwrap().group(), Some("g"));
        assert_eq!(store.series("a").unwrap().color(), Some(Color32::RED));
        store.add_styled("a", 4.0, None, Some(""));
        assert_eq!(store.series("a").unwrap().group(), Some("g"));
    }

    #[test]
    fn get_creates_empty_series_silently() {
        let mut store = SeriesStore::new();
        let rx = store.subscribe(EventFilter::all());
        store.get("pre").set_group("g").set_color(Color32::BLUE);
        assert!(store.contains("pre"));
        assert!(store.series("pre").unwrap().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn config_defaults_flow_into_new_series() {
        let cfg = GraphConfig {
            capacity: 7,
            step_size: 2.0,
            graph_height: 90.0,
            ..Default::default()
        };
        let mut store = SeriesStore::with_config(cfg);
        let s = store.get("x");
        assert_eq!(s.capacity(), 7);
        assert_eq!(s.min_step(), 2.0);
        assert_eq!(s.preferred_height(), 90.0);
    }

    #[test]
    fn names_keep_creation_order() {
        let mut store = SeriesStore::new();
        for n in ["c", "a", "b"] {
            store.add(n, 0.0);
        }
        assert_eq!(store.names(), vec!["c", "a", "b"]);
        store.clear("a");
        store.add("a", 0.0);
        assert_eq!(store.names(), vec!["c", "b", "a"]);
    }

    #[test]
    fn charts_list_groups_before_singles() {
        let mut store = SeriesStore::new();
        store.add("solo", 0.0);
        store.get("c1").set_group("G");
        store.get("c2").set_group("G");
        assert_eq!(
            store.charts(),
            vec![ChartKey::Group("G".into()), ChartKey::Series("solo".into())]
        );
    }

    #[test]
    fn chart_visibility_routes_by_key() {
        let mut store = SeriesStore::new();
        store.get("a").set_group("G");
        store.add("b", 1.0);
        store.set_chart_visible(&ChartKey::Group("G".into()), false);
        store.set_chart_visible(&ChartKey::Series("b".into()), false);
        assert!(!store.is_chart_visible(&ChartKey::Group("G".into())));
        assert!(!store.is_chart_visible(&ChartKey::Series("b".into())));
        store.set_all_visible(true);
        assert!(store.is_chart_visible(&ChartKey::Group("G".into())));
        assert!(store.is_chart_visible(&ChartKey::Series("b".into())));
    }

    #[test]
    fn layout_of_unknown_chart_is_none() {
        let mut store = SeriesStore::new();
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 50.0));
        assert!(store.layout(&ChartKey::Group("nope".into()), rect, None).is_none());
    }
}
