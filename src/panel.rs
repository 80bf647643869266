use std::sync::mpsc::Receiver;

use eframe::egui;

use crate::data::store::{ChartKey, SeriesStore};
use crate::events::{EventFilter, EventKind, GraphEvent};
use crate::render::ChartRenderer;

/// Header toggles of the graph panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelOptions {
    /// Append `(count, ...)` sample counts to every header.
    pub show_counts: bool,
    /// Append the latest value(s) to every header.
    pub show_values: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            show_counts: false,
            show_values: true,
        }
    }
}

/// egui widget listing every chart of a [`SeriesStore`].
///
/// Groups come first, then ungrouped series. Each chart sits under a
/// collapsing header bound to its visibility.
pub struct GraphPanel {
    pub options: PanelOptions,
    input_rx: Receiver<GraphEvent>,
}

impl GraphPanel {
    /// Create a panel that repaints whenever `store` changes.
    pub fn new(store: &SeriesStore) -> Self {
        Self {
            options: PanelOptions::default(),
            input_rx: store.subscribe(EventFilter::only(EventKind::INPUT)),
        }
    }

    /// Drain pending change notifications. True if anything changed.
    pub fn take_dirty(&mut self) -> bool {
        let mut dirty = false;
        while self.input_rx.try_recv().is_ok() {
            dirty = true;
        }
        dirty
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, store: &mut SeriesStore) {
        if self.take_dirty() {
            ui.ctx().request_repaint();
        }

        if !store.has_data() {
            ui.label("No graph data yet. Add samples to a series to see it here.");
            return;
        }

        ui.horizontal(|ui| {
            ui.checkbox(&mut self.options.show_counts, "Counts");
            ui.checkbox(&mut self.options.show_values, "Values");
            if ui.button("Expand all").clicked() {
                store.set_all_visible(true);
            }
            if ui.button("Collapse all").clicked() {
                store.set_all_visible(false);
            }
            if ui.button("Clear").clicked() {
                store.clear_all();
            }
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for key in store.charts() {
                    self.chart_ui(ui, store, &key);
                }
            });
    }

    fn header_text(&self, store: &SeriesStore, key: &ChartKey) -> Option<(String, f32)> {
        let (title, counts, values, height) = match key {
            ChartKey::Group(name) => {
                let group = store.group(name)?;
                (
                    name.clone(),
                    group.count_label(),
                    group.last_values_label(),
                    group.height(),
                )
            }
            ChartKey::Series(name) => {
                let series = store.series(name)?;
                (
                    name.clone(),
                    series.count_label(),
                    series.last_value_label(),
                    series.preferred_height(),
                )
            }
        };
        let mut text = title;
        if self.options.show_counts {
            text.push(' ');
            text.push_str(&counts);
        }
        if self.options.show_values {
            text.push(' ');
            text.push_str(&values);
        }
        Some((text, height))
    }

    fn chart_ui(&mut self, ui: &mut egui::Ui, store: &mut SeriesStore, key: &ChartKey) {
        let Some((header, height)) = self.header_text(store, key) else {
            return;
        };
        let visible = store.is_chart_visible(key);

        let response = egui::CollapsingHeader::new(header)
            .id_salt(key)
            .open(Some(visible))
            .show(ui, |ui| Self::chart_body(ui, store, key, height));

        if response.header_response.clicked() {
            store.set_chart_visible(key, !visible);
        }
    }

    fn chart_body(ui: &mut egui::Ui, store: &mut SeriesStore, key: &ChartKey, height: f32) {
        let cfg = store.config().clone();
        let renderer = ChartRenderer::from_config(&cfg);
        let width = ui.available_width();

        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
        let pointer = ui.input(|i| i.pointer.hover_pos());

        if let Some(chart) = store.layout(key, rect, pointer) {
            let mut painter = ui.painter_at(rect.expand(1.0));
            renderer.paint(&mut painter, &chart);
        }

        let (track, bar) = ui.allocate_exact_size(
            egui::vec2(width, cfg.scrollbar_height),
            egui::Sense::drag(),
        );
        let state = store.scroll(key, rect, pointer, bar.drag_delta().x);
        if state.active {
            let mut painter = ui.painter_at(track);
            renderer.paint_scrollbar(&mut painter, track.shrink2(egui::vec2(1.0, 0.0)), &state);
        }
    }
}
