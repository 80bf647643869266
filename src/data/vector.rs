//! Vector and quaternion writes, decomposed into one series per axis.
//!
//! The first write under a name creates `nameX`, `nameY`, ... children,
//! groups them under `name` and gives them fixed axis colours. Later writes
//! only append. "First" means [`SeriesStore::exists`] was false for `name`,
//! so removing a single child later does not re-trigger the default styling.

use egui::Color32;

use crate::data::series::Series;
use crate::data::store::SeriesStore;
use crate::events::{EventKind, GraphEvent};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<(f32, f32, f32)> for Vector3 {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<(f32, f32, f32, f32)> for Quaternion {
    fn from((x, y, z, w): (f32, f32, f32, f32)) -> Self {
        Self { x, y, z, w }
    }
}

impl From<[f32; 4]> for Quaternion {
    fn from([x, y, z, w]: [f32; 4]) -> Self {
        Self { x, y, z, w }
    }
}

/// Axis suffixes and their colours, in component order.
pub const AXES: [(&str, Color32); 4] = [
    ("X", Color32::RED),
    ("Y", Color32::GREEN),
    ("Z", Color32::from_rgb(0, 255, 255)),
    ("W", Color32::YELLOW),
];

impl SeriesStore {
    /// Append a 3-component sample as `nameX`, `nameY`, `nameZ`.
    pub fn add_vector3(&mut self, name: &str, v: impl Into<Vector3>) -> Vec<&mut Series> {
        let v = v.into();
        self.add_components(name, &[v.x, v.y, v.z])
    }

    /// Append a rotation as `nameX`, `nameY`, `nameZ`, `nameW`.
    pub fn add_quaternion(&mut self, name: &str, q: impl Into<Quaternion>) -> Vec<&mut Series> {
        let q = q.into();
        self.add_components(name, &[q.x, q.y, q.z, q.w])
    }

    fn add_components(&mut self, name: &str, values: &[f32]) -> Vec<&mut Series> {
        if name.is_empty() {
            log::warn!("dropping {}-component sample written to an unnamed series", values.len());
            return Vec::new();
        }
        let axes = &AXES[..values.len().min(AXES.len())];
        let children: Vec<String> = axes.iter().map(|(axis, _)| format!("{name}{axis}")).collect();

        if !self.exists(name) {
            self.decompose(name, &children);
        }

        for (child, value) in children.iter().zip(values) {
            self.entry(child).push(*value);
        }

        self.notify(
            GraphEvent::new(EventKind::INPUT)
                .with_series(children.clone())
                .with_values(values.to_vec()),
        );
        self.series_by_names_mut(&children)
    }

    /// Default styling for freshly decomposed children.
    fn decompose(&mut self, name: &str, children: &[String]) {
        let step = self.config().vector_step_size;
        let height = self.config().vector_graph_height;
        for (child, (_, color)) in children.iter().zip(AXES) {
            self.entry(child)
                .set_group(name)
                .set_color(color)
                .set_step_size(step);
        }
        if let Some(last) = children.last() {
            self.entry(last).set_graph_height(height);
        }
        self.mark_composite(name);
        log::debug!("decomposed {name:?} into {} axis series", children.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventFilter;

    #[test]
    fn vector_children_get_axis_styling() {
        let mut store = SeriesStore::new();
        let children = store.add_vector3("v", (1.0, 2.0, 3.0));
        let names: Vec<&str> = children.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["vX", "vY", "vZ"]);

        let x = store.series("vX").unwrap();
        assert_eq!(x.color(), Some(Color32::RED));
        assert_eq!(x.min_step(), 0.5);
        assert_eq!(store.series("vY").unwrap().color(), Some(Color32::GREEN));
        assert_eq!(store.series("vZ").unwrap().color(), Some(Color32::from_rgb(0, 255, 255)));
        assert_eq!(store.group("v").unwrap().height(), 65.0);
        assert!(!store.contains("v"));
    }

    #[test]
    fn later_writes_do_not_restyle() {
        let mut store = SeriesStore::new();
        store.add_vector3("v", Vector3::default());
        store.get("vX").set_color(Color32::BLUE).set_step_size(3.0);
        store.add_vector3("v", [1.0, 1.0, 1.0]);
        let x = store.series("vX").unwrap();
        assert_eq!(x.color(), Some(Color32::BLUE));
        assert_eq!(x.min_step(), 3.0);
        assert_eq!(x.len(), 2);
    }

    #[test]
    fn removed_child_is_recreated_plain() {
        let mut store = SeriesStore::new();
        store.add_vector3("v", Vector3::default());
        store.clear("vY");
        store.add_vector3("v", Vector3::new(4.0, 5.0, 6.0));
        let y = store.series("vY").unwrap();
        assert_eq!(y.group(), None);
        assert_eq!(y.color(), None);
        assert_eq!(y.samples().iter().copied().collect::<Vec<_>>(), vec![5.0]);
    }

    #[test]
    fn quaternion_adds_w_and_one_event() {
        let mut store = SeriesStore::new();
        let rx = store.subscribe(EventFilter::all());
        let children = store.add_quaternion("q", Quaternion::IDENTITY);
        assert_eq!(children.len(), 4);
        assert_eq!(store.series("qW").unwrap().color(), Some(Color32::YELLOW));
        assert_eq!(store.series("qW").unwrap().last(), Some(1.0));

        let evt = rx.try_recv().unwrap();
        assert_eq!(evt.values, Some(vec![0.0, 0.0, 0.0, 1.0]));
        assert!(rx.try_recv().is_err());
    }
}
