//! LiveGraph crate root: re-exports and module wiring.
//!
//! Application code pushes samples under a string key every frame; the panel
//! draws each key's recent history as a scrolling line chart. Related series
//! can share one chart through a group name.
//!
//! - `data`: series ring buffers, the store, vector decomposition, viewport
//!   mapping and scrolling
//! - `events`: change notifications for hosts and loggers
//! - `config`: defaults and rendering constants
//! - `render`: chart painting over host drawing primitives
//! - `panel`: ready-made egui panel listing every chart
//!
//! ```no_run
//! let mut store = livegraph::SeriesStore::new();
//! store.add("fps", 60.0).set_limits(0.0, 120.0);
//! store.add_vector3("velocity", (1.0, 0.0, -0.5));
//! ```

use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;

pub mod config;
pub mod data;
pub mod events;
pub mod panel;
pub mod render;

pub use config::{ConfigError, GraphConfig, Theme};
pub use data::group::SeriesGroup;
pub use data::scroll::{ScrollController, ScrollState};
pub use data::series::{Series, SeriesLook, NO_SCROLL};
pub use data::store::{ChartKey, SeriesStore};
pub use data::vector::{Quaternion, Vector3};
pub use data::viewport::{ChartGeometry, HoverPoint, SeriesGeometry, ViewportMapper};
pub use events::{EventController, EventFilter, EventKind, GraphEvent};
pub use panel::{GraphPanel, PanelOptions};
pub use render::{ChartCanvas, ChartRenderer};

// Process-wide store for call sites that cannot be handed an explicit
// `SeriesStore`. Created on first access, emptied by `teardown`.
static GLOBAL_STORE: Lazy<Mutex<SeriesStore>> = Lazy::new(|| Mutex::new(SeriesStore::new()));

/// Lock the process-wide default store.
///
/// Do not hold the guard across frames; every writer and the panel share it.
pub fn global() -> MutexGuard<'static, SeriesStore> {
    GLOBAL_STORE.lock().unwrap_or_else(|e| e.into_inner())
}

/// Drop every series of the process-wide store.
pub fn teardown() {
    global().clear_all();
}
