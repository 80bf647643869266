//! Change notifications emitted by the series store.
//!
//! Hosts subscribe through [`EventController`] and poll the returned receiver
//! once per frame. Each event carries a set of [`EventKind`] flags so a single
//! write can be both an `INPUT` (something changed, redraw) and a `DATA`
//! (here are the raw values) event.
//!
//! Events are emitted synchronously after the store mutation is fully applied,
//! so a redraw triggered by an event always observes the write behind it.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

// ─────────────────────────────────────────────────────────────────────────────
// EventKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

/// Bitflags describing the categories an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u32);

impl EventKind {
    /// The store changed in any way. Fired by every mutating call.
    pub const INPUT: Self = Self(1 << 0);
    /// Samples were appended; the event carries them in `values`.
    pub const DATA: Self = Self(1 << 1);
    /// Series were removed (clear-one or clear-all).
    pub const CLEARED: Self = Self(1 << 2);
    /// Visibility of one or more series changed.
    pub const VISIBILITY: Self = Self(1 << 3);

    /// Wildcard: matches every event kind.
    pub const ALL: Self = Self(u32::MAX);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == EventKind::ALL {
            return write!(f, "ALL");
        }
        let pairs: &[(EventKind, &str)] = &[
            (EventKind::INPUT, "INPUT"),
            (EventKind::DATA, "DATA"),
            (EventKind::CLEARED, "CLEARED"),
            (EventKind::VISIBILITY, "VISIBILITY"),
        ];
        let mut names = Vec::new();
        let mut known_bits = 0;
        for (kind, name) in pairs {
            known_bits |= kind.0;
            if self.contains(*kind) {
                names.push((*name).to_string());
            }
        }
        let extra = self.0 & !known_bits;
        if extra != 0 {
            names.push(format!("0x{:x}", extra));
        }
        write!(f, "{}", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GraphEvent
// ─────────────────────────────────────────────────────────────────────────────

/// A notification about a store mutation.
#[derive(Debug, Clone)]
pub struct GraphEvent {
    pub kinds: EventKind,
    /// Seconds since the controller was created.
    pub timestamp: f64,
    /// Series touched by the mutation (empty for clear-all).
    pub series: Vec<String>,
    /// Raw values appended by a sample write, in component order.
    pub values: Option<Vec<f32>>,
}

impl GraphEvent {
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            timestamp: 0.0,
            series: Vec::new(),
            values: None,
        }
    }

    pub(crate) fn with_series(mut self, series: Vec<String>) -> Self {
        self.series = series;
        self
    }

    pub(crate) fn with_values(mut self, values: Vec<f32>) -> Self {
        self.kinds |= EventKind::DATA;
        self.values = Some(values);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventFilter
// ─────────────────────────────────────────────────────────────────────────────

/// OR-mask selecting which events a subscriber receives.
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    pub const fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    pub const fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    #[inline]
    pub fn matches(&self, event: &GraphEvent) -> bool {
        event.kinds.intersects(self.mask)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventController
// ─────────────────────────────────────────────────────────────────────────────

struct Subscriber {
    filter: EventFilter,
    sender: Sender<GraphEvent>,
}

/// Distributes [`GraphEvent`]s to any number of channel subscribers.
///
/// Cloning shares the subscriber list, so a host can keep a clone and
/// subscribe late without holding the store.
#[derive(Clone)]
pub struct EventController {
    inner: Arc<Mutex<EventCtrlInner>>,
}

struct EventCtrlInner {
    subscribers: Vec<Subscriber>,
    start_instant: std::time::Instant,
}

impl EventController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventCtrlInner {
                subscribers: Vec::new(),
                start_instant: std::time::Instant::now(),
            })),
        }
    }

    /// Subscribe to events matching `filter`.
    pub fn subscribe(&self, filter: EventFilter) -> Receiver<GraphEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.subscribers.push(Subscriber { filter, sender: tx });
        rx
    }

    pub fn subscribe_all(&self) -> Receiver<GraphEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Number of live subscriptions (as of the last emit).
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .subscribers
            .len()
    }

    /// Deliver `event` to every matching subscriber.
    ///
    /// Subscribers whose receiver was dropped are removed when an event
    /// would have been delivered to them.
    pub fn emit(&self, mut event: GraphEvent) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        event.timestamp = inner.start_instant.elapsed().as_secs_f64();
        inner.subscribers.retain(|sub| {
            if sub.filter.matches(&event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                true
            }
        });
        log::trace!(
            "emitted {} for {:?} to {} subscriber(s)",
            event.kinds,
            event.series,
            inner.subscribers.len()
        );
    }
}

impl Default for EventController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventController")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_any_shared_bit() {
        let filter = EventFilter::only(EventKind::DATA);
        assert!(filter.matches(&GraphEvent::new(EventKind::INPUT | EventKind::DATA)));
        assert!(!filter.matches(&GraphEvent::new(EventKind::INPUT)));
        assert!(EventFilter::all().matches(&GraphEvent::new(EventKind::CLEARED)));
    }

    #[test]
    fn with_values_marks_data() {
        let evt = GraphEvent::new(EventKind::INPUT).with_values(vec![1.0, 2.0]);
        assert!(evt.kinds.contains(EventKind::DATA));
        assert!(evt.kinds.contains(EventKind::INPUT));
        assert_eq!(evt.values.as_deref(), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn controller_routes_by_filter() {
        let ctrl = EventController::new();
        let rx_all = ctrl.subscribe_all();
        let rx_data = ctrl.subscribe(EventFilter::only(EventKind::DATA));

        ctrl.emit(GraphEvent::new(EventKind::INPUT | EventKind::CLEARED));

        assert!(rx_all.try_recv().is_ok());
        assert!(rx_data.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_is_pruned() {
        let ctrl = EventController::new();
        let rx1 = ctrl.subscribe_all();
        let rx2 = ctrl.subscribe_all();
        drop(rx1);

        ctrl.emit(GraphEvent::new(EventKind::INPUT));
        assert!(rx2.try_recv().is_ok());
        assert_eq!(ctrl.subscriber_count(), 1);
    }

    #[test]
    fn display_joins_names() {
        assert_eq!(format!("{}", EventKind::INPUT | EventKind::DATA), "INPUT|DATA");
        assert_eq!(format!("{}", EventKind::ALL), "ALL");
        assert_eq!(format!("{}", EventKind(0)), "EMPTY");
        assert!(format!("{}", EventKind(1 << 31)).starts_with("0x"));
    }
}
