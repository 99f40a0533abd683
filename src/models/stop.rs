//! Delivery points, stops, and time window types.

use serde::{Deserialize, Serialize};

use super::GeoPoint;
use crate::error::InvalidInput;

/// A service time window at a delivery point.
///
/// Carried through the optimizer unchanged; routes are not checked against
/// it.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.ready() <= tw.due());
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::InvalidTimeWindow`] if `ready > due` or either
    /// value is non-finite.
    pub fn new(ready: f64, due: f64) -> Result<Self, InvalidInput> {
        let tw = Self { ready, due };
        if !tw.is_valid() {
            return Err(InvalidInput::InvalidTimeWindow { ready, due });
        }
        Ok(tw)
    }

    /// Earliest allowable arrival time.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest allowable arrival time.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.ready.is_finite() && self.due.is_finite() && self.ready <= self.due
    }
}

/// A point to deliver to, as supplied by the caller.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::models::{DeliveryPoint, GeoPoint};
///
/// let p = DeliveryPoint::new(GeoPoint::new(40.7580, -73.9855).unwrap()).with_priority(2);
/// assert_eq!(p.priority(), Some(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPoint {
    #[serde(flatten)]
    point: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_window: Option<TimeWindow>,
}

impl DeliveryPoint {
    /// Creates a delivery point without priority or time window.
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            priority: None,
            time_window: None,
        }
    }

    /// Sets the delivery priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets a time window for this delivery.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Location of the delivery.
    pub fn point(&self) -> GeoPoint {
        self.point
    }

    /// Priority, if any.
    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    /// Time window, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }
}

impl From<GeoPoint> for DeliveryPoint {
    fn from(point: GeoPoint) -> Self {
        DeliveryPoint::new(point)
    }
}

/// A location in the distance matrix.
///
/// Stop 0 is the depot; delivery `k` of the request becomes stop `k + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    index: usize,
    point: GeoPoint,
    priority: Option<i32>,
    time_window: Option<TimeWindow>,
}

impl Stop {
    /// Creates the depot stop (index 0).
    pub fn depot(point: GeoPoint) -> Self {
        Self {
            index: 0,
            point,
            priority: None,
            time_window: None,
        }
    }

    /// Creates the stop for the delivery at `delivery_index` in the request.
    pub fn delivery(delivery_index: usize, delivery: &DeliveryPoint) -> Self {
        Self {
            index: delivery_index + 1,
            point: delivery.point,
            priority: delivery.priority,
            time_window: delivery.time_window,
        }
    }

    /// Builds the full stop list: depot first, then deliveries in order.
    pub fn from_request(depot: GeoPoint, deliveries: &[DeliveryPoint]) -> Vec<Stop> {
        std::iter::once(Stop::depot(depot))
            .chain(
                deliveries
                    .iter()
                    .enumerate()
                    .map(|(i, d)| Stop::delivery(i, d)),
            )
            .collect()
    }

    /// Matrix index of this stop.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` for the depot.
    pub fn is_depot(&self) -> bool {
        self.index == 0
    }

    /// Coordinates of this stop.
    pub fn point(&self) -> GeoPoint {
        self.point
    }

    /// Priority, if any.
    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    /// Time window, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }
}
