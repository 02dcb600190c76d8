//! # Geo/ETA Interpolator
//!
//! Pure helpers that renderers call with an order snapshot and "now". They
//! never touch engine state and always return values inside their bounds:
//! progress in `[0, 1]`, positions on the restaurant-customer segment, and a
//! non-negative ETA.

use crate::model::{GeoPoint, Order};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tunables for position and ETA interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteParams {
    /// Fraction of total progress before the driver leaves the restaurant.
    pub driver_start_fraction: f64,
    /// ETA reported the moment the driver leaves.
    pub max_eta_minutes: u32,
}

impl Default for RouteParams {
    fn default() -> Self {
        Self {
            driver_start_fraction: 0.6,
            max_eta_minutes: 12,
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    debug_assert!(!value.is_nan(), "progress must not be NaN");
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Elapsed time since creation over total duration, clamped to `[0, 1]`.
pub fn progress(order: &Order, now: DateTime<Utc>) -> f64 {
    let total_ms = order.total_duration().num_milliseconds();
    debug_assert!(total_ms > 0, "order timeline must span a positive duration");
    if total_ms <= 0 {
        return 1.0;
    }
    let elapsed_ms = (now - order.created_at).num_milliseconds();
    clamp_unit(elapsed_ms as f64 / total_ms as f64)
}

/// Progress of the delivery leg: 0 until `start_fraction` of the order has
/// elapsed, then linear up to 1 at delivery time.
pub fn adjusted_progress(order: &Order, now: DateTime<Utc>, start_fraction: f64) -> f64 {
    let start = clamp_unit(start_fraction);
    if start >= 1.0 {
        return if progress(order, now) >= 1.0 { 1.0 } else { 0.0 };
    }
    clamp_unit((progress(order, now) - start) / (1.0 - start))
}

/// Interpolated driver coordinate. Exactly the restaurant before the delayed
/// start, exactly the customer at or after delivery time.
pub fn driver_position(order: &Order, now: DateTime<Utc>, params: &RouteParams) -> GeoPoint {
    let t = adjusted_progress(order, now, params.driver_start_fraction);
    let from = order.location.restaurant;
    let to = order.location.customer;
    if t <= 0.0 {
        return from;
    }
    if t >= 1.0 {
        return to;
    }

    let point = GeoPoint::new(
        from.lat + (to.lat - from.lat) * t,
        from.lng + (to.lng - from.lng) * t,
    );
    debug_assert!(point.is_finite(), "interpolated position must be finite");
    if point.is_finite() {
        point
    } else {
        from
    }
}

/// Remaining minutes: `round(max_eta * (1 - adjusted))`, at least 1 until the
/// order is delivered, 0 afterwards.
pub fn eta_minutes(order: &Order, now: DateTime<Utc>, params: &RouteParams) -> u32 {
    if order.is_delivered() || progress(order, now) >= 1.0 {
        return 0;
    }
    let remaining = 1.0 - adjusted_progress(order, now, params.driver_start_fraction);
    let eta = (f64::from(params.max_eta_minutes) * remaining).round();
    (eta.max(0.0) as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chef, Driver, OrderCast, OrderId, OrderLocation, UserRef};
    use crate::simulation::timeline::{generate_timeline, total_duration};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap()
    }

    fn order() -> Order {
        let cast = OrderCast {
            chef: Chef {
                name: "Chef".into(),
                avatar: String::new(),
                rating: 4.8,
                specialty: "Noodles".into(),
            },
            driver: Driver {
                name: "Driver".into(),
                avatar: String::new(),
                rating: 4.9,
                vehicle: "Bike".into(),
            },
            location: OrderLocation {
                restaurant: GeoPoint::new(40.7128, -74.0060),
                customer: GeoPoint::new(40.7306, -73.9866),
            },
        };
        Order::new(
            OrderId(1),
            UserRef::new("u1", "Ada"),
            t0(),
            Vec::new(),
            cast,
            generate_timeline(t0()),
        )
    }

    #[test]
    fn test_position_at_creation_is_restaurant() {
        let order = order();
        let params = RouteParams::default();
        assert_eq!(driver_position(&order, t0(), &params), order.location.restaurant);
    }

    #[test]
    fn test_driver_waits_until_start_fraction() {
        let order = order();
        let params = RouteParams::default();
        let before = t0() + Duration::minutes(17);
        assert_eq!(adjusted_progress(&order, before, params.driver_start_fraction), 0.0);
        assert_eq!(driver_position(&order, before, &params), order.location.restaurant);
        assert_eq!(eta_minutes(&order, before, &params), params.max_eta_minutes);
    }

    #[test]
    fn test_no_extrapolation_past_delivery() {
        let order = order();
        let params = RouteParams::default();
        let late = t0() + total_duration() + Duration::hours(3);
        assert_eq!(progress(&order, late), 1.0);
        assert_eq!(driver_position(&order, late, &params), order.location.customer);
        assert_eq!(eta_minutes(&order, late, &params), 0);
    }

    #[test]
    fn test_order_driver_location_matches_helper() {
        let order = order();
        let params = RouteParams::default();
        let now = t0() + Duration::minutes(24);
        let position = order.driver_location(now, &params);
        assert_eq!(position, driver_position(&order, now, &params));
        assert_ne!(position, order.location.restaurant);
        assert_ne!(position, order.location.customer);
    }

    #[test]
    fn test_before_creation_clamps_to_zero() {
        let order = order();
        assert_eq!(progress(&order, t0() - Duration::minutes(5)), 0.0);
    }

    #[test]
    fn test_positions_stay_on_segment() {
        let order = order();
        let params = RouteParams::default();
        let r = order.location.restaurant;
        let c = order.location.customer;
        let (lat_lo, lat_hi) = (r.lat.min(c.lat), r.lat.max(c.lat));
        let (lng_lo, lng_hi) = (r.lng.min(c.lng), r.lng.max(c.lng));

        for secs in (-120..=(total_duration().num_seconds() + 120)).step_by(15) {
            let now = t0() + Duration::seconds(secs);
            let adjusted = adjusted_progress(&order, now, params.driver_start_fraction);
            assert!((0.0..=1.0).contains(&adjusted));

            let p = driver_position(&order, now, &params);
            assert!(p.lat >= lat_lo && p.lat <= lat_hi, "lat out of segment at {secs}s");
            assert!(p.lng >= lng_lo && p.lng <= lng_hi, "lng out of segment at {secs}s");
            assert_eq!(p, driver_position(&order, now, &params));
        }
    }

    #[test]
    fn test_eta_floor_is_one_minute_until_delivered() {
        let order = order();
        let params = RouteParams::default();
        let almost = t0() + total_duration() - Duration::seconds(1);
        assert_eq!(eta_minutes(&order, almost, &params), 1);
    }

    #[test]
    fn test_eta_halfway_through_delivery_leg() {
        let order = order();
        let params = RouteParams::default();
        // Leg runs from 18 to 30 minutes; 24 minutes is halfway.
        let halfway = t0() + Duration::minutes(24);
        assert_eq!(eta_minutes(&order, halfway, &params), 6);
    }
}
