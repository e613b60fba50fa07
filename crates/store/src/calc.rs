//! Derived fields.
//!
//! Pure functions, recomputed on every save. Callers never supply these
//! values themselves.

/// `quantity × unit_price`.
#[must_use]
pub fn cost(quantity: f64, unit_price: f64) -> f64 {
    quantity * unit_price
}

/// Distance between two odometer readings. Negative when the readings are
/// reversed.
#[must_use]
pub fn distance(previous: i64, current: i64) -> i64 {
    current - previous
}

/// Liters per 100 km. Zero whenever `distance <= 0`.
#[must_use]
pub fn average_consumption(quantity: f64, distance: i64) -> f64 {
    if distance <= 0 {
        return 0.0;
    }
    quantity / distance as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_multiplies() {
        assert_eq!(cost(40.0, 1.5), 60.0);
        assert_eq!(cost(0.0, 1.5), 0.0);
    }

    #[test]
    fn distance_subtracts_previous() {
        assert_eq!(distance(1000, 1500), 500);
        assert_eq!(distance(1500, 1000), -500);
    }

    #[test]
    fn average_over_positive_distance() {
        assert_eq!(average_consumption(40.0, 500), 40.0 / 500.0 * 100.0);
        assert!((average_consumption(40.0, 500) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn average_is_zero_without_distance() {
        assert_eq!(average_consumption(40.0, 0), 0.0);
        assert_eq!(average_consumption(40.0, -500), 0.0);
    }
}
