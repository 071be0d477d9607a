//! Score calculator.
//!
//! Converts validator output and a question's point weight into a score.
//! Every score lies in `[0, weight]`.

/// Point weight used when a question does not configure one.
pub const DEFAULT_POINTS: f64 = 1.0;

/// Resolve a question's point weight.
///
/// Absent points fall back to `default_points`. Negative or non-finite
/// weights resolve to zero.
pub fn point_weight(points: Option<f64>, default_points: f64) -> f64 {
    let weight = points.unwrap_or(default_points);
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// All-or-nothing scoring.
pub fn binary_score(is_correct: bool, weight: f64) -> f64 {
    if is_correct {
        weight.max(0.0)
    } else {
        0.0
    }
}

/// Proportional scoring: `weight * hits / total`.
///
/// Returns 0 when `total` is 0.
pub fn partial_score(hits: usize, total: usize, weight: f64) -> f64 {
    let weight = weight.max(0.0);
    if total == 0 {
        return 0.0;
    }
    (weight * hits as f64 / total as f64).clamp(0.0, weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_defaults_and_floors() {
        assert_eq!(point_weight(Some(3.0), DEFAULT_POINTS), 3.0);
        assert_eq!(point_weight(None, DEFAULT_POINTS), 1.0);
        assert_eq!(point_weight(None, 2.5), 2.5);
        assert_eq!(point_weight(Some(-4.0), DEFAULT_POINTS), 0.0);
        assert_eq!(point_weight(Some(f64::INFINITY), DEFAULT_POINTS), 0.0);
    }

    #[test]
    fn binary() {
        assert_eq!(binary_score(true, 2.0), 2.0);
        assert_eq!(binary_score(false, 2.0), 0.0);
    }

    #[test]
    fn partial_is_proportional() {
        assert_eq!(partial_score(1, 2, 2.0), 1.0);
        assert_eq!(partial_score(2, 2, 1.0), 1.0);
        assert_eq!(partial_score(0, 3, 6.0), 0.0);
        let third = partial_score(1, 3, 1.0);
        assert!((third - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn partial_never_exceeds_weight() {
        assert_eq!(partial_score(5, 2, 2.0), 2.0);
        assert_eq!(partial_score(1, 0, 2.0), 0.0);
        assert_eq!(partial_score(1, 1, -1.0), 0.0);
    }
}
