use super::geometry::{area, Point};

/// Bisection tuning.
#[derive(Debug, Clone, Copy)]
pub struct BisectionConfig {
    /// Stop once the bracket is shorter than this (coordinate units).
    pub epsilon: f64,
    /// Hard cap on halvings; only reached for non-finite input.
    pub max_steps: u32,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.001,
            max_steps: 64,
        }
    }
}

/// Outcome of a split-point search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitSearch {
    /// Low end of the final bracket.
    pub point: Point,
    /// Halvings performed.
    pub steps: u32,
    /// False when `max_steps` ran out before the bracket shrank below epsilon.
    pub converged: bool,
    /// False when the area error had the same non-zero sign at both ends of the
    /// initial bracket, so no exact split lies between them.
    pub bracketed: bool,
}

/// Find `p2` on the segment `low`–`high` such that `area(p0, p1, p2) == target`.
///
/// The search assumes the area changes monotonically as `p2` moves from `low`
/// to `high`. It halves the bracket, keeping the half where the error changes
/// sign, and returns the low endpoint once the bracket is shorter than epsilon.
pub fn find_split_point(
    p0: Point,
    p1: Point,
    low: Point,
    high: Point,
    target: f64,
    config: &BisectionConfig,
) -> SplitSearch {
    let error = |p2: &Point| area(&p0, &p1, p2) - target;
    let tolerance = config.epsilon * config.epsilon;

    let bracketed = error(&low) * error(&high) <= 0.0;
    let (mut low, mut high) = (low, high);

    for steps in 0..config.max_steps {
        if low.distance_squared(&high) < tolerance {
            return SplitSearch {
                point: low,
                steps,
                converged: true,
                bracketed,
            };
        }
        let mid = low.midpoint(&high);
        if error(&low) * error(&mid) > 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }

    let converged = low.distance_squared(&high) < tolerance;
    if !converged {
        tracing::warn!(
            "Bisection gave up after {} steps (target area {}, bracket {:?} - {:?})",
            config.max_steps,
            target,
            low,
            high
        );
    }
    SplitSearch {
        point: low,
        steps: config.max_steps,
        converged,
        bracketed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn finds_point_for_target_area() {
        let config = BisectionConfig::default();
        let (a, b, c) = (p(0.0, 0.0), p(4.0, 0.0), p(2.0, 4.0));
        let result = find_split_point(a, b, c, b, 6.0, &config);
        assert!(result.converged);
        assert!(result.bracketed);
        assert!((area(&a, &b, &result.point) - 6.0).abs() < 0.01);
        assert!((result.point.x - 2.5).abs() < 0.01);
        assert!((result.point.y - 3.0).abs() < 0.01);
    }

    #[test]
    fn sweeps_targets_across_the_range() {
        let config = BisectionConfig::default();
        let (a, b, c) = (p(-3.0, 1.0), p(9.0, 2.0), p(1.0, 11.0));
        let full = area(&a, &b, &c);
        for k in 0..=10 {
            let target = full * k as f64 / 10.0;
            let result = find_split_point(a, b, c, b, target, &config);
            let got = area(&a, &b, &result.point);
            assert!((got - target).abs() < 0.05, "target {target}, got {got}");
        }
    }

    #[test]
    fn degenerate_triangle_returns_low_endpoint() {
        let config = BisectionConfig::default();
        let (a, b, c) = (p(0.0, 0.0), p(2.0, 2.0), p(5.0, 5.0));
        let result = find_split_point(a, b, c, b, 0.0, &config);
        assert!(result.converged);
        assert_eq!(result.point, c);
    }

    #[test]
    fn unbracketed_target_is_flagged() {
        let config = BisectionConfig::default();
        let (a, b, c) = (p(0.0, 0.0), p(4.0, 0.0), p(2.0, 4.0));
        let result = find_split_point(a, b, c, b, 100.0, &config);
        assert!(!result.bracketed);
        assert!(result.converged);
    }

    #[test]
    fn non_finite_input_hits_the_step_cap() {
        let config = BisectionConfig {
            epsilon: 0.001,
            max_steps: 32,
        };
        let (a, b, c) = (p(0.0, 0.0), p(4.0, 0.0), p(f64::NAN, 4.0));
        let result = find_split_point(a, b, c, b, 1.0, &config);
        assert!(!result.converged);
        assert_eq!(result.steps, 32);
    }
}
