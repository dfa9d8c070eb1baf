use rand::Rng;

/// Vertical position for one scatter point under the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub y: f64,
    /// False when every draw was rejected and the point fell back to the curve.
    pub jittered: bool,
}

/// Draw `offset ~ U(-spread, spread)` and place the point at
/// `density - offset`, accepting only `0 <= y <= density`.
///
/// At most `max_attempts` draws are made. After that the point sits on the
/// curve at `y = density`.
pub fn place_under_curve<R: Rng + ?Sized>(
    rng: &mut R,
    density: f64,
    spread: f64,
    max_attempts: u32,
) -> Placement {
    if spread > 0.0 && spread.is_finite() {
        for _ in 0..max_attempts {
            let offset = rng.gen_range(-spread..=spread);
            let y = density - offset;
            if (0.0..=density).contains(&y) {
                return Placement { y, jittered: true };
            }
        }
    }

    Placement {
        y: density,
        jittered: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_points_stay_under_curve() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let placement = place_under_curve(&mut rng, 2.5, 0.05, 64);
            assert!(placement.y >= 0.0 && placement.y <= 2.5);
        }
    }

    #[test]
    fn test_zero_density_falls_back() {
        let mut rng = StdRng::seed_from_u64(7);
        let placement = place_under_curve(&mut rng, 0.0, 0.05, 64);
        assert_eq!(placement.y, 0.0);
        assert!(!placement.jittered);
    }

    #[test]
    fn test_zero_attempts_keeps_density() {
        let mut rng = StdRng::seed_from_u64(7);
        let placement = place_under_curve(&mut rng, 1.2, 0.05, 0);
        assert_eq!(placement, Placement { y: 1.2, jittered: false });
    }

    #[test]
    fn test_zero_spread_keeps_density() {
        let mut rng = StdRng::seed_from_u64(7);
        let placement = place_under_curve(&mut rng, 1.2, 0.0, 64);
        assert!(!placement.jittered);
        assert_eq!(placement.y, 1.2);
    }
}
