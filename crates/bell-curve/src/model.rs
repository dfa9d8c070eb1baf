use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};

use crate::error::DistributionError;
use crate::jitter::place_under_curve;
use fund_core::{stats, FundFinalScore};

pub const DEFAULT_JITTER_FRACTION: f64 = 0.25;
pub const MAX_JITTER_FRACTION: f64 = 0.5;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;
pub const DEFAULT_TOP_N: usize = 3;
pub const DEFAULT_CURVE_POINTS: usize = 100;

/// Curve spans `mean +/- CURVE_SIGMAS * std_dev`.
pub const CURVE_SIGMAS: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionOptions {
    /// Jitter spread as a fraction of one standard deviation, applied in
    /// standardized units so the vertical offset is `jitter_fraction * peak_density`.
    pub jitter_fraction: f64,
    pub max_attempts: u32,
    pub top_n: usize,
    /// Fixed seed for reproducible placement; entropy when unset.
    pub seed: Option<u64>,
    pub curve_points: usize,
}

impl Default for DistributionOptions {
    fn default() -> Self {
        Self {
            jitter_fraction: DEFAULT_JITTER_FRACTION,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            top_n: DEFAULT_TOP_N,
            seed: None,
            curve_points: DEFAULT_CURVE_POINTS,
        }
    }
}

impl DistributionOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), DistributionError> {
        if !(self.jitter_fraction > 0.0 && self.jitter_fraction <= MAX_JITTER_FRACTION) {
            return Err(DistributionError::InvalidJitter(self.jitter_fraction));
        }
        if self.curve_points < 2 {
            return Err(DistributionError::InvalidOptions(format!(
                "curve needs at least 2 points, got {}",
                self.curve_points
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub density: f64,
}

/// One fund on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub fund: String,
    pub x: f64,
    pub y: f64,
    pub density_at_x: f64,
    pub highlight: bool,
    pub jittered: bool,
}

/// `mean +/- sigma * std_dev`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SigmaBand {
    pub sigma: u8,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionModel {
    pub mean: f64,
    pub std_dev: f64,
    pub curve: Vec<CurvePoint>,
    pub points: Vec<ScatterPoint>,
    /// Density at the mean.
    pub mean_marker: CurvePoint,
    /// Widest first: 3, 2, 1 sigma.
    pub bands: Vec<SigmaBand>,
}

impl DistributionModel {
    /// A model with zero spread has a flat, zero-height curve.
    pub fn is_degenerate(&self) -> bool {
        !(self.std_dev > 0.0 && self.std_dev.is_finite())
    }

    pub fn peak_density(&self) -> f64 {
        self.curve
            .iter()
            .map(|p| p.density)
            .fold(self.mean_marker.density, f64::max)
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.points.iter().filter(|p| p.highlight)
    }

    /// The six vertical sigma lines, left to right.
    pub fn sigma_lines(&self) -> Vec<(i8, f64)> {
        let mut lines: Vec<(i8, f64)> = self
            .bands
            .iter()
            .flat_map(|b| [(-(b.sigma as i8), b.lower), (b.sigma as i8, b.upper)])
            .collect();
        lines.sort_by_key(|(sigma, _)| *sigma);
        lines
    }
}

/// Build the bell-curve model for a set of funds' final scores.
pub fn build(
    scores: &[FundFinalScore],
    options: &DistributionOptions,
) -> Result<DistributionModel, DistributionError> {
    if scores.is_empty() {
        return Err(DistributionError::Empty);
    }
    options.validate()?;

    let values: Vec<f64> = scores.iter().map(|s| s.final_score).collect();
    let mean = stats::mean(&values);
    let std_dev = stats::sample_std_dev(&values);

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let highlights = top_n_mask(&values, options.top_n);

    let bands = [3u8, 2, 1]
        .into_iter()
        .map(|sigma| SigmaBand {
            sigma,
            lower: mean - sigma as f64 * std_dev,
            upper: mean + sigma as f64 * std_dev,
        })
        .collect();

    if !(std_dev > 0.0 && std_dev.is_finite()) {
        tracing::debug!(
            "Degenerate distribution over {} scores at mean {:.4}",
            scores.len(),
            mean
        );
        return Ok(DistributionModel {
            mean,
            std_dev,
            curve: vec![CurvePoint { x: mean, density: 0.0 }; options.curve_points],
            points: scores
                .iter()
                .zip(highlights)
                .map(|(s, highlight)| ScatterPoint {
                    fund: s.fund.clone(),
                    x: s.final_score,
                    y: 0.0,
                    density_at_x: 0.0,
                    highlight,
                    jittered: false,
                })
                .collect(),
            mean_marker: CurvePoint { x: mean, density: 0.0 },
            bands,
        });
    }

    let normal = Normal::new(mean, std_dev).map_err(|e| DistributionError::Density(e.to_string()))?;

    let lo = mean - CURVE_SIGMAS * std_dev;
    let step = 2.0 * CURVE_SIGMAS * std_dev / (options.curve_points - 1) as f64;
    let curve = (0..options.curve_points)
        .map(|i| {
            let x = lo + i as f64 * step;
            CurvePoint {
                x,
                density: normal.pdf(x),
            }
        })
        .collect();

    // Density scales with 1 / std_dev, so size the offset against the peak
    let peak = normal.pdf(mean);
    let spread = options.jitter_fraction * peak;
    let mut fallbacks = 0usize;
    let points: Vec<ScatterPoint> = scores
        .iter()
        .zip(highlights)
        .map(|(s, highlight)| {
            let density_at_x = normal.pdf(s.final_score);
            let placement = place_under_curve(&mut rng, density_at_x, spread, options.max_attempts);
            if !placement.jittered {
                fallbacks += 1;
            }
            ScatterPoint {
                fund: s.fund.clone(),
                x: s.final_score,
                y: placement.y,
                density_at_x,
                highlight,
                jittered: placement.jittered,
            }
        })
        .collect();

    if fallbacks > 0 {
        tracing::warn!(
            "{} of {} points fell back to the curve after {} jitter attempts",
            fallbacks,
            points.len(),
            options.max_attempts
        );
    }

    Ok(DistributionModel {
        mean,
        std_dev,
        curve,
        points,
        mean_marker: CurvePoint {
            x: mean,
            density: peak,
        },
        bands,
    })
}

/// Flag the `n` highest values. Ties keep input order.
pub fn top_n_mask(values: &[f64], n: usize) -> Vec<bool> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut mask = vec![false; values.len()];
    for &idx in order.iter().take(n) {
        mask[idx] = true;
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: &[(&str, f64)]) -> Vec<FundFinalScore> {
        values
            .iter()
            .map(|(fund, score)| FundFinalScore::new(*fund, *score))
            .collect()
    }

    fn five_funds() -> Vec<FundFinalScore> {
        scores(&[
            ("Alpha", 0.55),
            ("Beta", 0.72),
            ("Gamma", 0.40),
            ("Delta", 0.66),
            ("Epsilon", 0.61),
        ])
    }

    #[test]
    fn test_empty_is_an_error() {
        let err = build(&[], &DistributionOptions::default()).unwrap_err();
        assert_eq!(err, DistributionError::Empty);
    }

    #[test]
    fn test_invalid_jitter_fraction() {
        for fraction in [0.0, -0.1, 0.75, f64::NAN] {
            let options = DistributionOptions {
                jitter_fraction: fraction,
                ..DistributionOptions::default()
            };
            assert!(matches!(
                build(&five_funds(), &options),
                Err(DistributionError::InvalidJitter(_))
            ));
        }
    }

    #[test]
    fn test_mean_and_curve() {
        let model = build(&five_funds(), &DistributionOptions::default().with_seed(1)).unwrap();
        let values = [0.55, 0.72, 0.40, 0.66, 0.61];
        assert!((model.mean - stats::mean(&values)).abs() < 1e-10);
        assert!((model.std_dev - stats::sample_std_dev(&values)).abs() < 1e-10);

        assert_eq!(model.curve.len(), 100);
        let first = model.curve.first().unwrap();
        let last = model.curve.last().unwrap();
        assert!((first.x - (model.mean - 3.0 * model.std_dev)).abs() < 1e-10);
        assert!((last.x - (model.mean + 3.0 * model.std_dev)).abs() < 1e-10);

        // Peak of the normal density sits at the mean
        let expected_peak = 1.0 / (model.std_dev * (2.0 * std::f64::consts::PI).sqrt());
        assert!((model.mean_marker.density - expected_peak).abs() < 1e-10);
        assert!(model.peak_density() >= model.curve[50].density);
    }

    #[test]
    fn test_points_under_curve() {
        let model = build(&five_funds(), &DistributionOptions::default().with_seed(42)).unwrap();
        assert_eq!(model.points.len(), 5);
        for point in &model.points {
            assert!(point.y >= 0.0);
            assert!(point.y <= point.density_at_x);
        }
    }

    #[test]
    fn test_identical_scores_are_separated() {
        let funds = scores(&[
            ("Alpha", 0.55),
            ("Twin", 0.55),
            ("Beta", 0.72),
            ("Gamma", 0.40),
            ("Delta", 0.66),
        ]);

        let mut widest: f64 = 0.0;
        for seed in 0..50 {
            let model = build(&funds, &DistributionOptions::default().with_seed(seed)).unwrap();
            let gap = (model.points[0].y - model.points[1].y).abs();
            assert!(model.points[0].y <= model.points[0].density_at_x);
            widest = widest.max(gap / model.peak_density());
        }
        // Same separation regardless of how tight the scores are
        assert!(widest > 0.1, "widest gap was {:.4} of the peak", widest);
    }

    #[test]
    fn test_jitter_spread_scales_with_peak() {
        let tight: Vec<FundFinalScore> = five_funds()
            .into_iter()
            .map(|s| FundFinalScore::new(s.fund, 0.5 + (s.final_score - 0.5) / 100.0))
            .collect();
        let options = DistributionOptions::default().with_seed(17);
        let wide = build(&five_funds(), &options).unwrap();
        let narrow = build(&tight, &options).unwrap();

        for (w, n) in wide.points.iter().zip(&narrow.points) {
            let w_drop = (w.density_at_x - w.y) / wide.peak_density();
            let n_drop = (n.density_at_x - n.y) / narrow.peak_density();
            assert!((w_drop - n_drop).abs() < 1e-6);
        }
    }

    #[test]
    fn test_top_three_highlighted() {
        let model = build(&five_funds(), &DistributionOptions::default().with_seed(3)).unwrap();
        let mut flagged: Vec<&str> = model.highlighted().map(|p| p.fund.as_str()).collect();
        flagged.sort();
        assert_eq!(flagged, vec!["Beta", "Delta", "Epsilon"]);
    }

    #[test]
    fn test_top_n_ties_keep_input_order() {
        let mask = top_n_mask(&[0.5, 0.7, 0.5, 0.5], 2);
        assert_eq!(mask, vec![true, true, false, false]);
        assert_eq!(top_n_mask(&[0.1, 0.2], 5), vec![true, true]);
    }

    #[test]
    fn test_seeded_builds_are_reproducible() {
        let options = DistributionOptions::default().with_seed(2024);
        let a = build(&five_funds(), &options).unwrap();
        let b = build(&five_funds(), &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_score_is_degenerate() {
        let model = build(
            &scores(&[("Solo", 0.6)]),
            &DistributionOptions::default().with_seed(1),
        )
        .unwrap();
        assert!(model.is_degenerate());
        assert_eq!(model.std_dev, 0.0);
        assert_eq!(model.curve.len(), 100);
        assert!(model.curve.iter().all(|p| p.x == 0.6 && p.density == 0.0));
        assert_eq!(model.points[0].y, 0.0);
        assert!(model.points[0].highlight);
    }

    #[test]
    fn test_sigma_bands_and_lines() {
        let model = build(&five_funds(), &DistributionOptions::default().with_seed(9)).unwrap();
        let sigmas: Vec<u8> = model.bands.iter().map(|b| b.sigma).collect();
        assert_eq!(sigmas, vec![3, 2, 1]);
        assert!((model.bands[2].upper - (model.mean + model.std_dev)).abs() < 1e-10);

        let lines = model.sigma_lines();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].0, -3);
        assert_eq!(lines[5].0, 3);
        assert!(lines.windows(2).all(|w| w[0].1 < w[1].1));
    }
}
