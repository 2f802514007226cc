//! Micro-tuning optimizer
//!
//! Bounded greedy search over role amounts. Each round finds the flavor
//! dimension (body excluded) with the largest absolute error against the
//! target and nudges the first role whose primary dimension matches it by
//! one step in the error-reducing direction.

use moodmix_common::flavor::{FlavorKey, FlavorVector, PartialFlavor};

/// Errors at or below this stop tuning
pub const TUNE_TOLERANCE: f64 = 0.02;

/// One selected ingredient as seen by the tuner
#[derive(Debug, Clone, Copy)]
pub struct TuneLine<'a> {
    pub flavor: &'a PartialFlavor,
    pub role: &'a str,
}

/// Tuning parameters, clamped on construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuneParams {
    iterations: u32,
    step_ml: f64,
    keep_total: bool,
}

impl TuneParams {
    /// `iterations` is clamped to 1–5, `step_ml` to 1–10
    pub fn new(iterations: u32, step_ml: f64, keep_total: bool) -> Self {
        let step_ml = if step_ml.is_finite() { step_ml.clamp(1.0, 10.0) } else { 5.0 };
        Self {
            iterations: iterations.clamp(1, 5),
            step_ml,
            keep_total,
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn step_ml(&self) -> f64 {
        self.step_ml
    }

    pub fn keep_total(&self) -> bool {
        self.keep_total
    }
}

/// Flavor dimension a role mainly drives
pub fn role_primary_dim(role: &str) -> Option<FlavorKey> {
    let r = role.to_lowercase();
    if r.contains("citrus") || r.contains("sour") {
        Some(FlavorKey::Sour)
    } else if r.contains("sweet") || r.contains("syrup") {
        Some(FlavorKey::Sweet)
    } else if r.contains("bitter") {
        Some(FlavorKey::Bitter)
    } else if r.contains("aroma") || r.contains("liqueur") {
        Some(FlavorKey::Aroma)
    } else {
        None
    }
}

/// Role absorbing volume changes: the first mixer, else the first base
fn compensator_index(lines: &[TuneLine<'_>]) -> Option<usize> {
    let roles: Vec<String> = lines.iter().map(|l| l.role.to_lowercase()).collect();
    roles
        .iter()
        .position(|r| r.contains("mixer"))
        .or_else(|| roles.iter().position(|r| r.contains("base")))
}

/// Amount-weighted flavor of `lines` at `amounts`
pub fn blend(lines: &[TuneLine<'_>], amounts: &[f64]) -> FlavorVector {
    FlavorVector::weighted_average(lines.iter().zip(amounts).map(|(l, a)| (l.flavor, *a)))
}

/// Dimension with the largest absolute error, body excluded
///
/// Ties keep the first dimension in canonical order.
pub fn worst_dimension(current: &FlavorVector, target: &FlavorVector) -> (FlavorKey, f64) {
    let mut worst = (FlavorKey::Sweet, -1.0);
    for key in FlavorKey::ALL.into_iter().filter(|k| *k != FlavorKey::Body) {
        let err = (target.get(key) - current.get(key)).abs();
        if err > worst.1 {
            worst = (key, err);
        }
    }
    worst
}

/// Tune `amounts` toward `target`
///
/// With `keep_total` the opposite change goes to the compensating role, and
/// a transfer never takes more than that role holds, so the total is
/// preserved exactly. Tuning stops early when the error is within
/// [`TUNE_TOLERANCE`], when no role drives the worst dimension, when
/// `keep_total` is set and no separate compensating role exists, or when a
/// step cannot move any volume. In the last case the amounts may come back
/// unchanged even though the target is not met.
pub fn micro_tune_amounts(lines: &[TuneLine<'_>], amounts: &[f64], target: &FlavorVector, params: &TuneParams) -> Vec<f64> {
    let mut out = amounts.to_vec();
    let compensator = compensator_index(lines);

    for _ in 0..params.iterations {
        let current = blend(lines, &out);
        let (dim, err) = worst_dimension(&current, target);
        if err <= TUNE_TOLERANCE {
            break;
        }
        let Some(j) = lines.iter().position(|l| role_primary_dim(l.role) == Some(dim)) else {
            break;
        };
        let sign = if target.get(dim) >= current.get(dim) { 1.0 } else { -1.0 };
        let mut delta = (out[j] + sign * params.step_ml).max(0.0) - out[j];

        let compensator = if params.keep_total {
            let Some(c) = compensator.filter(|&c| c != j) else {
                break;
            };
            if delta > 0.0 {
                delta = delta.min(out[c]);
            }
            Some(c)
        } else {
            None
        };
        // stalled: the role is already at 0 or the compensator is empty
        if delta == 0.0 {
            break;
        }
        out[j] += delta;
        if let Some(c) = compensator {
            out[c] -= delta;
        }
    }
    out
}
