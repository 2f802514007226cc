//! Cosine-similarity ranking against a target flavor

use crate::catalog::Ingredient;
use crate::flavor::{FlavorKey, FlavorVector, PartialFlavor};

/// Denominator floor for cosine similarity
pub const SIMILARITY_EPSILON: f64 = 1e-6;

/// Anything that carries a flavor signature
pub trait HasFlavor {
    fn flavor(&self) -> &PartialFlavor;
}

impl HasFlavor for Ingredient {
    fn flavor(&self) -> &PartialFlavor {
        &self.flavors
    }
}

impl HasFlavor for PartialFlavor {
    fn flavor(&self) -> &PartialFlavor {
        self
    }
}

impl<T: HasFlavor + ?Sized> HasFlavor for &T {
    fn flavor(&self) -> &PartialFlavor {
        (**self).flavor()
    }
}

/// Cosine similarity over the seven dimensions, missing ones read as 0
pub fn cosine(target: &FlavorVector, candidate: &PartialFlavor) -> f64 {
    let mut acc = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for key in FlavorKey::ALL {
        let a = target.get(key);
        let b = candidate.get(key);
        acc += a * b;
        norm_a += a * a;
        norm_b += b * b;
    }
    acc / (norm_a.sqrt() * norm_b.sqrt()).max(SIMILARITY_EPSILON)
}

/// Rank `pool` by descending similarity to `target`
///
/// The sort is stable: equal scores keep their pool order. `top_n` truncates
/// the result when given.
pub fn rank_by_flavor<T: HasFlavor>(target: &FlavorVector, pool: Vec<T>, top_n: Option<usize>) -> Vec<T> {
    let mut scored: Vec<(f64, T)> = pool
        .into_iter()
        .map(|item| (cosine(target, item.flavor()), item))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    let mut out: Vec<T> = scored.into_iter().map(|(_, item)| item).collect();
    if let Some(n) = top_n {
        out.truncate(n);
    }
    out
}

/// Best match in `pool`, if any
pub fn best_match<T: HasFlavor>(target: &FlavorVector, pool: Vec<T>) -> Option<T> {
    rank_by_flavor(target, pool, Some(1)).into_iter().next()
}
