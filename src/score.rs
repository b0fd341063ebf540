use crate::config::Taxonomy;
use std::collections::BTreeSet;

/// Weighted daily FRS in `[0, 5]`.
///
/// Every activity contributes its tier weight to the denominator. Boolean
/// activities earn their full weight when checked; the count-based activity
/// earns `weight * min(progress / count_target, 1)` whether or not it is
/// checked, so progress past the target never earns more than the weight.
pub fn compute_score(taxonomy: &Taxonomy, completed: &BTreeSet<String>, count_progress: u32) -> f64 {
    let mut total_weight = 0.0;
    let mut earned = 0.0;

    for tier in &taxonomy.tiers {
        for item in &tier.items {
            total_weight += tier.weight;
            if item.count_based {
                // max(1) keeps a zero target from dividing to NaN.
                let target = f64::from(taxonomy.count_target.max(1));
                let fraction = (f64::from(count_progress) / target).min(1.0);
                earned += tier.weight * fraction;
            } else if completed.contains(&item.id) {
                earned += tier.weight;
            }
        }
    }

    if total_weight > 0.0 {
        earned / total_weight * 5.0
    } else {
        0.0
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
