//! Light bar pairing into armor candidates.
//!
//! Every unordered pair of bars is tested independently against five
//! geometric predicates. A bar may take part in several accepted pairs unless
//! [`PairingParams::exclusive_bars`] asks for [`dedup_shared_bars`].

use armor_targets_core::{ArmorCandidate, AxisRect, DigitReading, LightBar, PairMetrics};
use log::debug;

use crate::params::PairingParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

fn relative_diff(a: f32, b: f32) -> f32 {
    let m = a.max(b);
    if m <= 0.0 {
        return f32::INFINITY;
    }
    (a - b).abs() / m
}

/// Measure the five pairing quantities for an ordered `(left, right)` pair.
pub fn pair_metrics(left: &LightBar, right: &LightBar) -> PairMetrics {
    let (w_l, h_l) = left.pairing_size();
    let (w_r, h_r) = right.pairing_size();

    let size_ratio = relative_diff(w_l * h_l, w_r * h_r);
    let angle_diff = ((left.rect.angle + 45.0).abs() - (right.rect.angle + 45.0).abs()).abs();
    let height_ratio = relative_diff(h_l, h_r);
    let width_ratio = relative_diff(w_l, w_r);

    let d = (right.center() - left.center()).norm();
    let m = h_l.max(h_r).max(w_l).max(w_r);
    let panel_ratio = if m > 0.0 { d / m } else { f32::INFINITY };

    PairMetrics {
        size_ratio,
        angle_diff,
        height_ratio,
        width_ratio,
        panel_ratio,
    }
}

/// True when all five predicates hold.
pub fn accepts(metrics: &PairMetrics, params: &PairingParams) -> bool {
    metrics.size_ratio < params.max_size_ratio
        && metrics.angle_diff < params.max_angle_diff
        && metrics.height_ratio <= params.max_height_ratio
        && metrics.width_ratio <= params.max_width_ratio
        && params
            .panel_ranges
            .iter()
            .any(|&[lo, hi]| metrics.panel_ratio >= lo && metrics.panel_ratio <= hi)
}

/// Test one pair; order of `a` and `b` does not matter. The left bar has
/// the smaller center x, then the smaller center y.
pub fn try_pair(a: &LightBar, b: &LightBar, params: &PairingParams) -> Option<ArmorCandidate> {
    let (ca, cb) = (a.center(), b.center());
    let (left, right) = if (ca.x, ca.y) > (cb.x, cb.y) {
        (b, a)
    } else {
        (a, b)
    };
    let metrics = pair_metrics(left, right);
    if !accepts(&metrics, params) {
        return None;
    }
    let corners = [left.rect.corners(), right.rect.corners()];
    let bbox = AxisRect::enclosing(corners.iter().flatten())?;
    Some(ArmorCandidate {
        left: *left,
        right: *right,
        bbox,
        metrics,
        distance: None,
        digit: DigitReading::NotRecognized,
    })
}

fn pairs_from(bars: &[LightBar], i: usize, params: &PairingParams) -> Vec<ArmorCandidate> {
    bars[i + 1..]
        .iter()
        .filter_map(|b| try_pair(&bars[i], b, params))
        .collect()
}

/// Pair light bars into armor candidates.
///
/// Candidates are emitted in `(i, j)` order with `i < j` over the input.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(bars, params), fields(bars = bars.len()))
)]
pub fn pair_light_bars(bars: &[LightBar], params: &PairingParams) -> Vec<ArmorCandidate> {
    #[cfg(feature = "rayon")]
    let rows: Vec<Vec<ArmorCandidate>> = (0..bars.len())
        .into_par_iter()
        .map(|i| pairs_from(bars, i, params))
        .collect();
    #[cfg(not(feature = "rayon"))]
    let rows: Vec<Vec<ArmorCandidate>> = (0..bars.len())
        .map(|i| pairs_from(bars, i, params))
        .collect();

    let armors: Vec<ArmorCandidate> = rows.into_iter().flatten().collect();
    debug!("armor pairing: {} candidates from {} bars", armors.len(), bars.len());

    if params.exclusive_bars {
        dedup_shared_bars(armors, params)
    } else {
        armors
    }
}

/// Lower is better: relative size mismatch plus normalized tilt mismatch.
pub fn pair_score(metrics: &PairMetrics, params: &PairingParams) -> f32 {
    let angle_term = if params.max_angle_diff > 0.0 {
        metrics.angle_diff / params.max_angle_diff
    } else {
        0.0
    };
    metrics.size_ratio + angle_term
}

/// Keep at most one candidate per light bar.
///
/// Candidates are visited best score first (ties in emission order); a
/// candidate survives only if neither of its bars was claimed already.
/// Survivors keep their original relative order.
pub fn dedup_shared_bars(
    armors: Vec<ArmorCandidate>,
    params: &PairingParams,
) -> Vec<ArmorCandidate> {
    let mut order: Vec<usize> = (0..armors.len()).collect();
    order.sort_by(|&a, &b| {
        pair_score(&armors[a].metrics, params)
            .partial_cmp(&pair_score(&armors[b].metrics, params))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut claimed: Vec<LightBar> = Vec::new();
    let mut keep = vec![false; armors.len()];
    for idx in order {
        let armor = &armors[idx];
        if claimed.contains(&armor.left) || claimed.contains(&armor.right) {
            continue;
        }
        claimed.push(armor.left);
        claimed.push(armor.right);
        keep[idx] = true;
    }

    armors
        .into_iter()
        .zip(keep)
        .filter_map(|(armor, k)| k.then_some(armor))
        .collect()
}
