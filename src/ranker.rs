//! Collapses a destination-reaching label multiset into a ranked list
//! (spec §4.6): sort ascending by weighted penalty, tie-broken by
//! `(arrival_time, transfers, max_transfer_difficulty)`.

use std::collections::HashMap;

use crate::ids::Criterion;
use crate::label::{LabelArena, LabelHandle};

/// One ranked entry: the label handle plus its precomputed penalty, kept
/// together so callers never need to recompute `weighted_penalty` after
/// sorting (spec §4.6 testable property 9: "the reported rank is
/// monotone nondecreasing in penalty").
#[derive(Clone, Copy)]
pub struct RankedLabel {
    pub handle: LabelHandle,
    pub penalty: f64,
}

/// Ranks every label in `labels` by `weighted_penalty(weights)` ascending,
/// breaking ties by `(arrival_time, transfers, max_transfer_difficulty)`.
/// Duplicate handles are not deduplicated here: `engine::search` already
/// only ever returns each surviving label once per bucket.
pub fn rank(labels: &[LabelHandle], arena: &LabelArena, weights: &HashMap<Criterion, f64>) -> Vec<RankedLabel> {
    let mut ranked: Vec<RankedLabel> = labels
        .iter()
        .map(|&handle| RankedLabel {
            handle,
            penalty: arena.get(handle).weighted_penalty(weights),
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.penalty
            .partial_cmp(&b.penalty)
            .expect("penalties never contain NaN")
            .then_with(|| {
                let la = arena.get(a.handle);
                let lb = arena.get(b.handle);
                la.arrival_time
                    .partial_cmp(&lb.arrival_time)
                    .expect("arrival times never contain NaN")
                    .then_with(|| la.transfers.cmp(&lb.transfers))
                    .then_with(|| {
                        la.max_transfer_difficulty
                            .partial_cmp(&lb.max_transfer_difficulty)
                            .expect("difficulties never contain NaN")
                    })
            })
    });

    ranked
}
