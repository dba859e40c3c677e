//! Method 3: the k where the improvement rate changes most sharply.

use crate::domain::{Curve, Method, Vote};
use crate::heuristics::{HeuristicInput, argmax};

pub fn estimate(input: &HeuristicInput<'_>) -> Vote {
    let scores = input.second_deltas.points().to_vec();
    match argmax(&scores) {
        Some(best) => Vote {
            method: Method::MaxSecondDelta,
            k: best.k,
            scores,
            fallback: false,
        },
        None => input.fallback_vote(Method::MaxSecondDelta, scores),
    }
}
