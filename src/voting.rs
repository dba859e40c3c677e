//! Majority vote over the five heuristic picks.
//!
//! The final k is the most frequent pick. When several values share the top
//! count, the largest tied k wins: among equally supported answers the finer
//! clustering is preferred, and the rule does not depend on method order.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::domain::{TieBreak, Vote, VotingResult};

pub fn aggregate(votes: [Vote; 5]) -> VotingResult {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for vote in &votes {
        *counts.entry(vote.k).or_default() += 1;
    }

    let top = counts.values().copied().max().unwrap_or(0);
    // BTreeMap iterates in ascending k.
    let tied: Vec<usize> = counts
        .iter()
        .filter(|&(_, &c)| c == top)
        .map(|(&k, _)| k)
        .collect();
    let final_k = tied.last().copied().unwrap_or(0);

    let tie_break = (tied.len() > 1).then(|| {
        debug!(?tied, count = top, chosen = final_k, "tie among modes");
        TieBreak { tied, count: top }
    });

    info!(final_k, support = top, "voting complete");
    VotingResult {
        final_k,
        votes,
        tie_break,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Method;

    fn ballot(ks: [usize; 5]) -> [Vote; 5] {
        std::array::from_fn(|i| Vote {
            method: Method::ALL[i],
            k: ks[i],
            scores: Vec::new(),
            fallback: false,
        })
    }

    #[test]
    fn clear_majority() {
        let result = aggregate(ballot([4, 3, 4, 4, 4]));
        assert_eq!(result.final_k, 4);
        assert_eq!(result.support(), 4);
        assert!(result.tie_break.is_none());
        assert_eq!(result.vote(Method::LastSignificantDrop).k, 3);
    }

    #[test]
    fn plurality_without_majority() {
        let result = aggregate(ballot([2, 3, 5, 5, 7]));
        assert_eq!(result.final_k, 5);
        assert!(result.tie_break.is_none());
    }

    #[test]
    fn two_way_tie_prefers_larger_k() {
        let result = aggregate(ballot([3, 6, 3, 6, 9]));
        assert_eq!(result.final_k, 6);
        let tie = result.tie_break.unwrap();
        assert_eq!(tie.tied, vec![3, 6]);
        assert_eq!(tie.count, 2);
    }

    #[test]
    fn tie_break_ignores_method_order() {
        let a = aggregate(ballot([6, 3, 6, 3, 9]));
        let b = aggregate(ballot([3, 6, 3, 6, 9]));
        assert_eq!(a.final_k, b.final_k);
    }

    #[test]
    fn all_different_picks_largest() {
        let result = aggregate(ballot([5, 1, 4, 2, 3]));
        assert_eq!(result.final_k, 5);
        assert_eq!(result.tie_break.unwrap().tied, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn unanimous() {
        let result = aggregate(ballot([8; 5]));
        assert_eq!(result.final_k, 8);
        assert_eq!(result.support(), 5);
    }
}
