use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::error::{EngineError, Result};

/// The engine's final answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    pub candidate: Candidate,

    /// Heuristic certainty in `[0.5, 1.0]`, not a probability
    pub confidence: f64,
}

/// Confidence for a pool of `remaining` candidates.
///
/// 1.0 for a single candidate, otherwise `1 - log2(n)/10` floored at 0.5.
#[must_use]
pub fn confidence_for(remaining: usize) -> f64 {
    if remaining <= 1 {
        return 1.0;
    }
    (1.0 - (remaining as f64).log2() / 10.0).max(0.5)
}

/// Pick the most decorated candidate, then the top scorer.
///
/// Ties beyond awards and points keep pool order.
pub fn guess_top_candidate(pool: &[Candidate]) -> Result<Guess> {
    let mut best: Option<&Candidate> = None;
    for candidate in pool {
        let better = best.map_or(true, |b| {
            (candidate.awards_count, candidate.average_points)
                .partial_cmp(&(b.awards_count, b.average_points))
                .is_some_and(std::cmp::Ordering::is_gt)
        });
        if better {
            best = Some(candidate);
        }
    }
    let candidate = best.ok_or(EngineError::EmptyPool)?.clone();
    Ok(Guess {
        candidate,
        confidence: confidence_for(pool.len()),
    })
}
