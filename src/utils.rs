//! Utility functions for the matchmaking service

use crate::types::{MatchId, Score};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique match ID
pub fn generate_match_id() -> MatchId {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Compute the inclusive score band around `score` for the given tolerance
///
/// A tolerance of 0.05 yields `[round(score * 0.95), round(score * 1.05)]`,
/// matching the "comparable wealth" rule. Intentionally crude: a symmetric
/// percentage band, not a rating system.
pub fn score_band(score: Score, tolerance: f64) -> (Score, Score) {
    let min = (score as f64 * (1.0 - tolerance)).round() as Score;
    let max = (score as f64 * (1.0 + tolerance)).round() as Score;
    (min, max)
}

/// Check whether `candidate` lies within the tolerance band of `score`
pub fn scores_within_band(score: Score, candidate: Score, tolerance: f64) -> bool {
    let (min, max) = score_band(score, tolerance);
    candidate >= min && candidate <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique_match_ids() {
        let id1 = generate_match_id();
        let id2 = generate_match_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_score_band_five_percent() {
        assert_eq!(score_band(100, 0.05), (95, 105));
        assert_eq!(score_band(1000, 0.05), (950, 1050));
    }

    #[test]
    fn test_score_band_rounds_half_up() {
        // 50 * 0.95 = 47.5 and 50 * 1.05 = 52.5; both round away from zero
        assert_eq!(score_band(50, 0.05), (48, 53));
    }

    #[test]
    fn test_score_band_zero_score() {
        assert_eq!(score_band(0, 0.05), (0, 0));
    }

    #[test]
    fn test_scores_within_band() {
        assert!(scores_within_band(100, 95, 0.05));
        assert!(scores_within_band(100, 105, 0.05));
        assert!(scores_within_band(100, 100, 0.05));
        assert!(!scores_within_band(100, 94, 0.05));
        assert!(!scores_within_band(100, 106, 0.05));
    }

    #[test]
    fn test_band_membership_is_not_symmetric() {
        // Rounding the edges makes membership one-directional here: 380 sits
        // exactly on the lower edge of 400's band [380, 420], while 400 is
        // just past the top of 380's band [361, 399].
        assert!(scores_within_band(400, 380, 0.05));
        assert!(!scores_within_band(380, 400, 0.05));
    }
}
