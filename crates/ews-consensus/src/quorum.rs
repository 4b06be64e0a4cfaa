//! The fan-in quorum reduction shared by the sensor-value (C2) and score (C3)
//! consensus engines (spec §4.2, §4.4). Pure, synchronous, and
//! storage-independent: callers are responsible for selecting the windowed,
//! latest-per-node participant set before calling [`reduce`].

use chrono::{DateTime, Utc};
use ews_types::ConsensusMethod;
use std::collections::HashMap;

/// One value contributed by one distinct node within the consensus window.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Reporting node.
    pub node_id: String,
    /// The value being reconciled (a sensor reading, or an integer `totalScore` as `f64`).
    pub value: f64,
    /// When the value was observed.
    pub observed_at: DateTime<Utc>,
}

/// How the average-fallback band is checked: a relative tolerance (sensor
/// values, spec §4.2: `|v - avg| / avg <= 0.20`) or an absolute one (scores,
/// spec §4.4: `scoreThreshold = 1`).
#[derive(Debug, Clone, Copy)]
pub enum Tolerance {
    /// `|v - avg| / avg <= bound`.
    Relative(f64),
    /// `|v - avg| <= bound`.
    Absolute(f64),
}

impl Tolerance {
    fn satisfied_by(self, value: f64, avg: f64) -> bool {
        match self {
            Tolerance::Relative(bound) => {
                if avg == 0.0 {
                    value == 0.0
                } else {
                    ((value - avg) / avg).abs() <= bound
                }
            }
            Tolerance::Absolute(bound) => (value - avg).abs() <= bound,
        }
    }
}

/// Outcome of a quorum reduction.
#[derive(Debug, Clone)]
pub struct ConsensusOutcome {
    /// The agreed (or best-effort) value.
    pub value: f64,
    /// Timestamp associated with the outcome (spec §4.2 step 3/4: the latest
    /// reading's timestamp for `latest`/`majority`, or the latest participant
    /// overall for `average`/`none`).
    pub timestamp: DateTime<Utc>,
    /// Whether the result is usable for downstream authoritative state.
    pub valid: bool,
    /// How the outcome was derived.
    pub method: ConsensusMethod,
    /// The participants the outcome was computed from (after window/latest-per-node filtering).
    pub participants: Vec<Participant>,
}

/// Reduce a windowed, latest-per-node participant set to a single value,
/// following the algorithm of spec §4.2 steps 2-4 (and its §4.4 parameterization
/// for scores: `agreement_window = 5s`, `tolerance = Absolute(1.0)`, grouping on
/// integer `totalScore`).
///
/// `participants` must already be windowed and deduplicated to one entry per
/// node — this function does not re-filter by node.
pub fn reduce(
    mut participants: Vec<Participant>,
    agreement_window: chrono::Duration,
    tolerance: Tolerance,
) -> Option<ConsensusOutcome> {
    if participants.is_empty() {
        return None;
    }

    participants.sort_by_key(|p| p.observed_at);
    let count = participants.len();

    // Step 2: a single observer is accepted outright.
    if count == 1 {
        let p = &participants[0];
        return Some(ConsensusOutcome {
            value: p.value,
            timestamp: p.observed_at,
            valid: true,
            method: ConsensusMethod::Single,
            participants,
        });
    }

    let earliest = participants.first().unwrap().observed_at;
    let latest = participants.last().unwrap().observed_at;
    let time_range = latest - earliest;

    // Step 3: disagreement on timing outside the window falls back to the latest reading,
    // tolerating clock skew between edge nodes rather than treating stale points as quorum.
    if time_range > agreement_window {
        let last = participants.last().unwrap();
        return Some(ConsensusOutcome {
            value: last.value,
            timestamp: last.observed_at,
            valid: true,
            method: ConsensusMethod::Latest,
            participants,
        });
    }

    // Step 4: group by exact value and look for a majority.
    let mut groups: HashMap<u64, Vec<usize>> = HashMap::new();
    for (idx, p) in participants.iter().enumerate() {
        groups.entry(p.value.to_bits()).or_default().push(idx);
    }
    let largest = groups.values().max_by_key(|g| g.len()).cloned().unwrap_or_default();

    if largest.len() * 2 > count {
        let majority_value = participants[largest[0]].value;
        let majority_latest = largest
            .iter()
            .map(|&idx| participants[idx].observed_at)
            .max()
            .unwrap();
        return Some(ConsensusOutcome {
            value: majority_value,
            timestamp: majority_latest,
            valid: true,
            method: ConsensusMethod::Majority,
            participants,
        });
    }

    let avg = participants.iter().map(|p| p.value).sum::<f64>() / count as f64;
    let all_within_tolerance = participants
        .iter()
        .all(|p| tolerance.satisfied_by(p.value, avg));

    let (valid, method) = if all_within_tolerance {
        (true, ConsensusMethod::Average)
    } else {
        (false, ConsensusMethod::None)
    };

    Some(ConsensusOutcome {
        value: avg,
        timestamp: latest,
        valid,
        method,
        participants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(node: &str, value: f64, secs: i64) -> Participant {
        Participant {
            node_id: node.to_string(),
            value,
            observed_at: DateTime::<Utc>::MIN_UTC + chrono::Duration::seconds(secs),
        }
    }

    /// Property 3: majority closure.
    #[test]
    fn majority_closure_over_half() {
        let participants = vec![p("n1", 72.0, 0), p("n2", 72.0, 1)];
        let outcome = reduce(participants, chrono::Duration::seconds(5), Tolerance::Relative(0.20)).unwrap();
        assert_eq!(outcome.method, ConsensusMethod::Majority);
        assert!(outcome.valid);
        assert_eq!(outcome.value, 72.0);
    }

    /// Scenario S3 (first variant): 37.2, 37.2, 39.5 -> majority at 37.2 (2/3 > half).
    #[test]
    fn s3_two_of_three_is_a_majority() {
        let participants = vec![p("n1", 37.2, 0), p("n2", 37.2, 1), p("n3", 39.5, 1)];
        let outcome = reduce(participants, chrono::Duration::seconds(5), Tolerance::Relative(0.20)).unwrap();
        assert_eq!(outcome.method, ConsensusMethod::Majority);
        assert_eq!(outcome.value, 37.2);
    }

    /// Scenario S3 (second variant): 37.0, 37.2, 39.5 -> no majority, average invalid (range > 20%).
    #[test]
    fn s3_no_majority_falls_back_to_invalid_average() {
        let participants = vec![p("n1", 37.0, 0), p("n2", 37.2, 1), p("n3", 39.5, 1)];
        let outcome = reduce(participants, chrono::Duration::seconds(5), Tolerance::Relative(0.20)).unwrap();
        assert_eq!(outcome.method, ConsensusMethod::None);
        assert!(!outcome.valid);
        assert!((outcome.value - 37.9).abs() < 0.05);
    }

    /// Property 4: average fallback within 20% relative tolerance.
    #[test]
    fn average_fallback_within_tolerance_is_valid() {
        let participants = vec![p("n1", 100.0, 0), p("n2", 110.0, 1), p("n3", 105.0, 1)];
        let outcome = reduce(participants, chrono::Duration::seconds(5), Tolerance::Relative(0.20)).unwrap();
        assert_eq!(outcome.method, ConsensusMethod::Average);
        assert!(outcome.valid);
    }

    /// Property 5: latest-outside-window.
    #[test]
    fn latest_outside_window_uses_most_recent_reading() {
        let participants = vec![p("n1", 10.0, 0), p("n2", 99.0, 20)];
        let outcome = reduce(participants, chrono::Duration::seconds(5), Tolerance::Relative(0.20)).unwrap();
        assert_eq!(outcome.method, ConsensusMethod::Latest);
        assert_eq!(outcome.value, 99.0);
    }

    /// Scenario S5: scores 3 and 8 within 1s, absolute scoreThreshold = 1.
    #[test]
    fn s5_score_disagreement_absolute_threshold() {
        let participants = vec![p("n1", 3.0, 0), p("n2", 8.0, 1)];
        let outcome = reduce(participants, chrono::Duration::seconds(5), Tolerance::Absolute(1.0)).unwrap();
        assert_eq!(outcome.method, ConsensusMethod::None);
        assert!(!outcome.valid);
        assert_eq!(outcome.value, 5.5);
    }

    #[test]
    fn single_participant_is_accepted_outright() {
        let participants = vec![p("n1", 72.0, 0)];
        let outcome = reduce(participants, chrono::Duration::seconds(5), Tolerance::Relative(0.20)).unwrap();
        assert_eq!(outcome.method, ConsensusMethod::Single);
        assert!(outcome.valid);
    }

    #[test]
    fn empty_participants_yields_none() {
        assert!(reduce(vec![], chrono::Duration::seconds(5), Tolerance::Relative(0.20)).is_none());
    }
}
