//! Locally generated placeholder trials.

use rand::Rng;
use rand::seq::SliceRandom;

use super::RawTrialRecord;
use crate::entities::{FALLBACK_CONDITION, FALLBACK_DRUG};

/// Number of placeholder trials produced per substitution.
pub const SYNTHETIC_TRIAL_COUNT: usize = 6;

pub const PHASES: [&str; 4] = ["Phase 1", "Phase 2", "Phase 3", "Phase 4"];

pub const STATUSES: [&str; 4] = [
    "Recruiting",
    "Active, not recruiting",
    "Completed",
    "Terminated",
];

pub const DEFAULT_PRIMARY_ENDPOINT: &str = "Progression-Free Survival";

pub const DEFAULT_SECONDARY_ENDPOINTS: [&str; 3] =
    ["Overall Survival", "Overall Response Rate", "Safety"];

/// `NCT` followed by a random eight-digit number.
pub fn nct_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("NCT{}", rng.gen_range(10_000_000u32..=99_999_999))
}

/// Enrollment in [50, 549].
pub fn enrollment<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(50..550)
}

/// Six trials, each pairing a randomly chosen drug and condition.
pub fn synthetic_trials<R: Rng + ?Sized>(
    drugs: &[String],
    conditions: &[String],
    rng: &mut R,
) -> Vec<RawTrialRecord> {
    (0..SYNTHETIC_TRIAL_COUNT)
        .map(|_| {
            let drug = drugs
                .choose(rng)
                .map(String::as_str)
                .unwrap_or(FALLBACK_DRUG)
                .to_string();
            let condition = conditions
                .choose(rng)
                .map(String::as_str)
                .unwrap_or(FALLBACK_CONDITION);
            let phase = PHASES.choose(rng).copied().unwrap_or(PHASES[1]);
            let status = STATUSES.choose(rng).copied().unwrap_or(STATUSES[0]);

            RawTrialRecord {
                nct_id: vec![nct_id(rng)],
                brief_title: vec![format!("Study of {drug} in {condition}")],
                phase: vec![phase.to_string()],
                status: vec![status.to_string()],
                enrollment_count: vec![enrollment(rng).to_string()],
                primary_outcome_measure: vec![DEFAULT_PRIMARY_ENDPOINT.to_string()],
                secondary_outcome_measure: DEFAULT_SECONDARY_ENDPOINTS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                intervention_name: vec![drug],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_six_well_formed_trials() {
        let mut rng = StdRng::seed_from_u64(7);
        let drugs = vec!["olaparib".to_string(), "niraparib".to_string()];
        let conditions = vec!["ovarian cancer".to_string()];
        let trials = synthetic_trials(&drugs, &conditions, &mut rng);

        assert_eq!(trials.len(), SYNTHETIC_TRIAL_COUNT);
        for trial in &trials {
            let id = &trial.nct_id[0];
            assert_eq!(id.len(), 11);
            assert!(id.starts_with("NCT"));
            assert!(id[3..].chars().all(|c| c.is_ascii_digit()));
            assert!(PHASES.contains(&trial.phase[0].as_str()));
            assert!(STATUSES.contains(&trial.status[0].as_str()));
            let enrolled: u32 = trial.enrollment_count[0].parse().unwrap();
            assert!((50..=549).contains(&enrolled));
            assert!(drugs.contains(&trial.intervention_name[0]));
            assert!(trial.brief_title[0].ends_with("in ovarian cancer"));
        }
    }

    #[test]
    fn test_same_seed_same_trials() {
        let drugs = vec!["a".to_string(), "b".to_string()];
        let conditions = vec!["c".to_string()];
        let first = synthetic_trials(&drugs, &conditions, &mut StdRng::seed_from_u64(1));
        let second = synthetic_trials(&drugs, &conditions, &mut StdRng::seed_from_u64(1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_lists_use_sentinels() {
        let mut rng = StdRng::seed_from_u64(3);
        let trials = synthetic_trials(&[], &[], &mut rng);
        assert_eq!(trials[0].brief_title[0], "Study of Standard of Care in Cancer");
    }
}
