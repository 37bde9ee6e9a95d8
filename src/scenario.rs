//! Scenario orchestration
//!
//! Validates raw matrices into a `ResourceState`, runs the safety check and the
//! allocation graph cycle search independently on the same snapshot, and returns
//! both verdicts together.

use crate::analysis::{AllocationGraphAnalyzer, Cycle, SafetyAnalyzer};
use crate::error::Result;
use crate::state::{ResourceState, ValidationPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Raw, unvalidated scenario as read from a file or another front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub allocation: Vec<Vec<i64>>,
    pub max_demand: Vec<Vec<i64>>,
    pub available: Vec<i64>,
}

impl ScenarioInput {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_state(&self, policy: ValidationPolicy) -> Result<ResourceState> {
        ResourceState::from_matrices_with_policy(
            self.allocation.as_slice(),
            self.max_demand.as_slice(),
            &self.available,
            policy,
        )
    }

    pub fn run(&self, policy: ValidationPolicy) -> Result<ScenarioReport> {
        Ok(analyze(&self.to_state(policy)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub safe: bool,
    pub deadlock_detected: bool,
    /// Edges of the first cycle found; empty when `deadlock_detected` is false
    pub cycle: Cycle,
    /// Processes the safety simulation could not finish
    pub unfinished_processes: Vec<usize>,
}

/// Validate the matrices and run both analyses.
pub fn run_scenario<A, D>(
    allocation: &[A],
    max_demand: &[D],
    available: &[i64],
    policy: ValidationPolicy,
) -> Result<ScenarioReport>
where
    A: AsRef<[i64]>,
    D: AsRef<[i64]>,
{
    let state =
        ResourceState::from_matrices_with_policy(allocation, max_demand, available, policy)?;
    Ok(analyze(&state))
}

/// Run both analyses on an already validated snapshot.
pub fn analyze(state: &ResourceState) -> ScenarioReport {
    let safety = SafetyAnalyzer::evaluate(state);
    let cycle = AllocationGraphAnalyzer::detect_deadlock(state);

    let report = ScenarioReport {
        safe: safety.is_safe(),
        deadlock_detected: cycle.is_some(),
        cycle: cycle.unwrap_or_default(),
        unfinished_processes: safety.unfinished(),
    };

    info!(
        processes = state.num_processes(),
        resources = state.num_resources(),
        safe = report.safe,
        deadlock_detected = report.deadlock_detected,
        "scenario analyzed"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_cross_wait_is_unsafe_and_cyclic() {
        let report = run_scenario(
            &[vec![1, 0], vec![0, 1]],
            &[vec![1, 1], vec![1, 1]],
            &[0, 0],
            ValidationPolicy::default(),
        )
        .unwrap();

        assert!(!report.safe);
        assert!(report.deadlock_detected);
        assert_eq!(report.cycle.len(), 4);
        assert_eq!(report.unfinished_processes, vec![0, 1]);
    }

    #[test]
    fn test_cycle_can_coexist_with_safe_state() {
        // Multi-unit resources: the graph has a cycle but spare units make it safe
        let report = run_scenario(
            &[vec![1, 0], vec![0, 1]],
            &[vec![1, 1], vec![1, 1]],
            &[1, 1],
            ValidationPolicy::default(),
        )
        .unwrap();

        assert!(report.safe);
        assert!(report.deadlock_detected);
    }

    #[test]
    fn test_validation_error_surfaces() {
        let policy = ValidationPolicy::default();
        let err = run_scenario(&[vec![0]], &[vec![0]], &[0, 0], policy).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_wrong_length_available_blames_available() {
        let policy = ValidationPolicy::default();

        for available in [&[][..], &[0][..]] {
            let err = run_scenario(&[vec![1, 0]], &[vec![1, 1]], available, policy).unwrap_err();
            let blames_available = matches!(
                &err,
                Error::DimensionMismatch { what, expected: 2, .. } if what == "available"
            );
            assert!(blames_available, "unexpected error: {err}");
        }

        let input = ScenarioInput::from_json(
            r#"{"allocation": [[1, 0]], "max_demand": [[1, 1]], "available": []}"#,
        )
        .unwrap();
        assert!(matches!(
            input.run(policy).unwrap_err(),
            Error::DimensionMismatch { actual: 0, .. }
        ));
    }

    #[test]
    fn test_report_json_shape() {
        let input = ScenarioInput::from_json(
            r#"{"allocation": [[1]], "max_demand": [[2]], "available": [0]}"#,
        )
        .unwrap();
        let report = input.run(ValidationPolicy::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["safe"], false);
        assert_eq!(json["deadlock_detected"], true);
        assert_eq!(json["cycle"][0]["from"], "P0");
        assert_eq!(json["cycle"][0]["to"], "R0");
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            ScenarioInput::from_json("{\"allocation\": ").unwrap_err(),
            Error::Serialization(_)
        ));
    }
}
