//! Deadlock Toolkit Core
//!
//! Models resource allocation for a fixed set of processes and resource types and
//! answers two questions about a snapshot: is the state safe (Banker's algorithm),
//! and does the resource allocation graph contain a cycle.
//!
//! A graph cycle is exact evidence of deadlock only for single-instance resources;
//! with counted resources it is a necessary condition, not a sufficient one.

pub mod analysis;
pub mod config;
pub mod error;
pub mod scenario;
pub mod snapshot;
pub mod state;

pub use analysis::{
    AllocationGraphAnalyzer, Cycle, Edge, EdgeKind, NodeId, NodeKind, ResourceAllocationGraph,
    SafetyAnalyzer, SafetyOutcome,
};
pub use config::{ConfigBuilder, ToolkitConfig};
pub use error::{Error, Result};
pub use scenario::{analyze, run_scenario, ScenarioInput, ScenarioReport};
pub use snapshot::SharedResourceState;
pub use state::{ResourceState, ResourceStateBuilder, ValidationPolicy};
