//! Resource allocation snapshot
//!
//! `ResourceState` is the immutable allocation / max-demand / available triple that
//! both analyzers read. It can only be produced through `ResourceStateBuilder`, which
//! validates every supplied vector and matrix against the process and resource counts
//! fixed at construction. Updates go through the `with_*` methods, which return a new
//! snapshot and leave the original untouched.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Controls the cross-matrix check performed when a snapshot is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Reject snapshots where a process holds more of a resource than its max demand
    pub enforce_max_claim: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            enforce_max_claim: true,
        }
    }
}

impl ValidationPolicy {
    /// Accept `allocation > max_demand`; remaining need then saturates at zero.
    pub fn permissive() -> Self {
        Self {
            enforce_max_claim: false,
        }
    }
}

/// Validated allocation state for N processes and M resource types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceState {
    num_processes: usize,
    num_resources: usize,
    allocation: Vec<Vec<u64>>,
    max_demand: Vec<Vec<u64>>,
    available: Vec<u64>,
    #[serde(skip)]
    policy: ValidationPolicy,
}

impl ResourceState {
    /// Build a snapshot from raw matrices, inferring N from the allocation row count
    /// and M from the length of its first row. Every other row and the available
    /// vector are then checked against those counts.
    pub fn from_matrices<A, D>(
        allocation: &[A],
        max_demand: &[D],
        available: &[i64],
    ) -> Result<Self>
    where
        A: AsRef<[i64]>,
        D: AsRef<[i64]>,
    {
        let policy = ValidationPolicy::default();
        Self::from_matrices_with_policy(allocation, max_demand, available, policy)
    }

    pub fn from_matrices_with_policy<A, D>(
        allocation: &[A],
        max_demand: &[D],
        available: &[i64],
        policy: ValidationPolicy,
    ) -> Result<Self>
    where
        A: AsRef<[i64]>,
        D: AsRef<[i64]>,
    {
        let num_resources = allocation.first().map_or(0, |row| row.as_ref().len());
        let mut builder =
            ResourceStateBuilder::new(allocation.len(), num_resources)?.with_policy(policy);
        builder
            .set_allocation(allocation)?
            .set_max_demand(max_demand)?
            .set_available(available)?;
        builder.build()
    }

    pub fn num_processes(&self) -> usize {
        self.num_processes
    }

    pub fn num_resources(&self) -> usize {
        self.num_resources
    }

    pub fn allocation(&self) -> &[Vec<u64>] {
        &self.allocation
    }

    pub fn max_demand(&self) -> &[Vec<u64>] {
        &self.max_demand
    }

    pub fn available(&self) -> &[u64] {
        &self.available
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Units of `resource` that `process` may still request.
    pub fn need(&self, process: usize, resource: usize) -> u64 {
        self.max_demand[process][resource].saturating_sub(self.allocation[process][resource])
    }

    pub fn need_row(&self, process: usize) -> impl Iterator<Item = u64> + '_ {
        self.max_demand[process]
            .iter()
            .zip(&self.allocation[process])
            .map(|(max, held)| max.saturating_sub(*held))
    }

    /// Start a builder pre-loaded with this snapshot's contents.
    pub fn to_builder(&self) -> ResourceStateBuilder {
        ResourceStateBuilder {
            num_processes: self.num_processes,
            num_resources: self.num_resources,
            allocation: self.allocation.clone(),
            max_demand: self.max_demand.clone(),
            available: self.available.clone(),
            policy: self.policy,
        }
    }

    pub fn with_available(&self, available: &[i64]) -> Result<Self> {
        let mut builder = self.to_builder();
        builder.set_available(available)?;
        builder.build()
    }

    pub fn with_allocation<R: AsRef<[i64]>>(&self, allocation: &[R]) -> Result<Self> {
        let mut builder = self.to_builder();
        builder.set_allocation(allocation)?;
        builder.build()
    }

    pub fn with_max_demand<R: AsRef<[i64]>>(&self, max_demand: &[R]) -> Result<Self> {
        let mut builder = self.to_builder();
        builder.set_max_demand(max_demand)?;
        builder.build()
    }
}

/// Staging area for a `ResourceState`.
///
/// Starts from all-zero matrices. Each setter validates its whole argument before
/// replacing anything, so a failed call leaves the builder as it was.
#[derive(Debug, Clone)]
pub struct ResourceStateBuilder {
    num_processes: usize,
    num_resources: usize,
    allocation: Vec<Vec<u64>>,
    max_demand: Vec<Vec<u64>>,
    available: Vec<u64>,
    policy: ValidationPolicy,
}

impl ResourceStateBuilder {
    pub fn new(num_processes: usize, num_resources: usize) -> Result<Self> {
        if num_processes == 0 || num_resources == 0 {
            return Err(Error::InvalidDimensions {
                processes: num_processes,
                resources: num_resources,
            });
        }

        Ok(Self {
            num_processes,
            num_resources,
            allocation: vec![vec![0; num_resources]; num_processes],
            max_demand: vec![vec![0; num_resources]; num_processes],
            available: vec![0; num_resources],
            policy: ValidationPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set_available(&mut self, available: &[i64]) -> Result<&mut Self> {
        self.available = check_vector("available", available, self.num_resources)?;
        Ok(self)
    }

    pub fn set_allocation<R: AsRef<[i64]>>(&mut self, allocation: &[R]) -> Result<&mut Self> {
        self.allocation =
            check_matrix("allocation", allocation, self.num_processes, self.num_resources)?;
        Ok(self)
    }

    pub fn set_max_demand<R: AsRef<[i64]>>(&mut self, max_demand: &[R]) -> Result<&mut Self> {
        self.max_demand =
            check_matrix("max_demand", max_demand, self.num_processes, self.num_resources)?;
        Ok(self)
    }

    /// Run the cross-matrix check and freeze the snapshot.
    pub fn build(self) -> Result<ResourceState> {
        if let Some((process, resource)) = self.first_over_claim() {
            let allocated = self.allocation[process][resource];
            let max_demand = self.max_demand[process][resource];

            if self.policy.enforce_max_claim {
                return Err(Error::InconsistentState {
                    process,
                    resource,
                    allocated,
                    max_demand,
                });
            }
            warn!(
                process,
                resource,
                allocated,
                max_demand,
                "allocation exceeds max demand, treating remaining need as zero"
            );
        }

        Ok(ResourceState {
            num_processes: self.num_processes,
            num_resources: self.num_resources,
            allocation: self.allocation,
            max_demand: self.max_demand,
            available: self.available,
            policy: self.policy,
        })
    }

    fn first_over_claim(&self) -> Option<(usize, usize)> {
        self.allocation
            .iter()
            .zip(&self.max_demand)
            .enumerate()
            .find_map(|(p, (held, max))| {
                held.iter()
                    .zip(max)
                    .position(|(h, m)| h > m)
                    .map(|r| (p, r))
            })
    }
}

fn check_vector(what: &str, values: &[i64], expected: usize) -> Result<Vec<u64>> {
    if values.len() != expected {
        return Err(Error::mismatch(what, expected, values.len()));
    }

    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            u64::try_from(value).map_err(|_| Error::InvalidValue {
                what: what.to_string(),
                index,
                value,
            })
        })
        .collect()
}

fn check_matrix<R: AsRef<[i64]>>(
    what: &str,
    rows: &[R],
    processes: usize,
    resources: usize,
) -> Result<Vec<Vec<u64>>> {
    if rows.len() != processes {
        return Err(Error::mismatch(format!("{} rows", what), processes, rows.len()));
    }

    rows.iter()
        .enumerate()
        .map(|(p, row)| check_vector(&format!("{} row {}", what, p), row.as_ref(), resources))
        .collect()
}
