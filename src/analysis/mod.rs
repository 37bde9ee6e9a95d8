// Analysis Module
// Safe-state simulation and resource allocation graph cycle detection

pub mod deadlock;
pub mod graph;
pub mod safety;
pub mod types;

pub use deadlock::*;
pub use graph::*;
pub use safety::*;
pub use types::*;
