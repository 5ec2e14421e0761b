//! Dependency analysis over the member model: graph construction, memoization and cycle
//! detection.

pub mod builder;
pub mod cache;
pub mod cycle;

pub use builder::{build_dependency_map, resolve_dependency};
pub use cache::DependencyCache;
pub use cycle::{cycle_closers, find_cycles, has_cycle, Cycle};
