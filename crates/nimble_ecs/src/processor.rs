//! Processors ("systems") and the report produced by one scheduling tick.

use std::time::Duration;

use crate::error::BoxError;
use crate::registry::Registry;

/// Logic that runs once per tick over the registry.
///
/// `R` is the caller's resource bundle (scene, input, overlay canvas, …).
/// Keeping it generic lets the ECS stay independent of the scene types.
///
/// `init` is called exactly once, right before the first `process`.
pub trait Processor<R> {
    fn name(&self) -> &str;

    fn init(&mut self, _registry: &mut Registry, _resources: &mut R) -> Result<(), BoxError> {
        Ok(())
    }

    fn process(&mut self, registry: &mut Registry, resources: &mut R) -> Result<(), BoxError>;
}

/// Outcome of a single processor during one tick.
#[derive(Debug, Clone)]
pub struct ProcessorRun {
    pub name: String,
    pub priority: i32,
    pub elapsed: Duration,
    /// Display form of the error if `init` or `process` failed.
    pub error: Option<String>,
}

impl ProcessorRun {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything that happened during one call to
/// [`World::process`](crate::World::process).
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: u64,
    pub runs: Vec<ProcessorRun>,
}

impl TickReport {
    /// Processor names in the order they ran.
    pub fn order(&self) -> Vec<&str> {
        self.runs.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProcessorRun> {
        self.runs.iter().filter(|r| !r.succeeded())
    }

    pub fn total_time(&self) -> Duration {
        self.runs.iter().map(|r| r.elapsed).sum()
    }
}
