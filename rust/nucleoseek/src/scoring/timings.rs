//! Timing instrumentation for the engine stages.

use serde::Serialize;
use std::time::Duration;

/// Accumulated wall time spent in each stage of a run.
///
/// Candidate generation is summed over every batch fed to the engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct EngineTimings {
    pub candidate_generation: Duration,
    pub deduplication: Duration,
}

impl Serialize for EngineTimings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("EngineTimings", 2)?;
        state.serialize_field(
            "candidate_generation_ms",
            &self.candidate_generation.as_millis(),
        )?;
        state.serialize_field("deduplication_ms", &self.deduplication.as_millis())?;
        state.end()
    }
}

impl std::ops::AddAssign for EngineTimings {
    fn add_assign(&mut self, rhs: Self) {
        self.candidate_generation += rhs.candidate_generation;
        self.deduplication += rhs.deduplication;
    }
}
