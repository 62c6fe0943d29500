// Matching engine: skill comparison, scoring, feedback weighting,
// orchestration over a job's candidate pool, and match explanations.

pub mod explanation;
pub mod feedback;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod orchestrator;
pub mod scoring;
pub mod skills;
pub mod store;
