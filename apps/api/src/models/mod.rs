pub mod candidate;
pub mod feedback;
pub mod job;
