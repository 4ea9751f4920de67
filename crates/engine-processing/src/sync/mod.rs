pub mod orchestrator;
pub mod phase;
pub mod report;
