//! Service layer for business logic with dependency injection.
//!
//! Services accept trait-based dependencies (`GitOps`, `StateStore`,
//! `Prompts`) so they can be tested with mock implementations.

pub mod orchestrator;

#[cfg(test)]
pub mod test_mocks;

pub use orchestrator::{
    AbortOutcome, ActiveOperation, CleanupReport, OrchestratorOptions, Plan, RebaseOrchestrator,
    RunOutcome, StartRequest, StatusReport, Summary,
};
