// Screening core: identity resolution, per-candidate orchestration, report
// assembly and audit artifacts. Collaborators are injected as trait objects.

pub mod artifacts;
pub mod identity;
pub mod orchestrator;
pub mod report;

pub use orchestrator::ScreeningOrchestrator;
pub use report::{RunStatus, ScreeningReport};
