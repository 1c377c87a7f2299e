pub mod candidate;
pub mod enrichment;
pub mod evaluation;
pub mod resume;
