// Text and structured-field extraction collaborators.
// The orchestrator only sees the traits; adapters live next to them.

pub mod pdf;
pub mod prompts;
pub mod structured;

pub use pdf::{PdfTextSource, TextSource};
pub use structured::{LlmStructuredExtractor, StructuredExtractor};
