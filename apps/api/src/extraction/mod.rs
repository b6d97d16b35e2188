// Resume text pipeline: uploaded document -> plain text -> classified sections.
// Both stages are best-effort; failures degrade to empty output, never errors.

pub mod classifier;
pub mod document;

pub use classifier::{ExtractionResult, SectionClassifier};
pub use document::{DocumentKind, UploadedDocument};
