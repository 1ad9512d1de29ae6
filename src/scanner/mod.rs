pub mod analyzer;
pub mod facets;
pub mod rules;
pub mod walker;

pub use analyzer::{ProjectAnalysis, ProjectScanner};
pub use walker::{FileRead, ProjectWalker, SkipReason};
