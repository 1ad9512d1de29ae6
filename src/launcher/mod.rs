pub mod extract;
pub mod kind;
pub mod locator;
pub mod process;
pub mod run;
pub mod setup;

pub use extract::{ArchiveExtractor, ExtractionSummary};
pub use kind::ProjectKind;
pub use locator::ArchiveLocator;
pub use process::{CommandRunner, ForegroundOutcome, StepOutcome};
pub use run::{LaunchOutcome, Launcher};
pub use setup::{LaunchCommand, ProjectSetup, SetupPlan};
