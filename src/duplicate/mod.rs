//! Recursive entry duplication
//!
//! A job walks the entry reference graph from each root, creates one duplicate
//! per reachable entry in the target environment, and rewrites links so the
//! duplicates reference each other. Entries reached a second time (shared
//! children or true cycles) are recorded as loop references and patched after
//! the root that produced them completes.

pub mod engine;
pub mod job;
pub mod links;
pub mod patch;
pub mod publish;
pub mod rename;
pub mod report;
pub mod scanner;
pub mod session;

pub use engine::{Duplicator, Referrer};
pub use job::{DuplicationJob, run_job};
pub use links::FieldPath;
pub use patch::{PatchSummary, run_patch_pass};
pub use publish::{DraftReason, PublishDecision, PublishGate};
pub use rename::NamingRule;
pub use report::{DuplicationReport, DuplicationStats, JobWarning, RootOutcome, RootStatus};
pub use session::{DuplicationSession, IdMap, LoopReference};
