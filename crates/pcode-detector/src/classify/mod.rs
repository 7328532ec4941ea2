//! Resource classification: pre-filters, verdicts, and the per-resource
//! state machine.

mod classifier;
mod prefilter;
mod verdict;

pub use classifier::{Candidates, Classifier, TableFindings};
pub use prefilter::{HttpSizeProbe, NoProbe, PreFilter, SizeProbe};
pub use verdict::{Evidence, ResourceVerdict, SkipReason, Verdict};
