//! Recurring-transaction detection.
//!
//! Three pure phases: [`group`] partitions untemplated transactions into
//! candidate series, [`classify`] assigns cadence and confidence, and
//! [`suggest`] filters against existing templates and ranks the result.
//! [`RecurringDetector`] wires them to a [`SuggestionFeed`].

pub mod classify;
pub mod detector;
pub mod group;
pub mod suggest;

#[cfg(test)]
pub(crate) mod test_support;

pub use classify::{classify_series, ClassifiedSeries};
pub use detector::{detect_in_memory, RecurringDetector, SuggestionFeed};
pub use group::{group_into_series, CandidateSeries, SeriesKey};
pub use suggest::{assemble_suggestions, rank_suggestions};
