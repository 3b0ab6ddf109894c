use async_trait::async_trait;
use hearth_core::{HouseholdId, SuggestedTemplate, TemplateKey, Transaction};
use tracing::{debug, info};

use crate::classify::{classify_series, ClassifiedSeries};
use crate::group::group_into_series;
use crate::suggest::assemble_suggestions;

/// Read side the detector consumes. Implementations must not filter or reorder
/// beyond what each method documents.
#[async_trait]
pub trait SuggestionFeed: Send + Sync {
    type Error: Send;

    /// All transactions of the household with no template link, ordered by
    /// value date ascending.
    async fn untemplated_transactions(
        &self,
        household: HouseholdId,
    ) -> Result<Vec<Transaction>, Self::Error>;

    /// Existing templates projected to (name, type).
    async fn template_keys(&self, household: HouseholdId) -> Result<Vec<TemplateKey>, Self::Error>;
}

/// Runs group → classify → assemble over already-fetched data.
pub fn detect_in_memory(
    transactions: &[Transaction],
    existing: &[TemplateKey],
) -> Vec<SuggestedTemplate> {
    let series = group_into_series(transactions);
    let candidates = series.len();

    let classified: Vec<ClassifiedSeries> =
        series.into_iter().filter_map(classify_series).collect();
    debug!(
        candidates,
        classified = classified.len(),
        "classified candidate series"
    );

    assemble_suggestions(classified, existing)
}

pub struct RecurringDetector<F> {
    feed: F,
}

impl<F: SuggestionFeed> RecurringDetector<F> {
    pub fn new(feed: F) -> Self {
        Self { feed }
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    /// Suggests templates for a household's recurring transactions.
    ///
    /// Feed errors are returned unchanged. Nothing is written.
    pub async fn detect(&self, household: HouseholdId) -> Result<Vec<SuggestedTemplate>, F::Error> {
        let (transactions, existing) = tokio::try_join!(
            self.feed.untemplated_transactions(household),
            self.feed.template_keys(household),
        )?;

        let suggestions = detect_in_memory(&transactions, &existing);
        info!(
            household = %household,
            transactions = transactions.len(),
            templates = existing.len(),
            suggestions = suggestions.len(),
            "recurring detection finished"
        );
        Ok(suggestions)
    }
}
