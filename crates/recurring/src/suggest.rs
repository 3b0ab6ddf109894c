use hearth_core::{SuggestedTemplate, SuggestedTransaction, TemplateKey, Transaction};
use std::collections::HashSet;

use crate::classify::ClassifiedSeries;

fn suggested_transaction(tx: &Transaction) -> SuggestedTransaction {
    SuggestedTransaction {
        id: tx.id,
        name: tx.name.clone(),
        amount: tx.amount,
        transaction_type: tx.transaction_type,
        value_date: tx.value_date,
        category: tx.category.clone(),
        counterparty: tx.counterparty.clone(),
    }
}

/// Builds the suggestion for one series. The latest transaction supplies the
/// amount, date and references.
pub fn build_suggestion(classified: &ClassifiedSeries) -> Option<SuggestedTemplate> {
    let series = &classified.series;
    let latest = series.transactions.last()?;

    Some(SuggestedTemplate {
        name: series.key.name.clone(),
        amount: latest.amount.abs(),
        transaction_type: series.key.transaction_type,
        frequency: classified.frequency,
        confidence: classified.confidence,
        occurrences: series.occurrences(),
        latest_date: latest.value_date,
        account_id: latest.account_id,
        category_id: latest.category_id(),
        counterparty_id: latest.counterparty_id(),
        transactions: series.transactions.iter().map(suggested_transaction).collect(),
    })
}

/// Orders suggestions by confidence (high first), then occurrence count
/// descending. Equal entries keep their relative order.
pub fn rank_suggestions(suggestions: &mut [SuggestedTemplate]) {
    suggestions.sort_by(|a, b| {
        a.confidence
            .cmp(&b.confidence)
            .then_with(|| b.occurrences.cmp(&a.occurrences))
    });
}

/// Drops series already covered by a template, builds the rest and ranks them.
pub fn assemble_suggestions(
    classified: Vec<ClassifiedSeries>,
    existing: &[TemplateKey],
) -> Vec<SuggestedTemplate> {
    let covered: HashSet<TemplateKey> = existing
        .iter()
        .map(|k| TemplateKey::new(&k.name, k.transaction_type))
        .collect();

    let mut suggestions: Vec<SuggestedTemplate> = classified
        .iter()
        .filter(|c| {
            let key = TemplateKey::new(&c.series.key.name, c.series.key.transaction_type);
            !covered.contains(&key)
        })
        .filter_map(build_suggestion)
        .collect();

    rank_suggestions(&mut suggestions);
    suggestions
}
