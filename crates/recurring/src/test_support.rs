use chrono::{Duration, NaiveDate};
use hearth_core::{AccountId, Money, Transaction, TransactionId, TransactionType};

use crate::group::CandidateSeries;
use crate::group::SeriesKey;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn tx(
    id: i64,
    name: Option<&str>,
    cents: i64,
    transaction_type: TransactionType,
    value_date: NaiveDate,
) -> Transaction {
    Transaction {
        id: TransactionId(id),
        name: name.map(str::to_string),
        amount: Money::from_cents(cents),
        transaction_type,
        value_date,
        account_id: AccountId(1),
        category: None,
        counterparty: None,
        template_id: None,
    }
}

/// A 15.00 expense series starting 2024-01-01 with the given day gaps.
pub fn series_with_gaps(gaps: &[i64]) -> CandidateSeries {
    let mut value_date = date(2024, 1, 1);
    let mut transactions = vec![tx(1, Some("Series"), -1500, TransactionType::Expense, value_date)];
    for (i, gap) in gaps.iter().enumerate() {
        value_date += Duration::days(*gap);
        transactions.push(tx(
            i as i64 + 2,
            Some("Series"),
            -1500,
            TransactionType::Expense,
            value_date,
        ));
    }
    CandidateSeries {
        key: SeriesKey::for_transaction(&transactions[0]),
        transactions,
    }
}
