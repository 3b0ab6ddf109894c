use hearth_core::{normalize_name, Transaction, TransactionType};
use std::collections::HashMap;

/// Grouping key for a candidate series.
///
/// Amounts are compared in whole currency units so that a 15.00 and a 14.99
/// charge from the same payee land in the same series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub name: String,
    pub rounded_amount: i64,
    pub transaction_type: TransactionType,
}

impl SeriesKey {
    pub fn for_transaction(tx: &Transaction) -> Self {
        SeriesKey {
            name: normalize_name(tx.name.as_deref()),
            rounded_amount: tx.amount.abs().round_to_units(),
            transaction_type: tx.transaction_type,
        }
    }
}

/// Transactions sharing one `SeriesKey`, in input order (date ascending).
#[derive(Debug, Clone)]
pub struct CandidateSeries {
    pub key: SeriesKey,
    pub transactions: Vec<Transaction>,
}

impl CandidateSeries {
    pub fn occurrences(&self) -> usize {
        self.transactions.len()
    }
}

/// Partitions transactions into candidate series.
///
/// Transactions already linked to a template are skipped. Series are returned
/// in the order their key first appears, which keeps downstream ranking stable.
pub fn group_into_series(transactions: &[Transaction]) -> Vec<CandidateSeries> {
    let mut index: HashMap<SeriesKey, usize> = HashMap::new();
    let mut series: Vec<CandidateSeries> = Vec::new();

    for tx in transactions.iter().filter(|t| t.template_id.is_none()) {
        let key = SeriesKey::for_transaction(tx);
        match index.get(&key) {
            Some(&i) => series[i].transactions.push(tx.clone()),
            None => {
                index.insert(key.clone(), series.len());
                series.push(CandidateSeries {
                    key,
                    transactions: vec![tx.clone()],
                });
            }
        }
    }

    series
}
