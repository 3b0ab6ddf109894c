use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::account::{AccountId, CategoryId, CounterpartyId, DomainError, TransactionId};
use super::money::Money;
use super::transaction::{CategoryRef, CounterpartyRef, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "YEARLY" => Ok(Frequency::Yearly),
            _ => Err(DomainError::UnknownFrequency(s.to_string())),
        }
    }
}

/// Trust in a detected series. Variant order is rank order: `High` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "HIGH",
            Confidence::Medium => "MEDIUM",
            Confidence::Low => "LOW",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Ok(Confidence::High),
            "MEDIUM" => Ok(Confidence::Medium),
            "LOW" => Ok(Confidence::Low),
            _ => Err(DomainError::UnknownConfidence(s.to_string())),
        }
    }
}

/// Name form shared by series grouping and template exclusion. Missing names become "".
pub fn normalize_name(name: Option<&str>) -> String {
    name.map(str::trim).unwrap_or_default().to_string()
}

/// The (name, type) projection of an existing template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateKey {
    pub name: String,
    pub transaction_type: TransactionType,
}

impl TemplateKey {
    pub fn new(name: &str, transaction_type: TransactionType) -> Self {
        TemplateKey {
            name: normalize_name(Some(name)),
            transaction_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTransaction {
    pub id: TransactionId,
    pub name: Option<String>,
    pub amount: Money,
    pub transaction_type: TransactionType,
    pub value_date: NaiveDate,
    pub category: Option<CategoryRef>,
    pub counterparty: Option<CounterpartyRef>,
}

/// A recurring series the detector thinks deserves a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTemplate {
    pub name: String,
    /// Absolute value; the sign follows from `transaction_type`.
    pub amount: Money,
    pub transaction_type: TransactionType,
    pub frequency: Frequency,
    pub confidence: Confidence,
    pub occurrences: usize,
    pub latest_date: NaiveDate,
    pub account_id: AccountId,
    pub category_id: Option<CategoryId>,
    pub counterparty_id: Option<CounterpartyId>,
    pub transactions: Vec<SuggestedTransaction>,
}

impl SuggestedTemplate {
    pub fn key(&self) -> TemplateKey {
        TemplateKey::new(&self.name, self.transaction_type)
    }

    pub fn transaction_ids(&self) -> Vec<TransactionId> {
        self.transactions.iter().map(|t| t.id).collect()
    }
}

/// Insert payload for materializing a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    pub amount: Money,
    pub transaction_type: TransactionType,
    pub frequency: Frequency,
    pub account_id: AccountId,
    pub category_id: Option<CategoryId>,
    pub counterparty_id: Option<CounterpartyId>,
    pub start_date: NaiveDate,
}

impl From<&SuggestedTemplate> for NewTemplate {
    fn from(s: &SuggestedTemplate) -> Self {
        NewTemplate {
            name: s.name.clone(),
            amount: s.amount,
            transaction_type: s.transaction_type,
            frequency: s.frequency,
            account_id: s.account_id,
            category_id: s.category_id,
            counterparty_id: s.counterparty_id,
            start_date: s.latest_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_orders_high_first() {
        let mut tiers = vec![Confidence::Low, Confidence::High, Confidence::Medium];
        tiers.sort();
        assert_eq!(tiers, vec![Confidence::High, Confidence::Medium, Confidence::Low]);
    }

    #[test]
    fn frequency_round_trips_through_str() {
        for f in [Frequency::Daily, Frequency::Weekly, Frequency::Monthly, Frequency::Yearly] {
            assert_eq!(f.as_str().parse::<Frequency>(), Ok(f));
        }
        assert!("fortnightly".parse::<Frequency>().is_err());
    }

    #[test]
    fn confidence_parses_lower_case() {
        assert_eq!("medium".parse::<Confidence>(), Ok(Confidence::Medium));
        assert!("certain".parse::<Confidence>().is_err());
    }

    #[test]
    fn normalize_name_trims_and_defaults() {
        assert_eq!(normalize_name(Some("  Rent ")), "Rent");
        assert_eq!(normalize_name(None), "");
    }

    #[test]
    fn template_key_normalizes_name() {
        assert_eq!(
            TemplateKey::new(" Rent", TransactionType::Expense),
            TemplateKey::new("Rent", TransactionType::Expense)
        );
    }
}
