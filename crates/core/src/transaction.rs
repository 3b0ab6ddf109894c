use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::account::{
    AccountId, CategoryId, CounterpartyId, DomainError, HouseholdId, TemplateId, TransactionId,
};
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
            TransactionType::Transfer => "TRANSFER",
        }
    }

    /// Bank exports sign outflows negative.
    pub fn from_signed_amount(amount: Money) -> Self {
        if amount.is_negative() {
            TransactionType::Expense
        } else {
            TransactionType::Income
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            "TRANSFER" => Ok(TransactionType::Transfer),
            _ => Err(DomainError::UnknownTransactionType(s.to_string())),
        }
    }
}

/// Category fields denormalized onto a transaction for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyRef {
    pub id: CounterpartyId,
    pub name: String,
    pub counterparty_type: Option<String>,
}

/// A stored transaction as the read side sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub name: Option<String>,
    pub amount: Money,
    pub transaction_type: TransactionType,
    pub value_date: NaiveDate,
    pub account_id: AccountId,
    pub category: Option<CategoryRef>,
    pub counterparty: Option<CounterpartyRef>,
    pub template_id: Option<TemplateId>,
}

impl Transaction {
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category.as_ref().map(|c| c.id)
    }

    pub fn counterparty_id(&self) -> Option<CounterpartyId> {
        self.counterparty.as_ref().map(|c| c.id)
    }
}

/// Insert payload for a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub household_id: HouseholdId,
    pub account_id: AccountId,
    pub name: Option<String>,
    pub amount: Money,
    pub transaction_type: TransactionType,
    pub value_date: NaiveDate,
    pub category_id: Option<CategoryId>,
    pub counterparty_id: Option<CounterpartyId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_parses_case_insensitively() {
        assert_eq!("expense".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert_eq!(" Income ".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!("TRANSFER".parse::<TransactionType>(), Ok(TransactionType::Transfer));
    }

    #[test]
    fn transaction_type_rejects_unknown() {
        assert_eq!(
            "refund".parse::<TransactionType>(),
            Err(DomainError::UnknownTransactionType("refund".to_string()))
        );
    }

    #[test]
    fn transaction_type_display_matches_parse() {
        for t in [TransactionType::Income, TransactionType::Expense, TransactionType::Transfer] {
            assert_eq!(t.to_string().parse::<TransactionType>(), Ok(t));
        }
    }

    #[test]
    fn transaction_type_from_sign() {
        assert_eq!(
            TransactionType::from_signed_amount(Money::from_cents(-1500)),
            TransactionType::Expense
        );
        assert_eq!(
            TransactionType::from_signed_amount(Money::from_cents(250000)),
            TransactionType::Income
        );
        assert_eq!(TransactionType::from_signed_amount(Money::zero()), TransactionType::Income);
    }

    #[test]
    fn serde_uses_upper_case_names() {
        let json = serde_json::to_string(&TransactionType::Expense).unwrap();
        assert_eq!(json, "\"EXPENSE\"");
    }
}
