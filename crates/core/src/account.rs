use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

macro_rules! id_type {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            )]
            pub struct $name(pub i64);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(&self.0, f)
                }
            }
        )*
    };
}

id_type!(
    HouseholdId,
    AccountId,
    CategoryId,
    CounterpartyId,
    TransactionId,
    TemplateId,
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    pub id: Option<HouseholdId>,
    pub name: String,
}

impl Household {
    pub fn new(name: &str) -> Self {
        Household {
            id: None,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Option<AccountId>,
    pub household_id: HouseholdId,
    pub name: String,
    pub is_archived: bool,
}

impl Account {
    pub fn new(household_id: HouseholdId, name: &str) -> Self {
        Account {
            id: None,
            household_id,
            name: name.to_string(),
            is_archived: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),
    #[error("Unknown frequency: {0}")]
    UnknownFrequency(String),
    #[error("Unknown confidence: {0}")]
    UnknownConfidence(String),
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),
}
