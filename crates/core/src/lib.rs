pub mod account;
pub mod money;
pub mod template;
pub mod transaction;

pub use account::{
    Account, AccountId, CategoryId, CounterpartyId, DomainError, Household, HouseholdId,
    TemplateId, TransactionId,
};
pub use money::Money;
pub use template::{
    normalize_name, Confidence, Frequency, NewTemplate, SuggestedTemplate, SuggestedTransaction,
    TemplateKey,
};
pub use transaction::{CategoryRef, CounterpartyRef, NewTransaction, Transaction, TransactionType};
