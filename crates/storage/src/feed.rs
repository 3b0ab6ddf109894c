use async_trait::async_trait;
use hearth_core::{HouseholdId, TemplateKey, Transaction};
use hearth_recurring::SuggestionFeed;

use crate::db::{self, DbPool};

/// SQLite-backed read side for recurring detection.
#[derive(Debug, Clone)]
pub struct Store {
    pool: DbPool,
}

impl Store {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuggestionFeed for Store {
    type Error = sqlx::Error;

    async fn untemplated_transactions(
        &self,
        household: HouseholdId,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        db::get_untemplated_transactions(&self.pool, household).await
    }

    async fn template_keys(&self, household: HouseholdId) -> Result<Vec<TemplateKey>, sqlx::Error> {
        db::get_template_keys(&self.pool, household).await
    }
}
