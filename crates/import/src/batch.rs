use hearth_core::{AccountId, HouseholdId, NewTransaction, TransactionId};
use hearth_storage::{
    create_csv_import, finish_csv_import, insert_transactions, update_csv_import_progress,
    CsvImportStatus, DbPool,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::csv::CsvRow;
use crate::mapping::ValueMapper;

pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Import {import_id} failed after {processed} of {total} rows: {source}")]
    Aborted {
        import_id: i64,
        processed: usize,
        total: usize,
        #[source]
        source: sqlx::Error,
    },
}

/// Snapshot reported after every committed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportProgress {
    pub import_id: i64,
    pub total: usize,
    pub processed: usize,
}

impl ImportProgress {
    pub fn is_done(&self) -> bool {
        self.processed >= self.total
    }
}

pub type ProgressCallback = Box<dyn Fn(ImportProgress) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub import_id: i64,
    pub created: Vec<TransactionId>,
}

/// Writes parsed CSV rows for one account, chunk by chunk.
pub struct ImportBatch {
    household: HouseholdId,
    account: AccountId,
    batch_size: usize,
}

impl ImportBatch {
    pub fn new(household: HouseholdId, account: AccountId, batch_size: usize) -> Self {
        Self {
            household,
            account,
            batch_size: batch_size.max(1),
        }
    }

    /// The stored amount is absolute; direction lives in the transaction type.
    pub fn to_new_transaction(&self, row: &CsvRow, mapper: &ValueMapper) -> NewTransaction {
        let resolved = mapper.resolve(row);
        NewTransaction {
            household_id: self.household,
            account_id: self.account,
            name: row.name.clone(),
            amount: row.amount.abs(),
            transaction_type: resolved.transaction_type,
            value_date: row.value_date,
            category_id: resolved.category_id,
            counterparty_id: resolved.counterparty_id,
        }
    }

    /// Creates a tracked import and inserts `rows`. Each chunk commits on its
    /// own. Any failure after the import record exists marks it failed and
    /// stops the run, leaving earlier chunks in place.
    pub async fn run(
        &self,
        pool: &DbPool,
        file_name: &str,
        rows: &[CsvRow],
        mapper: &ValueMapper,
        progress: Option<&ProgressCallback>,
    ) -> Result<ImportSummary, ImportError> {
        let total = rows.len();
        let import_id = create_csv_import(pool, self.household, file_name, total as i64).await?;
        info!(import_id, file_name, total, "starting CSV import");

        let mut created = Vec::with_capacity(total);
        match self
            .write_rows(pool, import_id, rows, mapper, progress, &mut created)
            .await
        {
            Ok(()) => {
                info!(import_id, created = created.len(), "CSV import completed");
                Ok(ImportSummary { import_id, created })
            }
            Err(source) => {
                let message = source.to_string();
                if let Err(e) =
                    finish_csv_import(pool, import_id, CsvImportStatus::Failed, Some(&message))
                        .await
                {
                    warn!(import_id, "could not mark import as failed: {e}");
                }
                Err(ImportError::Aborted {
                    import_id,
                    processed: created.len(),
                    total,
                    source,
                })
            }
        }
    }

    async fn write_rows(
        &self,
        pool: &DbPool,
        import_id: i64,
        rows: &[CsvRow],
        mapper: &ValueMapper,
        progress: Option<&ProgressCallback>,
        created: &mut Vec<TransactionId>,
    ) -> Result<(), sqlx::Error> {
        let total = rows.len();

        for chunk in rows.chunks(self.batch_size) {
            let new_rows: Vec<NewTransaction> = chunk
                .iter()
                .map(|row| self.to_new_transaction(row, mapper))
                .collect();

            created.extend(insert_transactions(pool, &new_rows).await?);
            let processed = created.len();
            update_csv_import_progress(pool, import_id, processed as i64).await?;

            if let Some(cb) = progress {
                cb(ImportProgress {
                    import_id,
                    total,
                    processed,
                });
            }
            info!(import_id, processed, total, "imported chunk");
        }

        finish_csv_import(pool, import_id, CsvImportStatus::Completed, None).await
    }
}
