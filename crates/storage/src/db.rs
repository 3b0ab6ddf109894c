use chrono::NaiveDate;
use hearth_core::{
    Account, AccountId, CategoryId, CategoryRef, CounterpartyId, CounterpartyRef, DomainError,
    Frequency, Household, HouseholdId, Money, NewTemplate, NewTransaction, TemplateId, TemplateKey,
    Transaction, TransactionId, TransactionType,
};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub type DbPool = Pool<Sqlite>;

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    configure(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database; the schema lives as long as the pool.
pub async fn create_memory_db() -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    configure(&pool).await?;
    Ok(pool)
}

async fn configure(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;
    run_migrations(pool).await
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS households (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            household_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            is_archived INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (household_id) REFERENCES households(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            household_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            color TEXT,
            FOREIGN KEY (household_id) REFERENCES households(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS counterparties (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            household_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            counterparty_type TEXT,
            FOREIGN KEY (household_id) REFERENCES households(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transaction_templates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            household_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            transaction_type TEXT NOT NULL,
            frequency TEXT NOT NULL,
            account_id INTEGER NOT NULL,
            category_id INTEGER,
            counterparty_id INTEGER,
            start_date TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (household_id) REFERENCES households(id) ON DELETE CASCADE,
            FOREIGN KEY (account_id) REFERENCES accounts(id),
            FOREIGN KEY (category_id) REFERENCES categories(id),
            FOREIGN KEY (counterparty_id) REFERENCES counterparties(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            household_id INTEGER NOT NULL,
            account_id INTEGER NOT NULL,
            name TEXT,
            amount_cents INTEGER NOT NULL,
            transaction_type TEXT NOT NULL,
            value_date TEXT NOT NULL,
            category_id INTEGER,
            counterparty_id INTEGER,
            template_id INTEGER,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (household_id) REFERENCES households(id) ON DELETE CASCADE,
            FOREIGN KEY (account_id) REFERENCES accounts(id),
            FOREIGN KEY (category_id) REFERENCES categories(id),
            FOREIGN KEY (counterparty_id) REFERENCES counterparties(id),
            FOREIGN KEY (template_id) REFERENCES transaction_templates(id) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_transactions_household_date ON transactions (household_id, value_date)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS csv_imports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            household_id INTEGER NOT NULL,
            file_name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            total_rows INTEGER NOT NULL DEFAULT 0,
            processed_rows INTEGER NOT NULL DEFAULT 0,
            error TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            finished_at TEXT,
            FOREIGN KEY (household_id) REFERENCES households(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn decode_err(e: DomainError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}

fn cents(amount: Money) -> Result<i64, sqlx::Error> {
    amount.to_cents().ok_or_else(|| {
        sqlx::Error::Encode(Box::new(DomainError::AmountOutOfRange(amount.to_string())))
    })
}

// ── Households, accounts, categories, counterparties ─────────────────────────

pub async fn insert_household(pool: &DbPool, name: &str) -> Result<HouseholdId, sqlx::Error> {
    let result = sqlx::query("INSERT INTO households (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;
    Ok(HouseholdId(result.last_insert_rowid()))
}

pub async fn get_households(pool: &DbPool) -> Result<Vec<Household>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM households ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| Household {
            id: Some(HouseholdId(id)),
            name,
        })
        .collect())
}

pub async fn insert_account(pool: &DbPool, account: &Account) -> Result<AccountId, sqlx::Error> {
    let result =
        sqlx::query("INSERT INTO accounts (household_id, name, is_archived) VALUES (?, ?, ?)")
            .bind(account.household_id.0)
            .bind(&account.name)
            .bind(account.is_archived)
            .execute(pool)
            .await?;
    Ok(AccountId(result.last_insert_rowid()))
}

pub async fn get_accounts(
    pool: &DbPool,
    household: HouseholdId,
) -> Result<Vec<Account>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, i64, String, bool)>(
        "SELECT id, household_id, name, is_archived FROM accounts WHERE household_id = ? AND is_archived = 0 ORDER BY name",
    )
    .bind(household.0)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Account {
            id: Some(AccountId(r.0)),
            household_id: HouseholdId(r.1),
            name: r.2,
            is_archived: r.3,
        })
        .collect())
}

pub async fn insert_category(
    pool: &DbPool,
    household: HouseholdId,
    name: &str,
    color: Option<&str>,
) -> Result<CategoryId, sqlx::Error> {
    let result = sqlx::query("INSERT INTO categories (household_id, name, color) VALUES (?, ?, ?)")
        .bind(household.0)
        .bind(name)
        .bind(color)
        .execute(pool)
        .await?;
    Ok(CategoryId(result.last_insert_rowid()))
}

pub async fn insert_counterparty(
    pool: &DbPool,
    household: HouseholdId,
    name: &str,
    counterparty_type: Option<&str>,
) -> Result<CounterpartyId, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO counterparties (household_id, name, counterparty_type) VALUES (?, ?, ?)",
    )
    .bind(household.0)
    .bind(name)
    .bind(counterparty_type)
    .execute(pool)
    .await?;
    Ok(CounterpartyId(result.last_insert_rowid()))
}

// ── Transactions ──────────────────────────────────────────────────────────────

async fn insert_transaction_on(
    conn: &mut SqliteConnection,
    tx: &NewTransaction,
) -> Result<TransactionId, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO transactions (household_id, account_id, name, amount_cents, transaction_type, value_date, category_id, counterparty_id) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(tx.household_id.0)
    .bind(tx.account_id.0)
    .bind(tx.name.as_deref())
    .bind(cents(tx.amount)?)
    .bind(tx.transaction_type.as_str())
    .bind(tx.value_date)
    .bind(tx.category_id.map(|c| c.0))
    .bind(tx.counterparty_id.map(|c| c.0))
    .execute(&mut *conn)
    .await?;
    Ok(TransactionId(result.last_insert_rowid()))
}

pub async fn insert_transaction(
    pool: &DbPool,
    tx: &NewTransaction,
) -> Result<TransactionId, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    insert_transaction_on(&mut *conn, tx).await
}

/// Inserts all rows in one SQL transaction; either every row lands or none does.
pub async fn insert_transactions(
    pool: &DbPool,
    rows: &[NewTransaction],
) -> Result<Vec<TransactionId>, sqlx::Error> {
    let mut db_tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(rows.len());
    for row in rows {
        ids.push(insert_transaction_on(&mut *db_tx, row).await?);
    }
    db_tx.commit().await?;
    Ok(ids)
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    name: Option<String>,
    amount_cents: i64,
    transaction_type: String,
    value_date: NaiveDate,
    account_id: i64,
    category_id: Option<i64>,
    category_name: Option<String>,
    category_color: Option<String>,
    counterparty_id: Option<i64>,
    counterparty_name: Option<String>,
    counterparty_type: Option<String>,
    template_id: Option<i64>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = sqlx::Error;

    fn try_from(r: TransactionRow) -> Result<Self, Self::Error> {
        let category = match (r.category_id, r.category_name) {
            (Some(id), Some(name)) => Some(CategoryRef {
                id: CategoryId(id),
                name,
                color: r.category_color,
            }),
            _ => None,
        };
        let counterparty = match (r.counterparty_id, r.counterparty_name) {
            (Some(id), Some(name)) => Some(CounterpartyRef {
                id: CounterpartyId(id),
                name,
                counterparty_type: r.counterparty_type,
            }),
            _ => None,
        };

        Ok(Transaction {
            id: TransactionId(r.id),
            name: r.name,
            amount: Money::from_cents(r.amount_cents),
            transaction_type: r.transaction_type.parse().map_err(decode_err)?,
            value_date: r.value_date,
            account_id: AccountId(r.account_id),
            category,
            counterparty,
            template_id: r.template_id.map(TemplateId),
        })
    }
}

/// Transactions of a household with no template link, oldest first.
pub async fn get_untemplated_transactions(
    pool: &DbPool,
    household: HouseholdId,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT t.id, t.name, t.amount_cents, t.transaction_type, t.value_date, t.account_id,
               c.id AS category_id, c.name AS category_name, c.color AS category_color,
               p.id AS counterparty_id, p.name AS counterparty_name,
               p.counterparty_type AS counterparty_type,
               t.template_id
        FROM transactions t
        LEFT JOIN categories c ON c.id = t.category_id
        LEFT JOIN counterparties p ON p.id = t.counterparty_id
        WHERE t.household_id = ? AND t.template_id IS NULL
        ORDER BY t.value_date ASC, t.id ASC
        "#,
    )
    .bind(household.0)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Transaction::try_from).collect()
}

// ── Templates ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionTemplate {
    pub id: TemplateId,
    pub name: String,
    pub amount: Money,
    pub transaction_type: TransactionType,
    pub frequency: Frequency,
    pub account_id: AccountId,
    pub category_id: Option<CategoryId>,
    pub counterparty_id: Option<CounterpartyId>,
    pub start_date: NaiveDate,
}

pub async fn get_template_keys(
    pool: &DbPool,
    household: HouseholdId,
) -> Result<Vec<TemplateKey>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT name, transaction_type FROM transaction_templates WHERE household_id = ?",
    )
    .bind(household.0)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(name, ty)| {
            let ty = ty.parse::<TransactionType>().map_err(decode_err)?;
            Ok(TemplateKey::new(&name, ty))
        })
        .collect()
}

type TemplateRow = (
    i64,
    String,
    i64,
    String,
    String,
    i64,
    Option<i64>,
    Option<i64>,
    NaiveDate,
);

pub async fn get_templates(
    pool: &DbPool,
    household: HouseholdId,
) -> Result<Vec<TransactionTemplate>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TemplateRow>(
        "SELECT id, name, amount_cents, transaction_type, frequency, account_id, category_id, counterparty_id, start_date FROM transaction_templates WHERE household_id = ? ORDER BY id",
    )
    .bind(household.0)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| {
            Ok(TransactionTemplate {
                id: TemplateId(r.0),
                name: r.1,
                amount: Money::from_cents(r.2),
                transaction_type: r.3.parse().map_err(decode_err)?,
                frequency: r.4.parse().map_err(decode_err)?,
                account_id: AccountId(r.5),
                category_id: r.6.map(CategoryId),
                counterparty_id: r.7.map(CounterpartyId),
                start_date: r.8,
            })
        })
        .collect()
}

/// Stores a template and links the given transactions to it in one SQL
/// transaction. Ids belonging to another household are left untouched.
pub async fn insert_template(
    pool: &DbPool,
    household: HouseholdId,
    template: &NewTemplate,
    linked: &[TransactionId],
) -> Result<TemplateId, sqlx::Error> {
    let mut db_tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO transaction_templates (household_id, name, amount_cents, transaction_type, frequency, account_id, category_id, counterparty_id, start_date) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(household.0)
    .bind(&template.name)
    .bind(cents(template.amount)?)
    .bind(template.transaction_type.as_str())
    .bind(template.frequency.as_str())
    .bind(template.account_id.0)
    .bind(template.category_id.map(|c| c.0))
    .bind(template.counterparty_id.map(|c| c.0))
    .bind(template.start_date)
    .execute(&mut *db_tx)
    .await?;
    let template_id = TemplateId(result.last_insert_rowid());

    for id in linked {
        sqlx::query("UPDATE transactions SET template_id = ? WHERE id = ? AND household_id = ?")
            .bind(template_id.0)
            .bind(id.0)
            .bind(household.0)
            .execute(&mut *db_tx)
            .await?;
    }

    db_tx.commit().await?;
    Ok(template_id)
}

// ── CSV import tracking ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvImportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl CsvImportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CsvImportStatus::Pending => "pending",
            CsvImportStatus::Processing => "processing",
            CsvImportStatus::Completed => "completed",
            CsvImportStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for CsvImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CsvImportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CsvImportStatus::Pending),
            "processing" => Ok(CsvImportStatus::Processing),
            "completed" => Ok(CsvImportStatus::Completed),
            "failed" => Ok(CsvImportStatus::Failed),
            other => Err(format!("Unknown import status: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvImportRecord {
    pub id: i64,
    pub household_id: HouseholdId,
    pub file_name: String,
    pub status: CsvImportStatus,
    pub total_rows: i64,
    pub processed_rows: i64,
    pub error: Option<String>,
}

pub async fn create_csv_import(
    pool: &DbPool,
    household: HouseholdId,
    file_name: &str,
    total_rows: i64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO csv_imports (household_id, file_name, status, total_rows) VALUES (?, ?, ?, ?)",
    )
    .bind(household.0)
    .bind(file_name)
    .bind(CsvImportStatus::Pending.as_str())
    .bind(total_rows)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update_csv_import_progress(
    pool: &DbPool,
    import_id: i64,
    processed_rows: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE csv_imports SET status = ?, processed_rows = ? WHERE id = ?")
        .bind(CsvImportStatus::Processing.as_str())
        .bind(processed_rows)
        .bind(import_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn finish_csv_import(
    pool: &DbPool,
    import_id: i64,
    status: CsvImportStatus,
    error: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE csv_imports SET status = ?, error = ?, finished_at = datetime('now') WHERE id = ?",
    )
    .bind(status.as_str())
    .bind(error)
    .bind(import_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_csv_import(
    pool: &DbPool,
    import_id: i64,
) -> Result<Option<CsvImportRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, (i64, i64, String, String, i64, i64, Option<String>)>(
        "SELECT id, household_id, file_name, status, total_rows, processed_rows, error FROM csv_imports WHERE id = ?",
    )
    .bind(import_id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| {
        Ok(CsvImportRecord {
            id: r.0,
            household_id: HouseholdId(r.1),
            file_name: r.2,
            status: r.3.parse().map_err(|e: String| sqlx::Error::Decode(e.into()))?,
            total_rows: r.4,
            processed_rows: r.5,
            error: r.6,
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded() -> (DbPool, HouseholdId, AccountId) {
        let pool = create_memory_db().await.unwrap();
        let household = insert_household(&pool, "Home").await.unwrap();
        let account = insert_account(&pool, &Account::new(household, "Checking"))
            .await
            .unwrap();
        (pool, household, account)
    }

    fn new_tx(
        household: HouseholdId,
        account: AccountId,
        name: &str,
        value_date: NaiveDate,
    ) -> NewTransaction {
        NewTransaction {
            household_id: household,
            account_id: account,
            name: Some(name.to_string()),
            amount: Money::from_cents(1500),
            transaction_type: TransactionType::Expense,
            value_date,
            category_id: None,
            counterparty_id: None,
        }
    }

    #[tokio::test]
    async fn untemplated_transactions_are_date_ascending() {
        let (pool, household, account) = seeded().await;
        insert_transaction(&pool, &new_tx(household, account, "B", date(2024, 3, 1)))
            .await
            .unwrap();
        insert_transaction(&pool, &new_tx(household, account, "A", date(2024, 1, 1)))
            .await
            .unwrap();

        let txs = get_untemplated_transactions(&pool, household).await.unwrap();
        let names: Vec<_> = txs.iter().map(|t| t.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(txs[0].amount, Money::from_cents(1500));
        assert_eq!(txs[0].transaction_type, TransactionType::Expense);
    }

    #[tokio::test]
    async fn transactions_carry_category_and_counterparty() {
        let (pool, household, account) = seeded().await;
        let category = insert_category(&pool, household, "Streaming", Some("#e50914"))
            .await
            .unwrap();
        let counterparty = insert_counterparty(&pool, household, "Netflix Inc", Some("COMPANY"))
            .await
            .unwrap();
        let mut tx = new_tx(household, account, "Netflix", date(2024, 1, 5));
        tx.category_id = Some(category);
        tx.counterparty_id = Some(counterparty);
        insert_transaction(&pool, &tx).await.unwrap();

        let stored = get_untemplated_transactions(&pool, household).await.unwrap();
        let cat = stored[0].category.as_ref().unwrap();
        assert_eq!(cat.name, "Streaming");
        assert_eq!(cat.color.as_deref(), Some("#e50914"));
        let cp = stored[0].counterparty.as_ref().unwrap();
        assert_eq!(cp.id, counterparty);
        assert_eq!(cp.counterparty_type.as_deref(), Some("COMPANY"));
    }

    #[tokio::test]
    async fn households_are_isolated() {
        let (pool, household, account) = seeded().await;
        let other = insert_household(&pool, "Cabin").await.unwrap();
        insert_transaction(&pool, &new_tx(household, account, "Mine", date(2024, 1, 1)))
            .await
            .unwrap();
        assert!(get_untemplated_transactions(&pool, other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_template_links_transactions() {
        let (pool, household, account) = seeded().await;
        let rows = vec![
            new_tx(household, account, "Rent", date(2024, 1, 1)),
            new_tx(household, account, "Rent", date(2024, 2, 1)),
            new_tx(household, account, "Coffee", date(2024, 2, 2)),
        ];
        let ids = insert_transactions(&pool, &rows).await.unwrap();

        let template = NewTemplate {
            name: "Rent".to_string(),
            amount: Money::from_cents(1500),
            transaction_type: TransactionType::Expense,
            frequency: Frequency::Monthly,
            account_id: account,
            category_id: None,
            counterparty_id: None,
            start_date: date(2024, 2, 1),
        };
        let template_id = insert_template(&pool, household, &template, &ids[..2])
            .await
            .unwrap();

        let remaining = get_untemplated_transactions(&pool, household).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name.as_deref(), Some("Coffee"));

        let keys = get_template_keys(&pool, household).await.unwrap();
        assert_eq!(keys, vec![TemplateKey::new("Rent", TransactionType::Expense)]);

        let templates = get_templates(&pool, household).await.unwrap();
        assert_eq!(templates[0].id, template_id);
        assert_eq!(templates[0].frequency, Frequency::Monthly);
        assert_eq!(templates[0].start_date, date(2024, 2, 1));
    }

    #[tokio::test]
    async fn csv_import_lifecycle() {
        let (pool, household, _) = seeded().await;
        let id = create_csv_import(&pool, household, "bank.csv", 10).await.unwrap();

        let record = get_csv_import(&pool, id).await.unwrap().unwrap();
        assert_eq!(record.status, CsvImportStatus::Pending);

        update_csv_import_progress(&pool, id, 5).await.unwrap();
        let record = get_csv_import(&pool, id).await.unwrap().unwrap();
        assert_eq!(record.status, CsvImportStatus::Processing);
        assert_eq!(record.processed_rows, 5);

        finish_csv_import(&pool, id, CsvImportStatus::Failed, Some("boom"))
            .await
            .unwrap();
        let record = get_csv_import(&pool, id).await.unwrap().unwrap();
        assert_eq!(record.status, CsvImportStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn missing_import_is_none() {
        let pool = create_memory_db().await.unwrap();
        assert!(get_csv_import(&pool, 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn accounts_are_listed_per_household() {
        let (pool, household, account) = seeded().await;
        let accounts = get_accounts(&pool, household).await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, Some(account));
        assert_eq!(get_households(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hearth.db");
        let pool = create_db(&path).await.unwrap();
        insert_household(&pool, "Home").await.unwrap();
        assert!(path.exists());
    }
}
