use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use hearth_core::{
    normalize_name, Account, AccountId, HouseholdId, NewTemplate, SuggestedTemplate, TemplateId,
    TemplateKey, TransactionType,
};
use hearth_import::{
    import_csv, CsvColumnMapping, CsvImportProfile, ImportBatch, ImportProgress, ImportSummary,
    ProgressCallback, ValueMapper,
};
use hearth_recurring::RecurringDetector;
use hearth_storage::{
    create_db, get_accounts, get_households, insert_account, insert_household, insert_template,
    DbPool, Store,
};
use tracing::{debug, info};

use crate::cli::{AccountCommands, Commands, HouseholdCommands};
use crate::config::Settings;

pub async fn open_db(settings: &Settings) -> Result<DbPool> {
    if let Some(parent) = settings.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let pool = create_db(&settings.database_path)
        .await
        .with_context(|| format!("Failed to open {}", settings.database_path.display()))?;
    debug!(path = %settings.database_path.display(), "database ready");
    Ok(pool)
}

pub async fn run(command: Commands, settings: &Settings) -> Result<()> {
    let pool = open_db(settings).await?;

    match command {
        Commands::Init => {
            println!("Database ready at {}", settings.database_path.display());
        }
        Commands::Household(HouseholdCommands::Add { name }) => {
            let id = cmd_household_add(&pool, &name).await?;
            println!("Created household {id}: {name}");
        }
        Commands::Household(HouseholdCommands::List) => cmd_household_list(&pool).await?,
        Commands::Account(AccountCommands::Add { household, name }) => {
            let id = cmd_account_add(&pool, HouseholdId(household), &name).await?;
            println!("Created account {id}: {name}");
        }
        Commands::Account(AccountCommands::List { household }) => {
            cmd_account_list(&pool, HouseholdId(household)).await?
        }
        Commands::Import {
            file,
            household,
            account,
            profile,
            rules,
        } => {
            let summary = cmd_import(
                &pool,
                settings,
                &file,
                HouseholdId(household),
                AccountId(account),
                profile.as_deref(),
                rules.as_deref(),
            )
            .await?;
            println!(
                "Imported {} transactions (import #{})",
                summary.created.len(),
                summary.import_id
            );
        }
        Commands::Suggest { household, json } => {
            let suggestions = detect(&pool, HouseholdId(household)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                print_suggestions(&suggestions);
            }
        }
        Commands::Accept {
            household,
            name,
            transaction_type,
        } => {
            let id = cmd_accept(&pool, HouseholdId(household), &name, transaction_type).await?;
            println!("Created template {id} for {name}");
        }
    }

    Ok(())
}

async fn cmd_household_add(pool: &DbPool, name: &str) -> Result<HouseholdId> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Household name must not be empty");
    }
    Ok(insert_household(pool, name).await?)
}

async fn cmd_household_list(pool: &DbPool) -> Result<()> {
    for household in get_households(pool).await? {
        if let Some(id) = household.id {
            println!("{id:>5}  {}", household.name);
        }
    }
    Ok(())
}

async fn cmd_account_add(pool: &DbPool, household: HouseholdId, name: &str) -> Result<AccountId> {
    let id = insert_account(pool, &Account::new(household, name.trim()))
        .await
        .with_context(|| format!("Failed to add account to household {household}"))?;
    Ok(id)
}

async fn cmd_account_list(pool: &DbPool, household: HouseholdId) -> Result<()> {
    for account in get_accounts(pool, household).await? {
        if let Some(id) = account.id {
            let archived = if account.is_archived { "  (archived)" } else { "" };
            println!("{id:>5}  {}{archived}", account.name);
        }
    }
    Ok(())
}

fn load_profile(profile: Option<&Path>, settings: &Settings) -> Result<CsvImportProfile> {
    match profile {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read profile {}", path.display()))?;
            Ok(CsvImportProfile::from_toml(&content)?)
        }
        None => Ok(CsvImportProfile {
            name: "default".to_string(),
            mapping: CsvColumnMapping {
                date_column: Some(0),
                name_column: Some(1),
                amount_column: Some(2),
                date_format: settings.import.default_date_format.clone(),
                ..CsvColumnMapping::default()
            },
            ..CsvImportProfile::default()
        }),
    }
}

fn load_rules(rules: Option<&Path>) -> Result<ValueMapper> {
    match rules {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read rules {}", path.display()))?;
            Ok(ValueMapper::from_toml(&content)?)
        }
        None => Ok(ValueMapper::default()),
    }
}

async fn cmd_import(
    pool: &DbPool,
    settings: &Settings,
    file: &Path,
    household: HouseholdId,
    account: AccountId,
    profile: Option<&Path>,
    rules: Option<&Path>,
) -> Result<ImportSummary> {
    let profile = load_profile(profile, settings)?;
    let mapper = load_rules(rules)?;
    let reader = std::fs::File::open(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let rows = import_csv(reader, &profile)?;
    info!(rows = rows.len(), rules = mapper.len(), profile = %profile.name, "parsed CSV");

    let report: ProgressCallback = Box::new(|progress: ImportProgress| {
        eprint!("\rImported {}/{}", progress.processed, progress.total);
        if progress.is_done() {
            eprintln!();
        }
    });

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let summary = ImportBatch::new(household, account, settings.import.batch_size)
        .run(pool, &file_name, &rows, &mapper, Some(&report))
        .await?;
    Ok(summary)
}

async fn detect(pool: &DbPool, household: HouseholdId) -> Result<Vec<SuggestedTemplate>> {
    let detector = RecurringDetector::new(Store::new(pool.clone()));
    Ok(detector.detect(household).await?)
}

async fn cmd_accept(
    pool: &DbPool,
    household: HouseholdId,
    name: &str,
    transaction_type: TransactionType,
) -> Result<TemplateId> {
    let wanted = TemplateKey::new(name, transaction_type);
    let suggestions = detect(pool, household).await?;
    let suggestion = suggestions
        .iter()
        .find(|s| s.key() == wanted)
        .ok_or_else(|| {
            anyhow!(
                "No {} suggestion named '{}' in household {household}",
                transaction_type,
                normalize_name(Some(name))
            )
        })?;

    let template = NewTemplate::from(suggestion);
    let id = insert_template(pool, household, &template, &suggestion.transaction_ids()).await?;
    info!(template = %id, linked = suggestion.occurrences, "accepted suggestion");
    Ok(id)
}

fn print_suggestions(suggestions: &[SuggestedTemplate]) {
    if suggestions.is_empty() {
        println!("No recurring transactions found.");
        return;
    }

    println!(
        "{:<30} {:>12} {:<9} {:<8} {:<7} {:>5}  {}",
        "Name", "Amount", "Type", "Every", "Conf.", "Seen", "Last"
    );
    println!("{}", "-".repeat(88));
    for s in suggestions {
        let name = if s.name.is_empty() { "(unnamed)" } else { s.name.as_str() };
        println!(
            "{:<30} {:>12} {:<9} {:<8} {:<7} {:>5}  {}",
            truncate(name, 30),
            s.amount.to_string(),
            s.transaction_type.as_str(),
            s.frequency.as_str(),
            s.confidence.as_str(),
            s.occurrences,
            s.latest_date
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
