pub mod db;
pub mod feed;

pub use db::{
    create_csv_import, create_db, create_memory_db, finish_csv_import, get_accounts,
    get_csv_import, get_households, get_template_keys, get_templates,
    get_untemplated_transactions, insert_account, insert_category, insert_counterparty,
    insert_household, insert_template, insert_transaction, insert_transactions,
    update_csv_import_progress, CsvImportRecord, CsvImportStatus, DbPool, TransactionTemplate,
};
pub use feed::Store;
