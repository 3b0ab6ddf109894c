//! Argument definitions. Command bodies live in `commands`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hearth_core::TransactionType;

/// Hearth - household finance tracker
#[derive(Parser, Debug)]
#[command(name = "hearth")]
#[command(about = "Track household finances and spot recurring transactions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and its schema
    Init,

    /// Manage households
    #[command(subcommand)]
    Household(HouseholdCommands),

    /// Manage accounts
    #[command(subcommand)]
    Account(AccountCommands),

    /// Import transactions from a CSV statement
    Import {
        /// CSV file to import
        file: PathBuf,

        #[arg(long)]
        household: i64,

        #[arg(long)]
        account: i64,

        /// Import profile (TOML); without one, columns are date,name,amount
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Value mapping rules (TOML)
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Show recurring transactions that have no template yet
    Suggest {
        #[arg(long)]
        household: i64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Turn a suggestion into a template
    Accept {
        #[arg(long)]
        household: i64,

        /// Suggestion name as shown by `suggest`
        #[arg(long)]
        name: String,

        /// INCOME, EXPENSE or TRANSFER
        #[arg(long = "type", value_parser = parse_transaction_type)]
        transaction_type: TransactionType,
    },
}

#[derive(Subcommand, Debug)]
pub enum HouseholdCommands {
    /// Add a household
    Add { name: String },
    /// List households
    List,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Add an account to a household
    Add {
        #[arg(long)]
        household: i64,
        name: String,
    },
    /// List accounts of a household
    List {
        #[arg(long)]
        household: i64,
    },
}

fn parse_transaction_type(s: &str) -> Result<TransactionType, String> {
    s.parse::<TransactionType>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suggest_with_global_flags() {
        let cli = Cli::try_parse_from([
            "hearth", "suggest", "--household", "3", "--json", "--config", "h.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("h.toml")));
        match cli.command {
            Commands::Suggest { household, json } => {
                assert_eq!(household, 3);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_accept_type_case_insensitively() {
        let cli = Cli::try_parse_from([
            "hearth", "accept", "--household", "1", "--name", "Netflix", "--type", "expense",
        ])
        .unwrap();
        match cli.command {
            Commands::Accept { name, transaction_type, .. } => {
                assert_eq!(name, "Netflix");
                assert_eq!(transaction_type, TransactionType::Expense);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let result = Cli::try_parse_from([
            "hearth", "accept", "--household", "1", "--name", "Rent", "--type", "gift",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_nested_account_add() {
        let cli = Cli::try_parse_from(["hearth", "account", "add", "--household", "2", "Checking"])
            .unwrap();
        match cli.command {
            Commands::Account(AccountCommands::Add { household, name }) => {
                assert_eq!(household, 2);
                assert_eq!(name, "Checking");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
