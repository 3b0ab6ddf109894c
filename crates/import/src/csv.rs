use chrono::NaiveDate;
use hearth_core::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

/// Zero-based column positions in the source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvColumnMapping {
    pub date_column: Option<usize>,
    pub name_column: Option<usize>,
    pub amount_column: Option<usize>,
    /// Money leaving the household; stored as a negative amount.
    pub debit_column: Option<usize>,
    /// Money entering the household.
    pub credit_column: Option<usize>,
    pub type_column: Option<usize>,
    pub category_column: Option<usize>,
    pub counterparty_column: Option<usize>,
    pub date_format: String,
}

impl Default for CsvColumnMapping {
    fn default() -> Self {
        Self {
            date_column: None,
            name_column: None,
            amount_column: None,
            debit_column: None,
            credit_column: None,
            type_column: None,
            category_column: None,
            counterparty_column: None,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountColumns {
    Signed(usize),
    Split { debit: usize, credit: usize },
}

/// Column positions a valid mapping guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequiredColumns {
    date: usize,
    amount: AmountColumns,
}

impl CsvColumnMapping {
    pub fn validate(&self) -> Result<(), CsvError> {
        self.required_columns().map(|_| ())
    }

    fn required_columns(&self) -> Result<RequiredColumns, CsvError> {
        let date = self
            .date_column
            .ok_or_else(|| CsvError::MissingColumn("date_column".to_string()))?;
        let amount = match (self.amount_column, self.debit_column, self.credit_column) {
            (Some(col), _, _) => AmountColumns::Signed(col),
            (None, Some(debit), Some(credit)) => AmountColumns::Split { debit, credit },
            _ => {
                return Err(CsvError::MissingColumn(
                    "amount_column or debit_column + credit_column".to_string(),
                ))
            }
        };
        Ok(RequiredColumns { date, amount })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvImportProfile {
    pub name: String,
    pub mapping: CsvColumnMapping,
    pub has_header: bool,
    pub delimiter: String,
}

impl Default for CsvImportProfile {
    fn default() -> Self {
        Self {
            name: "Unnamed Profile".to_string(),
            mapping: CsvColumnMapping::default(),
            has_header: true,
            delimiter: ",".to_string(),
        }
    }
}

impl CsvImportProfile {
    pub fn from_toml(toml_content: &str) -> Result<Self, CsvError> {
        toml::from_str(toml_content).map_err(|e| CsvError::InvalidProfile(e.to_string()))
    }
}

/// One parsed data row, before value mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    /// 1-based record number, header excluded.
    pub line: usize,
    pub value_date: NaiveDate,
    pub name: Option<String>,
    /// Signed: negative for outflows.
    pub amount: Money,
    pub raw_type: Option<String>,
    pub raw_category: Option<String>,
    pub raw_counterparty: Option<String>,
}

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Invalid date format on line {line}: {value}")]
    InvalidDate { line: usize, value: String },
    #[error("Invalid amount on line {line}: {value}")]
    InvalidAmount { line: usize, value: String },
    #[error("Invalid import profile: {0}")]
    InvalidProfile(String),
    #[error("No data rows")]
    NoDataRows,
}

fn optional_text(record: &csv::StringRecord, col: Option<usize>) -> Option<String> {
    col.and_then(|c| record.get(c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub struct CsvImporter;

impl CsvImporter {
    pub fn parse_profile<R: Read>(
        reader: &mut csv::Reader<R>,
        profile: &CsvImportProfile,
    ) -> Result<Vec<CsvRow>, CsvError> {
        let mapping = &profile.mapping;
        let columns = mapping.required_columns()?;

        let mut rows = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let line = idx + 1;

            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }

            let date_field = record
                .get(columns.date)
                .ok_or_else(|| CsvError::MissingColumn(format!("date_column {}", columns.date)))?;
            let value_date =
                parse_date(date_field, &mapping.date_format).ok_or_else(|| CsvError::InvalidDate {
                    line,
                    value: date_field.trim().to_string(),
                })?;

            let amount = match columns.amount {
                AmountColumns::Signed(col) => {
                    let field = record.get(col).unwrap_or_default();
                    parse_amount(field).ok_or_else(|| CsvError::InvalidAmount {
                        line,
                        value: field.trim().to_string(),
                    })?
                }
                AmountColumns::Split { debit, credit } => {
                    let side = |col: usize| -> Result<Option<Money>, CsvError> {
                        match record.get(col).filter(|s| !s.trim().is_empty()) {
                            Some(field) => parse_amount(field).map(Some).ok_or_else(|| {
                                CsvError::InvalidAmount {
                                    line,
                                    value: field.trim().to_string(),
                                }
                            }),
                            None => Ok(None),
                        }
                    };
                    match (side(debit)?, side(credit)?) {
                        (Some(d), None) => -d.abs(),
                        (None, Some(c)) => c.abs(),
                        (Some(d), Some(c)) => c.abs() - d.abs(),
                        (None, None) => Money::zero(),
                    }
                }
            };

            rows.push(CsvRow {
                line,
                value_date,
                name: optional_text(&record, mapping.name_column),
                amount,
                raw_type: optional_text(&record, mapping.type_column),
                raw_category: optional_text(&record, mapping.category_column),
                raw_counterparty: optional_text(&record, mapping.counterparty_column),
            });
        }

        if rows.is_empty() {
            return Err(CsvError::NoDataRows);
        }

        Ok(rows)
    }
}

fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, format) {
        return Some(date);
    }

    ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_amount(s: &str) -> Option<Money> {
    let s = s.trim();
    let (negative, s) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };
    let cleaned = s.replace([',', '$', ' '], "");
    let mut dec = Decimal::from_str(&cleaned).ok()?;
    if negative {
        dec = -dec;
    }
    Some(Money::from_decimal(dec))
}

pub fn import_csv<R: Read>(data: R, profile: &CsvImportProfile) -> Result<Vec<CsvRow>, CsvError> {
    let delimiter = profile
        .delimiter
        .as_bytes()
        .first()
        .copied()
        .unwrap_or(b',');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(profile.has_header)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data);

    CsvImporter::parse_profile(&mut reader, profile)
}
