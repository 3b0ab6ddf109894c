use hearth_core::{CategoryId, CounterpartyId, TransactionType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::csv::CsvRow;

/// Which raw CSV value a rule inspects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MappedField {
    #[default]
    Name,
    Type,
    Category,
    Counterparty,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    #[default]
    Contains,
    Exact,
    Regex,
}

impl std::str::FromStr for MatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contains" => Ok(MatchType::Contains),
            "exact" => Ok(MatchType::Exact),
            "regex" => Ok(MatchType::Regex),
            other => Err(format!("Unknown match type: '{other}'")),
        }
    }
}

/// Maps a raw CSV value onto household entities. Any target left `None` is
/// not assigned by this rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRule {
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub field: MappedField,
    pub pattern: String,
    #[serde(default)]
    pub match_type: MatchType,
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    pub counterparty_id: Option<CounterpartyId>,
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Invalid regex in rule '{rule}': {source}")]
    InvalidRegex {
        rule: String,
        #[source]
        source: regex::Error,
    },
    #[error("Failed to parse rules: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedValues {
    pub transaction_type: TransactionType,
    pub category_id: Option<CategoryId>,
    pub counterparty_id: Option<CounterpartyId>,
}

#[derive(Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<ValueRule>,
}

struct CompiledRule {
    rule: ValueRule,
    compiled_regex: Option<regex::Regex>,
}

#[derive(Default)]
pub struct ValueMapper {
    rules: Vec<CompiledRule>,
}

impl ValueMapper {
    pub fn new(rules: Vec<ValueRule>) -> Result<Self, MappingError> {
        let mut compiled = rules
            .into_iter()
            .map(|rule| -> Result<CompiledRule, MappingError> {
                let compiled_regex = match rule.match_type {
                    MatchType::Regex => Some(regex::Regex::new(&rule.pattern).map_err(|source| {
                        MappingError::InvalidRegex {
                            rule: rule.name.clone(),
                            source,
                        }
                    })?),
                    _ => None,
                };
                Ok(CompiledRule { rule, compiled_regex })
            })
            .collect::<Result<Vec<_>, _>>()?;
        // Highest priority first; stable for equal priorities.
        compiled.sort_by(|a, b| b.rule.priority.cmp(&a.rule.priority));
        Ok(Self { rules: compiled })
    }

    /// Parses `[[rules]]` tables.
    pub fn from_toml(toml_content: &str) -> Result<Self, MappingError> {
        let file: RuleFile = toml::from_str(toml_content)?;
        Self::new(file.rules)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolves type, category and counterparty for a row. Each target takes
    /// the first matching rule that sets it. Without a rule, the type comes
    /// from the raw type column and then from the amount sign.
    pub fn resolve(&self, row: &CsvRow) -> ResolvedValues {
        let matching: Vec<&ValueRule> = self
            .rules
            .iter()
            .filter(|cr| rule_matches(cr, row))
            .map(|cr| &cr.rule)
            .collect();

        let transaction_type = matching
            .iter()
            .find_map(|r| r.transaction_type)
            .or_else(|| row.raw_type.as_deref().and_then(|t| t.parse().ok()))
            .unwrap_or_else(|| TransactionType::from_signed_amount(row.amount));

        ResolvedValues {
            transaction_type,
            category_id: matching.iter().find_map(|r| r.category_id),
            counterparty_id: matching.iter().find_map(|r| r.counterparty_id),
        }
    }
}

fn field_value(row: &CsvRow, field: MappedField) -> Option<&str> {
    match field {
        MappedField::Name => row.name.as_deref(),
        MappedField::Type => row.raw_type.as_deref(),
        MappedField::Category => row.raw_category.as_deref(),
        MappedField::Counterparty => row.raw_counterparty.as_deref(),
    }
}

fn rule_matches(cr: &CompiledRule, row: &CsvRow) -> bool {
    let rule = &cr.rule;
    let Some(value) = field_value(row, rule.field) else {
        return false;
    };

    match rule.match_type {
        MatchType::Contains => value.to_lowercase().contains(&rule.pattern.to_lowercase()),
        MatchType::Exact => value.eq_ignore_ascii_case(&rule.pattern),
        MatchType::Regex => cr
            .compiled_regex
            .as_ref()
            .is_some_and(|re| re.is_match(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hearth_core::Money;

    fn row(name: &str, cents: i64) -> CsvRow {
        CsvRow {
            line: 1,
            value_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            name: Some(name.to_string()),
            amount: Money::from_cents(cents),
            raw_type: None,
            raw_category: None,
            raw_counterparty: None,
        }
    }

    fn rule(pattern: &str, match_type: MatchType, priority: i32) -> ValueRule {
        ValueRule {
            name: pattern.to_string(),
            priority,
            field: MappedField::Name,
            pattern: pattern.to_string(),
            match_type,
            transaction_type: None,
            category_id: None,
            counterparty_id: None,
        }
    }

    #[test]
    fn contains_is_case_insensitive() {
        let mapper = ValueMapper::new(vec![ValueRule {
            category_id: Some(CategoryId(3)),
            ..rule("netflix", MatchType::Contains, 1)
        }])
        .unwrap();
        let resolved = mapper.resolve(&row("NETFLIX.COM 1234", -1500));
        assert_eq!(resolved.category_id, Some(CategoryId(3)));
    }

    #[test]
    fn exact_requires_whole_value() {
        let mapper = ValueMapper::new(vec![ValueRule {
            category_id: Some(CategoryId(1)),
            ..rule("rent", MatchType::Exact, 1)
        }])
        .unwrap();
        assert_eq!(mapper.resolve(&row("Rent", -90000)).category_id, Some(CategoryId(1)));
        assert_eq!(mapper.resolve(&row("Rent deposit", -90000)).category_id, None);
    }

    #[test]
    fn regex_rules_compile_once() {
        let mapper = ValueMapper::new(vec![ValueRule {
            counterparty_id: Some(CounterpartyId(8)),
            ..rule(r"^(AMZN|AMAZON)", MatchType::Regex, 1)
        }])
        .unwrap();
        assert_eq!(
            mapper.resolve(&row("AMZN*PRIME", -1399)).counterparty_id,
            Some(CounterpartyId(8))
        );
        assert_eq!(mapper.resolve(&row("WHOLE FOODS", -1399)).counterparty_id, None);
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let result = ValueMapper::new(vec![rule("(unclosed", MatchType::Regex, 1)]);
        assert!(matches!(result, Err(MappingError::InvalidRegex { .. })));
    }

    #[test]
    fn highest_priority_wins_per_target() {
        let mapper = ValueMapper::new(vec![
            ValueRule {
                category_id: Some(CategoryId(1)),
                counterparty_id: Some(CounterpartyId(1)),
                ..rule("amazon", MatchType::Contains, 1)
            },
            ValueRule {
                category_id: Some(CategoryId(2)),
                ..rule("amazon prime", MatchType::Contains, 10)
            },
        ])
        .unwrap();
        let resolved = mapper.resolve(&row("Amazon Prime", -1399));
        assert_eq!(resolved.category_id, Some(CategoryId(2)));
        // Lower rule still fills the target the higher one left empty.
        assert_eq!(resolved.counterparty_id, Some(CounterpartyId(1)));
    }

    #[test]
    fn type_falls_back_to_raw_column_then_sign() {
        let mapper = ValueMapper::default();
        let mut r = row("Move to savings", -10000);
        assert_eq!(mapper.resolve(&r).transaction_type, TransactionType::Expense);
        r.raw_type = Some("transfer".to_string());
        assert_eq!(mapper.resolve(&r).transaction_type, TransactionType::Transfer);
        r.raw_type = Some("DR".to_string());
        assert_eq!(mapper.resolve(&r).transaction_type, TransactionType::Expense);
        assert_eq!(
            mapper.resolve(&row("Salary", 250000)).transaction_type,
            TransactionType::Income
        );
    }

    #[test]
    fn type_column_values_can_be_mapped() {
        let mapper = ValueMapper::new(vec![ValueRule {
            field: MappedField::Type,
            transaction_type: Some(TransactionType::Transfer),
            ..rule("UEB", MatchType::Exact, 1)
        }])
        .unwrap();
        let mut r = row("Savings", -5000);
        r.raw_type = Some("ueb".to_string());
        assert_eq!(mapper.resolve(&r).transaction_type, TransactionType::Transfer);
    }

    #[test]
    fn rules_from_toml() {
        let mapper = ValueMapper::from_toml(
            r#"
            [[rules]]
            name = "streaming"
            pattern = "netflix"
            category_id = 4

            [[rules]]
            name = "payroll"
            priority = 5
            field = "counterparty"
            pattern = "^ACME"
            match_type = "regex"
            transaction_type = "INCOME"
            "#,
        )
        .unwrap();
        assert_eq!(mapper.len(), 2);

        let mut r = row("ACME payroll", 300000);
        r.raw_counterparty = Some("ACME Corp".to_string());
        assert_eq!(mapper.resolve(&r).transaction_type, TransactionType::Income);
        assert_eq!(mapper.resolve(&row("Netflix", -1500)).category_id, Some(CategoryId(4)));
    }

    #[test]
    fn match_type_from_str() {
        assert_eq!("Regex".parse::<MatchType>(), Ok(MatchType::Regex));
        assert!("fuzzy".parse::<MatchType>().is_err());
    }
}
