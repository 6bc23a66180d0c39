use crate::core::loan::Loan;
use crate::core::portfolio::Portfolio;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One loan as supplied by the user: principal, annual rate in percent and
/// term in years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub name: String,
    pub balance: f64,
    pub annual_rate: f64,
    pub term_years: f64,
}

/// JSON schema for a file of loan records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoansFile {
    pub loans: Vec<LoanRecord>,
}

/// Errors arising while reading loan records.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("line {line}: invalid {field} '{value}'")]
    InvalidField {
        line: usize,
        field: RecordField,
        value: String,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
}

/// The numeric fields of a record, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Balance,
    Rate,
    Term,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordField::Balance => "balance",
            RecordField::Rate => "rate",
            RecordField::Term => "term",
        };
        write!(f, "{}", name)
    }
}

impl LoanRecord {
    pub fn new(name: impl Into<String>, balance: f64, annual_rate: f64, term_years: f64) -> Self {
        Self {
            name: name.into(),
            balance,
            annual_rate,
            term_years,
        }
    }

    /// Check the record can become a [`Loan`]: balance and term positive,
    /// rate not negative, all finite. `line` is used in the error only.
    pub fn validate(&self, line: usize) -> Result<(), InputError> {
        let invalid = |field, value: f64| InputError::InvalidField {
            line,
            field,
            value: value.to_string(),
        };
        if !(self.balance.is_finite() && self.balance > 0.0) {
            return Err(invalid(RecordField::Balance, self.balance));
        }
        if !(self.annual_rate.is_finite() && self.annual_rate >= 0.0) {
            return Err(invalid(RecordField::Rate, self.annual_rate));
        }
        if !(self.term_years.is_finite() && self.term_years > 0.0) {
            return Err(invalid(RecordField::Term, self.term_years));
        }
        Ok(())
    }

    pub fn to_loan(&self) -> Loan {
        Loan::new(
            self.name.clone(),
            self.balance,
            self.annual_rate,
            self.term_years,
        )
    }
}

impl fmt::Display for LoanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name, self.balance, self.annual_rate, self.term_years
        )
    }
}

/// Parse whitespace-separated records, one per line:
///
/// ```text
/// # name  balance  rate%  years
/// CAR     12000    6.9    5
/// CARD    3400.50  22.9   3
/// ```
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_text(input: &str) -> Result<Vec<LoanRecord>, InputError> {
    let mut records = Vec::new();
    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens.len() != 4 {
            return Err(InputError::Malformed {
                line,
                reason: format!(
                    "expected 'NAME BALANCE RATE TERM', found {} fields",
                    tokens.len()
                ),
            });
        }

        let number = |field, token: &str| {
            token.parse::<f64>().map_err(|_| InputError::InvalidField {
                line,
                field,
                value: token.to_string(),
            })
        };
        let record = LoanRecord::new(
            tokens[0],
            number(RecordField::Balance, tokens[1])?,
            number(RecordField::Rate, tokens[2])?,
            number(RecordField::Term, tokens[3])?,
        );
        record.validate(line)?;
        records.push(record);
    }
    Ok(records)
}

/// Parse a JSON document of the form `{ "loans": [ ... ] }`.
///
/// Validation errors report the 1-based position of the record in the
/// array as the line.
pub fn parse_json(input: &str) -> Result<Vec<LoanRecord>, InputError> {
    let file: LoansFile = serde_json::from_str(input)?;
    for (index, record) in file.loans.iter().enumerate() {
        record.validate(index + 1)?;
    }
    Ok(file.loans)
}

/// Render records in the text format accepted by [`parse_text`].
pub fn to_text(records: &[LoanRecord]) -> String {
    records.iter().map(|r| format!("{}\n", r)).collect()
}

impl Portfolio {
    /// Build a portfolio from validated records, keeping their order.
    pub fn from_records(records: &[LoanRecord]) -> Self {
        records.iter().map(LoanRecord::to_loan).collect()
    }
}
