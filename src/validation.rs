//! Field validation for request payloads.
//!
//! Each payload lists its checks as `(field, value, rule)` triples. All checks
//! run in order and every violation is collected, so a caller sees every
//! problem with a request at once.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must be non-blank.
    Required,
    /// Value, if non-empty, must look like an email address.
    Email,
    /// Value, if non-empty, must be a `YYYY-MM-DD` calendar date.
    Date,
}

impl Rule {
    fn check(self, value: &str) -> Result<(), &'static str> {
        match self {
            Rule::Required if value.trim().is_empty() => Err("is required"),
            Rule::Email if !value.is_empty() && !EMAIL_RE.is_match(value) => {
                Err("must be a valid email address")
            }
            Rule::Date if !value.is_empty() && parse_date(value).is_none() => {
                Err("must be a valid date in YYYY-MM-DD format")
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for v in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", v.field, v.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Run every check and collect the failures.
pub fn run(checks: &[(&'static str, &str, Rule)]) -> Result<(), ValidationErrors> {
    let violations: Vec<Violation> = checks
        .iter()
        .filter_map(|&(field, value, rule)| {
            rule.check(value).err().map(|message| Violation {
                field,
                message: message.to_string(),
            })
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

/// Implemented by request payloads that carry their own rule list.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Parse a strict `YYYY-MM-DD` date. Unpadded or signed years are rejected.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    let shaped = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}
