//! Trip parameter validation
//!
//! Validation here is advisory: a failing check produces a warning that the
//! page shows next to the offending field, but the unvalidated value is still
//! used for the rest of the render.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::TripDeckError;

static BUDGET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$?(\d+)\s*-\s*\$?(\d+)$").expect("invalid budget pattern"));

/// Smallest trip duration the duration input accepts
pub const MIN_TRIP_DAYS: i64 = 1;
/// Largest trip duration the duration input accepts
pub const MAX_TRIP_DAYS: i64 = 30;

pub const BUDGET_FORMAT_WARNING: &str = "Invalid budget format. Please use format like $200-$1000";

/// Check a budget string such as `$200-$800` or `200 - 800`.
///
/// Only the shape is checked. The bounds are not compared and one side may
/// carry a `$` while the other does not.
#[must_use]
pub fn validate_budget(text: &str) -> bool {
    BUDGET_PATTERN.is_match(text)
}

/// Check that a trip duration parses as a strictly positive integer.
#[must_use]
pub fn validate_duration(text: &str) -> bool {
    match text.trim().parse::<i64>() {
        Ok(days) => days > 0,
        Err(e) => matches!(e.kind(), IntErrorKind::PosOverflow),
    }
}

/// Parsed bounds of a budget string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetRange {
    pub low: u64,
    pub high: u64,
}

impl BudgetRange {
    /// Parse a budget string into its two bounds.
    ///
    /// Returns `None` when the shape is wrong or a bound does not fit in a
    /// `u64`. `low > high` is accepted as written.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let captures = BUDGET_PATTERN.captures(text)?;
        let low = captures.get(1)?.as_str().parse().ok()?;
        let high = captures.get(2)?.as_str().parse().ok()?;
        Some(Self { low, high })
    }
}

impl fmt::Display for BudgetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}-${}", self.low, self.high)
    }
}

/// Kind of trip the user is planning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    #[default]
    Luxury,
    Adventure,
    Family,
    Business,
    Romantic,
    Budget,
}

impl TripType {
    pub const ALL: [TripType; 6] = [
        TripType::Luxury,
        TripType::Adventure,
        TripType::Family,
        TripType::Business,
        TripType::Romantic,
        TripType::Budget,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TripType::Luxury => "luxury",
            TripType::Adventure => "adventure",
            TripType::Family => "family",
            TripType::Business => "business",
            TripType::Romantic => "romantic",
            TripType::Budget => "budget",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripType {
    type Err = TripDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TripType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                TripDeckError::validation(format!(
                    "Unknown trip type '{s}'. Must be one of: {}",
                    TripType::ALL.map(TripType::as_str).join(", ")
                ))
            })
    }
}

/// Sidebar field a warning belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Budget,
    TripType,
    Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldWarning {
    pub field: Field,
    pub message: String,
}

impl FieldWarning {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Values typed into the sidebar, kept exactly as entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripParameters {
    pub country: String,
    pub city: String,
    pub budget: String,
    pub trip_type: String,
    pub duration: String,
}

impl TripParameters {
    /// Trip type to show as selected. Unknown values fall back to the first option.
    #[must_use]
    pub fn trip_type(&self) -> TripType {
        self.trip_type.parse().unwrap_or_default()
    }

    #[must_use]
    pub fn budget_range(&self) -> Option<BudgetRange> {
        BudgetRange::parse(&self.budget)
    }

    /// Collect the warnings to show next to the sidebar fields.
    ///
    /// An empty budget is not flagged.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldWarning> {
        let mut warnings = Vec::new();

        if !self.budget.is_empty() && !validate_budget(&self.budget) {
            warnings.push(FieldWarning::new(Field::Budget, BUDGET_FORMAT_WARNING));
        }

        if let Err(e) = self.trip_type.parse::<TripType>() {
            warnings.push(FieldWarning::new(
                Field::TripType,
                format!("{e}. Showing '{}'.", TripType::default()),
            ));
        }

        if !validate_duration(&self.duration) {
            warnings.push(FieldWarning::new(
                Field::Duration,
                "Trip duration must be a whole number of days greater than zero",
            ));
        } else if !self
            .duration
            .trim()
            .parse::<i64>()
            .is_ok_and(|days| (MIN_TRIP_DAYS..=MAX_TRIP_DAYS).contains(&days))
        {
            warnings.push(FieldWarning::new(
                Field::Duration,
                format!("Trip duration must be between {MIN_TRIP_DAYS} and {MAX_TRIP_DAYS} days"),
            ));
        }

        warnings
    }
}
