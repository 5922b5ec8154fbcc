use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<i64>,
    pub name: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: Option<i64>,
    pub value: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: f64,
    pub voters: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "comment")]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRating {
    #[serde(alias = "rating")]
    pub value: i64,
}

impl Comment {
    /// Trims both fields; either being blank is a validation error.
    pub fn new(name: &str, text: &str) -> Result<Self> {
        let name = name.trim();
        let text = text.trim();
        if name.is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        if text.is_empty() {
            return Err(Error::validation("comment must not be empty"));
        }

        Ok(Self {
            id: None,
            name: name.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
        })
    }
}

impl Rating {
    pub fn new(value: i64) -> Result<Self> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(Error::validation(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}, got {value}"
            )));
        }

        Ok(Self {
            id: None,
            value,
            timestamp: Utc::now(),
        })
    }
}

impl RatingSummary {
    /// Mean of `values` rounded to one decimal place.
    pub fn from_values(values: &[i64]) -> Self {
        if values.is_empty() {
            return Self {
                average: 0.0,
                voters: 0,
            };
        }

        let sum: i64 = values.iter().sum();
        let mean = sum as f64 / values.len() as f64;

        Self {
            average: round_tenths(mean),
            voters: values.len() as u64,
        }
    }
}

/// Rounds half-up on the exact decimal value of `x`, not on `x * 10.0`, so a
/// mean stored just below a tie (87/20 is 4.34999...) rounds down.
fn round_tenths(x: f64) -> f64 {
    // 60 places is past the last nonzero digit of any double in 0..=5.
    let exact = format!("{:.60}", x.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = digits.next().unwrap_or(0);
    let round_up = digits.next().is_some_and(|d| d >= 5);

    let scaled = whole.parse::<i64>().unwrap_or(0) * 10 + tenths + i64::from(round_up);
    (scaled as f64 / 10.0).copysign(x)
}
