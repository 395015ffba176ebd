//! Booking form validation

use crate::error::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Booking request for one camper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub name: String,
    pub email: String,
    /// `YYYY-MM-DD`
    pub booking_date: String,
    #[serde(default)]
    pub comment: String,
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<String>,
}

impl BookingErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.booking_date.is_none()
    }

    /// Messages in form order
    pub fn messages(&self) -> Vec<&str> {
        [&self.name, &self.email, &self.booking_date]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .collect()
    }
}

impl BookingPayload {
    /// Check every field; `today` is the earliest bookable date
    pub fn validate(&self, today: NaiveDate) -> BookingErrors {
        let mut errors = BookingErrors::default();

        if self.name.trim().is_empty() {
            errors.name = Some("Name is required".to_string());
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.email = Some("Email is required".to_string());
        } else if !EMAIL_RE.is_match(email) {
            errors.email = Some("Please enter a valid email address".to_string());
        }

        let date = self.booking_date.trim();
        if date.is_empty() {
            errors.booking_date = Some("Booking date is required".to_string());
        } else {
            match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(date) if date >= today => {}
                Ok(_) => errors.booking_date = Some("Booking date must be in the future".to_string()),
                Err(_) => errors.booking_date = Some("Booking date must be YYYY-MM-DD".to_string()),
            }
        }

        errors
    }

    /// Validate and convert failures into [`Error::Validation`]
    pub fn ensure_valid(&self, today: NaiveDate) -> Result<()> {
        let errors = self.validate(today);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors.messages().join("; ")))
        }
    }
}
