//! System configuration and backups

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::{self, FormValidator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SystemConfiguration {
    pub library_name: String,
    pub contact_email: String,
    pub loan_duration_days: i32,
    pub max_renewals: i32,
    pub max_loans_per_user: i32,
    #[schema(value_type = String)]
    pub fine_per_day: Decimal,
    #[serde(default)]
    pub email_notifications: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SystemConfigurationForm {
    pub library_name: String,
    pub contact_email: String,
    pub loan_duration_days: i32,
    pub max_renewals: i32,
    pub max_loans_per_user: i32,
    #[schema(value_type = String)]
    pub fine_per_day: Decimal,
    pub email_notifications: bool,
}

impl FormValidator for SystemConfigurationForm {
    const FIELDS: &'static [&'static str] = &[
        "library_name",
        "contact_email",
        "loan_duration_days",
        "max_renewals",
        "max_loans_per_user",
        "fine_per_day",
    ];

    fn validate_field(&self, field: &str) -> Option<String> {
        match field {
            "library_name" => validation::required_text("Library name", &self.library_name, 120),
            "contact_email" => validation::email("Contact email", &self.contact_email),
            "loan_duration_days" => {
                validation::range("Loan duration", self.loan_duration_days.into(), 1, Some(365))
            }
            "max_renewals" => validation::range("Max renewals", self.max_renewals.into(), 0, Some(10)),
            "max_loans_per_user" => validation::range(
                "Max loans per user",
                self.max_loans_per_user.into(),
                1,
                Some(100),
            ),
            "fine_per_day" if self.fine_per_day.is_sign_negative() => {
                Some("Fine per day cannot be negative".to_string())
            }
            _ => None,
        }
    }
}

/// Backup archive known to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BackupInfo {
    pub id: i32,
    pub file_name: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: String,
}
