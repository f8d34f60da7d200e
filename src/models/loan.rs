//! Loan model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Entity, RefKind};
use crate::{
    listing::{FieldValue, Listable},
    validation::{self, FormValidator},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    #[default]
    Active,
    Returned,
    Overdue,
    Lost,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
            LoanStatus::Overdue => "overdue",
            LoanStatus::Lost => "lost",
        }
    }
}

/// Loan as returned by the backend. Overdue state and fines are computed
/// server-side and trusted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub user_id: i32,
    pub copy_id: i32,
    /// Denormalized title, when the backend provides it
    #[serde(default)]
    pub book_title: Option<String>,
    /// Denormalized borrower name, when the backend provides it
    #[serde(default)]
    pub user_name: Option<String>,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: LoanStatus,
    #[serde(default)]
    pub is_overdue: bool,
    #[serde(default)]
    pub renewals: i32,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub fine_amount: Option<Decimal>,
}

impl Loan {
    /// Active and flagged overdue by the backend.
    pub fn is_overdue_active(&self) -> bool {
        self.status == LoanStatus::Active && self.is_overdue
    }
}

/// Create or update loan request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanForm {
    pub user_id: Option<i32>,
    pub copy_id: Option<i32>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl FormValidator for LoanForm {
    const FIELDS: &'static [&'static str] = &["user_id", "copy_id", "due_date", "notes"];

    fn validate_field(&self, field: &str) -> Option<String> {
        match field {
            "user_id" => validation::positive_id("User", self.user_id),
            "copy_id" => validation::positive_id("Copy", self.copy_id),
            "due_date" => match self.due_date {
                Some(date) if date < Utc::now().date_naive() => {
                    Some("Due date cannot be in the past".to_string())
                }
                _ => None,
            },
            "notes" => validation::optional_text("Notes", self.notes.as_deref(), 500),
            _ => None,
        }
    }
}

impl Listable for Loan {
    const SEARCH_FIELDS: &'static [&'static str] = &["book_title", "user_name"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "user_id" => Some(self.user_id.into()),
            "copy_id" => Some(self.copy_id.into()),
            "book_title" => self.book_title.as_ref().map(FieldValue::from),
            "user_name" => self.user_name.as_ref().map(FieldValue::from),
            "loan_date" => Some(self.loan_date.into()),
            "due_date" => Some(self.due_date.into()),
            "return_date" => self.return_date.map(FieldValue::from),
            "status" => Some(self.status.as_str().into()),
            "is_overdue" => Some(self.is_overdue.into()),
            "renewals" => Some(self.renewals.into()),
            _ => None,
        }
    }

    fn has_field(name: &str) -> bool {
        matches!(
            name,
            "id" | "user_id"
                | "copy_id"
                | "book_title"
                | "user_name"
                | "loan_date"
                | "due_date"
                | "return_date"
                | "status"
                | "is_overdue"
                | "renewals"
        )
    }
}

impl Entity for Loan {
    const RESOURCE: &'static str = "loans";
    type Form = LoanForm;

    fn id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> String {
        format!("Loan #{}", self.id)
    }

    fn to_form(&self) -> LoanForm {
        LoanForm {
            user_id: Some(self.user_id),
            copy_id: Some(self.copy_id),
            due_date: Some(self.due_date.date_naive()),
            notes: None,
        }
    }

    fn references(&self) -> Vec<(RefKind, i32)> {
        vec![(RefKind::User, self.user_id), (RefKind::Copy, self.copy_id)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overdue_requires_active_status() {
        let mut loan: Loan = serde_json::from_str(
            r#"{"id":1,"user_id":2,"copy_id":3,"loan_date":"2024-01-01T10:00:00Z",
                "due_date":"2024-01-15T10:00:00Z","status":"active","is_overdue":true,
                "fine_amount":"1.50"}"#,
        )
        .unwrap();
        assert!(loan.is_overdue_active());
        assert_eq!(loan.fine_amount, Some(Decimal::new(150, 2)));

        loan.status = LoanStatus::Returned;
        assert!(!loan.is_overdue_active());
    }

    #[test]
    fn test_due_date_in_past_rejected() {
        let form = LoanForm {
            user_id: Some(1),
            copy_id: Some(1),
            due_date: NaiveDate::from_ymd_opt(2000, 1, 1),
            notes: None,
        };
        assert!(form.validate().get("due_date").is_some());
    }
}
