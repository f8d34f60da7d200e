//! Copy (physical exemplar of a book) model and form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{book::default_true, Entity, RefKind};
use crate::{
    listing::{FieldValue, Listable},
    validation::{self, FormValidator},
};

/// Physical condition of a copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CopyCondition {
    New,
    #[default]
    Good,
    Fair,
    Poor,
    Damaged,
}

impl CopyCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyCondition::New => "new",
            CopyCondition::Good => "good",
            CopyCondition::Fair => "fair",
            CopyCondition::Poor => "poor",
            CopyCondition::Damaged => "damaged",
        }
    }
}

impl std::fmt::Display for CopyCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CopyCondition::New => "New",
            CopyCondition::Good => "Good",
            CopyCondition::Fair => "Fair",
            CopyCondition::Poor => "Poor",
            CopyCondition::Damaged => "Damaged",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookCopy {
    pub id: i32,
    pub book_id: i32,
    pub barcode: String,
    #[serde(default)]
    pub condition: CopyCondition,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub acquired_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CopyForm {
    pub book_id: Option<i32>,
    pub barcode: String,
    pub condition: CopyCondition,
    pub location: Option<String>,
}

impl FormValidator for CopyForm {
    const FIELDS: &'static [&'static str] = &["book_id", "barcode", "location"];

    fn validate_field(&self, field: &str) -> Option<String> {
        match field {
            "book_id" => validation::positive_id("Book", self.book_id),
            "barcode" => validation::required_text("Barcode", &self.barcode, 40),
            "location" => validation::optional_text("Location", self.location.as_deref(), 100),
            _ => None,
        }
    }
}

impl Listable for BookCopy {
    const SEARCH_FIELDS: &'static [&'static str] = &["barcode", "location"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "book_id" => Some(self.book_id.into()),
            "barcode" => Some((&self.barcode).into()),
            "condition" => Some(self.condition.as_str().into()),
            "location" => self.location.as_ref().map(FieldValue::from),
            "is_available" => Some(self.is_available.into()),
            "is_active" => Some(self.is_active.into()),
            "acquired_at" => self.acquired_at.map(FieldValue::from),
            _ => None,
        }
    }

    fn has_field(name: &str) -> bool {
        matches!(
            name,
            "id" | "book_id"
                | "barcode"
                | "condition"
                | "location"
                | "is_available"
                | "is_active"
                | "acquired_at"
        )
    }
}

impl Entity for BookCopy {
    const RESOURCE: &'static str = "copies";
    type Form = CopyForm;

    fn id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> String {
        self.barcode.clone()
    }

    fn to_form(&self) -> CopyForm {
        CopyForm {
            book_id: Some(self.book_id),
            barcode: self.barcode.clone(),
            condition: self.condition,
            location: self.location.clone(),
        }
    }

    fn references(&self) -> Vec<(RefKind, i32)> {
        vec![(RefKind::Book, self.book_id)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_filter_value() {
        let copy: BookCopy = serde_json::from_str(
            r#"{"id":7,"book_id":1,"barcode":"YT-0007","condition":"damaged"}"#,
        )
        .unwrap();
        assert_eq!(copy.condition, CopyCondition::Damaged);
        assert_eq!(copy.field("condition"), Some(FieldValue::Text("damaged".into())));
        assert!(copy.is_available);
    }

    #[test]
    fn test_form_requires_book_and_barcode() {
        let errors = CopyForm::default().validate();
        assert!(errors.get("book_id").is_some());
        assert!(errors.get("barcode").is_some());
    }
}
