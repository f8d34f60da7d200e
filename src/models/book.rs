//! Book model and form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Entity, RefKind};
use crate::{
    listing::{FieldValue, Listable},
    validation::{self, FormValidator},
};

/// Catalog book as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub author_id: i32,
    pub publisher_id: i32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub pages: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

pub(crate) fn default_true() -> bool {
    true
}

/// Create or update book request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookForm {
    pub title: String,
    pub isbn: String,
    pub author_id: Option<i32>,
    pub publisher_id: Option<i32>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub publication_year: Option<i32>,
    pub pages: Option<i32>,
}

impl FormValidator for BookForm {
    const FIELDS: &'static [&'static str] = &[
        "title",
        "isbn",
        "author_id",
        "publisher_id",
        "category",
        "language",
        "publication_year",
        "pages",
    ];

    fn validate_field(&self, field: &str) -> Option<String> {
        match field {
            "title" => validation::required_text("Title", &self.title, 200),
            "isbn" => validation::isbn("ISBN", &self.isbn),
            "author_id" => validation::positive_id("Author", self.author_id),
            "publisher_id" => validation::positive_id("Publisher", self.publisher_id),
            "category" => validation::optional_text("Category", self.category.as_deref(), 50),
            "language" => validation::optional_text("Language", self.language.as_deref(), 30),
            "publication_year" => validation::year("Publication year", self.publication_year, 1000),
            "pages" => validation::non_negative("Page count", self.pages),
            _ => None,
        }
    }
}

impl Listable for Book {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "isbn", "category"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "title" => Some((&self.title).into()),
            "isbn" => Some((&self.isbn).into()),
            "author_id" => Some(self.author_id.into()),
            "publisher_id" => Some(self.publisher_id.into()),
            "category" => self.category.as_ref().map(FieldValue::from),
            "language" => self.language.as_ref().map(FieldValue::from),
            "publication_year" => self.publication_year.map(FieldValue::from),
            "pages" => self.pages.map(FieldValue::from),
            "is_active" => Some(self.is_active.into()),
            "created_at" => self.created_at.map(FieldValue::from),
            _ => None,
        }
    }

    fn has_field(name: &str) -> bool {
        matches!(
            name,
            "id" | "title"
                | "isbn"
                | "author_id"
                | "publisher_id"
                | "category"
                | "language"
                | "publication_year"
                | "pages"
                | "is_active"
                | "created_at"
        )
    }
}

impl Entity for Book {
    const RESOURCE: &'static str = "books";
    type Form = BookForm;

    fn id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }

    fn to_form(&self) -> BookForm {
        BookForm {
            title: self.title.clone(),
            isbn: self.isbn.clone(),
            author_id: Some(self.author_id),
            publisher_id: Some(self.publisher_id),
            category: self.category.clone(),
            language: self.language.clone(),
            publication_year: self.publication_year,
            pages: self.pages,
        }
    }

    fn references(&self) -> Vec<(RefKind, i32)> {
        vec![
            (RefKind::Author, self.author_id),
            (RefKind::Publisher, self.publisher_id),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> BookForm {
        BookForm {
            title: "Dune".into(),
            isbn: "978-0-441-17271-9".into(),
            author_id: Some(1),
            publisher_id: Some(2),
            publication_year: Some(1965),
            pages: Some(412),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(valid_form().validate().is_empty());
    }

    #[test]
    fn test_empty_form_reports_required_fields() {
        let errors = BookForm::default().validate();
        assert!(errors.get("title").is_some());
        assert!(errors.get("isbn").is_some());
        assert!(errors.get("author_id").is_some());
        assert!(errors.get("publisher_id").is_some());
        assert!(errors.get("pages").is_none());
    }

    #[test]
    fn test_negative_pages_rejected() {
        let form = BookForm {
            pages: Some(-3),
            ..valid_form()
        };
        assert_eq!(form.validate().fields().collect::<Vec<_>>(), vec!["pages"]);
    }

    #[test]
    fn test_deserialize_minimal_book() {
        let book: Book = serde_json::from_str(
            r#"{"id":1,"title":"Dune","isbn":"9780441172719","author_id":1,"publisher_id":2}"#,
        )
        .unwrap();
        assert!(book.is_active);
        assert_eq!(book.references(), vec![(RefKind::Author, 1), (RefKind::Publisher, 2)]);
    }
}
