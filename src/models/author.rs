//! Author model and form

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{book::default_true, Entity};
use crate::{
    listing::{FieldValue, Listable},
    validation::{self, FormValidator},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthorForm {
    pub first_name: String,
    pub last_name: String,
    pub nationality: Option<String>,
    pub birth_year: Option<i32>,
    pub biography: Option<String>,
}

impl FormValidator for AuthorForm {
    const FIELDS: &'static [&'static str] =
        &["first_name", "last_name", "nationality", "birth_year", "biography"];

    fn validate_field(&self, field: &str) -> Option<String> {
        match field {
            "first_name" => validation::required_text("First name", &self.first_name, 100),
            "last_name" => validation::required_text("Last name", &self.last_name, 100),
            "nationality" => {
                validation::optional_text("Nationality", self.nationality.as_deref(), 50)
            }
            "birth_year" => validation::year("Birth year", self.birth_year, 1),
            "biography" => validation::optional_text("Biography", self.biography.as_deref(), 2000),
            _ => None,
        }
    }
}

impl Listable for Author {
    const SEARCH_FIELDS: &'static [&'static str] = &["first_name", "last_name", "nationality"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "first_name" => Some((&self.first_name).into()),
            "last_name" => Some((&self.last_name).into()),
            "nationality" => self.nationality.as_ref().map(FieldValue::from),
            "birth_year" => self.birth_year.map(FieldValue::from),
            "is_active" => Some(self.is_active.into()),
            _ => None,
        }
    }

    fn has_field(name: &str) -> bool {
        matches!(
            name,
            "id" | "first_name" | "last_name" | "nationality" | "birth_year" | "is_active"
        )
    }
}

impl Entity for Author {
    const RESOURCE: &'static str = "authors";
    type Form = AuthorForm;

    fn id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> String {
        self.full_name()
    }

    fn to_form(&self) -> AuthorForm {
        AuthorForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            nationality: self.nationality.clone(),
            birth_year: self.birth_year,
            biography: self.biography.clone(),
        }
    }
}
