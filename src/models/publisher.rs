//! Publisher model and form

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{book::default_true, Entity};
use crate::{
    listing::{FieldValue, Listable},
    validation::{self, FormValidator},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PublisherForm {
    pub name: String,
    pub country: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl FormValidator for PublisherForm {
    const FIELDS: &'static [&'static str] = &["name", "country", "website", "email", "phone"];

    fn validate_field(&self, field: &str) -> Option<String> {
        match field {
            "name" => validation::required_text("Name", &self.name, 150),
            "country" => validation::optional_text("Country", self.country.as_deref(), 60),
            "website" => validation::optional_text("Website", self.website.as_deref(), 255),
            "email" => validation::optional_email("Email", self.email.as_deref()),
            "phone" => validation::optional_phone("Phone", self.phone.as_deref()),
            _ => None,
        }
    }
}

impl Listable for Publisher {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "country"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some((&self.name).into()),
            "country" => self.country.as_ref().map(FieldValue::from),
            "email" => self.email.as_ref().map(FieldValue::from),
            "is_active" => Some(self.is_active.into()),
            _ => None,
        }
    }

    fn has_field(name: &str) -> bool {
        matches!(name, "id" | "name" | "country" | "email" | "is_active")
    }
}

impl Entity for Publisher {
    const RESOURCE: &'static str = "publishers";
    type Form = PublisherForm;

    fn id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn to_form(&self) -> PublisherForm {
        PublisherForm {
            name: self.name.clone(),
            country: self.country.clone(),
            website: self.website.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}
