//! Library staff member

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{book::default_true, Entity};
use crate::{
    listing::{FieldValue, Listable},
    validation::{self, FormValidator},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub position: String,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub hire_date: Option<NaiveDate>,
}

impl FormValidator for EmployeeForm {
    const FIELDS: &'static [&'static str] =
        &["first_name", "last_name", "email", "phone", "position", "hire_date"];

    fn validate_field(&self, field: &str) -> Option<String> {
        match field {
            "first_name" => validation::required_text("First name", &self.first_name, 100),
            "last_name" => validation::required_text("Last name", &self.last_name, 100),
            "email" => validation::email("Email", &self.email),
            "phone" => validation::optional_phone("Phone", self.phone.as_deref()),
            "position" => validation::required_text("Position", &self.position, 80),
            "hire_date" => match self.hire_date {
                Some(date) if date > chrono::Utc::now().date_naive() => {
                    Some("Hire date cannot be in the future".to_string())
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl Listable for Employee {
    const SEARCH_FIELDS: &'static [&'static str] = &["first_name", "last_name", "email"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "first_name" => Some((&self.first_name).into()),
            "last_name" => Some((&self.last_name).into()),
            "email" => Some((&self.email).into()),
            "position" => Some((&self.position).into()),
            "hire_date" => self
                .hire_date
                .map(|d| FieldValue::Date(d.and_time(NaiveTime::MIN).and_utc())),
            "is_active" => Some(self.is_active.into()),
            _ => None,
        }
    }

    fn has_field(name: &str) -> bool {
        matches!(
            name,
            "id" | "first_name" | "last_name" | "email" | "position" | "hire_date" | "is_active"
        )
    }
}

impl Entity for Employee {
    const RESOURCE: &'static str = "employees";
    type Form = EmployeeForm;

    fn id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn to_form(&self) -> EmployeeForm {
        EmployeeForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            position: self.position.clone(),
            hire_date: self.hire_date,
        }
    }
}
