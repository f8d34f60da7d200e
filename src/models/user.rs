//! User model, session identity and account forms

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{book::default_true, Entity};
use crate::{
    error::AppError,
    listing::{FieldValue, Listable},
    validation::{self, FieldErrors, FormValidator},
};

/// Account role as assigned by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    #[default]
    Reader,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Reader => "reader",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" | "administrator" => Ok(Role::Admin),
            "staff" | "librarian" => Ok(Role::Staff),
            "reader" | "member" => Ok(Role::Reader),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Library member or staff account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    /// Optional; when given, at least 8 characters
    pub password: Option<String>,
}

impl FormValidator for UserForm {
    const FIELDS: &'static [&'static str] = &["name", "email", "role", "phone", "password"];

    fn validate_field(&self, field: &str) -> Option<String> {
        match field {
            "name" => validation::required_text("Name", &self.name, 120),
            "email" => validation::email("Email", &self.email),
            "phone" => validation::optional_phone("Phone", self.phone.as_deref()),
            "password" => self
                .password
                .as_deref()
                .filter(|p| !p.is_empty())
                .and_then(|p| validation::min_length("Password", p, 8)),
            _ => None,
        }
    }
}

impl Listable for User {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some((&self.name).into()),
            "email" => Some((&self.email).into()),
            "role" => Some(self.role.as_str().into()),
            "is_active" => Some(self.is_active.into()),
            "created_at" => self.created_at.map(FieldValue::from),
            _ => None,
        }
    }

    fn has_field(name: &str) -> bool {
        matches!(
            name,
            "id" | "name" | "email" | "role" | "is_active" | "created_at"
        )
    }
}

impl Entity for User {
    const RESOURCE: &'static str = "users";
    type Form = UserForm;

    fn id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn to_form(&self) -> UserForm {
        UserForm {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            phone: self.phone.clone(),
            password: None,
        }
    }
}

/// Identity cached alongside the session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Management pages are open to admins and staff.
    pub fn require_staff(&self) -> Result<(), AppError> {
        match self.role {
            Role::Admin | Role::Staff => Ok(()),
            Role::Reader => Err(AppError::Authorization(
                "Staff privileges required".to_string(),
            )),
        }
    }

    /// System configuration is open to admins only.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl FormValidator for LoginForm {
    const FIELDS: &'static [&'static str] = &["username", "password"];

    fn validate_field(&self, field: &str) -> Option<String> {
        match field {
            "username" => validation::required_text("Username", &self.username, 120),
            "password" => validation::required("Password", &self.password),
            _ => None,
        }
    }
}

/// Update own profile request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Current password, required to change password
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

impl ProfileForm {
    fn changes_password(&self) -> bool {
        self.new_password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

impl FormValidator for ProfileForm {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "email",
        "phone",
        "current_password",
        "new_password",
        "confirm_password",
    ];

    fn validate_field(&self, field: &str) -> Option<String> {
        match field {
            "name" => validation::required_text("Name", &self.name, 120),
            "email" => validation::email("Email", &self.email),
            "phone" => validation::optional_phone("Phone", self.phone.as_deref()),
            "current_password" if self.changes_password() => validation::required(
                "Current password",
                self.current_password.as_deref().unwrap_or_default(),
            ),
            "new_password" if self.changes_password() => validation::min_length(
                "New password",
                self.new_password.as_deref().unwrap_or_default(),
                8,
            ),
            "confirm_password" if self.changes_password() => {
                if self.confirm_password == self.new_password {
                    None
                } else {
                    Some("Passwords do not match".to_string())
                }
            }
            _ => None,
        }
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in Self::FIELDS {
            errors.check(field, self.validate_field(field));
        }
        if !self.changes_password() && self.current_password.as_deref().is_some_and(|p| !p.is_empty()) {
            errors.check(
                "new_password",
                Some("Enter a new password or leave the current password empty".to_string()),
            );
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProfileForm {
        ProfileForm {
            name: "Ada".into(),
            email: "ada@yeti.org".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_role_gating() {
        let mut user = SessionUser {
            id: 1,
            name: "Ada".into(),
            email: "ada@yeti.org".into(),
            role: Role::Staff,
        };
        assert!(user.require_staff().is_ok());
        assert!(matches!(user.require_admin(), Err(AppError::Authorization(_))));

        user.role = Role::Reader;
        assert!(user.require_staff().is_err());
    }

    #[test]
    fn test_profile_without_password_change() {
        assert!(profile().validate().is_empty());
    }

    #[test]
    fn test_profile_password_change_rules() {
        let mut form = profile();
        form.new_password = Some("longenough".into());
        form.confirm_password = Some("different".into());
        let errors = form.validate();
        assert!(errors.get("current_password").is_some());
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));

        form.current_password = Some("old".into());
        form.confirm_password = Some("longenough".into());
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_user_password_is_optional_but_checked() {
        let mut form = UserForm {
            name: "Ada".into(),
            email: "ada@yeti.org".into(),
            ..Default::default()
        };
        assert!(form.validate().is_empty());

        form.password = Some(String::new());
        assert!(form.validate().is_empty());

        form.password = Some("short".into());
        assert!(form.validate().get("password").is_some());

        form.password = Some("longenough".into());
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LoginForm::default().validate();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Librarian".parse::<Role>(), Ok(Role::Staff));
        assert!("janitor".parse::<Role>().is_err());
    }
}
