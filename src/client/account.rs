//! Non-CRUD backend endpoints: authentication, profile, dashboard,
//! configuration, backups and loan actions

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{
        BackupInfo, DashboardSummary, Loan, LoginForm, ProfileForm, SessionUser,
        SystemConfiguration, SystemConfigurationForm,
    },
};

/// Backend answer to a successful login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}

#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn login(&self, form: &LoginForm) -> AppResult<LoginResponse>;

    async fn me(&self) -> AppResult<SessionUser>;

    async fn update_profile(&self, form: &ProfileForm) -> AppResult<SessionUser>;

    async fn dashboard(&self) -> AppResult<DashboardSummary>;

    async fn configuration(&self) -> AppResult<SystemConfiguration>;

    async fn update_configuration(
        &self,
        form: &SystemConfigurationForm,
    ) -> AppResult<SystemConfiguration>;

    async fn backups(&self) -> AppResult<Vec<BackupInfo>>;

    async fn create_backup(&self) -> AppResult<BackupInfo>;
}

/// Loan-specific actions
#[async_trait]
pub trait LoanActions: Send + Sync {
    async fn return_loan(&self, id: i32) -> AppResult<Loan>;

    async fn renew_loan(&self, id: i32) -> AppResult<Loan>;
}

#[async_trait]
impl AccountApi for ApiClient {
    async fn login(&self, form: &LoginForm) -> AppResult<LoginResponse> {
        self.post_anonymous("auth/login", form).await
    }

    async fn me(&self) -> AppResult<SessionUser> {
        self.get_json("auth/me").await
    }

    async fn update_profile(&self, form: &ProfileForm) -> AppResult<SessionUser> {
        self.send_json(Method::PUT, "auth/profile", form).await
    }

    async fn dashboard(&self) -> AppResult<DashboardSummary> {
        self.get_json("dashboard/summary").await
    }

    async fn configuration(&self) -> AppResult<SystemConfiguration> {
        self.get_json("configuration").await
    }

    async fn update_configuration(
        &self,
        form: &SystemConfigurationForm,
    ) -> AppResult<SystemConfiguration> {
        self.send_json(Method::PUT, "configuration", form).await
    }

    async fn backups(&self) -> AppResult<Vec<BackupInfo>> {
        self.get_json("configuration/backups").await
    }

    async fn create_backup(&self) -> AppResult<BackupInfo> {
        self.call(Method::POST, "configuration/backups").await
    }
}

#[async_trait]
impl LoanActions for ApiClient {
    async fn return_loan(&self, id: i32) -> AppResult<Loan> {
        self.call(Method::POST, &format!("loans/{}/return", id)).await
    }

    async fn renew_loan(&self, id: i32) -> AppResult<Loan> {
        self.call(Method::POST, &format!("loans/{}/renew", id)).await
    }
}
