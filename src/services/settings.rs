//! System configuration and backups (administrators only)

use super::Console;
use crate::{
    error::{AppError, AppResult},
    models::{BackupInfo, SystemConfiguration, SystemConfigurationForm},
    validation::FormValidator,
};

impl Console {
    pub async fn configuration(&self) -> AppResult<SystemConfiguration> {
        self.session.user().await?.require_admin()?;
        self.account.configuration().await
    }

    pub async fn update_configuration(
        &self,
        form: &SystemConfigurationForm,
    ) -> AppResult<SystemConfiguration> {
        self.session.user().await?.require_admin()?;

        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let updated = self.account.update_configuration(form).await?;
        tracing::info!("System configuration updated");
        Ok(updated)
    }

    pub async fn backups(&self) -> AppResult<Vec<BackupInfo>> {
        self.session.user().await?.require_admin()?;
        self.account.backups().await
    }

    pub async fn create_backup(&self) -> AppResult<BackupInfo> {
        self.session.user().await?.require_admin()?;
        let backup = self.account.create_backup().await?;
        tracing::info!("Backup {} created ({} bytes)", backup.file_name, backup.size_bytes);
        Ok(backup)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::{
        models::Role,
        services::auth::tests::{console_with, user, MockAccount},
        session::Session,
    };

    fn form() -> SystemConfigurationForm {
        SystemConfigurationForm {
            library_name: "Yeti".into(),
            contact_email: "desk@yeti.org".into(),
            loan_duration_days: 14,
            max_renewals: 2,
            max_loans_per_user: 5,
            fine_per_day: Decimal::new(25, 2),
            email_notifications: true,
        }
    }

    async fn logged_in(console: &crate::services::Console, role: Role) {
        console
            .session()
            .set(Session {
                token: "t".into(),
                user: user(role),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_staff_cannot_change_configuration() {
        let mut account = MockAccount::new();
        account.expect_update_configuration().never();
        account.expect_backups().never();

        let console = console_with(account);
        logged_in(&console, Role::Staff).await;

        assert!(matches!(
            console.update_configuration(&form()).await,
            Err(AppError::Authorization(_))
        ));
        assert!(matches!(
            console.backups().await,
            Err(AppError::Authorization(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_configuration_is_not_sent() {
        let mut account = MockAccount::new();
        account.expect_update_configuration().never();

        let console = console_with(account);
        logged_in(&console, Role::Admin).await;

        let err = console
            .update_configuration(&SystemConfigurationForm {
                loan_duration_days: 0,
                ..form()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref f) if f.get("loan_duration_days").is_some()));
    }
}
