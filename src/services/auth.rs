//! Login, logout and own profile

use super::Console;
use crate::{
    error::{AppError, AppResult},
    models::{LoginForm, ProfileForm, SessionUser},
    session::Session,
    validation::FormValidator,
};

impl Console {
    /// Open a session with the backend.
    ///
    /// Only admins and staff may use the console; a reader account is refused
    /// and no session is stored.
    pub async fn login(&self, form: &LoginForm) -> AppResult<SessionUser> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let response = self.account.login(form).await?;
        response.user.require_staff()?;

        self.session
            .set(Session {
                token: response.token,
                user: response.user.clone(),
            })
            .await?;

        tracing::info!("{} logged in as {}", response.user.name, response.user.role);
        Ok(response.user)
    }

    pub async fn logout(&self) -> AppResult<()> {
        if let Some(session) = self.session.current().await {
            tracing::info!("{} logged out", session.user.name);
        }
        self.session.clear().await
    }

    /// Current identity, refreshed from the backend.
    pub async fn profile(&self) -> AppResult<SessionUser> {
        self.session.require().await?;
        let user = self.account.me().await?;
        self.session.update_user(user.clone()).await?;
        Ok(user)
    }

    pub async fn update_profile(&self, form: &ProfileForm) -> AppResult<SessionUser> {
        self.session.require().await?;
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let user = self.account.update_profile(form).await?;
        self.session.update_user(user.clone()).await?;
        tracing::info!("Profile of {} updated", user.name);
        Ok(user)
    }
}
