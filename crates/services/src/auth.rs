use async_trait::async_trait;

use quiz_core::model::UserProfile;

use crate::error::AuthError;

/// Remote identity provider as seen by the app shell.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Sign an existing user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when credentials are malformed or refused.
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AuthError>;

    /// Register a new user and sign them in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when the registration is malformed or refused.
    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError>;
}

/// Local stand-in that accepts any well-formed credentials.
///
/// Used by the terminal front end and tests; no password is stored or checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuestAuthenticator;

fn check_credentials(email: &str, password: &str) -> Result<String, AuthError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthError::MissingField("email"));
    }
    if password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }
    match email.split_once('@') {
        Some((user, domain)) if !user.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(AuthError::InvalidEmail(email.to_string())),
    }
}

#[async_trait]
impl Authenticator for GuestAuthenticator {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let email = check_credentials(email, password)?;
        let name = email.split('@').next().unwrap_or_default().to_string();
        Ok(UserProfile::new(email.clone(), name, email))
    }

    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        let email = check_credentials(email, password)?;
        Ok(UserProfile::new(email.clone(), name, email))
    }
}
