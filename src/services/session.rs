use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::models::AuthSession;
use crate::services::auth::{AuthError, AuthProvider};

/// Errors raised by the session state machine
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: &'static str },

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Authentication state of a single client session
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated(AuthSession),
    Error(String),
}

impl AuthState {
    pub fn name(&self) -> &'static str {
        match self {
            AuthState::Anonymous => "anonymous",
            AuthState::Authenticating => "authenticating",
            AuthState::Authenticated(_) => "authenticated",
            AuthState::Error(_) => "error",
        }
    }
}

/// Explicit auth state machine
///
/// Transitions:
/// - `begin`:   Anonymous | Error -> Authenticating
/// - `begin_refresh`: Authenticated -> Authenticating
/// - `succeed`: Authenticating -> Authenticated
/// - `fail`:    Authenticating -> Error
/// - `reset`:   any -> Anonymous
///
/// The async drivers (`sign_in`, `refresh`, `sign_out`) wrap these around
/// calls into an [`AuthProvider`].
#[derive(Debug, Clone)]
pub struct SessionMachine {
    state: AuthState,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            state: AuthState::Anonymous,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn session(&self) -> Option<&AuthSession> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn into_session(self) -> Option<AuthSession> {
        match self.state {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn begin(&mut self) -> Result<(), SessionError> {
        match self.state {
            AuthState::Anonymous | AuthState::Error(_) => {
                self.state = AuthState::Authenticating;
                Ok(())
            }
            _ => Err(self.invalid("begin authentication")),
        }
    }

    /// Start renewing an authenticated session, handing back its refresh token
    pub fn begin_refresh(&mut self) -> Result<String, SessionError> {
        let refresh_token = match &self.state {
            AuthState::Authenticated(session) => session.refresh_token.clone(),
            _ => return Err(self.invalid("refresh")),
        };

        self.state = AuthState::Authenticating;
        Ok(refresh_token)
    }

    pub fn succeed(&mut self, session: AuthSession) -> Result<(), SessionError> {
        match self.state {
            AuthState::Authenticating => {
                tracing::debug!("Session authenticated for {}", session.user_id);
                self.state = AuthState::Authenticated(session);
                Ok(())
            }
            _ => Err(self.invalid("complete authentication")),
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), SessionError> {
        match self.state {
            AuthState::Authenticating => {
                self.state = AuthState::Error(message.into());
                Ok(())
            }
            _ => Err(self.invalid("fail authentication")),
        }
    }

    pub fn reset(&mut self) {
        self.state = AuthState::Anonymous;
    }

    /// True when an authenticated session expires within `leeway` of `now`
    pub fn needs_refresh(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        self.session()
            .map(|s| s.expires_at - leeway <= now)
            .unwrap_or(false)
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    /// Sign in with email and password
    pub async fn sign_in<P: AuthProvider + ?Sized>(
        &mut self,
        provider: &P,
        email: &str,
        password: &str,
    ) -> Result<&AuthSession, SessionError> {
        self.begin()?;

        match provider.sign_in_with_password(email, password).await {
            Ok(session) => {
                self.succeed(session)?;
            }
            Err(e) => {
                tracing::warn!("Sign-in failed for {}: {}", email, e);
                self.fail(e.to_string())?;
                return Err(e.into());
            }
        }

        self.session()
            .ok_or_else(|| self.invalid("read session"))
    }

    /// Exchange the current refresh token for a fresh session
    ///
    /// A rejected refresh leaves the machine in `Error`.
    pub async fn refresh<P: AuthProvider + ?Sized>(
        &mut self,
        provider: &P,
    ) -> Result<&AuthSession, SessionError> {
        let refresh_token = self.begin_refresh()?;
        self.complete_refresh(provider, &refresh_token).await
    }

    /// Restore a session from a stored refresh token
    pub async fn restore<P: AuthProvider + ?Sized>(
        &mut self,
        provider: &P,
        refresh_token: &str,
    ) -> Result<&AuthSession, SessionError> {
        self.begin()?;
        self.complete_refresh(provider, refresh_token).await
    }

    async fn complete_refresh<P: AuthProvider + ?Sized>(
        &mut self,
        provider: &P,
        refresh_token: &str,
    ) -> Result<&AuthSession, SessionError> {
        match provider.refresh_session(refresh_token).await {
            Ok(session) => {
                self.succeed(session)?;
            }
            Err(e) => {
                tracing::warn!("Session refresh failed: {}", e);
                self.fail(e.to_string())?;
                return Err(e.into());
            }
        }

        self.session()
            .ok_or_else(|| self.invalid("read session"))
    }

    /// Sign out; the local state is cleared even if the provider call fails
    pub async fn sign_out<P: AuthProvider + ?Sized>(&mut self, provider: &P) -> Result<(), SessionError> {
        let access_token = self.session().map(|s| s.access_token.clone());
        self.reset();

        if let Some(token) = access_token {
            provider.sign_out(&token).await?;
        }

        Ok(())
    }
}
