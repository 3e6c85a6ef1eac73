use crate::domain::session::driven_ports::{Authenticator, SessionReader};
use crate::external_connections::ExternalConnectivity;
use thiserror::Error;
use tracing::{info, warn};

/// The signed-in user as reported by the auth service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// Proof that someone authenticated with the auth service. The user details may be missing
/// when only the access token survived in the browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user: Option<AuthUser>,
}

impl Session {
    /// The signed-in user's ID, if the session carries one
    pub fn user_id(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|user| user.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// Email and password sign-in details
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub mod driven_ports {
    use super::*;

    pub trait SessionReader {
        /// Retrieves the session stored for the current requester, without verifying it
        async fn current_session(
            &self,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<Session>, anyhow::Error>;

        /// Asks the auth service who the current requester is
        async fn current_user(
            &self,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<AuthUser>, anyhow::Error>;
    }

    pub trait Authenticator {
        async fn sign_in(
            &self,
            credentials: &Credentials,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Session, SignInError>;

        async fn sign_out(&self, ext_cxn: &impl ExternalConnectivity) -> Result<(), anyhow::Error>;
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserResolutionError {
    #[error("User session not found. Please log in again.")]
    SessionNotFound,
}

#[derive(Debug, Error)]
pub enum SignInError {
    /// The auth service refused the credentials. Carries the service's explanation.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    PortError(#[from] anyhow::Error),
}

/// Figures out which user is acting right now. The stored session is consulted first; if it
/// doesn't name a user, the auth service is asked directly.
pub async fn resolve_acting_user(
    ext_cxn: &impl ExternalConnectivity,
    session_read: &impl SessionReader,
) -> Result<String, UserResolutionError> {
    let session_user_id = match session_read.current_session(ext_cxn).await {
        Ok(session) => session.and_then(|session| session.user_id().map(str::to_owned)),
        Err(err) => {
            warn!("Could not read the stored session: {err:#}");
            None
        }
    };
    if let Some(user_id) = session_user_id {
        return Ok(user_id);
    }

    match session_read.current_user(ext_cxn).await {
        Ok(Some(user)) if !user.id.is_empty() => Ok(user.id),
        Ok(_) => Err(UserResolutionError::SessionNotFound),
        Err(err) => {
            warn!("User lookup failed while resolving the acting user: {err:#}");
            Err(UserResolutionError::SessionNotFound)
        }
    }
}

/// Signs in with an email and password, returning the session to store for the user
pub async fn sign_in(
    credentials: &Credentials,
    ext_cxn: &impl ExternalConnectivity,
    authenticator: &impl Authenticator,
) -> Result<Session, SignInError> {
    let session = authenticator.sign_in(credentials, ext_cxn).await?;
    info!(
        "User {} signed in",
        session.user_id().unwrap_or("<unknown>")
    );

    Ok(session)
}

/// Ends the current session with the auth service. Failures are only logged since the caller
/// forgets the session either way.
pub async fn sign_out(ext_cxn: &impl ExternalConnectivity, authenticator: &impl Authenticator) {
    if ext_cxn.session().is_none() {
        return;
    }

    if let Err(err) = authenticator.sign_out(ext_cxn).await {
        warn!("Sign-out could not be confirmed by the auth service: {err:#}");
    }
}
