use crate::domain;
use crate::domain::session::{AuthUser, Credentials, Session, SignInError};
use crate::external_connections::ExternalConnectivity;
use anyhow::{Context, Error};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Talks to the data service's auth API. The session itself lives in the requester's
/// cookies, so reading it never leaves the process.
pub struct RestAuth;

#[derive(Deserialize)]
struct UserBody {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserBody> for AuthUser {
    fn from(value: UserBody) -> Self {
        AuthUser {
            id: value.id,
            email: value.email,
        }
    }
}

#[derive(Deserialize)]
struct TokenBody {
    access_token: String,
    #[serde(default)]
    user: Option<UserBody>,
}

impl From<TokenBody> for Session {
    fn from(value: TokenBody) -> Self {
        Session {
            access_token: value.access_token,
            user: value.user.map(AuthUser::from),
        }
    }
}

#[derive(Serialize)]
struct PasswordGrant<'creds> {
    email: &'creds str,
    password: &'creds str,
}

fn auth_url(ext_cxn: &impl ExternalConnectivity, endpoint: &str) -> String {
    format!("{}/auth/v1/{endpoint}", ext_cxn.data_service().base_url)
}

impl domain::session::driven_ports::SessionReader for RestAuth {
    async fn current_session(
        &self,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Option<Session>, Error> {
        Ok(ext_cxn.session().cloned())
    }

    async fn current_user(
        &self,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Option<AuthUser>, Error> {
        if ext_cxn.session().is_none() {
            return Ok(None);
        }

        let request = ext_cxn.http_client().get(auth_url(ext_cxn, "user"));
        let response = super::authorize(request, ext_cxn)
            .send()
            .await
            .context("trying to look up the signed-in user")?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }

        let user: UserBody = super::reject_unless_success(response)
            .await?
            .json()
            .await
            .context("trying to read the signed-in user")?;

        Ok(Some(user.into()))
    }
}

impl domain::session::driven_ports::Authenticator for RestAuth {
    async fn sign_in(
        &self,
        credentials: &Credentials,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Session, SignInError> {
        let request = ext_cxn
            .http_client()
            .post(auth_url(ext_cxn, "token"))
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant {
                email: &credentials.email,
                password: &credentials.password,
            });
        let response = super::authorize(request, ext_cxn)
            .send()
            .await
            .context("trying to sign in")?;

        let status = response.status();
        let response = match super::reject_unless_success(response).await {
            Ok(response) => response,
            Err(rejection) if status.is_client_error() => {
                return Err(SignInError::Rejected(rejection.message));
            }
            Err(rejection) => return Err(SignInError::PortError(rejection.into())),
        };

        let token: TokenBody = response
            .json()
            .await
            .context("trying to read the new session")?;

        Ok(token.into())
    }

    async fn sign_out(&self, ext_cxn: &impl ExternalConnectivity) -> Result<(), Error> {
        let request = ext_cxn.http_client().post(auth_url(ext_cxn, "logout"));
        let response = super::authorize(request, ext_cxn)
            .send()
            .await
            .context("trying to sign out")?;

        super::reject_unless_success(response).await?;
        Ok(())
    }
}
