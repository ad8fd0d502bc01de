use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Actor, Session};

use super::backend::{error_message, BackendClient};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: Actor,
}

/// Sign-up answers with a session, or only the user while the address
/// still awaits confirmation.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    Pending(Actor),
}

pub struct AuthClient {
    backend: BackendClient,
}

impl AuthClient {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let mut url = self.backend.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .backend
            .request(Method::POST, url, None)
            .json(&Credentials { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Auth(error_message(response).await));
        }

        let token: TokenResponse = response.json().await?;
        tracing::info!("Signed in as {}", email);
        Ok(Session::new(token.user, token.access_token))
    }

    /// Returns `None` when the account was created but must be confirmed
    /// before it can sign in.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>> {
        let url = self.backend.endpoint("auth/v1/signup")?;

        let response = self
            .backend
            .request(Method::POST, url, None)
            .json(&Credentials { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Auth(error_message(response).await));
        }

        match response.json::<SignUpResponse>().await? {
            SignUpResponse::Session(token) => {
                Ok(Some(Session::new(token.user, token.access_token)))
            }
            SignUpResponse::Pending(actor) => {
                tracing::info!("Sign-up for {:?} awaits confirmation", actor.email);
                Ok(None)
            }
        }
    }

    pub async fn sign_out(&self, session: &Session) -> Result<()> {
        let url = self.backend.endpoint("auth/v1/logout")?;

        let response = self
            .backend
            .request(Method::POST, url, Some(&session.access_token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Auth(error_message(response).await));
        }
        Ok(())
    }

    /// The actor behind `session`, or `None` once the token is rejected.
    pub async fn current_actor(&self, session: &Session) -> Result<Option<Actor>> {
        let url = self.backend.endpoint("auth/v1/user")?;

        let response = self
            .backend
            .request(Method::GET, url, Some(&session.access_token))
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            _ => Err(AppError::Auth(error_message(response).await)),
        }
    }
}
