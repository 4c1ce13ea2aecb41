//! Literal GraphQL client
//!
//! Trades email/password for a bearer token and runs authenticated
//! queries, renewing the token once when Literal reports it expired.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use super::graphql::{GraphQLRequest, GraphQLResponse};
use super::models::ReadingState;
use crate::config::LiteralConfig;
use crate::error::AppError;
use crate::metrics::{LITERAL_RELOGINS_TOTAL, observe_upstream};

const LOGIN_MUTATION: &str = r#"
mutation login($email: String!, $password: String!) {
  login(email: $email, password: $password) {
    token
  }
}
"#;

const MY_READING_STATES_QUERY: &str = r#"
query myReadingStates {
  myReadingStates {
    ...ReadingStateParts
    book {
      ...BookParts
    }
    __typename
  }
}

fragment ReadingStateParts on ReadingState {
  id
  status
  bookId
  profileId
  createdAt
}

fragment BookParts on Book {
  id
  slug
  title
  subtitle
  description
  isbn10
  isbn13
  language
  pageCount
  publishedDate
  publisher
  physicalFormat
  cover
  authors {
    ...AuthorMini
    __typename
  }
  gradientColors
  workId
  __typename
}

fragment AuthorMini on Author {
  id
  name
  slug
  __typename
}
"#;

#[derive(Debug, serde::Deserialize)]
struct LoginData {
    login: LoginPayload,
}

#[derive(Debug, serde::Deserialize)]
struct LoginPayload {
    token: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyReadingStates {
    my_reading_states: Vec<ReadingState>,
}

/// Literal API client
///
/// Holds the session token for the configured account. The token is
/// obtained lazily on the first query.
pub struct LiteralService {
    http_client: Arc<reqwest::Client>,
    api_url: String,
    email: String,
    password: String,
    token: RwLock<Option<String>>,
}

impl LiteralService {
    pub fn new(config: &LiteralConfig, http_client: Arc<reqwest::Client>) -> Self {
        if !config.has_credentials() {
            tracing::warn!("LITERAL_EMAIL or LITERAL_PASSWORD is not defined");
        }

        Self {
            http_client,
            api_url: config.api_url.clone(),
            email: config.email.clone(),
            password: config.password.clone(),
            token: RwLock::new(None),
        }
    }

    /// Log in with the configured credentials and store the bearer token
    pub async fn login(&self) -> Result<String, AppError> {
        let request = GraphQLRequest {
            query: LOGIN_MUTATION,
            variables: serde_json::json!({
                "email": self.email,
                "password": self.password,
            }),
        };

        let response = self.send(&request, None).await?;
        if response.has_errors() {
            return Err(AppError::LiteralLogin(response.error_messages()));
        }

        let data: LoginData = serde_json::from_value(response.data.unwrap_or_default())
            .map_err(|e| AppError::LiteralLogin(format!("unexpected login payload: {e}")))?;
        let token = data.login.token;

        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    /// Run an authenticated GraphQL document
    ///
    /// Logs in first when no token is held. If Literal rejects the token,
    /// logs in again and repeats the request exactly once.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, AppError> {
        let request = GraphQLRequest { query, variables };

        let held = self.token.read().await.clone();
        let token = match held {
            Some(token) => token,
            None => self.login().await?,
        };

        let mut response = self.send(&request, Some(&token)).await?;

        if response.is_unauthenticated() {
            tracing::info!("Literal token rejected, logging in again");
            LITERAL_RELOGINS_TOTAL.inc();
            let token = self.login().await?;
            response = self.send(&request, Some(&token)).await?;
        }

        if response.has_errors() {
            return Err(AppError::Literal(response.error_messages()));
        }

        let data = response
            .data
            .ok_or_else(|| AppError::Literal("response contained no data".to_string()))?;
        Ok(serde_json::from_value(data)?)
    }

    /// Fetch every reading state on the user's shelf
    pub async fn get_my_books(&self) -> Result<Vec<ReadingState>, AppError> {
        let data: MyReadingStates = self
            .query(MY_READING_STATES_QUERY, serde_json::json!({}))
            .await?;
        Ok(data.my_reading_states)
    }

    async fn send(
        &self,
        request: &GraphQLRequest<'_>,
        token: Option<&str>,
    ) -> Result<GraphQLResponse, AppError> {
        let started = Instant::now();

        let mut builder = self.http_client.post(&self.api_url).json(request);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                observe_upstream("literal", "error", started);
                return Err(e.into());
            }
        };

        let status = response.status();
        observe_upstream("literal", status.as_str(), started);
        tracing::debug!(status = %status, authenticated = token.is_some(), "Literal response");

        Ok(response.json().await?)
    }
}
