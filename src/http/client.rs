//! `reqwest` implementation of the board, directory and session ports.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, warn};

use super::status::status_error;
use crate::board::{
    domain::{Board, ColumnId, Task, TaskDraft, TaskId, TaskPatch},
    ports::BoardStore,
};
use crate::config::ClientConfig;
use crate::directory::{
    domain::{Notification, NotificationId, Role, User, UserId},
    ports::{NotificationStore, UserStore},
};
use crate::remote::{RemoteResult, RemoteStoreError};
use crate::session::{
    domain::{AuthGrant, Credentials, Registration},
    ports::{AuthGateway, TokenStore},
};

/// Client for the task-board REST API.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl HttpApiClient {
    /// Creates a client rooted at `base_url` (for example
    /// `http://localhost:8080/api`).
    ///
    /// # Errors
    ///
    /// Returns [`RemoteStoreError::Transport`] when the HTTP client cannot be
    /// built, or [`RemoteStoreError::Unavailable`] when `base_url` cannot
    /// carry a path.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> RemoteResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(RemoteStoreError::Unavailable(format!(
                "API URL {base_url} cannot be used as a base"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RemoteStoreError::transport)?;
        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    /// Creates a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// See [`HttpApiClient::new`].
    pub fn from_config(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> RemoteResult<Self> {
        Self::new(config.api_url().clone(), config.timeout(), tokens)
    }

    /// Returns the API root.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RemoteStoreError::Unavailable(format!(
                    "API URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> RemoteResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "sending request");
        let builder = self.client.request(method, url);
        match self.tokens.load() {
            Ok(Some(token)) => Ok(builder.bearer_auth(token.expose())),
            Ok(None) => Ok(builder),
            Err(err) => {
                warn!(error = %err, "could not read bearer token");
                Err(RemoteStoreError::Unauthorized(format!(
                    "bearer token unavailable: {err}"
                )))
            }
        }
    }

    async fn send(&self, builder: RequestBuilder) -> RemoteResult<Response> {
        let response = builder.send().await.map_err(RemoteStoreError::transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = status_error(status, &body);
        debug!(status = status.as_u16(), error = %err, "request rejected");
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
        let bytes = response.bytes().await.map_err(RemoteStoreError::transport)?;
        serde_json::from_slice(&bytes).map_err(|err| RemoteStoreError::Decode(err.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> RemoteResult<T> {
        let response = self.send(self.request(Method::GET, segments)?).await?;
        Self::decode(response).await
    }

    async fn send_json<B, T>(&self, method: Method, segments: &[&str], body: &B) -> RemoteResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(method, segments)?.json(body))
            .await?;
        Self::decode(response).await
    }

    async fn send_without_reply(&self, builder: RequestBuilder) -> RemoteResult<()> {
        self.send(builder).await.map(drop)
    }
}

#[async_trait]
impl BoardStore for HttpApiClient {
    async fn fetch_board(&self) -> RemoteResult<Board> {
        self.get(&["board"]).await
    }

    async fn update_task_state(&self, task_id: &TaskId, column_id: &ColumnId) -> RemoteResult<()> {
        let builder = self
            .request(Method::PATCH, &["tasks", task_id.as_str()])?
            .json(&json!({ "state": column_id }));
        self.send_without_reply(builder).await
    }

    async fn create_task(&self, draft: &TaskDraft) -> RemoteResult<Task> {
        self.send_json(Method::POST, &["tasks"], draft).await
    }

    async fn update_task(&self, task_id: &TaskId, patch: &TaskPatch) -> RemoteResult<Task> {
        self.send_json(Method::PATCH, &["tasks", task_id.as_str()], patch)
            .await
    }

    async fn delete_task(&self, task_id: &TaskId) -> RemoteResult<()> {
        let builder = self.request(Method::DELETE, &["tasks", task_id.as_str()])?;
        self.send_without_reply(builder).await
    }
}

#[async_trait]
impl UserStore for HttpApiClient {
    async fn list_users(&self) -> RemoteResult<Vec<User>> {
        self.get(&["users"]).await
    }

    async fn update_user_role(&self, user_id: &UserId, role: Role) -> RemoteResult<User> {
        self.send_json(
            Method::PATCH,
            &["users", user_id.as_str(), "role"],
            &json!({ "role": role }),
        )
        .await
    }

    async fn delete_user(&self, user_id: &UserId) -> RemoteResult<()> {
        let builder = self.request(Method::DELETE, &["users", user_id.as_str()])?;
        self.send_without_reply(builder).await
    }
}

#[async_trait]
impl NotificationStore for HttpApiClient {
    async fn list_notifications(&self) -> RemoteResult<Vec<Notification>> {
        self.get(&["notifications"]).await
    }

    async fn mark_notification_read(&self, notification_id: &NotificationId) -> RemoteResult<()> {
        let builder = self.request(
            Method::PATCH,
            &["notifications", notification_id.as_str(), "read"],
        )?;
        self.send_without_reply(builder).await
    }
}

#[async_trait]
impl AuthGateway for HttpApiClient {
    async fn login(&self, credentials: &Credentials) -> RemoteResult<AuthGrant> {
        self.send_json(Method::POST, &["auth", "login"], credentials)
            .await
    }

    async fn register(&self, registration: &Registration) -> RemoteResult<AuthGrant> {
        self.send_json(Method::POST, &["auth", "register"], registration)
            .await
    }

    async fn current_user(&self) -> RemoteResult<User> {
        self.get(&["auth", "me"]).await
    }
}
