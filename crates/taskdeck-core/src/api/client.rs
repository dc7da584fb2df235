//! API client for the taskdeck REST backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the project/task/subscription endpoints.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::SessionHandle;
use crate::models::{
    NewTask, Plan, Project, ProjectUpdate, ProjectWithParticipants, SubscribeReceipt,
    SubscriptionStatus, Task, TaskUpdate, User, UserSummary,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum concurrent requests when fanning out per-project progress reads.
const MAX_CONCURRENT_REQUESTS: usize = 10;

/// Response of `POST /auth/login`.
///
/// The backend's token schema is `{access_token, token_type}`; deployments
/// that echo the username back include it as a third field.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct NewProjectRequest<'a> {
    title: &'a str,
    description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct AddUserRequest {
    user_id: i64,
}

#[derive(Debug, Serialize)]
struct SubscribeRequest {
    plan: Plan,
}

#[derive(Debug, Deserialize)]
struct ProgressResponse {
    progress: f64,
}

/// API client for the taskdeck backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionHandle,
    logout_on_unauthorized: bool,
}

impl ApiClient {
    /// Create a new API client against the given base address.
    ///
    /// The session handle is consulted on every request: when it holds a
    /// token, the request carries it as a bearer credential.
    pub fn new(base_url: impl Into<String>, session: SessionHandle) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            session,
            logout_on_unauthorized: false,
        })
    }

    /// When enabled, a 401 response clears the shared session before the
    /// error is returned, forcing the UI back to the login screen.
    pub fn with_logout_on_unauthorized(mut self, enabled: bool) -> Self {
        self.logout_on_unauthorized = enabled;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.session.token() {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body);

        if matches!(err, ApiError::Unauthorized) && self.logout_on_unauthorized {
            warn!("Server rejected the token, clearing session");
            if let Err(e) = self.session.logout() {
                warn!(error = %e, "Failed to clear session after rejection");
            }
        }

        Err(err.into())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T> {
        let url = self.url(path);
        let mut request = self
            .client
            .put(&url)
            .query(query)
            .headers(self.auth_headers()?);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send PUT request to {}", url))?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<()> {
        let url = self.url(path);
        let response = self
            .client
            .delete(&url)
            .query(query)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        // 204 or a detail message body, nothing the caller needs
        self.check_response(response).await?;
        Ok(())
    }

    // ===== Authentication =====

    /// Register a new account
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        self.post(
            "/auth/register",
            &RegisterRequest {
                username,
                email,
                password,
            },
        )
        .await
    }

    /// Exchange credentials for an access token.
    ///
    /// The caller seeds the session from the response; this method only
    /// performs the exchange.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        self.post("/auth/login", &LoginRequest { email, password })
            .await
    }

    // ===== Projects =====

    /// Fetch all projects owned by or shared with the current user
    pub async fn fetch_projects(&self) -> Result<Vec<Project>> {
        self.get("/projects/", &[]).await
    }

    /// Fetch a single project with its tasks and participants
    pub async fn fetch_project(&self, project_id: i64) -> Result<Project> {
        self.get(&format!("/projects/{}", project_id), &[]).await
    }

    /// Create a project owned by the current user
    pub async fn create_project(&self, title: &str, description: Option<&str>) -> Result<Project> {
        self.post("/projects/", &NewProjectRequest { title, description })
            .await
    }

    /// Update a project's title and/or description
    pub async fn update_project(&self, project_id: i64, update: &ProjectUpdate) -> Result<Project> {
        self.put(&format!("/projects/{}", project_id), &[], Some(update))
            .await
    }

    /// Delete a project
    pub async fn delete_project(&self, project_id: i64) -> Result<()> {
        self.delete(&format!("/projects/{}", project_id), &[]).await
    }

    /// Fetch the completion percentage of a project (0-100)
    pub async fn fetch_project_progress(&self, project_id: i64) -> Result<f64> {
        let response: ProgressResponse = self
            .get(&format!("/projects/{}/progress", project_id), &[])
            .await?;
        Ok(response.progress)
    }

    /// Fetch all projects together with their progress.
    /// Progress reads fan out with bounded concurrency.
    pub async fn fetch_projects_with_progress(&self) -> Result<Vec<(Project, f64)>> {
        let projects = self.fetch_projects().await?;

        let mut results: Vec<(Project, f64)> = stream::iter(projects)
            .map(|project| async move {
                let progress = match self.fetch_project_progress(project.id).await {
                    Ok(p) => p,
                    Err(e) => {
                        debug!(project_id = project.id, error = %e, "Progress fetch failed");
                        0.0
                    }
                };
                (project, progress)
            })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .collect()
            .await;

        // buffer_unordered completes out of order
        results.sort_by_key(|(p, _)| p.id);
        Ok(results)
    }

    // ===== Project membership =====

    /// Search for users by name or email who are not yet in the project
    pub async fn search_users(&self, project_id: i64, query: &str) -> Result<Vec<UserSummary>> {
        self.get(
            &format!("/projects/{}/search_users", project_id),
            &[("query", query.to_string())],
        )
        .await
    }

    /// Fetch the participants of a project
    pub async fn fetch_project_members(&self, project_id: i64) -> Result<Vec<User>> {
        self.get(&format!("/projects/{}/users", project_id), &[])
            .await
    }

    /// Invite a user into a project
    pub async fn add_user_to_project(
        &self,
        project_id: i64,
        user_id: i64,
    ) -> Result<ProjectWithParticipants> {
        self.post(
            &format!("/projects/{}/add_user", project_id),
            &AddUserRequest { user_id },
        )
        .await
    }

    /// Remove a participant from a project
    pub async fn remove_user_from_project(&self, project_id: i64, user_id: i64) -> Result<()> {
        self.delete(
            &format!("/projects/{}/remove_user", project_id),
            &[("user_id", user_id.to_string())],
        )
        .await
    }

    // ===== Tasks =====

    /// Fetch all tasks belonging to a project
    pub async fn fetch_tasks(&self, project_id: i64) -> Result<Vec<Task>> {
        self.get("/tasks/", &[("project_id", project_id.to_string())])
            .await
    }

    /// Fetch a single task
    pub async fn fetch_task(&self, task_id: i64) -> Result<Task> {
        self.get(&format!("/tasks/{}", task_id), &[]).await
    }

    /// Create a task under a project (subscribers only)
    pub async fn create_task(&self, task: &NewTask) -> Result<Task> {
        self.post("/tasks/", task).await
    }

    /// Replace a task's title, description and completion state
    pub async fn update_task(&self, task_id: i64, update: &TaskUpdate) -> Result<Task> {
        self.put(&format!("/tasks/{}", task_id), &[], Some(update))
            .await
    }

    /// Toggle a task between completed and pending
    pub async fn set_task_status(&self, task_id: i64, is_completed: bool) -> Result<Task> {
        self.put::<Task, ()>(
            &format!("/tasks/{}/status", task_id),
            &[("is_completed", is_completed.to_string())],
            None,
        )
        .await
    }

    /// Delete a task
    pub async fn delete_task(&self, task_id: i64) -> Result<()> {
        self.delete(&format!("/tasks/{}", task_id), &[]).await
    }

    // ===== Subscription =====

    /// Fetch the current user's subscription status
    pub async fn subscription_status(&self) -> Result<SubscriptionStatus> {
        self.get("/subscription/status", &[]).await
    }

    /// Activate a subscription plan (the backend simulates the payment)
    pub async fn subscribe(&self, plan: Plan) -> Result<SubscribeReceipt> {
        self.post("/payment/subscribe", &SubscribeRequest { plan })
            .await
    }

    /// Cancel the current subscription
    pub async fn unsubscribe(&self) -> Result<User> {
        self.post("/unsubscribe", &serde_json::json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Session, TokenStore};
    use mockito::{Matcher, Server};
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_session() -> SessionHandle {
        let dir = std::env::temp_dir().join(format!(
            "taskdeck-client-test-{}-{}",
            std::process::id(),
            DIR_SEQ.fetch_add(1, Ordering::SeqCst)
        ));
        SessionHandle::new(Session::new(TokenStore::new(dir)))
    }

    const STATUS_BODY: &str =
        r#"{"is_subscribed": false, "subscription_end_date": null, "status": "expired"}"#;

    #[tokio::test]
    async fn anonymous_request_carries_no_authorization_header() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/subscription/status")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(STATUS_BODY)
            .create_async()
            .await;

        let session = temp_session();
        let api = ApiClient::new(server.url(), session).unwrap();
        let status = api.subscription_status().await.unwrap();

        m.assert_async().await;
        assert!(!status.is_subscribed);
    }

    #[tokio::test]
    async fn authenticated_request_carries_stored_token_unchanged() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/subscription/status")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(STATUS_BODY)
            .create_async()
            .await;

        let session = temp_session();
        session.login("abc", "alice").unwrap();
        let api = ApiClient::new(server.url(), session.clone()).unwrap();
        api.subscription_status().await.unwrap();

        m.assert_async().await;
        session.logout().unwrap();
    }

    #[tokio::test]
    async fn login_posts_credentials_and_parses_token() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(serde_json::json!({
                "email": "alice@example.com",
                "password": "hunter2!"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"access_token": "abc", "token_type": "bearer", "username": "alice"}"#,
            )
            .create_async()
            .await;

        let api = ApiClient::new(server.url(), temp_session()).unwrap();
        let response = api.login("alice@example.com", "hunter2!").await.unwrap();

        m.assert_async().await;
        assert_eq!(response.access_token, "abc");
        assert_eq!(response.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn rejected_token_keeps_session_by_default() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/projects/")
            .with_status(401)
            .with_body(r#"{"detail": "Could not validate credentials"}"#)
            .create_async()
            .await;

        let session = temp_session();
        session.login("stale", "alice").unwrap();
        let api = ApiClient::new(server.url(), session.clone()).unwrap();

        let err = api.fetch_projects().await.unwrap_err();
        m.assert_async().await;
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Unauthorized)
        ));
        // manual logout only: the session stays authenticated
        assert!(session.is_authenticated());
        session.logout().unwrap();
    }

    #[tokio::test]
    async fn rejected_token_clears_session_when_configured() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/projects/")
            .with_status(401)
            .with_body(r#"{"detail": "Could not validate credentials"}"#)
            .create_async()
            .await;

        let session = temp_session();
        session.login("stale", "alice").unwrap();
        let api = ApiClient::new(server.url(), session.clone())
            .unwrap()
            .with_logout_on_unauthorized(true);

        let err = api.fetch_projects().await.unwrap_err();
        m.assert_async().await;
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Unauthorized)
        ));
        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
    }

    #[tokio::test]
    async fn forbidden_surfaces_server_detail() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/tasks/")
            .with_status(403)
            .with_body(r#"{"detail": "You must be a subscribed user to access this resource."}"#)
            .create_async()
            .await;

        let session = temp_session();
        session.login("tok", "bob").unwrap();
        let api = ApiClient::new(server.url(), session.clone()).unwrap();

        let err = api
            .create_task(&NewTask::new("t", None, 1))
            .await
            .unwrap_err();
        match err.downcast_ref::<ApiError>() {
            Some(ApiError::AccessDenied(msg)) => {
                assert!(msg.contains("subscribed user"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        session.logout().unwrap();
    }

    #[tokio::test]
    async fn status_toggle_uses_query_parameter() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PUT", "/tasks/5/status")
            .match_query(Matcher::UrlEncoded(
                "is_completed".into(),
                "true".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": 5, "title": "t", "description": null, "is_completed": true, "project_id": 1}"#,
            )
            .create_async()
            .await;

        let session = temp_session();
        session.login("tok", "bob").unwrap();
        let api = ApiClient::new(server.url(), session.clone()).unwrap();

        let task = api.set_task_status(5, true).await.unwrap();
        m.assert_async().await;
        assert!(task.is_completed);
        session.logout().unwrap();
    }

    #[tokio::test]
    async fn projects_with_progress_pairs_each_project() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/projects/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id": 1, "title": "A", "owner_id": 1}, {"id": 2, "title": "B", "owner_id": 1}]"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/projects/1/progress")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"progress": 50.0}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/projects/2/progress")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"progress": 0.0}"#)
            .create_async()
            .await;

        let session = temp_session();
        session.login("tok", "bob").unwrap();
        let api = ApiClient::new(server.url(), session.clone()).unwrap();

        let projects = api.fetch_projects_with_progress().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].0.id, 1);
        assert_eq!(projects[0].1, 50.0);
        assert_eq!(projects[1].1, 0.0);
        session.logout().unwrap();
    }
}
