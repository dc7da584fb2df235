//! Application state management for the taskdeck TUI.
//!
//! This module contains the core `App` struct that owns the session, the
//! API client, per-screen UI state and the background refresh channel.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use taskdeck_core::api::ApiError;
use taskdeck_core::auth::{CredentialStore, Session, SessionHandle, TokenStore};
use taskdeck_core::models::{Plan, Project, SubscriptionStatus, Task, User, UserSummary};
use taskdeck_core::validate;
use taskdeck_core::{ApiClient, Config};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for any single-line text input.
pub const MAX_FIELD_LENGTH: usize = 128;

// ============================================================================
// UI State Types
// ============================================================================

/// Main screens, mirroring the web client's routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Projects,
    Tasks,
    Members,
    Subscription,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Projects => "Projects",
            Screen::Tasks => "Tasks",
            Screen::Members => "Members",
            Screen::Subscription => "Subscription",
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    LoggingIn,
    Registering,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// Register form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterFocus {
    Username,
    Email,
    Password,
    Button,
}

/// Projects screen focus (list or the create-project form)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectsFocus {
    List,
    FormTitle,
    FormDescription,
}

/// Tasks screen focus (list or the add-task form)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TasksFocus {
    List,
    FormTitle,
    FormDescription,
}

/// Members screen focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembersFocus {
    Search,
    Results,
    Participants,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from background refresh tasks back to the main loop.
enum RefreshResult {
    /// Project list with per-project progress percentages
    Projects(Vec<(Project, f64)>),
    /// Current subscription status
    Subscription(SubscriptionStatus),
    /// Tasks for a project (project_id, tasks)
    Tasks(i64, Vec<Task>),
    /// Participants of a project (project_id, users)
    Members(i64, Vec<User>),
    /// Signal that a refresh pass finished
    RefreshComplete,
    /// An error occurred during refresh
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub session: SessionHandle,
    pub api: ApiClient,

    // UI state
    pub state: AppState,
    pub screen: Screen,
    pub status_message: Option<String>,

    // Login form
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_email_error: Option<String>,
    pub login_password_error: Option<String>,
    pub login_error: Option<String>,
    pub login_notice: Option<String>,

    // Register form
    pub reg_username: String,
    pub reg_email: String,
    pub reg_password: String,
    pub reg_focus: RegisterFocus,
    pub reg_username_error: Option<String>,
    pub reg_email_error: Option<String>,
    pub reg_password_error: Option<String>,
    pub reg_error: Option<String>,

    // Projects screen
    pub projects: Vec<(Project, f64)>,
    pub project_selection: usize,
    pub projects_focus: ProjectsFocus,
    pub new_project_title: String,
    pub new_project_description: String,

    // Tasks screen
    pub active_project: Option<(i64, String)>,
    pub tasks: Vec<Task>,
    pub task_selection: usize,
    pub tasks_focus: TasksFocus,
    pub new_task_title: String,
    pub new_task_description: String,

    // Members screen
    pub members: Vec<User>,
    pub member_search_query: String,
    pub member_results: Vec<UserSummary>,
    pub member_selection: usize,
    pub participant_selection: usize,
    pub members_focus: MembersFocus,

    // Subscription screen
    pub subscription: Option<SubscriptionStatus>,
    pub selected_plan: Plan,

    // Background task channel
    refresh_rx: mpsc::Receiver<RefreshResult>,
    refresh_tx: mpsc::Sender<RefreshResult>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let data_dir = Config::data_dir()?;
        let session = SessionHandle::new(Session::new(TokenStore::new(data_dir)));

        let api = ApiClient::new(config.api_base_url(), session.clone())?
            .with_logout_on_unauthorized(config.logout_on_unauthorized);

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Prefill credentials from env vars or config
        let login_email = std::env::var("TASKDECK_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();
        let login_password = std::env::var("TASKDECK_PASSWORD").unwrap_or_default();

        Ok(Self {
            config,
            session,
            api,

            state: AppState::Normal,
            screen: Screen::Projects,
            status_message: None,

            login_email,
            login_password,
            login_focus: LoginFocus::Email,
            login_email_error: None,
            login_password_error: None,
            login_error: None,
            login_notice: None,

            reg_username: String::new(),
            reg_email: String::new(),
            reg_password: String::new(),
            reg_focus: RegisterFocus::Username,
            reg_username_error: None,
            reg_email_error: None,
            reg_password_error: None,
            reg_error: None,

            projects: Vec::new(),
            project_selection: 0,
            projects_focus: ProjectsFocus::List,
            new_project_title: String::new(),
            new_project_description: String::new(),

            active_project: None,
            tasks: Vec::new(),
            task_selection: 0,
            tasks_focus: TasksFocus::List,
            new_task_title: String::new(),
            new_task_description: String::new(),

            members: Vec::new(),
            member_search_query: String::new(),
            member_results: Vec::new(),
            member_selection: 0,
            participant_selection: 0,
            members_focus: MembersFocus::Search,

            subscription: None,
            selected_plan: Plan::Monthly,

            refresh_rx: rx,
            refresh_tx: tx,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .as_ref()
            .map(|s| s.is_subscribed)
            .unwrap_or(false)
    }

    /// Show the login overlay
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Show the register overlay
    pub fn start_register(&mut self) {
        self.state = AppState::Registering;
        self.reg_focus = RegisterFocus::Username;
        self.reg_error = None;
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();

        self.login_email_error = validate::validate_email(&email);
        self.login_password_error = validate::validate_password(&password);
        if self.login_email_error.is_some() || self.login_password_error.is_some() {
            return Ok(());
        }

        self.login_error = None;
        self.login_notice = None;

        let result = self.api.login(&email, &password).await;
        match result {
            Ok(response) => {
                // deployments without a username field fall back to the email
                let username = response.username.unwrap_or_else(|| email.clone());
                self.session.login(&response.access_token, &username)?;

                if let Err(e) = CredentialStore::store(&email, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                self.screen = Screen::Projects;
                info!("Login successful");
                self.refresh_dashboard_background();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(login_error_message(&e));
                Err(e)
            }
        }
    }

    /// Attempt registration with the register form fields
    pub async fn attempt_register(&mut self) -> Result<()> {
        let username = self.reg_username.trim().to_string();
        let email = self.reg_email.trim().to_string();
        let password = self.reg_password.clone();

        self.reg_username_error = validate::validate_username(&username);
        self.reg_email_error = validate::validate_email(&email);
        self.reg_password_error = validate::validate_password(&password);
        if self.reg_username_error.is_some()
            || self.reg_email_error.is_some()
            || self.reg_password_error.is_some()
        {
            return Ok(());
        }

        self.reg_error = None;

        let result = self.api.register(&username, &email, &password).await;
        match result {
            Ok(user) => {
                info!(user = %user.username, "Registration successful");
                self.reg_password.clear();
                self.login_email = email;
                self.login_notice = Some("Registration successful! Please log in.".to_string());
                self.start_login();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                self.reg_error = Some(match e.downcast_ref::<ApiError>() {
                    Some(ApiError::BadRequest(msg))
                    | Some(ApiError::UnprocessableEntity(msg)) => msg.clone(),
                    _ => "An error occurred during registration.".to_string(),
                });
                Err(e)
            }
        }
    }

    /// Log out and return to the login overlay
    pub fn logout(&mut self) {
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "Failed to clear session");
        }
        self.projects.clear();
        self.tasks.clear();
        self.members.clear();
        self.member_results.clear();
        self.subscription = None;
        self.active_project = None;
        self.screen = Screen::Projects;
        self.status_message = None;
        self.start_login();
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task loading the project list (with progress) and
    /// the subscription status
    pub fn refresh_dashboard_background(&mut self) {
        if !self.is_authenticated() {
            return;
        }

        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.fetch_projects_with_progress().await {
                Ok(projects) => {
                    Self::send_result(&tx, RefreshResult::Projects(projects)).await;
                }
                Err(e) => {
                    Self::send_result(&tx, RefreshResult::Error(format!("Projects: {}", e)))
                        .await;
                }
            }

            match api.subscription_status().await {
                Ok(status) => {
                    Self::send_result(&tx, RefreshResult::Subscription(status)).await;
                }
                Err(e) => {
                    Self::send_result(&tx, RefreshResult::Error(format!("Subscription: {}", e)))
                        .await;
                }
            }

            Self::send_result(&tx, RefreshResult::RefreshComplete).await;
        });

        self.status_message = Some("Refreshing...".to_string());
    }

    /// Spawn a background task loading the tasks of a project
    pub fn refresh_tasks_background(&mut self, project_id: i64) {
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.fetch_tasks(project_id).await {
                Ok(tasks) => {
                    Self::send_result(&tx, RefreshResult::Tasks(project_id, tasks)).await;
                }
                Err(e) => {
                    Self::send_result(&tx, RefreshResult::Error(format!("Tasks: {}", e))).await;
                }
            }
        });
    }

    /// Spawn a background task loading the participants of a project
    pub fn refresh_members_background(&mut self, project_id: i64) {
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.fetch_project_members(project_id).await {
                Ok(members) => {
                    Self::send_result(&tx, RefreshResult::Members(project_id, members)).await;
                }
                Err(e) => {
                    Self::send_result(&tx, RefreshResult::Error(format!("Members: {}", e)))
                        .await;
                }
            }
        });
    }

    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Drain completed background tasks into application state
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.refresh_rx.try_recv() {
            self.process_refresh_result(result);
        }
    }

    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Projects(projects) => {
                self.projects = projects;
                if self.project_selection >= self.projects.len() {
                    self.project_selection = self.projects.len().saturating_sub(1);
                }
            }
            RefreshResult::Subscription(status) => {
                self.subscription = Some(status);
            }
            RefreshResult::Tasks(project_id, tasks) => {
                // ignore results for a project the user already left
                if self.active_project.as_ref().map(|(id, _)| *id) == Some(project_id) {
                    self.tasks = tasks;
                    if self.task_selection >= self.tasks.len() {
                        self.task_selection = self.tasks.len().saturating_sub(1);
                    }
                }
            }
            RefreshResult::Members(project_id, members) => {
                if self.active_project.as_ref().map(|(id, _)| *id) == Some(project_id) {
                    self.members = members;
                    if self.participant_selection >= self.members.len() {
                        self.participant_selection = self.members.len().saturating_sub(1);
                    }
                }
            }
            RefreshResult::RefreshComplete => {
                if let Some(ref msg) = self.status_message {
                    if !msg.starts_with("Error:") {
                        self.status_message = None;
                    }
                }
            }
            RefreshResult::Error(msg) => {
                error!(error = %msg, "Background task error");
                self.status_message = Some(user_error_message(&msg));
            }
        }
    }

    // =========================================================================
    // Screen Navigation
    // =========================================================================

    pub fn selected_project(&self) -> Option<&Project> {
        self.projects.get(self.project_selection).map(|(p, _)| p)
    }

    /// Open the tasks screen for the selected project
    pub fn open_tasks(&mut self) {
        if let Some(project) = self.selected_project() {
            let id = project.id;
            let title = project.title.clone();
            self.active_project = Some((id, title));
            self.tasks.clear();
            self.task_selection = 0;
            self.tasks_focus = TasksFocus::List;
            self.screen = Screen::Tasks;
            self.refresh_tasks_background(id);
        }
    }

    /// Open the members screen for the selected project
    pub fn open_members(&mut self) {
        if let Some(project) = self.selected_project() {
            let id = project.id;
            let title = project.title.clone();
            self.active_project = Some((id, title));
            self.members.clear();
            self.member_results.clear();
            self.member_search_query.clear();
            self.member_selection = 0;
            self.participant_selection = 0;
            self.members_focus = MembersFocus::Search;
            self.screen = Screen::Members;
            self.refresh_members_background(id);
        }
    }

    /// Return to the projects screen
    pub fn back_to_projects(&mut self) {
        self.screen = Screen::Projects;
        self.projects_focus = ProjectsFocus::List;
        self.active_project = None;
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Create a project from the form fields (subscribers only)
    pub async fn create_project(&mut self) {
        if !self.is_subscribed() {
            self.status_message =
                Some("An active subscription is required to create projects.".to_string());
            return;
        }

        let title = self.new_project_title.trim().to_string();
        if title.is_empty() {
            self.status_message = Some("Project title is required.".to_string());
            return;
        }
        let description = self.new_project_description.trim();
        let description = (!description.is_empty()).then_some(description);

        let result = self.api.create_project(&title, description).await;
        match result {
            Ok(project) => {
                info!(project = %project.title, "Project created");
                self.new_project_title.clear();
                self.new_project_description.clear();
                self.projects_focus = ProjectsFocus::List;
                self.status_message = Some(format!("Project \"{}\" created.", project.title));
                self.refresh_dashboard_background();
            }
            Err(e) => {
                error!(error = %e, "Failed to create project");
                self.status_message = Some(user_error_message(&e.to_string()));
            }
        }
    }

    /// Delete the selected project
    pub async fn delete_selected_project(&mut self) {
        let Some(project) = self.selected_project() else {
            return;
        };
        let id = project.id;
        let title = project.title.clone();

        match self.api.delete_project(id).await {
            Ok(()) => {
                info!(project_id = id, "Project deleted");
                self.projects.retain(|(p, _)| p.id != id);
                if self.project_selection >= self.projects.len() {
                    self.project_selection = self.projects.len().saturating_sub(1);
                }
                self.status_message = Some(format!("Project \"{}\" deleted.", title));
            }
            Err(e) => {
                error!(error = %e, "Failed to delete project");
                self.status_message = Some(user_error_message(&e.to_string()));
            }
        }
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Create a task from the form fields (subscribers only, like the web UI)
    pub async fn create_task(&mut self) {
        if !self.is_subscribed() {
            self.status_message =
                Some("You need an active subscription to add tasks.".to_string());
            return;
        }

        let Some((project_id, _)) = self.active_project.clone() else {
            return;
        };
        let title = self.new_task_title.trim().to_string();
        if title.is_empty() {
            self.status_message = Some("Task title is required.".to_string());
            return;
        }
        let description = self.new_task_description.trim();
        let description = (!description.is_empty()).then(|| description.to_string());

        let task = taskdeck_core::models::NewTask::new(title, description, project_id);
        let result = self.api.create_task(&task).await;
        match result {
            Ok(created) => {
                info!(task = %created.title, "Task created");
                self.new_task_title.clear();
                self.new_task_description.clear();
                self.tasks_focus = TasksFocus::List;
                self.refresh_tasks_background(project_id);
            }
            Err(e) => {
                error!(error = %e, "Failed to create task");
                self.status_message = Some(user_error_message(&e.to_string()));
            }
        }
    }

    /// Toggle the selected task between completed and pending
    pub async fn toggle_selected_task(&mut self) {
        let Some(task) = self.tasks.get(self.task_selection) else {
            return;
        };
        let id = task.id;
        let target = !task.is_completed;

        match self.api.set_task_status(id, target).await {
            Ok(updated) => {
                if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == id) {
                    *existing = updated;
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to update task status");
                self.status_message = Some(user_error_message(&e.to_string()));
            }
        }
    }

    /// Delete the selected task
    pub async fn delete_selected_task(&mut self) {
        let Some(task) = self.tasks.get(self.task_selection) else {
            return;
        };
        let id = task.id;

        match self.api.delete_task(id).await {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                if self.task_selection >= self.tasks.len() {
                    self.task_selection = self.tasks.len().saturating_sub(1);
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to delete task");
                self.status_message = Some(user_error_message(&e.to_string()));
            }
        }
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Search for users who are not yet in the active project
    pub async fn search_members(&mut self) {
        let Some((project_id, _)) = self.active_project.clone() else {
            return;
        };
        let query = self.member_search_query.trim().to_string();
        if query.is_empty() {
            self.member_results.clear();
            return;
        }

        match self.api.search_users(project_id, &query).await {
            Ok(results) => {
                self.member_selection = 0;
                self.member_results = results;
                self.members_focus = MembersFocus::Results;
            }
            Err(e) => {
                error!(error = %e, "User search failed");
                self.status_message = Some(user_error_message(&e.to_string()));
            }
        }
    }

    /// Invite the selected search result into the active project
    pub async fn invite_selected_user(&mut self) {
        let Some((project_id, _)) = self.active_project.clone() else {
            return;
        };
        let Some(user) = self.member_results.get(self.member_selection) else {
            return;
        };
        let user_id = user.id;
        let username = user.username.clone();

        let result = self.api.add_user_to_project(project_id, user_id).await;
        match result {
            Ok(_) => {
                info!(user = %username, project_id, "User invited");
                self.member_results.retain(|u| u.id != user_id);
                if self.member_selection >= self.member_results.len() {
                    self.member_selection = self.member_results.len().saturating_sub(1);
                }
                self.status_message = Some(format!("{} invited.", username));
                self.refresh_members_background(project_id);
            }
            Err(e) => {
                error!(error = %e, "Failed to invite user");
                self.status_message = Some(user_error_message(&e.to_string()));
            }
        }
    }

    /// Remove the selected participant from the active project
    pub async fn remove_selected_member(&mut self) {
        let Some((project_id, _)) = self.active_project.clone() else {
            return;
        };
        let Some(user) = self.members.get(self.participant_selection) else {
            return;
        };
        let user_id = user.id;
        let username = user.username.clone();

        let result = self.api.remove_user_from_project(project_id, user_id).await;
        match result {
            Ok(()) => {
                info!(user = %username, project_id, "Participant removed");
                self.status_message = Some(format!("{} removed.", username));
                self.refresh_members_background(project_id);
            }
            Err(e) => {
                error!(error = %e, "Failed to remove participant");
                self.status_message = Some(user_error_message(&e.to_string()));
            }
        }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribe to the selected plan
    pub async fn subscribe(&mut self) {
        let result = self.api.subscribe(self.selected_plan).await;
        match result {
            Ok(receipt) => {
                info!(plan = self.selected_plan.as_str(), "Subscribed");
                self.status_message = Some(receipt.message);
                self.refresh_subscription().await;
            }
            Err(e) => {
                error!(error = %e, "Subscribe failed");
                let msg = match e.downcast_ref::<ApiError>() {
                    Some(ApiError::PaymentRequired(msg))
                    | Some(ApiError::BadRequest(msg)) => msg.clone(),
                    _ => user_error_message(&e.to_string()),
                };
                self.status_message = Some(msg);
            }
        }
    }

    /// Cancel the current subscription
    pub async fn unsubscribe(&mut self) {
        let result = self.api.unsubscribe().await;
        match result {
            Ok(_) => {
                info!("Unsubscribed");
                self.status_message = Some("Subscription cancelled.".to_string());
                self.refresh_subscription().await;
            }
            Err(e) => {
                error!(error = %e, "Unsubscribe failed");
                let msg = match e.downcast_ref::<ApiError>() {
                    Some(ApiError::BadRequest(msg)) => msg.clone(),
                    _ => user_error_message(&e.to_string()),
                };
                self.status_message = Some(msg);
            }
        }
    }

    async fn refresh_subscription(&mut self) {
        match self.api.subscription_status().await {
            Ok(status) => self.subscription = Some(status),
            Err(e) => {
                warn!(error = %e, "Failed to refresh subscription status");
            }
        }
    }
}

// ============================================================================
// Error Message Helpers
// ============================================================================

/// Map a login failure to the message the form shows.
fn login_error_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized) | Some(ApiError::AccessDenied(_)) => {
            "Invalid email or password".to_string()
        }
        Some(ApiError::UnprocessableEntity(msg)) => msg.clone(),
        Some(ApiError::NetworkError(inner)) if inner.is_timeout() => {
            "Connection timed out. Please try again.".to_string()
        }
        Some(ApiError::NetworkError(_)) => {
            "Unable to connect to server. Check your connection.".to_string()
        }
        _ => format!("Login failed: {}", e),
    }
}

/// Simplify common background errors for the status bar.
fn user_error_message(msg: &str) -> String {
    let lower = msg.to_lowercase();
    if lower.contains("unauthorized") || lower.contains("401") {
        "Session expired. Please log in again.".to_string()
    } else if lower.contains("network") || lower.contains("connect") {
        "Network error. Check your connection.".to_string()
    } else if lower.contains("timed out") || lower.contains("timeout") {
        "Connection timed out. Please try again.".to_string()
    } else {
        format!("Error: {}", msg)
    }
}

/// Whether another character fits into a length-limited input field
pub fn can_push_char(field: &str) -> bool {
    field.chars().count() < MAX_FIELD_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_length_limit() {
        let short = "a".repeat(MAX_FIELD_LENGTH - 1);
        let full = "a".repeat(MAX_FIELD_LENGTH);
        assert!(can_push_char(&short));
        assert!(!can_push_char(&full));
    }

    #[test]
    fn login_errors_are_user_friendly() {
        let err = anyhow::Error::new(ApiError::Unauthorized);
        assert_eq!(login_error_message(&err), "Invalid email or password");

        let err = anyhow::Error::new(ApiError::AccessDenied("Invalid credentials.".to_string()));
        assert_eq!(login_error_message(&err), "Invalid email or password");
    }

    #[test]
    fn background_errors_are_simplified() {
        assert_eq!(
            user_error_message("Projects: Unauthorized - token may be expired"),
            "Session expired. Please log in again."
        );
        assert!(user_error_message("weird failure").starts_with("Error:"));
    }
}
