//! Application state management for authdesk.
//!
//! This module contains the `App` struct, the session client behind both the
//! TUI and the headless commands. It owns the session, the profile, the three
//! form buffers and the pending notice, and performs the five auth operations.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{Session, Storage};
use crate::config::Config;
use crate::models::{Field, Form, LoginForm, RegisterForm, UpdateForm, UpdateRequest, UserProfile};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for name and email input.
const MAX_TEXT_LENGTH: usize = 100;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

pub const MSG_FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const MSG_PASSWORDS_MISMATCH: &str = "Passwords do not match";
pub const MSG_LOGIN_SUCCESS: &str = "Login successful!";
pub const MSG_LOGIN_FAILED: &str = "Login failed";
pub const MSG_REGISTER_SUCCESS: &str = "Registration successful! Please login.";
pub const MSG_REGISTER_FAILED: &str = "Registration failed";
pub const MSG_UPDATE_SUCCESS: &str = "Profile updated successfully!";
pub const MSG_UPDATE_FAILED: &str = "Update failed";
pub const MSG_CONNECTION_ERROR: &str = "Connection error";
pub const MSG_FETCH_USER_FAILED: &str = "Failed to fetch user info. Check your connection.";
pub const MSG_LOGOUT_SUCCESS: &str = "Logged out successfully";

/// Connection error for login/register, naming the endpoint to aid diagnosis
pub fn connection_error(base_url: &str) -> String {
    format!("Connection error. Check API_URL: {}", base_url)
}

// ============================================================================
// UI State Types
// ============================================================================

/// Which of the two screens is shown. Derived only from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Unauthenticated,
    Authenticated,
}

/// Tabs on the unauthenticated screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    Login,
    Register,
}

impl AuthTab {
    pub fn title(&self) -> &'static str {
        match self {
            AuthTab::Login => "Login",
            AuthTab::Register => "Register",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            AuthTab::Login => AuthTab::Register,
            AuthTab::Register => AuthTab::Login,
        }
    }
}

/// Tabs on the authenticated screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTab {
    Info,
    Logout,
}

impl ProfileTab {
    pub fn title(&self) -> &'static str {
        match self {
            ProfileTab::Info => "Profile Info",
            ProfileTab::Logout => "Logout",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            ProfileTab::Info => ProfileTab::Logout,
            ProfileTab::Logout => ProfileTab::Info,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A modal alert the user must acknowledge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "Success",
            NoticeKind::Error => "Error",
        }
    }
}

/// Outcome of a profile fetch that reached the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFetch {
    /// Token accepted and profile loaded
    Loaded,
    /// Token rejected; the session was cleared
    Rejected,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub api: ApiClient,
    pub session: Session,

    pub profile: UserProfile,

    // UI State
    pub state: AppState,
    pub auth_tab: AuthTab,
    pub profile_tab: ProfileTab,
    pub focus: Field,
    pub notice: Option<Notice>,

    // Form buffers
    pub login_form: LoginForm,
    pub register_form: RegisterForm,
    pub update_form: UpdateForm,
}

impl App {
    /// Create the app from configuration: API client plus the configured storage backend
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::new(config.api_url()?, config.request_timeout())?;

        let data_dir = config.data_dir().unwrap_or_else(|_| PathBuf::from("./data"));
        debug!(backend = ?config.storage, ?data_dir, "Token storage configured");
        let storage = config.storage.open(&data_dir);

        Ok(Self::with_parts(config, api, storage))
    }

    pub fn with_parts(config: &Config, api: ApiClient, storage: Box<dyn Storage>) -> Self {
        let login_form = LoginForm {
            email: config.default_email.clone().unwrap_or_default(),
            password: String::new(),
        };
        let focus = if login_form.email.is_empty() {
            Field::Email
        } else {
            Field::Password
        };

        Self {
            api,
            session: Session::new(storage),
            profile: UserProfile::default(),

            state: AppState::Normal,
            auth_tab: AuthTab::Login,
            profile_tab: ProfileTab::Info,
            focus,
            notice: None,

            login_form,
            register_form: RegisterForm::default(),
            update_form: UpdateForm::default(),
        }
    }

    /// The screen to render; the authenticated flag is the only input
    pub fn view(&self) -> View {
        if self.session.is_authenticated() {
            View::Authenticated
        } else {
            View::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // =========================================================================
    // Notices
    // =========================================================================

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let message = message.into();
        debug!(?kind, %message, "Notice raised");
        self.notice = Some(Notice { kind, message });
    }

    fn success(&mut self, message: impl Into<String>) {
        self.notify(NoticeKind::Success, message);
    }

    fn error(&mut self, message: impl Into<String>) {
        self.notify(NoticeKind::Error, message);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Take the pending notice, for callers that print instead of render
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Best-effort startup check of the persisted token.
    ///
    /// Never raises a notice: a missing or stale token is a normal state.
    pub async fn restore_session(&mut self) {
        let token = match self.session.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No persisted token, starting signed out");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                return;
            }
        };

        match self.fetch_profile(&token).await {
            Ok(ProfileFetch::Loaded) => info!("Session restored"),
            Ok(ProfileFetch::Rejected) => info!("Persisted token rejected, starting signed out"),
            Err(e) => warn!(error = %e, "Could not verify persisted token"),
        }
    }

    /// Fetch the profile for `token`.
    ///
    /// Any HTTP rejection invalidates the session without a notice. Transport
    /// failures leave the session untouched and are returned to the caller.
    pub async fn fetch_profile(&mut self, token: &str) -> Result<ProfileFetch, ApiError> {
        match self.api.fetch_user(token).await {
            Ok(profile) => {
                let was_authenticated = self.is_authenticated();
                self.update_form = UpdateForm::seeded(&profile.name, &profile.email);
                self.profile = profile;
                self.session.mark_authenticated();
                if !was_authenticated {
                    self.reset_focus();
                }
                Ok(ProfileFetch::Loaded)
            }
            Err(e) if e.is_transport() => Err(e),
            Err(e) => {
                debug!(error = %e, "Token rejected by server");
                if let Err(e) = self.session.clear() {
                    warn!(error = %e, "Failed to remove stored token");
                }
                self.profile = UserProfile::default();
                self.reset_focus();
                Ok(ProfileFetch::Rejected)
            }
        }
    }

    /// Log in with `email` and `password`, then load the profile once
    pub async fn login(&mut self, email: &str, password: &str) {
        let form = LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        };

        if !form.is_complete() {
            self.error(MSG_FILL_ALL_FIELDS);
            return;
        }

        match self.api.login(&form).await {
            Ok(token) => {
                if let Err(e) = self.session.store_token(&token) {
                    warn!(error = %e, "Failed to persist token");
                }
                self.session.mark_authenticated();
                self.login_form.password.clear();
                self.reset_focus();
                info!("Login successful");

                match self.fetch_profile(&token).await {
                    // Rejected also lands here: the login itself succeeded, the
                    // session is already cleared and the login view stays up
                    Ok(_) => self.success(MSG_LOGIN_SUCCESS),
                    Err(e) => {
                        warn!(error = %e, "Profile fetch after login failed");
                        self.error(MSG_FETCH_USER_FAILED);
                    }
                }
            }
            Err(e) if e.is_transport() => {
                warn!(error = %e, "Login request failed");
                let message = connection_error(self.api.base_url());
                self.error(message);
            }
            Err(e) => {
                info!(status = ?e.status(), error = %e, "Login rejected");
                let message = e.server_message().unwrap_or(MSG_LOGIN_FAILED).to_string();
                self.error(message);
            }
        }
    }

    /// Create an account. Does not log in; returns to the login tab on success.
    pub async fn register(&mut self, name: &str, email: &str, password: &str, confirmation: &str) {
        let form = RegisterForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        };

        if !form.is_complete() {
            self.error(MSG_FILL_ALL_FIELDS);
            return;
        }
        if !form.passwords_match() {
            self.error(MSG_PASSWORDS_MISMATCH);
            return;
        }

        match self.api.register(&form).await {
            Ok(()) => {
                info!("Registration successful");
                self.register_form.clear();
                self.auth_tab = AuthTab::Login;
                self.reset_focus();
                self.success(MSG_REGISTER_SUCCESS);
            }
            Err(e) if e.is_transport() => {
                warn!(error = %e, "Register request failed");
                let message = connection_error(self.api.base_url());
                self.error(message);
            }
            Err(e) => {
                info!(status = ?e.status(), error = %e, "Registration rejected");
                let message = e.server_message().unwrap_or(MSG_REGISTER_FAILED).to_string();
                self.error(message);
            }
        }
    }

    /// Save profile changes. An empty password leaves the password unchanged.
    pub async fn update_profile(&mut self, form: UpdateForm) {
        if !form.passwords_match() {
            self.error(MSG_PASSWORDS_MISMATCH);
            return;
        }

        let Some(token) = self.session.token().map(str::to_string) else {
            warn!("Profile update attempted without a session token");
            self.error(MSG_UPDATE_FAILED);
            return;
        };

        let new_password = form.wants_new_password();
        let request = UpdateRequest {
            name: &form.name,
            email: &form.email,
            password: new_password.then_some(form.password.as_str()),
            password_confirmation: new_password.then_some(form.password_confirmation.as_str()),
        };

        match self.api.update_user(&token, &request).await {
            Ok(profile) => {
                info!(password_changed = new_password, "Profile updated");
                self.profile = profile;
                self.update_form.clear_passwords();
                self.success(MSG_UPDATE_SUCCESS);
            }
            Err(e) if e.is_transport() => {
                warn!(error = %e, "Update request failed");
                self.error(MSG_CONNECTION_ERROR);
            }
            Err(e) => {
                info!(status = ?e.status(), error = %e, "Update rejected");
                let message = e.server_message().unwrap_or(MSG_UPDATE_FAILED).to_string();
                self.error(message);
            }
        }
    }

    /// Sign out locally, notifying the server on a best-effort basis
    pub async fn logout(&mut self) {
        if let Some(token) = self.session.token().map(str::to_string) {
            if let Err(e) = self.api.logout(&token).await {
                warn!(error = %e, "Server logout failed, signing out locally");
            }
        }

        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to remove stored token");
        }
        self.profile = UserProfile::default();
        self.update_form.clear();
        self.profile_tab = ProfileTab::Info;
        self.reset_focus();
        info!("Logged out");
        self.success(MSG_LOGOUT_SUCCESS);
    }

    // =========================================================================
    // Form Submission
    // =========================================================================

    pub async fn submit_login(&mut self) {
        let LoginForm { email, password } = self.login_form.clone();
        self.login(&email, &password).await;
    }

    pub async fn submit_register(&mut self) {
        let form = self.register_form.clone();
        self.register(&form.name, &form.email, &form.password, &form.password_confirmation)
            .await;
    }

    pub async fn submit_update(&mut self) {
        let form = self.update_form.clone();
        self.update_profile(form).await;
    }

    /// Run the action behind the visible tab's button
    pub async fn submit(&mut self) {
        match (self.view(), self.auth_tab, self.profile_tab) {
            (View::Unauthenticated, AuthTab::Login, _) => self.submit_login().await,
            (View::Unauthenticated, AuthTab::Register, _) => self.submit_register().await,
            (View::Authenticated, _, ProfileTab::Info) => self.submit_update().await,
            (View::Authenticated, _, ProfileTab::Logout) => self.logout().await,
        }
    }

    // =========================================================================
    // Form Editing
    // =========================================================================

    /// Form shown on the visible tab. The logout tab has only a button.
    pub fn active_form(&self) -> Option<&dyn Form> {
        match (self.view(), self.auth_tab, self.profile_tab) {
            (View::Unauthenticated, AuthTab::Login, _) => Some(&self.login_form),
            (View::Unauthenticated, AuthTab::Register, _) => Some(&self.register_form),
            (View::Authenticated, _, ProfileTab::Info) => Some(&self.update_form),
            (View::Authenticated, _, ProfileTab::Logout) => None,
        }
    }

    fn active_form_mut(&mut self) -> Option<&mut dyn Form> {
        match (self.view(), self.auth_tab, self.profile_tab) {
            (View::Unauthenticated, AuthTab::Login, _) => Some(&mut self.login_form),
            (View::Unauthenticated, AuthTab::Register, _) => Some(&mut self.register_form),
            (View::Authenticated, _, ProfileTab::Info) => Some(&mut self.update_form),
            (View::Authenticated, _, ProfileTab::Logout) => None,
        }
    }

    /// Put focus on the first slot of the visible form
    pub fn reset_focus(&mut self) {
        self.focus = self
            .active_form()
            .map(|form| form.first_field())
            .unwrap_or(Field::Submit);
    }

    pub fn focus_next(&mut self) {
        if let Some(next) = self.active_form().map(|form| form.next_field(self.focus)) {
            self.focus = next;
        }
    }

    pub fn focus_prev(&mut self) {
        if let Some(prev) = self.active_form().map(|form| form.prev_field(self.focus)) {
            self.focus = prev;
        }
    }

    /// Flip the visible screen's tab selector
    pub fn switch_tab(&mut self) {
        match self.view() {
            View::Unauthenticated => self.auth_tab = self.auth_tab.other(),
            View::Authenticated => self.profile_tab = self.profile_tab.other(),
        }
        self.reset_focus();
    }

    pub fn input_char(&mut self, c: char) {
        let focus = self.focus;
        if let Some(value) = self.active_form_mut().and_then(|form| form.value_mut(focus)) {
            if can_add_char(focus, value.chars().count(), c) {
                value.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        if let Some(value) = self.active_form_mut().and_then(|form| form.value_mut(focus)) {
            value.pop();
        }
    }
}

/// Check if a character is valid for text input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character should be accepted into `field`
pub fn can_add_char(field: Field, current_len: usize, c: char) -> bool {
    let max = match field {
        Field::Password | Field::Confirmation => MAX_PASSWORD_LENGTH,
        Field::Name | Field::Email => MAX_TEXT_LENGTH,
        Field::Submit => 0,
    };
    current_len < max && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
