//! Headless controller for the login page.
//!
//! Exactly one panel is visible at a time, a single transient message
//! overlays it, and every delayed transition is explicit: navigations go
//! through the shared [`Navigator`](crate::nav::Navigator) and the delayed
//! return to the login panel is a pending entry the harness fires or
//! cancels. Handlers are plain methods; a UI layer registers them against
//! its own event system.

pub mod validate;

use self::validate::valid_email;
use crate::auth::AuthService;
use crate::nav::{ADMIN_PATH, PUBLIC_TRIPS_PATH};
use secrecy::SecretString;
use std::time::Duration;
use tracing::debug;

/// Delay before the redirect when a stored session is still valid on load.
pub const RESUME_REDIRECT_DELAY: Duration = Duration::from_millis(1000);
/// Delay before the redirect after a successful login.
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(1500);
/// Delay before returning to the login panel after a recovery email.
pub const RETURN_TO_LOGIN_DELAY: Duration = Duration::from_millis(3000);

/// Shown instead of the backend message once no attempts remain.
pub const LOCKOUT_MESSAGE: &str = "Account locked: too many failed login attempts.";

/// Panels of the login page; exactly one is visible at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Login,
    ForgotPassword,
    About,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Transient status message. A new message replaces the previous one; there
/// is no queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub severity: Severity,
}

/// Keyboard shortcuts handled on any panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPress {
    Escape,
    F1,
}

/// A panel change scheduled for later, fired or cancelled explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingPanel {
    pub panel: Panel,
    pub delay: Duration,
}

/// State machine behind the login page. Owns the injected [`AuthService`]
/// and drives it from its submit handlers.
pub struct PageController {
    auth: AuthService,
    panel: Panel,
    message: Option<Message>,
    busy: bool,
    pending_panel: Option<PendingPanel>,
}

impl PageController {
    #[must_use]
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            panel: Panel::Login,
            message: None,
            busy: false,
            pending_panel: None,
        }
    }

    #[must_use]
    pub fn panel(&self) -> Panel {
        self.panel
    }

    #[must_use]
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// True while a submit is in flight; the trigger control is disabled.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Resume check on page load. A stored session with a valid token shows
    /// a brief notice and schedules the role-based redirect; anything else
    /// settles on the login panel.
    pub fn init(&mut self) {
        if self.auth.is_authenticated() {
            let validation = self.auth.validate_token();
            if validation.valid {
                let target = if validation.user.as_ref().is_some_and(|user| user.is_admin) {
                    ADMIN_PATH
                } else {
                    PUBLIC_TRIPS_PATH
                };

                self.show_message("Redirecting...", Severity::Info);
                self.auth.navigator().schedule(target, RESUME_REDIRECT_DELAY);
                return;
            }

            // expiry already logged out; decode failures still need it
            self.auth.logout();
        }

        debug!("showing login page");
        self.panel = Panel::Login;
    }

    /// Show the login panel, dropping the message and any scheduled panel
    /// change.
    pub fn show_login(&mut self) {
        self.pending_panel = None;
        self.message = None;
        self.panel = Panel::Login;
    }

    pub fn show_forgot_password(&mut self) {
        self.pending_panel = None;
        self.message = None;
        self.panel = Panel::ForgotPassword;
    }

    pub fn show_about(&mut self) {
        self.pending_panel = None;
        self.message = None;
        self.panel = Panel::About;
    }

    pub fn handle_key(&mut self, key: KeyPress) {
        match key {
            KeyPress::Escape => self.show_login(),
            KeyPress::F1 => self.show_about(),
        }
    }

    /// Submit the login form. Both fields must be non-empty or no request is
    /// made; re-entry while busy is ignored.
    pub async fn submit_login(&mut self, username: &str, password: &str) {
        if self.busy {
            return;
        }

        let username = username.trim().to_string();
        if username.is_empty() || password.is_empty() {
            self.show_message("Please fill in all fields.", Severity::Error);
            return;
        }

        self.busy = true;
        self.show_message("Signing in...", Severity::Info);

        let result = self
            .auth
            .login(&username, SecretString::from(password.to_string()))
            .await;
        self.busy = false;

        if result.success {
            self.show_message("Login successful!", Severity::Success);

            let target = if self.auth.current_user().is_some_and(|user| user.is_admin) {
                ADMIN_PATH
            } else {
                PUBLIC_TRIPS_PATH
            };
            debug!("redirecting to {target}");
            self.auth.navigator().schedule(target, LOGIN_REDIRECT_DELAY);
        } else {
            let mut text = if result.message.is_empty() {
                "Login failed.".to_string()
            } else {
                result.message
            };

            match result.attempts_left {
                Some(left) if left > 0 => text = format!("{text} ({left} attempt(s) remaining)"),
                Some(_) => text = LOCKOUT_MESSAGE.to_string(),
                None => {}
            }

            self.show_message(text, Severity::Error);
        }
    }

    /// Submit the forgot-password form. The address is normalized and must
    /// look like an email or no request is made. Success schedules the
    /// return to the login panel.
    pub async fn submit_forgot_password(&mut self, email: &str) {
        if self.busy {
            return;
        }

        let email = email.trim().to_lowercase();
        if !valid_email(&email) {
            self.show_message("Please enter a valid email address.", Severity::Error);
            return;
        }

        self.busy = true;
        self.show_message("Sending recovery email...", Severity::Info);

        let result = self.auth.forgot_password(&email).await;
        self.busy = false;

        if result.success {
            self.show_message("Recovery email sent! Check your inbox.", Severity::Success);
            self.pending_panel = Some(PendingPanel {
                panel: Panel::Login,
                delay: RETURN_TO_LOGIN_DELAY,
            });
        } else {
            let text = if result.message.is_empty() {
                "Could not send the recovery email.".to_string()
            } else {
                result.message
            };
            self.show_message(text, Severity::Error);
        }
    }

    #[must_use]
    pub fn pending_panel(&self) -> Option<PendingPanel> {
        self.pending_panel
    }

    /// Apply the scheduled panel change now.
    pub fn fire_pending_panel(&mut self) {
        if let Some(pending) = self.pending_panel.take() {
            match pending.panel {
                Panel::Login => self.show_login(),
                Panel::ForgotPassword => self.show_forgot_password(),
                Panel::About => self.show_about(),
            }
        }
    }

    pub fn cancel_pending_panel(&mut self) {
        self.pending_panel = None;
    }

    fn show_message(&mut self, text: impl Into<String>, severity: Severity) {
        self.message = Some(Message {
            text: text.into(),
            severity,
        });
    }
}
