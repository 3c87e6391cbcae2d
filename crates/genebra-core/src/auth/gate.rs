//! Page-load authentication gate

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::client::{Credentials, LoginClient};
use crate::storage::{StoredToken, TokenStore};
use crate::ui::{LoginView, Navigator, Page, PageControls};

/// What the gate decided for the loaded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageGate {
    /// Navigation was issued; nothing else is wired
    Redirected(Page),
    /// Login page without a token: the form submit handler is wired
    LoginForm,
    /// Any other page with a token
    Unlocked {
        /// Whether a logout handler was wired
        logout: bool,
    },
}

/// Result of a login form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// No login form was wired on this page
    Ignored,
    /// The error region now shows this message
    Rejected(String),
    LoggedIn,
}

/// Gates page access on the presence of a stored token
pub struct SessionGate {
    store: Arc<dyn TokenStore>,
    client: Arc<dyn LoginClient>,
    navigator: Arc<dyn Navigator>,
    wiring: Mutex<Option<PageGate>>,
}

impl SessionGate {
    pub fn new(
        store: Arc<dyn TokenStore>,
        client: Arc<dyn LoginClient>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            client,
            navigator,
            wiring: Mutex::new(None),
        }
    }

    /// Run the gate for a freshly loaded page.
    ///
    /// Redirects happen here, before the caller gets a chance to wire any
    /// other handler.
    pub fn on_page_load(&self, page: &Page, controls: PageControls) -> PageGate {
        let has_token = StoredToken::is_present(self.store.as_ref());

        let gate = match (page.is_login(), has_token) {
            (true, true) => {
                self.navigator.navigate(Page::Main);
                PageGate::Redirected(Page::Main)
            }
            (true, false) => PageGate::LoginForm,
            (false, false) => {
                self.navigator.navigate(Page::Login);
                PageGate::Redirected(Page::Login)
            }
            (false, true) => PageGate::Unlocked {
                logout: controls.logout,
            },
        };

        debug!("Page {} loaded: {:?}", page, gate);
        *self.wiring.lock() = Some(gate.clone());
        gate
    }

    /// What the last page load wired, if any
    pub fn wiring(&self) -> Option<PageGate> {
        self.wiring.lock().clone()
    }

    /// Handle a login form submission.
    ///
    /// Failures of any kind end up in the form's error region; nothing is
    /// stored and no navigation happens unless the backend returns a token.
    pub async fn submit_login(&self, form: &dyn LoginView) -> LoginOutcome {
        if self.wiring() != Some(PageGate::LoginForm) {
            warn!("Login submitted on a page without a wired login form");
            return LoginOutcome::Ignored;
        }

        form.clear_error();
        let credentials = Credentials::new(form.username(), form.password());

        let token = match self.client.login(&credentials).await {
            Ok(token) => token,
            Err(e) => {
                let message = e.to_string();
                info!("Login rejected for {}: {}", credentials.username, message);
                form.show_error(&message);
                return LoginOutcome::Rejected(message);
            }
        };

        if let Err(e) = StoredToken::write(self.store.as_ref(), &token) {
            let message = e.to_string();
            form.show_error(&message);
            return LoginOutcome::Rejected(message);
        }

        info!("Logged in as {}", credentials.username);
        self.navigator.navigate(Page::Main);
        LoginOutcome::LoggedIn
    }

    /// Handle a click on the logout control.
    ///
    /// Returns false when no logout handler was wired for this page.
    pub fn logout(&self) -> bool {
        let wired = matches!(self.wiring(), Some(PageGate::Unlocked { logout: true }));
        if !wired {
            warn!("Logout requested on a page without a wired logout control");
            return false;
        }

        if let Err(e) = StoredToken::delete(self.store.as_ref()) {
            warn!("Failed to delete stored token: {}", e);
        }
        info!("Logged out");
        self.navigator.navigate(Page::Login);
        true
    }
}
