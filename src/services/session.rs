// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session manager: owns the authentication token and its persisted copy.
//!
//! The session is an explicit object handed to whoever needs it; there is no
//! global. It is restored from the token store at startup without asking the
//! remote API whether the token is still good. A stale token only shows up
//! when a later call is rejected.

use crate::error::{AppError, Operation, Result};
use crate::models::{Credentials, StoredSession};
use crate::services::notify::{Notification, Notifier};
use crate::services::reqres::ReqresClient;
use crate::services::storage::TokenStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use validator::Validate;

/// Process-wide login state.
pub struct SessionManager {
    client: ReqresClient,
    store: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    token: RwLock<Option<String>>,
}

impl SessionManager {
    /// Initialize from whatever token was persisted by an earlier run.
    ///
    /// An unreadable store starts the session logged out.
    pub fn restore(
        client: ReqresClient,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let token = match store.load() {
            Ok(stored) => stored.map(|s| s.token),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted session, starting logged out");
                None
            }
        };
        tracing::debug!(restored = token.is_some(), "Session initialized");

        Self {
            client,
            store,
            notifier,
            token: RwLock::new(token),
        }
    }

    /// Current token, if logged in.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Log in and report success as a boolean.
    ///
    /// Failures are announced through the notifier; use [`Self::try_login`]
    /// to get the structured error instead.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.try_login(email, password).await.is_ok()
    }

    /// Log in, keeping the session untouched on any failure.
    pub async fn try_login(&self, email: &str, password: &str) -> Result<()> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        match self.authenticate(&credentials).await {
            Ok(()) => {
                tracing::info!(email = %credentials.email, "Logged in");
                self.notifier
                    .notify(Notification::success("Logged in successfully!"));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(email = %credentials.email, error = %e, "Login failed");
                self.notifier.notify(Notification::error(login_failure_text(&e)));
                Err(e)
            }
        }
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<()> {
        credentials.validate()?;

        let response = self.client.login(credentials).await?;
        if response.token.is_empty() {
            return Err(AppError::Network(
                "Login response carried an empty token".to_string(),
            ));
        }

        // Persist before publishing so memory and storage never disagree.
        let mut slot = self.token.write().await;
        self.store.save(&StoredSession::new(response.token.clone()))?;
        *slot = Some(response.token);
        Ok(())
    }

    /// Drop the token from memory and storage. Never fails.
    pub async fn logout(&self) {
        let had_token = self.token.write().await.take().is_some();

        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Failed to clear persisted session");
        }

        tracing::info!(had_token, "Logged out");
        self.notifier
            .notify(Notification::info("Logged out successfully"));
    }
}

/// Server-provided rejection text when there is one, the generic text otherwise.
fn login_failure_text(error: &AppError) -> String {
    match error {
        AppError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
        AppError::Validation(message) => message.clone(),
        _ => Operation::Login.failure_message().to_string(),
    }
}
