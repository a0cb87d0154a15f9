// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User collection controller.
//!
//! Owns the loaded page of users and reconciles it with the remote API:
//! - Page fetches replace the page wholesale; a failed fetch keeps the old
//!   records visible and sets an inline error.
//! - Updates and deletes mutate the loaded page in place once the remote
//!   call succeeds. Deleted rows are not backfilled.
//! - Searching filters the loaded page only and never hits the network.
//!
//! Overlapping page fetches are tagged with a sequence number; only the most
//! recently issued one may apply its result.

use crate::error::{AppError, Operation, Result};
use crate::models::page::FETCH_ERROR_MESSAGE;
use crate::models::{PageState, User, UserUpdate};
use crate::services::notify::{Notification, Notifier};
use crate::services::reqres::ReqresClient;
use crate::services::session::SessionManager;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use validator::Validate;

/// What happened to the result of a page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was applied to the page state.
    Applied,
    /// A newer fetch was issued meanwhile; this response was dropped.
    Superseded,
}

/// Controller for the paginated user list.
pub struct UserCollection {
    client: ReqresClient,
    session: Arc<SessionManager>,
    notifier: Arc<dyn Notifier>,
    /// How long `is_loading` lingers after a fetch completes.
    loading_delay: Duration,
    state: RwLock<PageState>,
    /// Sequence number of the most recently issued page fetch.
    latest_fetch: AtomicU64,
}

impl UserCollection {
    pub fn new(
        client: ReqresClient,
        session: Arc<SessionManager>,
        notifier: Arc<dyn Notifier>,
        loading_delay: Duration,
    ) -> Self {
        Self {
            client,
            session,
            notifier,
            loading_delay,
            state: RwLock::new(PageState::default()),
            latest_fetch: AtomicU64::new(0),
        }
    }

    /// Read-only copy of the current page state.
    pub async fn snapshot(&self) -> PageState {
        self.state.read().await.clone()
    }

    /// Loaded records after applying the search query.
    pub async fn filtered_records(&self) -> Vec<User> {
        self.state.read().await.filtered()
    }

    /// Set the search query. Purely local.
    pub async fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        tracing::debug!(query = %query, "Search query changed");
        self.state.write().await.search_query = query;
    }

    async fn require_token(&self) -> Result<String> {
        self.session.token().await.ok_or(AppError::NotAuthenticated)
    }

    // ─── Page Fetching ───────────────────────────────────────────────────────

    /// Load page `page` (1-indexed) from the remote API.
    ///
    /// A page past the last one is a caller error, not a load failure. It
    /// returns [`AppError::InvalidPage`] silently and keeps the loaded records.
    pub async fn fetch_page(&self, page: u32) -> Result<FetchOutcome> {
        if page == 0 {
            return Err(AppError::InvalidPage(page));
        }
        let token = self.require_token().await?;

        let seq = self.latest_fetch.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error_message = None;
        }
        tracing::debug!(page, seq, "Fetching users");

        let result = self.client.list_users(Some(&token), page).await;

        let outcome = {
            let mut state = self.state.write().await;

            if !self.is_latest(seq) {
                tracing::debug!(page, seq, "Discarding superseded page response");
                return Ok(FetchOutcome::Superseded);
            }

            let outcome = match result {
                Ok(response) if response.total_pages > 0 && page > response.total_pages => {
                    tracing::warn!(
                        page,
                        total_pages = response.total_pages,
                        "Requested page is past the last page"
                    );
                    state.total_pages = response.total_pages;
                    Err(AppError::InvalidPage(page))
                }
                Ok(response) => {
                    tracing::info!(
                        page,
                        count = response.data.len(),
                        total = response.total,
                        "Users page loaded"
                    );
                    state.records = response.data;
                    state.current_page = page;
                    state.total_pages = response.total_pages.max(1);
                    state.per_page = response.per_page;
                    state.total = response.total;
                    state.error_message = None;
                    Ok(FetchOutcome::Applied)
                }
                Err(e) => {
                    // Keep the stale page visible under the error.
                    tracing::warn!(page, error = %e, "Failed to fetch users");
                    state.error_message = Some(FETCH_ERROR_MESSAGE.to_string());
                    self.notifier
                        .notify(Notification::error(Operation::FetchUsers.failure_message()));
                    Err(e)
                }
            };

            if self.loading_delay.is_zero() {
                state.is_loading = false;
            }
            outcome
        };

        if !self.loading_delay.is_zero() {
            tokio::time::sleep(self.loading_delay).await;
            if self.is_latest(seq) {
                self.state.write().await.is_loading = false;
            }
        }

        outcome
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest_fetch.load(Ordering::SeqCst) == seq
    }

    /// Look up a single user. Does not touch the loaded page.
    pub async fn fetch_record(&self, id: u64) -> Result<User> {
        let token = self.require_token().await?;

        match self.client.get_user(Some(&token), id).await {
            Ok(found) => Ok(found.data),
            Err(e) => {
                tracing::warn!(user_id = id, error = %e, "Failed to fetch user");
                self.notifier
                    .notify(Notification::error(Operation::FetchUser.failure_message()));
                Err(e)
            }
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────────

    /// Send a partial update and merge it into the loaded record.
    ///
    /// The merge uses the fields that were sent, not the server's echo.
    /// Returns the record as it now stands locally, or as it was updated when
    /// the row left the page while the request was in flight.
    pub async fn update_record(&self, id: u64, update: UserUpdate) -> Result<User> {
        let token = self.require_token().await?;

        update.validate()?;
        if update.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }
        let before = self.loaded_record(id).await?;

        let echo = match self.client.update_user(Some(&token), id, &update).await {
            Ok(echo) => echo,
            Err(e) => {
                tracing::warn!(user_id = id, error = %e, "Failed to update user");
                self.notifier
                    .notify(Notification::error(Operation::UpdateUser.failure_message()));
                return Err(e);
            }
        };

        if !echo.agrees_with(&update) {
            tracing::debug!(
                user_id = id,
                ?echo,
                "Server echo differs from sent fields, keeping sent fields"
            );
        }

        let merged = {
            let mut state = self.state.write().await;
            match state.position_of(id) {
                Some(pos) => {
                    state.records[pos].apply(&update);
                    state.records[pos].clone()
                }
                None => {
                    // Removed locally while the update was in flight; the remote write stands.
                    tracing::warn!(user_id = id, "Updated user is no longer on the loaded page");
                    let mut detached = before;
                    detached.apply(&update);
                    detached
                }
            }
        };

        tracing::info!(user_id = id, updated_at = ?echo.updated_at, "User updated");
        self.notifier
            .notify(Notification::success("User updated successfully"));
        Ok(merged)
    }

    /// Delete a user and drop it from the loaded page.
    pub async fn delete_record(&self, id: u64) -> Result<()> {
        let token = self.require_token().await?;
        self.loaded_record(id).await?;

        if let Err(e) = self.client.delete_user(Some(&token), id).await {
            tracing::warn!(user_id = id, error = %e, "Failed to delete user");
            self.notifier
                .notify(Notification::error(Operation::DeleteUser.failure_message()));
            return Err(e);
        }

        {
            let mut state = self.state.write().await;
            if let Some(pos) = state.position_of(id) {
                state.records.remove(pos);
            }
        }

        tracing::info!(user_id = id, "User deleted");
        self.notifier
            .notify(Notification::success("User deleted successfully"));
        Ok(())
    }

    async fn loaded_record(&self, id: u64) -> Result<User> {
        let state = self.state.read().await;
        state
            .position_of(id)
            .map(|pos| state.records[pos].clone())
            .ok_or(AppError::UnknownRecord(id))
    }
}
