// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EmployWise: manage user records behind the reqres demo API
//!
//! This crate provides the session handling and paginated user collection
//! logic behind the `employwise` console. All persistence lives in the
//! remote API; the only local state is the session token.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

use config::Config;
use error::Result;
use services::{Notifier, ReqresClient, SessionManager, TokenStore, UserCollection};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub users: UserCollection,
}

impl AppState {
    /// Wire the services together, restoring any persisted session.
    pub fn new(
        config: Config,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let client = ReqresClient::new(&config)?;
        let session = Arc::new(SessionManager::restore(
            client.clone(),
            store,
            notifier.clone(),
        ));
        let users = UserCollection::new(client, session.clone(), notifier, config.loading_delay);

        Ok(Self {
            config,
            session,
            users,
        })
    }
}
