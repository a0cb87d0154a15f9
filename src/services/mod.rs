// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session, remote API and user collection logic.

pub mod notify;
pub mod reqres;
pub mod session;
pub mod storage;
pub mod users;

pub use notify::{ChannelNotifier, Level, Notification, Notifier, TracingNotifier};
pub use reqres::ReqresClient;
pub use session::SessionManager;
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use users::{FetchOutcome, UserCollection};
