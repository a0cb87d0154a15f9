// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod page;
pub mod session;
pub mod user;

pub use page::PageState;
pub use session::{Credentials, LoginResponse, StoredSession};
pub use user::{SingleUser, UpdatedUser, User, UserPage, UserUpdate};
