// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by the session and user collection layers.
//!
//! Every remote failure keeps its structured kind here, even though the
//! console renders all of them with the same generic message per operation.

/// Application error type returned across the core's public boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request could not be sent or no usable response came back.
    #[error("Network error: {0}")]
    Network(String),

    /// The remote API answered with a non-success status.
    #[error("Remote API rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Authentication required")]
    NotAuthenticated,

    #[error("User {0} is not on the loaded page")]
    UnknownRecord(u64),

    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the remote API refused the credential (expired or revoked session).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Rejected { status, .. } if *status == 401 || *status == 403)
    }

    /// Whether the failure came from talking to the remote API.
    pub fn is_remote(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Rejected { .. })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        messages.dedup();
        AppError::Validation(messages.join("; "))
    }
}

/// Remote operations the console performs, used to pick the user-facing failure text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    FetchUsers,
    FetchUser,
    UpdateUser,
    DeleteUser,
}

impl Operation {
    /// Static human-readable failure message shown to the user.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Login => "Login failed",
            Operation::FetchUsers => "Failed to fetch users",
            Operation::FetchUser => "Failed to fetch user",
            Operation::UpdateUser => "Failed to update user",
            Operation::DeleteUser => "Failed to delete user",
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, AppError>;
