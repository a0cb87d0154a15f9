// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the remote user API.
//!
//! Handles:
//! - Login (token exchange)
//! - Paginated user listing and single-user lookup
//! - Partial user updates and deletes
//!
//! Transport failures map to [`AppError::Network`], non-success statuses to
//! [`AppError::Rejected`].

use crate::config::Config;
use crate::error::AppError;
use crate::models::session::ApiErrorBody;
use crate::models::{
    Credentials, LoginResponse, SingleUser, UpdatedUser, UserPage, UserUpdate,
};
use serde::Deserialize;

/// Remote user API client.
#[derive(Clone)]
pub struct ReqresClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ReqresClient {
    /// Create a client for the API at `config.api_url`.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AppError> {
        let url = format!("{}/login", self.base_url);

        let response = self
            .request(reqwest::Method::POST, &url, None)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Login request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// List one page of users.
    pub async fn list_users(&self, token: Option<&str>, page: u32) -> Result<UserPage, AppError> {
        let url = format!("{}/users", self.base_url);

        let response = self
            .request(reqwest::Method::GET, &url, token)
            .query(&[("page", page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Get a single user by ID.
    pub async fn get_user(&self, token: Option<&str>, id: u64) -> Result<SingleUser, AppError> {
        let url = format!("{}/users/{}", self.base_url, id);

        let response = self
            .request(reqwest::Method::GET, &url, token)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Send a partial update for a user.
    ///
    /// An empty or non-JSON success body is tolerated; the echo is only informational.
    pub async fn update_user(
        &self,
        token: Option<&str>,
        id: u64,
        update: &UserUpdate,
    ) -> Result<UpdatedUser, AppError> {
        let url = format!("{}/users/{}", self.base_url, id);

        let response = self
            .request(reqwest::Method::PUT, &url, token)
            .json(update)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let response = self.check_response(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    /// Delete a user. Success is signalled by status code only.
    pub async fn delete_user(&self, token: Option<&str>, id: u64) -> Result<(), AppError> {
        let url = format!("{}/users/{}", self.base_url, id);

        let response = self
            .request(reqwest::Method::DELETE, &url, token)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response(response).await?;
        Ok(())
    }

    /// Request builder carrying the API key and, when logged in, the bearer token.
    fn request(
        &self,
        method: reqwest::Method,
        url: &str,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut request = self.http.request(method, url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Check response status and return error if not successful.
    async fn check_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AppError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // The API reports rejections as {"error": "..."}; fall back to the raw body.
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("unknown").to_string()
                } else {
                    body
                }
            });

        if status.as_u16() == 401 {
            tracing::warn!("Remote API rejected credential (401)");
        }

        Err(AppError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let response = self.check_response(response).await?;

        response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("JSON parse error: {}", e)))
    }
}
