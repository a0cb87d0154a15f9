// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Observable state of the loaded user page.

use crate::models::User;

/// Inline error shown when a page could not be loaded.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch users. Please try again.";

/// The currently loaded page of users plus the search and loading flags around it.
///
/// Owned by [`crate::services::UserCollection`]; everybody else gets clones.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    /// Records of the loaded page, in server order
    pub records: Vec<User>,
    /// 1-indexed page number of `records`
    pub current_page: u32,
    pub total_pages: u32,
    pub per_page: u32,
    pub total: u32,
    /// Empty (or whitespace-only) means no filter
    pub search_query: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            current_page: 1,
            total_pages: 1,
            per_page: 0,
            total: 0,
            search_query: String::new(),
            is_loading: false,
            error_message: None,
        }
    }
}

impl PageState {
    /// Whether a search filter is in effect.
    pub fn is_searching(&self) -> bool {
        !self.search_query.trim().is_empty()
    }

    /// Records of the loaded page matching the search query, in original order.
    ///
    /// Only the loaded page is searched; unfetched pages are never consulted.
    pub fn filtered(&self) -> Vec<User> {
        if !self.is_searching() {
            return self.records.clone();
        }

        let needle = self.search_query.to_lowercase();
        self.records
            .iter()
            .filter(|user| user.matches(&needle))
            .cloned()
            .collect()
    }

    /// Paging and searching are mutually exclusive.
    ///
    /// Any typed query hides the pager, even one the filter ignores as blank.
    pub fn pagination_visible(&self) -> bool {
        self.search_query.is_empty()
    }

    /// A search is active and nothing on the page matches it.
    pub fn no_matches(&self) -> bool {
        self.is_searching() && self.filtered().is_empty()
    }

    /// "N user(s) found" over the filtered set.
    pub fn summary(&self) -> String {
        let count = self.filtered().len();
        format!("{} user{} found", count, if count == 1 { "" } else { "s" })
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub(crate) fn position_of(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|user| user.id == id)
    }
}
