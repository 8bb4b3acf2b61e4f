//! Search session state and its transitions
//!
//! [`SearchState`] is plain data. Every change goes through
//! [`SearchState::apply`], which takes the current state and an [`Event`]
//! and returns the next state, so front ends and tests can drive it without
//! any network or UI in the loop.

use crate::error::FetchFlow;
use crate::model::{Image, SearchPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub query_text: String,
    /// 1-based page of the most recent search request.
    pub page: u32,
    /// Last page whose results actually landed in `images`. Zero when the
    /// list holds no search results for the current query.
    pub loaded_page: u32,
    pub total_pages: u32,
    /// Results in arrival order. Pages are not de-duplicated.
    pub images: Vec<Image>,
    pub loading: bool,
    /// Empty when there is nothing to report.
    pub error_message: String,
    /// Bumped every time `images` is replaced or appended to.
    pub images_revision: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query_text: String::new(),
            page: 1,
            loaded_page: 0,
            total_pages: 0,
            images: Vec::new(),
            loading: false,
            error_message: String::new(),
            images_revision: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A new query was submitted. Pagination starts over.
    SearchSubmitted { query: String },
    /// The next page of the current query was requested.
    MoreRequested,
    RandomRequested,
    SearchLoaded { page: u32, results: SearchPage },
    SearchFailed { page: u32 },
    RandomLoaded { image: Image },
    RandomFailed,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a "load more" action makes sense right now.
    pub fn can_load_more(&self) -> bool {
        !self.query_text.is_empty() && self.page < self.total_pages
    }

    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    pub fn apply(mut self, event: Event) -> Self {
        match event {
            Event::SearchSubmitted { query } => {
                self.query_text = query;
                self.page = 1;
                self.loaded_page = 0;
                self.total_pages = 0;
                self.error_message.clear();
                self.loading = true;
                if !self.images.is_empty() {
                    self.images.clear();
                    self.images_revision += 1;
                }
            }
            Event::MoreRequested => {
                self.page += 1;
                self.error_message.clear();
                self.loading = true;
            }
            Event::RandomRequested => {
                // Any search still in flight is superseded and will never land.
                self.page = self.loaded_page.max(1);
                self.loading = true;
            }
            Event::SearchLoaded { page, results } => {
                if page <= 1 {
                    self.images = results.results;
                } else {
                    self.images.extend(results.results);
                }
                self.page = page.max(1);
                self.loaded_page = self.page;
                self.total_pages = results.total_pages;
                self.images_revision += 1;
                self.loading = false;
            }
            Event::SearchFailed { .. } => {
                // Roll back so the next "load more" asks for the same page again.
                self.page = self.loaded_page.max(1);
                self.error_message = FetchFlow::Search.user_message().to_string();
                self.loading = false;
            }
            Event::RandomLoaded { image } => {
                self.images = vec![image];
                self.page = 1;
                self.loaded_page = 0;
                self.total_pages = 0;
                self.images_revision += 1;
                self.loading = false;
            }
            Event::RandomFailed => {
                self.error_message = FetchFlow::Random.user_message().to_string();
                self.loading = false;
            }
        }
        self
    }
}
