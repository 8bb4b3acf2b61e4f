use crate::client::PhotoApi;
use crate::error::{FetchError, FetchFlow};
use crate::model::{Image, SearchPage};
use crate::state::{Event, SearchState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    Search { query: String, page: u32 },
    Random,
}

/// A network call that a session action asked for.
///
/// The session never performs I/O itself. Callers execute the request (inline
/// or on a worker thread) and hand the result back through
/// [`SearchSession::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub kind: FetchKind,
}

impl FetchRequest {
    pub fn flow(&self) -> FetchFlow {
        match self.kind {
            FetchKind::Search { .. } => FetchFlow::Search,
            FetchKind::Random => FetchFlow::Random,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Page(SearchPage),
    Random(Image),
}

/// Runs a request against the API.
pub fn execute<A: PhotoApi + ?Sized>(api: &A, request: &FetchRequest) -> Result<FetchOutcome, FetchError> {
    match &request.kind {
        FetchKind::Search { query, page } => api.search_photos(query, *page).map(FetchOutcome::Page),
        FetchKind::Random => api.random_photo().map(FetchOutcome::Random),
    }
}

/// Owns the search state and decides which responses are still wanted.
///
/// Every issued request gets a fresh sequence number and only the most recent
/// one may complete. Anything older is dropped on arrival.
#[derive(Debug, Default)]
pub struct SearchSession {
    state: SearchState,
    next_seq: u64,
    pending: Option<u64>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn is_pending(&self, request: &FetchRequest) -> bool {
        self.pending == Some(request.seq)
    }

    /// Starts a new search from page 1. Blank queries are ignored.
    pub fn submit_search(&mut self, query: &str) -> Option<FetchRequest> {
        let query = query.trim();
        if query.is_empty() {
            log::debug!("Ignoring empty search query");
            return None;
        }

        self.transition(Event::SearchSubmitted { query: query.to_string() });
        Some(self.issue(FetchKind::Search {
            query: query.to_string(),
            page: 1,
        }))
    }

    /// Requests the next page of the current query.
    ///
    /// Returns `None` when there is no next page or a search is still in
    /// flight, since a second page request would supersede the first and
    /// lose its results.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if !self.state.can_load_more() {
            log::debug!(
                "No more pages to load (page {}/{})",
                self.state.page,
                self.state.total_pages
            );
            return None;
        }
        if self.state.loading {
            log::debug!("Load more ignored while a request is in flight");
            return None;
        }

        self.transition(Event::MoreRequested);
        Some(self.issue(FetchKind::Search {
            query: self.state.query_text.clone(),
            page: self.state.page,
        }))
    }

    pub fn fetch_random(&mut self) -> FetchRequest {
        self.transition(Event::RandomRequested);
        self.issue(FetchKind::Random)
    }

    /// Applies the result of `request`. Returns `false` if the request was
    /// superseded and the result was discarded.
    pub fn complete(&mut self, request: &FetchRequest, result: Result<FetchOutcome, FetchError>) -> bool {
        if !self.is_pending(request) {
            log::debug!(
                "Discarding stale {} response (seq {}, latest {:?})",
                request.flow(),
                request.seq,
                self.pending
            );
            return false;
        }
        self.pending = None;

        let event = match (&request.kind, result) {
            (FetchKind::Search { page, .. }, Ok(FetchOutcome::Page(results))) => {
                log::info!(
                    "Loaded {} images for page {}/{}",
                    results.results.len(),
                    page,
                    results.total_pages
                );
                Event::SearchLoaded { page: *page, results }
            }
            (FetchKind::Random, Ok(FetchOutcome::Random(image))) => {
                log::info!("Loaded random image {}", image.id);
                Event::RandomLoaded { image }
            }
            (kind, Ok(outcome)) => {
                log::error!("Mismatched response {:?} for request {:?}", outcome, kind);
                Self::failure_event(kind)
            }
            (kind, Err(e)) => {
                log::error!("Failed to fetch {} ({:?}): {}", request.flow(), kind, e);
                Self::failure_event(kind)
            }
        };

        self.transition(event);
        true
    }

    /// Executes `request` on the current thread and applies the result.
    pub fn run<A: PhotoApi + ?Sized>(&mut self, api: &A, request: FetchRequest) -> bool {
        let result = execute(api, &request);
        self.complete(&request, result)
    }

    fn failure_event(kind: &FetchKind) -> Event {
        match kind {
            FetchKind::Search { page, .. } => Event::SearchFailed { page: *page },
            FetchKind::Random => Event::RandomFailed,
        }
    }

    fn issue(&mut self, kind: FetchKind) -> FetchRequest {
        self.next_seq += 1;
        self.pending = Some(self.next_seq);
        FetchRequest {
            seq: self.next_seq,
            kind,
        }
    }

    fn transition(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event);
    }
}
