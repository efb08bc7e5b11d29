use crate::core::context::AppContext;
use crate::models::{Dog, SearchCriteria};
use crate::services::GatewayError;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use validator::Validate;

/// Errors that can occur in the paginated result stream
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("invalid search criteria: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Observable state of the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    /// No criteria submitted yet
    Idle,
    /// A page fetch for the current criteria is outstanding
    Loading,
    /// Criteria active, no fetch outstanding, more pages may be available
    Ready,
    /// No further pages will be offered for the current criteria
    Exhausted,
}

/// Result of a [`DogStream::fetch_next`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was fetched and appended; carries the number of records
    Appended(usize),
    /// Nothing to do: no criteria yet, already loading, or exhausted
    Skipped,
    /// The fetch completed for superseded criteria and was discarded
    Stale,
}

/// In-flight fetch token, tagged with the criteria generation it was
/// issued for
struct PageTicket {
    generation: u64,
    cursor: Option<String>,
    criteria: SearchCriteria,
}

/// One successfully fetched and resolved page
struct FetchedPage {
    dogs: Vec<Dog>,
    total: u64,
    next_cursor: Option<String>,
}

/// How a completed fetch was applied to the stream
#[derive(Debug, PartialEq, Eq)]
enum Applied {
    Appended(usize),
    Stale,
    Failed,
}

/// Mutable stream state, guarded by the stream's lock
struct StreamInner {
    criteria: Option<SearchCriteria>,
    generation: u64,
    dogs: Vec<Dog>,
    page_count: usize,
    total: u64,
    cursor: Option<String>,
    exhausted: bool,
    loading: bool,
}

impl StreamInner {
    fn new() -> Self {
        Self {
            criteria: None,
            generation: 0,
            dogs: Vec::new(),
            page_count: 0,
            total: 0,
            cursor: None,
            exhausted: false,
            loading: false,
        }
    }

    /// Replace the criteria wholesale and discard everything accumulated
    /// under the previous generation
    fn reset_for(&mut self, criteria: SearchCriteria) {
        self.generation += 1;
        self.criteria = Some(criteria);
        self.dogs.clear();
        self.page_count = 0;
        self.total = 0;
        self.cursor = None;
        self.exhausted = false;
        self.loading = false;
    }

    /// Claim the single fetch slot for the current generation
    ///
    /// Returns `None` when there is nothing to fetch: no criteria yet, a
    /// fetch already outstanding, or the stream exhausted.
    fn begin_fetch(&mut self) -> Option<PageTicket> {
        if self.loading || self.exhausted {
            return None;
        }
        let criteria = self.criteria.clone()?;

        self.loading = true;
        Some(PageTicket {
            generation: self.generation,
            cursor: self.cursor.clone(),
            criteria,
        })
    }

    /// Apply a completed fetch; `None` marks a failed fetch
    ///
    /// A completion whose generation no longer matches is discarded
    /// without touching the current generation's state, including its
    /// fetch slot.
    fn finish(&mut self, ticket: &PageTicket, page: Option<FetchedPage>) -> Applied {
        if ticket.generation != self.generation {
            return Applied::Stale;
        }

        self.loading = false;
        let page = match page {
            Some(page) => page,
            None => return Applied::Failed,
        };

        let fetched = page.dogs.len();
        self.total = page.total;

        // Exhaustion: short page or absent cursor, whichever comes first
        if fetched < ticket.criteria.page_size as usize || page.next_cursor.is_none() {
            self.exhausted = true;
            self.cursor = None;
        } else {
            self.cursor = page.next_cursor;
        }

        self.dogs.extend(page.dogs);
        self.page_count += 1;
        Applied::Appended(fetched)
    }

    fn phase(&self) -> StreamPhase {
        if self.criteria.is_none() {
            StreamPhase::Idle
        } else if self.exhausted {
            StreamPhase::Exhausted
        } else if self.loading {
            StreamPhase::Loading
        } else {
            StreamPhase::Ready
        }
    }
}

/// Continuously growing, page-at-a-time stream of dogs matching the
/// active search criteria
///
/// The nearest thing to a state machine in the system: criteria changes
/// reset it atomically, at most one page fetch per criteria generation is
/// in flight, and completions for superseded criteria are discarded on
/// arrival. Each page is a two-step composite (search identifiers, then
/// resolve records); a page is appended only when both steps succeed, so
/// a failed fetch leaves the stream retry-safe in its prior state.
pub struct DogStream {
    ctx: Arc<AppContext>,
    inner: Mutex<StreamInner>,
}

impl DogStream {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            inner: Mutex::new(StreamInner::new()),
        }
    }

    /// Submit new criteria, replacing the active criteria wholesale
    ///
    /// Validation runs before acceptance; a rejected submission changes
    /// nothing. Accepted criteria discard all accumulated pages and any
    /// in-flight fetch's right to append.
    pub async fn submit(&self, criteria: SearchCriteria) -> Result<(), StreamError> {
        criteria.validate()?;

        let mut inner = self.inner.lock().await;
        inner.reset_for(criteria);
        tracing::debug!("Search criteria replaced (generation {})", inner.generation);
        Ok(())
    }

    /// Fetch and append the next page, if one may be fetched
    ///
    /// No-op (`Skipped`) unless the stream is `Ready` or freshly
    /// submitted; at most one outstanding fetch per stream generation.
    pub async fn fetch_next(&self) -> Result<FetchOutcome, StreamError> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            match inner.begin_fetch() {
                Some(ticket) => ticket,
                None => return Ok(FetchOutcome::Skipped),
            }
        };

        // Network steps run without the lock so a criteria change can
        // land while this fetch is in flight.
        let fetched = self.load_page(&ticket).await;

        let mut inner = self.inner.lock().await;
        match fetched {
            Ok(page) => match inner.finish(&ticket, Some(page)) {
                Applied::Appended(count) => {
                    tracing::debug!(
                        "Appended page {} ({} dogs, {} accumulated)",
                        inner.page_count,
                        count,
                        inner.dogs.len()
                    );
                    Ok(FetchOutcome::Appended(count))
                }
                Applied::Stale => Ok(FetchOutcome::Stale),
                Applied::Failed => unreachable!("successful fetch reported as failed"),
            },
            Err(e) => {
                if inner.finish(&ticket, None) == Applied::Stale {
                    // Superseded before completion; the error belongs to
                    // criteria nobody is interested in anymore.
                    Ok(FetchOutcome::Stale)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    /// Two-step page fetch: search identifiers, then resolve records
    async fn load_page(&self, ticket: &PageTicket) -> Result<FetchedPage, GatewayError> {
        let search = self.ctx.authorized(
            self.ctx
                .gateway
                .search_dogs(&ticket.criteria, ticket.cursor.as_deref())
                .await,
        )?;

        let dogs = self
            .ctx
            .authorized(self.ctx.gateway.get_dogs_by_ids(&search.result_ids).await)?;

        Ok(FetchedPage {
            next_cursor: search.next_cursor(),
            total: search.total,
            dogs,
        })
    }

    /// Snapshot of all dogs accumulated for the current criteria
    pub async fn dogs(&self) -> Vec<Dog> {
        self.inner.lock().await.dogs.clone()
    }

    pub async fn phase(&self) -> StreamPhase {
        self.inner.lock().await.phase()
    }

    /// Whether another page may still be offered
    pub async fn has_more(&self) -> bool {
        let inner = self.inner.lock().await;
        inner.criteria.is_some() && !inner.exhausted
    }

    /// Total matching records reported by the backend
    pub async fn total(&self) -> u64 {
        self.inner.lock().await.total
    }

    pub async fn page_count(&self) -> usize {
        self.inner.lock().await.page_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog(id: &str) -> Dog {
        Dog {
            id: id.to_string(),
            img: format!("https://img.shelter.test/{}.jpg", id),
            name: format!("Dog {}", id),
            age: 2,
            zip_code: "98101".to_string(),
            breed: "Beagle".to_string(),
        }
    }

    fn criteria(page_size: u8) -> SearchCriteria {
        SearchCriteria {
            page_size,
            ..Default::default()
        }
    }

    fn full_page(ids: &[&str], total: u64, next: &str) -> FetchedPage {
        FetchedPage {
            dogs: ids.iter().map(|id| dog(id)).collect(),
            total,
            next_cursor: Some(next.to_string()),
        }
    }

    #[test]
    fn test_idle_stream_has_nothing_to_fetch() {
        let mut inner = StreamInner::new();
        assert_eq!(inner.phase(), StreamPhase::Idle);
        assert!(inner.begin_fetch().is_none());
    }

    #[test]
    fn test_single_flight_guard() {
        let mut inner = StreamInner::new();
        inner.reset_for(criteria(2));

        let ticket = inner.begin_fetch().expect("first fetch should start");
        assert_eq!(inner.phase(), StreamPhase::Loading);
        // A concurrent trigger while loading is a no-op
        assert!(inner.begin_fetch().is_none());

        inner.finish(&ticket, Some(full_page(&["d1", "d2"], 4, "2")));
        assert_eq!(inner.phase(), StreamPhase::Ready);
        assert!(inner.begin_fetch().is_some());
    }

    #[test]
    fn test_stale_page_never_appended() {
        let mut inner = StreamInner::new();
        inner.reset_for(criteria(2));
        let ticket = inner.begin_fetch().unwrap();

        // A second submission lands while the fetch is in flight
        inner.reset_for(criteria(2));

        let applied = inner.finish(&ticket, Some(full_page(&["old1", "old2"], 9, "2")));
        assert_eq!(applied, Applied::Stale);
        assert!(inner.dogs.is_empty(), "stale page must not be appended");

        // The new generation's fetch slot is untouched by the stale
        // completion
        assert_eq!(inner.phase(), StreamPhase::Ready);
        let ticket = inner.begin_fetch().expect("new generation can fetch");
        assert_eq!(ticket.generation, inner.generation);
        assert!(ticket.cursor.is_none(), "new generation starts at page 0");
    }

    #[test]
    fn test_stale_error_does_not_clear_new_fetch_slot() {
        let mut inner = StreamInner::new();
        inner.reset_for(criteria(2));
        let old_ticket = inner.begin_fetch().unwrap();

        inner.reset_for(criteria(2));
        let new_ticket = inner.begin_fetch().unwrap();

        // The superseded fetch fails after the new one started
        assert_eq!(inner.finish(&old_ticket, None), Applied::Stale);
        assert_eq!(inner.phase(), StreamPhase::Loading);

        inner.finish(&new_ticket, Some(full_page(&["d1", "d2"], 2, "2")));
        assert_eq!(inner.dogs.len(), 2);
    }

    #[test]
    fn test_short_page_exhausts_stream() {
        let mut inner = StreamInner::new();
        inner.reset_for(criteria(25));
        let ticket = inner.begin_fetch().unwrap();

        let page = FetchedPage {
            dogs: vec![dog("d1"), dog("d2")],
            total: 2,
            next_cursor: Some("25".to_string()),
        };
        assert_eq!(inner.finish(&ticket, Some(page)), Applied::Appended(2));

        assert_eq!(inner.phase(), StreamPhase::Exhausted);
        assert!(inner.begin_fetch().is_none(), "exhausted stream must not fetch");
    }

    #[test]
    fn test_absent_cursor_exhausts_stream() {
        let mut inner = StreamInner::new();
        inner.reset_for(criteria(2));
        let ticket = inner.begin_fetch().unwrap();

        let page = FetchedPage {
            dogs: vec![dog("d1"), dog("d2")],
            total: 2,
            next_cursor: None,
        };
        inner.finish(&ticket, Some(page));

        assert_eq!(inner.phase(), StreamPhase::Exhausted);
    }

    #[test]
    fn test_failed_fetch_is_retry_safe() {
        let mut inner = StreamInner::new();
        inner.reset_for(criteria(2));

        let ticket = inner.begin_fetch().unwrap();
        inner.finish(&ticket, Some(full_page(&["d1", "d2"], 4, "2")));

        // Next page fails; accumulated state and cursor survive
        let ticket = inner.begin_fetch().unwrap();
        assert_eq!(ticket.cursor.as_deref(), Some("2"));
        assert_eq!(inner.finish(&ticket, None), Applied::Failed);

        assert_eq!(inner.phase(), StreamPhase::Ready);
        assert_eq!(inner.dogs.len(), 2);
        let retry = inner.begin_fetch().expect("retry allowed after failure");
        assert_eq!(retry.cursor.as_deref(), Some("2"));
    }

    #[test]
    fn test_pages_accumulate_in_order() {
        let mut inner = StreamInner::new();
        inner.reset_for(criteria(2));

        let ticket = inner.begin_fetch().unwrap();
        inner.finish(&ticket, Some(full_page(&["d1", "d2"], 3, "2")));

        let ticket = inner.begin_fetch().unwrap();
        let last = FetchedPage {
            dogs: vec![dog("d3")],
            total: 3,
            next_cursor: None,
        };
        inner.finish(&ticket, Some(last));

        let ids: Vec<&str> = inner.dogs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2", "d3"]);
        assert_eq!(inner.page_count, 2);
        assert_eq!(inner.total, 3);
    }
}
