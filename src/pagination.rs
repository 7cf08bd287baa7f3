//! Pagination accumulator.
//!
//! Drives a paged upstream operation sequentially, one round-trip at a time,
//! folding pages into a single item list. Any error aborts the whole run and
//! discards what was accumulated so far; a command never emits half a listing.

use crate::envelope::Envelope;
use crate::error::ApiError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// One page as returned by an upstream list/query call.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Empty when the upstream has no further pages.
    pub next_token: String,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: next_token.into(),
        }
    }
}

/// Parameters for one page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_token: String,
    pub page_size: Option<u32>,
}

/// A paged upstream operation.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Self::Item>, ApiError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationOptions {
    pub page_token: String,
    pub page_size: Option<u32>,
    /// Follow tokens until the upstream stops returning one.
    pub all: bool,
    /// Stop after this many pages even if a token is outstanding.
    pub max_pages: Option<usize>,
}

/// Absolute deadline shared by every round-trip of one command.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

/// Stand-in for budgets too large for the clock to represent.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        let now = Instant::now();
        let at = now
            .checked_add(budget)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self { at, budget }
    }

    /// Run `fut`, failing with [`ApiError::Timeout`] once the deadline passes.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ApiError>
    where
        F: std::future::Future<Output = Result<T, ApiError>>,
    {
        match tokio::time::timeout_at(self.at, fut).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(format!(
                "command deadline of {}s exceeded",
                self.budget.as_secs_f64()
            ))),
        }
    }
}

/// Result of a completed accumulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulated<T> {
    pub items: Vec<T>,
    pub start_token: String,
    /// Token to resume from; empty when every page was consumed.
    pub next_token: String,
    pub pages: usize,
    /// The page cap stopped the loop while a token was still outstanding.
    pub truncated: bool,
}

impl<T> Accumulated<T> {
    /// Record cursors (and a truncation warning) on `envelope`.
    pub fn annotate(&self, envelope: Envelope) -> Envelope {
        let envelope = envelope.with_pagination(self.start_token.clone(), self.next_token.clone());
        if self.truncated {
            envelope.with_warnings([format!(
                "stopped after {} page(s) at the page cap; resume with --page-token {}",
                self.pages, self.next_token
            )])
        } else {
            envelope
        }
    }
}

pub async fn accumulate<S>(
    source: &S,
    options: &PaginationOptions,
    deadline: &Deadline,
) -> Result<Accumulated<S::Item>, ApiError>
where
    S: PageSource + ?Sized,
{
    let mut items = Vec::new();
    let mut token = options.page_token.clone();
    let mut pages = 0usize;

    loop {
        let request = PageRequest {
            page_token: token.clone(),
            page_size: options.page_size,
        };
        let page = deadline.run(source.fetch_page(&request)).await?;
        pages += 1;
        debug!(
            page = pages,
            items = page.items.len(),
            has_next = !page.next_token.is_empty(),
            "Fetched page"
        );
        items.extend(page.items);
        token = page.next_token;

        if token.is_empty() || !options.all {
            return Ok(Accumulated {
                items,
                start_token: options.page_token.clone(),
                next_token: token,
                pages,
                truncated: false,
            });
        }
        if options.max_pages.is_some_and(|cap| pages >= cap) {
            return Ok(Accumulated {
                items,
                start_token: options.page_token.clone(),
                next_token: token,
                pages,
                truncated: true,
            });
        }
    }
}
