//! 分页游标：把列表接口暴露为惰性、可重启的流。
//!
//! Cursor pagination over list endpoints.
//!
//! A [`Paginator`] remembers one list call (path, base parameters, per-call
//! options). Each [`Paginator::stream`] starts from the first page again and
//! fetches the next page only when its buffer is empty and the consumer polls.
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use stripe_rust::client::{RequestOptions, StripeClient};
//! use stripe_rust::resources::ChargeListOptions;
//!
//! # async fn run() -> stripe_rust::Result<()> {
//! let client = StripeClient::new("sk_test_123")?;
//! let pages = client
//!     .charges()
//!     .list_auto_paging(&ChargeListOptions::default(), RequestOptions::new())?;
//! let charges: Vec<_> = pages.stream().try_collect().await?;
//! # Ok(())
//! # }
//! ```

use crate::client::{RequestOptions, StripeClient};
use crate::codec::{FormEncode, Params};
use crate::types::{List, Object};
use crate::{BoxStream, Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::marker::PhantomData;
use tracing::debug;

pub const MAX_PAGE_SIZE: u32 = 100;

/// Cursor fields shared by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Page size, `1..=100`. The server default applies when unset.
    pub limit: Option<u32>,
    pub starting_after: Option<String>,
    pub ending_before: Option<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn starting_after(mut self, id: impl Into<String>) -> Self {
        self.starting_after = Some(id.into());
        self
    }

    pub fn ending_before(mut self, id: impl Into<String>) -> Self {
        self.ending_before = Some(id.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.starting_after.is_some() && self.ending_before.is_some() {
            return Err(Error::validation_with_context(
                "starting_after and ending_before are mutually exclusive",
                ErrorContext::new()
                    .with_field_path("starting_after")
                    .with_source("pagination"),
            ));
        }
        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_PAGE_SIZE {
                return Err(Error::validation_with_context(
                    format!("limit must be between 1 and {}", MAX_PAGE_SIZE),
                    ErrorContext::new()
                        .with_field_path("limit")
                        .with_details(limit.to_string())
                        .with_source("pagination"),
                ));
            }
        }
        Ok(())
    }

    pub fn direction(&self) -> Direction {
        if self.ending_before.is_some() {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }
}

impl FormEncode for ListOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        self.validate()?;
        params.push_opt("limit", self.limit);
        params.push_opt("starting_after", self.starting_after.as_deref());
        params.push_opt("ending_before", self.ending_before.as_deref());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Older items: next cursor is the last id, sent as `starting_after`.
    Forward,
    /// Newer items: next cursor is the first id, sent as `ending_before`.
    Backward,
}

impl Direction {
    fn cursor_param(self) -> &'static str {
        match self {
            Direction::Forward => "starting_after",
            Direction::Backward => "ending_before",
        }
    }
}

/// A restartable multi-page list call.
pub struct Paginator<T> {
    client: StripeClient,
    path: String,
    params: Params,
    direction: Direction,
    options: RequestOptions,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for Paginator<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            params: self.params.clone(),
            direction: self.direction,
            options: self.options.clone(),
            _item: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Paginator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("path", &self.path)
            .field("params", &self.params)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl<T> Paginator<T>
where
    T: Object + DeserializeOwned + Send + 'static,
{
    /// `params` is the fully encoded first-page request, cursor fields included.
    pub fn new(
        client: StripeClient,
        path: impl Into<String>,
        params: Params,
        options: RequestOptions,
    ) -> Self {
        let direction = if params.contains_key("ending_before") {
            Direction::Backward
        } else {
            Direction::Forward
        };
        Self {
            client,
            path: path.into(),
            params,
            direction,
            options,
            _item: PhantomData,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Lazily yield every item across pages, starting from the first page.
    ///
    /// The stream ends after the first error.
    pub fn stream(&self) -> BoxStream<'static, T> {
        let state = PageState {
            pager: self.clone(),
            buffer: VecDeque::new(),
            cursor: None,
            done: false,
            pages: 0,
        };
        Box::pin(futures::stream::unfold(state, |mut state| async move {
            loop {
                if let Some(item) = state.buffer.pop_front() {
                    return Some((Ok(item), state));
                }
                if state.done {
                    return None;
                }
                if let Err(e) = state.fetch().await {
                    state.done = true;
                    return Some((Err(e), state));
                }
            }
        }))
    }
}

struct PageState<T> {
    pager: Paginator<T>,
    buffer: VecDeque<T>,
    /// Id the next request continues from; `None` before the first page.
    cursor: Option<String>,
    done: bool,
    pages: u32,
}

impl<T> PageState<T>
where
    T: Object + DeserializeOwned + Send + 'static,
{
    async fn fetch(&mut self) -> Result<()> {
        let pager = &self.pager;
        let mut params = pager.params.clone();
        if let Some(cursor) = &self.cursor {
            params.set(pager.direction.cursor_param(), cursor.clone());
        }

        let page: List<T> = pager.client.get(&pager.path, &params, &pager.options).await?;
        self.pages += 1;
        debug!(
            path = pager.path.as_str(),
            page = self.pages,
            items = page.len(),
            has_more = page.has_more,
            "stripe-rust fetched list page"
        );

        if page.is_empty() && page.has_more {
            return Err(Error::pagination_with_context(
                "server returned an empty page with has_more = true",
                ErrorContext::new()
                    .with_field_path(pager.path.clone())
                    .with_source("pagination"),
            ));
        }
        if let Some(prev) = &self.cursor {
            if page.iter().any(|item| item.id() == prev) {
                return Err(Error::pagination_with_context(
                    "cursor did not advance",
                    ErrorContext::new()
                        .with_field_path(pager.path.clone())
                        .with_details(prev.clone())
                        .with_source("pagination"),
                ));
            }
        }

        let next = match pager.direction {
            Direction::Forward => page.data.last(),
            Direction::Backward => page.data.first(),
        }
        .map(|item| item.id().to_string());

        self.done = !page.has_more;
        self.cursor = next;
        self.buffer.extend(page.data);
        Ok(())
    }
}
