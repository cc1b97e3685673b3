//! Lazy iteration over `Link`-paginated collections.

use std::iter::FusedIterator;

use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::client::CanvasClient;
use crate::error::{ClientError, ClientResult};

/// Items of a paginated collection, fetched one page at a time.
///
/// A page is requested only once the previous page's items are consumed.
/// The sequence is finite and not restartable; after yielding an error it
/// yields nothing more.
pub struct Pages<'a, T> {
    client: &'a CanvasClient,
    pending: Option<Pending>,
    buffer: std::vec::IntoIter<T>,
    pages_fetched: usize,
}

enum Pending {
    Request {
        url: Url,
        query: Vec<(String, String)>,
    },
    Failed(ClientError),
}

impl<'a, T: DeserializeOwned> Pages<'a, T> {
    pub(crate) fn new(
        client: &'a CanvasClient,
        url: ClientResult<Url>,
        query: &[(&str, &str)],
    ) -> Self {
        let pending = match url {
            Ok(url) => {
                let mut query: Vec<(String, String)> = query
                    .iter()
                    .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                    .collect();
                query.push(("per_page".to_string(), client.per_page().to_string()));
                Pending::Request { url, query }
            }
            Err(err) => Pending::Failed(err),
        };

        Self {
            client,
            pending: Some(pending),
            buffer: Vec::new().into_iter(),
            pages_fetched: 0,
        }
    }

    /// Number of pages requested so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

impl<T: DeserializeOwned> Iterator for Pages<'_, T> {
    type Item = ClientResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.next() {
                return Some(Ok(item));
            }

            let (url, query) = match self.pending.take()? {
                Pending::Request { url, query } => (url, query),
                Pending::Failed(err) => return Some(Err(err)),
            };

            let (items, next) = match self.client.fetch_page::<T>(url, &query) {
                Ok(page) => page,
                Err(err) => return Some(Err(err)),
            };
            self.pages_fetched += 1;
            debug!(
                page = self.pages_fetched,
                items = items.len(),
                has_next = next.is_some(),
                "fetched page"
            );

            self.pending = next.map(|link| match self.client.check_page_link(link) {
                Ok(url) => Pending::Request {
                    url,
                    query: Vec::new(),
                },
                Err(err) => Pending::Failed(err),
            });
            self.buffer = items.into_iter();
        }
    }
}

impl<T: DeserializeOwned> FusedIterator for Pages<'_, T> {}

/// Extract the `rel="next"` target from one or more `Link` headers.
///
/// Relative targets resolve against `current`, the URL of the page just read.
pub(crate) fn next_link(headers: &HeaderMap, current: &Url) -> Option<Url> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split('<').skip(1))
        .find_map(|entry| {
            let (target, params) = entry.split_once('>')?;
            if !has_next_relation(params) {
                return None;
            }
            current.join(target.trim()).ok()
        })
}

fn has_next_relation(params: &str) -> bool {
    params
        .split(';')
        .filter_map(|param| param.split_once('='))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case("rel"))
        .any(|(_, value)| {
            value
                .trim()
                .trim_end_matches(',')
                .trim()
                .trim_matches('"')
                .split_whitespace()
                .any(|relation| relation.eq_ignore_ascii_case("next"))
        })
}
