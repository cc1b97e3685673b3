use reqwest::Method;
use serde_json::json;

use crate::client::CanvasClient;
use crate::error::ClientResult;
use crate::models::{Page, PageDraft};
use crate::pagination::Pages;

impl CanvasClient {
    /// Wiki pages of a course (bodies omitted by the server).
    #[must_use]
    pub fn list_pages(&self, course_id: u64) -> Pages<'_, Page> {
        let id = course_id.to_string();
        Pages::new(
            self,
            self.endpoint(&["api", "v1", "courses", &id, "pages"]),
            &[],
        )
    }

    /// A single page by URL slug or numeric id.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the page does not exist.
    pub fn get_page(&self, course_id: u64, page_url: &str) -> ClientResult<Page> {
        let id = course_id.to_string();
        let url = self.endpoint(&["api", "v1", "courses", &id, "pages", page_url])?;
        self.get_json(url, &[])
    }

    /// Create a page from an HTML draft.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the page cannot be created.
    pub fn create_page(&self, course_id: u64, draft: &PageDraft) -> ClientResult<Page> {
        let id = course_id.to_string();
        let url = self.endpoint(&["api", "v1", "courses", &id, "pages"])?;
        tracing::info!(course_id, title = %draft.title, "creating page");
        self.send_json(Method::POST, url, &json!({ "wiki_page": draft }))
    }

    /// Overwrite title, body and publication state of an existing page.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the page cannot be updated.
    pub fn update_page(
        &self,
        course_id: u64,
        page_url: &str,
        draft: &PageDraft,
    ) -> ClientResult<Page> {
        let id = course_id.to_string();
        let url = self.endpoint(&["api", "v1", "courses", &id, "pages", page_url])?;
        tracing::info!(course_id, page = page_url, "updating page");
        self.send_json(Method::PUT, url, &json!({ "wiki_page": draft }))
    }
}
