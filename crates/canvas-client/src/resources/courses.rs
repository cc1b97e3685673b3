use reqwest::Method;
use serde_json::json;

use crate::client::CanvasClient;
use crate::error::ClientResult;
use crate::models::{Course, Record};
use crate::pagination::Pages;

impl CanvasClient {
    /// Courses of the current user.
    #[must_use]
    pub fn list_courses(&self) -> Pages<'_, Course> {
        Pages::new(self, self.endpoint(&["api", "v1", "courses"]), &[])
    }

    /// A single course, including its syllabus body.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the course cannot be fetched.
    pub fn get_course(&self, course_id: u64) -> ClientResult<Course> {
        let id = course_id.to_string();
        let url = self.endpoint(&["api", "v1", "courses", &id])?;
        self.get_json(url, &[("include[]", "syllabus_body")])
    }

    /// Replace the course syllabus with `html`.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the update is rejected.
    pub fn update_syllabus(&self, course_id: u64, html: &str) -> ClientResult<Course> {
        let id = course_id.to_string();
        let url = self.endpoint(&["api", "v1", "courses", &id])?;
        tracing::info!(course_id, bytes = html.len(), "updating syllabus");
        self.send_json(
            Method::PUT,
            url,
            &json!({ "course": { "syllabus_body": html } }),
        )
    }

    /// Set course attributes such as `default_view` or `hide_final_grades`.
    ///
    /// Each entry of `settings` is sent as `course[<key>]`. The updated course
    /// comes back as the server returned it.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the update is rejected.
    pub fn update_course_settings(
        &self,
        course_id: u64,
        settings: &Record,
    ) -> ClientResult<Record> {
        let id = course_id.to_string();
        let url = self.endpoint(&["api", "v1", "courses", &id])?;
        let keys: Vec<&str> = settings.keys().map(String::as_str).collect();
        tracing::info!(course_id, keys = ?keys, "updating course settings");
        self.send_json(Method::PUT, url, &json!({ "course": settings }))
    }
}
