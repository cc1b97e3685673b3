use reqwest::Method;

use crate::client::CanvasClient;
use crate::error::ClientResult;
use crate::models::{Announcement, NewAnnouncement, Record};
use crate::pagination::Pages;

impl CanvasClient {
    /// Post an announcement to a course.
    ///
    /// `title` and `message` are sent exactly as given; `message` is taken
    /// to be HTML. Returns the created topic exactly as the server echoed it.
    /// Not idempotent: repeating the call posts a duplicate.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the server rejects the post.
    pub fn post_announcement(
        &self,
        course_id: u64,
        title: &str,
        message: &str,
    ) -> ClientResult<Record> {
        let id = course_id.to_string();
        let url = self.endpoint(&["api", "v1", "courses", &id, "discussion_topics"])?;
        tracing::info!(course_id, title, "posting announcement");
        self.send_json(Method::POST, url, &NewAnnouncement::new(title, message))
    }

    /// Post an announcement to a group.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the server rejects the post.
    pub fn post_group_announcement(
        &self,
        group_id: u64,
        title: &str,
        message: &str,
    ) -> ClientResult<Record> {
        let id = group_id.to_string();
        let url = self.endpoint(&["api", "v1", "groups", &id, "discussion_topics"])?;
        tracing::info!(group_id, title, "posting group announcement");
        self.send_json(Method::POST, url, &NewAnnouncement::new(title, message))
    }

    /// Announcements of a course, newest first.
    #[must_use]
    pub fn list_announcements(&self, course_id: u64) -> Pages<'_, Announcement> {
        let context = format!("course_{course_id}");
        Pages::new(
            self,
            self.endpoint(&["api", "v1", "announcements"]),
            &[("context_codes[]", context.as_str())],
        )
    }
}
