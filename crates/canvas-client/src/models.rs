//! Typed views of Canvas resources and request payloads.
//!
//! Each view carries only the fields the tools read. Unknown fields are
//! ignored so that additions to the remote schema never break decoding.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Untyped resource: field name to value, exactly as returned by the API.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A user enrolled as a student in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Canvas user id.
    pub id: u64,
    /// Display name.
    pub name: Option<String>,
    /// "Last, First" form used by gradebooks.
    pub sortable_name: Option<String>,
    /// Institution-assigned id, when visible to the caller.
    pub sis_user_id: Option<String>,
    /// Login handle, when visible to the caller.
    pub login_id: Option<String>,
    /// Primary email, when visible to the caller.
    pub email: Option<String>,
}

impl Student {
    /// Best available name for listings.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.sortable_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("")
    }
}

/// Enrollment of a user in a course section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Enrollment id.
    pub id: u64,
    /// Enrolled user id.
    pub user_id: u64,
    /// Enrollment type, e.g. `StudentEnrollment`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `active`, `invited`, `completed`, ...
    pub enrollment_state: Option<String>,
    /// Section the enrollment belongs to.
    pub course_section_id: Option<u64>,
    /// Embedded user summary.
    pub user: Option<EnrollmentUser>,
}

/// User summary embedded in an [`Enrollment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentUser {
    /// Canvas user id.
    pub id: u64,
    /// Display name.
    pub name: Option<String>,
    /// "Last, First" name.
    pub sortable_name: Option<String>,
}

/// A course visible to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course id.
    pub id: u64,
    /// Full course name.
    pub name: Option<String>,
    /// Short course code.
    pub course_code: Option<String>,
    /// `unpublished`, `available`, `completed`, `deleted`.
    pub workflow_state: Option<String>,
    /// Course start, when set.
    pub start_at: Option<DateTime<Utc>>,
    /// Syllabus HTML, present only when requested or just updated.
    pub syllabus_body: Option<String>,
}

/// An announcement (a discussion topic flagged as announcement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Topic id.
    pub id: u64,
    /// Title as stored by the server.
    pub title: String,
    /// HTML body as stored by the server.
    pub message: Option<String>,
    /// Link to the announcement in the web UI.
    pub html_url: Option<String>,
    /// Publication time.
    pub posted_at: Option<DateTime<Utc>>,
}

/// Body of an announcement creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAnnouncement<'a> {
    /// Title, sent verbatim.
    pub title: &'a str,
    /// HTML or plain-text message, sent verbatim.
    pub message: &'a str,
    /// Always `true`; turns the discussion topic into an announcement.
    pub is_announcement: bool,
}

impl<'a> NewAnnouncement<'a> {
    /// Build an announcement body from title and message.
    #[must_use]
    pub const fn new(title: &'a str, message: &'a str) -> Self {
        Self {
            title,
            message,
            is_announcement: true,
        }
    }
}

/// Options for a course navigation link backed by a redirect tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationLink {
    /// Label shown in the course navigation.
    pub name: String,
    /// Destination of the redirect.
    pub url: String,
    /// Open the destination in a new browser tab.
    pub new_tab: bool,
    /// Show the entry in the navigation without instructor action.
    pub enabled_by_default: bool,
}

impl NavigationLink {
    /// Link with default options: same tab, visible by default.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            new_tab: false,
            enabled_by_default: true,
        }
    }
}

/// A course navigation tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Tab id, e.g. `home` or `context_external_tool_12`.
    pub id: String,
    /// Label shown in the navigation.
    pub label: String,
    /// `internal` or `external`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Link to the tab target.
    pub html_url: Option<String>,
    /// 1-based position in the navigation.
    pub position: Option<u32>,
    /// Whether the tab is hidden from students.
    pub hidden: Option<bool>,
    /// `public`, `members`, `admins` or `none`.
    pub visibility: Option<String>,
}

/// Changes applied to a navigation tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabUpdate {
    /// New 1-based position.
    pub position: u32,
    /// Hide the tab from students.
    pub hidden: bool,
}

/// A course wiki page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Numeric page id.
    pub page_id: Option<u64>,
    /// URL slug identifying the page within the course.
    pub url: String,
    /// Page title.
    pub title: String,
    /// HTML body, present on single-page fetches.
    pub body: Option<String>,
    /// Publication state.
    pub published: Option<bool>,
    /// Last modification time.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Title, HTML body and publication state for creating or updating a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDraft {
    /// Page title.
    pub title: String,
    /// HTML body.
    pub body: String,
    /// Publish immediately.
    pub published: bool,
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Event id.
    pub id: u64,
    /// Event title.
    pub title: Option<String>,
    /// HTML description.
    pub description: Option<String>,
    /// Start time.
    pub start_at: Option<DateTime<Utc>>,
    /// End time.
    pub end_at: Option<DateTime<Utc>>,
    /// Owning context, e.g. `course_12`.
    pub context_code: Option<String>,
    /// `active`, `locked` or `deleted`.
    pub workflow_state: Option<String>,
}

/// Title, description and time span of an event to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCalendarEvent {
    /// Event title.
    pub title: String,
    /// Event description, sent verbatim.
    pub description: String,
    /// Start time with the offset it was given in.
    pub start_at: DateTime<FixedOffset>,
    /// End time.
    pub end_at: DateTime<FixedOffset>,
}

/// One row of a class schedule: a title and its description.
///
/// An empty title marks a day without class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleEntry {
    /// Event title; empty to skip the day.
    pub title: String,
    /// Event description.
    #[serde(default)]
    pub description: String,
}
