#![forbid(unsafe_code)]
#![deny(unused_must_use, rustdoc::broken_intra_doc_links, missing_docs)]

//! Authenticated client for the Canvas LMS REST API.
//!
//! Layout:
//! - `token.rs`: access token loading from the credential file
//! - `client.rs`: `CanvasClient`, request plumbing and status handling
//! - `pagination.rs`: lazy `Link`-header page iteration
//! - `models.rs`: typed views of the resources the tools consume
//! - `resources/`: course, user, announcement, calendar, navigation and page
//!   operations, as inherent methods on `CanvasClient`
//! - `error.rs`: `ClientError` and its configuration/remote classification

pub mod client;
pub mod error;
pub mod models;
pub mod pagination;
mod resources;
pub mod token;

pub use client::{CanvasClient, ClientConfig, DEFAULT_PER_PAGE, parse_base_url};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use models::{
    Announcement, CalendarEvent, Course, Enrollment, EnrollmentUser, NavigationLink,
    NewAnnouncement, NewCalendarEvent, Page, PageDraft, Record, ScheduleEntry, Student, Tab,
    TabUpdate,
};
pub use pagination::Pages;
pub use resources::class_schedule;
pub use token::{AccessToken, DEFAULT_TOKEN_PATH, default_token_path, read_access_token};
