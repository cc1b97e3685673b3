//! Resource operations, one module per Canvas API area.
//!
//! Each module extends [`CanvasClient`](crate::CanvasClient) with the calls
//! for its area; there is nothing to import beyond the client itself.

mod announcements;
mod calendar;
mod courses;
mod navigation;
mod pages;
mod users;

pub use calendar::class_schedule;
