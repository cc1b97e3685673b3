//! Command handlers grouped by resource.

pub(crate) mod announce;
pub(crate) mod api;
pub(crate) mod calendar;
pub(crate) mod courses;
pub(crate) mod navigation;
pub(crate) mod pages;
pub(crate) mod roster;
pub(crate) mod settings;
pub(crate) mod syllabus;
