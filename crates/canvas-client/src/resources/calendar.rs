use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta};
use reqwest::Method;
use serde_json::json;

use crate::client::CanvasClient;
use crate::error::ClientResult;
use crate::models::{CalendarEvent, NewCalendarEvent, Record, ScheduleEntry};
use crate::pagination::Pages;

impl CanvasClient {
    /// Create an event in the calendar of a course.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the event is rejected.
    pub fn create_calendar_event(
        &self,
        course_id: u64,
        event: &NewCalendarEvent,
    ) -> ClientResult<Record> {
        let url = self.endpoint(&["api", "v1", "calendar_events"])?;
        tracing::info!(
            course_id,
            title = %event.title,
            start_at = %event.start_at,
            "creating calendar event"
        );
        self.send_json(
            Method::POST,
            url,
            &json!({
                "calendar_event": {
                    "context_code": format!("course_{course_id}"),
                    "title": event.title,
                    "description": event.description,
                    "start_at": event.start_at,
                    "end_at": event.end_at,
                }
            }),
        )
    }

    /// Events of a course, either between two dates (inclusive) or all of them.
    #[must_use]
    pub fn list_calendar_events(
        &self,
        course_id: u64,
        between: Option<(NaiveDate, NaiveDate)>,
    ) -> Pages<'_, CalendarEvent> {
        let context = format!("course_{course_id}");
        let dates = between.map(|(start, end)| (start.to_string(), end.to_string()));

        let mut query = vec![("type", "event"), ("context_codes[]", context.as_str())];
        match &dates {
            Some((start, end)) => {
                query.push(("start_date", start.as_str()));
                query.push(("end_date", end.as_str()));
            }
            None => query.push(("all_events", "true")),
        }
        Pages::new(self, self.endpoint(&["api", "v1", "calendar_events"]), &query)
    }

    /// Delete an event, recording `reason` as the cancellation reason.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the event does not exist or cannot be
    /// deleted.
    pub fn delete_calendar_event(&self, event_id: u64, reason: &str) -> ClientResult<Record> {
        let id = event_id.to_string();
        let url = self.endpoint(&["api", "v1", "calendar_events", &id])?;
        tracing::info!(event_id, reason, "deleting calendar event");
        self.delete_json(url, &[("cancel_reason", reason)])
    }
}

/// Events for a class meeting twice a week (Monday/Wednesday or
/// Tuesday/Thursday), starting at `first_class`.
///
/// Meetings alternate two and five days apart. Entries with an empty title
/// keep their slot but produce no event. Every event keeps the UTC offset of
/// `first_class`.
#[must_use]
pub fn class_schedule(
    first_class: DateTime<FixedOffset>,
    length: TimeDelta,
    entries: &[ScheduleEntry],
) -> Vec<NewCalendarEvent> {
    let mut start = first_class;
    let mut events = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if !entry.title.is_empty() {
            events.push(NewCalendarEvent {
                title: entry.title.clone(),
                description: entry.description.clone(),
                start_at: start,
                end_at: start + length,
            });
        }
        start += TimeDelta::days(if index % 2 == 0 { 2 } else { 5 });
    }
    events
}
