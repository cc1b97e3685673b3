//! Output renderers and formatting helpers for CLI commands.

use std::io::{self, Write};

use anyhow::anyhow;
use canvas_client::{
    Announcement, CalendarEvent, Course, Enrollment, NewCalendarEvent, Page, Record, Student, Tab,
};
use serde_json::Value;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Gradebook import header, in column order.
pub(crate) const ROSTER_HEADER: [&str; 4] = ["Student", "ID", "SIS User ID", "Section"];

fn write_failure(err: io::Error) -> CliError {
    CliError::failure(anyhow!("failed to write output: {err}"))
}

pub(crate) fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    writeln!(out, "{text}").map_err(write_failure)
}

fn render<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&mut dyn Write) -> io::Result<()>,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => write_json(out, value),
        OutputFormat::Text => text(out).map_err(write_failure),
    }
}

/// A field of a pass-through record as text; `-` when missing or null.
fn field(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Students as gradebook CSV: name, id, SIS id when known, empty section.
pub(crate) fn write_roster_csv(out: &mut dyn Write, students: &[Student]) -> CliResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    let csv_failure = |err: csv::Error| CliError::failure(anyhow!("failed to write CSV: {err}"));

    writer.write_record(ROSTER_HEADER).map_err(csv_failure)?;
    for student in students {
        let id = student.id.to_string();
        writer
            .write_record([
                student.display_name(),
                id.as_str(),
                student.sis_user_id.as_deref().unwrap_or_default(),
                "",
            ])
            .map_err(csv_failure)?;
    }
    writer.flush().map_err(write_failure)
}

pub(crate) fn render_roster(
    out: &mut dyn Write,
    students: &[Student],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => write_json(out, students),
        OutputFormat::Text => write_roster_csv(out, students),
    }
}

pub(crate) fn render_enrollments(
    out: &mut dyn Write,
    enrollments: &[Enrollment],
    format: OutputFormat,
) -> CliResult<()> {
    render(out, format, enrollments, |out| {
        writeln!(out, "{:<10} {:<10} {:<20} {:<10} NAME", "ID", "USER", "TYPE", "STATE")?;
        for enrollment in enrollments {
            let name = enrollment
                .user
                .as_ref()
                .and_then(|user| user.sortable_name.as_deref().or(user.name.as_deref()))
                .unwrap_or("-");
            writeln!(
                out,
                "{:<10} {:<10} {:<20} {:<10} {}",
                enrollment.id,
                enrollment.user_id,
                enrollment.kind.as_deref().unwrap_or("-"),
                enrollment.enrollment_state.as_deref().unwrap_or("-"),
                name
            )?;
        }
        Ok(())
    })
}

pub(crate) fn render_courses(
    out: &mut dyn Write,
    courses: &[Course],
    format: OutputFormat,
) -> CliResult<()> {
    render(out, format, courses, |out| {
        writeln!(out, "{:<10} {:<20} {:<12} NAME", "ID", "CODE", "STATE")?;
        for course in courses {
            writeln!(
                out,
                "{:<10} {:<20} {:<12} {}",
                course.id,
                course.course_code.as_deref().unwrap_or("-"),
                course.workflow_state.as_deref().unwrap_or("-"),
                course.name.as_deref().unwrap_or("<unnamed>")
            )?;
        }
        Ok(())
    })
}

pub(crate) fn render_course(
    out: &mut dyn Write,
    course: &Course,
    format: OutputFormat,
) -> CliResult<()> {
    render(out, format, course, |out| {
        writeln!(
            out,
            "syllabus updated for course {} ({})",
            course.id,
            course.name.as_deref().unwrap_or("<unnamed>")
        )
    })
}

pub(crate) fn render_announcement(
    out: &mut dyn Write,
    announcement: &Record,
    format: OutputFormat,
) -> CliResult<()> {
    render(out, format, announcement, |out| {
        writeln!(
            out,
            "posted announcement {}: {}",
            field(announcement, "id"),
            field(announcement, "title")
        )?;
        if let Some(Value::String(url)) = announcement.get("html_url") {
            writeln!(out, "url: {url}")?;
        }
        Ok(())
    })
}

pub(crate) fn render_announcements(
    out: &mut dyn Write,
    announcements: &[Announcement],
    format: OutputFormat,
) -> CliResult<()> {
    render(out, format, announcements, |out| {
        writeln!(out, "{:<10} {:<20} TITLE", "ID", "POSTED")?;
        for announcement in announcements {
            let posted = announcement
                .posted_at
                .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
            writeln!(out, "{:<10} {:<20} {}", announcement.id, posted, announcement.title)?;
        }
        Ok(())
    })
}

pub(crate) fn render_tool(
    out: &mut dyn Write,
    tool: &Record,
    format: OutputFormat,
) -> CliResult<()> {
    render(out, format, tool, |out| {
        writeln!(
            out,
            "created external tool {}: {}",
            field(tool, "id"),
            field(tool, "name")
        )
    })
}

pub(crate) fn render_tabs(out: &mut dyn Write, tabs: &[Tab], format: OutputFormat) -> CliResult<()> {
    render(out, format, tabs, |out| {
        writeln!(out, "{:>4} {:<36} {:<8} LABEL", "POS", "ID", "HIDDEN")?;
        for tab in tabs {
            let position = tab
                .position
                .map_or_else(|| "-".to_string(), |position| position.to_string());
            writeln!(
                out,
                "{:>4} {:<36} {:<8} {}",
                position,
                tab.id,
                tab.hidden.unwrap_or(false),
                tab.label
            )?;
        }
        Ok(())
    })
}

pub(crate) fn render_tab(out: &mut dyn Write, tab: &Tab, format: OutputFormat) -> CliResult<()> {
    render(out, format, tab, |out| {
        let position = tab
            .position
            .map_or_else(|| "-".to_string(), |position| position.to_string());
        writeln!(
            out,
            "tab {} ({}) now at position {}, hidden: {}",
            tab.id,
            tab.label,
            position,
            tab.hidden.unwrap_or(false)
        )
    })
}

pub(crate) fn render_pages(
    out: &mut dyn Write,
    pages: &[Page],
    format: OutputFormat,
) -> CliResult<()> {
    render(out, format, pages, |out| {
        writeln!(out, "{:<32} {:<10} TITLE", "URL", "PUBLISHED")?;
        for page in pages {
            let published = page
                .published
                .map_or_else(|| "-".to_string(), |published| published.to_string());
            writeln!(out, "{:<32} {:<10} {}", page.url, published, page.title)?;
        }
        Ok(())
    })
}

pub(crate) fn render_page(out: &mut dyn Write, page: &Page, format: OutputFormat) -> CliResult<()> {
    render(out, format, page, |out| {
        writeln!(out, "title: {}", page.title)?;
        writeln!(out, "url: {}", page.url)?;
        if let Some(published) = page.published {
            writeln!(out, "published: {published}")?;
        }
        if let Some(updated_at) = page.updated_at {
            writeln!(out, "updated: {updated_at}")?;
        }
        if let Some(body) = &page.body {
            writeln!(out)?;
            writeln!(out, "{body}")?;
        }
        Ok(())
    })
}

pub(crate) fn render_course_settings(
    out: &mut dyn Write,
    course: &Record,
    keys: &[String],
    format: OutputFormat,
) -> CliResult<()> {
    render(out, format, course, |out| {
        writeln!(
            out,
            "updated course {} ({})",
            field(course, "id"),
            field(course, "name")
        )?;
        for key in keys {
            writeln!(out, "{key}: {}", field(course, key))?;
        }
        Ok(())
    })
}

pub(crate) fn render_events(
    out: &mut dyn Write,
    events: &[CalendarEvent],
    format: OutputFormat,
) -> CliResult<()> {
    let when = |at: Option<DateTime<Utc>>| {
        at.map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string())
    };
    render(out, format, events, |out| {
        writeln!(out, "{:<10} {:<17} {:<17} TITLE", "ID", "START", "END")?;
        for event in events {
            writeln!(
                out,
                "{:<10} {:<17} {:<17} {}",
                event.id,
                when(event.start_at),
                when(event.end_at),
                event.title.as_deref().unwrap_or("<untitled>")
            )?;
        }
        Ok(())
    })
}

/// Created or deleted events: one line each, or a JSON array of the records.
pub(crate) fn render_event_changes(
    out: &mut dyn Write,
    verb: &str,
    events: &[Record],
    format: OutputFormat,
) -> CliResult<()> {
    render(out, format, events, |out| {
        for event in events {
            writeln!(
                out,
                "{verb} event {}: {} ({})",
                field(event, "id"),
                field(event, "title"),
                field(event, "start_at")
            )?;
        }
        Ok(())
    })
}

pub(crate) fn render_planned_events(
    out: &mut dyn Write,
    events: &[NewCalendarEvent],
    format: OutputFormat,
) -> CliResult<()> {
    render(out, format, events, |out| {
        for event in events {
            writeln!(
                out,
                "would create {} to {}: {}",
                event.start_at.to_rfc3339(),
                event.end_at.to_rfc3339(),
                event.title
            )?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use canvas_test_support::fixtures::student;
    use serde_json::json;

    fn students(values: serde_json::Value) -> Result<Vec<Student>> {
        Ok(serde_json::from_value(values)?)
    }

    #[test]
    fn roster_csv_matches_gradebook_layout() -> Result<()> {
        let roster = students(json!([student(1, "Doe, Jane"), student(2, "Roe, Sam")]))?;
        let mut out = Vec::new();
        write_roster_csv(&mut out, &roster)?;

        assert_eq!(
            String::from_utf8(out)?,
            "Student,ID,SIS User ID,Section\n\"Doe, Jane\",1,,\n\"Roe, Sam\",2,,\n"
        );
        Ok(())
    }

    #[test]
    fn roster_csv_includes_sis_id_and_falls_back_to_name() -> Result<()> {
        let roster = students(json!([
            {"id": 5, "name": "Ann Lee", "sis_user_id": "S-005"},
            {"id": 6}
        ]))?;
        let mut out = Vec::new();
        write_roster_csv(&mut out, &roster)?;

        let text = String::from_utf8(out)?;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[1], "Ann Lee,5,S-005,");
        assert_eq!(lines[2], ",6,,");
        Ok(())
    }

    #[test]
    fn empty_roster_prints_header_only() -> Result<()> {
        let mut out = Vec::new();
        render_roster(&mut out, &[], OutputFormat::Text)?;
        assert_eq!(String::from_utf8(out)?, "Student,ID,SIS User ID,Section\n");
        Ok(())
    }

    #[test]
    fn json_output_serializes_models() -> Result<()> {
        let tabs: Vec<Tab> = serde_json::from_value(json!([
            {"id": "home", "label": "Home", "position": 1, "hidden": false, "type": "internal"}
        ]))?;
        let mut out = Vec::new();
        render_tabs(&mut out, &tabs, OutputFormat::Json)?;

        let echoed: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(echoed[0]["id"], "home");
        assert_eq!(echoed[0]["position"], 1);
        Ok(())
    }

    #[test]
    fn record_fields_render_plain_text() -> Result<()> {
        let Value::Object(record) = json!({"id": 7, "title": "Quiz", "html_url": null}) else {
            anyhow::bail!("fixture is an object");
        };
        assert_eq!(field(&record, "id"), "7");
        assert_eq!(field(&record, "title"), "Quiz");
        assert_eq!(field(&record, "html_url"), "-");
        assert_eq!(field(&record, "missing"), "-");
        Ok(())
    }

    #[test]
    fn tab_table_lists_positions() -> Result<()> {
        let tabs: Vec<Tab> = serde_json::from_value(json!([
            {"id": "context_external_tool_9", "label": "Zoom", "position": 4, "hidden": true}
        ]))?;
        let mut out = Vec::new();
        render_tabs(&mut out, &tabs, OutputFormat::Text)?;

        let text = String::from_utf8(out)?;
        let row = text.lines().nth(1).unwrap_or_default();
        assert!(row.trim_start().starts_with('4'));
        assert!(row.contains("context_external_tool_9"));
        assert!(row.ends_with("Zoom"));
        Ok(())
    }
}
