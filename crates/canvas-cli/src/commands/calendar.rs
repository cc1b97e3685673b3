use std::io::Write;
use std::path::Path;

use anyhow::Context;
use canvas_client::{NewCalendarEvent, ScheduleEntry, class_schedule};
use chrono::TimeDelta;

use crate::cli::{EventCreateArgs, EventDeleteArgs, EventListArgs, EventScheduleArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_event_changes, render_events, render_planned_events};

pub(crate) fn handle_event_list(
    ctx: &AppContext,
    args: &EventListArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let range = args.start.zip(args.end);
    if let Some((start, end)) = range
        && start > end
    {
        return Err(CliError::validation(format!(
            "--start {start} is after --end {end}"
        )));
    }
    let events = ctx
        .client
        .list_calendar_events(args.course, range)
        .collect::<Result<Vec<_>, _>>()?;
    render_events(out, &events, ctx.output)
}

pub(crate) fn handle_event_create(
    ctx: &AppContext,
    args: &EventCreateArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let event = NewCalendarEvent {
        title: args.title.clone(),
        description: args.description.clone(),
        start_at: args.start,
        end_at: args.start + class_length(args.minutes)?,
    };
    let created = ctx.client.create_calendar_event(args.course, &event)?;
    render_event_changes(out, "created", &[created], ctx.output)
}

pub(crate) fn handle_event_delete(
    ctx: &AppContext,
    args: &EventDeleteArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let deleted = ctx.client.delete_calendar_event(args.event, &args.reason)?;
    render_event_changes(out, "deleted", &[deleted], ctx.output)
}

/// Creates one event per titled schedule row. Stops at the first rejected
/// event; the ones already created stay.
pub(crate) fn handle_event_schedule(
    ctx: &AppContext,
    args: &EventScheduleArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let entries = read_schedule(&args.file)?;
    let events = class_schedule(args.first, class_length(args.minutes)?, &entries);
    tracing::debug!(rows = entries.len(), events = events.len(), "planned class schedule");

    if args.dry_run {
        return render_planned_events(out, &events, ctx.output);
    }

    let mut created = Vec::with_capacity(events.len());
    for event in &events {
        created.push(ctx.client.create_calendar_event(args.course, event)?);
    }
    render_event_changes(out, "created", &created, ctx.output)
}

fn class_length(minutes: u32) -> CliResult<TimeDelta> {
    if minutes == 0 {
        return Err(CliError::validation("--minutes must be at least 1"));
    }
    Ok(TimeDelta::minutes(i64::from(minutes)))
}

/// Schedule CSV with a `title,description` header.
fn read_schedule(path: &Path) -> CliResult<Vec<ScheduleEntry>> {
    let invalid = |err: anyhow::Error| CliError::validation(format!("{err:#}"));
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to read schedule {}", path.display()))
        .map_err(invalid)?;
    reader
        .deserialize()
        .collect::<Result<Vec<ScheduleEntry>, _>>()
        .with_context(|| format!("invalid schedule row in {}", path.display()))
        .map_err(invalid)
}
