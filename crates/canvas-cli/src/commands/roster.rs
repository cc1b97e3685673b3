use std::io::Write;

use crate::cli::CourseArgs;
use crate::client::{AppContext, CliResult};
use crate::output::{render_enrollments, render_roster};

pub(crate) fn handle_roster(
    ctx: &AppContext,
    args: &CourseArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let students = ctx
        .client
        .get_students(args.course)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(course_id = args.course, students = students.len(), "fetched roster");
    render_roster(out, &students, ctx.output)
}

pub(crate) fn handle_enrollments(
    ctx: &AppContext,
    args: &CourseArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let enrollments = ctx
        .client
        .get_enrollments(args.course)
        .collect::<Result<Vec<_>, _>>()?;
    render_enrollments(out, &enrollments, ctx.output)
}
