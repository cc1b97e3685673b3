use std::io::Write;

use crate::client::{AppContext, CliResult};
use crate::output::render_courses;

pub(crate) fn handle_courses(ctx: &AppContext, out: &mut dyn Write) -> CliResult<()> {
    let courses = ctx
        .client
        .list_courses()
        .collect::<Result<Vec<_>, _>>()?;
    render_courses(out, &courses, ctx.output)
}
