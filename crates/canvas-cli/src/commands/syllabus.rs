use std::io::Write;

use crate::cli::SyllabusArgs;
use crate::client::{AppContext, CliResult};
use crate::markdown::{Converter, render_file};
use crate::output::render_course;

pub(crate) fn handle_syllabus(
    ctx: &AppContext,
    args: &SyllabusArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let html = render_file(&args.file, Converter::from_flag(args.pandoc))?;
    let course = ctx.client.update_syllabus(args.course, &html)?;
    render_course(out, &course, ctx.output)
}
