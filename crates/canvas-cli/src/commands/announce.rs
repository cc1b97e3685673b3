use std::io::Write;

use crate::cli::{AnnounceArgs, CourseArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::markdown::{Converter, render_file};
use crate::output::{render_announcement, render_announcements};

pub(crate) fn handle_announce(
    ctx: &AppContext,
    args: &AnnounceArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let message = match (&args.message, &args.file) {
        (Some(message), _) => message.clone(),
        (None, Some(path)) => render_file(path, Converter::from_flag(args.pandoc))?,
        (None, None) => {
            return Err(CliError::validation(
                "an announcement needs --message or --file",
            ));
        }
    };

    let announcement = if args.group {
        ctx.client
            .post_group_announcement(args.target, &args.title, &message)?
    } else {
        ctx.client
            .post_announcement(args.target, &args.title, &message)?
    };
    render_announcement(out, &announcement, ctx.output)
}

pub(crate) fn handle_announcements(
    ctx: &AppContext,
    args: &CourseArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let announcements = ctx
        .client
        .list_announcements(args.course)
        .collect::<Result<Vec<_>, _>>()?;
    render_announcements(out, &announcements, ctx.output)
}
