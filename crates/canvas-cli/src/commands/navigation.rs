use std::io::Write;

use canvas_client::{NavigationLink, TabUpdate};

use crate::cli::{CourseArgs, NavAddArgs, NavMoveArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_tab, render_tabs, render_tool};

pub(crate) fn handle_nav_add(
    ctx: &AppContext,
    args: &NavAddArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    url::Url::parse(&args.url)
        .map_err(|err| CliError::validation(format!("invalid link target '{}': {err}", args.url)))?;

    let link = NavigationLink {
        new_tab: args.new_tab,
        enabled_by_default: !args.hidden,
        ..NavigationLink::new(args.name.as_str(), args.url.as_str())
    };
    let tool = ctx.client.create_redirect_tool(args.course, &link)?;
    render_tool(out, &tool, ctx.output)
}

pub(crate) fn handle_nav_list(
    ctx: &AppContext,
    args: &CourseArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let tabs = ctx
        .client
        .list_tabs(args.course)
        .collect::<Result<Vec<_>, _>>()?;
    render_tabs(out, &tabs, ctx.output)
}

pub(crate) fn handle_nav_move(
    ctx: &AppContext,
    args: &NavMoveArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    if args.position == 0 {
        return Err(CliError::validation("tab positions start at 1"));
    }
    let update = TabUpdate {
        position: args.position,
        hidden: args.hidden,
    };
    let tab = ctx.client.update_tab(args.course, &args.tab, &update)?;
    render_tab(out, &tab, ctx.output)
}
