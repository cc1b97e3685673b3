//! Argument parsing and command dispatch for the `canvas` binary.

use std::io::{self, Write};
use std::path::PathBuf;

use canvas_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use chrono::{DateTime, FixedOffset, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::announce::{handle_announce, handle_announcements};
use crate::commands::api::handle_api_get;
use crate::commands::calendar::{
    handle_event_create, handle_event_delete, handle_event_list, handle_event_schedule,
};
use crate::commands::courses::handle_courses;
use crate::commands::navigation::{handle_nav_add, handle_nav_list, handle_nav_move};
use crate::commands::pages::{handle_page_create, handle_page_list, handle_page_show, handle_page_update};
use crate::commands::roster::{handle_enrollments, handle_roster};
use crate::commands::settings::handle_settings_set;
use crate::commands::syllabus::handle_syllabus;

/// Parses CLI arguments, executes the requested command, and reports
/// failures on stderr. Returns the process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);

    if let Err(err) = init_logging(&LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
    }) {
        eprintln!("warning: {err:#}");
    }

    let result = AppContext::from_cli(&cli).and_then(|ctx| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        dispatch(&ctx, cli.command, &mut out)?;
        out.flush()
            .map_err(|err| CliError::failure(anyhow::anyhow!("failed to flush stdout: {err}")))
    });

    match result {
        Ok(()) => {
            tracing::debug!(command = command_name, "command completed");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            tracing::debug!(command = command_name, exit_code, "command failed");
            eprintln!("error: {}", err.display_message());
            exit_code
        }
    }
}

pub(crate) fn dispatch(ctx: &AppContext, command: Command, out: &mut dyn Write) -> CliResult<()> {
    match command {
        Command::Roster(args) => handle_roster(ctx, &args, out),
        Command::Enrollments(args) => handle_enrollments(ctx, &args, out),
        Command::Courses => handle_courses(ctx, out),
        Command::Announce(args) => handle_announce(ctx, &args, out),
        Command::Announcements(args) => handle_announcements(ctx, &args, out),
        Command::Syllabus(args) => handle_syllabus(ctx, &args, out),
        Command::Nav(nav) => match nav {
            NavCommand::Add(args) => handle_nav_add(ctx, &args, out),
            NavCommand::List(args) => handle_nav_list(ctx, &args, out),
            NavCommand::Move(args) => handle_nav_move(ctx, &args, out),
        },
        Command::Pages(pages) => match pages {
            PagesCommand::List(args) => handle_page_list(ctx, &args, out),
            PagesCommand::Show(args) => handle_page_show(ctx, &args, out),
            PagesCommand::Create(args) => handle_page_create(ctx, &args, out),
            PagesCommand::Update(args) => handle_page_update(ctx, &args, out),
        },
        Command::Events(events) => match events {
            EventsCommand::List(args) => handle_event_list(ctx, &args, out),
            EventsCommand::Create(args) => handle_event_create(ctx, &args, out),
            EventsCommand::Delete(args) => handle_event_delete(ctx, &args, out),
            EventsCommand::Schedule(args) => handle_event_schedule(ctx, &args, out),
        },
        Command::Settings(SettingsCommand::Set(args)) => handle_settings_set(ctx, &args, out),
        Command::Api(ApiCommand::Get(args)) => handle_api_get(ctx, &args, out),
    }
}

#[derive(Parser)]
#[command(
    name = "canvas",
    version,
    about = "Administrative tools for Canvas LMS courses"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "CANVAS_BASE_URL",
        value_parser = parse_url,
        help = "Base URL of the Canvas server, e.g. https://canvas.example.edu"
    )]
    pub(crate) base_url: Option<Url>,
    #[arg(
        long,
        global = true,
        env = "CANVAS_TOKEN",
        hide_env_values = true,
        help = "Access token; takes precedence over --token-file"
    )]
    pub(crate) token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "CANVAS_TOKEN_FILE",
        help = "File holding the access token [default: ~/.canvas/access_token]"
    )]
    pub(crate) token_file: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "CANVAS_HTTP_TIMEOUT_SECS",
        help = "Request timeout in seconds"
    )]
    pub(crate) timeout: Option<u64>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, env = "CANVAS_LOG", default_value = DEFAULT_LOG_LEVEL)]
    pub(crate) log_level: String,
    #[arg(long, global = true, env = "CANVAS_LOG_FORMAT", default_value = "pretty")]
    pub(crate) log_format: LogFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the student roster of a course as gradebook CSV.
    Roster(CourseArgs),
    /// List every enrollment of a course.
    Enrollments(CourseArgs),
    /// List the courses visible to the token owner.
    Courses,
    /// Post an announcement to a course or group.
    Announce(AnnounceArgs),
    /// List the announcements of a course.
    Announcements(CourseArgs),
    /// Replace the syllabus of a course with a markdown document.
    Syllabus(SyllabusArgs),
    /// Manage course navigation entries.
    #[command(subcommand)]
    Nav(NavCommand),
    /// Manage course wiki pages.
    #[command(subcommand)]
    Pages(PagesCommand),
    /// Manage course calendar events.
    #[command(subcommand)]
    Events(EventsCommand),
    /// Change course settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Raw access to API endpoints.
    #[command(subcommand)]
    Api(ApiCommand),
}

#[derive(Subcommand)]
pub(crate) enum NavCommand {
    /// Add a navigation entry redirecting to an external URL.
    Add(NavAddArgs),
    /// List navigation tabs, external tools included.
    List(CourseArgs),
    /// Move or hide a navigation tab.
    Move(NavMoveArgs),
}

#[derive(Subcommand)]
pub(crate) enum PagesCommand {
    /// List the wiki pages of a course.
    List(CourseArgs),
    /// Print a page with its body.
    Show(PageShowArgs),
    /// Create a page from a markdown file.
    Create(PageCreateArgs),
    /// Replace the title and body of an existing page.
    Update(PageUpdateArgs),
}

#[derive(Subcommand)]
pub(crate) enum EventsCommand {
    /// List the events of a course calendar.
    List(EventListArgs),
    /// Create a single event.
    Create(EventCreateArgs),
    /// Delete an event.
    Delete(EventDeleteArgs),
    /// Create the class meetings of a term from a CSV schedule.
    Schedule(EventScheduleArgs),
}

#[derive(Subcommand)]
pub(crate) enum SettingsCommand {
    /// Set course attributes, e.g. `default_view=syllabus`.
    Set(SettingsSetArgs),
}

#[derive(Subcommand)]
pub(crate) enum ApiCommand {
    /// GET an endpoint and print the returned records as JSON.
    Get(ApiGetArgs),
}

#[derive(Args)]
pub(crate) struct CourseArgs {
    #[arg(help = "Course identifier")]
    pub(crate) course: u64,
}

#[derive(Args)]
pub(crate) struct AnnounceArgs {
    #[arg(help = "Course identifier, or group identifier with --group")]
    pub(crate) target: u64,
    #[arg(long)]
    pub(crate) title: String,
    #[arg(
        long,
        conflicts_with = "file",
        required_unless_present = "file",
        help = "Message body, sent as HTML"
    )]
    pub(crate) message: Option<String>,
    #[arg(long, help = "Markdown file converted to HTML for the message body")]
    pub(crate) file: Option<PathBuf>,
    #[arg(long, help = "Post to a group instead of a course")]
    pub(crate) group: bool,
    #[arg(long, help = "Convert markdown with pandoc when available")]
    pub(crate) pandoc: bool,
}

#[derive(Args)]
pub(crate) struct SyllabusArgs {
    #[arg(help = "Course identifier")]
    pub(crate) course: u64,
    #[arg(long, help = "Markdown file with the syllabus")]
    pub(crate) file: PathBuf,
    #[arg(long, help = "Convert markdown with pandoc when available")]
    pub(crate) pandoc: bool,
}

#[derive(Args)]
pub(crate) struct NavAddArgs {
    #[arg(help = "Course identifier")]
    pub(crate) course: u64,
    #[arg(long, help = "Label shown in the course navigation")]
    pub(crate) name: String,
    #[arg(long, help = "Redirect target")]
    pub(crate) url: String,
    #[arg(long, help = "Open the target in a new browser tab")]
    pub(crate) new_tab: bool,
    #[arg(long, help = "Keep the entry hidden from students")]
    pub(crate) hidden: bool,
}

#[derive(Args)]
pub(crate) struct NavMoveArgs {
    #[arg(help = "Course identifier")]
    pub(crate) course: u64,
    #[arg(help = "Tab identifier as reported by `nav list`")]
    pub(crate) tab: String,
    #[arg(long, help = "New 1-based position")]
    pub(crate) position: u32,
    #[arg(long)]
    pub(crate) hidden: bool,
}

#[derive(Args)]
pub(crate) struct PageShowArgs {
    #[arg(help = "Course identifier")]
    pub(crate) course: u64,
    #[arg(help = "Page URL slug")]
    pub(crate) page: String,
}

#[derive(Args)]
pub(crate) struct PageSourceArgs {
    #[arg(long)]
    pub(crate) title: String,
    #[arg(long, help = "Markdown file with the page body")]
    pub(crate) file: PathBuf,
    #[arg(long, help = "Leave the page unpublished")]
    pub(crate) draft: bool,
    #[arg(long, help = "Convert markdown with pandoc when available")]
    pub(crate) pandoc: bool,
}

#[derive(Args)]
pub(crate) struct PageCreateArgs {
    #[arg(help = "Course identifier")]
    pub(crate) course: u64,
    #[command(flatten)]
    pub(crate) source: PageSourceArgs,
}

#[derive(Args)]
pub(crate) struct PageUpdateArgs {
    #[arg(help = "Course identifier")]
    pub(crate) course: u64,
    #[arg(help = "Page URL slug")]
    pub(crate) page: String,
    #[command(flatten)]
    pub(crate) source: PageSourceArgs,
}

#[derive(Args)]
pub(crate) struct EventListArgs {
    #[arg(help = "Course identifier")]
    pub(crate) course: u64,
    #[arg(long, requires = "end", value_parser = parse_date, help = "First day, YYYY-MM-DD")]
    pub(crate) start: Option<NaiveDate>,
    #[arg(long, requires = "start", value_parser = parse_date, help = "Last day, YYYY-MM-DD")]
    pub(crate) end: Option<NaiveDate>,
}

#[derive(Args)]
pub(crate) struct EventCreateArgs {
    #[arg(help = "Course identifier")]
    pub(crate) course: u64,
    #[arg(long)]
    pub(crate) title: String,
    #[arg(long, default_value = "")]
    pub(crate) description: String,
    #[arg(long, value_parser = parse_timestamp, help = "Start time, RFC 3339 with offset")]
    pub(crate) start: DateTime<FixedOffset>,
    #[arg(long, help = "Length in minutes")]
    pub(crate) minutes: u32,
}

#[derive(Args)]
pub(crate) struct EventDeleteArgs {
    #[arg(help = "Event identifier")]
    pub(crate) event: u64,
    #[arg(long, default_value = "no reason", help = "Cancellation reason shown to students")]
    pub(crate) reason: String,
}

#[derive(Args)]
pub(crate) struct EventScheduleArgs {
    #[arg(help = "Course identifier")]
    pub(crate) course: u64,
    #[arg(long, help = "CSV file with a title,description header; blank titles skip a meeting")]
    pub(crate) file: PathBuf,
    #[arg(long, value_parser = parse_timestamp, help = "Start of the first meeting, RFC 3339")]
    pub(crate) first: DateTime<FixedOffset>,
    #[arg(long, help = "Meeting length in minutes")]
    pub(crate) minutes: u32,
    #[arg(long, help = "Print the planned events without creating them")]
    pub(crate) dry_run: bool,
}

#[derive(Args)]
pub(crate) struct SettingsSetArgs {
    #[arg(help = "Course identifier")]
    pub(crate) course: u64,
    #[arg(
        required = true,
        value_parser = parse_query_pair,
        help = "Setting as key=value; JSON values such as true or 10 are sent typed"
    )]
    pub(crate) values: Vec<(String, String)>,
}

#[derive(Args)]
pub(crate) struct ApiGetArgs {
    #[arg(help = "Endpoint path, e.g. /api/v1/courses/1/assignments")]
    pub(crate) path: String,
    #[arg(long = "query", value_parser = parse_query_pair, help = "Query parameter as key=value")]
    pub(crate) query: Vec<(String, String)>,
    #[arg(long, help = "Follow pagination and print every record")]
    pub(crate) all: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Roster(_) => "roster",
        Command::Enrollments(_) => "enrollments",
        Command::Courses => "courses",
        Command::Announce(_) => "announce",
        Command::Announcements(_) => "announcements",
        Command::Syllabus(_) => "syllabus",
        Command::Nav(NavCommand::Add(_)) => "nav_add",
        Command::Nav(NavCommand::List(_)) => "nav_list",
        Command::Nav(NavCommand::Move(_)) => "nav_move",
        Command::Pages(PagesCommand::List(_)) => "pages_list",
        Command::Pages(PagesCommand::Show(_)) => "pages_show",
        Command::Pages(PagesCommand::Create(_)) => "pages_create",
        Command::Pages(PagesCommand::Update(_)) => "pages_update",
        Command::Events(EventsCommand::List(_)) => "events_list",
        Command::Events(EventsCommand::Create(_)) => "events_create",
        Command::Events(EventsCommand::Delete(_)) => "events_delete",
        Command::Events(EventsCommand::Schedule(_)) => "events_schedule",
        Command::Settings(SettingsCommand::Set(_)) => "settings_set",
        Command::Api(ApiCommand::Get(_)) => "api_get",
    }
}

fn parse_url(input: &str) -> Result<Url, String> {
    canvas_client::parse_base_url(input).map_err(|err| err.to_string())
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{input}': {err}"))
}

fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(input).map_err(|err| format!("invalid timestamp '{input}': {err}"))
}

fn parse_query_pair(input: &str) -> Result<(String, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("'{input}' must be key=value"))?;
    if key.trim().is_empty() {
        return Err(format!("'{input}' has an empty key"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(
            ["canvas", "--base-url", "https://canvas.example.edu"]
                .iter()
                .chain(args),
        )
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_url_rejects_invalid_input() {
        assert!(parse_url("not a url").is_err());
        assert!(parse_url("ftp://canvas.example.edu").is_err());
        assert_eq!(
            parse_url("https://canvas.example.edu/canvas").map(String::from),
            Ok("https://canvas.example.edu/canvas/".to_string())
        );
    }

    #[test]
    fn parse_query_pair_splits_on_first_equals() {
        assert_eq!(
            parse_query_pair("search_term=a=b"),
            Ok(("search_term".to_string(), "a=b".to_string()))
        );
        assert!(parse_query_pair("novalue").is_err());
        assert!(parse_query_pair("=x").is_err());
    }

    #[test]
    fn announce_requires_exactly_one_body_source() {
        assert!(parse(&["announce", "1", "--title", "t"]).is_err());
        assert!(parse(&["announce", "1", "--title", "t", "--message", "m", "--file", "a.md"]).is_err());

        let cli = parse(&["announce", "7", "--title", "t", "--file", "a.md", "--group"])
            .expect("valid announce invocation");
        let Command::Announce(args) = cli.command else {
            panic!("expected announce command");
        };
        assert_eq!(args.target, 7);
        assert!(args.group);
        assert_eq!(args.file, Some(PathBuf::from("a.md")));
    }

    #[test]
    fn nav_move_parses_tab_and_position() {
        let cli = parse(&[
            "--output",
            "json",
            "nav",
            "move",
            "3",
            "context_external_tool_9",
            "--position",
            "2",
        ])
        .expect("valid nav move invocation");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(command_label(&cli.command), "nav_move");
        let Command::Nav(NavCommand::Move(args)) = cli.command else {
            panic!("expected nav move command");
        };
        assert_eq!(args.tab, "context_external_tool_9");
        assert_eq!(args.position, 2);
        assert!(!args.hidden);
    }

    #[test]
    fn api_get_collects_repeated_query_flags() {
        let cli = parse(&[
            "api",
            "get",
            "/api/v1/courses/1/assignments",
            "--query",
            "bucket=past",
            "--query",
            "order_by=due_at",
            "--all",
        ])
        .expect("valid api invocation");
        let Command::Api(ApiCommand::Get(args)) = cli.command else {
            panic!("expected api get command");
        };
        assert_eq!(args.query.len(), 2);
        assert_eq!(args.query[1], ("order_by".to_string(), "due_at".to_string()));
        assert!(args.all);
    }

    #[test]
    fn events_list_requires_both_dates() {
        assert!(parse(&["events", "list", "12", "--start", "2024-09-01"]).is_err());
        assert!(parse(&["events", "list", "12", "--start", "09/01/2024", "--end", "2024-09-30"])
            .is_err());

        let cli = parse(&["events", "list", "12", "--start", "2024-09-01", "--end", "2024-09-30"])
            .expect("valid events list invocation");
        let Command::Events(EventsCommand::List(args)) = cli.command else {
            panic!("expected events list command");
        };
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 9, 1));
        assert_eq!(args.end, NaiveDate::from_ymd_opt(2024, 9, 30));
    }

    #[test]
    fn events_schedule_keeps_first_meeting_offset() {
        let cli = parse(&[
            "events",
            "schedule",
            "12",
            "--file",
            "fall.csv",
            "--first",
            "2024-09-03T09:30:00-04:00",
            "--minutes",
            "75",
            "--dry-run",
        ])
        .expect("valid schedule invocation");
        assert_eq!(command_label(&cli.command), "events_schedule");
        let Command::Events(EventsCommand::Schedule(args)) = cli.command else {
            panic!("expected events schedule command");
        };
        assert_eq!(args.first.to_rfc3339(), "2024-09-03T09:30:00-04:00");
        assert!(args.dry_run);
        assert!(parse(&["events", "schedule", "12", "--file", "f.csv", "--first", "9:30",
                        "--minutes", "75"])
            .is_err());
    }

    #[test]
    fn events_delete_defaults_reason() {
        let cli = parse(&["events", "delete", "77"]).expect("valid delete invocation");
        let Command::Events(EventsCommand::Delete(args)) = cli.command else {
            panic!("expected events delete command");
        };
        assert_eq!(args.reason, "no reason");
    }

    #[test]
    fn settings_set_needs_at_least_one_pair() {
        assert!(parse(&["settings", "set", "3"]).is_err());
        assert!(parse(&["settings", "set", "3", "default_view"]).is_err());

        let cli = parse(&[
            "settings",
            "set",
            "3",
            "default_view=syllabus",
            "hide_final_grades=true",
        ])
        .expect("valid settings invocation");
        let Command::Settings(SettingsCommand::Set(args)) = cli.command else {
            panic!("expected settings set command");
        };
        assert_eq!(args.values.len(), 2);
        assert_eq!(args.values[0], ("default_view".to_string(), "syllabus".to_string()));
    }

    #[test]
    fn pages_subcommands_are_documented() {
        let command = Cli::command();
        let pages = command
            .find_subcommand("pages")
            .expect("pages subcommand exists");
        for name in ["list", "show", "create", "update"] {
            let sub = pages
                .find_subcommand(name)
                .unwrap_or_else(|| panic!("pages {name} exists"));
            assert!(sub.get_about().is_some(), "pages {name} has no help text");
        }
    }

    #[test]
    fn log_format_accepts_json() {
        let cli = parse(&["--log-format", "json", "courses"]).expect("valid invocation");
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
