use std::io::Write;

use canvas_client::PageDraft;

use crate::cli::{CourseArgs, PageCreateArgs, PageShowArgs, PageSourceArgs, PageUpdateArgs};
use crate::client::{AppContext, CliResult};
use crate::markdown::{Converter, render_file};
use crate::output::{render_page, render_pages};

fn draft_from(source: &PageSourceArgs) -> CliResult<PageDraft> {
    Ok(PageDraft {
        title: source.title.clone(),
        body: render_file(&source.file, Converter::from_flag(source.pandoc))?,
        published: !source.draft,
    })
}

pub(crate) fn handle_page_list(
    ctx: &AppContext,
    args: &CourseArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let pages = ctx
        .client
        .list_pages(args.course)
        .collect::<Result<Vec<_>, _>>()?;
    render_pages(out, &pages, ctx.output)
}

pub(crate) fn handle_page_show(
    ctx: &AppContext,
    args: &PageShowArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let page = ctx.client.get_page(args.course, &args.page)?;
    render_page(out, &page, ctx.output)
}

pub(crate) fn handle_page_create(
    ctx: &AppContext,
    args: &PageCreateArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let draft = draft_from(&args.source)?;
    let page = ctx.client.create_page(args.course, &draft)?;
    render_page(out, &page, ctx.output)
}

pub(crate) fn handle_page_update(
    ctx: &AppContext,
    args: &PageUpdateArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let draft = draft_from(&args.source)?;
    let page = ctx.client.update_page(args.course, &args.page, &draft)?;
    render_page(out, &page, ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use canvas_test_support::fixtures::json_response;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;

    use crate::cli::OutputFormat;
    use crate::commands::test_support::context_for;

    fn source(file: PathBuf, draft: bool) -> PageSourceArgs {
        PageSourceArgs {
            title: "Week 1".to_string(),
            file,
            draft,
            pandoc: false,
        }
    }

    #[test]
    fn create_uploads_converted_markdown() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("week1.md");
        fs::write(&path, "Read *chapter 1*")?;

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/courses/9/pages")
                .json_body(json!({"wiki_page": {
                    "title": "Week 1",
                    "body": "<p>Read <em>chapter 1</em></p>\n",
                    "published": true
                }}));
            json_response(
                then,
                200,
                &json!({"url": "week-1", "title": "Week 1", "published": true}),
            );
        });

        let ctx = context_for(&server, OutputFormat::Text)?;
        let mut out = Vec::new();
        handle_page_create(
            &ctx,
            &PageCreateArgs {
                course: 9,
                source: source(path, false),
            },
            &mut out,
        )?;

        mock.assert();
        let text = String::from_utf8(out)?;
        assert!(text.starts_with("title: Week 1\nurl: week-1\npublished: true\n"));
        Ok(())
    }

    #[test]
    fn update_keeps_draft_unpublished() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("week1.md");
        fs::write(&path, "Updated")?;

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/v1/courses/9/pages/week-1")
                .json_body(json!({"wiki_page": {
                    "title": "Week 1",
                    "body": "<p>Updated</p>\n",
                    "published": false
                }}));
            json_response(
                then,
                200,
                &json!({"url": "week-1", "title": "Week 1", "published": false}),
            );
        });

        let ctx = context_for(&server, OutputFormat::Json)?;
        let mut out = Vec::new();
        handle_page_update(
            &ctx,
            &PageUpdateArgs {
                course: 9,
                page: "week-1".to_string(),
                source: source(path, true),
            },
            &mut out,
        )?;

        mock.assert();
        let printed: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(printed["published"], false);
        Ok(())
    }

    #[test]
    fn show_prints_body() -> Result<()> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/courses/9/pages/week-1");
            json_response(
                then,
                200,
                &json!({"url": "week-1", "title": "Week 1", "body": "<p>Read</p>"}),
            );
        });

        let ctx = context_for(&server, OutputFormat::Text)?;
        let mut out = Vec::new();
        handle_page_show(
            &ctx,
            &PageShowArgs {
                course: 9,
                page: "week-1".to_string(),
            },
            &mut out,
        )?;

        assert_eq!(
            String::from_utf8(out)?,
            "title: Week 1\nurl: week-1\n\n<p>Read</p>\n"
        );
        Ok(())
    }

    #[test]
    fn list_prints_one_row_per_page() -> Result<()> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/courses/9/pages");
            json_response(
                then,
                200,
                &json!([{"url": "week-1", "title": "Week 1", "published": true},
                        {"url": "week-2", "title": "Week 2", "published": false}]),
            );
        });

        let ctx = context_for(&server, OutputFormat::Text)?;
        let mut out = Vec::new();
        handle_page_list(&ctx, &CourseArgs { course: 9 }, &mut out)?;

        let text = String::from_utf8(out)?;
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(2).unwrap_or_default().ends_with("Week 2"));
        Ok(())
    }
}
