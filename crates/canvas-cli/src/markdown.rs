//! Markdown to HTML conversion for announcements, syllabi and pages.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, anyhow};
use pulldown_cmark::{Options, Parser, html};

use crate::client::{CliError, CliResult};

const PANDOC_PROGRAM: &str = "pandoc";
const PANDOC_ARGS: [&str; 5] = ["-f", "markdown", "-t", "html", "--mathml"];

/// Which converter turns markdown into HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Converter {
    Builtin,
    Pandoc,
}

impl Converter {
    pub(crate) const fn from_flag(use_pandoc: bool) -> Self {
        if use_pandoc { Self::Pandoc } else { Self::Builtin }
    }
}

/// Read a markdown file and convert it to HTML.
pub(crate) fn render_file(path: &Path, converter: Converter) -> CliResult<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .map_err(|err| CliError::validation(format!("{err:#}")))?;
    to_html(&source, converter)
}

pub(crate) fn to_html(markdown: &str, converter: Converter) -> CliResult<String> {
    match converter {
        Converter::Builtin => Ok(builtin_html(markdown)),
        Converter::Pandoc => pandoc_html(PANDOC_PROGRAM, markdown),
    }
}

/// CommonMark plus tables, footnotes, strikethrough and task lists.
fn builtin_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut rendered, Parser::new_ext(markdown, options));
    rendered
}

/// Falls back to the built-in converter when `program` cannot be started.
fn pandoc_html(program: &str, markdown: &str) -> CliResult<String> {
    let mut child = match Command::new(program)
        .args(PANDOC_ARGS)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(err) => {
            tracing::warn!(
                program,
                error = %err,
                "pandoc is not available, using the built-in markdown converter"
            );
            return Ok(builtin_html(markdown));
        }
    };

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| CliError::failure(anyhow!("pandoc stdin was not captured")))?;
    let source = markdown.to_owned();
    let writer = thread::spawn(move || -> io::Result<()> {
        stdin.write_all(source.as_bytes())
    });

    let output = child
        .wait_with_output()
        .context("failed to wait for pandoc")
        .map_err(CliError::failure)?;
    writer
        .join()
        .map_err(|_| CliError::failure(anyhow!("pandoc input writer panicked")))?
        .context("failed to write markdown to pandoc")
        .map_err(CliError::failure)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CliError::failure(anyhow!(
            "pandoc exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    String::from_utf8(output.stdout)
        .context("pandoc produced non-UTF-8 output")
        .map_err(CliError::failure)
}
