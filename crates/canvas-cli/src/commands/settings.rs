use std::io::Write;

use canvas_client::Record;
use serde_json::Value;

use crate::cli::SettingsSetArgs;
use crate::client::{AppContext, CliResult};
use crate::output::render_course_settings;

/// Values that parse as JSON (`true`, `10`, `null`) are sent typed; anything
/// else is sent as a string. A repeated key keeps its last value.
pub(crate) fn handle_settings_set(
    ctx: &AppContext,
    args: &SettingsSetArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let settings = settings_record(&args.values);
    let keys: Vec<String> = settings.keys().cloned().collect();
    let course = ctx.client.update_course_settings(args.course, &settings)?;
    render_course_settings(out, &course, &keys, ctx.output)
}

fn settings_record(values: &[(String, String)]) -> Record {
    values
        .iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
            (key.clone(), value)
        })
        .collect()
}
