use std::io::Write;

use crate::cli::ApiGetArgs;
use crate::client::{AppContext, CliResult};
use crate::output::write_json;

/// Records are printed as JSON whatever the selected output format.
pub(crate) fn handle_api_get(
    ctx: &AppContext,
    args: &ApiGetArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let query: Vec<(&str, &str)> = args
        .query
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    if args.all {
        let records = ctx
            .client
            .list_records(&args.path, &query)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(path = %args.path, records = records.len(), "fetched records");
        write_json(out, &records)
    } else {
        let record = ctx.client.get_record(&args.path, &query)?;
        write_json(out, &record)
    }
}
