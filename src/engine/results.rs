use std::io::Write;

use csv::WriterBuilder;

use crate::actors::AccountSummary;

const HEADER: [&str; 4] = ["account", "number", "balance", "authorized"];

/// Writes one CSV row per summary. Aliases come from the script verbatim, so
/// the writer quotes them whenever they hold separators or quotes. The header
/// is written even when there is nothing to report.
pub fn write_summaries<W: Write>(output: W, summaries: &[AccountSummary]) -> csv::Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer.write_record(HEADER)?;

    for summary in summaries {
        writer.serialize(summary)?;
    }

    writer.flush()?;

    Ok(())
}
