/// End-to-end build: fetch, normalize, render, write.
///
/// Nothing touches the output directory until every record is fetched and
/// every artifact rendered, so a failed run leaves the previous site intact.
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::fields::FieldTable;
use crate::ingest::{self, RecordSource};
use crate::model::BuildOutcome;
use crate::normalize;
use crate::site;

pub async fn run<S: RecordSource>(
    config: &Config,
    table: &FieldTable,
    source: &S,
) -> Result<BuildOutcome, AppError> {
    info!("fetching questions from notion");
    let records = ingest::fetch_all(source).await?;

    let (questions, report) = normalize::normalize(&records, table);
    if questions.is_empty() {
        warn!(
            records = report.records,
            missing_question = report.missing_question,
            missing_options = report.missing_options,
            question_property = %table.question.property,
            "no valid questions; check that the field table matches the database columns"
        );
        return Ok(BuildOutcome::Empty {
            records: report.records,
        });
    }

    let site = site::render_site(&questions)?;
    let summary = site::write_site(&site, &config.output_dir, &config.logo_path)?;
    Ok(BuildOutcome::Written(summary))
}
