use tracing::{debug, info};

use quiz_common::model::{Question, UNCATEGORIZED};
use quiz_common::notion::Record;

use crate::fields::FieldTable;
use crate::model::NormalizeReport;

/// Map every record through the field table and keep the valid questions.
///
/// A question is valid when it has non-empty text and at least one option.
/// Order follows `records`. Invalid records are skipped and only counted.
pub fn normalize(records: &[Record], table: &FieldTable) -> (Vec<Question>, NormalizeReport) {
    let mut report = NormalizeReport {
        records: records.len(),
        ..Default::default()
    };
    let mut questions = Vec::with_capacity(records.len());

    for record in records {
        let question = to_question(record, table);
        if question.question.is_empty() {
            debug!(id = %record.id, "record has no question text, skipping");
            report.missing_question += 1;
            continue;
        }
        if question.options.is_empty() {
            debug!(id = %record.id, "record has no options, skipping");
            report.missing_options += 1;
            continue;
        }
        questions.push(question);
    }

    report.kept = questions.len();
    info!(
        records = report.records,
        kept = report.kept,
        dropped = report.dropped(),
        "normalized records"
    );
    (questions, report)
}

/// Extract every field of one record. The result may be invalid.
pub fn to_question(record: &Record, table: &FieldTable) -> Question {
    Question {
        id: record.id.clone(),
        question: table
            .question
            .extract(record)
            .into_text()
            .unwrap_or_default(),
        options: table
            .options
            .iter()
            .filter_map(|slot| slot.extract(record))
            .collect(),
        correct_answers: table.correct_answers.extract(record).into_labels(),
        justification: table.justification.extract(record).into_text(),
        category: table
            .category
            .extract(record)
            .into_text()
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
    }
}
