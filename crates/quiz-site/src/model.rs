use std::path::PathBuf;

/// Result of extracting one canonical field from a record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    /// Property missing, of another shape, malformed, or empty.
    #[default]
    Absent,
    Text(String),
    Labels(Vec<String>),
}

impl FieldValue {
    /// Text content; labels are joined with `", "`.
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Text(text) => Some(text),
            FieldValue::Labels(labels) => Some(labels.join(", ")),
        }
    }

    /// Label content; text is split on commas.
    pub fn into_labels(self) -> Vec<String> {
        match self {
            FieldValue::Absent => Vec::new(),
            FieldValue::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            FieldValue::Labels(labels) => labels,
        }
    }
}

/// Counts from one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub records: usize,
    pub kept: usize,
    pub missing_question: usize,
    pub missing_options: usize,
}

impl NormalizeReport {
    pub fn dropped(&self) -> usize {
        self.records - self.kept
    }
}

#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub questions: usize,
    pub categories: usize,
    pub output_dir: PathBuf,
    pub logo_copied: bool,
}

#[derive(Debug, Clone)]
pub enum BuildOutcome {
    Written(BuildSummary),
    /// No record survived normalization; nothing was written.
    Empty { records: usize },
}
