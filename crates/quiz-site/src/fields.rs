/// Field table: which database property feeds which `Question` field.
///
/// Every canonical field names a property and the shape it is expected to have.
/// Extraction goes through typed accessors; a property that is missing, has
/// another shape, or carries a malformed payload yields `FieldValue::Absent`.
///
/// The built-in table matches the Greek question bank the site was made for.
/// A `fields.json` in the working directory replaces it entirely.
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use quiz_common::notion::{PropertyValue, Record, RichTextSegment, SelectOption};

use crate::error::AppError;
use crate::model::FieldValue;

/// Most option columns a question can have.
pub const MAX_OPTION_SLOTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Title,
    RichText,
    Select,
    MultiSelect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub property: String,
    pub shape: Shape,
}

impl FieldSpec {
    pub fn new(property: &str, shape: Shape) -> Self {
        Self {
            property: property.to_string(),
            shape,
        }
    }

    pub fn extract(&self, record: &Record) -> FieldValue {
        record
            .properties
            .get(&self.property)
            .and_then(PropertyValue::from_json)
            .map(|value| read_shape(value, self.shape))
            .unwrap_or_default()
    }
}

/// One option column and the label its text is prefixed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSlot {
    pub label: String,
    pub property: String,
    #[serde(default = "rich_text")]
    pub shape: Shape,
}

fn rich_text() -> Shape {
    Shape::RichText
}

impl OptionSlot {
    fn spec(&self) -> FieldSpec {
        FieldSpec::new(&self.property, self.shape)
    }

    /// Option text as shown to the user, `None` for an empty slot.
    pub fn extract(&self, record: &Record) -> Option<String> {
        let text = self.spec().extract(record).into_text()?;
        if self.label.is_empty() {
            Some(text)
        } else {
            Some(format!("{}. {}", self.label, text))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTable {
    pub question: FieldSpec,
    pub options: Vec<OptionSlot>,
    pub correct_answers: FieldSpec,
    pub justification: FieldSpec,
    pub category: FieldSpec,
}

impl Default for FieldTable {
    fn default() -> Self {
        let slot = |label: &str| OptionSlot {
            label: label.to_string(),
            property: format!("Επιλογή {label}"),
            shape: Shape::RichText,
        };
        Self {
            question: FieldSpec::new("Ερωτήσεις Πολλαπλής Επιλογής", Shape::Title),
            options: ["Α", "Β", "Γ", "Δ", "Ε", "ΣΤ"].into_iter().map(slot).collect(),
            correct_answers: FieldSpec::new("Σωστή Απάντηση", Shape::MultiSelect),
            justification: FieldSpec::new("Αιτιολόγηση", Shape::RichText),
            category: FieldSpec::new("Κλινική Ανοσολογία", Shape::Select),
        }
    }
}

impl FieldTable {
    /// Load the table from `path`, falling back to the built-in table when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("failed to read {}: {e}", path.display())))?;
        let table = Self::parse(&content)
            .map_err(|e| AppError::Config(format!("invalid field table {}: {e}", path.display())))?;
        info!(path = %path.display(), options = table.options.len(), "field table loaded");
        Ok(table)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let table: Self = serde_json::from_str(content).map_err(|e| e.to_string())?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), String> {
        if self.options.is_empty() {
            return Err("at least one option slot is required".to_string());
        }
        if self.options.len() > MAX_OPTION_SLOTS {
            return Err(format!(
                "{} option slots configured, at most {MAX_OPTION_SLOTS} are supported",
                self.options.len()
            ));
        }
        Ok(())
    }
}

fn read_shape(value: PropertyValue, expected: Shape) -> FieldValue {
    match (value, expected) {
        (PropertyValue::Title { title: segments }, Shape::Title)
        | (PropertyValue::RichText { rich_text: segments }, Shape::RichText) => {
            text_value(&segments)
        }
        (PropertyValue::Select { select }, Shape::Select) => select
            .and_then(label)
            .map(FieldValue::Text)
            .unwrap_or_default(),
        (PropertyValue::MultiSelect { multi_select }, Shape::MultiSelect) => {
            let labels: Vec<String> = multi_select.into_iter().filter_map(label).collect();
            if labels.is_empty() {
                FieldValue::Absent
            } else {
                FieldValue::Labels(labels)
            }
        }
        _ => FieldValue::Absent,
    }
}

fn text_value(segments: &[RichTextSegment]) -> FieldValue {
    let text: String = segments.iter().map(|s| s.plain_text.as_str()).collect();
    let text = text.trim();
    if text.is_empty() {
        FieldValue::Absent
    } else {
        FieldValue::Text(text.to_string())
    }
}

fn label(option: SelectOption) -> Option<String> {
    let name = option.name.trim();
    (!name.is_empty()).then(|| name.to_string())
}
