use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Category assigned to questions whose record carries no category label.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A single normalized quiz item, as embedded in the generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Identifier inherited from the source record.
    pub id: String,
    /// Question text; never empty for a retained question.
    pub question: String,
    /// Option texts in slot order, e.g. `"Α. Histamine"`.
    pub options: Vec<String>,
    /// Labels of the correct option(s). May be empty.
    pub correct_answers: Vec<String>,
    /// Optional explanation shown together with the answer.
    pub justification: Option<String>,
    /// Grouping label, `UNCATEGORIZED` when the record had none.
    pub category: String,
}

impl Question {
    /// Case-insensitive substring match over the question text and every option.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.question.to_lowercase().contains(needle)
            || self
                .options
                .iter()
                .any(|o| o.to_lowercase().contains(needle))
    }
}

/// A question category with the number of questions it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub question_count: usize,
}

/// Distinct categories of `questions`, sorted by name.
///
/// Names compare case-insensitively and ignore Greek accents, so `Άλλο`
/// sorts next to `Αλλεργία` and lowercase names sit among capitalized ones.
pub fn categories(questions: &[Question]) -> Vec<Category> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for q in questions {
        *counts.entry(q.category.as_str()).or_default() += 1;
    }
    let mut categories: Vec<Category> = counts
        .into_iter()
        .map(|(name, question_count)| Category {
            name: name.to_string(),
            question_count,
        })
        .collect();
    categories.sort_by_cached_key(|c| (sort_key(&c.name), c.name.clone()));
    categories
}

fn sort_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| match c {
            'ά' => 'α',
            'έ' => 'ε',
            'ή' => 'η',
            'ί' | 'ϊ' | 'ΐ' => 'ι',
            'ό' => 'ο',
            'ύ' | 'ϋ' | 'ΰ' => 'υ',
            'ώ' => 'ω',
            'ς' => 'σ',
            other => other,
        })
        .collect()
}

/// Serialize the question list for embedding inside a `<script>` element.
///
/// Every `<` is written as the JSON escape `\u003c`, so neither `</script>`
/// nor `<!--` in question text can change how the HTML parser ends the element.
/// JSON parsers read the escape back as `<`.
pub fn embed_payload(questions: &[Question]) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(questions)?;
    Ok(json.replace('<', "\\u003c"))
}

/// Parse a payload produced by [`embed_payload`].
pub fn parse_payload(payload: &str) -> Result<Vec<Question>, serde_json::Error> {
    serde_json::from_str(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, category: &str) -> Question {
        Question {
            id: id.to_string(),
            question: format!("Question {id}"),
            options: vec!["Α. one".to_string()],
            correct_answers: vec![],
            justification: None,
            category: category.to_string(),
        }
    }

    #[test]
    fn payload_round_trip_keeps_every_field() {
        let questions = vec![
            Question {
                id: "a".to_string(),
                question: "Which cell releases </script> histamine?".to_string(),
                options: vec!["Α. Mast cell".to_string(), "Β. Neutrophil".to_string()],
                correct_answers: vec!["Α".to_string()],
                justification: Some("Degranulation.".to_string()),
                category: "Allergy".to_string(),
            },
            question("b", UNCATEGORIZED),
        ];

        let payload = embed_payload(&questions).unwrap();
        assert!(!payload.contains("</"));

        let parsed = parse_payload(&payload).unwrap();
        assert_eq!(parsed, questions);
    }

    #[test]
    fn payload_keeps_null_justification_and_answer_arrays() {
        let payload = embed_payload(&[question("b", "X")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert!(value[0]["justification"].is_null());
        assert!(value[0]["correctAnswers"].is_array());

        let mut single = question("c", "X");
        single.correct_answers = vec!["Β".to_string()];
        let payload = embed_payload(&[single]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value[0]["correctAnswers"], serde_json::json!(["Β"]));
    }

    #[test]
    fn categories_are_sorted_and_counted() {
        let qs = vec![question("1", "b"), question("2", "a"), question("3", "b")];
        let cats = categories(&qs);
        assert_eq!(
            cats,
            vec![
                Category { name: "a".to_string(), question_count: 1 },
                Category { name: "b".to_string(), question_count: 2 },
            ]
        );
    }

    #[test]
    fn payload_escapes_comment_openers() {
        let mut q = question("x", "X");
        q.question = "<!--<script>alert(1)</script>".to_string();
        let payload = embed_payload(std::slice::from_ref(&q)).unwrap();
        assert!(!payload.contains('<'));
        assert!(payload.contains("\\u003c!--"));
        assert_eq!(parse_payload(&payload).unwrap(), vec![q]);
    }

    #[test]
    fn categories_ignore_case_and_accents() {
        let qs = vec![
            question("1", "Γενετική"),
            question("2", "βιολογία"),
            question("3", "Ανοσία"),
            question("4", "Άλλεργία"),
        ];
        let names: Vec<String> = categories(&qs).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Άλλεργία", "Ανοσία", "βιολογία", "Γενετική"]);
    }

    #[test]
    fn matches_question_or_option_text() {
        let q = Question {
            options: vec!["Α. Interleukin".to_string()],
            ..question("1", "x")
        };
        assert!(q.matches("interleukin"));
        assert!(q.matches("question 1"));
        assert!(!q.matches("histamine"));
    }
}
