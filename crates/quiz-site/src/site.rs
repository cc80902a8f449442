//! Static artifacts: the page shell with the embedded question list, the
//! stylesheet and the behavior script.

use std::path::{Path, PathBuf};

use maud::{html, Markup, PreEscaped, DOCTYPE};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use quiz_client::render;
use quiz_client::state::DEFAULT_PAGE_SIZE;
use quiz_client::{ClientState, FlagStore, MemoryStore};
use quiz_common::error::CommonError;
use quiz_common::model::{self, Category, Question};

use crate::error::AppError;
use crate::model::BuildSummary;

const STYLE_CSS: &str = include_str!("../assets/style.css");
const SCRIPT_JS: &str = include_str!("../assets/script.js");

const PAGE_TITLE: &str = "MedPollaplis - Medical Questions";
/// Element id the behavior script reads the question list from.
const DATA_ELEMENT_ID: &str = "questions-data";
const DEFAULT_QUIZ_SIZE: usize = 20;

/// Every file of the generated site, rendered and ready to write.
#[derive(Debug, Clone)]
pub struct Site {
    pub index_html: String,
    pub style_css: &'static str,
    pub script_js: &'static str,
    pub question_count: usize,
    pub categories: Vec<Category>,
}

pub fn render_site(questions: &[Question]) -> Result<Site, AppError> {
    let categories = model::categories(questions);
    let payload = model::embed_payload(questions).map_err(CommonError::from)?;

    // Pre-render the first view exactly as the client will on load.
    let initial = ClientState::load(questions.to_vec(), &FlagStore::new(MemoryStore::new()));
    let index = page(&categories, &payload, &initial);

    Ok(Site {
        index_html: index.into_string(),
        style_css: STYLE_CSS,
        script_js: SCRIPT_JS,
        question_count: questions.len(),
        categories,
    })
}

fn page(categories: &[Category], payload: &str, initial: &ClientState) -> Markup {
    html! {
        (DOCTYPE)
        html lang="el" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (PAGE_TITLE) }
                link rel="preconnect" href="https://fonts.googleapis.com";
                link rel="preconnect" href="https://fonts.gstatic.com" crossorigin;
                link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=Roboto:wght@400;500;700&display=swap";
                link rel="stylesheet" href=(versioned("style.css", STYLE_CSS));
            }
            body {
                div class="container" {
                    header class="site-header" {
                        img class="logo" src="logo.png" alt="" onerror="this.remove()";
                        h1 { (PAGE_TITLE) }
                    }
                    (controls(categories, initial))
                    div id="quiz-container" { (render::question_list(initial)) }
                    div id="pagination-container" { (render::pagination(initial)) }
                }
                script type="application/json" id=(DATA_ELEMENT_ID) { (PreEscaped(payload)) }
                script src=(versioned("script.js", SCRIPT_JS)) {}
            }
        }
    }
}

fn controls(categories: &[Category], initial: &ClientState) -> Markup {
    html! {
        div class="controls" {
            select id="category-filter" aria-label="Subject" {
                (render::category_options(categories))
            }
            (render::search_input(initial))
            select id="page-size" aria-label="Questions per page" {
                (render::page_size_options(DEFAULT_PAGE_SIZE))
            }
            (render::reveal_all_button(initial))
            button type="button" id="clear-flags-btn" { "Clear Flags" }
        }
        div class="quiz-controls" {
            input type="number" id="quiz-size" min="1" value=(DEFAULT_QUIZ_SIZE) aria-label="Quiz size";
            button type="button" id="start-quiz-btn" { "Start Quiz" }
            button type="button" id="exit-quiz-btn" hidden { "Exit Quiz" }
        }
    }
}

/// Asset URL with a content-hash query string so browsers never keep a stale copy.
fn versioned(name: &str, content: &str) -> String {
    let hash = Sha256::digest(content.as_bytes());
    let hex: String = hash.iter().take(5).map(|b| format!("{b:02x}")).collect();
    format!("{name}?v={hex}")
}

/// Write the site into `output_dir` and copy `logo` next to it when present.
pub fn write_site(site: &Site, output_dir: &Path, logo: &Path) -> Result<BuildSummary, AppError> {
    std::fs::create_dir_all(output_dir).map_err(|source| AppError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    write_file(output_dir.join("index.html"), site.index_html.as_bytes())?;
    write_file(output_dir.join("style.css"), site.style_css.as_bytes())?;
    write_file(output_dir.join("script.js"), site.script_js.as_bytes())?;

    let logo_copied = copy_logo(logo, output_dir);

    info!(
        output_dir = %output_dir.display(),
        logo = logo_copied,
        "site written"
    );
    Ok(BuildSummary {
        questions: site.question_count,
        categories: site.categories.len(),
        output_dir: output_dir.to_path_buf(),
        logo_copied,
    })
}

fn write_file(path: PathBuf, contents: &[u8]) -> Result<(), AppError> {
    std::fs::write(&path, contents).map_err(|source| AppError::Io { path, source })
}

fn copy_logo(logo: &Path, output_dir: &Path) -> bool {
    if !logo.exists() {
        warn!(path = %logo.display(), "logo not found, building without it");
        return false;
    }
    let Some(file_name) = logo.file_name() else {
        return false;
    };
    std::fs::copy(logo, output_dir.join(file_name))
        .inspect_err(|e| warn!(error = %e, path = %logo.display(), "failed to copy logo"))
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_payload(index_html: &str) -> Option<&str> {
        let open = format!(r#"<script type="application/json" id="{DATA_ELEMENT_ID}">"#);
        let start = index_html.find(&open)? + open.len();
        let len = index_html[start..].find("</script>")?;
        Some(&index_html[start..start + len])
    }

    fn questions() -> Vec<Question> {
        vec![
            Question {
                id: "a".to_string(),
                question: "Closing tag </script> inside text?".to_string(),
                options: vec!["Α. yes".to_string(), "Β. no".to_string()],
                correct_answers: vec!["Β".to_string()],
                justification: None,
                category: "Allergy".to_string(),
            },
            Question {
                id: "b".to_string(),
                question: "Second".to_string(),
                options: vec!["Α. only".to_string()],
                correct_answers: vec![],
                justification: Some("note".to_string()),
                category: "Cytokines".to_string(),
            },
        ]
    }

    #[test]
    fn embedded_payload_round_trips() {
        let qs = questions();
        let site = render_site(&qs).unwrap();
        let payload = extract_payload(&site.index_html).expect("payload present");
        assert_eq!(model::parse_payload(payload).unwrap(), qs);
    }

    #[test]
    fn page_lists_categories_and_initial_prompt() {
        let site = render_site(&questions()).unwrap();
        assert!(site.index_html.starts_with("<!DOCTYPE html>"));
        assert!(site.index_html.contains(r#"<option value="Allergy">Allergy (1)</option>"#));
        assert!(site.index_html.contains(r#"<option value="Cytokines">Cytokines (1)</option>"#));
        assert!(site.index_html.contains("Select a subject"));
        assert!(site.index_html.contains(r#"id="category-filter""#));
        assert!(site.index_html.contains(r#"data-target="true">Show All Answers"#));
        assert!(site.index_html.contains(r#"id="search-input""#));
        assert_eq!(site.categories.len(), 2);
    }

    #[test]
    fn assets_are_fingerprinted() {
        let site = render_site(&questions()).unwrap();
        assert!(site.index_html.contains(&versioned("style.css", STYLE_CSS)));
        assert!(site.index_html.contains(&versioned("script.js", SCRIPT_JS)));
        assert_ne!(versioned("x", "one"), versioned("x", "two"));
        assert_eq!(versioned("x", "one").len(), "x?v=".len() + 10);
    }

    #[test]
    fn writes_all_artifacts_without_logo() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist");
        let site = render_site(&questions()).unwrap();

        let summary = write_site(&site, &out, &dir.path().join("logo.png")).unwrap();
        assert_eq!(summary.questions, 2);
        assert_eq!(summary.categories, 2);
        assert!(!summary.logo_copied);
        for name in ["index.html", "style.css", "script.js"] {
            assert!(out.join(name).exists(), "{name} missing");
        }
        assert!(!out.join("logo.png").exists());
    }

    #[test]
    fn copies_logo_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.png");
        std::fs::write(&logo, [0x89, b'P', b'N', b'G']).unwrap();
        let out = dir.path().join("dist");

        let summary = write_site(&render_site(&questions()).unwrap(), &out, &logo).unwrap();
        assert!(summary.logo_copied);
        assert_eq!(std::fs::read(out.join("logo.png")).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }
}
