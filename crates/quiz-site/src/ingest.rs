//! Cursor-following fetch of every record in the question database.
//!
//! Pages are requested one at a time; each request waits for the previous
//! page. The first failure aborts the whole fetch. There is no retry.

use tracing::{debug, info};

use quiz_common::notion::{NotionClient, NotionError, Record, RecordPage};

pub trait RecordSource {
    async fn query_page(&self, cursor: Option<&str>) -> Result<RecordPage, NotionError>;
}

impl RecordSource for NotionClient {
    async fn query_page(&self, cursor: Option<&str>) -> Result<RecordPage, NotionError> {
        self.query_database(cursor).await
    }
}

/// Fetch all records, in arrival order.
pub async fn fetch_all<S: RecordSource>(source: &S) -> Result<Vec<Record>, NotionError> {
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.query_page(cursor.as_deref()).await?;
        pages += 1;
        debug!(
            page = pages,
            batch = page.results.len(),
            has_more = page.next_cursor.is_some(),
            "fetched page"
        );
        records.extend(page.results);

        match page.next_cursor {
            Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                return Err(NotionError::RepeatedCursor(next));
            }
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    info!(pages, records = records.len(), "fetched all records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serves scripted pages and records the cursors it was asked for.
    struct ScriptedSource {
        pages: Mutex<Vec<Result<RecordPage, NotionError>>>,
        seen: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedSource {
        fn new(mut pages: Vec<Result<RecordPage, NotionError>>) -> Self {
            pages.reverse();
            Self {
                pages: Mutex::new(pages),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<Option<String>> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl RecordSource for ScriptedSource {
        async fn query_page(&self, cursor: Option<&str>) -> Result<RecordPage, NotionError> {
            self.seen.lock().unwrap().push(cursor.map(str::to_string));
            self.pages
                .lock()
                .unwrap()
                .pop()
                .expect("fetch_all asked for more pages than scripted")
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> Result<RecordPage, NotionError> {
        Ok(RecordPage {
            results: ids
                .iter()
                .map(|id| Record {
                    id: id.to_string(),
                    ..Default::default()
                })
                .collect(),
            next_cursor: next.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn follows_cursors_in_order() {
        let source = ScriptedSource::new(vec![
            page(&["1", "2"], Some("c1")),
            page(&["3"], Some("c2")),
            page(&["4", "5"], None),
        ]);
        let records = fetch_all(&source).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(
            source.seen(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn single_empty_page() {
        let source = ScriptedSource::new(vec![page(&[], None)]);
        assert!(fetch_all(&source).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_aborts_everything() {
        let source = ScriptedSource::new(vec![
            page(&["1"], Some("c1")),
            Err(NotionError::InvalidJson(
                serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
            )),
            page(&["2"], None),
        ]);
        let err = fetch_all(&source).await.unwrap_err();
        assert!(matches!(err, NotionError::InvalidJson(_)));
        assert_eq!(source.seen().len(), 2);
    }

    #[tokio::test]
    async fn repeated_cursor_is_an_error() {
        let source = ScriptedSource::new(vec![
            page(&["1"], Some("same")),
            page(&["2"], Some("same")),
        ]);
        let err = fetch_all(&source).await.unwrap_err();
        assert!(matches!(err, NotionError::RepeatedCursor(c) if c == "same"));
    }
}
