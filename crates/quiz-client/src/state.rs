//! Client state machine.
//!
//! Every user interaction is an [`Action`] fed to [`ClientState::update`], which
//! consumes the old state and returns the new one together with a [`Render`]
//! describing what part of the page must be redrawn.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use quiz_common::model::Question;

use crate::store::{FlagStore, KeyValueStore};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZE_CHOICES: [usize; 4] = [10, 20, 50, 100];

/// Which questions feed the view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nothing selected yet.
    #[default]
    None,
    Category(String),
    /// Pseudo-category: every question whose id is flagged.
    Flagged,
}

/// Coarse phase of the view, derived from the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoSelection,
    /// A filter or search applies and everything fits on one page.
    Filtered,
    /// A filter or search applies and the result spans several pages.
    Paginated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectFilter(Filter),
    Search(String),
    SetPageSize(usize),
    NextPage,
    PrevPage,
    ToggleFlag(String),
    ClearFlags,
    StartQuiz { category: String, count: usize },
    ExitQuiz,
    ToggleReveal(String),
    RevealAll(bool),
}

/// What must be redrawn after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    Nothing,
    /// Question list and pagination bar.
    Everything,
    /// Only the flag indicator of one question.
    FlagIndicator(String),
    /// Only the answer block of one question.
    Answer(String),
    /// Answer blocks of every question on the current page.
    Answers,
}

/// An active quiz: a random sample drawn from one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub category: String,
    /// Indices into the question list, in sampled order.
    indices: Vec<usize>,
}

impl Quiz {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ClientState {
    questions: Arc<[Question]>,
    filter: Filter,
    search: String,
    current_page: usize,
    page_size: usize,
    flagged: BTreeSet<String>,
    quiz: Option<Quiz>,
    revealed: HashSet<String>,
}

impl ClientState {
    /// Initial state for a page load: nothing selected, flags read from `flags`.
    pub fn load<S: KeyValueStore>(questions: impl Into<Arc<[Question]>>, flags: &FlagStore<S>) -> Self {
        Self {
            questions: questions.into(),
            filter: Filter::None,
            search: String::new(),
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            flagged: flags.load(),
            quiz: None,
            revealed: HashSet::new(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn flagged(&self) -> &BTreeSet<String> {
        &self.flagged
    }

    pub fn is_flagged(&self, id: &str) -> bool {
        self.flagged.contains(id)
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    /// Whether every question on the current page shows its answer.
    ///
    /// Drives the reveal-all control: when this holds it offers to hide.
    pub fn all_revealed(&self) -> bool {
        let page = self.page();
        !page.is_empty() && page.iter().all(|q| self.revealed.contains(&q.id))
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.quiz.is_none() && self.filter == Filter::None && self.needle().is_none() {
            Phase::NoSelection
        } else if self.page_count() > 1 {
            Phase::Paginated
        } else {
            Phase::Filtered
        }
    }

    fn needle(&self) -> Option<String> {
        let term = self.search.trim();
        (!term.is_empty()).then(|| term.to_lowercase())
    }

    /// Questions the active filter, quiz and search term select, in display order.
    pub fn filtered(&self) -> Vec<&Question> {
        let source: Vec<&Question> = match (&self.quiz, &self.filter) {
            (Some(quiz), _) => quiz.indices.iter().map(|&i| &self.questions[i]).collect(),
            (None, Filter::Category(category)) => self
                .questions
                .iter()
                .filter(|q| &q.category == category)
                .collect(),
            (None, Filter::Flagged) => self
                .questions
                .iter()
                .filter(|q| self.flagged.contains(&q.id))
                .collect(),
            (None, Filter::None) if self.needle().is_some() => self.questions.iter().collect(),
            (None, Filter::None) => Vec::new(),
        };

        match self.needle() {
            Some(needle) => source.into_iter().filter(|q| q.matches(&needle)).collect(),
            None => source,
        }
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered().len(), self.page_size)
    }

    /// Questions shown on the current page.
    pub fn page(&self) -> Vec<&Question> {
        let filtered = self.filtered();
        let start = (self.current_page - 1) * self.page_size;
        filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count()
    }

    pub fn update<S, R>(mut self, action: Action, flags: &mut FlagStore<S>, rng: &mut R) -> (Self, Render)
    where
        S: KeyValueStore,
        R: Rng + ?Sized,
    {
        let render = match action {
            Action::SelectFilter(filter) => {
                self.filter = filter;
                self.quiz = None;
                self.reset_view()
            }
            Action::Search(term) => {
                if term.trim() == self.search.trim() {
                    self.search = term;
                    return (self, Render::Nothing);
                }
                self.search = term;
                self.reset_view()
            }
            Action::SetPageSize(size) => {
                self.page_size = size.max(1);
                self.reset_view()
            }
            Action::NextPage => {
                if !self.has_next() {
                    return (self, Render::Nothing);
                }
                self.current_page += 1;
                self.revealed.clear();
                Render::Everything
            }
            Action::PrevPage => {
                if !self.has_prev() {
                    return (self, Render::Nothing);
                }
                self.current_page -= 1;
                self.revealed.clear();
                Render::Everything
            }
            Action::ToggleFlag(id) => {
                if !self.flagged.remove(&id) {
                    self.flagged.insert(id.clone());
                }
                if !flags.save(&self.flagged) {
                    warn!(id = %id, "failed to persist flagged questions, keeping them in memory only");
                }
                if self.filter == Filter::Flagged && self.quiz.is_none() {
                    self.clamp_page();
                    Render::Everything
                } else {
                    Render::FlagIndicator(id)
                }
            }
            Action::ClearFlags => {
                self.flagged.clear();
                flags.clear();
                if self.filter == Filter::Flagged && self.quiz.is_none() {
                    self.reset_view()
                } else {
                    Render::Everything
                }
            }
            Action::StartQuiz { category, count } => {
                let Some(quiz) = self.sample(&category, count, rng) else {
                    return (self, Render::Nothing);
                };
                self.filter = Filter::Category(category);
                self.search.clear();
                self.quiz = Some(quiz);
                self.reset_view()
            }
            Action::ExitQuiz => {
                if self.quiz.take().is_none() {
                    return (self, Render::Nothing);
                }
                self.reset_view()
            }
            Action::ToggleReveal(id) => {
                if !self.revealed.remove(&id) {
                    self.revealed.insert(id.clone());
                }
                Render::Answer(id)
            }
            Action::RevealAll(target) => {
                let ids: Vec<String> = self.page().into_iter().map(|q| q.id.clone()).collect();
                for id in ids {
                    if target {
                        self.revealed.insert(id);
                    } else {
                        self.revealed.remove(&id);
                    }
                }
                Render::Answers
            }
        };
        (self, render)
    }

    fn reset_view(&mut self) -> Render {
        self.current_page = 1;
        self.revealed.clear();
        Render::Everything
    }

    fn clamp_page(&mut self) {
        let last = self.page_count().max(1);
        self.current_page = self.current_page.clamp(1, last);
    }

    /// Draw `min(count, |category|)` distinct questions of `category` in random order.
    fn sample<R: Rng + ?Sized>(&self, category: &str, count: usize, rng: &mut R) -> Option<Quiz> {
        if count == 0 {
            return None;
        }
        let mut indices: Vec<usize> = self
            .questions
            .iter()
            .enumerate()
            .filter(|(_, q)| q.category == category)
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            return None;
        }
        indices.shuffle(rng);
        indices.truncate(count);
        Some(Quiz {
            category: category.to_string(),
            indices,
        })
    }
}

/// Number of pages needed for `len` items, `ceil(len / page_size)`.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}
