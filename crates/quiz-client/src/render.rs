//! HTML for the dynamic parts of the page.
//!
//! The behavior script shipped with the site produces the same markup from the
//! same state, so class names and data attributes here are part of its contract.

use maud::{html, Markup};

use quiz_common::model::{Category, Question};

use crate::state::{ClientState, Filter, Phase, PAGE_SIZE_CHOICES};

/// `<option>` value of the flagged pseudo-category.
pub const FLAGGED_OPTION: &str = "__flagged__";

pub fn question_card(q: &Question, flagged: bool, revealed: bool) -> Markup {
    html! {
        div class="question-card" data-id=(q.id) {
            div class="card-header" {
                span class="category-tag" { (q.category) }
                (flag_button(&q.id, flagged))
            }
            p class="question-text" { (q.question) }
            ul class="options-list" {
                @for opt in &q.options {
                    li { (opt) }
                }
            }
            button type="button" class="show-answer-btn" data-id=(q.id) {
                @if revealed { "Hide Answer" } @else { "Show Answer" }
            }
            (answer_block(q, revealed))
        }
    }
}

pub fn flag_button(id: &str, flagged: bool) -> Markup {
    let class = if flagged { "flag-btn active" } else { "flag-btn" };
    let title = if flagged { "Remove from review" } else { "Flag for review" };
    let pressed = if flagged { "true" } else { "false" };
    html! {
        button type="button" class=(class) data-id=(id) title=(title) aria-pressed=(pressed) {
            "\u{1F6A9}"
        }
    }
}

pub fn answer_block(q: &Question, revealed: bool) -> Markup {
    html! {
        div class="answer-reveal" hidden[!revealed] {
            p class="correct-answers" {
                "Correct Answer(s): "
                @if q.correct_answers.is_empty() {
                    "\u{2014}"
                } @else {
                    (q.correct_answers.join(", "))
                }
            }
            @if let Some(justification) = &q.justification {
                p class="justification" { (justification) }
            }
        }
    }
}

/// Pagination bar. Empty when everything fits on one page.
pub fn pagination(state: &ClientState) -> Markup {
    let pages = state.page_count();
    html! {
        @if pages > 1 {
            button type="button" id="prev-btn" disabled[!state.has_prev()] { "Previous" }
            span id="page-info" { "Page " (state.current_page()) " of " (pages) }
            button type="button" id="next-btn" disabled[!state.has_next()] { "Next" }
        }
    }
}

/// Contents of the question container for the current state.
pub fn question_list(state: &ClientState) -> Markup {
    let page = state.page();
    html! {
        @if state.phase() == Phase::NoSelection {
            div class="initial-prompt" {
                h2 { "Select a subject to start studying." }
            }
        } @else if page.is_empty() {
            div class="initial-prompt" {
                @if *state.filter() == Filter::Flagged {
                    h2 { "No flagged questions yet." }
                } @else {
                    h2 { "No questions found." }
                }
            }
        } @else {
            @if let Some(quiz) = state.quiz() {
                div class="quiz-banner" {
                    "Quiz: " (quiz.category) " \u{00B7} " (quiz.len()) " questions"
                }
            }
            @for q in page {
                (question_card(q, state.is_flagged(&q.id), state.is_revealed(&q.id)))
            }
        }
    }
}

/// Show/hide-all control. Its target is the opposite of the current page's reveal state.
pub fn reveal_all_button(state: &ClientState) -> Markup {
    let hide = state.all_revealed();
    let target = if hide { "false" } else { "true" };
    html! {
        button type="button" id="reveal-all-btn" data-target=(target) {
            @if hide { "Hide All Answers" } @else { "Show All Answers" }
        }
    }
}

pub fn search_input(state: &ClientState) -> Markup {
    html! {
        input type="search" id="search-input" placeholder="Search questions..."
            aria-label="Search" value=(state.search_term());
    }
}

pub fn category_options(categories: &[Category]) -> Markup {
    html! {
        option value="" selected disabled { "Select a Subject..." }
        option value=(FLAGGED_OPTION) { "\u{1F6A9} Flagged for review" }
        @for c in categories {
            option value=(c.name) { (c.name) " (" (c.question_count) ")" }
        }
    }
}

pub fn page_size_options(selected: usize) -> Markup {
    html! {
        @for size in PAGE_SIZE_CHOICES {
            option value=(size) selected[size == selected] { (size) " per page" }
        }
    }
}
