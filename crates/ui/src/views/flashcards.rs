use std::sync::Arc;

use rand::Rng;
use services::FlashcardSession;
use study_core::model::Flashcard;
use tracing::debug;

use crate::markup::{czech_plural, escape_html};
use crate::sink::{Region, RenderSink};
use crate::vm::{FlashcardVm, map_flashcard};

const EMPTY_MESSAGE: &str = "Pro toto téma nejsou k dispozici žádné kartičky.";

/// Keys the card itself reacts to while focused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashcardKey {
    Enter,
    Space,
    Other,
}

/// Flashcard area of a topic page: owns the session and re-renders the
/// container after every change.
pub struct FlashcardWidget {
    sink: Arc<dyn RenderSink>,
    session: Option<FlashcardSession>,
}

impl FlashcardWidget {
    #[must_use]
    pub fn new(sink: Arc<dyn RenderSink>) -> Self {
        Self {
            sink,
            session: None,
        }
    }

    /// Start a fresh shuffled session, discarding any previous one.
    pub fn start(&mut self, cards: &[Flashcard]) {
        self.start_with_rng(cards, &mut rand::rng());
    }

    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, cards: &[Flashcard], rng: &mut R) {
        debug!(cards = cards.len(), "starting flashcard session");
        self.session = Some(FlashcardSession::start_with_rng(cards, rng));
        self.render();
    }

    #[must_use]
    pub fn session(&self) -> Option<&FlashcardSession> {
        self.session.as_ref()
    }

    /// Jump to `index`. Returns `false` (and renders nothing) when out of range.
    pub fn navigate(&mut self, index: usize) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if index >= session.len() {
            return false;
        }
        session.go_to(index);
        self.render();
        true
    }

    pub fn next(&mut self) -> bool {
        let target = self
            .session
            .as_ref()
            .filter(|session| session.can_go_next())
            .map(|session| session.cursor() + 1);
        target.is_some_and(|index| self.navigate(index))
    }

    pub fn previous(&mut self) -> bool {
        let target = self
            .session
            .as_ref()
            .filter(|session| session.can_go_previous())
            .map(|session| session.cursor() - 1);
        target.is_some_and(|index| self.navigate(index))
    }

    pub fn flip(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.flip();
            self.render();
        }
    }

    /// Enter and Space flip the card. Returns whether the key was handled.
    pub fn handle_key(&mut self, key: FlashcardKey) -> bool {
        match key {
            FlashcardKey::Enter | FlashcardKey::Space => {
                self.flip();
                true
            }
            FlashcardKey::Other => false,
        }
    }

    pub fn render(&self) {
        let markup = match self.session.as_ref() {
            Some(session) => match map_flashcard(session) {
                Some(vm) => card_markup(&vm, session.len()),
                None => empty_markup(),
            },
            None => empty_markup(),
        };
        self.sink.render(Region::FlashcardsContainer, &markup);
    }
}

fn empty_markup() -> String {
    format!(r#"<p class="flashcards-empty">{EMPTY_MESSAGE}</p>"#)
}

fn disabled_attr(enabled: bool) -> &'static str {
    if enabled { "" } else { " disabled" }
}

fn card_markup(vm: &FlashcardVm, total: usize) -> String {
    let flipped_class = if vm.flipped { " flipped" } else { "" };
    let noun = czech_plural(total, "kartička", "kartičky", "kartiček");

    format!(
        concat!(
            r#"<div class="flashcard-container">"#,
            r#"<div class="flashcard-count">{total} {noun}</div>"#,
            r#"<div class="flashcard-progress">{progress}</div>"#,
            r#"<div class="flashcard{flipped_class}" id="currentFlashcard" role="button" tabindex="0" aria-label="{aria}">"#,
            r#"<div class="flashcard-question">{question}</div>"#,
            r#"<div class="flashcard-answer">{answer}</div>"#,
            r#"<div class="flashcard-hint">Klikněte pro zobrazení odpovědi</div>"#,
            r#"</div>"#,
            r#"<div class="flashcard-navigation">"#,
            r#"<button class="flashcard-nav-button" data-action="previous"{prev_disabled}>← Předchozí</button>"#,
            r#"<button class="flashcard-flip-button" data-action="flip">Otočit kartu</button>"#,
            r#"<button class="flashcard-nav-button" data-action="next"{next_disabled}>Další →</button>"#,
            r#"</div></div>"#
        ),
        total = total,
        noun = noun,
        progress = escape_html(&vm.progress),
        flipped_class = flipped_class,
        aria = escape_html(&vm.aria_label),
        question = escape_html(&vm.question),
        answer = vm.answer_html,
        prev_disabled = disabled_attr(vm.can_go_previous),
        next_disabled = disabled_attr(vm.can_go_next),
    )
}
