use services::FlashcardSession;

use crate::markup::markdown_to_html;

/// Current card of a flashcard session, ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashcardVm {
    /// "n z N"
    pub progress: String,
    pub question: String,
    pub answer_html: String,
    pub flipped: bool,
    pub aria_label: String,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

/// `None` when the session has no cards.
#[must_use]
pub fn map_flashcard(session: &FlashcardSession) -> Option<FlashcardVm> {
    let card = session.current()?;
    let position = session.position()?;
    let face = if session.is_flipped() {
        "zobrazuje odpověď"
    } else {
        "zobrazuje otázku"
    };

    Some(FlashcardVm {
        progress: format!("{} z {}", position.index, position.total),
        question: card.question.clone(),
        answer_html: markdown_to_html(&card.answer),
        flipped: session.is_flipped(),
        aria_label: format!("Kartička {}, {face}", position.index),
        can_go_previous: session.can_go_previous(),
        can_go_next: session.can_go_next(),
    })
}
