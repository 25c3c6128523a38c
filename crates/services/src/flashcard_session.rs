use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use study_core::model::Flashcard;

/// 1-based position of the current card, for "n of N" displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPosition {
    pub index: usize,
    pub total: usize,
}

/// Review state for one topic's flashcards.
///
/// The deck is a uniform shuffle of the topic's cards. Starting a new
/// session replaces all previous state; nothing is persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct FlashcardSession {
    deck: Vec<Flashcard>,
    cursor: usize,
    flipped: bool,
}

impl FlashcardSession {
    /// Start a session over `cards` in a random order.
    #[must_use]
    pub fn start(cards: &[Flashcard]) -> Self {
        Self::start_with_rng(cards, &mut rand::rng())
    }

    /// Start a session shuffled with the given RNG.
    #[must_use]
    pub fn start_with_rng<R: Rng + ?Sized>(cards: &[Flashcard], rng: &mut R) -> Self {
        let mut deck = cards.to_vec();
        deck.as_mut_slice().shuffle(rng);
        Self {
            deck,
            cursor: 0,
            flipped: false,
        }
    }

    #[must_use]
    pub fn deck(&self) -> &[Flashcard] {
        &self.deck
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current(&self) -> Option<&Flashcard> {
        self.deck.get(self.cursor)
    }

    /// Whether the current card shows its answer face.
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        !self.deck.is_empty() && self.cursor > 0
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.cursor + 1 < self.deck.len()
    }

    /// Move to `index`, showing the question face. Out-of-range indexes are
    /// ignored.
    pub fn go_to(&mut self, index: usize) {
        if index < self.deck.len() {
            self.cursor = index;
            self.flipped = false;
        }
    }

    pub fn next(&mut self) {
        if self.can_go_next() {
            self.go_to(self.cursor + 1);
        }
    }

    pub fn previous(&mut self) {
        if self.can_go_previous() {
            self.go_to(self.cursor - 1);
        }
    }

    /// Toggle between question and answer. No-op on an empty deck.
    pub fn flip(&mut self) {
        if !self.deck.is_empty() {
            self.flipped = !self.flipped;
        }
    }

    #[must_use]
    pub fn position(&self) -> Option<SessionPosition> {
        if self.deck.is_empty() {
            return None;
        }
        Some(SessionPosition {
            index: self.cursor + 1,
            total: self.deck.len(),
        })
    }
}

impl fmt::Debug for FlashcardSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashcardSession")
            .field("deck_len", &self.deck.len())
            .field("cursor", &self.cursor)
            .field("flipped", &self.flipped)
            .finish()
    }
}
