// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::ReviewOutcome;
use crate::types::card_id::CardId;
use crate::types::card_type::CardType;
use crate::types::difficulty::Difficulty;
use crate::types::performance::Performance;
use crate::types::timestamp::Timestamp;
use crate::types::understanding::UnderstandingLevel;

/// A spaced-repetition flashcard.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    id: CardId,
    content: CardContent,
    schedule: Schedule,
    understanding_level: UnderstandingLevel,
    created_at: Timestamp,
    related: Vec<CardId>,
}

/// The user-editable part of a card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardContent {
    pub question: String,
    pub answer: String,
    pub card_type: CardType,
    pub difficulty: Difficulty,
    /// Where the knowledge came from, or when it applies.
    pub context: Option<String>,
    /// Why the card is worth remembering.
    pub why_matters: Option<String>,
}

/// The scheduling state of a card. Only card creation and
/// [`Schedule::apply`] produce these values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Schedule {
    interval: u32,
    repetition_count: u32,
    last_performance: Performance,
    next_review_date: Timestamp,
}

impl CardContent {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into().trim().to_string(),
            answer: answer.into().trim().to_string(),
            card_type: CardType::default(),
            difficulty: Difficulty::default(),
            context: None,
            why_matters: None,
        }
    }

    pub fn validate(&self) -> Fallible<()> {
        if self.question.trim().is_empty() {
            return fail("question is required.");
        }
        if self.answer.trim().is_empty() {
            return fail("answer is required.");
        }
        Ok(())
    }
}

impl Schedule {
    /// The schedule of a new card: due immediately.
    pub fn initial(now: Timestamp) -> Self {
        Self {
            interval: 1,
            repetition_count: 0,
            last_performance: Performance::default(),
            next_review_date: now,
        }
    }

    /// Rebuild a schedule from persisted values.
    pub(crate) fn restore(
        interval: u32,
        repetition_count: u32,
        last_performance: Performance,
        next_review_date: Timestamp,
    ) -> Self {
        Self {
            interval,
            repetition_count,
            last_performance,
            next_review_date,
        }
    }

    pub fn apply(&mut self, outcome: &ReviewOutcome) {
        self.interval = outcome.interval;
        self.repetition_count = outcome.repetition_count;
        self.last_performance = outcome.last_performance;
        self.next_review_date = outcome.next_review_date;
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn repetition_count(&self) -> u32 {
        self.repetition_count
    }

    pub fn last_performance(&self) -> Performance {
        self.last_performance
    }

    pub fn next_review_date(&self) -> Timestamp {
        self.next_review_date
    }
}

impl Card {
    /// Create a new card, immediately due for review.
    pub fn new(content: CardContent, now: Timestamp) -> Fallible<Self> {
        content.validate()?;
        let id = CardId::derive(&content.question, &content.answer, now);
        Ok(Self {
            id,
            content,
            schedule: Schedule::initial(now),
            understanding_level: UnderstandingLevel::default(),
            created_at: now,
            related: Vec::new(),
        })
    }

    pub(crate) fn restore(
        id: CardId,
        content: CardContent,
        schedule: Schedule,
        understanding_level: UnderstandingLevel,
        created_at: Timestamp,
        related: Vec<CardId>,
    ) -> Self {
        Self {
            id,
            content,
            schedule,
            understanding_level,
            created_at,
            related,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn content(&self) -> &CardContent {
        &self.content
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn understanding_level(&self) -> UnderstandingLevel {
        self.understanding_level
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn related(&self) -> &[CardId] {
        &self.related
    }

    pub fn difficulty(&self) -> Difficulty {
        self.content.difficulty
    }

    pub fn next_review_date(&self) -> Timestamp {
        self.schedule.next_review_date
    }

    /// Apply the outcome of a review, optionally relabelling the card's
    /// understanding level at the same time.
    pub fn apply_review(
        &mut self,
        outcome: &ReviewOutcome,
        understanding_level: Option<UnderstandingLevel>,
    ) {
        self.schedule.apply(outcome);
        if let Some(level) = understanding_level {
            self.understanding_level = level;
        }
    }

    pub fn set_content(&mut self, content: CardContent) -> Fallible<()> {
        content.validate()?;
        self.content = content;
        Ok(())
    }

    pub fn set_related(&mut self, related: Vec<CardId>) {
        self.related = related;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::at;
    use crate::scheduler::record_review;

    fn now() -> Timestamp {
        at(2024, 1, 1, 9)
    }

    #[test]
    fn test_new_card_defaults() -> Fallible<()> {
        let card = Card::new(CardContent::new("  What is Rust?  ", "A language."), now())?;
        assert_eq!(card.content().question, "What is Rust?");
        assert_eq!(card.schedule().interval(), 1);
        assert_eq!(card.schedule().repetition_count(), 0);
        assert_eq!(card.schedule().last_performance(), Performance::Good);
        assert_eq!(card.next_review_date(), now());
        assert_eq!(card.understanding_level(), UnderstandingLevel::Working);
        assert_eq!(card.difficulty(), Difficulty::Medium);
        assert_eq!(card.content().card_type, CardType::Fact);
        assert_eq!(card.created_at(), now());
        assert!(card.related().is_empty());
        Ok(())
    }

    #[test]
    fn test_blank_question_rejected() {
        assert!(Card::new(CardContent::new("   ", "A"), now()).is_err());
        assert!(Card::new(CardContent::new("Q", ""), now()).is_err());
    }

    #[test]
    fn test_apply_review() -> Fallible<()> {
        let mut card = Card::new(CardContent::new("Q", "A"), now())?;
        let outcome = record_review(card.schedule(), Performance::Perfect, now());
        card.apply_review(&outcome, Some(UnderstandingLevel::Deep));
        assert_eq!(card.schedule().interval(), 3);
        assert_eq!(card.schedule().repetition_count(), 1);
        assert_eq!(card.schedule().last_performance(), Performance::Perfect);
        assert_eq!(card.understanding_level(), UnderstandingLevel::Deep);
        Ok(())
    }

    #[test]
    fn test_apply_review_keeps_understanding() -> Fallible<()> {
        let mut card = Card::new(CardContent::new("Q", "A"), now())?;
        let outcome = record_review(card.schedule(), Performance::Hard, now());
        card.apply_review(&outcome, None);
        assert_eq!(card.understanding_level(), UnderstandingLevel::Working);
        Ok(())
    }

    #[test]
    fn test_set_content_keeps_schedule() -> Fallible<()> {
        let mut card = Card::new(CardContent::new("Q", "A"), now())?;
        let schedule = *card.schedule();
        let mut content = card.content().clone();
        content.answer = "B".to_string();
        content.difficulty = Difficulty::Expert;
        card.set_content(content)?;
        assert_eq!(card.content().answer, "B");
        assert_eq!(*card.schedule(), schedule);
        Ok(())
    }
}
