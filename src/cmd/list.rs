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

use crate::clock::Clock;
use crate::collection::Collection;
use crate::db::CardFilter;
use crate::error::Fallible;
use crate::types::card::Card;

/// One line per card: short id, due date, difficulty, question.
pub fn card_line(card: &Card) -> String {
    format!(
        "{}  {}  {:<6}  {}",
        card.id().short(),
        card.next_review_date().local_date(),
        card.difficulty().as_str(),
        first_line(&card.content().question)
    )
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

pub fn list_cards(directory: Option<String>, filter: CardFilter) -> Fallible<Vec<Card>> {
    let coll = Collection::new(directory)?;
    let cards = coll.db.list_cards(&filter)?;
    for card in &cards {
        println!("{}", card_line(card));
    }
    Ok(cards)
}

/// Print the cards due for review, capped at `limit` or the configured
/// batch size.
pub fn due_cards(
    directory: Option<String>,
    limit: Option<usize>,
    clock: &dyn Clock,
) -> Fallible<Vec<Card>> {
    let coll = Collection::new(directory)?;
    let limit = limit.unwrap_or(coll.config.batch_size);
    let cards = coll.db.due_cards(clock.now(), limit)?;
    if cards.is_empty() {
        println!("No cards due.");
    }
    for card in &cards {
        println!("{}", card_line(card));
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;
    use crate::clock::FixedClock;
    use crate::config::CONFIG_FILE;
    use crate::helper::at;
    use crate::types::card::CardContent;
    use crate::types::card_type::CardType;

    #[test]
    fn test_card_line() -> Fallible<()> {
        let card = Card::new(
            CardContent::new("first line\nsecond line", "A"),
            at(2024, 1, 1, 12),
        )?;
        let line = card_line(&card);
        assert!(line.starts_with(&card.id().short()));
        assert!(line.contains("MEDIUM"));
        assert!(line.ends_with("first line"));
        Ok(())
    }

    #[test]
    fn test_due_uses_configured_batch_size() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "batch_size = 2\n")?;
        let directory = Some(dir.path().display().to_string());
        let now = at(2024, 1, 1, 9);
        {
            let mut coll = Collection::new(directory.clone())?;
            for i in 0..5 {
                coll.db
                    .add_card(CardContent::new(format!("q{i}"), "a"), &[], now)?;
            }
        }
        let clock = FixedClock(now);
        assert_eq!(due_cards(directory.clone(), None, &clock)?.len(), 2);
        assert_eq!(due_cards(directory.clone(), Some(4), &clock)?.len(), 4);
        let yesterday = FixedClock(at(2023, 12, 31, 9));
        assert!(due_cards(directory, None, &yesterday)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_list_filter() -> Fallible<()> {
        let dir = tempdir()?;
        let directory = Some(dir.path().display().to_string());
        let now = at(2024, 1, 1, 9);
        {
            let mut coll = Collection::new(directory.clone())?;
            let mut content = CardContent::new("problem", "a");
            content.card_type = CardType::Problem;
            coll.db.add_card(content, &[], now)?;
            coll.db.add_card(CardContent::new("fact", "a"), &[], now)?;
        }
        let filter = CardFilter {
            card_type: Some(CardType::Problem),
            difficulty: None,
        };
        let cards = list_cards(directory, filter)?;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].content().question, "problem");
        Ok(())
    }
}
