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
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::performance::Performance;
use crate::types::understanding::UnderstandingLevel;

/// Record a review of a card. The performance is validated before anything
/// is read or written.
pub fn review_card(
    directory: Option<String>,
    id: &str,
    performance: &str,
    understanding_level: Option<UnderstandingLevel>,
    clock: &dyn Clock,
) -> Fallible<Card> {
    let performance: Performance = performance.parse()?;
    let mut coll = Collection::new(directory)?;
    let id = coll.db.resolve_id(id)?;
    let card = coll
        .db
        .review_card(id, performance, understanding_level, clock.now())?;
    let schedule = card.schedule();
    println!(
        "{}: {} -> next review on {} (interval {}d, review #{})",
        id.short(),
        performance,
        schedule.next_review_date().local_date(),
        schedule.interval(),
        schedule.repetition_count()
    );
    Ok(card)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::clock::FixedClock;
    use crate::helper::at;
    use crate::types::card::CardContent;

    #[test]
    fn test_review_sequence() -> Fallible<()> {
        let dir = tempdir()?;
        let directory = Some(dir.path().display().to_string());
        let created = at(2024, 1, 1, 9);
        let id = Collection::new(directory.clone())?
            .db
            .add_card(CardContent::new("Q", "A"), &[], created)?
            .id();
        let prefix = id.short();

        let steps = [
            ("GOOD", 2),
            ("PERFECT", 5),
            ("PERFECT", 13),
            ("HARD", 13),
            ("AGAIN", 7),
        ];
        for (i, (performance, interval)) in steps.iter().enumerate() {
            let clock = FixedClock(at(2024, 2, 1 + i as u32, 9));
            let card = review_card(directory.clone(), &prefix, performance, None, &clock)?;
            assert_eq!(card.schedule().interval(), *interval);
            assert_eq!(card.schedule().repetition_count(), i as u32 + 1);
        }
        Ok(())
    }

    #[test]
    fn test_unknown_performance_is_rejected() -> Fallible<()> {
        let dir = tempdir()?;
        let directory = Some(dir.path().display().to_string());
        let now = at(2024, 1, 1, 9);
        let before = Collection::new(directory.clone())?
            .db
            .add_card(CardContent::new("Q", "A"), &[], now)?;

        let clock = FixedClock(now);
        for performance in ["UNKNOWN", "perfect", " GOOD"] {
            let result = review_card(
                directory.clone(),
                &before.id().to_hex(),
                performance,
                Some(UnderstandingLevel::Teaching),
                &clock,
            );
            assert!(result.is_err());
        }

        let coll = Collection::new(directory)?;
        assert_eq!(coll.db.get_card(before.id())?, before);
        assert!(coll.db.review_history(before.id())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_review_sets_understanding() -> Fallible<()> {
        let dir = tempdir()?;
        let directory = Some(dir.path().display().to_string());
        let now = at(2024, 1, 1, 9);
        let id = Collection::new(directory.clone())?
            .db
            .add_card(CardContent::new("Q", "A"), &[], now)?
            .id();
        let clock = FixedClock(now);
        let card = review_card(
            directory,
            &id.to_hex(),
            "HARD",
            Some(UnderstandingLevel::Surface),
            &clock,
        )?;
        assert_eq!(card.understanding_level(), UnderstandingLevel::Surface);
        assert_eq!(card.schedule().interval(), 1);
        Ok(())
    }
}
