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

use serde::Serialize;

use crate::clock::Clock;
use crate::collection::Collection;
use crate::db::CardFilter;
use crate::error::Fallible;
use crate::scheduler::is_due;
use crate::types::performance::Performance;

pub fn print_stats(directory: Option<String>, clock: &dyn Clock) -> Fallible<Stats> {
    let coll = Collection::new(directory)?;
    let stats = get_stats(&coll, clock)?;
    let stats_json = serde_json::to_string_pretty(&stats)?;
    println!("{}", stats_json);
    Ok(stats)
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    directory: String,
    card_count: usize,
    due_count: usize,
    batch_size: usize,
    review_count: usize,
    reviews_by_performance: PerformanceCounts,
}

#[derive(Serialize, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceCounts {
    perfect: usize,
    good: usize,
    hard: usize,
    again: usize,
}

fn get_stats(coll: &Collection, clock: &dyn Clock) -> Fallible<Stats> {
    let now = clock.now();
    let cards = coll.db.list_cards(&CardFilter::default())?;
    let due_count = cards.iter().filter(|card| is_due(card, now)).count();
    let counts = coll.db.review_counts()?;
    let count = |p: Performance| counts.get(&p).copied().unwrap_or(0);
    let reviews_by_performance = PerformanceCounts {
        perfect: count(Performance::Perfect),
        good: count(Performance::Good),
        hard: count(Performance::Hard),
        again: count(Performance::Again),
    };
    Ok(Stats {
        directory: coll.directory.display().to_string(),
        card_count: cards.len(),
        due_count,
        batch_size: coll.config.batch_size,
        review_count: counts.values().sum(),
        reviews_by_performance,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::clock::FixedClock;
    use crate::helper::at;
    use crate::types::card::CardContent;

    #[test]
    fn test_stats() -> Fallible<()> {
        let dir = tempdir()?;
        let directory = Some(dir.path().display().to_string());
        let now = at(2024, 1, 1, 9);
        {
            let mut coll = Collection::new(directory.clone())?;
            let a = coll.db.add_card(CardContent::new("a", "A"), &[], now)?;
            coll.db.add_card(CardContent::new("b", "B"), &[], now)?;
            coll.db.review_card(a.id(), Performance::Good, None, now)?;
            coll.db.review_card(a.id(), Performance::Again, None, now)?;
        }
        let stats = print_stats(directory, &FixedClock(now))?;
        assert_eq!(stats.card_count, 2);
        assert_eq!(stats.due_count, 1);
        assert_eq!(stats.batch_size, 20);
        assert_eq!(stats.review_count, 2);
        assert_eq!(
            stats.reviews_by_performance,
            PerformanceCounts {
                good: 1,
                again: 1,
                ..PerformanceCounts::default()
            }
        );
        Ok(())
    }

    #[test]
    fn test_stats_json_keys() -> Fallible<()> {
        let dir = tempdir()?;
        let coll = Collection::new(Some(dir.path().display().to_string()))?;
        let stats = get_stats(&coll, &FixedClock(at(2024, 1, 1, 9)))?;
        let json = serde_json::to_value(&stats)?;
        assert_eq!(json["cardCount"], 0);
        assert_eq!(json["reviewsByPerformance"]["perfect"], 0);
        Ok(())
    }
}
