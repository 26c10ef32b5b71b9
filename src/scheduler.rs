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

//! The scheduling rules. Everything here is a pure function of its
//! arguments: no clock reads, no storage.

use std::cmp::Reverse;

use crate::types::card::Card;
use crate::types::card::Schedule;
use crate::types::performance::Performance;
use crate::types::timestamp::Timestamp;

/// The minimum review interval in days.
const MIN_INTERVAL: f64 = 1.0;

/// The number of cards in a review session when no limit is configured.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// The result of reviewing a card. Persisting it is up to the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReviewOutcome {
    /// The interval before rounding, in days.
    pub interval_raw: f64,
    /// The new interval, in days.
    pub interval: u32,
    pub next_review_date: Timestamp,
    pub repetition_count: u32,
    pub last_performance: Performance,
}

/// Compute a card's next schedule from the reported performance.
///
/// A zero interval, which can only come from a corrupted record, is read as
/// one day. Rounding is half away from zero, so 4.5 days becomes 5. The
/// result is never less than one day, so a card is never rescheduled for
/// the day it was reviewed. Intervals grow geometrically, so they are capped
/// at the number of days left before the latest storable date.
pub fn record_review(
    schedule: &Schedule,
    performance: Performance,
    now: Timestamp,
) -> ReviewOutcome {
    let base = schedule.interval().max(1) as f64;
    let interval_raw = base * performance.multiplier();
    let max_interval = (now.days_until_latest() as f64).max(MIN_INTERVAL);
    let interval = interval_raw.round().clamp(MIN_INTERVAL, max_interval) as u32;
    ReviewOutcome {
        interval_raw,
        interval,
        next_review_date: now.add_local_days(interval),
        repetition_count: schedule.repetition_count().saturating_add(1),
        last_performance: performance,
    }
}

/// A card is due when its review date is at or before `now`.
pub fn is_due(card: &Card, now: Timestamp) -> bool {
    card.next_review_date() <= now
}

/// Select the cards to review in a session: the due cards, most overdue
/// first, then easiest first, then newest first, capped at `limit`.
pub fn select_due_batch(cards: Vec<Card>, now: Timestamp, limit: usize) -> Vec<Card> {
    let mut due: Vec<Card> = cards.into_iter().filter(|card| is_due(card, now)).collect();
    sort_for_review(&mut due);
    due.truncate(limit);
    due
}

/// Sort cards in review order. The card id breaks any remaining ties, so
/// the order does not depend on the input order.
pub fn sort_for_review(cards: &mut [Card]) {
    cards.sort_by_key(|card| {
        (
            card.next_review_date(),
            card.difficulty(),
            Reverse(card.created_at()),
            card.id(),
        )
    });
}
