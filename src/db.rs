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

use std::collections::HashMap;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::TransactionBehavior;
use rusqlite::config::DbConfig;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::record_review;
use crate::scheduler::select_due_batch;
use crate::scheduler::sort_for_review;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card::Schedule;
use crate::types::card_id::CardId;
use crate::types::card_type::CardType;
use crate::types::difficulty::Difficulty;
use crate::types::performance::Performance;
use crate::types::timestamp::Timestamp;
use crate::types::understanding::UnderstandingLevel;

const CARD_COLUMNS: &str = "card_id, question, answer, card_type, difficulty, context, why_matters, interval_days, repetition_count, last_performance, understanding_level, next_review_date, created_at";

pub struct Database {
    conn: Connection,
}

/// Field-equality filters for listing cards. `None` matches everything.
#[derive(Default)]
pub struct CardFilter {
    pub card_type: Option<CardType>,
    pub difficulty: Option<Difficulty>,
}

/// A partial edit of a card's content. Scheduling fields cannot be edited
/// this way.
#[derive(Default)]
pub struct ContentUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub card_type: Option<CardType>,
    pub difficulty: Option<Difficulty>,
    /// An empty string clears the field.
    pub context: Option<String>,
    /// An empty string clears the field.
    pub why_matters: Option<String>,
    /// Replaces the card's links.
    pub related: Option<Vec<CardId>>,
}

/// One entry in a card's review log.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub reviewed_at: Timestamp,
    pub performance: Performance,
    pub interval_before: u32,
    pub interval_raw: f64,
    pub interval_days: u32,
    pub next_review_date: Timestamp,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {database_path}");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Create a card, due immediately, and link it to the given cards.
    pub fn add_card(
        &mut self,
        content: CardContent,
        related: &[CardId],
        now: Timestamp,
    ) -> Fallible<Card> {
        let mut card = Card::new(content, now)?;
        let tx = self.conn.transaction()?;
        if card_exists(&tx, card.id())? {
            return fail(format!("card {} already exists.", card.id()));
        }
        insert_card(&tx, &card, now)?;
        set_links(&tx, card.id(), related)?;
        tx.commit()?;
        card.set_related(dedup_links(card.id(), related));
        log::debug!("Added card {}", card.id().short());
        Ok(card)
    }

    /// Find the card whose id is, or starts with, the given hex string.
    pub fn resolve_id(&self, prefix: &str) -> Fallible<CardId> {
        let prefix = prefix.trim().to_ascii_lowercase();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return fail(format!("invalid card id: {prefix:?}"));
        }
        let sql = "select card_id from cards where substr(card_id, 1, ?1) = ?2 limit 2;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query((prefix.len() as i64, &prefix))?;
        let mut found: Vec<CardId> = Vec::new();
        while let Some(row) = rows.next()? {
            found.push(row.get(0)?);
        }
        match found.as_slice() {
            [id] => Ok(*id),
            [] => fail(format!("no card with id {prefix}.")),
            _ => fail(format!("card id {prefix} is ambiguous.")),
        }
    }

    pub fn get_card(&self, id: CardId) -> Fallible<Card> {
        select_card(&self.conn, id)
    }

    /// Every card matching the filter, in review order.
    pub fn list_cards(&self, filter: &CardFilter) -> Fallible<Vec<Card>> {
        let sql = format!(
            "select {CARD_COLUMNS} from cards where (?1 is null or card_type = ?1) and (?2 is null or difficulty = ?2);"
        );
        let mut links = select_all_links(&self.conn)?;
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query((filter.card_type, filter.difficulty))?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            let parts = read_card(row)?;
            let related = links.remove(&parts.id).unwrap_or_default();
            cards.push(parts.into_card(related));
        }
        sort_for_review(&mut cards);
        Ok(cards)
    }

    /// The cards to review now, capped at `limit`.
    pub fn due_cards(&self, now: Timestamp, limit: usize) -> Fallible<Vec<Card>> {
        let cards = self.list_cards(&CardFilter::default())?;
        Ok(select_due_batch(cards, now, limit))
    }

    pub fn card_count(&self) -> Fallible<usize> {
        let count: i64 = self
            .conn
            .query_row("select count(*) from cards;", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn update_content(
        &mut self,
        id: CardId,
        update: ContentUpdate,
        now: Timestamp,
    ) -> Fallible<Card> {
        let tx = self.conn.transaction()?;
        let mut card = select_card(&tx, id)?;
        let mut content = card.content().clone();
        if let Some(question) = update.question {
            content.question = question.trim().to_string();
        }
        if let Some(answer) = update.answer {
            content.answer = answer.trim().to_string();
        }
        if let Some(card_type) = update.card_type {
            content.card_type = card_type;
        }
        if let Some(difficulty) = update.difficulty {
            content.difficulty = difficulty;
        }
        if let Some(context) = update.context {
            content.context = non_empty(context);
        }
        if let Some(why_matters) = update.why_matters {
            content.why_matters = non_empty(why_matters);
        }
        card.set_content(content)?;
        let sql = "update cards set question = ?, answer = ?, card_type = ?, difficulty = ?, context = ?, why_matters = ?, updated_at = ? where card_id = ?;";
        let c = card.content();
        tx.execute(
            sql,
            (
                &c.question,
                &c.answer,
                c.card_type,
                c.difficulty,
                &c.context,
                &c.why_matters,
                now,
                id,
            ),
        )?;
        if let Some(related) = update.related {
            set_links(&tx, id, &related)?;
            card.set_related(dedup_links(id, &related));
        }
        tx.commit()?;
        log::debug!("Updated card {}", id.short());
        Ok(card)
    }

    /// Review a card: read its schedule, compute the next one, and write it
    /// back together with a review log entry, all in one transaction.
    pub fn review_card(
        &mut self,
        id: CardId,
        performance: Performance,
        understanding_level: Option<UnderstandingLevel>,
        now: Timestamp,
    ) -> Fallible<Card> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut card = select_card(&tx, id)?;
        let interval_before = card.schedule().interval();
        let outcome = record_review(card.schedule(), performance, now);
        card.apply_review(&outcome, understanding_level);
        update_schedule(&tx, &card, now)?;
        insert_review(
            &tx,
            id,
            &ReviewRecord {
                reviewed_at: now,
                performance,
                interval_before,
                interval_raw: outcome.interval_raw,
                interval_days: outcome.interval,
                next_review_date: outcome.next_review_date,
            },
        )?;
        tx.commit()?;
        log::debug!(
            "{} {} interval={}d->{}d due={}",
            id.short(),
            performance,
            interval_before,
            outcome.interval,
            outcome.next_review_date.local_date()
        );
        Ok(card)
    }

    /// Delete a card together with its links and review log.
    pub fn delete_card(&mut self, id: CardId) -> Fallible<()> {
        let deleted = self
            .conn
            .execute("delete from cards where card_id = ?;", [id])?;
        if deleted == 0 {
            return fail(format!("no card with id {id}."));
        }
        log::debug!("Deleted card {}", id.short());
        Ok(())
    }

    /// A card's review log, oldest first.
    pub fn review_history(&self, id: CardId) -> Fallible<Vec<ReviewRecord>> {
        if !card_exists(&self.conn, id)? {
            return fail(format!("no card with id {id}."));
        }
        let sql = "select reviewed_at, performance, interval_before, interval_raw, interval_days, next_review_date from reviews where card_id = ? order by reviewed_at, review_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([id])?;
        let mut history = Vec::new();
        while let Some(row) = rows.next()? {
            history.push(ReviewRecord {
                reviewed_at: row.get(0)?,
                performance: row.get(1)?,
                interval_before: read_count(row, 2)?,
                interval_raw: row.get(3)?,
                interval_days: read_count(row, 4)?,
                next_review_date: row.get(5)?,
            });
        }
        Ok(history)
    }

    /// The number of reviews logged for each performance.
    pub fn review_counts(&self) -> Fallible<HashMap<Performance, usize>> {
        let mut counts = HashMap::new();
        let sql = "select performance, count(*) from reviews group by performance;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let performance: Performance = row.get(0)?;
            let count: i64 = row.get(1)?;
            counts.insert(performance, count as usize);
        }
        Ok(counts)
    }
}

/// The columns of a card row, before its links are attached.
struct CardParts {
    id: CardId,
    content: CardContent,
    schedule: Schedule,
    understanding_level: UnderstandingLevel,
    created_at: Timestamp,
}

impl CardParts {
    fn into_card(self, related: Vec<CardId>) -> Card {
        Card::restore(
            self.id,
            self.content,
            self.schedule,
            self.understanding_level,
            self.created_at,
            related,
        )
    }
}

fn read_card(row: &Row) -> rusqlite::Result<CardParts> {
    let content = CardContent {
        question: row.get(1)?,
        answer: row.get(2)?,
        card_type: row.get(3)?,
        difficulty: row.get(4)?,
        context: row.get(5)?,
        why_matters: row.get(6)?,
    };
    let schedule = Schedule::restore(
        read_count(row, 7)?.max(1),
        read_count(row, 8)?,
        row.get(9)?,
        row.get(11)?,
    );
    Ok(CardParts {
        id: row.get(0)?,
        content,
        schedule,
        understanding_level: row.get(10)?,
        created_at: row.get(12)?,
    })
}

/// Read a non-negative integer column. Out-of-range values, which only a
/// foreign writer could produce, are clamped.
fn read_count(row: &Row, idx: usize) -> rusqlite::Result<u32> {
    let value: i64 = row.get(idx)?;
    Ok(value.clamp(0, u32::MAX as i64) as u32)
}

fn select_card(conn: &Connection, id: CardId) -> Fallible<Card> {
    let sql = format!("select {CARD_COLUMNS} from cards where card_id = ?;");
    let parts = conn.query_row(&sql, [id], read_card).optional()?;
    match parts {
        Some(parts) => {
            let related = select_links(conn, id)?;
            Ok(parts.into_card(related))
        }
        None => fail(format!("no card with id {id}.")),
    }
}

fn card_exists(conn: &Connection, id: CardId) -> Fallible<bool> {
    let sql = "select count(*) from cards where card_id = ?;";
    let count: i64 = conn.query_row(sql, [id], |row| row.get(0))?;
    Ok(count > 0)
}

fn insert_card(tx: &Transaction, card: &Card, now: Timestamp) -> Fallible<()> {
    let sql = format!(
        "insert into cards ({CARD_COLUMNS}, updated_at) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);"
    );
    let c = card.content();
    let s = card.schedule();
    tx.execute(
        &sql,
        rusqlite::params![
            card.id(),
            &c.question,
            &c.answer,
            c.card_type,
            c.difficulty,
            &c.context,
            &c.why_matters,
            s.interval(),
            s.repetition_count(),
            s.last_performance(),
            card.understanding_level(),
            s.next_review_date(),
            card.created_at(),
            now,
        ],
    )?;
    Ok(())
}

fn update_schedule(tx: &Transaction, card: &Card, now: Timestamp) -> Fallible<()> {
    let sql = "update cards set interval_days = ?, repetition_count = ?, last_performance = ?, next_review_date = ?, understanding_level = ?, updated_at = ? where card_id = ?;";
    let s = card.schedule();
    tx.execute(
        sql,
        (
            s.interval(),
            s.repetition_count(),
            s.last_performance(),
            s.next_review_date(),
            card.understanding_level(),
            now,
            card.id(),
        ),
    )?;
    Ok(())
}

fn insert_review(tx: &Transaction, id: CardId, review: &ReviewRecord) -> Fallible<()> {
    let sql = "insert into reviews (card_id, reviewed_at, performance, interval_before, interval_raw, interval_days, next_review_date) values (?, ?, ?, ?, ?, ?, ?);";
    tx.execute(
        sql,
        (
            id,
            review.reviewed_at,
            review.performance,
            review.interval_before,
            review.interval_raw,
            review.interval_days,
            review.next_review_date,
        ),
    )?;
    Ok(())
}

/// The distinct links of a card, without self-links, sorted.
fn dedup_links(id: CardId, related: &[CardId]) -> Vec<CardId> {
    let mut links: Vec<CardId> = related.iter().copied().filter(|other| *other != id).collect();
    links.sort();
    links.dedup();
    links
}

/// Replace a card's links. Links are symmetric, so both directions are
/// stored.
fn set_links(tx: &Transaction, id: CardId, related: &[CardId]) -> Fallible<()> {
    tx.execute(
        "delete from card_links where card_id = ?1 or related_id = ?1;",
        [id],
    )?;
    for other in dedup_links(id, related) {
        if !card_exists(tx, other)? {
            return fail(format!("no card with id {other}."));
        }
        let sql = "insert or ignore into card_links (card_id, related_id) values (?, ?);";
        tx.execute(sql, (id, other))?;
        tx.execute(sql, (other, id))?;
    }
    Ok(())
}

fn select_links(conn: &Connection, id: CardId) -> Fallible<Vec<CardId>> {
    let sql = "select related_id from card_links where card_id = ? order by related_id;";
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([id])?;
    let mut links = Vec::new();
    while let Some(row) = rows.next()? {
        links.push(row.get(0)?);
    }
    Ok(links)
}

fn select_all_links(conn: &Connection) -> Fallible<HashMap<CardId, Vec<CardId>>> {
    let sql = "select card_id, related_id from card_links order by card_id, related_id;";
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut links: HashMap<CardId, Vec<CardId>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let id: CardId = row.get(0)?;
        let other: CardId = row.get(1)?;
        links.entry(id).or_default().push(other);
    }
    Ok(links)
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}
