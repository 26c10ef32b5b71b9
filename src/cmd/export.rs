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

use crate::collection::Collection;
use crate::db::CardFilter;
use crate::db::ReviewRecord;
use crate::error::Fallible;
use crate::types::card_id::CardId;
use crate::types::card_type::CardType;
use crate::types::difficulty::Difficulty;
use crate::types::performance::Performance;
use crate::types::timestamp::Timestamp;
use crate::types::understanding::UnderstandingLevel;

pub fn export_collection(directory: Option<String>) -> Fallible<()> {
    let coll: Collection = Collection::new(directory)?;
    let export: Export = get_export(&coll)?;
    let json: String = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    cards: Vec<CardExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardExport {
    id: CardId,
    question: String,
    answer: String,
    #[serde(rename = "type")]
    card_type: CardType,
    difficulty: Difficulty,
    context: Option<String>,
    why_matters: Option<String>,
    interval: u32,
    repetition_count: u32,
    last_performance: Performance,
    understanding_level: UnderstandingLevel,
    next_review_date: Timestamp,
    created_at: Timestamp,
    related_card_ids: Vec<CardId>,
    reviews: Vec<ReviewRecord>,
}

fn get_export(coll: &Collection) -> Fallible<Export> {
    let mut cards: Vec<CardExport> = Vec::new();
    for card in coll.db.list_cards(&CardFilter::default())? {
        let content = card.content();
        let schedule = card.schedule();
        cards.push(CardExport {
            id: card.id(),
            question: content.question.clone(),
            answer: content.answer.clone(),
            card_type: content.card_type,
            difficulty: content.difficulty,
            context: content.context.clone(),
            why_matters: content.why_matters.clone(),
            interval: schedule.interval(),
            repetition_count: schedule.repetition_count(),
            last_performance: schedule.last_performance(),
            understanding_level: card.understanding_level(),
            next_review_date: schedule.next_review_date(),
            created_at: card.created_at(),
            related_card_ids: card.related().to_vec(),
            reviews: coll.db.review_history(card.id())?,
        });
    }
    Ok(Export { cards })
}
