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
use crate::cmd::resolve_ids;
use crate::collection::Collection;
use crate::db::ContentUpdate;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::card_type::CardType;
use crate::types::difficulty::Difficulty;

pub struct EditArgs {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub card_type: Option<CardType>,
    pub difficulty: Option<Difficulty>,
    pub context: Option<String>,
    pub why_matters: Option<String>,
    pub related: Option<Vec<String>>,
}

impl EditArgs {
    fn is_empty(&self) -> bool {
        self.question.is_none()
            && self.answer.is_none()
            && self.card_type.is_none()
            && self.difficulty.is_none()
            && self.context.is_none()
            && self.why_matters.is_none()
            && self.related.is_none()
    }
}

/// Edit a card's content. Scheduling state is never touched.
pub fn edit_card(
    directory: Option<String>,
    id: &str,
    args: EditArgs,
    clock: &dyn Clock,
) -> Fallible<Card> {
    if args.is_empty() {
        return fail("nothing to edit.");
    }
    let mut coll = Collection::new(directory)?;
    let id = coll.db.resolve_id(id)?;
    let related = match &args.related {
        Some(related) => Some(resolve_ids(&coll.db, related)?),
        None => None,
    };
    let update = ContentUpdate {
        question: args.question,
        answer: args.answer,
        card_type: args.card_type,
        difficulty: args.difficulty,
        context: args.context,
        why_matters: args.why_matters,
        related,
    };
    let card = coll.db.update_content(id, update, clock.now())?;
    println!("Updated {}.", id.short());
    Ok(card)
}
