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
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card_type::CardType;
use crate::types::difficulty::Difficulty;

pub struct AddArgs {
    pub question: String,
    pub answer: String,
    pub card_type: CardType,
    pub difficulty: Difficulty,
    pub context: Option<String>,
    pub why_matters: Option<String>,
    pub related: Vec<String>,
}

pub fn add_card(directory: Option<String>, args: AddArgs, clock: &dyn Clock) -> Fallible<Card> {
    let mut coll = Collection::new(directory)?;
    let related = resolve_ids(&coll.db, &args.related)?;
    let mut content = CardContent::new(args.question, args.answer);
    content.card_type = args.card_type;
    content.difficulty = args.difficulty;
    content.context = args.context;
    content.why_matters = args.why_matters;
    let card = coll.db.add_card(content, &related, clock.now())?;
    println!("{}", card.id());
    Ok(card)
}
