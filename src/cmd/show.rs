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

use crate::collection::Collection;
use crate::db::ReviewRecord;
use crate::error::Fallible;
use crate::types::card::Card;

pub fn show_card(directory: Option<String>, id: &str) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let id = coll.db.resolve_id(id)?;
    let card = coll.db.get_card(id)?;
    print!("{}", describe(&card));
    Ok(())
}

pub fn show_history(directory: Option<String>, id: &str) -> Fallible<Vec<ReviewRecord>> {
    let coll = Collection::new(directory)?;
    let id = coll.db.resolve_id(id)?;
    let history = coll.db.review_history(id)?;
    if history.is_empty() {
        println!("Never reviewed.");
    }
    for review in &history {
        println!(
            "{}  {:<7}  {}d -> {}d ({:.1})  due {}",
            review.reviewed_at.local_date(),
            review.performance.as_str(),
            review.interval_before,
            review.interval_days,
            review.interval_raw,
            review.next_review_date.local_date()
        );
    }
    Ok(history)
}

fn describe(card: &Card) -> String {
    let content = card.content();
    let schedule = card.schedule();
    let mut out = String::new();
    out.push_str(&format!("id:            {}\n", card.id()));
    out.push_str(&format!("type:          {}\n", content.card_type.as_str()));
    out.push_str(&format!("difficulty:    {}\n", content.difficulty.as_str()));
    out.push_str(&format!(
        "understanding: {}\n",
        card.understanding_level().as_str()
    ));
    out.push_str(&format!("created:       {}\n", card.created_at().local_date()));
    out.push_str(&format!(
        "next review:   {}\n",
        schedule.next_review_date().local_date()
    ));
    out.push_str(&format!("interval:      {}d\n", schedule.interval()));
    out.push_str(&format!("reviews:       {}\n", schedule.repetition_count()));
    out.push_str(&format!("last:          {}\n", schedule.last_performance()));
    if let Some(context) = &content.context {
        out.push_str(&format!("context:       {context}\n"));
    }
    if let Some(why_matters) = &content.why_matters {
        out.push_str(&format!("why it matters: {why_matters}\n"));
    }
    for related in card.related() {
        out.push_str(&format!("related:       {}\n", related.short()));
    }
    out.push_str(&format!("\nQ: {}\n\nA: {}\n", content.question, content.answer));
    out
}
