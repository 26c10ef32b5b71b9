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

use clap::Parser;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::cmd::add::AddArgs;
use crate::cmd::add::add_card;
use crate::cmd::delete::delete_card;
use crate::cmd::edit::EditArgs;
use crate::cmd::edit::edit_card;
use crate::cmd::export::export_collection;
use crate::cmd::list::due_cards;
use crate::cmd::list::list_cards;
use crate::cmd::review::review_card;
use crate::cmd::show::show_card;
use crate::cmd::show::show_history;
use crate::cmd::stats::print_stats;
use crate::db::CardFilter;
use crate::error::Fallible;
use crate::types::card_type::CardType;
use crate::types::difficulty::Difficulty;
use crate::types::understanding::UnderstandingLevel;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Add a new card. It is due for review immediately.
    Add {
        /// The question on the front of the card.
        question: String,
        /// The answer on the back of the card.
        answer: String,
        #[arg(long = "type", value_enum, default_value_t = CardType::Fact)]
        card_type: CardType,
        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
        /// Where the knowledge comes from.
        #[arg(long)]
        context: Option<String>,
        /// Why the card is worth remembering.
        #[arg(long)]
        why_matters: Option<String>,
        /// Id of a related card. May be repeated.
        #[arg(long)]
        related: Vec<String>,
        /// Path to the collection directory.
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Show a card.
    Show {
        /// Card id, or a unique prefix of one.
        id: String,
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// List all cards in review order.
    List {
        #[arg(long = "type", value_enum)]
        card_type: Option<CardType>,
        #[arg(long, value_enum)]
        difficulty: Option<Difficulty>,
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// List the cards due for review now.
    Due {
        /// Maximum number of cards. Defaults to the configured batch size.
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Record a review of a card.
    Review {
        /// Card id, or a unique prefix of one.
        id: String,
        /// How well you recalled it: PERFECT, GOOD, HARD, or AGAIN.
        performance: String,
        /// Relabel the card's understanding level.
        #[arg(long, value_enum)]
        understanding: Option<UnderstandingLevel>,
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Edit a card's content.
    Edit {
        /// Card id, or a unique prefix of one.
        id: String,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
        #[arg(long = "type", value_enum)]
        card_type: Option<CardType>,
        #[arg(long, value_enum)]
        difficulty: Option<Difficulty>,
        /// New context. An empty string clears it.
        #[arg(long)]
        context: Option<String>,
        /// New reason. An empty string clears it.
        #[arg(long)]
        why_matters: Option<String>,
        /// Replace the card's links. Pass with no ids to remove them all.
        #[arg(long, num_args = 0..)]
        related: Option<Vec<String>>,
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Delete a card and its review history.
    Delete {
        /// Card id, or a unique prefix of one.
        id: String,
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Show a card's review history.
    History {
        /// Card id, or a unique prefix of one.
        id: String,
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Print collection statistics as JSON.
    Stats {
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Export all cards and their review history as JSON.
    Export {
        #[arg(long, short)]
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    let clock = SystemClock;
    run(cli, &clock)
}

fn run(cli: Command, clock: &dyn Clock) -> Fallible<()> {
    match cli {
        Command::Add {
            question,
            answer,
            card_type,
            difficulty,
            context,
            why_matters,
            related,
            directory,
        } => {
            let args = AddArgs {
                question,
                answer,
                card_type,
                difficulty,
                context,
                why_matters,
                related,
            };
            add_card(directory, args, clock)?;
        }
        Command::Show { id, directory } => show_card(directory, &id)?,
        Command::List {
            card_type,
            difficulty,
            directory,
        } => {
            let filter = CardFilter {
                card_type,
                difficulty,
            };
            list_cards(directory, filter)?;
        }
        Command::Due { limit, directory } => {
            due_cards(directory, limit, clock)?;
        }
        Command::Review {
            id,
            performance,
            understanding,
            directory,
        } => {
            review_card(directory, &id, &performance, understanding, clock)?;
        }
        Command::Edit {
            id,
            question,
            answer,
            card_type,
            difficulty,
            context,
            why_matters,
            related,
            directory,
        } => {
            let args = EditArgs {
                question,
                answer,
                card_type,
                difficulty,
                context,
                why_matters,
                related,
            };
            edit_card(directory, &id, args, clock)?;
        }
        Command::Delete { id, directory } => delete_card(directory, &id)?,
        Command::History { id, directory } => {
            show_history(directory, &id)?;
        }
        Command::Stats { directory } => {
            print_stats(directory, clock)?;
        }
        Command::Export { directory } => export_collection(directory)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use tempfile::tempdir;

    use super::*;
    use crate::clock::FixedClock;
    use crate::collection::Collection;
    use crate::helper::at;

    #[test]
    fn test_command_definition() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_add_then_review() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        let clock = FixedClock(at(2024, 1, 1, 9));

        let add = Command::try_parse_from([
            "secondbrain",
            "add",
            "What is a lifetime?",
            "A region of code where a reference is valid.",
            "--type",
            "concept",
            "--difficulty",
            "hard",
            "-d",
            path.as_str(),
        ])
        .unwrap();
        run(add, &clock)?;

        let coll = Collection::new(Some(path.clone()))?;
        let cards = coll.db.list_cards(&CardFilter::default())?;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].content().card_type, CardType::Concept);
        assert_eq!(cards[0].difficulty(), Difficulty::Hard);
        let id = cards[0].id().short();
        drop(coll);

        let review = Command::try_parse_from([
            "secondbrain",
            "review",
            id.as_str(),
            "PERFECT",
            "--understanding",
            "deep",
            "-d",
            path.as_str(),
        ])
        .unwrap();
        run(review, &clock)?;

        let coll = Collection::new(Some(path))?;
        let card = coll.db.get_card(cards[0].id())?;
        assert_eq!(card.schedule().interval(), 3);
        assert_eq!(card.understanding_level(), UnderstandingLevel::Deep);
        Ok(())
    }

    #[test]
    fn test_parse_edit_clear_related() {
        let edit = Command::try_parse_from(["secondbrain", "edit", "abc", "--related"]).unwrap();
        match edit {
            Command::Edit { related, .. } => assert_eq!(related, Some(Vec::new())),
            _ => panic!("expected edit"),
        }
    }
}
