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

pub mod add;
pub mod delete;
pub mod edit;
pub mod export;
pub mod list;
pub mod review;
pub mod show;
pub mod stats;

use crate::db::Database;
use crate::error::Fallible;
use crate::types::card_id::CardId;

/// Resolve a list of user-supplied id prefixes.
fn resolve_ids(db: &Database, ids: &[String]) -> Fallible<Vec<CardId>> {
    ids.iter().map(|id| db.resolve_id(id)).collect()
}
