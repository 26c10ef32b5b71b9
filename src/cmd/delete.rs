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
use crate::error::Fallible;

pub fn delete_card(directory: Option<String>, id: &str) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let id = coll.db.resolve_id(id)?;
    coll.db.delete_card(id)?;
    println!("Deleted {}.", id.short());
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::helper::at;
    use crate::types::card::CardContent;

    #[test]
    fn test_delete_card() -> Fallible<()> {
        let dir = tempdir()?;
        let directory = Some(dir.path().display().to_string());
        let id = Collection::new(directory.clone())?
            .db
            .add_card(CardContent::new("Q", "A"), &[], at(2024, 1, 1, 9))?
            .id();
        delete_card(directory.clone(), &id.short())?;
        assert_eq!(Collection::new(directory.clone())?.db.card_count()?, 0);
        assert!(delete_card(directory, &id.short()).is_err());
        Ok(())
    }
}
