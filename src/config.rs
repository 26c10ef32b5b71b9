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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::DEFAULT_BATCH_SIZE;

/// The name of the configuration file in a collection directory.
pub const CONFIG_FILE: &str = "secondbrain.toml";

const DEFAULT_DATABASE: &str = "secondbrain.db";

#[derive(Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// The maximum number of cards in a review session.
    pub batch_size: usize,
    /// The database file name, relative to the collection directory.
    pub database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl Config {
    /// Load the configuration from a collection directory. A missing file
    /// yields the defaults.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE}, using defaults.");
            return Ok(Self::default());
        }
        log::debug!("Loading configuration from {}", path.display());
        let content = read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        if config.batch_size == 0 {
            return fail("batch_size must be at least 1.");
        }
        if config.database.trim().is_empty() {
            return fail("database must not be empty.");
        }
        Ok(config)
    }
}
