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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// Self-reported recall quality at review time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Performance {
    Perfect,
    #[default]
    Good,
    Hard,
    Again,
}

impl Performance {
    pub const ALL: [Performance; 4] = [
        Performance::Perfect,
        Performance::Good,
        Performance::Hard,
        Performance::Again,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Performance::Perfect => "PERFECT",
            Performance::Good => "GOOD",
            Performance::Hard => "HARD",
            Performance::Again => "AGAIN",
        }
    }

    /// The factor applied to the current interval.
    pub fn multiplier(&self) -> f64 {
        match self {
            Performance::Perfect => 2.5,
            Performance::Good => 1.5,
            Performance::Hard => 1.0,
            Performance::Again => 0.5,
        }
    }
}

impl Display for Performance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Performance {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Performance::ALL.into_iter().find(|p| p.as_str() == s) {
            Some(performance) => Ok(performance),
            None => fail(format!(
                "invalid performance: {s:?} (expected one of PERFECT, GOOD, HARD, AGAIN)"
            )),
        }
    }
}

impl ToSql for Performance {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Performance {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        string
            .parse()
            .map_err(|e: ErrorReport| FromSqlError::Other(Box::new(e)))
    }
}
