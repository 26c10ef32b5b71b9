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

use clap::ValueEnum;
use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// A qualitative label for how well the material is understood. Set by the
/// reviewer; scheduling never reads or derives it.
#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnderstandingLevel {
    Surface,
    #[default]
    Working,
    Deep,
    Teaching,
}

impl UnderstandingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnderstandingLevel::Surface => "SURFACE",
            UnderstandingLevel::Working => "WORKING",
            UnderstandingLevel::Deep => "DEEP",
            UnderstandingLevel::Teaching => "TEACHING",
        }
    }
}

impl TryFrom<String> for UnderstandingLevel {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "SURFACE" => Ok(UnderstandingLevel::Surface),
            "WORKING" => Ok(UnderstandingLevel::Working),
            "DEEP" => Ok(UnderstandingLevel::Deep),
            "TEACHING" => Ok(UnderstandingLevel::Teaching),
            _ => fail(format!("Invalid understanding level: {}", value)),
        }
    }
}

impl ToSql for UnderstandingLevel {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for UnderstandingLevel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        UnderstandingLevel::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
