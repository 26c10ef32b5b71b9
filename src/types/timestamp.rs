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

use chrono::DateTime;
use chrono::Days;
use chrono::Local;
use chrono::NaiveDate;
use chrono::TimeDelta;
use chrono::TimeZone;
use chrono::Utc;
use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

/// 9999-12-31T23:59:59Z in Unix seconds.
const LATEST_SECS: i64 = 253_402_300_799;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    #[cfg(test)]
    pub fn new(ts: DateTime<Utc>) -> Self {
        Self(ts)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// The calendar date of this instant in the local timezone.
    pub fn local_date(self) -> NaiveDate {
        self.0.with_timezone(&Local).date_naive()
    }

    /// The latest instant that can be stored. RFC 3339 only has room for
    /// four-digit years.
    pub fn latest() -> Self {
        Self(DateTime::from_timestamp(LATEST_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    /// Whole days between this instant and [`Timestamp::latest`].
    pub fn days_until_latest(self) -> u32 {
        let days = (Self::latest().0 - self.0).num_days();
        days.clamp(0, u32::MAX as i64) as u32
    }

    /// Advance by whole calendar days in the local timezone, keeping the
    /// wall-clock time. Saturates at [`Timestamp::latest`].
    pub fn add_local_days(self, days: u32) -> Self {
        self.add_days_in(&Local, days)
    }

    /// Advance by whole calendar days in `tz`. Where the wall-clock time
    /// occurs twice on the target day, the earlier instant is used. Where
    /// it does not occur at all (a DST gap), falls back to adding fixed
    /// 24-hour days.
    fn add_days_in<Tz: TimeZone>(self, tz: &Tz, days: u32) -> Self {
        let local = self.0.with_timezone(tz).naive_local();
        let shifted = local
            .checked_add_days(Days::new(days as u64))
            .and_then(|naive| tz.from_local_datetime(&naive).earliest())
            .map(|ts| ts.with_timezone(&Utc))
            .or_else(|| {
                TimeDelta::try_days(days as i64).and_then(|delta| self.0.checked_add_signed(delta))
            });
        let latest = Self::latest();
        match shifted {
            Some(ts) => Self(ts).min(latest),
            None => latest,
        }
    }

    pub fn to_rfc3339(self) -> String {
        self.0.to_rfc3339()
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let str = self.0.to_rfc3339();
        Ok(ToSqlOutput::from(str))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        let ts =
            DateTime::parse_from_rfc3339(&string).map_err(|e| FromSqlError::Other(Box::new(e)))?;
        let ts = ts.with_timezone(&Utc);
        Ok(Timestamp(ts))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::America::New_York;
    use rusqlite::Connection;

    use super::*;
    use crate::error::Fallible;

    fn noon_utc(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_add_local_days() {
        let start = noon_utc(2024, 1, 1);
        let later = start.add_local_days(5);
        assert_eq!(later.into_inner() - start.into_inner(), TimeDelta::days(5));
        assert_eq!(
            later.local_date() - start.local_date(),
            TimeDelta::days(5)
        );
    }

    #[test]
    fn test_add_local_days_saturates() {
        let start = noon_utc(2024, 1, 1);
        assert_eq!(start.add_local_days(u32::MAX), Timestamp::latest());
        let days = start.days_until_latest();
        assert!(start.add_local_days(days) <= Timestamp::latest());
        assert_eq!(Timestamp::latest().to_rfc3339(), "9999-12-31T23:59:59+00:00");
        assert_eq!(Timestamp::latest().days_until_latest(), 0);
    }

    fn new_york(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        let local = New_York.with_ymd_and_hms(y, m, d, h, min, 0).earliest().unwrap();
        Timestamp::new(local.with_timezone(&Utc))
    }

    #[test]
    fn test_add_days_keeps_wall_clock_across_spring_forward() {
        // New York moves from EST to EDT on 2024-03-10.
        let start = new_york(2024, 3, 9, 12, 0);
        let later = start.add_days_in(&New_York, 1);
        assert_eq!(later, new_york(2024, 3, 10, 12, 0));
        assert_eq!(later.into_inner() - start.into_inner(), TimeDelta::hours(23));
    }

    #[test]
    fn test_add_days_keeps_wall_clock_across_fall_back() {
        // New York moves from EDT to EST on 2024-11-03.
        let start = new_york(2024, 11, 2, 12, 0);
        let later = start.add_days_in(&New_York, 1);
        assert_eq!(later, new_york(2024, 11, 3, 12, 0));
        assert_eq!(later.into_inner() - start.into_inner(), TimeDelta::hours(25));
    }

    #[test]
    fn test_add_days_into_gap_adds_whole_days() {
        // 02:30 does not exist on 2024-03-10 in New York.
        let start = new_york(2024, 3, 9, 2, 30);
        let later = start.add_days_in(&New_York, 1);
        assert_eq!(later.into_inner() - start.into_inner(), TimeDelta::days(1));
        let wall = later.into_inner().with_timezone(&New_York);
        assert_eq!(wall.format("%Y-%m-%d %H:%M").to_string(), "2024-03-10 03:30");
    }

    #[test]
    fn test_add_days_into_repeated_hour_takes_earlier() {
        // 01:30 happens twice on 2024-11-03 in New York, first in EDT.
        let start = new_york(2024, 11, 2, 1, 30);
        let later = start.add_days_in(&New_York, 1);
        let wall = later.into_inner().with_timezone(&New_York);
        assert_eq!(wall.format("%Y-%m-%d %H:%M %Z").to_string(), "2024-11-03 01:30 EDT");
        assert_eq!(
            later.into_inner(),
            Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_latest_survives_sql_round_trip() -> Fallible<()> {
        let conn = Connection::open_in_memory()?;
        let latest = Timestamp::latest();
        let loaded: Timestamp = conn.query_row("select ?", [latest], |row| row.get(0))?;
        assert_eq!(loaded, latest);
        Ok(())
    }

    #[test]
    fn test_ordering() {
        assert!(noon_utc(2024, 1, 1) < noon_utc(2024, 1, 2));
    }

    #[test]
    fn test_sql_round_trip_format() {
        let ts = noon_utc(2024, 3, 4);
        assert_eq!(ts.to_rfc3339(), "2024-03-04T12:00:00+00:00");
    }
}
