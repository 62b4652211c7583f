//! Achievement statistics over a calendar month.
//!
//! Month and day boundaries follow the owner's calendar, expressed as a
//! fixed offset from UTC.

use super::TaskDomainError;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Calendar month in a fixed-offset calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AchievementMonth {
    first_day: NaiveDate,
    next_first_day: NaiveDate,
    utc_offset_seconds: i32,
}

impl AchievementMonth {
    /// Creates a UTC month from a year and a 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidMonth`] when the pair does not name
    /// a representable calendar month.
    pub fn new(year: i32, month: u32) -> Result<Self, TaskDomainError> {
        Self::in_offset(year, month, Utc.fix())
    }

    /// Creates a month whose days run midnight to midnight at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidMonth`] when the pair does not name
    /// a representable calendar month.
    pub fn in_offset(year: i32, month: u32, offset: FixedOffset) -> Result<Self, TaskDomainError> {
        let invalid = TaskDomainError::InvalidMonth { year, month };
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| invalid.clone())?;
        let (next_year, next_month) = if month == 12 {
            (year.checked_add(1).ok_or_else(|| invalid.clone())?, 1)
        } else {
            (year, month + 1)
        };
        let next_first_day = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or(invalid)?;
        Ok(Self {
            first_day,
            next_first_day,
            utc_offset_seconds: offset.local_minus_utc(),
        })
    }

    /// Returns the month containing `instant` in the calendar at `offset`.
    #[must_use]
    pub fn containing(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local_day = instant.with_timezone(&offset).date_naive();
        let first_day = local_day.with_day(1).unwrap_or(local_day);
        let next_first_day = first_day
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self {
            first_day,
            next_first_day,
            utc_offset_seconds: offset.local_minus_utc(),
        }
    }

    /// Returns the year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.first_day.year()
    }

    /// Returns the 1-based month number.
    #[must_use]
    pub fn month(self) -> u32 {
        self.first_day.month()
    }

    /// Returns the calendar offset the month boundaries are drawn in.
    #[must_use]
    pub fn offset(self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix())
    }

    /// Returns local midnight of the first day of the month.
    #[must_use]
    pub fn start(self) -> DateTime<Utc> {
        self.local_midnight(self.first_day)
    }

    /// Returns local midnight of the first day of the following month.
    #[must_use]
    pub fn end(self) -> DateTime<Utc> {
        self.local_midnight(self.next_first_day)
    }

    /// Returns `true` when `instant` falls within `[start, end)`.
    #[must_use]
    pub fn contains(self, instant: DateTime<Utc>) -> bool {
        instant >= self.start() && instant < self.end()
    }

    /// Returns the local calendar day of `instant`.
    #[must_use]
    pub fn local_date(self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset()).date_naive()
    }

    /// Iterates the days of the month in order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let end = self.next_first_day;
        self.first_day.iter_days().take_while(move |day| *day < end)
    }

    fn local_midnight(self, day: NaiveDate) -> DateTime<Utc> {
        let naive = day.and_time(NaiveTime::MIN);
        naive
            .and_local_timezone(self.offset())
            .single()
            .map_or_else(|| naive.and_utc(), |local| local.with_timezone(&Utc))
    }
}

/// Number of tasks achieved on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAchievements {
    /// Calendar day in the month's offset.
    pub date: NaiveDate,
    /// Tasks achieved during the day.
    pub count: usize,
}

/// Per-day achievement counts for a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAchievements {
    /// Month the counts cover.
    pub month: AchievementMonth,
    /// Tasks achieved during the whole month.
    pub total: usize,
    /// One entry per calendar day, in order.
    pub days: Vec<DailyAchievements>,
}

impl MonthlyAchievements {
    /// Buckets achievement timestamps into the days of `month`.
    ///
    /// Timestamps outside the month are ignored.
    #[must_use]
    pub fn tally(month: AchievementMonth, achieved: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        let mut days: Vec<DailyAchievements> = month
            .days()
            .map(|date| DailyAchievements { date, count: 0 })
            .collect();
        let mut total = 0_usize;

        for instant in achieved.into_iter().filter(|instant| month.contains(*instant)) {
            let date = month.local_date(instant);
            if let Some(bucket) = days.iter_mut().find(|bucket| bucket.date == date) {
                bucket.count += 1;
                total += 1;
            }
        }

        Self { month, total, days }
    }

    /// Returns the count for a given day, or zero when the day is outside
    /// the month.
    #[must_use]
    pub fn count_on(&self, date: NaiveDate) -> usize {
        self.days
            .iter()
            .find(|bucket| bucket.date == date)
            .map_or(0, |bucket| bucket.count)
    }
}
