use serde::Serialize;
use time::{Date, Duration};

use crate::{Error, Result};

/// Inclusive calendar date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidDateRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// Seven consecutive days beginning at `start`
    pub fn week_from(start: Date) -> Result<Self> {
        let Some(end) = start.checked_add(Duration::days(6)) else {
            crate::bail!("week starting {start} runs past the supported calendar");
        };

        Self::new(start, end)
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn total_days(&self) -> u32 {
        ((self.end - self.start).whole_days() + 1) as u32
    }

    /// Every date in the range, in ascending order.
    pub fn days(&self) -> impl Iterator<Item = Date> + '_ {
        std::iter::successors(Some(self.start), |day| day.next_day())
            .take_while(|day| *day <= self.end)
    }
}
