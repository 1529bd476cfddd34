//! Filter data structures
//!
//! - `SearchFilters`: the advanced filter panel (kinds, tag names, date range)
//! - `DateRange`: relative date windows
//! - `SmartGroup`: the built-in sidebar groups

use crate::model::FileKind;
use chrono::{DateTime, Duration, Months, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Active advanced filters
///
/// An empty component places no constraint on the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Keep items of any of these kinds
    pub kinds: BTreeSet<FileKind>,
    /// Keep items carrying every one of these tag names
    pub tags: BTreeSet<String>,
    /// Keep items modified inside this window
    pub date_range: Option<DateRange>,
}

impl SearchFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any component constrains the listing
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.kinds.is_empty() || !self.tags.is_empty() || self.date_range.is_some()
    }

    #[must_use]
    pub fn with_kind(mut self, kind: FileKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, name: impl Into<String>) -> Self {
        self.tags.insert(name.into());
        self
    }

    #[must_use]
    pub const fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }
}

/// Relative window ending now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateRange {
    PastDay,
    PastWeek,
    PastMonth,
    PastYear,
}

impl DateRange {
    pub const ALL: [Self; 4] = [Self::PastDay, Self::PastWeek, Self::PastMonth, Self::PastYear];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PastDay => "Past 24 Hours",
            Self::PastWeek => "Past Week",
            Self::PastMonth => "Past Month",
            Self::PastYear => "Past Year",
        }
    }

    /// Start of the window when it ends at `now`
    ///
    /// Months and years are calendar based; a start that cannot be represented
    /// falls back to `now`.
    ///
    /// # Examples
    /// ```
    /// # use smartfiles::search::DateRange;
    /// # use chrono::{TimeZone, Utc};
    /// let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
    /// let start = DateRange::PastMonth.start_from(now);
    /// assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
    /// ```
    #[must_use]
    pub fn start_from(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let start = match self {
            Self::PastDay => now.checked_sub_signed(Duration::days(1)),
            Self::PastWeek => now.checked_sub_signed(Duration::weeks(1)),
            Self::PastMonth => now.checked_sub_months(Months::new(1)),
            Self::PastYear => now.checked_sub_months(Months::new(12)),
        };
        start.unwrap_or(now)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "24h" => Ok(Self::PastDay),
            "week" => Ok(Self::PastWeek),
            "month" => Ok(Self::PastMonth),
            "year" => Ok(Self::PastYear),
            other => Err(format!("unknown date range '{other}' (expected day, week, month or year)")),
        }
    }
}

/// Built-in sidebar groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SmartGroup {
    #[default]
    All,
    Recents,
    Favorites,
}

impl SmartGroup {
    pub const ALL: [Self; 3] = [Self::All, Self::Recents, Self::Favorites];

    /// Stable identifier
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Recents => "recents",
            Self::Favorites => "favorites",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::All => "All Files",
            Self::Recents => "Recents",
            Self::Favorites => "Favorites",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.id() == id)
    }
}

impl fmt::Display for SmartGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_is_active() {
        assert!(!SearchFilters::new().is_active());
        assert!(SearchFilters::new().with_kind(FileKind::Pdf).is_active());
        assert!(SearchFilters::new().with_tag("Work").is_active());
        assert!(SearchFilters::new().with_date_range(DateRange::PastDay).is_active());
    }

    #[test]
    fn test_date_range_starts() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
        assert_eq!(
            DateRange::PastDay.start_from(now),
            Utc.with_ymd_and_hms(2024, 1, 14, 8, 30, 0).unwrap()
        );
        assert_eq!(
            DateRange::PastWeek.start_from(now),
            Utc.with_ymd_and_hms(2024, 1, 8, 8, 30, 0).unwrap()
        );
        assert_eq!(
            DateRange::PastYear.start_from(now),
            Utc.with_ymd_and_hms(2023, 1, 15, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_date_range_parse() {
        assert_eq!("Week".parse::<DateRange>(), Ok(DateRange::PastWeek));
        assert_eq!("24h".parse::<DateRange>(), Ok(DateRange::PastDay));
        assert!("decade".parse::<DateRange>().is_err());
    }

    #[test]
    fn test_smart_group_ids() {
        for group in SmartGroup::ALL {
            assert_eq!(SmartGroup::from_id(group.id()), Some(group));
        }
        assert_eq!(SmartGroup::All.display_name(), "All Files");
        assert_eq!(SmartGroup::from_id("shared"), None);
    }
}
