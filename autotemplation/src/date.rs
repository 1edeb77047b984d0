//! Computed date placeholders.
//!
//! The date keys form a fixed schema: [`DateKey`] enumerates every key name
//! together with its formatting rule, and [`date_entries`] builds the full set
//! of values for one effective date. Nothing is cached between calls.
//!
//! Dates are entered as `YYYYMMDD` (for example `20150120`). An empty entry
//! means "today" in the local timezone.

use chrono::{Datelike, Local, NaiveDate};
use tracing::warn;

use crate::error::Result;
use crate::prompter::Prompter;

/// Question shown when the document date is prompted for.
pub const DATE_QUESTION: &str =
    "Please enter document date or leave empty for today's date (Ex: 20150120)";

/// A malformed explicit date entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to parse date `{input}`, expected YYYYMMDD")]
pub struct DateParseError {
    /// The rejected input.
    pub input: String,
}

/// Fixed set of computed date keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateKey {
    /// `January 05, 2024`
    Full,
    /// `20240105`
    FullNum,
    /// `01-05-2024`
    FullDash,
    /// `01/05/2024`
    FullSlash,
    /// `January`
    Month,
    /// `01`
    MonthNum,
    /// `Friday`
    DayFull,
    /// `Fri`
    DayShort,
    /// `05`
    DayNum,
    /// `2024`
    Year,
    /// `th`
    DaySuffix,
}

impl DateKey {
    /// Every date key, in insertion order.
    pub const ALL: [Self; 11] = [
        Self::Full,
        Self::FullNum,
        Self::FullDash,
        Self::FullSlash,
        Self::Month,
        Self::MonthNum,
        Self::DayFull,
        Self::DayShort,
        Self::DayNum,
        Self::Year,
        Self::DaySuffix,
    ];

    /// The placeholder identifier for this key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Full => "DATE_FULL",
            Self::FullNum => "DATE_FULL_NUM",
            Self::FullDash => "DATE_FULL_DASH",
            Self::FullSlash => "DATE_FULL_SLASH",
            Self::Month => "DATE_MONTH",
            Self::MonthNum => "DATE_MONTH_NUM",
            Self::DayFull => "DATE_DAY_FULL",
            Self::DayShort => "DATE_DAY_SHORT",
            Self::DayNum => "DATE_DAY_NUM",
            Self::Year => "DATE_YEAR",
            Self::DaySuffix => "DATE_DAY_SUFFIX",
        }
    }

    /// Look up a key by its identifier. Case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Format `date` according to this key's rule.
    #[must_use]
    pub fn format(self, date: NaiveDate) -> String {
        let pattern = match self {
            Self::Full => "%B %d, %Y",
            Self::FullNum => "%Y%m%d",
            Self::FullDash => "%m-%d-%Y",
            Self::FullSlash => "%m/%d/%Y",
            Self::Month => "%B",
            Self::MonthNum => "%m",
            Self::DayFull => "%A",
            Self::DayShort => "%a",
            Self::DayNum => "%d",
            Self::Year => "%Y",
            Self::DaySuffix => return day_suffix(date.day()).to_string(),
        };
        date.format(pattern).to_string()
    }
}

/// English ordinal suffix for a day of the month.
#[must_use]
pub const fn day_suffix(day: u32) -> &'static str {
    if matches!(day % 100, 11..=13) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Today's date in the local timezone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYYMMDD` entry.
///
/// Returns `Ok(None)` for empty (or all-whitespace) input, meaning "today".
///
/// # Errors
///
/// Returns [`DateParseError`] if the input is not eight digits forming a
/// valid calendar date.
pub fn parse_date(input: &str) -> std::result::Result<Option<NaiveDate>, DateParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let err = || DateParseError {
        input: input.to_string(),
    };
    if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    NaiveDate::parse_from_str(trimmed, "%Y%m%d")
        .map(Some)
        .map_err(|_| err())
}

/// Effective date for a non-interactive entry.
///
/// A malformed entry is logged and falls back to today.
#[must_use]
pub fn effective_date(input: Option<&str>) -> NaiveDate {
    match input.map(parse_date) {
        Some(Ok(Some(date))) => date,
        Some(Err(e)) => {
            warn!(error = %e, "falling back to today's date");
            today()
        }
        Some(Ok(None)) | None => today(),
    }
}

/// Ask the prompter for the document date until a valid entry is given.
///
/// # Errors
///
/// Propagates prompter failures.
pub fn prompt_date(prompter: &mut dyn Prompter) -> Result<NaiveDate> {
    loop {
        let answer = prompter.ask(DATE_QUESTION)?;
        match parse_date(&answer) {
            Ok(date) => return Ok(date.unwrap_or_else(today)),
            Err(e) => warn!(error = %e, "Unable to parse date entry. Please use example format."),
        }
    }
}

/// Every computed `(key, value)` pair for `date`.
#[must_use]
pub fn date_entries(date: NaiveDate) -> Vec<(&'static str, String)> {
    DateKey::ALL
        .into_iter()
        .map(|key| (key.name(), key.format(date)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::prompter::ScriptedPrompter;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod suffix {
        use super::*;

        #[test]
        fn ordinal_rule() {
            let cases = [
                (1, "st"),
                (2, "nd"),
                (3, "rd"),
                (4, "th"),
                (11, "th"),
                (12, "th"),
                (13, "th"),
                (21, "st"),
                (22, "nd"),
                (23, "rd"),
                (30, "th"),
                (31, "st"),
            ];
            for (day, expected) in cases {
                assert_eq!(day_suffix(day), expected, "day {day}");
            }
        }
    }

    mod formatting {
        use super::*;

        #[test]
        fn all_keys_for_known_date() {
            let entries = date_entries(ymd(2024, 1, 15));
            let get = |k: &str| {
                entries
                    .iter()
                    .find(|(name, _)| *name == k)
                    .map(|(_, v)| v.as_str())
                    .unwrap()
            };
            assert_eq!(entries.len(), DateKey::ALL.len());
            assert_eq!(get("DATE_FULL"), "January 15, 2024");
            assert_eq!(get("DATE_FULL_NUM"), "20240115");
            assert_eq!(get("DATE_FULL_DASH"), "01-15-2024");
            assert_eq!(get("DATE_FULL_SLASH"), "01/15/2024");
            assert_eq!(get("DATE_MONTH"), "January");
            assert_eq!(get("DATE_MONTH_NUM"), "01");
            assert_eq!(get("DATE_DAY_FULL"), "Monday");
            assert_eq!(get("DATE_DAY_SHORT"), "Mon");
            assert_eq!(get("DATE_DAY_NUM"), "15");
            assert_eq!(get("DATE_YEAR"), "2024");
            assert_eq!(get("DATE_DAY_SUFFIX"), "th");
        }

        #[test]
        fn day_is_zero_padded() {
            assert_eq!(DateKey::Full.format(ymd(2015, 1, 2)), "January 02, 2015");
            assert_eq!(DateKey::DaySuffix.format(ymd(2015, 1, 2)), "nd");
        }

        #[test]
        fn names_round_trip() {
            for key in DateKey::ALL {
                assert_eq!(DateKey::from_name(key.name()), Some(key));
            }
            assert_eq!(DateKey::from_name("DATE_CENTURY"), None);
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn valid_entry() {
            assert_eq!(parse_date("20150120").unwrap(), Some(ymd(2015, 1, 20)));
        }

        #[test]
        fn empty_entry_means_today() {
            assert_eq!(parse_date("").unwrap(), None);
            assert_eq!(parse_date("   ").unwrap(), None);
        }

        #[test]
        fn malformed_entries() {
            for bad in ["2015-01-20", "2015012", "201501200", "20151320", "abcdefgh"] {
                let err = parse_date(bad).unwrap_err();
                assert_eq!(err.input, bad);
            }
        }

        #[test]
        fn effective_date_falls_back() {
            assert_eq!(effective_date(Some("20240229")), ymd(2024, 2, 29));
            let fallback = effective_date(Some("not a date"));
            assert_eq!(fallback, today());
        }
    }

    mod prompting {
        use super::*;

        #[test]
        fn reprompts_until_valid() {
            let mut prompter = ScriptedPrompter::new()
                .reply("garbage")
                .reply("2024013")
                .reply("20240131");
            assert_eq!(prompt_date(&mut prompter).unwrap(), ymd(2024, 1, 31));
            assert_eq!(prompter.questions().len(), 3);
        }

        #[test]
        fn empty_answer_is_today() {
            let mut prompter = ScriptedPrompter::new().reply("");
            assert_eq!(prompt_date(&mut prompter).unwrap(), today());
        }
    }
}
