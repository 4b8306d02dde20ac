//! Zodiac signs and birth-date classification
//!
//! The twelve signs are kept in a fixed, ordered table of date ranges. Every
//! (month, day) pair of the calendar, Feb 29 included, falls into exactly one
//! range. The last range wraps across the year boundary (Dec 22 to Jan 19).

use crate::error::{FortuneError, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Birth date format accepted from the user
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// One of the twelve zodiac signs
///
/// The canonical label is the Korean sign name, which is what the prompt
/// and the transcript show. The English name is accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// All signs in selection-list order
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Korean display label
    ///
    /// # Examples
    ///
    /// ```
    /// use zodiac_fortune::zodiac::ZodiacSign;
    ///
    /// assert_eq!(ZodiacSign::Leo.label(), "사자자리");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            Self::Aries => "양자리",
            Self::Taurus => "황소자리",
            Self::Gemini => "쌍둥이자리",
            Self::Cancer => "게자리",
            Self::Leo => "사자자리",
            Self::Virgo => "처녀자리",
            Self::Libra => "천칭자리",
            Self::Scorpio => "전갈자리",
            Self::Sagittarius => "사수자리",
            Self::Capricorn => "염소자리",
            Self::Aquarius => "물병자리",
            Self::Pisces => "물고기자리",
        }
    }

    /// English name of the sign
    pub fn english_name(&self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// The date range this sign covers
    pub fn date_range(&self) -> &'static DateRange {
        // Every sign appears exactly once in the table.
        ZODIAC_TABLE
            .iter()
            .find(|range| range.sign == *self)
            .unwrap_or(&ZODIAC_TABLE[0])
    }

    /// Classify a calendar date
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use zodiac_fortune::zodiac::ZodiacSign;
    ///
    /// let date = NaiveDate::from_ymd_opt(1990, 8, 1).unwrap();
    /// assert_eq!(ZodiacSign::from_date(date), Some(ZodiacSign::Leo));
    /// ```
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        classify(date.month(), date.day())
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ZodiacSign {
    type Err = FortuneError;

    /// Parse a sign from its Korean label or English name
    ///
    /// English names are matched case-insensitively; surrounding whitespace
    /// is ignored.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(FortuneError::Validation(
                "No zodiac sign was selected".to_string(),
            ));
        }

        Self::ALL
            .iter()
            .copied()
            .find(|sign| {
                sign.label() == trimmed || sign.english_name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| FortuneError::Validation(format!("Unknown zodiac sign: {}", trimmed)))
    }
}

/// A (start, end, sign) entry of the classification table
///
/// Start and end are inclusive (month, day) pairs. A range whose start month
/// is after its end month wraps across the year boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First (month, day) of the range
    pub start: (u32, u32),
    /// Last (month, day) of the range
    pub end: (u32, u32),
    /// Sign assigned to dates in the range
    pub sign: ZodiacSign,
}

impl DateRange {
    const fn new(start: (u32, u32), end: (u32, u32), sign: ZodiacSign) -> Self {
        Self { start, end, sign }
    }

    /// Whether (month, day) falls inside this range
    pub fn contains(&self, month: u32, day: u32) -> bool {
        let (start_month, start_day) = self.start;
        let (end_month, end_day) = self.end;

        if (month == start_month && day >= start_day) || (month == end_month && day <= end_day) {
            return true;
        }
        // Never taken with the current table: every range ends in the month
        // it starts in or the month right after.
        if start_month < end_month && start_month < month && month < end_month {
            return true;
        }
        start_month > end_month && (month > start_month || month < end_month)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}-{:02} ~ {:02}-{:02}",
            self.start.0, self.start.1, self.end.0, self.end.1
        )
    }
}

/// Ordered classification table; the first matching range wins
pub static ZODIAC_TABLE: [DateRange; 12] = [
    DateRange::new((1, 20), (2, 18), ZodiacSign::Aquarius),
    DateRange::new((2, 19), (3, 20), ZodiacSign::Pisces),
    DateRange::new((3, 21), (4, 19), ZodiacSign::Aries),
    DateRange::new((4, 20), (5, 20), ZodiacSign::Taurus),
    DateRange::new((5, 21), (6, 21), ZodiacSign::Gemini),
    DateRange::new((6, 22), (7, 22), ZodiacSign::Cancer),
    DateRange::new((7, 23), (8, 22), ZodiacSign::Leo),
    DateRange::new((8, 23), (9, 22), ZodiacSign::Virgo),
    DateRange::new((9, 23), (10, 22), ZodiacSign::Libra),
    DateRange::new((10, 23), (11, 22), ZodiacSign::Scorpio),
    DateRange::new((11, 23), (12, 21), ZodiacSign::Sagittarius),
    DateRange::new((12, 22), (1, 19), ZodiacSign::Capricorn),
];

/// Map a (month, day) pair to its zodiac sign
///
/// Calendar validity is not checked here; callers parse dates first. For
/// every real calendar date the result is `Some`.
///
/// # Examples
///
/// ```
/// use zodiac_fortune::zodiac::{classify, ZodiacSign};
///
/// assert_eq!(classify(1, 20), Some(ZodiacSign::Aquarius));
/// assert_eq!(classify(12, 25), Some(ZodiacSign::Capricorn));
/// ```
pub fn classify(month: u32, day: u32) -> Option<ZodiacSign> {
    ZODIAC_TABLE
        .iter()
        .find(|range| range.contains(month, day))
        .map(|range| range.sign)
}

/// Parse a `YYYY-MM-DD` birth date
///
/// # Errors
///
/// Returns `FortuneError::Validation` if the string is not a real calendar
/// date in the expected format.
///
/// # Examples
///
/// ```
/// use zodiac_fortune::zodiac::parse_birth_date;
///
/// assert!(parse_birth_date("1990-05-21").is_ok());
/// assert!(parse_birth_date("not-a-date").is_err());
/// ```
pub fn parse_birth_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, BIRTH_DATE_FORMAT).map_err(|e| {
        tracing::debug!("Rejected birth date {:?}: {}", trimmed, e);
        FortuneError::Validation(format!(
            "Birth date must look like YYYY-MM-DD (e.g. 1990-05-21), got '{}'",
            trimmed
        ))
        .into()
    })
}
