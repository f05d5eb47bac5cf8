//! Date extraction from daily-note paths.
//!
//! A path format is a string such as `YYYY/MM/YYYY-MM-DD` built from the
//! tokens `YYYY` (4-digit year), `MM`/`DD` (2-digit month/day) and `M`/`D`
//! (1-2 digit month/day). Every other character, `/` included, is a literal
//! that must appear verbatim in the path.
//!
//! When a field appears more than once, the file name's own occurrence is
//! used first and the folder occurrences only fill in fields the file name
//! lacks. Within that order, the first capture of a field wins.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::constants::{DEFAULT_PATH_FORMAT, NOTE_EXTENSION};
use crate::date_range::DayRange;
use crate::error::{NotecalError, NotecalResult};

/// A date field a token can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Year,
    Month,
    Day,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::Year => f.write_str("year"),
            DateField::Month => f.write_str("month"),
            DateField::Day => f.write_str("day"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateToken {
    /// `YYYY`
    YearFull,
    /// `MM`
    MonthPadded,
    /// `M`
    MonthUnpadded,
    /// `DD`
    DayPadded,
    /// `D`
    DayUnpadded,
}

impl DateToken {
    pub fn field(self) -> DateField {
        match self {
            DateToken::YearFull => DateField::Year,
            DateToken::MonthPadded | DateToken::MonthUnpadded => DateField::Month,
            DateToken::DayPadded | DateToken::DayUnpadded => DateField::Day,
        }
    }

    fn digits(self) -> &'static str {
        match self {
            DateToken::YearFull => "[0-9]{4}",
            DateToken::MonthPadded | DateToken::DayPadded => "[0-9]{2}",
            DateToken::MonthUnpadded | DateToken::DayUnpadded => "[0-9]{1,2}",
        }
    }

    /// Longest tokens first so `YYYY` is never read as literal `Y`s and
    /// `MM` is never read as two `M`s.
    const GRAMMAR: [(&'static str, DateToken); 5] = [
        ("YYYY", DateToken::YearFull),
        ("MM", DateToken::MonthPadded),
        ("DD", DateToken::DayPadded),
        ("M", DateToken::MonthUnpadded),
        ("D", DateToken::DayUnpadded),
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatToken {
    Literal(String),
    Date {
        token: DateToken,
        /// Number of `/` literals before this token
        segment: usize,
    },
}

/// Why a path did not yield a date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseFailure {
    #[error("path does not match the format")]
    PatternMismatch,

    #[error("format has no {0} token")]
    MissingField(DateField),

    #[error("{field} {value} is out of range")]
    OutOfRange { field: DateField, value: u32 },

    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    NotACalendarDate { year: i32, month: u32, day: u32 },

    #[error("could not compile format: {0}")]
    Pattern(String),
}

/// A compiled path format.
#[derive(Debug, Clone)]
pub struct PathFormat {
    source: String,
    tokens: Vec<FormatToken>,
    pattern: Regex,
}

impl PathFormat {
    pub fn compile(format: &str) -> Result<Self, DateParseFailure> {
        let tokens = tokenize(format);

        let mut pattern = String::from("^");
        for token in &tokens {
            match token {
                FormatToken::Literal(text) => pattern.push_str(&regex::escape(text)),
                FormatToken::Date { token, .. } => {
                    pattern.push('(');
                    pattern.push_str(token.digits());
                    pattern.push(')');
                }
            }
        }
        pattern.push('$');

        Ok(PathFormat {
            source: format.to_string(),
            tokens,
            pattern: Regex::new(&pattern).map_err(|e| DateParseFailure::Pattern(e.to_string()))?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[FormatToken] {
        &self.tokens
    }

    /// Extract the date encoded in `path`.
    pub fn extract(&self, path: &str) -> NotecalResult<ExtractedDate> {
        self.resolve(path).map_err(|reason| NotecalError::InvalidDateFormat {
            path: path.to_string(),
            format: self.source.clone(),
            reason,
        })
    }

    /// Build the (extension-less) path this format gives for `date`.
    pub fn format_date(&self, date: NaiveDate) -> String {
        use chrono::Datelike;

        let mut out = String::new();
        for token in &self.tokens {
            match token {
                FormatToken::Literal(text) => out.push_str(text),
                FormatToken::Date { token, .. } => {
                    let part = match token {
                        DateToken::YearFull => format!("{:04}", date.year()),
                        DateToken::MonthPadded => format!("{:02}", date.month()),
                        DateToken::MonthUnpadded => date.month().to_string(),
                        DateToken::DayPadded => format!("{:02}", date.day()),
                        DateToken::DayUnpadded => date.day().to_string(),
                    };
                    out.push_str(&part);
                }
            }
        }
        out
    }

    fn resolve(&self, path: &str) -> Result<ExtractedDate, DateParseFailure> {
        let stem = path.strip_suffix(NOTE_EXTENSION).unwrap_or(path);
        let captures = self
            .pattern
            .captures(stem)
            .ok_or(DateParseFailure::PatternMismatch)?;

        let mut year: Option<i32> = None;
        let mut month: Option<u32> = None;
        let mut day: Option<u32> = None;

        for (group, token) in self.resolution_order() {
            let Some(text) = captures.get(group).map(|m| m.as_str()) else {
                continue;
            };
            // Captures are 1-4 ASCII digits
            let value: u32 = text.parse().map_err(|_| DateParseFailure::PatternMismatch)?;

            match token.field() {
                DateField::Year if year.is_none() => year = Some(value as i32),
                DateField::Month if month.is_none() => month = Some(value),
                DateField::Day if day.is_none() => day = Some(value),
                _ => {}
            }
        }

        let year = year.ok_or(DateParseFailure::MissingField(DateField::Year))?;
        let month = month.ok_or(DateParseFailure::MissingField(DateField::Month))?;
        let day = day.ok_or(DateParseFailure::MissingField(DateField::Day))?;

        if !(1..=12).contains(&month) {
            return Err(DateParseFailure::OutOfRange {
                field: DateField::Month,
                value: month,
            });
        }
        if !(1..=31).contains(&day) {
            return Err(DateParseFailure::OutOfRange {
                field: DateField::Day,
                value: day,
            });
        }

        // from_ymd_opt refuses Feb 30 and friends instead of rolling over
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(DateParseFailure::NotACalendarDate { year, month, day })?;

        Ok(ExtractedDate {
            year,
            month,
            day,
            date,
        })
    }

    /// Capture group index and token for every date token: file-name tokens
    /// first, then folder tokens, each in format order.
    fn resolution_order(&self) -> Vec<(usize, DateToken)> {
        let date_tokens: Vec<(usize, DateToken, usize)> = self
            .tokens
            .iter()
            .filter_map(|t| match t {
                FormatToken::Date { token, segment } => Some((*token, *segment)),
                FormatToken::Literal(_) => None,
            })
            .enumerate()
            .map(|(i, (token, segment))| (i + 1, token, segment))
            .collect();

        let file_segment = self.separator_count();
        let (file, folders): (Vec<_>, Vec<_>) = date_tokens
            .into_iter()
            .partition(|(_, _, segment)| *segment == file_segment);

        file.into_iter()
            .chain(folders)
            .map(|(group, token, _)| (group, token))
            .collect()
    }

    fn separator_count(&self) -> usize {
        self.tokens
            .iter()
            .map(|t| match t {
                FormatToken::Literal(text) => text.matches('/').count(),
                FormatToken::Date { .. } => 0,
            })
            .sum()
    }
}

fn tokenize(format: &str) -> Vec<FormatToken> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut segment = 0;
    let mut rest = format;

    'outer: while !rest.is_empty() {
        for (text, token) in DateToken::GRAMMAR {
            if let Some(after) = rest.strip_prefix(text) {
                if !literal.is_empty() {
                    tokens.push(FormatToken::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(FormatToken::Date { token, segment });
                rest = after;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '/' {
                segment += 1;
            }
            literal.push(c);
        }
        rest = chars.as_str();
    }

    if !literal.is_empty() {
        tokens.push(FormatToken::Literal(literal));
    }
    tokens
}

/// A calendar date read from a note path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub date: NaiveDate,
}

impl ExtractedDate {
    /// Local midnight at the start of the date.
    pub fn midnight(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }

    pub fn day_range(&self, timezone: Tz) -> DayRange {
        DayRange::for_date(self.date, timezone)
    }
}

/// Where the path format in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSource {
    /// Passed by the caller (configured path format)
    Explicit,
    /// The host's daily-notes configuration
    DailyNotes,
    Default,
}

/// Pick the format to use: explicit, then daily-notes, then [`DEFAULT_PATH_FORMAT`].
/// Formats are trimmed and blank strings count as absent.
pub fn resolve_format<'a>(
    explicit: Option<&'a str>,
    daily_notes: Option<&'a str>,
) -> (&'a str, FormatSource) {
    let non_blank = |f: Option<&'a str>| f.map(str::trim).filter(|s| !s.is_empty());

    if let Some(format) = non_blank(explicit) {
        (format, FormatSource::Explicit)
    } else if let Some(format) = non_blank(daily_notes) {
        (format, FormatSource::DailyNotes)
    } else {
        (DEFAULT_PATH_FORMAT, FormatSource::Default)
    }
}

/// Resolve the format and extract the date from `path`.
pub fn extract_date_from_file(
    path: &str,
    explicit_format: Option<&str>,
    daily_notes_format: Option<&str>,
) -> NotecalResult<ExtractedDate> {
    let (format, source) = resolve_format(explicit_format, daily_notes_format);
    info!(format, ?source, "Using daily note path format");

    let compiled = PathFormat::compile(format).map_err(|reason| NotecalError::InvalidDateFormat {
        path: path.to_string(),
        format: format.to_string(),
        reason,
    })?;

    let extracted = compiled.extract(path)?;
    debug!(path, date = %extracted.date, "Extracted date from note path");
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration};

    fn extract(path: &str, format: &str) -> NotecalResult<ExtractedDate> {
        PathFormat::compile(format).unwrap().extract(path)
    }

    fn assert_date(result: NotecalResult<ExtractedDate>, year: i32, month: u32, day: u32) {
        let extracted = result.expect("should extract a date");
        assert_eq!(
            (extracted.year, extracted.month, extracted.day),
            (year, month, day)
        );
        assert_eq!(extracted.date, NaiveDate::from_ymd_opt(year, month, day).unwrap());
    }

    fn assert_invalid(result: NotecalResult<ExtractedDate>) -> DateParseFailure {
        match result {
            Err(NotecalError::InvalidDateFormat { reason, .. }) => reason,
            other => panic!("Expected InvalidDateFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_tokenize_greedy() {
        let format = PathFormat::compile("YYYY/M/DD").unwrap();
        assert_eq!(
            format.tokens(),
            &[
                FormatToken::Date { token: DateToken::YearFull, segment: 0 },
                FormatToken::Literal("/".into()),
                FormatToken::Date { token: DateToken::MonthUnpadded, segment: 1 },
                FormatToken::Literal("/".into()),
                FormatToken::Date { token: DateToken::DayPadded, segment: 2 },
            ]
        );
    }

    #[test]
    fn test_simple_format() {
        assert_date(extract("2025-10-28.md", "YYYY-MM-DD"), 2025, 10, 28);
    }

    #[test]
    fn test_path_without_extension() {
        assert_date(extract("2025-10-28", "YYYY-MM-DD"), 2025, 10, 28);
    }

    #[test]
    fn test_only_one_extension_is_stripped() {
        assert_invalid(extract("2025-10-28.md.md", "YYYY-MM-DD"));
    }

    #[test]
    fn test_folder_layout() {
        assert_date(extract("2025/10/28.md", "YYYY/MM/DD"), 2025, 10, 28);
    }

    #[test]
    fn test_unpadded_month_and_day() {
        assert_date(extract("2025/3/5.md", "YYYY/M/D"), 2025, 3, 5);
        assert_date(extract("2025/12/31.md", "YYYY/M/D"), 2025, 12, 31);
    }

    #[test]
    fn test_repeated_fields_use_file_name_date() {
        assert_date(
            extract("2025/11/2025-10-28.md", "YYYY/MM/YYYY-MM-DD"),
            2025,
            10,
            28,
        );
    }

    #[test]
    fn test_repeated_fields_fall_back_to_folders() {
        // Only the day lives in the file name
        assert_date(extract("2024/02/2024-29.md", "YYYY/MM/YYYY-DD"), 2024, 2, 29);
    }

    #[test]
    fn test_repeated_field_in_same_segment_first_wins() {
        assert_date(extract("2025-10-28_2025-11-30.md", "YYYY-MM-DD_YYYY-MM-DD"), 2025, 10, 28);
    }

    #[test]
    fn test_literals_are_not_regex_syntax() {
        assert_date(extract("journal.2025.10.28.md", "journal.YYYY.MM.DD"), 2025, 10, 28);
        assert_invalid(extract("journalx2025x10x28.md", "journal.YYYY.MM.DD"));
        assert_date(extract("(2025)[10]+28.md", "(YYYY)[MM]+DD"), 2025, 10, 28);
    }

    #[test]
    fn test_non_ascii_literals() {
        assert_date(extract("2025年10月28日.md", "YYYY年MM月DD日"), 2025, 10, 28);
    }

    #[test]
    fn test_match_is_anchored() {
        assert_invalid(extract("notes/2025-10-28.md", "YYYY-MM-DD"));
        assert_invalid(extract("2025-10-28-extra.md", "YYYY-MM-DD"));
    }

    #[test]
    fn test_width_constraints() {
        assert_invalid(extract("25-10-28.md", "YYYY-MM-DD"));
        assert_invalid(extract("2025-1-28.md", "YYYY-MM-DD"));
        assert_invalid(extract("2025/123/5.md", "YYYY/M/D"));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert_invalid(extract("２０２５-10-28.md", "YYYY-MM-DD"));
    }

    #[test]
    fn test_invalid_path() {
        let reason = assert_invalid(extract("invalid-path.md", "YYYY-MM-DD"));
        assert_eq!(reason, DateParseFailure::PatternMismatch);
    }

    #[test]
    fn test_invalid_month() {
        let reason = assert_invalid(extract("2025-13-15.md", "YYYY-MM-DD"));
        assert_eq!(
            reason,
            DateParseFailure::OutOfRange { field: DateField::Month, value: 13 }
        );
        assert_invalid(extract("2025-00-15.md", "YYYY-MM-DD"));
    }

    #[test]
    fn test_invalid_day() {
        let reason = assert_invalid(extract("2025-10-32.md", "YYYY-MM-DD"));
        assert_eq!(
            reason,
            DateParseFailure::OutOfRange { field: DateField::Day, value: 32 }
        );
        assert_invalid(extract("2025-10-00.md", "YYYY-MM-DD"));
    }

    #[test]
    fn test_no_rollover() {
        let reason = assert_invalid(extract("2025-02-30.md", "YYYY-MM-DD"));
        assert_eq!(
            reason,
            DateParseFailure::NotACalendarDate { year: 2025, month: 2, day: 30 }
        );
        assert_invalid(extract("2025-04-31.md", "YYYY-MM-DD"));
    }

    #[test]
    fn test_leap_years() {
        assert_date(extract("2024-02-29.md", "YYYY-MM-DD"), 2024, 2, 29);
        assert_date(extract("2000-02-29.md", "YYYY-MM-DD"), 2000, 2, 29);
        assert_invalid(extract("2025-02-29.md", "YYYY-MM-DD"));
        assert_invalid(extract("1900-02-29.md", "YYYY-MM-DD"));
    }

    #[test]
    fn test_year_boundaries() {
        assert_date(extract("2025-01-01.md", "YYYY-MM-DD"), 2025, 1, 1);
        assert_date(extract("2025-12-31.md", "YYYY-MM-DD"), 2025, 12, 31);
    }

    #[test]
    fn test_format_without_a_field() {
        let reason = assert_invalid(extract("2025-10.md", "YYYY-MM"));
        assert_eq!(reason, DateParseFailure::MissingField(DateField::Day));
    }

    #[test]
    fn test_error_carries_path_and_format() {
        match extract("invalid-path.md", "YYYY-MM-DD") {
            Err(NotecalError::InvalidDateFormat { path, format, .. }) => {
                assert_eq!(path, "invalid-path.md");
                assert_eq!(format, "YYYY-MM-DD");
            }
            other => panic!("Expected InvalidDateFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_every_day() {
        let formats = ["YYYY-MM-DD", "YYYY/M/D", "YYYY/MM/YYYY-MM-DD", "DD.MM.YYYY"];

        for format in formats {
            let compiled = PathFormat::compile(format).unwrap();
            for year in [2023, 2024] {
                let mut date = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
                while date.year() == year {
                    let path = format!("{}.md", compiled.format_date(date));
                    let extracted = compiled.extract(&path).unwrap();
                    assert_eq!(
                        (extracted.year, extracted.month, extracted.day),
                        (date.year(), date.month(), date.day()),
                        "round trip of {} with {}",
                        path,
                        format
                    );
                    date += Duration::days(1);
                }
            }
        }
    }

    #[test]
    fn test_midnight() {
        let extracted = extract("2025-10-28.md", "YYYY-MM-DD").unwrap();
        assert_eq!(extracted.midnight().to_string(), "2025-10-28 00:00:00");
    }

    #[test]
    fn test_resolve_format_precedence() {
        assert_eq!(
            resolve_format(Some("YYYY/MM/DD"), Some("DD-MM-YYYY")),
            ("YYYY/MM/DD", FormatSource::Explicit)
        );
        assert_eq!(
            resolve_format(None, Some("DD-MM-YYYY")),
            ("DD-MM-YYYY", FormatSource::DailyNotes)
        );
        assert_eq!(
            resolve_format(Some("  "), Some("DD-MM-YYYY")),
            ("DD-MM-YYYY", FormatSource::DailyNotes)
        );
        assert_eq!(resolve_format(None, Some("")), ("YYYY-MM-DD", FormatSource::Default));
        assert_eq!(resolve_format(None, None), ("YYYY-MM-DD", FormatSource::Default));
    }

    #[test]
    fn test_padded_formats_are_trimmed() {
        assert_eq!(
            resolve_format(Some(" YYYY/MM/DD\t"), None),
            ("YYYY/MM/DD", FormatSource::Explicit)
        );
        assert_eq!(
            resolve_format(None, Some("DD-MM-YYYY ")),
            ("DD-MM-YYYY", FormatSource::DailyNotes)
        );
        assert_date(
            extract_date_from_file("2025-10-28.md", Some("YYYY-MM-DD "), None),
            2025,
            10,
            28,
        );
    }

    #[test]
    fn test_extract_date_from_file_uses_each_source() {
        assert_date(
            extract_date_from_file("2025/10/28.md", Some("YYYY/MM/DD"), Some("DD-MM-YYYY")),
            2025,
            10,
            28,
        );
        assert_date(
            extract_date_from_file("28-10-2025.md", None, Some("DD-MM-YYYY")),
            2025,
            10,
            28,
        );
        assert_date(extract_date_from_file("2025-10-28.md", None, None), 2025, 10, 28);
    }
}
