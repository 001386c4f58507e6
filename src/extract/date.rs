//! Clause-level date recognition.
//!
//! Accepts ISO (`YYYY-MM-DD`), slash (`D/M`, `D/M/YY`, `D/M/YYYY`), and
//! textual (`25 December 2025`, `Dec 25`) forms. A missing year is inferred
//! as the current year unless that lands in the future, in which case it
//! rolls back one year. Anything unrecognized is simply not a date; the
//! caller falls back to carried context.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2}|\d{4}))?\b").unwrap());

const MONTHS: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})\s+({MONTHS})\b,?(?:\s+(\d{{4}}))?"
    ))
    .unwrap()
});

static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTHS})\b\.?\s+(\d{{1,2}})\b,?(?:\s+(\d{{4}}))?"
    ))
    .unwrap()
});

/// Drops ordinal suffixes ("25th" -> "25") so date patterns can match.
pub fn strip_ordinals(clause: &str) -> String {
    ORDINAL.replace_all(clause, "$1").into_owned()
}

/// Extracts the first recognizable date in the clause, if any.
pub fn parse_clause_date(clause: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = ISO_DATE.captures(clause) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }
    if let Some(caps) = SLASH_DATE.captures(clause) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year = caps.get(3).and_then(|m| m.as_str().parse::<i32>().ok());
        if let Some(date) = resolve_ymd(day, month, year, today) {
            return Some(date);
        }
    }
    if let Some(caps) = DAY_MONTH.captures(clause) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let year = caps.get(3).and_then(|m| m.as_str().parse::<i32>().ok());
        if let Some(date) = resolve_ymd(day, month, year, today) {
            return Some(date);
        }
    }
    if let Some(caps) = MONTH_DAY.captures(clause) {
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year = caps.get(3).and_then(|m| m.as_str().parse::<i32>().ok());
        if let Some(date) = resolve_ymd(day, month, year, today) {
            return Some(date);
        }
    }
    None
}

static SCRUB: Lazy<[Regex; 4]> = Lazy::new(|| {
    let with_preposition = |body: &str| {
        Regex::new(&format!(r"(?i)(?:\bon\s+)?{body}")).unwrap()
    };
    [
        with_preposition(r"\b\d{4}-\d{2}-\d{2}\b"),
        with_preposition(r"\b\d{1,2}/\d{1,2}(?:/(?:\d{2}|\d{4}))?\b"),
        with_preposition(&format!(r"\b\d{{1,2}}\s+(?:{MONTHS})\b,?(?:\s+\d{{4}})?")),
        with_preposition(&format!(r"\b(?:{MONTHS})\b\.?\s+\d{{1,2}}\b,?(?:\s+\d{{4}})?")),
    ]
});

/// Blanks every recognized date phrase (and its leading "on", when present)
/// so a day or year is never misread as an amount downstream.
pub fn scrub_dates(clause: &str) -> String {
    SCRUB
        .iter()
        .fold(clause.to_string(), |text, pattern| {
            pattern.replace_all(&text, " ").into_owned()
        })
}

fn resolve_ymd(day: u32, month: u32, year: Option<i32>, today: NaiveDate) -> Option<NaiveDate> {
    match year {
        Some(explicit) => {
            // Two-digit years belong to the current era.
            let year = if explicit < 100 { 2000 + explicit } else { explicit };
            NaiveDate::from_ymd_opt(year, month, day)
        }
        None => {
            let candidate = NaiveDate::from_ymd_opt(today.year(), month, day);
            match candidate {
                Some(date) if date > today => {
                    NaiveDate::from_ymd_opt(today.year() - 1, month, day)
                }
                Some(date) => Some(date),
                None => NaiveDate::from_ymd_opt(today.year() - 1, month, day),
            }
        }
    }
}

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.to_lowercase();
    let month = match prefix.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_form() {
        assert_eq!(
            parse_clause_date("paid rent on 2025-12-25", today()),
            Some(date(2025, 12, 25))
        );
    }

    #[test]
    fn slash_form_with_two_digit_year() {
        assert_eq!(
            parse_clause_date("on 25/12/25 I borrowed 1000", today()),
            Some(date(2025, 12, 25))
        );
    }

    #[test]
    fn slash_form_without_year_rolls_back_from_future() {
        // 30 Dec would be in the future relative to 28 Aug 2026.
        assert_eq!(
            parse_clause_date("on 30/12 I paid 50", today()),
            Some(date(2025, 12, 30))
        );
        assert_eq!(
            parse_clause_date("on 2/3 I paid 50", today()),
            Some(date(2026, 3, 2))
        );
    }

    #[test]
    fn textual_forms_with_ordinals() {
        let clause = strip_ordinals("bought a desk on 25th December 2025");
        assert_eq!(parse_clause_date(&clause, today()), Some(date(2025, 12, 25)));
        assert_eq!(
            parse_clause_date("sold goods on Dec 25", today()),
            Some(date(2025, 12, 25))
        );
    }

    #[test]
    fn malformed_dates_are_not_dates() {
        assert_eq!(parse_clause_date("paid 1000 to Omar", today()), None);
        // 25 is not a month; the slash pair fails validation.
        assert_eq!(parse_clause_date("met on 13/25", today()), None);
    }

    #[test]
    fn scrubbing_removes_date_tokens() {
        let scrubbed = scrub_dates("on 25/12/25 I borrowed 1000");
        assert!(!scrubbed.contains("25"));
        assert!(scrubbed.contains("1000"));
    }
}
