//! Turns free text into an ordered sequence of [`ParsedEvent`]s.
//!
//! The text is split into clauses on sentence terminators and connective
//! words; a left fold carries the most recently seen explicit date and
//! currency into clauses that do not state their own. A clause yields an
//! event only when both an action verb and an amount are recognized.

pub mod date;
pub mod event;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

pub use event::{ActionKind, ParsedEvent};

use date::{parse_clause_date, scrub_dates, strip_ordinals};

/// Caller-pinned extraction context. `today` anchors year inference so the
/// whole pipeline stays deterministic under test.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub today: NaiveDate,
    pub default_currency: String,
}

// A period only terminates a clause at a word break; one sitting between
// digits is a decimal point and must stay inside the amount token.
static CLAUSE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[;!?\n]+|\.+(?:\s+|$)|\b(?:and\s+then|and\s+also|then|also)\b").unwrap()
});

static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?").unwrap());

static ACTIONS: Lazy<[(ActionKind, Regex); 5]> = Lazy::new(|| {
    [
        (
            ActionKind::Borrow,
            Regex::new(r"(?i)\bborrow(?:s|ed|ing)?\b").unwrap(),
        ),
        (
            ActionKind::Lend,
            Regex::new(r"(?i)\b(?:lend(?:s|ing)?|lent)\b").unwrap(),
        ),
        (
            ActionKind::Buy,
            Regex::new(r"(?i)\b(?:buy(?:s|ing)?|bought|purchas(?:e|es|ed|ing))\b").unwrap(),
        ),
        (
            ActionKind::Sell,
            Regex::new(r"(?i)\b(?:sell(?:s|ing)?|sold)\b").unwrap(),
        ),
        (
            ActionKind::Spend,
            Regex::new(r"(?i)\b(?:spend(?:s|ing)?|spent|pay(?:s|ing)?|paid)\b").unwrap(),
        ),
    ]
});

static FRIEND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:a|my)\s+friend\b").unwrap());

static TO_PARTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bto\s+((?:[A-Za-z][A-Za-z']*\s*){1,4})").unwrap());

static FROM_PARTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfrom\s+((?:[A-Za-z][A-Za-z']*\s*){1,4})").unwrap());

static FOR_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bfor\b").unwrap());

static TRAILING_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:on|for|of)\s+([A-Za-z][A-Za-z\s]{0,60})$").unwrap());

static CURRENCIES: &[(&str, &[&str])] = &[
    ("AED", &["aed", "dirham", "dirhams"]),
    ("USD", &["usd", "dollar", "dollars", "$"]),
    ("EUR", &["eur", "euro", "euros", "€"]),
];

/// Extracts events from a block of free text.
///
/// If clause-level splitting produces no events at all, the whole input is
/// retried once as a single clause; single-sentence inputs with embedded
/// connectives sometimes still read as one action.
pub fn extract_events(text: &str, options: &ExtractOptions) -> Vec<ParsedEvent> {
    let clauses: Vec<&str> = CLAUSE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .collect();

    let (events, _) = clauses.iter().fold(
        (Vec::new(), Context::default()),
        |(mut events, context), clause| {
            let (event, context) = extract_clause(clause, context, options);
            events.extend(event);
            (events, context)
        },
    );

    if events.is_empty() && clauses.len() > 1 {
        let (event, _) = extract_clause(text.trim(), Context::default(), options);
        return event.into_iter().collect();
    }

    tracing::debug!(clauses = clauses.len(), events = events.len(), "extraction done");
    events
}

/// Running context threaded through the clause fold.
#[derive(Debug, Clone, Default)]
struct Context {
    date: Option<NaiveDate>,
    currency: Option<String>,
}

fn extract_clause(
    clause: &str,
    mut context: Context,
    options: &ExtractOptions,
) -> (Option<ParsedEvent>, Context) {
    let cleaned = strip_ordinals(clause);

    if let Some(date) = parse_clause_date(&cleaned, options.today) {
        context.date = Some(date);
    }
    if let Some(code) = detect_currency(&cleaned) {
        context.currency = Some(code.to_string());
    }

    let scrubbed = scrub_dates(&cleaned);
    let action = match detect_action(&scrubbed) {
        Some(action) => action,
        None => return (None, context),
    };
    let amount = match last_amount(&scrubbed) {
        Some(amount) => amount,
        None => return (None, context),
    };

    let event = ParsedEvent {
        action,
        amount,
        date: context.date,
        currency: context
            .currency
            .clone()
            .or_else(|| Some(options.default_currency.clone())),
        counterparty: detect_counterparty(&scrubbed, action),
        item: detect_item(&scrubbed, action),
        category_hint: detect_category_hint(&scrubbed, action),
        source: clause.trim().to_string(),
    };
    (Some(event), context)
}

fn detect_action(clause: &str) -> Option<ActionKind> {
    ACTIONS
        .iter()
        .find(|(_, pattern)| pattern.is_match(clause))
        .map(|(action, _)| *action)
}

/// Last numeric token in the (date-scrubbed) clause. Amounts conventionally
/// trail dates and quantities in this grammar, so the last number wins.
fn last_amount(clause: &str) -> Option<f64> {
    AMOUNT
        .find_iter(clause)
        .last()
        .and_then(|token| token.as_str().replace(',', "").parse().ok())
}

fn detect_currency(clause: &str) -> Option<&'static str> {
    let lowered = clause.to_lowercase();
    for (code, keywords) in CURRENCIES {
        for keyword in *keywords {
            let hit = if keyword.chars().all(|ch| ch.is_alphanumeric()) {
                lowered
                    .split(|ch: char| !ch.is_alphanumeric())
                    .any(|word| word == *keyword)
            } else {
                lowered.contains(keyword)
            };
            if hit {
                return Some(code);
            }
        }
    }
    None
}

fn detect_counterparty(clause: &str, action: ActionKind) -> Option<String> {
    if FRIEND.is_match(clause) {
        return Some("Friend".to_string());
    }
    let pattern = match action {
        ActionKind::Lend | ActionKind::Sell => &*TO_PARTY,
        ActionKind::Borrow | ActionKind::Buy => &*FROM_PARTY,
        ActionKind::Spend => return None,
    };
    let trimmed = trim_party(pattern.captures(clause)?[1].trim());
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Drops leading articles and cuts at keywords the capture drags along.
fn trim_party(raw: &str) -> String {
    let words: Vec<&str> = raw
        .split_whitespace()
        .take_while(|word| {
            !matches!(
                word.to_lowercase().as_str(),
                "for" | "on" | "at" | "of" | "worth" | "and"
            )
        })
        .collect();
    let mut value = words.join(" ");
    for article in ["the ", "a ", "an "] {
        let stripped = value
            .get(..article.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(article))
            .map(|_| value[article.len()..].trim().to_string());
        if let Some(rest) = stripped {
            value = rest;
        }
    }
    value
}

/// Text between the action verb and "for" (buy/sell only).
fn detect_item(clause: &str, action: ActionKind) -> Option<String> {
    if !matches!(action, ActionKind::Buy | ActionKind::Sell) {
        return None;
    }
    let (_, verb) = ACTIONS
        .iter()
        .find(|(kind, _)| *kind == action)
        .expect("action table covers all kinds");
    let verb_end = verb.find(clause)?.end();
    let rest = &clause[verb_end..];
    let for_at = FOR_BREAK.find(rest)?.start();
    let item = trim_party(rest[..for_at].trim());
    (!item.is_empty()).then_some(item)
}

/// Trailing "on"/"for"/"of" clause, used downstream only as a hint.
fn detect_category_hint(clause: &str, action: ActionKind) -> Option<String> {
    if !matches!(action, ActionKind::Buy | ActionKind::Spend) {
        return None;
    }
    let trimmed = clause.trim_end_matches([' ', ',', ')']);
    let captured = TRAILING_HINT.captures(trimmed)?[1].trim().to_string();
    (!captured.is_empty()).then_some(captured)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ExtractOptions {
        ExtractOptions {
            today: NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            default_currency: "AED".into(),
        }
    }

    #[test]
    fn borrow_clause_with_slash_date() {
        let events = extract_events("on 25/12/25 I borrowed 1000", &options());
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.action, ActionKind::Borrow);
        assert_eq!(event.amount, 1000.0);
        assert_eq!(
            event.date,
            Some(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap())
        );
    }

    #[test]
    fn context_carries_date_and_currency_forward() {
        let events = extract_events(
            "on 2025-03-10 I borrowed 500 dirhams, then lent 200 to Omar",
            &options(),
        );
        assert_eq!(events.len(), 2);
        let lend = &events[1];
        assert_eq!(lend.action, ActionKind::Lend);
        assert_eq!(lend.date, Some(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
        assert_eq!(lend.currency.as_deref(), Some("AED"));
        assert_eq!(lend.counterparty.as_deref(), Some("Omar"));
    }

    #[test]
    fn day_of_month_is_not_the_amount() {
        let events = extract_events("spent 50 on groceries on 3 March 2025", &options());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].amount, 50.0);
        assert_eq!(events[0].category_hint.as_deref(), Some("groceries"));
    }

    #[test]
    fn last_number_wins_and_separators_parse() {
        let events = extract_events("I paid 2 invoices totalling 1,250.75", &options());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].amount, 1250.75);
    }

    #[test]
    fn decimal_amounts_survive_sentence_splitting() {
        let events = extract_events("paid 10.50 for lunch. then borrowed 20", &options());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].amount, 10.50);
        assert_eq!(events[1].amount, 20.0);
    }

    #[test]
    fn buy_extracts_item_and_category_hint() {
        let events = extract_events("I bought 300 AED worth of goods", &options());
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.action, ActionKind::Buy);
        assert_eq!(event.amount, 300.0);
        assert_eq!(event.currency.as_deref(), Some("AED"));
        assert_eq!(event.category_hint.as_deref(), Some("goods"));

        let events = extract_events("bought a chair for 200 from Ikea", &options());
        assert_eq!(events[0].item.as_deref(), Some("chair"));
        assert_eq!(events[0].counterparty.as_deref(), Some("Ikea"));
    }

    #[test]
    fn friend_phrase_is_a_counterparty() {
        let events = extract_events("lent 100 to a friend", &options());
        assert_eq!(events[0].counterparty.as_deref(), Some("Friend"));
    }

    #[test]
    fn leading_articles_strip_regardless_of_case() {
        let events = extract_events("lent 100 to The Bank", &options());
        assert_eq!(events[0].counterparty.as_deref(), Some("Bank"));
        let events = extract_events("lent 100 to the bank", &options());
        assert_eq!(events[0].counterparty.as_deref(), Some("bank"));
    }

    #[test]
    fn clause_without_action_or_amount_yields_nothing() {
        assert!(extract_events("the weather was nice", &options()).is_empty());
        assert!(extract_events("I borrowed from the library", &options()).is_empty());
    }

    #[test]
    fn currency_symbol_detection() {
        let events = extract_events("spent $45 on parking", &options());
        assert_eq!(events[0].currency.as_deref(), Some("USD"));
    }

    #[test]
    fn default_currency_applies_when_unstated() {
        let events = extract_events("borrowed 700", &options());
        assert_eq!(events[0].currency.as_deref(), Some("AED"));
    }
}
