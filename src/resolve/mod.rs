//! Maps free-text account names onto a governed chart of accounts.
//!
//! Resolution is deliberately conservative: exact normalized match first,
//! then a fuzzy best-of-N score against the chart, then a configured default
//! expense fallback for pure-debit lines. Names that clear none of those are
//! reported as unresolved; the resolver never invents accounts.

use strsim::levenshtein;

const CONTAINMENT_SCORE: f64 = 0.92;
const TOKEN_WEIGHT: f64 = 0.75;
const EDIT_WEIGHT: f64 = 0.25;
const EDIT_FLOOR_WEIGHT: f64 = 0.85;

const STOP_WORDS: &[&str] = &["a", "an", "the", "of", "for", "to", "and", "in", "on"];

/// Outcome of resolving one raw account name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Canonical chart name, via exact or fuzzy match.
    Matched(String),
    /// No match cleared the threshold; rerouted to the default expense
    /// account because the line is a pure debit.
    Fallback(String),
    /// Surfaced to the caller; the raw name is kept on the line as-is.
    Unresolved,
}

impl Resolution {
    pub fn name(&self) -> Option<&str> {
        match self {
            Resolution::Matched(name) | Resolution::Fallback(name) => Some(name),
            Resolution::Unresolved => None,
        }
    }
}

/// Resolver over one entity's chart allow-list.
pub struct Resolver<'a> {
    names: &'a [String],
    threshold: f64,
    default_expense: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(names: &'a [String], threshold: f64, default_expense: &'a str) -> Self {
        Self {
            names,
            threshold,
            default_expense,
        }
    }

    /// Resolves `raw`. `pure_debit` describes the line the name will sit on
    /// (debit > 0, credit == 0) and gates the default-expense fallback.
    pub fn resolve(&self, raw: &str, pure_debit: bool) -> Resolution {
        let needle = normalize(raw);
        if needle.is_empty() {
            return self.fallback_or_unresolved(pure_debit);
        }

        if let Some(name) = self
            .names
            .iter()
            .find(|name| normalize(name) == needle)
        {
            return Resolution::Matched(name.clone());
        }

        if let Some((name, score)) = self.best_match(raw) {
            if score >= self.threshold {
                tracing::debug!(raw, matched = %name, score, "fuzzy account match");
                return Resolution::Matched(name.to_string());
            }
            tracing::debug!(raw, closest = %name, score, "no account cleared threshold");
        }

        self.fallback_or_unresolved(pure_debit)
    }

    /// Best-scoring chart name for `raw`, if the chart is non-empty.
    pub fn best_match(&self, raw: &str) -> Option<(&'a str, f64)> {
        self.names
            .iter()
            .map(|name| (name.as_str(), similarity(raw, name)))
            .max_by(|left, right| left.1.total_cmp(&right.1))
    }

    fn fallback_or_unresolved(&self, pure_debit: bool) -> Resolution {
        if pure_debit {
            Resolution::Fallback(self.default_expense.to_string())
        } else {
            Resolution::Unresolved
        }
    }
}

/// Canonical form used for matching: lowercase, `&` spelled out, punctuation
/// other than `/` stripped, whitespace collapsed.
pub fn normalize(name: &str) -> String {
    let replaced = name.to_lowercase().replace('&', " and ");
    let cleaned: String = replaced
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '/' {
                ch
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity of two account names in 0..1.
///
/// Substring containment scores a fixed 0.92. Otherwise a token-set Jaccard
/// blend with normalized edit distance, floored against edit distance alone
/// so token-sparse near-identical names still score well.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return CONTAINMENT_SCORE;
    }

    let edit = edit_similarity(&a, &b);
    let token = token_jaccard(&a, &b);
    let blended = TOKEN_WEIGHT * token + EDIT_WEIGHT * edit;
    blended.max(EDIT_FLOOR_WEIGHT * edit)
}

fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

fn token_jaccard(a: &str, b: &str) -> f64 {
    let tokens_a = content_tokens(a);
    let tokens_b = content_tokens(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let shared = tokens_a.iter().filter(|token| tokens_b.contains(token)).count();
    let union = tokens_a.len() + tokens_b.len() - shared;
    shared as f64 / union as f64
}

fn content_tokens(value: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = value
        .split_whitespace()
        .filter(|token| !STOP_WORDS.contains(token))
        .collect();
    tokens.sort_unstable();
    tokens.dedup();
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> Vec<String> {
        [
            "Cash",
            "Accounts Receivable",
            "Loan Payable",
            "Purchases/Expense",
            "Revenue",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    #[test]
    fn exact_match_is_idempotent() {
        let names = chart();
        let resolver = Resolver::new(&names, 0.72, "Purchases/Expense");
        assert_eq!(
            resolver.resolve("Cash", true),
            Resolution::Matched("Cash".into())
        );
    }

    #[test]
    fn normalization_handles_case_and_whitespace() {
        let names = chart();
        let resolver = Resolver::new(&names, 0.72, "Purchases/Expense");
        assert_eq!(
            resolver.resolve("  cAsH ", false),
            Resolution::Matched("Cash".into())
        );
    }

    #[test]
    fn fuzzy_floor_pair_resolves() {
        assert!(similarity("Purchases / Expense", "purchases expense") >= 0.72);
    }

    #[test]
    fn unrelated_names_stay_below_threshold() {
        assert!(similarity("Cash", "Loan Payable") < 0.72);
    }

    #[test]
    fn containment_scores_fixed() {
        assert_eq!(similarity("Receivable", "Accounts Receivable"), 0.92);
    }

    #[test]
    fn unmatched_pure_debit_falls_back_to_expense() {
        let names = chart();
        let resolver = Resolver::new(&names, 0.72, "Purchases/Expense");
        assert_eq!(
            resolver.resolve("Office Snacks", true),
            Resolution::Fallback("Purchases/Expense".into())
        );
        assert_eq!(resolver.resolve("Office Snacks", false), Resolution::Unresolved);
    }

    #[test]
    fn ampersand_normalizes_to_and() {
        assert_eq!(normalize("R&D Costs"), "r and d costs");
    }
}
