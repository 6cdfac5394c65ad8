//! Query text normalization and structural validation.
//!
//! Normalizes raw input and rejects structurally invalid queries before any
//! parsing happens. The output is single-space separated text in which every
//! bracket opens or closes its own token and quoted spans hug their quotes,
//! ready to be split on spaces by the parser.

use crate::{error::SyntaxError, operator::LogicalOperator};

/// Validates and normalizes a raw query string.
///
/// Runs, in order: bracket/quote balance checks, removal of reserved
/// characters (`&`, `|`, `<digits>` markers), whitespace collapsing,
/// bracket and quote spacing normalization, and the operator-adjacency
/// check. Returns the normalized text or the first error found; invalid
/// input is rejected whole, never partially normalized.
pub fn validate(raw: &str) -> Result<String, SyntaxError> {
    check_balance(raw)?;
    let text = strip_reserved(raw);
    let text = collapse_whitespace(&text);
    let text = normalize_paren_spacing(&text);
    let text = split_bracket_clusters(&text);
    let text = normalize_quote_spacing(&text);
    check_operator_adjacency(&text)?;
    Ok(text)
}

/// Checks bracket and quote balance on the raw text.
///
/// Every `)` must close the most recent unmatched `(`, and the total count
/// of `"` characters must be even.
fn check_balance(raw: &str) -> Result<(), SyntaxError> {
    let mut open = 0u32;
    let mut quotes = 0u32;
    for ch in raw.chars() {
        match ch {
            '(' => open += 1,
            ')' => {
                if open == 0 {
                    return Err(SyntaxError::UnbalancedBrackets {
                        query: raw.to_string(),
                    });
                }
                open -= 1;
            }
            '"' => quotes += 1,
            _ => {}
        }
    }
    if open != 0 {
        return Err(SyntaxError::UnbalancedBrackets {
            query: raw.to_string(),
        });
    }
    if quotes % 2 != 0 {
        return Err(SyntaxError::UnbalancedQuotes {
            query: raw.to_string(),
        });
    }
    Ok(())
}

/// Strips stray `&`/`|` characters and residual `<digits>` distance markers.
///
/// Both belong to the compiled output syntax, not the input grammar.
fn strip_reserved(raw: &str) -> String {
    let text = raw.replace(['&', '|'], "");
    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_str();
    while let Some(start) = rest.find('<') {
        let (head, tail) = rest.split_at(start);
        out.push_str(head);
        let after = &tail[1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && after.as_bytes().get(digits) == Some(&b'>') {
            rest = &after[digits + 1..];
        } else {
            out.push('<');
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

/// Collapses whitespace runs to single spaces and trims the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes the space directly inside parentheses: `"( "` -> `"("`, `" )"` -> `")"`.
fn normalize_paren_spacing(text: &str) -> String {
    text.replace("( ", "(").replace(" )", ")")
}

/// Splits clusters of identical bracket characters into separate tokens.
///
/// `"(("` becomes `"( ("` so each bracket parses on its own. Nesting depths
/// 2..=10 are the supported range; deeper input is not rejected here but its
/// behavior is unspecified.
fn split_bracket_clusters(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    for ch in text.chars() {
        if (ch == '(' || ch == ')') && prev == Some(ch) {
            out.push(' ');
        }
        out.push(ch);
        prev = Some(ch);
    }
    out
}

/// Removes the space directly inside each quoted span: `'" '` -> `'"'`,
/// `' "'` -> `'"'`.
fn normalize_quote_spacing(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '"' {
            out.push(ch);
            continue;
        }
        if in_quotes {
            while out.ends_with(' ') {
                out.pop();
            }
            out.push('"');
            in_quotes = false;
        } else {
            out.push('"');
            while chars.peek() == Some(&' ') {
                chars.next();
            }
            in_quotes = true;
        }
    }
    out
}

/// Rejects two operator tokens standing directly next to each other.
///
/// The grammar requires a clause between operators, so `Opel OR AND car`
/// and `Opel N5 AND car` are both malformed. The text is single-space
/// separated by now, so scanning consecutive token pairs covers every
/// combination of `{AND, OR, N<int>, W<int>}` x itself.
fn check_operator_adjacency(text: &str) -> Result<(), SyntaxError> {
    let tokens: Vec<&str> = text.split(' ').collect();
    for pair in tokens.windows(2) {
        if LogicalOperator::is_operator(pair[0]) && LogicalOperator::is_operator(pair[1]) {
            return Err(SyntaxError::OperatorSequence {
                query: text.to_string(),
            });
        }
    }
    Ok(())
}
