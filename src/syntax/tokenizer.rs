//! A tokenizer for expressions over an operator table.
//!
//! The scan is greedy and left-to-right: at every position the longest
//! registered operator name wins, so a multi-character name like `mod`
//! is one token and an identifier run stops where a registered name
//! begins. Whitespace only separates tokens. No parsing decisions are
//! taken here; whether a token is an operator, a constant name, or a
//! variable is resolved by the parser via operator lookup.
//!
//! Input is NFKC-normalized before scanning, so visually equivalent
//! inputs tokenize identically.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use syntax::error::ParseError;
use syntax::operators::OpTable;

/// The capacity of the token buffer.
pub const MAX_TOKENS: usize = 100;

/// Splits an input line into tokens using the table's operator names.
pub fn tokenize(ops: &OpTable, input: &str) -> Result<Vec<String>, ParseError> {
    lazy_static! {
        static ref NUMERIC: Regex = Regex::new(r"^\d+(\.\d+)?(e-?\d+)?").unwrap();
    }

    let norm: String = input.nfkc().collect();

    // Operator names, longest first, so that the scan is greedy.
    let mut names: Vec<&str> = ops.as_slice().iter().map(|op| op.name()).collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    names.dedup();

    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < norm.len() {
        let rest = &norm[pos..];
        let ch = rest.chars().next().unwrap();

        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }

        let len = if is_paren_char(ch) || is_delimiter_char(ch) {
            ch.len_utf8()
        } else if let Some(name) = names.iter().find(|name| rest.starts_with(**name)) {
            name.len()
        } else if let Some(m) = NUMERIC.find(rest) {
            m.end()
        } else if is_ident_char(ch) {
            ident_len(&names, rest)
        } else {
            // Unknown characters pass through as their own token; the
            // parser rejects or absorbs them.
            ch.len_utf8()
        };

        if tokens.len() == MAX_TOKENS {
            return Err(ParseError::MaxTokensExceeded);
        }
        tokens.push(rest[..len].to_string());
        pos += len;
    }

    Ok(tokens)
}

/// True for a token that opens a group.
pub fn is_opening_paren(tok: &str) -> bool {
    tok == "(" || tok == "{" || tok == "["
}

/// True for a token that closes a group.
pub fn is_closing_paren(tok: &str) -> bool {
    tok == ")" || tok == "}" || tok == "]"
}

/// True for a parameter-list delimiter token.
pub fn is_delimiter(tok: &str) -> bool {
    tok == "," || tok == ";"
}

// Scanning helpers
// --------------------------------------------------

fn is_paren_char(ch: char) -> bool {
    match ch {
        '(' | '{' | '[' | ')' | '}' | ']' => true,
        _ => false,
    }
}

fn is_delimiter_char(ch: char) -> bool {
    ch == ',' || ch == ';'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// The length of an identifier run: letters, digits and underscores up
/// to the first position where a registered operator name begins.
fn ident_len(names: &[&str], rest: &str) -> usize {
    let mut len = 0;
    for (i, ch) in rest.char_indices() {
        if !is_ident_char(ch) {
            break;
        }
        if i > 0 && names.iter().any(|name| rest[i..].starts_with(*name)) {
            break;
        }
        len = i + ch.len_utf8();
    }
    len
}

// Tests
// --------------------------------------------------
