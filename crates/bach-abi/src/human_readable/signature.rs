//! Declaration splitting
//!
//! Turns `function f(uint256 a) view returns (bool)` into its kind, name,
//! parameter text, return text and trailing keywords. Parenthesised lists
//! are located with a depth counter so nested tuples stay intact.

use crate::error::{AbiError, ParenSide, Result};
use crate::item::{ItemKind, StateMutability};
use crate::param_type::matching_paren;

/// One declaration split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declaration<'a> {
    pub kind: ItemKind,
    /// Empty for constructor, fallback and receive
    pub name: &'a str,
    pub params: &'a str,
    pub returns: Option<&'a str>,
    pub state_mutability: StateMutability,
    pub anonymous: bool,
}

/// Whether a line declares a struct
pub(crate) fn is_struct(signature: &str) -> bool {
    signature
        .trim_start()
        .strip_prefix("struct")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

/// Reject text whose parentheses do not pair up
pub(crate) fn check_parentheses(text: &str) -> Result<()> {
    let mut depth = 0isize;
    let mut lowest = 0isize;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                lowest = lowest.min(depth);
            }
            _ => {}
        }
    }
    if lowest < 0 {
        return Err(AbiError::UnbalancedParentheses {
            text: text.to_string(),
            side: ParenSide::Closing,
            depth: lowest.unsigned_abs(),
        });
    }
    if depth > 0 {
        return Err(AbiError::UnbalancedParentheses {
            text: text.to_string(),
            side: ParenSide::Opening,
            depth: depth.unsigned_abs(),
        });
    }
    Ok(())
}

/// Split a callable declaration
pub(crate) fn split_declaration(signature: &str) -> Result<Declaration<'_>> {
    let text = signature.trim();
    check_parentheses(text)?;

    let leading = leading_word(text);
    let (kind, rest) = match leading {
        "function" => (ItemKind::Function, &text[leading.len()..]),
        "event" => (ItemKind::Event, &text[leading.len()..]),
        "error" => (ItemKind::Error, &text[leading.len()..]),
        "constructor" => (ItemKind::Constructor, &text[leading.len()..]),
        "fallback" => (ItemKind::Fallback, &text[leading.len()..]),
        "receive" => (ItemKind::Receive, &text[leading.len()..]),
        // bare `name(...)` reads as a function
        word if is_identifier(word) && text[word.len()..].trim_start().starts_with('(') => {
            (ItemKind::Function, text)
        }
        _ => return Err(AbiError::UnknownSignature(text.to_string())),
    };

    let open = rest
        .find('(')
        .ok_or_else(|| AbiError::UnknownSignature(text.to_string()))?;
    let name = rest[..open].trim();
    let named = matches!(kind, ItemKind::Function | ItemKind::Event | ItemKind::Error);
    if named && !is_identifier(name) {
        return Err(invalid(text, format!("invalid {kind} name `{name}`")));
    }
    if !named && !name.is_empty() {
        return Err(invalid(text, format!("{kind} cannot have a name")));
    }

    let close = matching_paren(rest, open)?;
    let params = &rest[open + 1..close];
    let (keywords, returns) = split_trailer(text, &rest[close + 1..])?;

    if returns.is_some() && kind != ItemKind::Function {
        return Err(invalid(text, format!("{kind} cannot declare return values")));
    }

    let mut declaration = Declaration {
        kind,
        name,
        params,
        returns,
        state_mutability: default_mutability(kind),
        anonymous: false,
    };
    for keyword in keywords {
        apply_keyword(text, &mut declaration, keyword)?;
    }
    Ok(declaration)
}

/// Trailing keywords and the optional `returns (...)` list
fn split_trailer<'a>(text: &str, trailer: &'a str) -> Result<(Vec<&'a str>, Option<&'a str>)> {
    let mut keywords = Vec::new();
    let mut returns = None;
    let mut rest = trailer.trim_start();

    while !rest.is_empty() {
        let word = leading_word(rest);
        if word == "returns" {
            if returns.is_some() {
                return Err(invalid(text, "duplicate returns clause".to_string()));
            }
            let list = rest[word.len()..].trim_start();
            if !list.starts_with('(') {
                return Err(invalid(text, "expected `(` after returns".to_string()));
            }
            let close = matching_paren(list, 0)?;
            returns = Some(&list[1..close]);
            rest = list[close + 1..].trim_start();
        } else if word.is_empty() {
            return Err(invalid(text, format!("unexpected `{rest}`")));
        } else {
            keywords.push(word);
            rest = rest[word.len()..].trim_start();
        }
    }
    Ok((keywords, returns))
}

fn apply_keyword(text: &str, declaration: &mut Declaration<'_>, keyword: &str) -> Result<()> {
    let kind = declaration.kind;
    match (kind, keyword) {
        (ItemKind::Function | ItemKind::Fallback | ItemKind::Receive, "external" | "public") => Ok(()),
        (ItemKind::Event, "anonymous") => {
            declaration.anonymous = true;
            Ok(())
        }
        (ItemKind::Function, _) | (ItemKind::Constructor | ItemKind::Fallback, "payable" | "nonpayable") => {
            match StateMutability::from_keyword(keyword) {
                Some(mutability) => {
                    declaration.state_mutability = mutability;
                    Ok(())
                }
                None => Err(invalid(text, format!("unexpected `{keyword}`"))),
            }
        }
        (ItemKind::Receive, "payable") => Ok(()),
        _ => Err(invalid(text, format!("`{keyword}` is not allowed on {kind}"))),
    }
}

fn default_mutability(kind: ItemKind) -> StateMutability {
    match kind {
        ItemKind::Receive => StateMutability::Payable,
        _ => StateMutability::Nonpayable,
    }
}

/// Leading run of identifier characters
fn leading_word(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map_or(s.len(), |(i, _)| i);
    &s[..end]
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// `[A-Za-z_$][A-Za-z0-9_$]*`
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(is_identifier_char)
        }
        _ => false,
    }
}

fn invalid(signature: &str, reason: String) -> AbiError {
    AbiError::InvalidSignature {
        signature: signature.to_string(),
        reason,
    }
}
