//! Parameter parsing
//!
//! A parameter reads as `type [modifier] [name]`. The type may be an
//! elementary type, a struct name or an inline tuple `(uint256 a, bool b)`,
//! each with optional array suffixes.

use std::fmt;

use crate::error::{AbiError, Result};
use crate::item::ItemKind;
use crate::param::Param;
use crate::param_type::{
    matching_paren, parse_elementary, split_array_suffix, split_top_level, strip_outer_parens, wrap_arrays,
    ParamType, MAX_TYPE_DEPTH,
};

use super::signature::is_identifier;

/// Where a parameter appears; decides which modifiers are legal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamContext {
    /// Inputs of a declaration
    Inputs(ItemKind),
    /// Function return values
    Outputs,
    /// Struct member
    Struct,
    /// Member of an inline tuple
    Component,
    /// Bare parameter list with no declaration around it
    Standalone,
}

impl ParamContext {
    fn allows_indexed(self) -> bool {
        matches!(self, ParamContext::Inputs(ItemKind::Event) | ParamContext::Standalone)
    }

    fn allows_data_location(self) -> bool {
        matches!(
            self,
            ParamContext::Inputs(ItemKind::Function | ItemKind::Constructor | ItemKind::Fallback)
                | ParamContext::Outputs
                | ParamContext::Standalone
        )
    }
}

impl fmt::Display for ParamContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamContext::Inputs(kind) => write!(f, "{kind}"),
            ParamContext::Outputs => f.write_str("return"),
            ParamContext::Struct => f.write_str("struct"),
            ParamContext::Component => f.write_str("tuple"),
            ParamContext::Standalone => f.write_str("standalone"),
        }
    }
}

/// Resolves struct names met while parsing a type
pub(crate) trait StructSource {
    /// Components of struct `name`, or `None` if no such struct exists
    ///
    /// `depth` is the type nesting level the struct is referenced at.
    fn lookup(&mut self, name: &str, depth: usize) -> Result<Option<Vec<Param>>>;
}

/// Parse a comma-separated parameter list
pub(crate) fn parse_params(
    text: &str,
    context: ParamContext,
    structs: &mut dyn StructSource,
) -> Result<Vec<Param>> {
    split_top_level(text)?
        .into_iter()
        .map(|part| parse_param(part, context, structs, 0))
        .collect()
}

/// Parse one parameter token
pub(crate) fn parse_param(
    text: &str,
    context: ParamContext,
    structs: &mut dyn StructSource,
    depth: usize,
) -> Result<Param> {
    if depth > MAX_TYPE_DEPTH {
        return Err(AbiError::MaxDepthExceeded(MAX_TYPE_DEPTH));
    }
    let text = text.trim();
    let (type_text, rest) = split_type(text)?;
    let kind = resolve_type(type_text, text, structs, depth)?;
    if kind.depth() > MAX_TYPE_DEPTH {
        return Err(AbiError::MaxDepthExceeded(MAX_TYPE_DEPTH));
    }

    let mut words: Vec<&str> = rest.split_whitespace().collect();
    let name = match words.last() {
        Some(last) if !is_modifier(last) => {
            let name = *last;
            words.pop();
            name
        }
        _ => "",
    };

    let mut indexed = None;
    match words.as_slice() {
        [] => {}
        [modifier] => apply_modifier(modifier, text, &kind, context, &mut indexed)?,
        [_, extra, ..] => {
            return Err(AbiError::InvalidParameter {
                param: text.to_string(),
                reason: format!("unexpected `{extra}`"),
            })
        }
    }
    if indexed.is_none() && context == ParamContext::Inputs(ItemKind::Event) {
        indexed = Some(false);
    }

    if !name.is_empty() {
        validate_name(name, text)?;
    } else if context == ParamContext::Struct {
        return Err(AbiError::InvalidParameter {
            param: text.to_string(),
            reason: "struct members must be named".to_string(),
        });
    }

    Ok(Param {
        name: name.to_string(),
        kind,
        indexed,
        internal_type: None,
    })
}

/// Split `type rest`, keeping an inline tuple and its array suffix together
fn split_type(text: &str) -> Result<(&str, &str)> {
    if text.is_empty() {
        return Err(AbiError::InvalidParameter {
            param: text.to_string(),
            reason: "empty parameter".to_string(),
        });
    }
    let start = if text.starts_with('(') {
        matching_paren(text, 0)? + 1
    } else {
        0
    };
    let end = text[start..]
        .find(char::is_whitespace)
        .map_or(text.len(), |i| start + i);
    Ok((&text[..end], &text[end..]))
}

fn resolve_type(
    type_text: &str,
    param: &str,
    structs: &mut dyn StructSource,
    depth: usize,
) -> Result<ParamType> {
    let (base, dims) = split_array_suffix(type_text)?;

    let base_type = if base.starts_with('(') {
        let inner = strip_outer_parens(base)?;
        let components = split_top_level(inner)?
            .into_iter()
            .map(|part| parse_param(part, ParamContext::Component, structs, depth + 1))
            .collect::<Result<Vec<_>>>()?;
        if components.is_empty() {
            return Err(AbiError::InvalidParameter {
                param: param.to_string(),
                reason: "tuple has no components".to_string(),
            });
        }
        ParamType::Tuple(components)
    } else if let Some(elementary) = parse_elementary(base) {
        elementary
    } else if is_identifier(base) {
        match structs.lookup(base, depth)? {
            Some(components) => ParamType::Tuple(components),
            None => return Err(AbiError::UnknownType(base.to_string())),
        }
    } else {
        return Err(AbiError::UnknownType(base.to_string()));
    };

    Ok(wrap_arrays(base_type, &dims))
}

fn apply_modifier(
    modifier: &str,
    param: &str,
    kind: &ParamType,
    context: ParamContext,
    indexed: &mut Option<bool>,
) -> Result<()> {
    let not_allowed = || AbiError::InvalidModifier {
        modifier: modifier.to_string(),
        param: param.to_string(),
        kind: context.to_string(),
    };
    match modifier {
        "indexed" if context.allows_indexed() => {
            *indexed = Some(true);
            Ok(())
        }
        "calldata" | "memory" | "storage" if context.allows_data_location() => {
            if kind.is_reference() {
                Ok(())
            } else {
                Err(AbiError::InvalidDataLocation {
                    modifier: modifier.to_string(),
                    param: param.to_string(),
                })
            }
        }
        _ => Err(not_allowed()),
    }
}

fn is_modifier(word: &str) -> bool {
    matches!(word, "indexed" | "calldata" | "memory" | "storage")
}

fn validate_name(name: &str, param: &str) -> Result<()> {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(AbiError::NumericName {
            param: param.to_string(),
            name: name.to_string(),
        });
    }
    if !is_identifier(name) {
        return Err(AbiError::InvalidParameter {
            param: param.to_string(),
            reason: format!("invalid name `{name}`"),
        });
    }
    if is_protected(name) {
        return Err(AbiError::ProtectedKeyword {
            param: param.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Reserved Solidity words and every elementary type name
fn is_protected(name: &str) -> bool {
    const KEYWORDS: &[&str] = &[
        "abstract", "after", "alias", "anonymous", "apply", "assembly", "auto", "break", "byte", "calldata",
        "case", "catch", "constant", "constructor", "continue", "contract", "copyof", "default", "defined",
        "delete", "do", "else", "emit", "enum", "error", "event", "external", "fallback", "false", "final",
        "fixed", "for", "function", "if", "immutable", "implements", "import", "in", "indexed", "inline",
        "interface", "internal", "is", "let", "library", "mapping", "match", "memory", "modifier", "mutable",
        "new", "null", "of", "override", "partial", "payable", "pragma", "private", "promise", "public", "pure",
        "receive", "reference", "relocatable", "return", "returns", "sizeof", "static", "storage", "struct",
        "super", "supports", "switch", "this", "true", "try", "tuple", "type", "typedef", "typeof", "ufixed",
        "unchecked", "using", "var", "view", "virtual", "while",
    ];
    KEYWORDS.contains(&name) || parse_elementary(name).is_some()
}
