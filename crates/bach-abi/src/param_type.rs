//! ABI type grammar
//!
//! A type string is classified once into a [`ParamType`]; encoding and
//! decoding match on the variant and never look at the string again.

use std::fmt;
use std::str::FromStr;

use crate::error::{AbiError, ParenSide, Result};
use crate::param::Param;

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<ParamType>),
    /// Fixed-size array
    FixedArray(Box<ParamType>, usize),
    /// Tuple, components keep their names
    Tuple(Vec<Param>),
}

impl ParamType {
    /// Check if this type is dynamic (variable length)
    ///
    /// `string`, `bytes` and `T[]` always are; `T[N]` and tuples are
    /// dynamic iff an element or component is.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(components) => components.iter().any(|c| c.kind.is_dynamic()),
            _ => false,
        }
    }

    /// Bytes this type occupies in the head of an enclosing sequence
    ///
    /// `None` when a fixed-array dimension makes the size overflow `usize`.
    pub fn head_size(&self) -> Option<usize> {
        match self {
            ParamType::FixedArray(inner, size) if !inner.is_dynamic() => inner.head_size()?.checked_mul(*size),
            ParamType::Tuple(components) if !self.is_dynamic() => components
                .iter()
                .try_fold(0usize, |total, c| total.checked_add(c.kind.head_size()?)),
            _ => Some(32),
        }
    }

    /// [`head_size`](Self::head_size) for the codec, overflow as an error
    pub(crate) fn checked_head_size(&self) -> Result<usize> {
        self.head_size().ok_or_else(|| AbiError::TypeTooLarge(self.to_string()))
    }

    /// Whether this is a non-composite type (no arrays or tuples)
    pub fn is_elementary(&self) -> bool {
        matches!(
            self,
            ParamType::Address
                | ParamType::Uint(_)
                | ParamType::Int(_)
                | ParamType::Bool
                | ParamType::FixedBytes(_)
                | ParamType::Bytes
                | ParamType::String
        )
    }

    /// Whether `memory`/`calldata`/`storage` may qualify this type
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            ParamType::Bytes
                | ParamType::String
                | ParamType::Array(_)
                | ParamType::FixedArray(..)
                | ParamType::Tuple(_)
        )
    }

    /// Tuple components, looking through array layers
    pub fn components(&self) -> Option<&[Param]> {
        match self {
            ParamType::Tuple(components) => Some(components),
            ParamType::Array(inner) | ParamType::FixedArray(inner, _) => inner.components(),
            _ => None,
        }
    }

    /// Nesting depth (an elementary type is 1)
    pub fn depth(&self) -> usize {
        match self {
            ParamType::Array(inner) | ParamType::FixedArray(inner, _) => 1 + inner.depth(),
            ParamType::Tuple(components) => {
                1 + components.iter().map(|c| c.kind.depth()).max().unwrap_or(0)
            }
            _ => 1,
        }
    }

    /// JSON ABI spelling: tuples become `tuple` plus array suffixes
    pub fn json_type(&self) -> String {
        match self {
            ParamType::Tuple(_) => "tuple".to_string(),
            ParamType::Array(inner) => format!("{}[]", inner.json_type()),
            ParamType::FixedArray(inner, size) => format!("{}[{size}]", inner.json_type()),
            other => other.to_string(),
        }
    }

    /// Parse a type string such as `uint256[2][]` or `(address,bytes)[]`
    ///
    /// `uint`/`int` normalize to 256 bits. Tuple spellings yield unnamed
    /// components. Struct names and the bare `tuple` keyword are rejected
    /// here; they need a struct table or JSON components.
    pub fn parse(s: &str) -> Result<Self> {
        Self::parse_at_depth(s.trim(), 0)
    }

    fn parse_at_depth(s: &str, depth: usize) -> Result<Self> {
        if depth > MAX_TYPE_DEPTH {
            return Err(AbiError::MaxDepthExceeded(MAX_TYPE_DEPTH));
        }
        let (base, dims) = split_array_suffix(s)?;
        let base_type = if base.starts_with('(') {
            let inner = strip_outer_parens(base)?;
            let components = split_top_level(inner)?
                .into_iter()
                .map(|part| Self::parse_at_depth(part, depth + 1).map(Param::unnamed))
                .collect::<Result<Vec<_>>>()?;
            if components.is_empty() {
                return Err(AbiError::InvalidParameter {
                    param: s.to_string(),
                    reason: "tuple has no components".to_string(),
                });
            }
            ParamType::Tuple(components)
        } else {
            parse_elementary(base).ok_or_else(|| AbiError::UnknownType(base.to_string()))?
        };
        Ok(wrap_arrays(base_type, &dims))
    }
}

/// Nesting ceiling for type strings parsed without a [`CodecConfig`](crate::CodecConfig)
pub(crate) const MAX_TYPE_DEPTH: usize = 64;

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Uint(bits) => write!(f, "uint{bits}"),
            ParamType::Int(bits) => write!(f, "int{bits}"),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::FixedBytes(size) => write!(f, "bytes{size}"),
            ParamType::String => f.write_str("string"),
            ParamType::Array(inner) => write!(f, "{inner}[]"),
            ParamType::FixedArray(inner, size) => write!(f, "{inner}[{size}]"),
            ParamType::Tuple(components) => {
                f.write_str("(")?;
                for (i, c) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", c.kind)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Classify a base type with no array suffix
pub(crate) fn parse_elementary(s: &str) -> Option<ParamType> {
    match s {
        "address" => return Some(ParamType::Address),
        "bool" => return Some(ParamType::Bool),
        "string" => return Some(ParamType::String),
        "bytes" => return Some(ParamType::Bytes),
        "uint" => return Some(ParamType::Uint(256)),
        "int" => return Some(ParamType::Int(256)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("uint") {
        return int_bits(rest).map(ParamType::Uint);
    }
    if let Some(rest) = s.strip_prefix("int") {
        return int_bits(rest).map(ParamType::Int);
    }
    if let Some(rest) = s.strip_prefix("bytes") {
        let size = decimal(rest)?;
        return (1..=32).contains(&size).then_some(ParamType::FixedBytes(size));
    }
    None
}

fn int_bits(rest: &str) -> Option<usize> {
    let bits = decimal(rest)?;
    ((8..=256).contains(&bits) && bits % 8 == 0).then_some(bits)
}

/// Digits only, no sign, no leading zero
fn decimal(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) || (s.len() > 1 && s.starts_with('0')) {
        return None;
    }
    s.parse().ok()
}

/// Split `T[2][]` into `("T", [Some(2), None])`
///
/// Dimensions are listed innermost first.
pub(crate) fn split_array_suffix(s: &str) -> Result<(&str, Vec<Option<usize>>)> {
    let mut dims = Vec::new();
    let mut rest = s;
    while let Some(body) = rest.strip_suffix(']') {
        let open = body
            .rfind('[')
            .ok_or_else(|| AbiError::UnknownType(s.to_string()))?;
        let size = &body[open + 1..];
        if size.is_empty() {
            dims.push(None);
        } else {
            match decimal(size) {
                Some(n) if n > 0 => dims.push(Some(n)),
                _ => return Err(AbiError::UnknownType(s.to_string())),
            }
        }
        rest = &body[..open];
    }
    if rest.is_empty() {
        return Err(AbiError::UnknownType(s.to_string()));
    }
    dims.reverse();
    Ok((rest, dims))
}

/// Apply array dimensions (innermost first) to a base type
pub(crate) fn wrap_arrays(base: ParamType, dims: &[Option<usize>]) -> ParamType {
    dims.iter().fold(base, |inner, dim| match dim {
        Some(size) => ParamType::FixedArray(Box::new(inner), *size),
        None => ParamType::Array(Box::new(inner)),
    })
}

/// `(a,b)` -> `a,b`, requiring the parentheses to match each other
pub(crate) fn strip_outer_parens(s: &str) -> Result<&str> {
    let close = matching_paren(s, 0)?;
    if close != s.len() - 1 {
        return Err(AbiError::UnknownType(s.to_string()));
    }
    Ok(&s[1..close])
}

/// Index of the `)` closing the `(` at `open`
pub(crate) fn matching_paren(s: &str, open: usize) -> Result<usize> {
    let mut depth = 0usize;
    for (i, ch) in s.char_indices().skip_while(|(i, _)| *i < open) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(AbiError::UnbalancedParentheses {
        text: s.to_string(),
        side: ParenSide::Opening,
        depth,
    })
}

/// Split on commas at parenthesis depth zero
///
/// Empty input yields no parts; an empty part between commas is an error.
pub(crate) fn split_top_level(s: &str) -> Result<Vec<&str>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in trimmed.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| AbiError::UnbalancedParentheses {
                    text: trimmed.to_string(),
                    side: ParenSide::Closing,
                    depth: 1,
                })?;
            }
            ',' if depth == 0 => {
                parts.push(trimmed[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(AbiError::UnbalancedParentheses {
            text: trimmed.to_string(),
            side: ParenSide::Opening,
            depth,
        });
    }
    parts.push(trimmed[start..].trim());

    if parts.iter().any(|p| p.is_empty()) {
        return Err(AbiError::InvalidParameter {
            param: trimmed.to_string(),
            reason: "empty parameter".to_string(),
        });
    }
    Ok(parts)
}
