//! Overload selection and ambiguity detection

use crate::error::{AbiError, Result};
use crate::item::{AbiItem, Function};
use crate::param::Param;
use crate::param_type::ParamType;
use crate::token::Token;

/// Whether `token` is a valid value for `kind`
pub fn accepts(kind: &ParamType, token: &Token) -> bool {
    match (kind, token) {
        (ParamType::Address, Token::Address(_)) => true,
        (ParamType::Uint(bits), Token::Uint(value)) => value.bits() <= *bits,
        (ParamType::Int(bits), Token::Int(value)) => value.fits(*bits),
        (ParamType::Bool, Token::Bool(_)) => true,
        (ParamType::Bytes, Token::Bytes(_)) => true,
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) => data.len() == *size,
        (ParamType::String, Token::String(_)) => true,
        (ParamType::Array(inner), Token::Array(tokens)) => {
            tokens.iter().all(|t| accepts(inner, t))
        }
        (ParamType::FixedArray(inner, size), Token::Array(tokens) | Token::FixedArray(tokens)) => {
            tokens.len() == *size && tokens.iter().all(|t| accepts(inner, t))
        }
        (ParamType::Tuple(components), Token::Tuple(tokens)) => accepts_all(components, tokens),
        _ => false,
    }
}

/// Whether every value is accepted by the parameter at its position
pub fn accepts_all(params: &[Param], tokens: &[Token]) -> bool {
    params.len() == tokens.len() && params.iter().zip(tokens).all(|(p, t)| accepts(&p.kind, t))
}

/// Pick the overload to call with `args`
///
/// Candidates are narrowed by arity. A single survivor is returned as is;
/// otherwise the first, in declaration order, whose parameter types accept
/// every argument wins.
pub fn select_overload<'a>(candidates: &[&'a Function], args: &[Token]) -> Option<&'a Function> {
    let by_arity: Vec<&'a Function> = candidates
        .iter()
        .copied()
        .filter(|f| f.inputs.len() == args.len())
        .collect();

    let selected = match by_arity.as_slice() {
        [] => None,
        [only] => Some(*only),
        several => several.iter().copied().find(|f| accepts_all(&f.inputs, args)),
    };
    if let Some(function) = selected {
        tracing::trace!("Selected overload {} from {} candidates", function.signature(), candidates.len());
    }
    selected
}

/// Reject ABIs whose same-named items cannot be told apart once encoded
///
/// Two items collide when they have the same kind, name and arity and each
/// pair of parameters is either the same type or differs only by
/// `address`/`bytes20`, which encode to identical words.
pub fn check_ambiguity(items: &[AbiItem]) -> Result<()> {
    for (i, first) in items.iter().enumerate() {
        let Some(name) = first.name() else { continue };
        for second in &items[i + 1..] {
            if second.kind() != first.kind() || second.name() != Some(name) {
                continue;
            }
            if is_ambiguous(first.inputs(), second.inputs()) {
                let first = first.signature().unwrap_or_default();
                let second = second.signature().unwrap_or_default();
                tracing::warn!("Rejecting ambiguous ABI items {} and {}", first, second);
                return Err(AbiError::Ambiguous { first, second });
            }
        }
    }
    Ok(())
}

fn is_ambiguous(a: &[Param], b: &[Param]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).any(|(x, y)| x.kind != y.kind)
        && a.iter().zip(b).all(|(x, y)| indistinguishable(&x.kind, &y.kind))
}

fn indistinguishable(a: &ParamType, b: &ParamType) -> bool {
    match (a, b) {
        (ParamType::Address, ParamType::FixedBytes(20)) | (ParamType::FixedBytes(20), ParamType::Address) => true,
        (ParamType::Array(x), ParamType::Array(y)) => indistinguishable(x, y),
        (ParamType::FixedArray(x, n), ParamType::FixedArray(y, m)) => n == m && indistinguishable(x, y),
        (ParamType::Tuple(xs), ParamType::Tuple(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| indistinguishable(&x.kind, &y.kind))
        }
        _ => a == b,
    }
}
