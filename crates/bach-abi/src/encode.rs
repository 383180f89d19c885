//! ABI encoding
//!
//! Standard head/tail layout: every value in a sequence gets a head slot;
//! static values live in their slot, dynamic values leave an offset there
//! and append their payload to the tail. Offsets are relative to the start
//! of the enclosing sequence.

use primitive_types::U256;

use crate::config::CodecConfig;
use crate::error::{AbiError, Result};
use crate::param::Param;
use crate::param_type::ParamType;
use crate::primitives::{Address, Selector, I256};
use crate::token::{Token, Values};

/// Encode values against a parameter list
pub fn encode(params: &[Param], values: impl Into<Values>) -> Result<Vec<u8>> {
    encode_with(params, values, &CodecConfig::default())
}

/// Encode values against a parameter list with explicit options
pub fn encode_with(
    params: &[Param],
    values: impl Into<Values>,
    config: &CodecConfig,
) -> Result<Vec<u8>> {
    let tokens = values.into().into_ordered(params)?;
    let pairs: Vec<(&ParamType, &Token)> = params.iter().map(|p| &p.kind).zip(tokens.iter()).collect();
    Encoder::new(config.max_depth).sequence(&pairs, 0)
}

/// Encode tokens against bare types
pub fn encode_tokens(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>> {
    if types.len() != tokens.len() {
        return Err(AbiError::LengthMismatch {
            expected: types.len(),
            actual: tokens.len(),
        });
    }
    let pairs: Vec<(&ParamType, &Token)> = types.iter().zip(tokens.iter()).collect();
    Encoder::new(CodecConfig::default().max_depth).sequence(&pairs, 0)
}

/// Encode function call (selector + params)
pub fn encode_function_call(
    selector: Selector,
    params: &[Param],
    values: impl Into<Values>,
) -> Result<Vec<u8>> {
    let mut result = selector.to_vec();
    result.extend(encode(params, values)?);
    Ok(result)
}

struct Encoder {
    max_depth: usize,
}

impl Encoder {
    fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Encode a tuple-shaped sequence (parameter list, tuple body, array body)
    fn sequence(&self, pairs: &[(&ParamType, &Token)], depth: usize) -> Result<Vec<u8>> {
        let head_size = pairs.iter().try_fold(0usize, |total, (ty, _)| {
            total
                .checked_add(ty.checked_head_size()?)
                .ok_or_else(|| AbiError::TypeTooLarge(ty.to_string()))
        })?;

        // Declared head size is not trusted for allocation
        let mut head = Vec::with_capacity(pairs.len() * 32);
        let mut tail = Vec::new();

        for (param_type, token) in pairs {
            let encoded = self.token(param_type, token, depth)?;
            if param_type.is_dynamic() {
                head.extend(usize_word(head_size + tail.len()));
                tail.extend(encoded);
            } else {
                head.extend(encoded);
            }
        }

        head.extend(tail);
        Ok(head)
    }

    fn token(&self, param_type: &ParamType, token: &Token, depth: usize) -> Result<Vec<u8>> {
        if depth >= self.max_depth {
            return Err(AbiError::MaxDepthExceeded(self.max_depth));
        }

        match (param_type, token) {
            (ParamType::Address, Token::Address(addr)) => Ok(address_word(addr).to_vec()),
            (ParamType::Uint(bits), Token::Uint(value)) => Ok(uint_word(*bits, value)?.to_vec()),
            (ParamType::Int(bits), Token::Int(value)) => Ok(int_word(*bits, value)?.to_vec()),
            (ParamType::Bool, Token::Bool(b)) => Ok(bool_word(*b).to_vec()),
            (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
                check_fixed_bytes(*size, data)?;
                let mut buf = [0u8; 32];
                buf[..data.len()].copy_from_slice(data);
                Ok(buf.to_vec())
            }
            (ParamType::Bytes, Token::Bytes(data)) => Ok(encode_bytes(data)),
            (ParamType::String, Token::String(s)) => Ok(encode_bytes(s.as_bytes())),
            (ParamType::Array(inner), Token::Array(tokens)) => {
                let mut result = usize_word(tokens.len()).to_vec();
                let pairs: Vec<(&ParamType, &Token)> = tokens.iter().map(|t| (&**inner, t)).collect();
                result.extend(self.sequence(&pairs, depth + 1)?);
                Ok(result)
            }
            (ParamType::FixedArray(inner, size), Token::FixedArray(tokens) | Token::Array(tokens)) => {
                check_array_len(param_type, *size, tokens.len())?;
                let pairs: Vec<(&ParamType, &Token)> = tokens.iter().map(|t| (&**inner, t)).collect();
                self.sequence(&pairs, depth + 1)
            }
            (ParamType::Tuple(components), Token::Tuple(tokens)) => {
                if components.len() != tokens.len() {
                    return Err(AbiError::LengthMismatch {
                        expected: components.len(),
                        actual: tokens.len(),
                    });
                }
                let pairs: Vec<(&ParamType, &Token)> =
                    components.iter().map(|c| &c.kind).zip(tokens.iter()).collect();
                self.sequence(&pairs, depth + 1)
            }
            _ => Err(type_mismatch(param_type, token)),
        }
    }
}

pub(crate) fn type_mismatch(param_type: &ParamType, token: &Token) -> AbiError {
    AbiError::TypeMismatch {
        expected: param_type.to_string(),
        actual: token.kind_name().to_string(),
    }
}

pub(crate) fn check_array_len(param_type: &ParamType, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(AbiError::ArrayLengthMismatch {
            ty: param_type.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn check_fixed_bytes(size: usize, data: &[u8]) -> Result<()> {
    if data.len() != size {
        return Err(AbiError::FixedBytesSizeMismatch {
            expected: size,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Address left-padded to a word
pub(crate) fn address_word(addr: &Address) -> [u8; 32] {
    let mut buf = [0u8; 32];
    buf[12..32].copy_from_slice(addr.as_bytes());
    buf
}

pub(crate) fn bool_word(b: bool) -> [u8; 32] {
    let mut buf = [0u8; 32];
    buf[31] = u8::from(b);
    buf
}

/// Range-checked `uintN` word
pub(crate) fn uint_word(bits: usize, value: &U256) -> Result<[u8; 32]> {
    if value.bits() > bits {
        return Err(AbiError::IntegerOutOfRange {
            ty: format!("uint{bits}"),
            value: value.to_string(),
        });
    }
    Ok(u256_to_bytes(value))
}

/// Range-checked, sign-extended `intN` word
pub(crate) fn int_word(bits: usize, value: &I256) -> Result<[u8; 32]> {
    if !value.fits(bits) {
        return Err(AbiError::IntegerOutOfRange {
            ty: format!("int{bits}"),
            value: value.to_string(),
        });
    }
    Ok(value.to_word())
}

/// Convert U256 to 32-byte big-endian array
pub(crate) fn u256_to_bytes(value: &U256) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes
}

fn usize_word(value: usize) -> [u8; 32] {
    u256_to_bytes(&U256::from(value))
}

/// Encode dynamic bytes: length word, then data right-padded to a word boundary
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().div_ceil(32) * 32;
    let mut result = Vec::with_capacity(32 + padded_len);
    result.extend(usize_word(data.len()));
    result.extend_from_slice(data);
    result.resize(32 + padded_len, 0);
    result
}
