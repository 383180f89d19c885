//! ABI decoding

use primitive_types::{H256, U256};

use crate::config::{CodecConfig, DecodeShape};
use crate::error::{AbiError, Result};
use crate::param::Param;
use crate::param_type::ParamType;
use crate::primitives::{Address, I256};
use crate::token::{Decoded, Token};

/// Decode tokens from ABI-encoded data
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>> {
    let types: Vec<&ParamType> = types.iter().collect();
    decode_sequence(&types, data, CodecConfig::default().max_depth)
}

/// Decode a parameter list, shaping the result per `config`
///
/// Zero parameters decode to [`Decoded::Empty`] whatever the data.
pub fn decode_params(params: &[Param], data: &[u8], config: &CodecConfig) -> Result<Decoded> {
    if params.is_empty() {
        return Ok(Decoded::Empty);
    }
    tracing::trace!("Decoding {} parameters from {} bytes", params.len(), data.len());

    let types: Vec<&ParamType> = params.iter().map(|p| &p.kind).collect();
    let tokens = decode_sequence(&types, data, config.max_depth)?;
    Ok(shape(params, tokens, config))
}

/// Arrange decoded tokens as configured
pub(crate) fn shape(params: &[Param], mut tokens: Vec<Token>, config: &CodecConfig) -> Decoded {
    if tokens.is_empty() {
        return Decoded::Empty;
    }
    if config.unwrap_single && tokens.len() == 1 {
        return Decoded::Single(tokens.remove(0));
    }
    match config.decode_as {
        DecodeShape::Array => Decoded::List(tokens),
        DecodeShape::Object => Decoded::Named(
            params
                .iter()
                .zip(tokens)
                .enumerate()
                .map(|(i, (p, t))| {
                    let key = if p.name.is_empty() { i.to_string() } else { p.name.clone() };
                    (key, t)
                })
                .collect(),
        ),
    }
}

/// Decode a static value stored in a log topic
pub(crate) fn decode_topic(param_type: &ParamType, topic: &H256) -> Result<Token> {
    Decoder::new(topic.as_bytes(), 1).value(param_type, 0, 0)
}

fn decode_sequence(types: &[&ParamType], data: &[u8], max_depth: usize) -> Result<Vec<Token>> {
    if types.is_empty() {
        return Ok(Vec::new());
    }
    if data.is_empty() {
        return Err(AbiError::ZeroData(types.len()));
    }
    let head_size = types.iter().try_fold(0usize, |total, t| {
        total
            .checked_add(t.checked_head_size()?)
            .ok_or_else(|| AbiError::TypeTooLarge(t.to_string()))
    })?;
    check_length(data, head_size)?;

    Decoder::new(data, max_depth).sequence(types, 0, 0)
}

/// Random-access reader over the encoded payload
///
/// Heads are read sequentially from a sequence base; dynamic values jump to
/// `base + offset`. Every read is bounds-checked.
struct Decoder<'a> {
    data: &'a [u8],
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8], max_depth: usize) -> Self {
        Self { data, max_depth }
    }

    fn word(&self, position: usize) -> Result<&'a [u8; 32]> {
        let end = position.checked_add(32).ok_or(AbiError::InvalidWord {
            kind: "offset",
            position,
        })?;
        check_length(self.data, end)?;
        self.data[position..end]
            .try_into()
            .map_err(|_| AbiError::InvalidWord { kind: "offset", position })
    }

    /// Read an offset or length word that must address into the payload
    fn usize_word(&self, position: usize, kind: &'static str) -> Result<usize> {
        let value = U256::from_big_endian(self.word(position)?);
        if value > U256::from(self.data.len()) {
            return Err(AbiError::InvalidWord { kind, position });
        }
        Ok(value.as_usize())
    }

    /// Decode a tuple-shaped sequence whose heads start at `base`
    fn sequence(&self, types: &[&ParamType], base: usize, depth: usize) -> Result<Vec<Token>> {
        let mut tokens = Vec::with_capacity(types.len());
        let mut head = base;

        for param_type in types {
            tokens.push(self.param(param_type, base, head, depth)?);
            head += param_type.checked_head_size()?;
        }

        Ok(tokens)
    }

    /// Decode the value whose head slot is at `head`
    fn param(&self, param_type: &ParamType, base: usize, head: usize, depth: usize) -> Result<Token> {
        if param_type.is_dynamic() {
            let offset = self.usize_word(head, "offset")?;
            self.value(param_type, base + offset, depth)
        } else {
            self.value(param_type, head, depth)
        }
    }

    /// Decode a value laid out starting at `at`
    fn value(&self, param_type: &ParamType, at: usize, depth: usize) -> Result<Token> {
        if depth >= self.max_depth {
            return Err(AbiError::MaxDepthExceeded(self.max_depth));
        }

        match param_type {
            ParamType::Address => {
                let word = self.word(at)?;
                if word[..12].iter().any(|b| *b != 0) {
                    return Err(AbiError::InvalidPadding {
                        ty: param_type.to_string(),
                        position: at,
                    });
                }
                let mut addr = [0u8; 20];
                addr.copy_from_slice(&word[12..]);
                Ok(Token::Address(Address::from_bytes(addr)))
            }
            ParamType::Uint(bits) => {
                let value = U256::from_big_endian(self.word(at)?);
                if value.bits() > *bits {
                    return Err(AbiError::IntegerOutOfRange {
                        ty: param_type.to_string(),
                        value: value.to_string(),
                    });
                }
                Ok(Token::Uint(value))
            }
            ParamType::Int(bits) => {
                let value = I256::from_word(self.word(at)?);
                if !value.fits(*bits) {
                    return Err(AbiError::IntegerOutOfRange {
                        ty: param_type.to_string(),
                        value: value.to_string(),
                    });
                }
                Ok(Token::Int(value))
            }
            ParamType::Bool => {
                let word = self.word(at)?;
                if word[..31].iter().any(|b| *b != 0) || word[31] > 1 {
                    return Err(AbiError::InvalidBool(at));
                }
                Ok(Token::Bool(word[31] == 1))
            }
            ParamType::FixedBytes(size) => {
                let word = self.word(at)?;
                if word[*size..].iter().any(|b| *b != 0) {
                    return Err(AbiError::InvalidPadding {
                        ty: param_type.to_string(),
                        position: at,
                    });
                }
                Ok(Token::FixedBytes(word[..*size].to_vec()))
            }
            ParamType::Bytes => Ok(Token::Bytes(self.bytes(at)?.to_vec())),
            ParamType::String => {
                let s = std::str::from_utf8(self.bytes(at)?)
                    .map_err(|e| AbiError::InvalidUtf8(e.to_string()))?;
                Ok(Token::String(s.to_string()))
            }
            ParamType::Array(inner) => {
                let len = self.usize_word(at, "length")?;
                let start = at + 32;
                self.check_elements(inner, len, start)?;

                let types = vec![&**inner; len];
                Ok(Token::Array(self.sequence(&types, start, depth + 1)?))
            }
            ParamType::FixedArray(inner, size) => {
                self.check_elements(inner, *size, at)?;
                let types = vec![&**inner; *size];
                Ok(Token::FixedArray(self.sequence(&types, at, depth + 1)?))
            }
            ParamType::Tuple(components) => {
                let types: Vec<&ParamType> = components.iter().map(|c| &c.kind).collect();
                Ok(Token::Tuple(self.sequence(&types, at, depth + 1)?))
            }
        }
    }

    /// Each of `count` elements needs at least its head slot from `start` on
    fn check_elements(&self, inner: &ParamType, count: usize, start: usize) -> Result<()> {
        let needed = count
            .checked_mul(inner.checked_head_size()?)
            .and_then(|n| n.checked_add(start))
            .ok_or_else(|| AbiError::TypeTooLarge(inner.to_string()))?;
        check_length(self.data, needed)
    }

    /// Length-prefixed payload at `at`
    fn bytes(&self, at: usize) -> Result<&'a [u8]> {
        let len = self.usize_word(at, "length")?;
        let start = at + 32;
        check_length(self.data, start + len)?;
        Ok(&self.data[start..start + len])
    }
}

/// Check that data has at least `required` bytes
fn check_length(data: &[u8], required: usize) -> Result<()> {
    if data.len() < required {
        return Err(AbiError::InsufficientData {
            expected: required,
            actual: data.len(),
        });
    }
    Ok(())
}
