//! Runtime values passed to and returned from the codec

use std::collections::BTreeMap;

use primitive_types::{H256, U256};

use crate::error::{AbiError, Result};
use crate::param::Param;
use crate::primitives::{Address, I256};

/// Solidity ABI token types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic array
    Array(Vec<Token>),
    /// Fixed-size array
    FixedArray(Vec<Token>),
    /// Tuple (struct)
    Tuple(Vec<Token>),
}

impl Token {
    /// Create a uint256 from u128
    pub fn uint(value: u128) -> Self {
        Token::Uint(U256::from(value))
    }

    /// Create an int token from i128
    pub fn int(value: i128) -> Self {
        Token::Int(I256::from_i128(value))
    }

    /// Create a string token
    pub fn string(s: impl Into<String>) -> Self {
        Token::String(s.into())
    }

    /// Create a bytes32 token
    pub fn bytes32(data: H256) -> Self {
        Token::FixedBytes(data.as_bytes().to_vec())
    }

    /// Short description of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::Int(_) => "int",
            Token::Bool(_) => "bool",
            Token::Bytes(_) => "bytes",
            Token::FixedBytes(_) => "fixed bytes",
            Token::String(_) => "string",
            Token::Array(_) => "array",
            Token::FixedArray(_) => "fixed array",
            Token::Tuple(_) => "tuple",
        }
    }

    /// Borrow the address, if this is one
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Token::Address(a) => Some(a),
            _ => None,
        }
    }

    /// Borrow the unsigned value, if this is one
    pub fn as_uint(&self) -> Option<&U256> {
        match self {
            Token::Uint(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the string, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Address> for Token {
    fn from(value: Address) -> Self {
        Token::Address(value)
    }
}

impl From<U256> for Token {
    fn from(value: U256) -> Self {
        Token::Uint(value)
    }
}

impl From<I256> for Token {
    fn from(value: I256) -> Self {
        Token::Int(value)
    }
}

impl From<bool> for Token {
    fn from(value: bool) -> Self {
        Token::Bool(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::String(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::String(value)
    }
}

/// Values supplied for encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Values {
    /// In parameter order
    Positional(Vec<Token>),
    /// Keyed by parameter name; every parameter must be named
    Named(BTreeMap<String, Token>),
}

impl Values {
    /// Number of values supplied
    pub fn len(&self) -> usize {
        match self {
            Values::Positional(tokens) => tokens.len(),
            Values::Named(map) => map.len(),
        }
    }

    /// Whether no values were supplied
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Order the values to match `params`
    pub fn into_ordered(self, params: &[Param]) -> Result<Vec<Token>> {
        if self.len() != params.len() {
            return Err(AbiError::LengthMismatch {
                expected: params.len(),
                actual: self.len(),
            });
        }
        match self {
            Values::Positional(tokens) => Ok(tokens),
            Values::Named(mut map) => params
                .iter()
                .map(|p| {
                    if p.name.is_empty() {
                        return Err(AbiError::UnnamedParameter);
                    }
                    map.remove(&p.name)
                        .ok_or_else(|| AbiError::MissingValue(p.name.clone()))
                })
                .collect(),
        }
    }
}

impl From<Vec<Token>> for Values {
    fn from(tokens: Vec<Token>) -> Self {
        Values::Positional(tokens)
    }
}

impl From<&[Token]> for Values {
    fn from(tokens: &[Token]) -> Self {
        Values::Positional(tokens.to_vec())
    }
}

impl<const N: usize> From<[Token; N]> for Values {
    fn from(tokens: [Token; N]) -> Self {
        Values::Positional(tokens.to_vec())
    }
}

impl From<BTreeMap<String, Token>> for Values {
    fn from(map: BTreeMap<String, Token>) -> Self {
        Values::Named(map)
    }
}

/// Decoded values, shaped by [`CodecConfig`](crate::CodecConfig)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Zero parameters
    Empty,
    /// Exactly one parameter, unwrapped
    Single(Token),
    /// Values in parameter order
    List(Vec<Token>),
    /// Values keyed by parameter name (index when unnamed)
    Named(Vec<(String, Token)>),
}

impl Decoded {
    /// Flatten into parameter order regardless of shape
    pub fn into_tokens(self) -> Vec<Token> {
        match self {
            Decoded::Empty => Vec::new(),
            Decoded::Single(token) => vec![token],
            Decoded::List(tokens) => tokens,
            Decoded::Named(pairs) => pairs.into_iter().map(|(_, t)| t).collect(),
        }
    }

    /// Look up a named value
    pub fn get(&self, name: &str) -> Option<&Token> {
        match self {
            Decoded::Named(pairs) => pairs.iter().find(|(n, _)| n == name).map(|(_, t)| t),
            _ => None,
        }
    }
}
