//! Value primitives the codec is built on: addresses, signed 256-bit
//! integers and Keccak-256.

use std::fmt;
use std::str::FromStr;

use primitive_types::{H256, U256};
use sha3::{Digest, Keccak256};

use crate::error::AbiError;

/// Four-byte function or error selector
pub type Selector = [u8; 4];

/// Compute Keccak-256 of the input
pub fn keccak256(data: impl AsRef<[u8]>) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data.as_ref());
    H256::from_slice(hasher.finalize().as_slice())
}

/// First four bytes of `keccak256(signature)`
pub fn selector(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash.as_bytes()[..4]);
    out
}

/// 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Size in bytes
    pub const LEN: usize = 20;

    /// The zero address
    pub const ZERO: Address = Address([0u8; 20]);

    /// Wrap raw bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Copy from a slice that must be exactly 20 bytes
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; 20] = slice.try_into().ok()?;
        Some(Address(bytes))
    }

    /// Parse `0x`-prefixed or bare hex
    pub fn from_hex(s: &str) -> Result<Self, AbiError> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| AbiError::TypeMismatch {
            expected: "address".into(),
            actual: format!("invalid hex `{s}` ({e})"),
        })?;
        Self::from_slice(&bytes).ok_or_else(|| AbiError::TypeMismatch {
            expected: "address".into(),
            actual: format!("{} bytes", bytes.len()),
        })
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex with `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Address {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Signed 256-bit integer in sign-magnitude form
///
/// Zero is never negative; [`I256::new`] normalizes `-0` to `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct I256 {
    /// Absolute value
    pub abs: U256,
    /// Sign (true if negative)
    pub negative: bool,
}

impl I256 {
    /// Create from magnitude and sign
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether the value fits a signed integer of `bits` width
    pub fn fits(&self, bits: usize) -> bool {
        if bits == 0 || bits > 256 {
            return false;
        }
        // |min| = 2^(bits-1), max = 2^(bits-1) - 1
        let half = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= half
        } else {
            self.abs < half
        }
    }

    /// Two's complement big-endian word
    pub fn to_word(&self) -> [u8; 32] {
        let raw = if self.negative {
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            self.abs
        };
        let mut word = [0u8; 32];
        raw.to_big_endian(&mut word);
        word
    }

    /// Interpret a big-endian two's complement word
    pub fn from_word(word: &[u8; 32]) -> Self {
        let raw = U256::from_big_endian(word);
        if word[0] & 0x80 != 0 {
            Self::new((!raw).overflowing_add(U256::one()).0, true)
        } else {
            Self::new(raw, false)
        }
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}
