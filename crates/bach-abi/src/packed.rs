//! Non-standard packed encoding (`abi.encodePacked`)
//!
//! Values are concatenated at their natural width with no offsets or
//! length words. Array elements are the exception: each one is padded to a
//! full word. Tuples, and arrays whose elements are `string` or `bytes`,
//! have no packed form.

use crate::encode::{
    address_word, bool_word, check_array_len, check_fixed_bytes, int_word, type_mismatch, uint_word,
};
use crate::error::{AbiError, Result};
use crate::param_type::ParamType;
use crate::token::Token;

/// Packed-encode tokens against types
pub fn encode_packed(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>> {
    if types.len() != tokens.len() {
        return Err(AbiError::LengthMismatch {
            expected: types.len(),
            actual: tokens.len(),
        });
    }
    for ty in types {
        check_packable(ty, false)?;
    }

    let mut out = Vec::new();
    for (ty, token) in types.iter().zip(tokens) {
        pack(ty, token, false, &mut out)?;
    }
    Ok(out)
}

/// Packed-encode tokens against type strings such as `["address", "string"]`
pub fn encode_packed_str(types: &[&str], tokens: &[Token]) -> Result<Vec<u8>> {
    let types = types
        .iter()
        .map(|t| ParamType::parse(t))
        .collect::<Result<Vec<_>>>()?;
    encode_packed(&types, tokens)
}

/// Whether a type has a packed encoding
pub fn is_packable(ty: &ParamType) -> bool {
    check_packable(ty, false).is_ok()
}

fn check_packable(ty: &ParamType, in_array: bool) -> Result<()> {
    match ty {
        ParamType::Tuple(_) => Err(AbiError::UnsupportedPackedType(ty.to_string())),
        ParamType::String | ParamType::Bytes if in_array => {
            Err(AbiError::UnsupportedPackedType(format!("{ty}[]")))
        }
        ParamType::Array(inner) | ParamType::FixedArray(inner, _) => check_packable(inner, true),
        _ => Ok(()),
    }
}

fn pack(ty: &ParamType, token: &Token, in_array: bool, out: &mut Vec<u8>) -> Result<()> {
    match (ty, token) {
        (ParamType::Address, Token::Address(addr)) => {
            if in_array {
                out.extend(address_word(addr));
            } else {
                out.extend_from_slice(addr.as_bytes());
            }
        }
        (ParamType::Bool, Token::Bool(b)) => {
            let word = bool_word(*b);
            out.extend_from_slice(narrow(&word, in_array, 1));
        }
        (ParamType::Uint(bits), Token::Uint(value)) => {
            let word = uint_word(*bits, value)?;
            out.extend_from_slice(narrow(&word, in_array, bits / 8));
        }
        (ParamType::Int(bits), Token::Int(value)) => {
            let word = int_word(*bits, value)?;
            out.extend_from_slice(narrow(&word, in_array, bits / 8));
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
            check_fixed_bytes(*size, data)?;
            out.extend_from_slice(data);
            if in_array {
                out.resize(out.len() + 32 - size, 0);
            }
        }
        (ParamType::String, Token::String(s)) => out.extend_from_slice(s.as_bytes()),
        (ParamType::Bytes, Token::Bytes(data)) => out.extend_from_slice(data),
        (ParamType::Array(inner), Token::Array(tokens)) => {
            for t in tokens {
                pack(inner, t, true, out)?;
            }
        }
        (ParamType::FixedArray(inner, size), Token::FixedArray(tokens) | Token::Array(tokens)) => {
            check_array_len(ty, *size, tokens.len())?;
            for t in tokens {
                pack(inner, t, true, out)?;
            }
        }
        (ParamType::Tuple(_), _) => return Err(AbiError::UnsupportedPackedType(ty.to_string())),
        _ => return Err(type_mismatch(ty, token)),
    }
    Ok(())
}

/// Low `width` bytes of a word, or the whole word inside arrays
fn narrow(word: &[u8; 32], in_array: bool, width: usize) -> &[u8] {
    if in_array {
        word
    } else {
        &word[32 - width..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Address;

    fn addr() -> Address {
        Address::from_hex("0xd8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap()
    }

    #[test]
    fn test_packed_address_string() {
        let out = encode_packed_str(&["address", "string"], &[Token::Address(addr()), Token::string("hello world")])
            .unwrap();
        assert_eq!(out.len(), 31);
        assert_eq!(&out[..20], addr().as_bytes());
        assert_eq!(&out[20..], b"hello world");
    }

    #[test]
    fn test_packed_natural_widths() {
        let out = encode_packed_str(
            &["uint8", "int16", "bool", "bytes2", "uint32"],
            &[
                Token::uint(0xab),
                Token::int(-2),
                Token::Bool(true),
                Token::FixedBytes(vec![0xca, 0xfe]),
                Token::uint(1),
            ],
        )
        .unwrap();
        assert_eq!(hex::encode(out), "abfffe01cafe00000001");
    }

    #[test]
    fn test_packed_array_elements_padded() {
        let out = encode_packed_str(
            &["uint8[]", "bool[2]"],
            &[
                Token::Array(vec![Token::uint(1), Token::uint(2)]),
                Token::FixedArray(vec![Token::Bool(true), Token::Bool(false)]),
            ],
        )
        .unwrap();
        assert_eq!(out.len(), 4 * 32);
        assert_eq!(out[31], 1);
        assert_eq!(out[63], 2);
        assert_eq!(out[95], 1);
        assert_eq!(out[127], 0);
    }

    #[test]
    fn test_packed_bytes_n_in_array_right_padded() {
        let out = encode_packed_str(&["bytes2[]"], &[Token::Array(vec![Token::FixedBytes(vec![1, 2])])]).unwrap();
        assert_eq!(out.len(), 32);
        assert_eq!(&out[..2], &[1, 2]);
        assert!(out[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_packed_size_mismatch() {
        let err = encode_packed_str(&["bytes4"], &[Token::FixedBytes(vec![1, 2, 3])]).unwrap_err();
        assert!(matches!(err, AbiError::FixedBytesSizeMismatch { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_packed_count_mismatch_before_encoding() {
        let err = encode_packed_str(&["(uint256)", "bool"], &[Token::Bool(true)]).unwrap_err();
        assert!(matches!(err, AbiError::LengthMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_packable_boundary() {
        for ok in ["address", "string", "bytes", "uint8[]", "bytes32[3]", "uint256[][]", "int8[2][]"] {
            assert!(is_packable(&ParamType::parse(ok).unwrap()), "{ok}");
        }
        for bad in ["(uint256)", "string[]", "bytes[2]", "(bool)[]", "string[][]"] {
            assert!(!is_packable(&ParamType::parse(bad).unwrap()), "{bad}");
        }
    }
}
