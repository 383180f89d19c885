//! Encoding and decoding tests for bach-abi
//!
//! Byte-exact layouts, decode bounds checks and result shaping.

use std::collections::BTreeMap;

use bach_abi::{
    decode, decode_params, encode, encode_function_call, encode_packed_str, encode_tokens, encode_with,
    parse_abi_parameters, selector, AbiError, Address, CodecConfig, DecodeShape, Decoded, Param, ParamType,
    Token, U256,
};

fn num(n: u64) -> String {
    format!("{n:064x}")
}

fn text(s: &str) -> String {
    let mut h = hex::encode(s);
    while h.len() % 64 != 0 {
        h.push('0');
    }
    h
}

fn params(list: &str) -> Vec<Param> {
    parse_abi_parameters(&[list]).unwrap()
}

// ==================== Head/Tail Layout Tests ====================

/// `uint256, string` with `(1, "hi")`
#[test]
fn test_uint_string_layout() {
    let data = encode(&params("uint256 a, string b"), vec![Token::uint(1), Token::string("hi")]).unwrap();
    let expected = [num(1), num(0x40), num(2), text("hi")].concat();
    assert_eq!(hex::encode(&data), expected);
}

/// Solidity docs example `f(uint256,uint32[],bytes10,bytes)`
#[test]
fn test_mixed_static_dynamic_layout() {
    let types = params("uint256, uint32[], bytes10, bytes");
    let data = encode_function_call(
        selector("f(uint256,uint32[],bytes10,bytes)"),
        &types,
        vec![
            Token::uint(0x123),
            Token::Array(vec![Token::uint(0x456), Token::uint(0x789)]),
            Token::FixedBytes(b"1234567890".to_vec()),
            Token::Bytes(b"Hello, world!".to_vec()),
        ],
    )
    .unwrap();

    let expected = [
        "8be65246".to_string(),
        num(0x123),
        num(0x80),
        text("1234567890"),
        num(0xe0),
        num(2),
        num(0x456),
        num(0x789),
        num(13),
        text("Hello, world!"),
    ]
    .concat();
    assert_eq!(hex::encode(&data), expected);
}

/// Solidity docs example `g(uint256[][],string[])`
#[test]
fn test_nested_dynamic_layout() {
    let types = params("uint256[][], string[]");
    let values = vec![
        Token::Array(vec![
            Token::Array(vec![Token::uint(1), Token::uint(2)]),
            Token::Array(vec![Token::uint(3)]),
        ]),
        Token::Array(vec![Token::string("one"), Token::string("two"), Token::string("three")]),
    ];
    let data = encode_function_call(selector("g(uint256[][],string[])"), &types, values.clone()).unwrap();

    let expected = [
        "2289b18c".to_string(),
        num(0x40),
        num(0x140),
        num(2),
        num(0x40),
        num(0xa0),
        num(2),
        num(1),
        num(2),
        num(1),
        num(3),
        num(3),
        num(0x60),
        num(0xa0),
        num(0xe0),
        num(3),
        text("one"),
        num(3),
        text("two"),
        num(5),
        text("three"),
    ]
    .concat();
    assert_eq!(hex::encode(&data), expected);

    let kinds: Vec<ParamType> = types.into_iter().map(|p| p.kind).collect();
    assert_eq!(decode(&kinds, &data[4..]).unwrap(), values);
}

/// Static tuples and fixed arrays are inlined in the head
#[test]
fn test_static_tuple_inlined() {
    let types = params("(uint8 a, bool b) pair, uint16[2] xs, uint256 tail");
    let data = encode(
        &types,
        vec![
            Token::Tuple(vec![Token::uint(7), Token::Bool(true)]),
            Token::FixedArray(vec![Token::uint(1), Token::uint(2)]),
            Token::uint(9),
        ],
    )
    .unwrap();
    assert_eq!(hex::encode(&data), [num(7), num(1), num(1), num(2), num(9)].concat());
}

/// Dynamic tuple gets an offset; its members are laid out relative to the tuple
#[test]
fn test_dynamic_tuple_offsets() {
    let types = params("(uint256 id, string name) item");
    let data = encode(&types, vec![Token::Tuple(vec![Token::uint(5), Token::string("bach")])]).unwrap();
    assert_eq!(
        hex::encode(&data),
        [num(0x20), num(5), num(0x40), num(4), text("bach")].concat()
    );
}

/// Negative integers are sign-extended
#[test]
fn test_negative_int_word() {
    let data = encode_tokens(&[ParamType::Int(8)], &[Token::int(-1)]).unwrap();
    assert_eq!(data, vec![0xff; 32]);
    assert_eq!(decode(&[ParamType::Int(8)], &data).unwrap(), vec![Token::int(-1)]);
}

// ==================== Value Validation Tests ====================

#[test]
fn test_count_mismatch() {
    let err = encode(&params("uint256, bool"), vec![Token::uint(1)]).unwrap_err();
    assert!(matches!(err, AbiError::LengthMismatch { expected: 2, actual: 1 }));
}

#[test]
fn test_type_mismatch() {
    let err = encode(&params("uint256"), vec![Token::string("1")]).unwrap_err();
    assert!(matches!(err, AbiError::TypeMismatch { .. }));
}

#[test]
fn test_integer_range() {
    assert!(matches!(
        encode(&params("uint8"), vec![Token::uint(256)]).unwrap_err(),
        AbiError::IntegerOutOfRange { .. }
    ));
    assert!(matches!(
        encode(&params("int8"), vec![Token::int(-129)]).unwrap_err(),
        AbiError::IntegerOutOfRange { .. }
    ));
    assert!(encode(&params("int8"), vec![Token::int(-128)]).is_ok());
}

#[test]
fn test_fixed_sizes() {
    assert!(matches!(
        encode(&params("bytes4"), vec![Token::FixedBytes(vec![1, 2, 3])]).unwrap_err(),
        AbiError::FixedBytesSizeMismatch { expected: 4, actual: 3 }
    ));
    assert!(matches!(
        encode(&params("bool[3]"), vec![Token::FixedArray(vec![Token::Bool(true)])]).unwrap_err(),
        AbiError::ArrayLengthMismatch { expected: 3, actual: 1, .. }
    ));
}

#[test]
fn test_named_values() {
    let types = params("address owner, uint256 amount");
    let owner = Address::from_bytes([0x11; 20]);

    let mut named = BTreeMap::new();
    named.insert("amount".to_string(), Token::uint(3));
    named.insert("owner".to_string(), Token::Address(owner));
    let by_name = encode(&types, named).unwrap();
    let by_position = encode(&types, vec![Token::Address(owner), Token::uint(3)]).unwrap();
    assert_eq!(by_name, by_position);

    let mut missing = BTreeMap::new();
    missing.insert("owner".to_string(), Token::Address(owner));
    missing.insert("value".to_string(), Token::uint(3));
    assert!(matches!(encode(&types, missing).unwrap_err(), AbiError::MissingValue(name) if name == "amount"));

    let mut unnamed = BTreeMap::new();
    unnamed.insert("x".to_string(), Token::uint(3));
    assert!(matches!(
        encode(&params("uint256"), unnamed).unwrap_err(),
        AbiError::UnnamedParameter
    ));
}

#[test]
fn test_encode_depth_ceiling() {
    let types = params("uint8[][][] deep");
    let value = Token::Array(vec![Token::Array(vec![Token::Array(vec![Token::uint(1)])])]);
    let shallow = CodecConfig {
        max_depth: 2,
        ..CodecConfig::default()
    };
    assert!(matches!(
        encode_with(&types, vec![value.clone()], &shallow).unwrap_err(),
        AbiError::MaxDepthExceeded(2)
    ));
    assert!(encode_with(&types, vec![value], &CodecConfig::default()).is_ok());
}

// ==================== Decode Boundary Tests ====================

#[test]
fn test_decode_insufficient_head() {
    let err = decode(&[ParamType::Uint(256), ParamType::Uint(256)], &[0u8; 32]).unwrap_err();
    assert!(matches!(err, AbiError::InsufficientData { expected: 64, actual: 32 }));
}

#[test]
fn test_decode_truncated_tail() {
    let mut data = encode(&params("string"), vec![Token::string("hello")]).unwrap();
    data.truncate(64 + 3);
    assert!(matches!(
        decode(&[ParamType::String], &data).unwrap_err(),
        AbiError::InsufficientData { .. }
    ));
}

#[test]
fn test_decode_offset_out_of_range() {
    let mut data = vec![0u8; 64];
    data[31] = 0xff;
    assert!(decode(&[ParamType::Bytes], &data).is_err());
}

#[test]
fn test_decode_huge_array_count() {
    let mut data = vec![0u8; 64];
    data[31] = 0x20;
    data[63] = 0x40;
    assert!(decode(&[ParamType::Array(Box::new(ParamType::Uint(256)))], &data).is_err());
}

#[test]
fn test_decode_zero_data() {
    assert!(matches!(
        decode(&[ParamType::Bool], &[]).unwrap_err(),
        AbiError::ZeroData(1)
    ));
}

#[test]
fn test_decode_strict_words() {
    let mut word = [0u8; 32];
    word[31] = 2;
    assert!(matches!(decode(&[ParamType::Bool], &word).unwrap_err(), AbiError::InvalidBool(0)));

    word[31] = 0;
    word[30] = 1;
    assert!(matches!(
        decode(&[ParamType::Uint(8)], &word).unwrap_err(),
        AbiError::IntegerOutOfRange { .. }
    ));

    let bad_utf8 = [num(0x20), num(1), "ff".to_string() + &"00".repeat(31)].concat();
    assert!(matches!(
        decode(&[ParamType::String], &hex::decode(bad_utf8).unwrap()).unwrap_err(),
        AbiError::InvalidUtf8(_)
    ));
}

#[test]
fn test_decode_strict_padding() {
    let mut word = [0u8; 32];
    word[11] = 1;
    assert!(matches!(
        decode(&[ParamType::Address], &word).unwrap_err(),
        AbiError::InvalidPadding { position: 0, .. }
    ));

    let mut word = [0u8; 32];
    word[0] = 0x12;
    word[1] = 0x34;
    word[31] = 1;
    assert!(matches!(
        decode(&[ParamType::FixedBytes(2)], &word).unwrap_err(),
        AbiError::InvalidPadding { .. }
    ));
    word[31] = 0;
    assert_eq!(decode(&[ParamType::FixedBytes(2)], &word).unwrap(), vec![Token::FixedBytes(vec![0x12, 0x34])]);
}

/// Dimensions whose head size does not fit in a `usize`
#[test]
fn test_oversized_fixed_array_dimensions() {
    let huge = ParamType::parse("uint256[576460752303423488]").unwrap();
    assert!(matches!(
        decode(std::slice::from_ref(&huge), &[0u8; 32]).unwrap_err(),
        AbiError::TypeTooLarge(_)
    ));
    assert!(matches!(
        encode_tokens(&[huge], &[Token::FixedArray(vec![])]).unwrap_err(),
        AbiError::TypeTooLarge(_)
    ));

    // Representable, but far larger than any value or payload
    let large = ParamType::parse("uint256[1000000000000]").unwrap();
    assert!(matches!(
        encode_tokens(std::slice::from_ref(&large), &[Token::FixedArray(vec![])]).unwrap_err(),
        AbiError::ArrayLengthMismatch { actual: 0, .. }
    ));
    assert!(matches!(
        decode(&[large], &[0u8; 32]).unwrap_err(),
        AbiError::InsufficientData { .. }
    ));
}

#[test]
fn test_decode_fixed_array_count_exceeds_payload() {
    // `string[100000000000]` has a one-word head; the elements are never there
    let huge = ParamType::parse("string[100000000000]").unwrap();
    let data = hex::decode(num(0x20) + &num(0)).unwrap();
    assert!(matches!(decode(&[huge], &data).unwrap_err(), AbiError::InsufficientData { .. }));

    // Three element offsets declared, one present
    let data = hex::decode(num(0x20) + &num(0x60)).unwrap();
    assert!(matches!(
        decode(&[ParamType::parse("string[3]").unwrap()], &data).unwrap_err(),
        AbiError::InsufficientData { expected: 128, actual: 64 }
    ));
}

// ==================== Result Shape Tests ====================

#[test]
fn test_empty_outputs() {
    let config = CodecConfig::default();
    assert_eq!(decode_params(&[], &[], &config).unwrap(), Decoded::Empty);
    assert_eq!(decode_params(&[], &[1, 2, 3], &config).unwrap(), Decoded::Empty);
}

#[test]
fn test_single_value_unwrapped() {
    let types = params("uint256 balance");
    let data = encode(&types, vec![Token::uint(10)]).unwrap();

    let config = CodecConfig::default();
    assert_eq!(decode_params(&types, &data, &config).unwrap(), Decoded::Single(Token::uint(10)));

    let config = config.with_unwrap_single(false);
    assert_eq!(
        decode_params(&types, &data, &config).unwrap(),
        Decoded::List(vec![Token::uint(10)])
    );
}

#[test]
fn test_object_shape() {
    let types = params("address owner, uint256, bool ok");
    let owner = Address::from_bytes([0x22; 20]);
    let data = encode(&types, vec![Token::Address(owner), Token::uint(1), Token::Bool(true)]).unwrap();

    let config = CodecConfig::default().with_shape(DecodeShape::Object);
    let decoded = decode_params(&types, &data, &config).unwrap();
    assert_eq!(decoded.get("owner"), Some(&Token::Address(owner)));
    assert_eq!(decoded.get("1"), Some(&Token::Uint(U256::one())));
    assert_eq!(decoded.get("ok"), Some(&Token::Bool(true)));
    assert_eq!(decoded.into_tokens().len(), 3);
}

#[test]
fn test_config_from_toml() {
    let config = CodecConfig::from_toml_str("decode_as = \"object\"\nunwrap_single = false").unwrap();
    assert_eq!(config.decode_as, DecodeShape::Object);
    assert!(!config.unwrap_single);
    assert_eq!(config.max_depth, 64);
}

// ==================== Packed Encoding Tests ====================

#[test]
fn test_packed_address_string() {
    let addr = Address::from_bytes([0xab; 20]);
    let out = encode_packed_str(&["address", "string"], &[Token::Address(addr), Token::string("hello world")]).unwrap();
    assert_eq!(out.len(), 20 + 11);
    assert_eq!(hex::encode(&out), "ab".repeat(20) + &hex::encode("hello world"));
}

#[test]
fn test_packed_rejects_tuples() {
    let err = encode_packed_str(&["(uint256,bool)"], &[Token::Tuple(vec![Token::uint(1), Token::Bool(true)])])
        .unwrap_err();
    assert!(matches!(err, AbiError::UnsupportedPackedType(_)));
}
