//! Human-readable and JSON parsing tests for bach-abi

use bach_abi::{
    parse_abi, parse_abi_item, parse_abi_parameter, parse_abi_parameters, AbiError, AbiItem, ParamType, ParenSide,
    StateMutability,
};
use serde_json::json;

// ==================== Struct Expansion Tests ====================

/// `Foo { string name; }` used as a parameter becomes a one-component tuple
#[test]
fn test_struct_becomes_tuple() {
    let item = parse_abi_item(&["struct Foo { string name; }", "function f(Foo foo)"]).unwrap();
    let json = serde_json::to_value(&item.inputs()[0]).unwrap();
    assert_eq!(
        json,
        json!({
            "name": "foo",
            "type": "tuple",
            "components": [{ "name": "name", "type": "string" }]
        })
    );
}

#[test]
fn test_nested_struct_arrays() {
    let items = parse_abi(&[
        "struct Leg { address pool; bytes data; }",
        "struct Route { Leg[] legs; uint256 minOut; }",
        "function swap(Route[2] routes) returns (uint256 out)",
    ])
    .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].signature().as_deref(), Some("swap(((address,bytes)[],uint256)[2])"));

    let json = serde_json::to_value(&items[0].inputs()[0]).unwrap();
    assert_eq!(json["type"], "tuple[2]");
    assert_eq!(json["components"][0]["type"], "tuple[]");
    assert_eq!(json["components"][0]["components"][1]["name"], "data");
}

#[test]
fn test_struct_self_reference_rejected() {
    let err = parse_abi(&["struct Node { uint256 value; Node next; }", "function f(Node n)"]).unwrap_err();
    assert!(matches!(err.root(), AbiError::CircularReference(name) if name == "Node"));
}

#[test]
fn test_struct_cycle_through_other_struct() {
    let err = parse_abi(&[
        "struct A { B b; }",
        "struct B { C c; }",
        "struct C { A a; }",
        "function f(A a)",
    ])
    .unwrap_err();
    assert!(matches!(err.root(), AbiError::CircularReference(_)));
}

#[test]
fn test_unresolved_struct_rejected() {
    let err = parse_abi(&["function f(Missing m)"]).unwrap_err();
    assert!(matches!(err.root(), AbiError::UnknownType(name) if name == "Missing"));
}

#[test]
fn test_deep_struct_chain_rejected() {
    let mut lines: Vec<String> = (0..1500).map(|i| format!("struct S{i} {{ S{} x; }}", i + 1)).collect();
    lines.push("struct S1500 { bool end; }".to_string());
    lines.push("function f(S0 s)".to_string());

    let err = parse_abi(&lines).unwrap_err();
    assert!(matches!(err.root(), AbiError::MaxDepthExceeded(64)), "{err}");
}

#[test]
fn test_struct_chain_within_ceiling() {
    let mut lines: Vec<String> = (0..20).map(|i| format!("struct S{i} {{ S{} x; }}", i + 1)).collect();
    lines.push("struct S20 { bool end; }".to_string());
    lines.push("function f(S0 s)".to_string());

    let items = parse_abi(&lines).unwrap();
    let expected = format!("f({}bool{})", "(".repeat(21), ")".repeat(21));
    assert_eq!(items[0].signature().as_deref(), Some(expected.as_str()));
}

#[test]
fn test_empty_struct_rejected() {
    let err = parse_abi(&["struct Nothing { }", "function f()"]).unwrap_err();
    assert!(matches!(err.root(), AbiError::EmptyStruct(name) if name == "Nothing"));
}

// ==================== Signature Tests ====================

#[test]
fn test_every_declaration_kind() {
    let items = parse_abi(&[
        "constructor(string name_) payable",
        "function getValue() external view returns (uint256)",
        "function set(uint256 value)",
        "event ValueSet(address indexed by, uint256 value)",
        "event Raw(bytes data) anonymous",
        "error Unauthorized(address caller)",
        "fallback() external",
        "receive() external payable",
    ])
    .unwrap();
    let kinds: Vec<String> = items.iter().map(|i| i.kind().to_string()).collect();
    assert_eq!(
        kinds,
        ["constructor", "function", "function", "event", "event", "error", "fallback", "receive"]
    );

    match &items[1] {
        AbiItem::Function(f) => {
            assert_eq!(f.state_mutability, StateMutability::View);
            assert_eq!(f.outputs[0].kind, ParamType::Uint(256));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(&items[4], AbiItem::Event(e) if e.anonymous));
}

#[test]
fn test_nested_tuple_parameters_not_truncated() {
    let item = parse_abi_item(&["function exec((address to, (uint256 v, bytes d)[] calls) plan, bool strict)"]).unwrap();
    assert_eq!(item.inputs().len(), 2);
    assert_eq!(item.signature().as_deref(), Some("exec((address,(uint256,bytes)[]),bool)"));
}

#[test]
fn test_unbalanced_parentheses() {
    match parse_abi(&["function f((uint256 a, bool b)"]).unwrap_err().root() {
        AbiError::UnbalancedParentheses { side, depth, .. } => {
            assert_eq!(*side, ParenSide::Opening);
            assert_eq!(*depth, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
    match parse_abi(&["function f(uint256 a))"]).unwrap_err().root() {
        AbiError::UnbalancedParentheses { side, .. } => assert_eq!(*side, ParenSide::Closing),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_unknown_signature() {
    let err = parse_abi(&["modifier onlyOwner()"]).unwrap_err();
    assert!(matches!(err.root(), AbiError::UnknownSignature(_)));
    assert!(err.to_string().contains("modifier onlyOwner()"));
}

#[test]
fn test_error_message_names_declaration() {
    let err = parse_abi(&["function f(uint256 memory x)"]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("memory"), "{message}");
    assert!(message.contains("function f(uint256 memory x)"), "{message}");
}

// ==================== Parameter Tests ====================

#[test]
fn test_modifiers_by_declaration_kind() {
    assert!(parse_abi(&["event E(string indexed s)"]).is_ok());
    assert!(parse_abi(&["function f(bytes calldata b) returns (string memory)"]).is_ok());

    for bad in [
        "function f(address indexed a)",
        "error E(string memory s)",
        "event E(string memory s)",
        "struct S { uint256 indexed a; }",
    ] {
        let err = parse_abi(&[bad, "function g()"]).unwrap_err();
        assert!(matches!(err.root(), AbiError::InvalidModifier { .. }), "{bad}: {err}");
    }
    assert!(matches!(
        parse_abi(&["function f(address calldata a)"]).unwrap_err().root(),
        AbiError::InvalidDataLocation { .. }
    ));
}

#[test]
fn test_protected_and_numeric_names() {
    assert!(matches!(
        parse_abi(&["function f(uint256 returns)"]).unwrap_err().root(),
        AbiError::ProtectedKeyword { name, .. } if name == "returns"
    ));
    assert!(matches!(
        parse_abi(&["function f(address address)"]).unwrap_err().root(),
        AbiError::ProtectedKeyword { .. }
    ));
    assert!(matches!(
        parse_abi(&["function f(uint256 42)"]).unwrap_err().root(),
        AbiError::NumericName { name, .. } if name == "42"
    ));
}

#[test]
fn test_type_normalization() {
    let param = parse_abi_parameter("uint[] memory values").unwrap();
    assert_eq!(param.canonical_type(), "uint256[]");
    assert_eq!(parse_abi_parameter("int x").unwrap().kind, ParamType::Int(256));
}

#[test]
fn test_unknown_types() {
    for bad in ["uint257 a", "int0 a", "bytes0 a", "bytes33 a", "uint08 a", "address[0] a", "addr a"] {
        assert!(parse_abi_parameter(bad).is_err(), "{bad}");
    }
}

#[test]
fn test_parameters_with_structs() {
    let params = parse_abi_parameters(&[
        "struct Point { int32 x; int32 y; }",
        "Point[] path, (Point from, Point to) segment",
    ])
    .unwrap();
    assert_eq!(params[0].canonical_type(), "(int32,int32)[]");
    assert_eq!(params[1].canonical_type(), "((int32,int32),(int32,int32))");
}

// ==================== JSON Equivalence Tests ====================

#[test]
fn test_json_and_human_readable_agree() {
    let human = parse_abi(&[
        "struct Order { address maker; uint256[] amounts; }",
        "function fill(Order order, bytes signature) payable returns (bool filled)",
        "event Filled(address indexed maker, uint256 total)",
        "error Expired(uint256 deadline)",
    ])
    .unwrap();

    let json: Vec<AbiItem> = serde_json::from_value(json!([
        {
            "type": "function",
            "name": "fill",
            "inputs": [
                {
                    "name": "order",
                    "type": "tuple",
                    "components": [
                        { "name": "maker", "type": "address" },
                        { "name": "amounts", "type": "uint256[]" }
                    ]
                },
                { "name": "signature", "type": "bytes" }
            ],
            "outputs": [{ "name": "filled", "type": "bool" }],
            "stateMutability": "payable"
        },
        {
            "type": "event",
            "name": "Filled",
            "inputs": [
                { "name": "maker", "type": "address", "indexed": true },
                { "name": "total", "type": "uint256", "indexed": false }
            ],
            "anonymous": false
        },
        {
            "type": "error",
            "name": "Expired",
            "inputs": [{ "name": "deadline", "type": "uint256" }]
        }
    ]))
    .unwrap();

    assert_eq!(human, json);
}

#[test]
fn test_json_tuple_requires_components() {
    let missing = serde_json::from_value::<AbiItem>(json!({
        "type": "function",
        "name": "f",
        "inputs": [{ "name": "t", "type": "tuple" }]
    }));
    assert!(missing.is_err());

    let empty = serde_json::from_value::<AbiItem>(json!({
        "type": "function",
        "name": "f",
        "inputs": [{ "name": "t", "type": "tuple[]", "components": [] }]
    }));
    assert!(empty.is_err());
}

#[test]
fn test_empty_tuple_spelling_rejected() {
    assert!(ParamType::parse("()").is_err());
    assert!(ParamType::parse("(uint256,())[]").is_err());

    let json = serde_json::from_value::<AbiItem>(json!({
        "type": "function",
        "name": "f",
        "inputs": [{ "name": "t", "type": "()" }]
    }));
    assert!(json.is_err());
}

#[test]
fn test_json_ignores_legacy_fields() {
    let item: AbiItem = serde_json::from_value(json!({
        "type": "function",
        "name": "owner",
        "constant": true,
        "payable": false,
        "inputs": [],
        "outputs": [{ "name": "", "type": "address", "internalType": "address" }],
        "stateMutability": "view"
    }))
    .unwrap();
    assert_eq!(item.to_human_readable(), "function owner() view returns (address)");
    assert_eq!(item.outputs()[0].internal_type.as_deref(), Some("address"));
}
