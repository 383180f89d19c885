//! Human-readable ABI parsing
//!
//! ```
//! use bach_abi::human_readable::parse_abi;
//!
//! let items = parse_abi(&[
//!     "struct Order { address maker; uint256 amount; }",
//!     "function fill(Order order) external returns (bool)",
//!     "event Filled(address indexed maker, uint256 amount)",
//! ])
//! .unwrap();
//! assert_eq!(items.len(), 2);
//! ```

mod parameter;
mod signature;
mod structs;

use crate::error::{AbiError, Result};
use crate::item::{AbiItem, Constructor, CustomError, Event, Fallback, Function, ItemKind, Receive};
use crate::param::Param;

use parameter::{parse_param, parse_params, ParamContext};
use signature::{is_struct, split_declaration};
use structs::StructTable;

/// Indexed inputs a non-anonymous event may carry
const MAX_INDEXED: usize = 3;

/// Parse declarations into ABI items
///
/// Struct declarations may appear anywhere in the list and are usable by
/// every other entry. Blank lines are skipped.
pub fn parse_abi<S: AsRef<str>>(signatures: &[S]) -> Result<Vec<AbiItem>> {
    let mut structs = StructTable::build(signatures)?;

    let mut items = Vec::new();
    for signature in callables(signatures) {
        let item = parse_item(signature, &mut structs).map_err(|e| e.in_signature(signature))?;
        items.push(item);
    }
    tracing::debug!("Parsed {} ABI items ({} structs)", items.len(), structs.len());

    Ok(items)
}

/// Parse exactly one declaration, with optional supporting structs
pub fn parse_abi_item<S: AsRef<str>>(signatures: &[S]) -> Result<AbiItem> {
    let mut items = parse_abi(signatures)?;
    match items.len() {
        1 => Ok(items.remove(0)),
        n => Err(AbiError::InvalidSignature {
            signature: joined(signatures),
            reason: format!("expected one declaration, found {n}"),
        }),
    }
}

/// Parse a single parameter such as `address indexed from`
pub fn parse_abi_parameter(param: &str) -> Result<Param> {
    parse_param(param, ParamContext::Standalone, &mut StructTable::default(), 0)
        .map_err(|e| e.in_signature(param))
}

/// Parse parameter lists, with optional supporting structs
///
/// Every entry that is not a struct declaration is a comma-separated list;
/// the lists are concatenated in order.
pub fn parse_abi_parameters<S: AsRef<str>>(signatures: &[S]) -> Result<Vec<Param>> {
    let mut structs = StructTable::build(signatures)?;

    let mut params = Vec::new();
    for list in callables(signatures) {
        let parsed = parse_params(list, ParamContext::Standalone, &mut structs).map_err(|e| e.in_signature(list))?;
        params.extend(parsed);
    }
    if params.is_empty() {
        return Err(AbiError::InvalidSignature {
            signature: joined(signatures),
            reason: "no parameters".to_string(),
        });
    }
    Ok(params)
}

fn callables<S: AsRef<str>>(signatures: &[S]) -> impl Iterator<Item = &str> {
    signatures
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.trim().is_empty() && !is_struct(s))
}

fn joined<S: AsRef<str>>(signatures: &[S]) -> String {
    signatures.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("; ")
}

fn parse_item(signature: &str, structs: &mut StructTable) -> Result<AbiItem> {
    let declaration = split_declaration(signature)?;
    let kind = declaration.kind;
    let inputs = parse_params(declaration.params, ParamContext::Inputs(kind), structs)?;

    let item = match kind {
        ItemKind::Function => AbiItem::Function(Function {
            name: declaration.name.to_string(),
            inputs,
            outputs: match declaration.returns {
                Some(returns) => parse_params(returns, ParamContext::Outputs, structs)?,
                None => Vec::new(),
            },
            state_mutability: declaration.state_mutability,
        }),
        ItemKind::Event => {
            let indexed = inputs.iter().filter(|p| p.is_indexed()).count();
            let limit = if declaration.anonymous { MAX_INDEXED + 1 } else { MAX_INDEXED };
            if indexed > limit {
                return Err(AbiError::InvalidSignature {
                    signature: signature.to_string(),
                    reason: format!("{indexed} indexed parameters, at most {limit} allowed"),
                });
            }
            AbiItem::Event(Event {
                name: declaration.name.to_string(),
                inputs,
                anonymous: declaration.anonymous,
            })
        }
        ItemKind::Error => AbiItem::Error(CustomError {
            name: declaration.name.to_string(),
            inputs,
        }),
        ItemKind::Constructor => AbiItem::Constructor(Constructor {
            inputs,
            state_mutability: declaration.state_mutability,
        }),
        ItemKind::Fallback | ItemKind::Receive if !inputs.is_empty() => {
            return Err(AbiError::InvalidSignature {
                signature: signature.to_string(),
                reason: format!("{kind} takes no parameters"),
            })
        }
        ItemKind::Fallback => AbiItem::Fallback(Fallback {
            state_mutability: declaration.state_mutability,
        }),
        ItemKind::Receive => AbiItem::Receive(Receive::default()),
    };
    Ok(item)
}
