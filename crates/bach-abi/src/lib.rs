//! # bach-abi
//!
//! Ethereum contract ABI codec for BachLedger.
//!
//! ## Features
//!
//! - **Human-readable ABI**: parse `function`, `event`, `error`,
//!   `constructor`, `fallback`, `receive` and `struct` declarations
//! - **JSON ABI**: load and emit the standard JSON form
//! - **Encoding**: head/tail ABI encoding and `abi.encodePacked`
//! - **Decoding**: bounds-checked decoding of call data, return data,
//!   revert data and event logs
//! - **Overloads**: argument-driven overload selection, ambiguity rejection
//!
//! ## Quick Start
//!
//! ```rust
//! use bach_abi::{Abi, CodecConfig, Decoded, Token};
//!
//! let abi = Abi::parse_human_readable(&[
//!     "function balanceOf(address owner) view returns (uint256)",
//!     "function transfer(address to, uint256 amount) returns (bool)",
//! ])
//! .unwrap();
//!
//! let to = "0x1234567890123456789012345678901234567890".parse().unwrap();
//! let data = abi
//!     .encode_function_data("transfer", vec![Token::Address(to), Token::uint(1000)])
//!     .unwrap();
//! assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
//!
//! let mut ret = [0u8; 32];
//! ret[31] = 1;
//! let result = abi
//!     .decode_function_result("transfer", &ret, &CodecConfig::default())
//!     .unwrap();
//! assert_eq!(result, Decoded::Single(Token::Bool(true)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod abi;
mod config;
mod decode;
mod encode;
mod error;
pub mod human_readable;
mod item;
mod packed;
mod param;
mod param_type;
mod primitives;
pub mod resolver;
mod token;

pub use abi::Abi;
pub use config::{CodecConfig, DecodeShape};
pub use decode::{decode, decode_params};
pub use encode::{encode, encode_function_call, encode_tokens, encode_with};
pub use error::{AbiError, ParenSide, Result};
pub use human_readable::{parse_abi, parse_abi_item, parse_abi_parameter, parse_abi_parameters};
pub use item::{AbiItem, Constructor, CustomError, Event, Fallback, Function, ItemKind, Receive, StateMutability};
pub use packed::{encode_packed, encode_packed_str, is_packable};
pub use param::Param;
pub use param_type::ParamType;
pub use primitives::{keccak256, selector, Address, Selector, I256};
pub use token::{Decoded, Token, Values};

pub use primitive_types::{H256, U256};
