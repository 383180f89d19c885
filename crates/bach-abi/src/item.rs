//! ABI items: functions, events, errors, constructor, fallback and receive

use std::fmt;

use primitive_types::H256;
use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::decode::{decode, decode_params, decode_topic};
use crate::encode::encode;
use crate::error::{AbiError, Result};
use crate::param::Param;
use crate::param_type::ParamType;
use crate::primitives::{keccak256, selector, Selector};
use crate::token::{Decoded, Token, Values};

/// Function state mutability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    /// Reads nothing, writes nothing
    Pure,
    /// Reads state
    View,
    /// Writes state, rejects ether
    #[default]
    Nonpayable,
    /// Writes state, accepts ether
    Payable,
}

impl StateMutability {
    /// Keyword spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            StateMutability::Pure => "pure",
            StateMutability::View => "view",
            StateMutability::Nonpayable => "nonpayable",
            StateMutability::Payable => "payable",
        }
    }

    /// Parse a mutability keyword
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "pure" => Some(StateMutability::Pure),
            "view" => Some(StateMutability::View),
            "nonpayable" => Some(StateMutability::Nonpayable),
            "payable" => Some(StateMutability::Payable),
            _ => None,
        }
    }
}

impl fmt::Display for StateMutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item kind, as written in the JSON `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// `function`
    Function,
    /// `event`
    Event,
    /// `error`
    Error,
    /// `constructor`
    Constructor,
    /// `fallback`
    Fallback,
    /// `receive`
    Receive,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemKind::Function => "function",
            ItemKind::Event => "event",
            ItemKind::Error => "error",
            ItemKind::Constructor => "constructor",
            ItemKind::Fallback => "fallback",
            ItemKind::Receive => "receive",
        })
    }
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    /// Function name
    pub name: String,
    /// Input parameters
    #[serde(default)]
    pub inputs: Vec<Param>,
    /// Output parameters
    #[serde(default)]
    pub outputs: Vec<Param>,
    /// State mutability
    #[serde(default)]
    pub state_mutability: StateMutability,
}

impl Function {
    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }

    /// Function selector (4 bytes)
    pub fn selector(&self) -> Selector {
        selector(&self.signature())
    }

    /// Selector followed by the encoded arguments
    pub fn encode_input(&self, values: impl Into<Values>) -> Result<Vec<u8>> {
        let mut data = self.selector().to_vec();
        data.extend(encode(&self.inputs, values)?);
        Ok(data)
    }

    /// Decode arguments from calldata without its selector
    pub fn decode_input(&self, data: &[u8]) -> Result<Vec<Token>> {
        decode(&kinds(&self.inputs), data)
    }

    /// Encode return values
    pub fn encode_output(&self, values: impl Into<Values>) -> Result<Vec<u8>> {
        encode(&self.outputs, values)
    }

    /// Decode return data
    pub fn decode_output(&self, data: &[u8], config: &CodecConfig) -> Result<Decoded> {
        decode_params(&self.outputs, data, config)
    }
}

/// Event definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event name
    pub name: String,
    /// Inputs, some indexed
    #[serde(default)]
    pub inputs: Vec<Param>,
    /// Anonymous events have no signature topic
    #[serde(default)]
    pub anonymous: bool,
}

impl Event {
    /// Canonical signature, e.g. `Transfer(address,address,uint256)`
    pub fn signature(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }

    /// Signature topic (`topics[0]` of non-anonymous logs)
    pub fn topic(&self) -> H256 {
        keccak256(self.signature().as_bytes())
    }

    /// Decode a log into `(name, value)` pairs in declaration order
    ///
    /// Indexed value types are read back from their topic. Indexed
    /// `string`, `bytes`, arrays and tuples are stored hashed, so they come
    /// back as the 32-byte topic.
    pub fn decode_log(&self, topics: &[H256], data: &[u8]) -> Result<Vec<(String, Token)>> {
        let indexed_topics = if self.anonymous {
            topics
        } else {
            match topics.split_first() {
                Some((first, rest)) if *first == self.topic() => rest,
                Some(_) => {
                    return Err(AbiError::InvalidTopics(format!(
                        "topic0 does not match `{}`",
                        self.signature()
                    )))
                }
                None => return Err(AbiError::InvalidTopics("missing signature topic".to_string())),
            }
        };

        let indexed_count = self.inputs.iter().filter(|p| p.is_indexed()).count();
        if indexed_count != indexed_topics.len() {
            return Err(AbiError::InvalidTopics(format!(
                "expected {indexed_count} indexed topics, got {}",
                indexed_topics.len()
            )));
        }

        let body_types: Vec<ParamType> = self
            .inputs
            .iter()
            .filter(|p| !p.is_indexed())
            .map(|p| p.kind.clone())
            .collect();
        let mut body = decode(&body_types, data)?.into_iter();
        let mut topics = indexed_topics.iter();

        let mut values = Vec::with_capacity(self.inputs.len());
        for param in &self.inputs {
            let token = if param.is_indexed() {
                let topic = topics
                    .next()
                    .ok_or_else(|| AbiError::InvalidTopics("topic count changed".to_string()))?;
                if param.kind.is_elementary() && !param.kind.is_dynamic() {
                    decode_topic(&param.kind, topic)?
                } else {
                    Token::FixedBytes(topic.as_bytes().to_vec())
                }
            } else {
                body.next()
                    .ok_or(AbiError::LengthMismatch { expected: body_types.len(), actual: 0 })?
            };
            values.push((param.name.clone(), token));
        }
        Ok(values)
    }
}

/// Custom error definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomError {
    /// Error name
    pub name: String,
    /// Error arguments
    #[serde(default)]
    pub inputs: Vec<Param>,
}

impl CustomError {
    /// Canonical signature, e.g. `Error(string)`
    pub fn signature(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }

    /// Error selector (4 bytes)
    pub fn selector(&self) -> Selector {
        selector(&self.signature())
    }

    /// Selector followed by the encoded arguments
    pub fn encode(&self, values: impl Into<Values>) -> Result<Vec<u8>> {
        let mut data = self.selector().to_vec();
        data.extend(encode(&self.inputs, values)?);
        Ok(data)
    }

    /// Decode arguments from revert data without its selector
    pub fn decode(&self, data: &[u8]) -> Result<Vec<Token>> {
        decode(&kinds(&self.inputs), data)
    }

    /// Built-in `Error(string)` raised by `require` and `revert("...")`
    pub fn solidity_error() -> Self {
        Self {
            name: "Error".to_string(),
            inputs: vec![Param::new("message", ParamType::String)],
        }
    }

    /// Built-in `Panic(uint256)` raised by failed assertions
    pub fn solidity_panic() -> Self {
        Self {
            name: "Panic".to_string(),
            inputs: vec![Param::new("code", ParamType::Uint(256))],
        }
    }
}

/// Constructor definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    /// Constructor arguments
    #[serde(default)]
    pub inputs: Vec<Param>,
    /// State mutability
    #[serde(default)]
    pub state_mutability: StateMutability,
}

/// Fallback function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fallback {
    /// State mutability
    #[serde(default)]
    pub state_mutability: StateMutability,
}

/// Receive function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receive {
    /// Always payable
    #[serde(default = "payable")]
    pub state_mutability: StateMutability,
}

fn payable() -> StateMutability {
    StateMutability::Payable
}

impl Default for Receive {
    fn default() -> Self {
        Self {
            state_mutability: payable(),
        }
    }
}

/// One entry of a contract ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiItem {
    /// Function
    Function(Function),
    /// Event
    Event(Event),
    /// Custom error
    Error(CustomError),
    /// Constructor
    Constructor(Constructor),
    /// Fallback
    Fallback(Fallback),
    /// Receive
    Receive(Receive),
}

impl AbiItem {
    /// Item kind
    pub fn kind(&self) -> ItemKind {
        match self {
            AbiItem::Function(_) => ItemKind::Function,
            AbiItem::Event(_) => ItemKind::Event,
            AbiItem::Error(_) => ItemKind::Error,
            AbiItem::Constructor(_) => ItemKind::Constructor,
            AbiItem::Fallback(_) => ItemKind::Fallback,
            AbiItem::Receive(_) => ItemKind::Receive,
        }
    }

    /// Name, absent for constructor, fallback and receive
    pub fn name(&self) -> Option<&str> {
        match self {
            AbiItem::Function(f) => Some(&f.name),
            AbiItem::Event(e) => Some(&e.name),
            AbiItem::Error(e) => Some(&e.name),
            _ => None,
        }
    }

    /// Input parameters
    pub fn inputs(&self) -> &[Param] {
        match self {
            AbiItem::Function(f) => &f.inputs,
            AbiItem::Event(e) => &e.inputs,
            AbiItem::Error(e) => &e.inputs,
            AbiItem::Constructor(c) => &c.inputs,
            AbiItem::Fallback(_) | AbiItem::Receive(_) => &[],
        }
    }

    /// Output parameters, empty for everything but functions
    pub fn outputs(&self) -> &[Param] {
        match self {
            AbiItem::Function(f) => &f.outputs,
            _ => &[],
        }
    }

    /// Canonical signature of named items
    pub fn signature(&self) -> Option<String> {
        self.name().map(|name| canonical_signature(name, self.inputs()))
    }

    /// Render back to declaration syntax
    pub fn to_human_readable(&self) -> String {
        self.to_string()
    }
}

/// Human-readable declaration, e.g. `function f(uint256 a) view returns (bool)`
impl fmt::Display for AbiItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiItem::Function(func) => {
                write!(f, "function {}({})", func.name, join_params(&func.inputs))?;
                if func.state_mutability != StateMutability::Nonpayable {
                    write!(f, " {}", func.state_mutability)?;
                }
                if !func.outputs.is_empty() {
                    write!(f, " returns ({})", join_params(&func.outputs))?;
                }
                Ok(())
            }
            AbiItem::Event(event) => {
                write!(f, "event {}({})", event.name, join_params(&event.inputs))?;
                if event.anonymous {
                    f.write_str(" anonymous")?;
                }
                Ok(())
            }
            AbiItem::Error(error) => write!(f, "error {}({})", error.name, join_params(&error.inputs)),
            AbiItem::Constructor(ctor) => {
                write!(f, "constructor({})", join_params(&ctor.inputs))?;
                if ctor.state_mutability == StateMutability::Payable {
                    f.write_str(" payable")?;
                }
                Ok(())
            }
            AbiItem::Fallback(fallback) => {
                f.write_str("fallback() external")?;
                if fallback.state_mutability == StateMutability::Payable {
                    f.write_str(" payable")?;
                }
                Ok(())
            }
            AbiItem::Receive(_) => f.write_str("receive() external payable"),
        }
    }
}

fn join_params(params: &[Param]) -> String {
    params.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn canonical_signature(name: &str, params: &[Param]) -> String {
    let types: Vec<String> = params.iter().map(Param::canonical_type).collect();
    format!("{name}({})", types.join(","))
}

fn kinds(params: &[Param]) -> Vec<ParamType> {
    params.iter().map(|p| p.kind.clone()).collect()
}
