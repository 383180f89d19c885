//! Contract ABI collection

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::encode::encode;
use crate::error::{AbiError, Result};
use crate::human_readable::parse_abi;
use crate::item::{AbiItem, Constructor, CustomError, Event, Function};
use crate::primitives::Selector;
use crate::resolver::{accepts_all, check_ambiguity, select_overload};
use crate::token::{Decoded, Token, Values};

/// A contract ABI: an ordered list of items with lookups and call helpers
///
/// Both constructors run the ambiguity check, so a loaded `Abi` never holds
/// overloads that encode identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AbiItem>", into = "Vec<AbiItem>")]
pub struct Abi {
    items: Vec<AbiItem>,
}

impl Abi {
    /// Wrap items after checking for ambiguous overloads
    pub fn new(items: Vec<AbiItem>) -> Result<Self> {
        check_ambiguity(&items)?;
        Ok(Self { items })
    }

    /// Load a JSON ABI
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<AbiItem> = serde_json::from_str(json)?;
        tracing::debug!("Loaded {} ABI items from JSON", items.len());
        Self::new(items)
    }

    /// Load human-readable declarations
    pub fn parse_human_readable<S: AsRef<str>>(signatures: &[S]) -> Result<Self> {
        Self::new(parse_abi(signatures)?)
    }

    /// Serialize to the standard JSON ABI form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.items)?)
    }

    /// Items in declaration order
    pub fn items(&self) -> &[AbiItem] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the ABI has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ==================== Lookups ====================

    /// First function with this name
    pub fn function(&self, name: &str) -> Result<&Function> {
        self.all_functions()
            .find(|f| f.name == name)
            .ok_or_else(|| AbiError::FunctionNotFound(name.to_string()))
    }

    /// Every overload with this name, in declaration order
    pub fn functions<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Function> + 'n
    where
        'a: 'n,
    {
        self.all_functions().filter(move |f| f.name == name)
    }

    /// Function whose selector matches
    pub fn function_by_selector(&self, selector: Selector) -> Result<&Function> {
        self.all_functions()
            .find(|f| f.selector() == selector)
            .ok_or_else(|| AbiError::SelectorNotFound(hex::encode(selector)))
    }

    /// First event with this name
    pub fn event(&self, name: &str) -> Result<&Event> {
        self.items
            .iter()
            .find_map(|item| match item {
                AbiItem::Event(event) if event.name == name => Some(event),
                _ => None,
            })
            .ok_or_else(|| AbiError::EventNotFound(name.to_string()))
    }

    /// First custom error with this name
    pub fn error(&self, name: &str) -> Result<&CustomError> {
        self.items
            .iter()
            .find_map(|item| match item {
                AbiItem::Error(error) if error.name == name => Some(error),
                _ => None,
            })
            .ok_or_else(|| AbiError::ErrorNotFound(name.to_string()))
    }

    /// The constructor, if declared
    pub fn constructor(&self) -> Option<&Constructor> {
        self.items.iter().find_map(|item| match item {
            AbiItem::Constructor(ctor) => Some(ctor),
            _ => None,
        })
    }

    fn all_functions(&self) -> impl Iterator<Item = &Function> {
        self.items.iter().filter_map(|item| match item {
            AbiItem::Function(function) => Some(function),
            _ => None,
        })
    }

    // ==================== Calls ====================

    /// Encode calldata for `name`, picking the overload that fits `args`
    pub fn encode_function_data(&self, name: &str, args: impl Into<Values>) -> Result<Bytes> {
        let values = args.into();
        let candidates: Vec<&Function> = self.functions(name).collect();
        if candidates.is_empty() {
            return Err(AbiError::FunctionNotFound(name.to_string()));
        }

        let selected = match &values {
            Values::Positional(tokens) => select_overload(&candidates, tokens),
            Values::Named(_) if candidates.len() == 1 => Some(candidates[0]),
            Values::Named(_) => candidates.iter().copied().find(|f| {
                values
                    .clone()
                    .into_ordered(&f.inputs)
                    .is_ok_and(|tokens| accepts_all(&f.inputs, &tokens))
            }),
        };
        let function = selected.ok_or_else(|| AbiError::NoMatchingOverload {
            name: name.to_string(),
            args: values.len(),
        })?;

        tracing::debug!("Encoding call to {}", function.signature());
        Ok(Bytes::from(function.encode_input(values)?))
    }

    /// Identify the function called by `data` and decode its arguments
    pub fn decode_function_data(&self, data: &[u8]) -> Result<(&Function, Vec<Token>)> {
        let (selector, args) = split_selector(data)?;
        let function = self.function_by_selector(selector)?;
        Ok((function, function.decode_input(args)?))
    }

    /// Encode return values of `name`
    pub fn encode_function_result(&self, name: &str, values: impl Into<Values>) -> Result<Vec<u8>> {
        self.function(name)?.encode_output(values)
    }

    /// Decode return data of `name`
    pub fn decode_function_result(&self, name: &str, data: &[u8], config: &CodecConfig) -> Result<Decoded> {
        self.function(name)?.decode_output(data, config)
    }

    /// Contract creation payload: bytecode followed by encoded constructor arguments
    pub fn encode_deploy_data(&self, bytecode: &[u8], args: impl Into<Values>) -> Result<Bytes> {
        let inputs = self.constructor().map_or(&[][..], |ctor| &ctor.inputs[..]);
        let mut data = bytecode.to_vec();
        data.extend(encode(inputs, args)?);
        Ok(Bytes::from(data))
    }

    /// Decode revert data against this ABI's errors and the built-in
    /// `Error(string)` and `Panic(uint256)`
    pub fn decode_error_result(&self, data: &[u8]) -> Result<(CustomError, Vec<Token>)> {
        let (selector, args) = split_selector(data)?;
        let declared = self.items.iter().find_map(|item| match item {
            AbiItem::Error(error) if error.selector() == selector => Some(error.clone()),
            _ => None,
        });
        let error = declared
            .or_else(|| {
                [CustomError::solidity_error(), CustomError::solidity_panic()]
                    .into_iter()
                    .find(|builtin| builtin.selector() == selector)
            })
            .ok_or_else(|| AbiError::SelectorNotFound(hex::encode(selector)))?;

        let values = error.decode(args)?;
        Ok((error, values))
    }
}

impl TryFrom<Vec<AbiItem>> for Abi {
    type Error = AbiError;

    fn try_from(items: Vec<AbiItem>) -> Result<Self> {
        Self::new(items)
    }
}

impl From<Abi> for Vec<AbiItem> {
    fn from(abi: Abi) -> Self {
        abi.items
    }
}

fn split_selector(data: &[u8]) -> Result<(Selector, &[u8])> {
    if data.len() < 4 {
        return Err(AbiError::InvalidSelectorLength(data.len()));
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&data[..4]);
    Ok((selector, &data[4..]))
}
