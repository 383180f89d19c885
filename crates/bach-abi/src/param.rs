//! ABI parameters and their JSON form

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AbiError;
use crate::param_type::{split_array_suffix, wrap_arrays, ParamType};

/// A named, typed parameter of a function, event, error or tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "JsonParam", into = "JsonParam")]
pub struct Param {
    /// Parameter name, empty when unnamed
    pub name: String,
    /// Parameter type
    pub kind: ParamType,
    /// Event inputs only: whether the value is stored in a topic
    pub indexed: Option<bool>,
    /// Solidity type before tuple expansion (e.g. `struct Foo`)
    pub internal_type: Option<String>,
}

impl Param {
    /// Create a named parameter
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
            indexed: None,
            internal_type: None,
        }
    }

    /// Create an unnamed parameter
    pub fn unnamed(kind: ParamType) -> Self {
        Self::new(String::new(), kind)
    }

    /// Mark as an indexed or non-indexed event input
    pub fn with_indexed(mut self, indexed: bool) -> Self {
        self.indexed = Some(indexed);
        self
    }

    /// Whether this is an indexed event input
    pub fn is_indexed(&self) -> bool {
        self.indexed.unwrap_or(false)
    }

    /// See [`ParamType::is_dynamic`]
    pub fn is_dynamic(&self) -> bool {
        self.kind.is_dynamic()
    }

    /// Canonical type spelling used in signatures
    pub fn canonical_type(&self) -> String {
        self.kind.to_string()
    }
}

/// Human-readable form: `(uint256 a, string b)[] indexed name`
impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_human_type(f, &self.kind)?;
        if self.is_indexed() {
            f.write_str(" indexed")?;
        }
        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }
        Ok(())
    }
}

fn write_human_type(f: &mut fmt::Formatter<'_>, kind: &ParamType) -> fmt::Result {
    match kind {
        ParamType::Tuple(components) => {
            f.write_str("(")?;
            for (i, c) in components.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{c}")?;
            }
            f.write_str(")")
        }
        ParamType::Array(inner) => {
            write_human_type(f, inner)?;
            f.write_str("[]")
        }
        ParamType::FixedArray(inner, size) => {
            write_human_type(f, inner)?;
            write!(f, "[{size}]")
        }
        other => write!(f, "{other}"),
    }
}

/// Wire shape of a parameter in a JSON ABI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    components: Option<Vec<JsonParam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    indexed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    internal_type: Option<String>,
}

impl TryFrom<JsonParam> for Param {
    type Error = AbiError;

    fn try_from(json: JsonParam) -> Result<Self, Self::Error> {
        let (base, dims) = split_array_suffix(json.ty.trim())?;
        let kind = if base == "tuple" {
            let components = match json.components {
                Some(components) if !components.is_empty() => components
                    .into_iter()
                    .map(Param::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
                _ => {
                    return Err(AbiError::InvalidParameter {
                        param: json.name,
                        reason: format!("`{}` requires a non-empty components list", json.ty),
                    })
                }
            };
            wrap_arrays(ParamType::Tuple(components), &dims)
        } else {
            if json.components.is_some() {
                return Err(AbiError::InvalidParameter {
                    param: json.name,
                    reason: format!("`{}` cannot have components", json.ty),
                });
            }
            ParamType::parse(&json.ty)?
        };

        Ok(Param {
            name: json.name,
            kind,
            indexed: json.indexed,
            internal_type: json.internal_type,
        })
    }
}

impl From<Param> for JsonParam {
    fn from(param: Param) -> Self {
        let components = param
            .kind
            .components()
            .map(|cs| cs.iter().cloned().map(JsonParam::from).collect());
        JsonParam {
            name: param.name,
            ty: param.kind.json_type(),
            components,
            indexed: param.indexed,
            internal_type: param.internal_type,
        }
    }
}
