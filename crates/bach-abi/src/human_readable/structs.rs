//! Struct table
//!
//! `struct Name { type name; ... }` declarations are collected first, then
//! expanded into tuple components. Expansion tracks the structs currently
//! being expanded; meeting one of them again is a circular reference.

use std::collections::{HashMap, HashSet};

use crate::error::{AbiError, Result};
use crate::param::Param;
use crate::param_type::MAX_TYPE_DEPTH;

use super::parameter::{parse_param, ParamContext, StructSource};
use super::signature::{is_identifier, is_struct};

/// Resolved struct bodies, keyed by struct name
#[derive(Debug, Clone, Default)]
pub(crate) struct StructTable {
    structs: HashMap<String, Vec<Param>>,
}

impl StructTable {
    /// Collect and resolve every struct declaration in `signatures`
    ///
    /// Lines that are not struct declarations are skipped.
    pub(crate) fn build<S: AsRef<str>>(signatures: &[S]) -> Result<Self> {
        let mut raw = HashMap::new();
        let mut order = Vec::new();
        for signature in signatures.iter().map(AsRef::as_ref).filter(|s| is_struct(s)) {
            let body = parse_struct(signature).map_err(|e| e.in_signature(signature))?;
            let name = body.name;
            if raw.insert(name, body).is_some() {
                return Err(AbiError::InvalidStructSignature(format!("duplicate struct `{name}`")));
            }
            order.push(name);
        }

        let mut builder = Builder {
            raw,
            resolved: HashMap::new(),
            expanding: HashSet::new(),
        };
        for name in order {
            builder.resolve(name, 0)?;
        }
        tracing::trace!("Resolved {} structs", builder.resolved.len());

        Ok(Self {
            structs: builder.resolved,
        })
    }

    /// Components of a resolved struct
    pub(crate) fn get(&self, name: &str) -> Option<&[Param]> {
        self.structs.get(name).map(Vec::as_slice)
    }

    pub(crate) fn len(&self) -> usize {
        self.structs.len()
    }
}

impl StructSource for StructTable {
    fn lookup(&mut self, name: &str, _depth: usize) -> Result<Option<Vec<Param>>> {
        Ok(self.get(name).map(<[Param]>::to_vec))
    }
}

/// Unresolved struct declaration
struct RawStruct<'a> {
    name: &'a str,
    declaration: &'a str,
    fields: Vec<&'a str>,
}

fn parse_struct(signature: &str) -> Result<RawStruct<'_>> {
    let text = signature.trim();
    let invalid = || AbiError::InvalidStructSignature(text.to_string());

    let rest = text.strip_prefix("struct").ok_or_else(invalid)?;
    let open = rest.find('{').ok_or_else(invalid)?;
    let body = rest[open + 1..].strip_suffix('}').ok_or_else(invalid)?;
    if body.contains(['{', '}']) {
        return Err(invalid());
    }

    let name = rest[..open].trim();
    if !is_identifier(name) {
        return Err(invalid());
    }

    let fields: Vec<&str> = body.split(';').map(str::trim).filter(|f| !f.is_empty()).collect();
    if fields.is_empty() {
        return Err(AbiError::EmptyStruct(name.to_string()));
    }

    Ok(RawStruct {
        name,
        declaration: text,
        fields,
    })
}

struct Builder<'a> {
    raw: HashMap<&'a str, RawStruct<'a>>,
    resolved: HashMap<String, Vec<Param>>,
    expanding: HashSet<&'a str>,
}

impl<'a> Builder<'a> {
    /// Expand `name`, which sits `depth` type levels below the parameter being parsed
    fn resolve(&mut self, name: &str, depth: usize) -> Result<Vec<Param>> {
        if let Some(done) = self.resolved.get(name) {
            return Ok(done.clone());
        }
        if depth > MAX_TYPE_DEPTH {
            return Err(AbiError::MaxDepthExceeded(MAX_TYPE_DEPTH));
        }
        let (key, declaration, fields) = match self.raw.get(name) {
            Some(raw) => (raw.name, raw.declaration, raw.fields.clone()),
            None => return Err(AbiError::UnknownType(name.to_string())),
        };
        if !self.expanding.insert(key) {
            return Err(AbiError::CircularReference(key.to_string()));
        }

        let mut components = Vec::with_capacity(fields.len());
        for field in fields {
            let param = parse_param(field, ParamContext::Struct, self, depth + 1).map_err(|e| e.in_signature(declaration))?;
            components.push(param);
        }

        self.expanding.remove(key);
        tracing::trace!("Expanded struct {} into {} components", key, components.len());
        self.resolved.insert(key.to_string(), components.clone());
        Ok(components)
    }
}

impl StructSource for Builder<'_> {
    fn lookup(&mut self, name: &str, depth: usize) -> Result<Option<Vec<Param>>> {
        if self.resolved.contains_key(name) || self.raw.contains_key(name) {
            self.resolve(name, depth).map(Some)
        } else {
            Ok(None)
        }
    }
}
