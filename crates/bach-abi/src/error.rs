//! ABI error types

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = AbiError> = std::result::Result<T, E>;

/// Which side of a parenthesized list has surplus parentheses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParenSide {
    /// More `(` than `)`
    Opening,
    /// More `)` than `(`
    Closing,
}

impl fmt::Display for ParenSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParenSide::Opening => f.write_str("opening"),
            ParenSide::Closing => f.write_str("closing"),
        }
    }
}

/// ABI error type
#[derive(Debug, Error)]
pub enum AbiError {
    // ==================== Grammar errors ====================
    /// Declaration shape not recognised
    #[error("Unknown signature: {0}")]
    UnknownSignature(String),

    /// Declaration recognised but malformed
    #[error("Invalid signature `{signature}`: {reason}")]
    InvalidSignature {
        /// Original declaration text
        signature: String,
        /// What was wrong with it
        reason: String,
    },

    /// Parenthesis counter went negative or did not return to zero
    #[error("Unbalanced parentheses in `{text}`: {depth} too many {side} parentheses")]
    UnbalancedParentheses {
        /// Text being scanned
        text: String,
        /// Excess side
        side: ParenSide,
        /// Nesting depth left over
        depth: usize,
    },

    /// Struct declaration malformed
    #[error("Invalid struct signature: {0}")]
    InvalidStructSignature(String),

    // ==================== Type errors ====================
    /// Base type is neither a primitive nor a known struct
    #[error("Unknown type `{0}`")]
    UnknownType(String),

    /// Modifier not legal for this declaration kind
    #[error("Invalid modifier `{modifier}` on `{param}`: not allowed in {kind} parameters")]
    InvalidModifier {
        /// Offending modifier
        modifier: String,
        /// Parameter text
        param: String,
        /// Declaration kind
        kind: String,
    },

    /// Data location on a value type
    #[error("Invalid data location `{modifier}` on `{param}`: only allowed for bytes, string, array or tuple types")]
    InvalidDataLocation {
        /// Offending modifier
        modifier: String,
        /// Parameter text
        param: String,
    },

    /// Struct expansion revisited a struct currently being expanded
    #[error("Circular reference detected in struct `{0}`")]
    CircularReference(String),

    /// Struct with no members
    #[error("Struct `{0}` has an empty body")]
    EmptyStruct(String),

    /// Parameter token could not be parsed
    #[error("Invalid parameter `{param}`: {reason}")]
    InvalidParameter {
        /// Parameter text
        param: String,
        /// What was wrong with it
        reason: String,
    },

    // ==================== Naming errors ====================
    /// Parameter name is a reserved Solidity word
    #[error("Invalid parameter `{param}`: `{name}` is a protected Solidity keyword")]
    ProtectedKeyword {
        /// Parameter text
        param: String,
        /// Offending name
        name: String,
    },

    /// Parameter name starts like an integer literal
    #[error("Invalid parameter `{param}`: `{name}` cannot be a number")]
    NumericName {
        /// Parameter text
        param: String,
        /// Offending name
        name: String,
    },

    // ==================== Ambiguity errors ====================
    /// Two overloads whose arguments cannot be told apart
    #[error("Ambiguous ABI items: `{first}` and `{second}` accept indistinguishable arguments")]
    Ambiguous {
        /// First conflicting declaration
        first: String,
        /// Second conflicting declaration
        second: String,
    },

    // ==================== Codec errors ====================
    /// Value count differs from parameter count
    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch {
        /// Parameter count
        expected: usize,
        /// Value count
        actual: usize,
    },

    /// Fixed array value of the wrong length
    #[error("Array length mismatch for `{ty}`: expected {expected} elements, got {actual}")]
    ArrayLengthMismatch {
        /// Canonical type
        ty: String,
        /// Declared length
        expected: usize,
        /// Value length
        actual: usize,
    },

    /// `bytesN` value of the wrong length
    #[error("Size mismatch for `bytes{expected}`: value has {actual} bytes")]
    FixedBytesSizeMismatch {
        /// Declared size
        expected: usize,
        /// Value size
        actual: usize,
    },

    /// Integer value does not fit the declared width
    #[error("Integer out of range for `{ty}`: {value}")]
    IntegerOutOfRange {
        /// Canonical type
        ty: String,
        /// Offending value
        value: String,
    },

    /// Value kind does not match the declared type
    #[error("Type mismatch: expected `{expected}`, got {actual}")]
    TypeMismatch {
        /// Canonical type
        expected: String,
        /// Description of the value
        actual: String,
    },

    /// Named value missing for a parameter
    #[error("Missing value for parameter `{0}`")]
    MissingValue(String),

    /// Named values supplied for unnamed parameters
    #[error("Named values require every parameter to have a name")]
    UnnamedParameter,

    /// Packed encoding of a type outside the packable subset
    #[error("Unsupported packed type `{0}`")]
    UnsupportedPackedType(String),

    /// Fixed-array dimensions too large to lay out
    #[error("Type `{0}` is too large to encode")]
    TypeTooLarge(String),

    /// Not enough bytes for a head word or tail
    #[error("Insufficient data: need {expected} bytes, have {actual}")]
    InsufficientData {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Empty data decoded against a non-empty parameter list
    #[error("Cannot decode zero data with {0} parameters")]
    ZeroData(usize),

    /// Offset or length word too large to address
    #[error("Invalid {kind} word at position {position}")]
    InvalidWord {
        /// `offset` or `length`
        kind: &'static str,
        /// Absolute byte position of the word
        position: usize,
    },

    /// `bool` word holding something other than 0 or 1
    #[error("Invalid boolean word at position {0}")]
    InvalidBool(usize),

    /// `address` or `bytesN` word with non-zero padding
    #[error("Non-zero padding in `{ty}` word at position {position}")]
    InvalidPadding {
        /// Canonical type
        ty: String,
        /// Absolute byte position of the word
        position: usize,
    },

    /// `string` payload is not UTF-8
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Recursion ceiling reached
    #[error("Maximum nesting depth of {0} exceeded")]
    MaxDepthExceeded(usize),

    /// Calldata too short to hold a selector
    #[error("Invalid selector length: expected 4 bytes, got {0}")]
    InvalidSelectorLength(usize),

    // ==================== Lookup errors ====================
    /// No function with this name
    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    /// No function or error with this selector
    #[error("Selector not found: 0x{0}")]
    SelectorNotFound(String),

    /// No event with this name
    #[error("Event not found: {0}")]
    EventNotFound(String),

    /// No error with this name
    #[error("Error not found: {0}")]
    ErrorNotFound(String),

    /// Overloads exist but none accepts the arguments
    #[error("No overload of `{name}` accepts {args} arguments of the given types")]
    NoMatchingOverload {
        /// Item name
        name: String,
        /// Argument count
        args: usize,
    },

    /// Log topics do not match the event
    #[error("Invalid log topics: {0}")]
    InvalidTopics(String),

    // ==================== Surface errors ====================
    /// First failure while parsing a declaration
    #[error("{source}\n  in `{signature}`")]
    InSignature {
        /// Original declaration text
        signature: String,
        /// Underlying failure
        #[source]
        source: Box<AbiError>,
    },

    /// JSON ABI error
    #[error("JSON error: {0}")]
    Json(String),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}

impl AbiError {
    /// Attach the declaration that was being parsed
    pub fn in_signature(self, signature: &str) -> Self {
        match self {
            already @ AbiError::InSignature { .. } => already,
            other => AbiError::InSignature {
                signature: signature.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Strip any signature context
    pub fn root(&self) -> &AbiError {
        match self {
            AbiError::InSignature { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for AbiError {
    fn from(e: serde_json::Error) -> Self {
        AbiError::Json(e.to_string())
    }
}

impl From<toml::de::Error> for AbiError {
    fn from(e: toml::de::Error) -> Self {
        AbiError::Config(e.to_string())
    }
}
