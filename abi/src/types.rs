use primitive_types::{H160, U256};
use sha3::Digest;
use std::fmt;
use thiserror::Error;

/// See: https://ethereum-magicians.org/t/increasing-address-size-from-20-to-32-bytes/5485
pub type Address = H160;

/// Errors raised while parsing a signature, parsing argument values or
/// encoding them. Formatted in the single place and propagated unchanged.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("invalid parenthesis in function signature")]
    InvalidParenthesis,
    #[error("invalid function signature")]
    InvalidSignature,
    #[error("unexpected character {0:?} in function signature")]
    UnexpectedCharacter(String),
    #[error("unrecognized parameter type {0:?}")]
    UnknownType(String),
    #[error("expected \"]\" to close array value")]
    UnclosedArray,
    #[error("expected \")\" to close tuple value")]
    UnclosedTuple,
    #[error("Mismatched length of tuple elements")]
    TupleLengthMismatch,
    #[error("expected {expected} array elements, got {got}")]
    ArrayLengthMismatch { expected: usize, got: usize },
    #[error("expected {expected} arguments, got {got}")]
    ArgumentCountMismatch { expected: usize, got: usize },
    #[error("{0} value can't be negative")]
    NegativeUnsigned(String),
    #[error("bool must be either 'true' or 'false'")]
    InvalidBool,
    #[error("Failed to convert {value:?} into {target}")]
    Convert { value: String, target: String },
    #[error("value {value:?} does not fit into {target}")]
    Overflow { value: String, target: String },
    #[error(transparent)]
    FromHex(#[from] hex::FromHexError),
    #[error("argument value does not match its parameter type")]
    MismatchedValue,
}

pub type AbiResult<T> = core::result::Result<T, AbiError>;

/// A single parameter type from an evm function signature,
/// e.g. "uint256", "bytes32[4]", "(string,address[])".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Uint(usize),
    Int(usize),
    Bool,
    Address,
    FixedBytes(usize),
    Bytes,
    String,
    Array {
        length: Option<u64>,
        inner: Box<ParamType>,
    },
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Whether the encoded length of this type depends on the runtime value.
    /// Dynamic fields occupy an offset slot in their container's head and
    /// place their payload in the tail.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String => true,
            ParamType::Array { length: None, .. } => true,
            ParamType::Array {
                length: Some(_),
                inner,
            } => inner.is_dynamic(),
            ParamType::Tuple(fields) => fields.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Number of bytes this type occupies in its container's head region:
    /// the full in-place encoding for static types, one 32-byte offset word
    /// for dynamic ones.
    pub fn head_size(&self) -> usize {
        match self {
            ParamType::Array {
                length: Some(length),
                inner,
            } if !self.is_dynamic() => *length as usize * inner.head_size(),
            ParamType::Tuple(fields) if !self.is_dynamic() => {
                fields.iter().map(ParamType::head_size).sum()
            }
            _ => 32,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Address => f.write_str("address"),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::String => f.write_str("string"),
            ParamType::Array {
                length: None,
                inner,
            } => write!(f, "{}[]", inner),
            ParamType::Array {
                length: Some(length),
                inner,
            } => write!(f, "{}[{}]", inner, length),
            ParamType::Tuple(fields) => {
                f.write_str("(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", field)?;
                }
                f.write_str(")")
            }
        }
    }
}

pub fn u256_to_arr(value: &U256) -> [u8; 32] {
    let mut result = [0u8; 32];
    value.to_big_endian(&mut result);
    result
}

pub fn keccak256(data: &[u8]) -> Vec<u8> {
    sha3::Keccak256::digest(data).as_slice().to_vec()
}
