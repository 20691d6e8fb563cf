use crate::types::keccak256;

pub use crate::arg_parsing::{parse_value, Value};
pub use crate::sig_parsing::{canonical_signature, parse_signature, Function};
pub use crate::types::{AbiError, AbiResult, ParamType};

mod arg_parsing;
mod encoding;
mod sig_parsing;
mod types;

/// First 4 bytes of the Keccak-256 digest of the canonical signature,
/// rendered as 8 lowercase hex digits.
pub fn hash_function_selector(signature: &str) -> AbiResult<String> {
    let canonical = canonical_signature(signature)?;
    let digest = keccak256(canonical.as_bytes());
    Ok(hex::encode(&digest[..4]))
}

/// Build the full calldata hex string for a call: selector followed by the
/// arguments encoded as one top-level tuple.
pub fn abi_encode(signature: &str, args: &[&str]) -> AbiResult<String> {
    let function = parse_signature(signature)?;
    if args.len() != function.params.len() {
        return Err(AbiError::ArgumentCountMismatch {
            expected: function.params.len(),
            got: args.len(),
        });
    }
    let mut values = Vec::with_capacity(args.len());
    for (ty, raw) in function.params.iter().zip(args) {
        values.push(parse_value(ty, raw)?);
    }
    let selector = hash_function_selector(signature)?;
    let fields: Vec<_> = function.params.iter().zip(values.iter()).collect();
    let body = encoding::encode_tuple(&fields)?;
    Ok(format!("0x{}{}", selector, hex::encode(body)))
}
