use primitive_types::U256;

use crate::arg_parsing::Value;
use crate::types::{u256_to_arr, AbiError, AbiResult, Address, ParamType};

/// Encode an ordered list of (type, value) fields as one tuple body.
///
/// Static fields sit in the head at their full width; each dynamic field
/// leaves a 32-byte offset in the head and appends its payload to the tail.
/// Offsets are measured from the start of this tuple's head, which is what
/// lets the same procedure run unchanged inside nested containers.
pub(crate) fn encode_tuple(fields: &[(&ParamType, &Value)]) -> AbiResult<Vec<u8>> {
    let head_len: usize = fields.iter().map(|(ty, _)| ty.head_size()).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (ty, value) in fields {
        let encoded = encode_value(ty, value)?;
        if ty.is_dynamic() {
            head.extend_from_slice(&u256_to_arr(&U256::from(head_len + tail.len())));
            tail.extend_from_slice(&encoded);
        } else {
            head.extend_from_slice(&encoded);
        }
    }
    head.extend_from_slice(&tail);
    Ok(head)
}

pub(crate) fn encode_value(ty: &ParamType, value: &Value) -> AbiResult<Vec<u8>> {
    match ty {
        ParamType::Array { length, inner } => {
            let items = expect_list(value)?;
            let fields: Vec<_> = items.iter().map(|item| (inner.as_ref(), item)).collect();
            let body = encode_tuple(&fields)?;
            match length {
                // fixed arrays carry no length word
                Some(_) => Ok(body),
                None => {
                    let mut out = u256_to_arr(&U256::from(items.len())).to_vec();
                    out.extend_from_slice(&body);
                    Ok(out)
                }
            }
        }
        ParamType::Tuple(field_types) => {
            let items = expect_list(value)?;
            if items.len() != field_types.len() {
                return Err(AbiError::TupleLengthMismatch);
            }
            let fields: Vec<_> = field_types.iter().zip(items).collect();
            encode_tuple(&fields)
        }
        _ => encode_primitive(ty, expect_primitive(value)?),
    }
}

fn encode_primitive(ty: &ParamType, text: &str) -> AbiResult<Vec<u8>> {
    match ty {
        ParamType::Uint(bits) => encode_uint(ty, *bits, text),
        ParamType::Int(bits) => encode_int(ty, *bits, text),
        ParamType::Bool => encode_bool(text),
        ParamType::Address => {
            let digits = strip_hex_prefix(text);
            if digits.len() != 40 {
                return Err(hex::FromHexError::InvalidStringLength.into());
            }
            let raw = hex::decode(digits)?;
            Ok(encode_address(Address::from_slice(&raw)))
        }
        ParamType::FixedBytes(size) => {
            let digits = strip_hex_prefix(text);
            if digits.len() != size * 2 {
                return Err(hex::FromHexError::InvalidStringLength.into());
            }
            let mut word = hex::decode(digits)?;
            word.resize(32, 0);
            Ok(word)
        }
        ParamType::Bytes => {
            let raw = hex::decode(strip_hex_prefix(text))?;
            Ok(encode_byte_payload(&raw))
        }
        ParamType::String => Ok(encode_byte_payload(text.as_bytes())),
        _ => Err(AbiError::MismatchedValue),
    }
}

fn encode_uint(ty: &ParamType, bits: usize, text: &str) -> AbiResult<Vec<u8>> {
    if text.starts_with('-') {
        return Err(AbiError::NegativeUnsigned(ty.to_string()));
    }
    let value = parse_decimal(ty, text)?;
    if bits < 256 && value >> bits != U256::zero() {
        return Err(AbiError::Overflow {
            value: text.to_string(),
            target: ty.to_string(),
        });
    }
    Ok(u256_to_arr(&value).to_vec())
}

fn encode_int(ty: &ParamType, bits: usize, text: &str) -> AbiResult<Vec<u8>> {
    match text.strip_prefix('-') {
        Some(magnitude_text) => {
            let magnitude = parse_decimal(ty, magnitude_text)?;
            if magnitude > U256::one() << (bits - 1) {
                return Err(AbiError::Overflow {
                    value: text.to_string(),
                    target: ty.to_string(),
                });
            }
            // two's complement in a 256-bit field: !m + 1 == 2^256 - m
            let encoded = (!magnitude).overflowing_add(U256::one()).0;
            Ok(u256_to_arr(&encoded).to_vec())
        }
        None => {
            let value = parse_decimal(ty, text)?;
            if value >> (bits - 1) != U256::zero() {
                return Err(AbiError::Overflow {
                    value: text.to_string(),
                    target: ty.to_string(),
                });
            }
            Ok(u256_to_arr(&value).to_vec())
        }
    }
}

fn encode_bool(text: &str) -> AbiResult<Vec<u8>> {
    let mut word = [0u8; 32];
    match text {
        "true" => word[31] = 1,
        "false" => {}
        _ => return Err(AbiError::InvalidBool),
    }
    Ok(word.to_vec())
}

pub fn encode_address(addr: Address) -> Vec<u8> {
    let mut bytes = vec![0u8; 12];
    bytes.extend_from_slice(addr.as_bytes());
    bytes
}

/// Length word followed by the payload, zero-padded up to a 32-byte boundary.
fn encode_byte_payload(raw: &[u8]) -> Vec<u8> {
    let mut out = u256_to_arr(&U256::from(raw.len())).to_vec();
    out.extend_from_slice(raw);
    let partial = raw.len() % 32;
    if partial != 0 {
        out.extend(std::iter::repeat(0).take(32 - partial));
    }
    out
}

fn parse_decimal(ty: &ParamType, text: &str) -> AbiResult<U256> {
    if text.is_empty() {
        return Err(AbiError::Convert {
            value: text.to_string(),
            target: ty.to_string(),
        });
    }
    U256::from_dec_str(text).map_err(|_| AbiError::Convert {
        value: text.to_string(),
        target: ty.to_string(),
    })
}

fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x").unwrap_or(text)
}

fn expect_list(value: &Value) -> AbiResult<&[Value]> {
    match value {
        Value::List(items) => Ok(items),
        Value::Primitive(_) => Err(AbiError::MismatchedValue),
    }
}

fn expect_primitive(value: &Value) -> AbiResult<&str> {
    match value {
        Value::Primitive(text) => Ok(text),
        Value::List(_) => Err(AbiError::MismatchedValue),
    }
}

#[cfg(test)]
mod tests {
    use super::{encode_tuple, encode_value};
    use crate::arg_parsing::{parse_value, Value};
    use crate::types::{AbiError, ParamType};

    fn encode_text(ty: &ParamType, text: &str) -> Result<String, AbiError> {
        let value = parse_value(ty, text)?;
        encode_value(ty, &value).map(|bytes| hex::encode(bytes))
    }

    fn word(hex_digits: &str) -> String {
        format!("{:0>64}", hex_digits)
    }

    #[test]
    fn test_uint_words() {
        assert_eq!(
            encode_text(&ParamType::Uint(8), "19").unwrap(),
            word("13")
        );
        assert_eq!(
            encode_text(&ParamType::Uint(256), "1999").unwrap(),
            word("7cf")
        );
        // strict width check
        assert!(matches!(
            encode_text(&ParamType::Uint(8), "300"),
            Err(AbiError::Overflow { .. })
        ));
        let err = encode_text(&ParamType::Uint(256), "-1999").unwrap_err();
        assert!(err.to_string().contains("can't be negative"));
        let err = encode_text(&ParamType::Uint(256), "yes").unwrap_err();
        assert!(err.to_string().contains("Failed to convert"));
    }

    #[test]
    fn test_int_words() {
        assert_eq!(
            encode_text(&ParamType::Int(256), "999999").unwrap(),
            word("f423f")
        );
        assert_eq!(
            encode_text(&ParamType::Int(256), "-999999").unwrap(),
            "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffff0bdc1"
        );
        assert_eq!(
            encode_text(&ParamType::Int(8), "-128").unwrap(),
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff80"
        );
        assert!(matches!(
            encode_text(&ParamType::Int(8), "128"),
            Err(AbiError::Overflow { .. })
        ));
        assert!(matches!(
            encode_text(&ParamType::Int(8), "-129"),
            Err(AbiError::Overflow { .. })
        ));
    }

    #[test]
    fn test_bool_words() {
        assert_eq!(encode_text(&ParamType::Bool, "true").unwrap(), word("1"));
        assert_eq!(encode_text(&ParamType::Bool, "false").unwrap(), word("0"));
        let err = encode_text(&ParamType::Bool, "no").unwrap_err();
        assert!(err
            .to_string()
            .contains("bool must be either 'true' or 'false'"));
    }

    #[test]
    fn test_address_words() {
        let expected = "00000000000000000000000085da99c8a7c2c95964c8efd687e95e632fc533d6";
        assert_eq!(
            encode_text(&ParamType::Address, "0x85dA99c8a7C2C95964c8EfD687E95E632Fc533D6")
                .unwrap(),
            expected
        );
        // the 0x prefix and letter case are both optional
        assert_eq!(
            encode_text(&ParamType::Address, "85dA99c8a7C2C95964c8EfD687E95E632Fc533D6").unwrap(),
            expected
        );
        let err = encode_text(&ParamType::Address, "0x1234").unwrap_err();
        assert!(err.to_string().contains("Invalid string length"));
    }

    #[test]
    fn test_fixed_bytes_words() {
        assert_eq!(
            encode_text(&ParamType::FixedBytes(3), "0x123456").unwrap(),
            format!("{:0<64}", "123456")
        );
        let err = encode_text(&ParamType::FixedBytes(3), "0x1234567").unwrap_err();
        assert!(err.to_string().contains("Invalid string length"));
        let err = encode_text(&ParamType::FixedBytes(3), "0x12345678").unwrap_err();
        assert!(err.to_string().contains("Invalid string length"));
    }

    #[test]
    fn test_dynamic_bytes() {
        let encoded = encode_text(&ParamType::Bytes, "ffffffff88888888888ffff111").unwrap();
        assert_eq!(
            encoded,
            format!(
                "{}{}",
                word("d"),
                format!("{:0<64}", "ffffffff88888888888ffff111")
            )
        );
        let err = encode_text(&ParamType::Bytes, "0x1234567").unwrap_err();
        assert!(err.to_string().contains("Odd number of digits"));
    }

    #[test]
    fn test_string_payloads() {
        assert_eq!(
            encode_text(&ParamType::String, "abc").unwrap(),
            format!("{}{}", word("3"), format!("{:0<64}", "616263"))
        );
        // empty payload is just the zero length word
        assert_eq!(encode_text(&ParamType::String, "").unwrap(), word("0"));
    }

    #[test]
    fn test_head_and_tail_offsets() {
        // (string, bool, uint256[]): two offsets around an in-place bool
        let types = vec![
            ParamType::String,
            ParamType::Bool,
            ParamType::Array {
                length: None,
                inner: Box::new(ParamType::Uint(256)),
            },
        ];
        let values = vec![
            parse_value(&types[0], "dave").unwrap(),
            parse_value(&types[1], "true").unwrap(),
            parse_value(&types[2], "[1,2,3]").unwrap(),
        ];
        let fields: Vec<(&ParamType, &Value)> = types.iter().zip(values.iter()).collect();
        let encoded = hex::encode(encode_tuple(&fields).unwrap());
        let words: Vec<&str> = encoded
            .as_bytes()
            .chunks(64)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect();
        assert_eq!(
            words,
            vec![
                word("60").as_str(),
                word("1").as_str(),
                word("a0").as_str(),
                word("4").as_str(),
                format!("{:0<64}", "64617665").as_str(),
                word("3").as_str(),
                word("1").as_str(),
                word("2").as_str(),
                word("3").as_str(),
            ]
        );
    }
}
