//! Result decoding
//!
//! CPI results arrive as untyped JSON. Each method expects one shape; anything
//! else is reported as [`CloudError::UnexpectedResult`] carrying the whole
//! offending value. `info` and `attach_disk` hints are the exceptions: `info`
//! always decodes to a usable [`CpiInfo`] so that legacy CPIs still
//! negotiate, and hints are opaque.

use crate::error::{CloudError, Result};
use crate::negotiator::{DEFAULT_API_VERSION, clamp_api_version};
use crate::types::{CpiInfo, DiskHint};
use serde_json::Value;

fn unexpected<T>(result: Value) -> Result<T> {
    Err(CloudError::UnexpectedResult(result))
}

/// Decode an `info` result.
///
/// A missing field takes its default. A field of the wrong shape discards
/// the whole payload and yields [`CpiInfo::default`].
pub fn decode_cpi_info(result: &Value) -> CpiInfo {
    let Some(fields) = result.as_object() else {
        return CpiInfo::default();
    };

    let stemcell_formats = match fields.get("stemcell_formats") {
        None => Vec::new(),
        Some(value) => match string_array(value) {
            Some(formats) => formats,
            None => return CpiInfo::default(),
        },
    };

    let api_version = match fields.get("api_version") {
        None => DEFAULT_API_VERSION,
        Some(value) if value.is_number() => clamp_api_version(Some(value)),
        Some(_) => return CpiInfo::default(),
    };

    CpiInfo {
        stemcell_formats,
        api_version,
    }
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_owned))
        .collect()
}

pub fn decode_string(result: Value) -> Result<String> {
    match result {
        Value::String(s) => Ok(s),
        other => unexpected(other),
    }
}

pub fn decode_bool(result: Value) -> Result<bool> {
    match result {
        Value::Bool(b) => Ok(b),
        other => unexpected(other),
    }
}

/// Decode a `[id, ...]` result and return the id.
///
/// The array needs at least two elements. Numeric ids are rendered as text.
pub fn decode_pair_id(result: Value) -> Result<String> {
    let id = match result.as_array() {
        Some(items) if items.len() >= 2 => match &items[0] {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        },
        _ => None,
    };

    match id {
        Some(id) => Ok(id),
        None => unexpected(result),
    }
}

/// Wrap an `attach_disk` result as a hint; `null` means the CPI gave none
pub fn decode_disk_hint(result: Value) -> Option<DiskHint> {
    match result {
        Value::Null => None,
        other => Some(DiskHint::new(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_unexpected<T: std::fmt::Debug>(result: Result<T>, rendered: &str) {
        match result {
            Err(err @ CloudError::UnexpectedResult(_)) => {
                assert!(
                    err.to_string().contains(&format!("'{}'", rendered)),
                    "unexpected message: {}",
                    err
                );
            }
            other => panic!("Expected UnexpectedResult, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_cpi_info() {
        let info = decode_cpi_info(&json!({
            "stemcell_formats": ["aws-raw", "aws-light"],
            "api_version": 2.0
        }));
        assert_eq!(info.stemcell_formats, vec!["aws-raw", "aws-light"]);
        assert_eq!(info.api_version, 2);
    }

    #[test]
    fn test_decode_cpi_info_legacy_without_version() {
        let info = decode_cpi_info(&json!({"stemcell_formats": ["aws-raw"]}));
        assert_eq!(info.stemcell_formats, vec!["aws-raw"]);
        assert_eq!(info.api_version, 1);
    }

    #[test]
    fn test_decode_cpi_info_malformed_fields() {
        let info = decode_cpi_info(&json!({"stemcell_formats": "aws-raw", "api_version": "57"}));
        assert_eq!(info, CpiInfo::default());

        let info = decode_cpi_info(&json!({"stemcell_formats": ["aws-raw", 3]}));
        assert_eq!(info, CpiInfo::default());

        assert_eq!(decode_cpi_info(&json!(null)), CpiInfo::default());
        assert_eq!(decode_cpi_info(&json!("info")), CpiInfo::default());
        assert_eq!(decode_cpi_info(&json!([1, 2])), CpiInfo::default());
    }

    #[test]
    fn test_decode_cpi_info_one_bad_field_discards_payload() {
        let info = decode_cpi_info(&json!({
            "stemcell_formats": ["aws-raw", "aws-light"],
            "api_version": "57"
        }));
        assert_eq!(info, CpiInfo::default());

        let info = decode_cpi_info(&json!({"stemcell_formats": "aws-raw", "api_version": 2}));
        assert_eq!(info, CpiInfo::default());

        let info = decode_cpi_info(&json!({"stemcell_formats": ["aws-raw"], "api_version": null}));
        assert_eq!(info, CpiInfo::default());
    }

    #[test]
    fn test_decode_cpi_info_missing_formats() {
        let info = decode_cpi_info(&json!({"api_version": 2}));
        assert!(info.stemcell_formats.is_empty());
        assert_eq!(info.api_version, 2);
    }

    #[test]
    fn test_decode_cpi_info_clamps_version() {
        let info = decode_cpi_info(&json!({"stemcell_formats": [], "api_version": 42}));
        assert_eq!(info.api_version, 2);

        let info = decode_cpi_info(&json!({"api_version": -1}));
        assert_eq!(info.api_version, 1);
    }

    #[test]
    fn test_decode_string() {
        assert_eq!(decode_string(json!("fake-cid")).unwrap(), "fake-cid");
        assert_unexpected(decode_string(json!(1)), "1");
        assert_unexpected(decode_string(json!(null)), "null");
        assert_unexpected(decode_string(json!(["a", "b"])), r#"["a","b"]"#);
    }

    #[test]
    fn test_decode_bool() {
        assert!(decode_bool(json!(true)).unwrap());
        assert!(!decode_bool(json!(false)).unwrap());
        assert_unexpected(decode_bool(json!("true")), r#""true""#);
        assert_unexpected(decode_bool(json!(0)), "0");
    }

    #[test]
    fn test_decode_pair_id() {
        assert_eq!(
            decode_pair_id(json!(["fake-vm-cid", "network-hash"])).unwrap(),
            "fake-vm-cid"
        );
        assert_eq!(
            decode_pair_id(json!(["vm-1", {"net": {}}, "extra"])).unwrap(),
            "vm-1"
        );
        assert_eq!(decode_pair_id(json!([113600000000u64, {}])).unwrap(), "113600000000");
    }

    #[test]
    fn test_decode_pair_id_rejects_other_shapes() {
        assert_unexpected(decode_pair_id(json!("fake-vm-cid")), r#""fake-vm-cid""#);
        assert_unexpected(decode_pair_id(json!(["only-one"])), r#"["only-one"]"#);
        assert_unexpected(decode_pair_id(json!([null, "hash"])), r#"[null,"hash"]"#);
        assert_unexpected(decode_pair_id(json!(1)), "1");
    }

    #[test]
    fn test_decode_disk_hint() {
        let hint = decode_disk_hint(json!("/dev/sdf")).unwrap();
        assert_eq!(hint.as_str(), Some("/dev/sdf"));

        let hint = decode_disk_hint(json!({"lun": "0"})).unwrap();
        assert_eq!(hint.as_value(), &json!({"lun": "0"}));

        let hint = decode_disk_hint(json!(7)).unwrap();
        assert_eq!(hint.as_value(), &json!(7));

        assert!(decode_disk_hint(json!(null)).is_none());
    }
}
