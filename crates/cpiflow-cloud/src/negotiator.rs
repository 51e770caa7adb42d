//! CPI API version negotiation
//!
//! Some methods return a richer result when both this client and the CPI
//! speak API version 2. The local side is the configured stemcell API
//! version; the remote side is whatever `info` reports, clamped to
//! `[1, MAX_SUPPORTED_API_VERSION]`.

use serde_json::Value;

/// Highest CPI API version this client understands
pub const MAX_SUPPORTED_API_VERSION: u32 = 2;

/// Version assumed for CPIs that report nothing usable
pub const DEFAULT_API_VERSION: u32 = 1;

/// First version whose `create_vm`/`attach_disk` results carry extra data
pub const RICH_RESULT_API_VERSION: u32 = 2;

/// Clamp a reported `api_version` field into the supported range.
///
/// Missing or non-numeric values fall back to [`DEFAULT_API_VERSION`].
pub fn clamp_api_version(raw: Option<&Value>) -> u32 {
    let Some(version) = raw.and_then(Value::as_f64) else {
        return DEFAULT_API_VERSION;
    };

    if version >= f64::from(MAX_SUPPORTED_API_VERSION) {
        MAX_SUPPORTED_API_VERSION
    } else if version < f64::from(DEFAULT_API_VERSION) {
        DEFAULT_API_VERSION
    } else {
        // In [1, MAX), so truncation stays in range
        version.trunc() as u32
    }
}

/// Whether a follow-up `info` call is worth issuing for the local version
pub fn wants_negotiation(local_version: u32) -> bool {
    local_version >= RICH_RESULT_API_VERSION
}

/// Effective version for interpreting a result
pub fn effective_version(local_version: u32, remote_version: u32) -> u32 {
    local_version
        .min(remote_version)
        .clamp(DEFAULT_API_VERSION, MAX_SUPPORTED_API_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clamp_in_range() {
        assert_eq!(clamp_api_version(Some(&json!(1))), 1);
        assert_eq!(clamp_api_version(Some(&json!(2))), 2);
        assert_eq!(clamp_api_version(Some(&json!(2.0))), 2);
        assert_eq!(clamp_api_version(Some(&json!(1.7))), 1);
    }

    #[test]
    fn test_clamp_out_of_range() {
        assert_eq!(clamp_api_version(Some(&json!(42))), MAX_SUPPORTED_API_VERSION);
        assert_eq!(clamp_api_version(Some(&json!(2.5))), MAX_SUPPORTED_API_VERSION);
        assert_eq!(clamp_api_version(Some(&json!(0))), 1);
        assert_eq!(clamp_api_version(Some(&json!(-3))), 1);
        assert_eq!(clamp_api_version(Some(&json!(0.5))), 1);
    }

    #[test]
    fn test_clamp_malformed() {
        assert_eq!(clamp_api_version(None), 1);
        assert_eq!(clamp_api_version(Some(&json!("57"))), 1);
        assert_eq!(clamp_api_version(Some(&json!(null))), 1);
        assert_eq!(clamp_api_version(Some(&json!([2]))), 1);
        assert_eq!(clamp_api_version(Some(&json!(true))), 1);
    }

    #[test]
    fn test_effective_version() {
        assert_eq!(effective_version(2, 2), 2);
        assert_eq!(effective_version(2, 1), 1);
        assert_eq!(effective_version(1, 2), 1);
        assert_eq!(effective_version(5, 2), 2);
    }

    #[test]
    fn test_wants_negotiation() {
        assert!(!wants_negotiation(1));
        assert!(wants_negotiation(2));
        assert!(wants_negotiation(3));
    }
}
