//! Payload types passed to and returned from CPI methods

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::negotiator::DEFAULT_API_VERSION;

/// Opaque cloud properties, passed through to the CPI unchanged
pub type PropertyMap = serde_json::Map<String, Value>;

/// Network name to network settings
pub type Networks = BTreeMap<String, PropertyMap>;

/// Tags applied to a VM by `set_vm_metadata`
pub type VmMetadata = BTreeMap<String, String>;

/// Tags applied to a disk by `set_disk_metadata`
pub type DiskMetadata = BTreeMap<String, String>;

/// Capabilities reported by the CPI `info` method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpiInfo {
    /// Stemcell formats the CPI can import (e.g. "aws-raw")
    pub stemcell_formats: Vec<String>,

    /// CPI API version, always within `[1, MAX_SUPPORTED_API_VERSION]`
    pub api_version: u32,
}

impl Default for CpiInfo {
    fn default() -> Self {
        Self {
            stemcell_formats: Vec::new(),
            api_version: DEFAULT_API_VERSION,
        }
    }
}

impl CpiInfo {
    /// Whether the CPI listed `format` among its stemcell formats
    pub fn supports_stemcell_format(&self, format: &str) -> bool {
        self.stemcell_formats.iter().any(|f| f == format)
    }
}

/// How an attached disk is exposed to its VM
///
/// Backend specific: usually a device path such as `/dev/sdf`, sometimes a
/// map (e.g. `{"lun": "0", "host_device_id": ".."}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiskHint(Value);

impl DiskHint {
    pub(crate) fn new(value: Value) -> Self {
        Self(value)
    }

    /// The hint as a device path, if the CPI returned a plain string
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// The raw hint as the CPI returned it
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwrap into the raw JSON value
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl std::fmt::Display for DiskHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(path) => f.write_str(path),
            other => write!(f, "{}", other),
        }
    }
}

/// Convert string metadata into a wire argument
pub(crate) fn metadata_value(metadata: &BTreeMap<String, String>) -> Value {
    Value::Object(
        metadata
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

/// Convert network settings into a wire argument
pub(crate) fn networks_value(networks: &Networks) -> Value {
    Value::Object(
        networks
            .iter()
            .map(|(name, settings)| (name.clone(), Value::Object(settings.clone())))
            .collect(),
    )
}
