//! Request/response envelope exchanged with the CPI program

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// CPI lifecycle methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Info,
    CreateStemcell,
    DeleteStemcell,
    HasVm,
    CreateVm,
    SetVmMetadata,
    SetDiskMetadata,
    CreateDisk,
    AttachDisk,
    DetachDisk,
    DeleteVm,
    DeleteDisk,
}

impl Method {
    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Info => "info",
            Method::CreateStemcell => "create_stemcell",
            Method::DeleteStemcell => "delete_stemcell",
            Method::HasVm => "has_vm",
            Method::CreateVm => "create_vm",
            Method::SetVmMetadata => "set_vm_metadata",
            Method::SetDiskMetadata => "set_disk_metadata",
            Method::CreateDisk => "create_disk",
            Method::AttachDisk => "attach_disk",
            Method::DetachDisk => "detach_disk",
            Method::DeleteVm => "delete_vm",
            Method::DeleteDisk => "delete_disk",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invocation context attached to every CPI call
///
/// Serialized as `{"director_uuid": .., "vm": {"stemcell": {"api_version": ..}}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdContext {
    /// Identity of the director issuing the request
    pub director_id: String,

    /// Maximum stemcell/CPI API version this client is willing to use
    pub stemcell_api_version: u32,
}

impl CmdContext {
    pub fn new(director_id: impl Into<String>, stemcell_api_version: u32) -> Self {
        Self {
            director_id: director_id.into(),
            stemcell_api_version,
        }
    }
}

#[derive(Serialize)]
struct WireContext<'a> {
    director_uuid: &'a str,
    vm: WireVm,
}

#[derive(Serialize)]
struct WireVm {
    stemcell: WireStemcell,
}

#[derive(Serialize)]
struct WireStemcell {
    api_version: u32,
}

impl Serialize for CmdContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireContext {
            director_uuid: &self.director_id,
            vm: WireVm {
                stemcell: WireStemcell {
                    api_version: self.stemcell_api_version,
                },
            },
        }
        .serialize(serializer)
    }
}

/// A single method invocation sent to the CPI program
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CmdInput {
    pub method: Method,
    pub arguments: Vec<Value>,
    pub context: CmdContext,
    pub api_version: u32,
}

impl CmdInput {
    pub fn new(context: &CmdContext, method: Method, arguments: Vec<Value>) -> Self {
        Self {
            method,
            arguments,
            context: context.clone(),
            api_version: context.stemcell_api_version,
        }
    }
}

/// Structured error reported by the CPI program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmdError {
    #[serde(rename = "type")]
    pub error_type: String,

    pub message: String,

    #[serde(default)]
    pub ok_to_retry: bool,
}

/// Decoded response of one CPI invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CmdOutput {
    /// Method result, `Null` when the CPI returned nothing
    #[serde(default)]
    pub result: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CmdError>,

    /// Free-form log text emitted by the CPI
    #[serde(default)]
    pub log: String,
}

impl CmdOutput {
    pub fn with_result(result: impl Into<Value>) -> Self {
        Self {
            result: result.into(),
            ..Self::default()
        }
    }

    pub fn with_error(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: Some(CmdError {
                error_type: error_type.into(),
                message: message.into(),
                ok_to_retry: false,
            }),
            ..Self::default()
        }
    }
}
