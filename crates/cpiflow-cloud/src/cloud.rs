//! CPI client

use crate::config::CloudConfig;
use crate::decoder::{
    decode_bool, decode_cpi_info, decode_disk_hint, decode_pair_id, decode_string,
};
use crate::envelope::{CmdContext, CmdInput, Method};
use crate::error::{CpiError, Result};
use crate::negotiator::{
    DEFAULT_API_VERSION, RICH_RESULT_API_VERSION, effective_version, wants_negotiation,
};
use crate::runner::CmdRunner;
use crate::types::{
    CpiInfo, DiskHint, DiskMetadata, Networks, PropertyMap, VmMetadata, metadata_value,
    networks_value,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Cloud lifecycle operations backed by a CPI
///
/// Every call is a single blocking round trip to the CPI program. Failures
/// are returned as-is; retrying is up to the caller.
pub trait Cloud: Send + Sync {
    /// Query CPI capabilities. Never fails; degrades to [`CpiInfo::default`]
    fn info(&self) -> CpiInfo;

    /// Upload a stemcell image and return its cid
    fn create_stemcell(&self, image_path: &str, cloud_properties: &PropertyMap) -> Result<String>;

    /// Delete a stemcell
    fn delete_stemcell(&self, stemcell_cid: &str) -> Result<()>;

    /// Check whether a VM exists
    fn has_vm(&self, vm_cid: &str) -> Result<bool>;

    /// Create a VM and return its cid
    fn create_vm(
        &self,
        agent_id: &str,
        stemcell_cid: &str,
        cloud_properties: &PropertyMap,
        networks: &Networks,
        env: &PropertyMap,
    ) -> Result<String>;

    /// Tag a VM
    fn set_vm_metadata(&self, vm_cid: &str, metadata: &VmMetadata) -> Result<()>;

    /// Tag a disk
    fn set_disk_metadata(&self, disk_cid: &str, metadata: &DiskMetadata) -> Result<()>;

    /// Create a persistent disk of `size` MB and return its cid
    fn create_disk(
        &self,
        size: u64,
        cloud_properties: &PropertyMap,
        instance_id: &str,
    ) -> Result<String>;

    /// Attach a disk; returns the CPI's disk hint when API version 2 is negotiated
    fn attach_disk(&self, vm_cid: &str, disk_cid: &str) -> Result<Option<DiskHint>>;

    /// Detach a disk
    fn detach_disk(&self, vm_cid: &str, disk_cid: &str) -> Result<()>;

    /// Delete a VM
    fn delete_vm(&self, vm_cid: &str) -> Result<()>;

    /// Delete a disk
    fn delete_disk(&self, disk_cid: &str) -> Result<()>;
}

/// [`Cloud`] implementation that drives a CPI program through a [`CmdRunner`]
pub struct CpiCloud {
    runner: Arc<dyn CmdRunner>,
    context: CmdContext,
}

impl CpiCloud {
    pub fn new(
        runner: Arc<dyn CmdRunner>,
        director_id: impl Into<String>,
        stemcell_api_version: u32,
    ) -> Self {
        Self {
            runner,
            context: CmdContext::new(director_id, stemcell_api_version),
        }
    }

    /// Build a client from validated configuration
    pub fn from_config(runner: Arc<dyn CmdRunner>, config: &CloudConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            runner,
            config.director_id.clone(),
            config.stemcell_api_version,
        ))
    }

    pub fn context(&self) -> &CmdContext {
        &self.context
    }

    /// Run a method and return its raw result, or the CPI's error
    fn run(&self, method: Method, arguments: Vec<Value>) -> Result<Value> {
        let input = CmdInput::new(&self.context, method, arguments);

        tracing::debug!(
            method = %method,
            arguments = input.arguments.len(),
            "Running CPI method"
        );

        let output = self.runner.run(&input)?;

        if !output.log.is_empty() {
            tracing::trace!(method = %method, "CPI log:\n{}", output.log);
        }

        if let Some(error) = output.error {
            tracing::debug!(
                method = %method,
                error_type = %error.error_type,
                "CPI responded with error: {}",
                error.message
            );
            return Err(CpiError::new(
                method,
                error.error_type,
                error.message,
                error.ok_to_retry,
            )
            .into());
        }

        Ok(output.result)
    }

    /// Ask the CPI for its version once the primary call has succeeded
    fn negotiated_version(&self, method: Method) -> u32 {
        let local = self.context.stemcell_api_version;
        if !wants_negotiation(local) {
            return DEFAULT_API_VERSION;
        }

        let remote = self.info().api_version;
        let version = effective_version(local, remote);
        tracing::debug!(
            method = %method,
            local,
            remote,
            "Negotiated CPI API version {}",
            version
        );
        version
    }
}

impl Cloud for CpiCloud {
    fn info(&self) -> CpiInfo {
        match self.run(Method::Info, vec![json!(" ")]) {
            Ok(result) => decode_cpi_info(&result),
            Err(e) => {
                tracing::warn!("CPI info failed, assuming API version 1: {}", e);
                CpiInfo::default()
            }
        }
    }

    fn create_stemcell(
        &self,
        image_path: &str,
        cloud_properties: &PropertyMap,
    ) -> Result<String> {
        let result = self.run(
            Method::CreateStemcell,
            vec![json!(image_path), Value::Object(cloud_properties.clone())],
        )?;
        decode_string(result)
    }

    fn delete_stemcell(&self, stemcell_cid: &str) -> Result<()> {
        self.run(Method::DeleteStemcell, vec![json!(stemcell_cid)])?;
        Ok(())
    }

    fn has_vm(&self, vm_cid: &str) -> Result<bool> {
        let result = self.run(Method::HasVm, vec![json!(vm_cid)])?;
        decode_bool(result)
    }

    fn create_vm(
        &self,
        agent_id: &str,
        stemcell_cid: &str,
        cloud_properties: &PropertyMap,
        networks: &Networks,
        env: &PropertyMap,
    ) -> Result<String> {
        // disk_cids is reserved and always sent empty
        let result = self.run(
            Method::CreateVm,
            vec![
                json!(agent_id),
                json!(stemcell_cid),
                Value::Object(cloud_properties.clone()),
                networks_value(networks),
                json!([]),
                Value::Object(env.clone()),
            ],
        )?;

        if self.negotiated_version(Method::CreateVm) >= RICH_RESULT_API_VERSION {
            decode_pair_id(result)
        } else {
            decode_string(result)
        }
    }

    fn set_vm_metadata(&self, vm_cid: &str, metadata: &VmMetadata) -> Result<()> {
        self.run(
            Method::SetVmMetadata,
            vec![json!(vm_cid), metadata_value(metadata)],
        )?;
        Ok(())
    }

    fn set_disk_metadata(&self, disk_cid: &str, metadata: &DiskMetadata) -> Result<()> {
        self.run(
            Method::SetDiskMetadata,
            vec![json!(disk_cid), metadata_value(metadata)],
        )?;
        Ok(())
    }

    fn create_disk(
        &self,
        size: u64,
        cloud_properties: &PropertyMap,
        instance_id: &str,
    ) -> Result<String> {
        let result = self.run(
            Method::CreateDisk,
            vec![
                json!(size),
                Value::Object(cloud_properties.clone()),
                json!(instance_id),
            ],
        )?;
        decode_string(result)
    }

    fn attach_disk(&self, vm_cid: &str, disk_cid: &str) -> Result<Option<DiskHint>> {
        let result = self.run(Method::AttachDisk, vec![json!(vm_cid), json!(disk_cid)])?;

        if self.negotiated_version(Method::AttachDisk) >= RICH_RESULT_API_VERSION {
            Ok(decode_disk_hint(result))
        } else {
            Ok(None)
        }
    }

    fn detach_disk(&self, vm_cid: &str, disk_cid: &str) -> Result<()> {
        self.run(Method::DetachDisk, vec![json!(vm_cid), json!(disk_cid)])?;
        Ok(())
    }

    fn delete_vm(&self, vm_cid: &str) -> Result<()> {
        self.run(Method::DeleteVm, vec![json!(vm_cid)])?;
        Ok(())
    }

    fn delete_disk(&self, disk_cid: &str) -> Result<()> {
        self.run(Method::DeleteDisk, vec![json!(disk_cid)])?;
        Ok(())
    }
}
