//! cpiflow Cloud Provider Interface client
//!
//! This crate drives an external CPI program: typed lifecycle requests
//! ("create a VM", "attach a disk") become method invocations on the CPI, and
//! the CPI's untyped JSON results become typed values or structured errors.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Orchestrator (caller)               │
//! └─────────────────┬───────────────────────────────┘
//!                   │ trait Cloud
//! ┌─────────────────▼───────────────────────────────┐
//! │                 cpiflow-cloud                    │
//! │  ┌──────────────┐  ┌──────────────────────┐      │
//! │  │   CpiCloud   │──│  Version negotiator  │      │
//! │  └──────┬───────┘  └──────────────────────┘      │
//! │         │          ┌──────────────────────┐      │
//! │         ├──────────│    Result decoder    │      │
//! │         │          └──────────────────────┘      │
//! │         │ CmdInput / CmdOutput                   │
//! └─────────┼───────────────────────────────────────┘
//!           │ trait CmdRunner
//! ┌─────────▼───────┐
//! │   CPI program   │
//! └─────────────────┘
//! ```
//!
//! # Errors
//!
//! Three failure layers are kept apart in [`CloudError`]:
//!
//! - [`CloudError::Transport`]: the runner could not run the CPI or parse its output
//! - [`CloudError::Cpi`]: the CPI reported a structured error
//! - [`CloudError::UnexpectedResult`]: the result did not have the expected shape
//!
//! # Example
//!
//! ```ignore
//! use cpiflow_cloud::{Cloud, CloudConfig, CpiCloud};
//!
//! let config = CloudConfig::load("cpi.yml")?;
//! let cloud = CpiCloud::from_config(runner, &config)?;
//!
//! let info = cloud.info();
//! let vm_cid = cloud.create_vm("agent-1", &stemcell_cid, &props, &networks, &env)?;
//! let hint = cloud.attach_disk(&vm_cid, &disk_cid)?;
//! ```

pub mod cloud;
pub mod config;
pub mod decoder;
pub mod envelope;
pub mod error;
pub mod negotiator;
pub mod runner;
pub mod types;

// Re-exports
pub use cloud::{Cloud, CpiCloud};
pub use config::CloudConfig;
pub use envelope::{CmdContext, CmdError, CmdInput, CmdOutput, Method};
pub use error::{CloudError, CpiError, Result, TransportError};
pub use negotiator::MAX_SUPPORTED_API_VERSION;
pub use runner::CmdRunner;
pub use types::{CpiInfo, DiskHint, DiskMetadata, Networks, PropertyMap, VmMetadata};
