//! Command runner seam
//!
//! The runner owns everything about reaching the CPI program: locating and
//! spawning it, encoding the [`CmdInput`] envelope and parsing the raw output
//! back into a [`CmdOutput`]. The client only sees the decoded envelope.

use crate::envelope::{CmdInput, CmdOutput};
use crate::error::TransportError;
use std::sync::Arc;

/// Executes CPI method invocations
///
/// Implementations must be safe to call concurrently when the client is
/// shared between threads; the client itself adds no locking.
pub trait CmdRunner: Send + Sync {
    /// Run one invocation and wait for the CPI program to finish.
    ///
    /// A CPI-reported error is a successful run whose [`CmdOutput::error`]
    /// is set; `Err` is reserved for failures of the runner itself.
    fn run(&self, input: &CmdInput) -> Result<CmdOutput, TransportError>;
}

impl<R: CmdRunner + ?Sized> CmdRunner for Arc<R> {
    fn run(&self, input: &CmdInput) -> Result<CmdOutput, TransportError> {
        (**self).run(input)
    }
}

impl<R: CmdRunner + ?Sized> CmdRunner for Box<R> {
    fn run(&self, input: &CmdInput) -> Result<CmdOutput, TransportError> {
        (**self).run(input)
    }
}
