use cpiflow_cloud::{CmdInput, CmdOutput, CmdRunner, CpiCloud, TransportError};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const DIRECTOR_ID: &str = "fake-director-id";

/// Runner that replays queued outputs and records every input
///
/// Once the queue is empty it answers with an empty successful output.
#[derive(Default)]
pub struct FakeCmdRunner {
    outputs: Mutex<VecDeque<Result<CmdOutput, TransportError>>>,
    inputs: Mutex<Vec<CmdInput>>,
}

impl FakeCmdRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_result(&self, result: Value) {
        self.outputs
            .lock()
            .unwrap()
            .push_back(Ok(CmdOutput::with_result(result)));
    }

    #[allow(dead_code)]
    pub fn push_output(&self, output: CmdOutput) {
        self.outputs.lock().unwrap().push_back(Ok(output));
    }

    pub fn push_cpi_error(&self, error_type: &str, message: &str) {
        self.outputs
            .lock()
            .unwrap()
            .push_back(Ok(CmdOutput::with_error(error_type, message)));
    }

    pub fn push_run_error(&self, message: &str) {
        self.outputs
            .lock()
            .unwrap()
            .push_back(Err(TransportError::command_failed(message)));
    }

    pub fn inputs(&self) -> Vec<CmdInput> {
        self.inputs.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.inputs()
            .iter()
            .map(|input| input.method.to_string())
            .collect()
    }
}

impl CmdRunner for FakeCmdRunner {
    fn run(&self, input: &CmdInput) -> Result<CmdOutput, TransportError> {
        self.inputs.lock().unwrap().push(input.clone());
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CmdOutput::default()))
    }
}

pub fn new_cloud(runner: &Arc<FakeCmdRunner>, stemcell_api_version: u32) -> CpiCloud {
    CpiCloud::new(runner.clone(), DIRECTOR_ID, stemcell_api_version)
}

#[allow(dead_code)]
pub fn info_result() -> Value {
    json!({ "stemcell_formats": ["aws-raw", "aws-light"] })
}

#[allow(dead_code)]
pub fn info_result_v2() -> Value {
    json!({ "stemcell_formats": ["aws-raw", "aws-light"], "api_version": 2 })
}
