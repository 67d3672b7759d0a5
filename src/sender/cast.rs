use std::process::ExitStatus;

use async_trait::async_trait;
use tokio::process::Command;

use super::{INITIALIZE_SIGNATURE, InitializeRequest, SendReceipt, TransactionSender};
use crate::error::SendError;

pub const DEFAULT_CAST_BIN: &str = "cast";

/// Delegates signing and broadcast to Foundry's `cast send`.
#[derive(Debug, Clone)]
pub struct CastSender {
    program: String,
}

impl CastSender {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn arguments(request: &InitializeRequest) -> Vec<String> {
        vec![
            "send".to_string(),
            request.contract_address.clone(),
            INITIALIZE_SIGNATURE.to_string(),
            "--rpc-url".to_string(),
            request.rpc_url.clone(),
            "--private-key".to_string(),
            request.private_key.as_str().to_string(),
            "--legacy".to_string(),
        ]
    }

    fn status_error(&self, status: ExitStatus) -> SendError {
        let program = self.program.clone();
        if let Some(code) = status.code() {
            return SendError::ToolFailed {
                program,
                code: u8::try_from(code).unwrap_or(1),
            };
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt as _;
            if let Some(signal) = status.signal() {
                return SendError::ToolKilled { program, signal };
            }
        }
        SendError::ToolFailed { program, code: 1 }
    }
}

impl Default for CastSender {
    fn default() -> Self {
        Self::new(DEFAULT_CAST_BIN)
    }
}

#[async_trait]
impl TransactionSender for CastSender {
    fn name(&self) -> &str {
        &self.program
    }

    async fn send_initialize(
        &self,
        request: &InitializeRequest,
    ) -> Result<SendReceipt, SendError> {
        log::debug!(
            "{} send {} {} --rpc-url {} --private-key <redacted> --legacy",
            self.program,
            request.contract_address,
            INITIALIZE_SIGNATURE,
            request.rpc_url,
        );
        let status = Command::new(&self.program)
            .args(Self::arguments(request))
            .status()
            .await
            .map_err(|source| SendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(SendReceipt::Delegated)
        } else {
            Err(self.status_error(status))
        }
    }
}
