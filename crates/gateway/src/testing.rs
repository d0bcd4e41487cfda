//! Shared fixtures for gateway tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ledgerbrief_config::AppConfig;
use ledgerbrief_core::delivery::{DeliveryJob, DeliveryReceipt, Dispatcher};
use ledgerbrief_core::error::DeliveryError;
use ledgerbrief_core::provider::Provider;
use ledgerbrief_knowledge::Retriever;
use ledgerbrief_pipeline::Generator;
use tempfile::TempDir;

use crate::{GatewayState, SharedState};

/// Dispatcher that records every job and answers with a scripted receipt.
pub(crate) struct RecordingDispatcher {
    jobs: Mutex<Vec<DeliveryJob>>,
    vendor_status: u16,
    fail_transport: bool,
}

impl RecordingDispatcher {
    /// Vendor accepts (or rejects) with the given status code.
    pub(crate) fn with_vendor_status(vendor_status: u16) -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            vendor_status,
            fail_transport: false,
        }
    }

    /// Transport to the vendor fails outright.
    pub(crate) fn unreachable() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            vendor_status: 0,
            fail_transport: true,
        }
    }

    pub(crate) fn dispatched(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub(crate) fn jobs(&self) -> Vec<DeliveryJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    fn name(&self) -> &str {
        "recording"
    }

    async fn dispatch(
        &self,
        job: &DeliveryJob,
    ) -> std::result::Result<DeliveryReceipt, DeliveryError> {
        if self.fail_transport {
            return Err(DeliveryError::Network("connection refused".into()));
        }
        self.jobs.lock().unwrap().push(job.clone());
        Ok(DeliveryReceipt {
            status_code: self.vendor_status,
            body: serde_json::json!({"Messages": [{"Status": "success"}]}),
        })
    }
}

/// A gateway state wired to mocks, with no knowledge index loaded.
///
/// The returned TempDir owns the output directory; keep it alive for the
/// duration of the test.
pub(crate) fn test_state(
    provider: Arc<dyn Provider>,
    dispatcher: Arc<dyn Dispatcher>,
) -> (SharedState, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = AppConfig::default();
    config.output.dir = dir.path().join("output").to_string_lossy().into_owned();

    let retriever = Retriever::new(
        None,
        provider.clone(),
        config.generation.embedding_model.clone(),
        config.knowledge.data_dir.clone(),
        config.knowledge.top_k,
    );
    let generator = Generator::new(provider, config.generation.clone());

    let state = Arc::new(GatewayState {
        config,
        generator,
        retriever,
        dispatcher,
    });
    (state, dir)
}
