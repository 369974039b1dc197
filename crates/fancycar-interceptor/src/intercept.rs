//! Outbound publish interception pipeline.
//!
//! For every outbound publish: classification runs synchronously on the
//! caller's context, then the lookup-and-transform sequence is offloaded to
//! the runtime and awaited with a bounded timeout. Every failure mode
//! resolves to either pass-through or delivery suppression; no error ever
//! crosses back to the broker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time;
use tracing::{debug, warn};

use fancycar_storage::GenerationStore;

use crate::config::InterceptorConfig;
use crate::lookup::{GenerationLookup, GenerationStatus};
use crate::publish::OutboundPublish;
use crate::topic::{classify, TopicClass};
use crate::transform::{BackendTransformer, DeviceTransformer, PayloadTransformer};

/// Delivery decision reached by the offloaded lookup-and-transform step.
#[derive(Debug, PartialEq, Eq)]
enum Decision {
    Deliver,
    DeliverRewritten(String),
    Suppress,
}

/// Intercepts outbound publishes and rewrites payloads destined for
/// old-generation cars.
///
/// One transformer is bound to each topic classification at construction:
/// temperature topics get the device transformer, command topics the backend
/// transformer. The interceptor holds no mutable state; concurrent publishes
/// proceed independently, bounded only by the lookup semaphore.
pub struct OutboundInterceptor {
    lookup: GenerationLookup,
    device_transformer: Arc<dyn PayloadTransformer>,
    backend_transformer: Arc<dyn PayloadTransformer>,
    lookup_permits: Arc<Semaphore>,
    timeout: Duration,
}

impl OutboundInterceptor {
    pub fn new(lookup: GenerationLookup, config: &InterceptorConfig) -> Self {
        debug!("Creating fancy-cars outbound interceptor");
        Self {
            lookup,
            device_transformer: Arc::new(DeviceTransformer),
            backend_transformer: Arc::new(BackendTransformer),
            lookup_permits: Arc::new(Semaphore::new(config.pool_size.max(1))),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Open the generation registry named by the config and build an
    /// interceptor on top of it.
    pub fn from_config(config: &InterceptorConfig) -> fancycar_storage::Result<Self> {
        let store = GenerationStore::open(&config.store_path)?;
        Ok(Self::new(GenerationLookup::new(Arc::new(store)), config))
    }

    /// Intercept one outbound publish.
    ///
    /// Unmatched topics return immediately with the message untouched.
    /// Matched topics defer the delivery decision: the lookup-and-transform
    /// step runs on the runtime and is awaited for at most the configured
    /// timeout. On expiry the publish is suppressed; the worker task is not
    /// cancelled, and whatever decision it reaches afterwards is discarded.
    pub async fn on_outbound_publish(&self, publish: &mut OutboundPublish) {
        let (client_id, transformer) = match classify(publish.topic()) {
            TopicClass::NoMatch => return,
            TopicClass::Temperature { client_id } => {
                debug!("Got a message in temperature topic from {}", client_id);
                (client_id, self.device_transformer.clone())
            }
            TopicClass::Command { client_id } => {
                debug!("Got a message in command topic from {}", client_id);
                (client_id, self.backend_transformer.clone())
            }
        };

        let lookup = self.lookup.clone();
        let permits = self.lookup_permits.clone();
        let payload = publish.payload().to_vec();
        let worker =
            tokio::spawn(
                async move { decide(lookup, permits, transformer, &client_id, &payload).await },
            );

        match time::timeout(self.timeout, worker).await {
            Ok(Ok(Decision::Deliver)) => {}
            Ok(Ok(Decision::DeliverRewritten(text))) => publish.set_payload(text.into_bytes()),
            Ok(Ok(Decision::Suppress)) => publish.prevent_delivery(),
            Ok(Err(e)) => {
                warn!("Interceptor worker task failed: {}", e);
                publish.prevent_delivery();
            }
            Err(_) => {
                warn!(
                    "Generation lookup did not finish within {:?}; suppressing delivery",
                    self.timeout
                );
                publish.prevent_delivery();
            }
        }
    }
}

async fn decide(
    lookup: GenerationLookup,
    permits: Arc<Semaphore>,
    transformer: Arc<dyn PayloadTransformer>,
    client_id: &str,
    payload: &[u8],
) -> Decision {
    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => return Decision::Suppress,
    };

    match lookup.check_generation(client_id).await {
        GenerationStatus::Unknown => Decision::Suppress,
        GenerationStatus::Current => Decision::Deliver,
        GenerationStatus::Legacy => {
            debug!("Transforming outbound message for client {}", client_id);
            match transformer.transform(payload) {
                Some(text) => Decision::DeliverRewritten(text),
                None => Decision::Suppress,
            }
        }
    }
}
