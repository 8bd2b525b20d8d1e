// Gateway trait for the asset data access layer
use crate::domain::asset::AssetCountsByStation;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Zero-argument signal that inventory data changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetUpdated;

#[async_trait]
pub trait AssetGateway: Send + Sync {
    /// Aggregated quantity/price per station, grouped by asset type
    async fn asset_counts_by_station(&self) -> anyhow::Result<AssetCountsByStation>;

    /// Subscribe to `assetUpdated` notifications
    fn subscribe(&self) -> broadcast::Receiver<AssetUpdated>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Semaphore;

    /// In-memory gateway serving a swappable response
    pub struct StaticGateway {
        response: Mutex<Option<AssetCountsByStation>>,
        notifications: broadcast::Sender<AssetUpdated>,
        calls: AtomicUsize,
        gate: Option<Arc<Semaphore>>,
    }

    impl StaticGateway {
        pub fn new(response: AssetCountsByStation) -> Self {
            let (notifications, _) = broadcast::channel(16);
            Self {
                response: Mutex::new(Some(response)),
                notifications,
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        /// A gateway whose requests block until `release` lets them through,
        /// one request per permit
        pub fn gated(response: AssetCountsByStation) -> Self {
            Self {
                gate: Some(Arc::new(Semaphore::new(0))),
                ..Self::new(response)
            }
        }

        pub fn release(&self, requests: usize) {
            if let Some(gate) = &self.gate {
                gate.add_permits(requests);
            }
        }

        /// A gateway whose requests are always rejected
        pub fn failing() -> Self {
            let gateway = Self::new(AssetCountsByStation::new());
            *gateway.response.lock().unwrap() = None;
            gateway
        }

        pub fn set_response(&self, response: Option<AssetCountsByStation>) {
            *self.response.lock().unwrap() = response;
        }

        pub fn notify(&self) {
            let _ = self.notifications.send(AssetUpdated);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AssetGateway for StaticGateway {
        async fn asset_counts_by_station(&self) -> anyhow::Result<AssetCountsByStation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await?.forget();
            }
            self.response
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| anyhow::anyhow!("gateway request rejected"))
        }

        fn subscribe(&self) -> broadcast::Receiver<AssetUpdated> {
            self.notifications.subscribe()
        }
    }
}
