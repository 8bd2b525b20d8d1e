// HTTP gateway to the asset data access layer
use crate::application::asset_gateway::{AssetGateway, AssetUpdated};
use crate::domain::asset::AssetCountsByStation;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::broadcast;

const NOTIFICATION_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct HttpAssetGateway {
    base_url: String,
    client: reqwest::Client,
    notifications: broadcast::Sender<AssetUpdated>,
}

impl HttpAssetGateway {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            notifications,
        })
    }

    /// Relay an `assetUpdated` signal from the host to all subscribers
    pub fn publish_asset_updated(&self) -> usize {
        match self.notifications.send(AssetUpdated) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!("assetUpdated received with no subscribers");
                0
            }
        }
    }

    fn counts_url(&self) -> String {
        format!("{}/asset-counts-by-station", self.base_url)
    }
}

#[async_trait]
impl AssetGateway for HttpAssetGateway {
    async fn asset_counts_by_station(&self) -> Result<AssetCountsByStation> {
        let url = self.counts_url();
        tracing::debug!("Requesting asset counts from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to asset data layer")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Asset counts request failed with status {}: {}", status, body);
        }

        response
            .json::<AssetCountsByStation>()
            .await
            .context("Failed to parse asset counts response")
    }

    fn subscribe(&self) -> broadcast::Receiver<AssetUpdated> {
        self.notifications.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::AssetType;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_fetches_counts() {
        let router = Router::new().route(
            "/asset-counts-by-station",
            get(|| async {
                Json(json!({
                    "furniture": [
                        { "station_name": "Dodoma", "total_quantity": "7", "total_price": "2,000" }
                    ],
                    "vehicle": []
                }))
            }),
        );
        let base_url = serve(router).await;
        let gateway = HttpAssetGateway::new(base_url, Duration::from_secs(5)).unwrap();

        let counts = gateway.asset_counts_by_station().await.unwrap();
        assert_eq!(counts.stations(AssetType::Furniture)[0].station_name, "Dodoma");
        assert!(counts.stations(AssetType::Vehicle).is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let router = Router::new().route(
            "/asset-counts-by-station",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database offline") }),
        );
        let base_url = serve(router).await;
        let gateway = HttpAssetGateway::new(base_url, Duration::from_secs(5)).unwrap();

        let err = gateway.asset_counts_by_station().await.unwrap_err();
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("database offline"));
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let gateway =
            HttpAssetGateway::new("http://127.0.0.1:9".to_string(), Duration::from_secs(1)).unwrap();
        assert_eq!(gateway.publish_asset_updated(), 0);

        let mut rx = gateway.subscribe();
        assert_eq!(gateway.publish_asset_updated(), 1);
        assert_eq!(rx.recv().await.unwrap(), AssetUpdated);
    }
}
