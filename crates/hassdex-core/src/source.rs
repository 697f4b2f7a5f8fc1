// ── Fetcher seam ──
//
// The builder talks to the hub only through `HubSource`, so it can run
// against an in-memory fake in tests. `HubClient` is the production impl.

use std::future::Future;

use hassdex_api::{AreaRef, DeviceInfoLookup, HubClient, HubConfig, StateObject};

type ApiResult<T> = Result<T, hassdex_api::Error>;

/// Read-only view of a hub's states and registries.
pub trait HubSource {
    /// Every entity's current state.
    fn states(&self) -> impl Future<Output = ApiResult<Vec<StateObject>>> + Send;

    /// Hub metadata (version, location name).
    fn config(&self) -> impl Future<Output = ApiResult<HubConfig>> + Send;

    /// Areas in registry order.
    fn areas(&self) -> impl Future<Output = ApiResult<Vec<AreaRef>>> + Send;

    fn area_entities(&self, area_id: &str) -> impl Future<Output = ApiResult<Vec<String>>> + Send;

    /// Device ids referenced by any entity, in first-discovery order.
    fn device_ids(&self) -> impl Future<Output = ApiResult<Vec<String>>> + Send;

    /// Descriptive attributes of one device. Infallible by contract: any
    /// failure comes back as [`DeviceInfoLookup::Malformed`].
    fn device_info(&self, device_id: &str) -> impl Future<Output = DeviceInfoLookup> + Send;

    fn device_entities(
        &self,
        device_id: &str,
    ) -> impl Future<Output = ApiResult<Vec<String>>> + Send;
}

impl HubSource for HubClient {
    async fn states(&self) -> ApiResult<Vec<StateObject>> {
        self.get_states().await
    }

    async fn config(&self) -> ApiResult<HubConfig> {
        self.get_config().await
    }

    async fn areas(&self) -> ApiResult<Vec<AreaRef>> {
        self.list_areas().await
    }

    async fn area_entities(&self, area_id: &str) -> ApiResult<Vec<String>> {
        HubClient::area_entities(self, area_id).await
    }

    async fn device_ids(&self) -> ApiResult<Vec<String>> {
        HubClient::device_ids(self).await
    }

    async fn device_info(&self, device_id: &str) -> DeviceInfoLookup {
        HubClient::device_info(self, device_id).await
    }

    async fn device_entities(&self, device_id: &str) -> ApiResult<Vec<String>> {
        HubClient::device_entities(self, device_id).await
    }
}

// ── In-memory fake ──────────────────────────────────────────────────
