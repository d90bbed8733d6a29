//! Live adapter for the `RecordStore` port using the hosted backend's REST API.
//!
//! The backend exposes each table under `/rest/v1/<table>` with PostgREST
//! filters (`column=eq.value`, `column=neq.value`).

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::fleet::{DriverPatch, DriverRecord, Vehicle, VehicleKind, VehicleStatus};
use crate::ports::{RecordStore, StoreFuture};

const DRIVERS: &str = "drivers";

/// Record store backed by the hosted backend.
pub struct RestStore {
    client: Client,
    config: StoreConfig,
}

impl RestStore {
    /// Creates a store for the configured backend.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self { client: Client::new(), config }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.url.trim_end_matches('/'))
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }
}

/// Error body returned by the backend.
#[derive(Deserialize)]
struct BackendError {
    message: String,
}

/// A `trucks` or `trailers` row.
#[derive(Deserialize)]
struct VehicleRow {
    id: String,
    #[serde(alias = "truck_number", alias = "trailer_number")]
    number: String,
    #[serde(default)]
    status: VehicleStatus,
}

/// Sends the request and returns the body of a successful response.
async fn send(request: RequestBuilder) -> Result<String, StoreError> {
    let response = request.send().await.map_err(|e| StoreError::Request(e.to_string()))?;
    let status = response.status();
    let body = response.text().await.map_err(|e| StoreError::Request(e.to_string()))?;
    if !status.is_success() {
        return Err(status_error(status.as_u16(), body));
    }
    Ok(body)
}

async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, StoreError> {
    let body = send(request).await?;
    serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
}

fn status_error(status: u16, body: String) -> StoreError {
    let message = serde_json::from_str::<BackendError>(&body).map(|e| e.message).unwrap_or(body);
    StoreError::Status { status, message }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

impl RecordStore for RestStore {
    fn find_holders<'a>(
        &'a self,
        kind: VehicleKind,
        vehicle_id: &'a str,
        exclude_driver_id: Option<&'a str>,
    ) -> StoreFuture<'a, Vec<DriverRecord>> {
        Box::pin(async move {
            let mut query = vec![("select", "*".to_string()), (kind.link_field(), eq(vehicle_id))];
            if let Some(exclude) = exclude_driver_id {
                query.push(("id", format!("neq.{exclude}")));
            }
            debug!(%kind, vehicle_id, "querying holders");
            fetch(self.request(Method::GET, DRIVERS).query(&query)).await
        })
    }

    fn get_driver<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<DriverRecord>> {
        Box::pin(async move {
            let filter = eq(id);
            let rows: Vec<DriverRecord> = fetch(
                self.request(Method::GET, DRIVERS)
                    .query(&[("select", "*"), ("id", filter.as_str())]),
            )
            .await?;
            Ok(rows.into_iter().next())
        })
    }

    fn list_drivers(&self) -> StoreFuture<'_, Vec<DriverRecord>> {
        Box::pin(async move {
            fetch(
                self.request(Method::GET, DRIVERS)
                    .query(&[("select", "*"), ("order", "created_at.desc")]),
            )
            .await
        })
    }

    fn insert_driver<'a>(&'a self, patch: &'a DriverPatch) -> StoreFuture<'a, DriverRecord> {
        Box::pin(async move {
            let rows: Vec<DriverRecord> = fetch(
                self.request(Method::POST, DRIVERS)
                    .header("Prefer", "return=representation")
                    .json(patch),
            )
            .await?;
            rows.into_iter()
                .next()
                .ok_or_else(|| StoreError::Decode("insert returned no rows".into()))
        })
    }

    fn update_driver<'a>(&'a self, id: &'a str, patch: &'a DriverPatch) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let rows: Vec<serde_json::Value> = fetch(
                self.request(Method::PATCH, DRIVERS)
                    .query(&[("id", eq(id))])
                    .header("Prefer", "return=representation")
                    .json(patch),
            )
            .await?;
            if rows.is_empty() {
                return Err(StoreError::NotFound { table: DRIVERS, id: id.to_string() });
            }
            Ok(())
        })
    }

    fn delete_driver<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            send(self.request(Method::DELETE, DRIVERS).query(&[("id", eq(id))])).await?;
            Ok(())
        })
    }

    fn list_vehicles(&self, kind: VehicleKind) -> StoreFuture<'_, Vec<Vehicle>> {
        Box::pin(async move {
            let select = format!("id,{},status", kind.number_column());
            let rows: Vec<VehicleRow> = fetch(self.request(Method::GET, kind.table()).query(&[
                ("select", select.as_str()),
                ("status", "eq.active"),
                ("order", kind.number_column()),
            ]))
            .await?;
            Ok(rows
                .into_iter()
                .map(|row| Vehicle { id: row.id, number: row.number, status: row.status })
                .collect())
        })
    }
}
