pub mod dto;

use std::env;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::{Achievement, Coordinator, Department, NewCoordinator, School};

pub use dto::{Collection, SelectQuery};

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub url: String,
    pub anon_key: String,
}

impl GatewayConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let url = env::var("SUPABASE_URL")
            .map_err(|_| AppError::Config("SUPABASE_URL is not set".to_string()))?;
        let anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| AppError::Config("SUPABASE_ANON_KEY is not set".to_string()))?;

        Ok(Self { url, anon_key })
    }
}

/// Typed access to the hosted data API.
///
/// Rows are mapped to models here; nothing past this boundary sees raw JSON.
#[async_trait]
pub trait DataGateway: Send + Sync {
    async fn fetch_departments(&self) -> Result<Vec<Department>, AppError>;
    async fn fetch_schools(&self) -> Result<Vec<School>, AppError>;
    async fn find_school_by_statistical_number(
        &self,
        statistical_number: &str,
    ) -> Result<Option<School>, AppError>;
    async fn find_coordinator(
        &self,
        civil_record: &str,
        phone_number: &str,
    ) -> Result<Option<Coordinator>, AppError>;
    async fn fetch_achievements(&self) -> Result<Vec<Achievement>, AppError>;
    async fn insert_coordinator(&self, coordinator: &NewCoordinator) -> Result<(), AppError>;
}

pub struct SupabaseHttpClient {
    client: Client,
    config: GatewayConfig,
}

impl SupabaseHttpClient {
    pub fn new(config: GatewayConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, collection: Collection) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            collection.as_str()
        )
    }

    pub async fn select(
        &self,
        collection: Collection,
        query: &SelectQuery,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        let url = Url::parse_with_params(&self.endpoint(collection), query.to_params())
            .map_err(|e| AppError::Config(format!("Invalid SUPABASE_URL: {}", e)))?;
        debug!("select {} ({})", collection.as_str(), url);

        let response = self
            .client
            .get(url)
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.config.anon_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::Remote(format!("select {}: {}", collection.as_str(), e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Remote(format!(
                "select {} failed {}: {}",
                collection.as_str(),
                status,
                body
            )));
        }

        response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|e| AppError::Remote(format!("Failed to parse {} rows: {}", collection.as_str(), e)))
    }

    pub async fn insert<T: Serialize + Sync>(
        &self,
        collection: Collection,
        record: &T,
    ) -> Result<(), AppError> {
        let response = self
            .client
            .post(self.endpoint(collection))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.config.anon_key))
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .map_err(|e| AppError::Remote(format!("insert {}: {}", collection.as_str(), e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Remote(format!(
                "insert {} failed {}: {}",
                collection.as_str(),
                status,
                body
            )));
        }

        Ok(())
    }

    async fn select_typed<R, M>(
        &self,
        collection: Collection,
        query: &SelectQuery,
        map: fn(R) -> Result<M, AppError>,
    ) -> Result<Vec<M>, AppError>
    where
        R: DeserializeOwned,
    {
        let rows = self.select(collection, query).await?;
        Ok(map_rows(collection, rows, map))
    }

    /// Single-row lookup. Zero rows, or more than one, is "not found".
    async fn select_single<R, M>(
        &self,
        collection: Collection,
        query: SelectQuery,
        map: fn(R) -> Result<M, AppError>,
    ) -> Result<Option<M>, AppError>
    where
        R: DeserializeOwned,
    {
        let mut found = self.select_typed(collection, &query.limit(2), map).await?;
        if found.len() > 1 {
            warn!("expected at most one {} row, got {}", collection.as_str(), found.len());
            return Ok(None);
        }
        Ok(found.pop())
    }
}

/// Maps raw rows to models, skipping the ones that don't fit.
pub fn map_rows<R, M>(
    collection: Collection,
    rows: Vec<serde_json::Value>,
    map: fn(R) -> Result<M, AppError>,
) -> Vec<M>
where
    R: DeserializeOwned,
{
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let parsed = serde_json::from_value::<R>(row)
            .map_err(|e| AppError::BadRequest(e.to_string()))
            .and_then(map);
        match parsed {
            Ok(model) => out.push(model),
            Err(e) => warn!("Failed to parse {} row: {}", collection.as_str(), e),
        }
    }
    out
}

#[async_trait]
impl DataGateway for SupabaseHttpClient {
    async fn fetch_departments(&self) -> Result<Vec<Department>, AppError> {
        let query = SelectQuery::new().order("name", true);
        self.select_typed(Collection::Departments, &query, dto::DepartmentRow::into_model)
            .await
    }

    async fn fetch_schools(&self) -> Result<Vec<School>, AppError> {
        let query = SelectQuery::new().order("name", true);
        self.select_typed(Collection::Schools, &query, dto::SchoolRow::into_model)
            .await
    }

    async fn find_school_by_statistical_number(
        &self,
        statistical_number: &str,
    ) -> Result<Option<School>, AppError> {
        let query = SelectQuery::new().eq("statistical_number", statistical_number);
        self.select_single(Collection::Schools, query, dto::SchoolRow::into_model)
            .await
    }

    async fn find_coordinator(
        &self,
        civil_record: &str,
        phone_number: &str,
    ) -> Result<Option<Coordinator>, AppError> {
        let query = SelectQuery::new()
            .eq("civil_record", civil_record)
            .eq("phone_number", phone_number);
        self.select_single(Collection::Coordinators, query, dto::CoordinatorRow::into_model)
            .await
    }

    async fn fetch_achievements(&self) -> Result<Vec<Achievement>, AppError> {
        let query = SelectQuery::new().order("created_at", false);
        self.select_typed(Collection::Achievements, &query, dto::AchievementRow::into_model)
            .await
    }

    async fn insert_coordinator(&self, coordinator: &NewCoordinator) -> Result<(), AppError> {
        self.insert(Collection::Coordinators, coordinator).await
    }
}

/// Stand-in used when `SUPABASE_URL`/`SUPABASE_ANON_KEY` are missing.
/// Every call fails with [`AppError::Config`].
pub struct UnconfiguredGateway;

impl UnconfiguredGateway {
    fn err() -> AppError {
        AppError::Config("data gateway client not initialized".to_string())
    }
}

#[async_trait]
impl DataGateway for UnconfiguredGateway {
    async fn fetch_departments(&self) -> Result<Vec<Department>, AppError> {
        Err(Self::err())
    }

    async fn fetch_schools(&self) -> Result<Vec<School>, AppError> {
        Err(Self::err())
    }

    async fn find_school_by_statistical_number(
        &self,
        _statistical_number: &str,
    ) -> Result<Option<School>, AppError> {
        Err(Self::err())
    }

    async fn find_coordinator(
        &self,
        _civil_record: &str,
        _phone_number: &str,
    ) -> Result<Option<Coordinator>, AppError> {
        Err(Self::err())
    }

    async fn fetch_achievements(&self) -> Result<Vec<Achievement>, AppError> {
        Err(Self::err())
    }

    async fn insert_coordinator(&self, _coordinator: &NewCoordinator) -> Result<(), AppError> {
        Err(Self::err())
    }
}
