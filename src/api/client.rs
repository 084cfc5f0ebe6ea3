use crate::api::{routes, Gateway};
use crate::models::{
    Consent, ConsentFilter, ConsentInput, ConsentUpdate, ConsentsResponse, Patient, PatientQuery,
    PatientsResponse, RecordsResponse, Stats, TransactionFilter, TransactionsResponse,
};
use crate::utils::errors::{DashboardError, GatewayErrorBody, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

/// HTTP client for the healthcare-records gateway
#[derive(Debug, Clone)]
pub struct ApiService {
    client: Client,
    base_url: String,
}

impl ApiService {
    /// Create a new gateway client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    // Send, log, and map non-success statuses to the gateway's own message
    async fn execute<T: DeserializeOwned>(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<T> {
        let start_time = Utc::now();
        let request_id = Uuid::new_v4().to_string();

        debug!(request_id = %request_id, method = %method, path = %path, "Gateway request");

        let response = builder.send().await.map_err(|e| {
            error!(request_id = %request_id, method = %method, path = %path, error = %e, "Gateway unreachable");
            DashboardError::from(e)
        })?;

        let duration = Utc::now() - start_time;
        let status = response.status();

        if !status.is_success() {
            error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status.as_u16(),
                duration = %duration.num_milliseconds(),
                "Gateway request failed"
            );
            return Err(DashboardError::Gateway(error_message(response).await));
        }

        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration = %duration.num_milliseconds(),
            "Gateway request completed"
        );

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(request_id = %request_id, path = %path, error = %e, "Undecodable gateway response");
            DashboardError::from(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let builder = self.request(Method::GET, path).query(params);
        self.execute(Method::GET, path, builder).await
    }
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    serde_json::from_str::<GatewayErrorBody>(&text)
        .ok()
        .and_then(GatewayErrorBody::into_message)
        .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()))
}

#[async_trait]
impl Gateway for ApiService {
    async fn list_patients(&self, query: &PatientQuery) -> Result<PatientsResponse> {
        self.get(&routes::patients(), &routes::patient_params(query)).await
    }

    async fn get_patient(&self, patient_id: &str) -> Result<Patient> {
        self.get(&routes::patient(patient_id), &[]).await
    }

    async fn get_patient_records(&self, patient_id: &str) -> Result<RecordsResponse> {
        self.get(&routes::patient_records(patient_id), &[]).await
    }

    async fn list_consents(&self, filter: &ConsentFilter) -> Result<ConsentsResponse> {
        self.get(&routes::consents(), &routes::consent_params(filter)).await
    }

    async fn create_consent(&self, input: &ConsentInput) -> Result<Consent> {
        let path = routes::consents();
        let builder = self.request(Method::POST, &path).json(input);
        self.execute(Method::POST, &path, builder).await
    }

    async fn update_consent(&self, consent_id: &str, update: &ConsentUpdate) -> Result<Consent> {
        let path = routes::consent(consent_id);
        let builder = self.request(Method::PATCH, &path).json(update);
        self.execute(Method::PATCH, &path, builder).await
    }

    async fn list_transactions(&self, filter: &TransactionFilter) -> Result<TransactionsResponse> {
        self.get(&routes::transactions(), &routes::transaction_params(filter)).await
    }

    async fn get_stats(&self) -> Result<Stats> {
        self.get(&routes::stats(), &[]).await
    }
}
