use crate::api::SharedGateway;
use crate::models::{Pagination, Patient, PatientQuery, Record};
use crate::services::list_view::{FetchOutcome, ListController, ListPage, ListSource, ListState};
use crate::dashboard_err;
use crate::utils::errors::Result;
use async_trait::async_trait;
use tracing::info;

pub struct PatientSource {
    gateway: SharedGateway,
}

#[async_trait]
impl ListSource for PatientSource {
    type Filter = PatientQuery;
    type Item = Patient;

    async fn fetch(&self, query: &PatientQuery) -> Result<ListPage<Patient>> {
        let response = self.gateway.list_patients(query).await?;
        Ok(ListPage {
            items: response.patients,
            pagination: response.pagination,
        })
    }
}

/// Paged, searchable patient list.
#[derive(Clone)]
pub struct PatientList {
    list: ListController<PatientSource>,
}

impl PatientList {
    pub fn new(gateway: SharedGateway, page_size: u32) -> Self {
        let query = PatientQuery {
            limit: page_size,
            ..PatientQuery::default()
        };
        Self::with_query(gateway, query)
    }

    /// Start from a given page and search term; the first fetch happens on `mount`.
    pub fn with_query(gateway: SharedGateway, query: PatientQuery) -> Self {
        let query = PatientQuery {
            page: query.page.max(1),
            ..query
        };
        Self {
            list: ListController::new(PatientSource { gateway }, query),
        }
    }

    pub async fn mount(&self) -> Result<FetchOutcome> {
        self.list.mount().await
    }

    pub async fn state(&self) -> ListState<PatientQuery, Patient> {
        self.list.state().await
    }

    pub async fn page(&self) -> u32 {
        self.list.filter().await.page
    }

    /// Changing the search term always returns to page 1.
    pub async fn set_search(&self, search: &str) -> Result<Option<FetchOutcome>> {
        let search = search.to_string();
        self.list
            .update_filter(|q| {
                q.search = search;
                q.page = 1;
            })
            .await
    }

    /// Jump to a page; pages below 1 are clamped to 1.
    pub async fn go_to_page(&self, page: u32) -> Result<Option<FetchOutcome>> {
        self.list.update_filter(|q| q.page = page.max(1)).await
    }

    /// No-op on page 1.
    pub async fn previous_page(&self) -> Result<Option<FetchOutcome>> {
        self.list.update_filter(|q| q.page = q.page.saturating_sub(1).max(1)).await
    }

    /// Not clamped; past the last page the gateway returns an empty page.
    pub async fn next_page(&self) -> Result<Option<FetchOutcome>> {
        self.list.update_filter(|q| q.page += 1).await
    }

    pub async fn can_go_previous(&self) -> bool {
        can_go_previous(self.page().await)
    }

    pub async fn can_go_next(&self) -> bool {
        let state = self.list.state().await;
        can_go_next(state.filter.page, state.pagination.as_ref())
    }
}

pub fn can_go_previous(page: u32) -> bool {
    page > 1
}

pub fn can_go_next(page: u32, pagination: Option<&Pagination>) -> bool {
    pagination.is_some_and(|p| page < p.total_pages)
}

/// Pagination controls are shown only when there is more than one page.
pub fn shows_pagination(pagination: Option<&Pagination>) -> bool {
    pagination.is_some_and(|p| p.total_pages > 1)
}

/// A patient together with their records.
#[derive(Debug, Clone)]
pub struct PatientDetail {
    pub patient: Patient,
    pub records: Vec<Record>,
}

impl PatientDetail {
    /// Fetch patient and records concurrently. Any failure blocks the whole view.
    pub async fn load(gateway: &SharedGateway, patient_id: &str) -> Result<Self> {
        if patient_id.trim().is_empty() {
            return Err(dashboard_err!(Validation, "Patient not found"));
        }

        let (patient, records) = futures::try_join!(
            gateway.get_patient(patient_id),
            gateway.get_patient_records(patient_id)
        )?;

        info!(patient_id = %patient_id, records = records.records.len(), "Patient detail loaded");
        Ok(Self {
            patient,
            records: records.records,
        })
    }
}
