use std::sync::Arc;

use tracing::{info, warn};

use crate::api::error::ServiceError;
use crate::db::models::{JobRow, SortOrder};
use crate::db::store::JobStore;
use super::models::JobInput;

/// Job operations used by the HTTP handlers.
///
/// Each method issues exactly one store call and maps its failure to a
/// `ServiceError` carrying the message shown to the client.
pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    pub async fn create_job(&self, job: &JobInput) -> Result<i32, ServiceError> {
        info!("Service: Creating job with title={}", job.title);

        let id = self
            .store
            .create(job)
            .await
            .map_err(ServiceError::database("Error adding job"))?;

        info!("Service: Job created successfully with id={}", id);
        Ok(id)
    }

    pub async fn list_jobs(&self) -> Result<Vec<JobRow>, ServiceError> {
        self.store
            .get_all()
            .await
            .map_err(ServiceError::database("Failed to fetch jobs"))
    }

    pub async fn list_jobs_by_salary(&self, order: SortOrder) -> Result<Vec<JobRow>, ServiceError> {
        self.store
            .get_all_sorted_by_salary(order)
            .await
            .map_err(ServiceError::database("Failed to fetch jobs"))
    }

    /// `Ok(None)` when the job does not exist.
    pub async fn find_job(&self, id: i32) -> Result<Option<JobRow>, ServiceError> {
        let job = self
            .store
            .get_by_id(id)
            .await
            .map_err(ServiceError::database("Error fetching job details"))?;

        if job.is_none() {
            info!("Service: Job id={} not found", id);
        }
        Ok(job)
    }

    pub async fn replace_job(&self, id: i32, job: &JobInput) -> Result<(), ServiceError> {
        let affected = self
            .store
            .update(id, job)
            .await
            .map_err(ServiceError::database("Error updating job"))?;

        if affected == 0 {
            warn!("Service: Update of job id={} matched no rows", id);
        } else {
            info!("Service: Job id={} updated", id);
        }
        Ok(())
    }

    pub async fn remove_job(&self, id: i32) -> Result<(), ServiceError> {
        let affected = self
            .store
            .delete(id)
            .await
            .map_err(ServiceError::database("Error deleting job"))?;

        if affected == 0 {
            warn!("Service: Delete of job id={} matched no rows", id);
        } else {
            info!("Service: Job id={} deleted", id);
        }
        Ok(())
    }
}
