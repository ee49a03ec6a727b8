use shared_database::store::PageParams;
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{DoctorProfile, ListDoctorsQuery};

const DEFAULT_PAGE_ID: i32 = 1;
const DEFAULT_PAGE_SIZE: i32 = 10;
const MIN_PAGE_SIZE: i32 = 5;
const MAX_PAGE_SIZE: i32 = 20;

/// Public, unauthenticated doctor search with offset pagination and an
/// optional specialty filter.
pub struct DoctorDirectoryService<'a> {
    state: &'a AppState,
}

impl<'a> DoctorDirectoryService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self, query: ListDoctorsQuery) -> Result<Vec<DoctorProfile>, AppError> {
        let page_id = query.page_id.unwrap_or(DEFAULT_PAGE_ID);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page_id < 1 {
            return Err(AppError::Validation(format!(
                "page_id must be at least 1, got {page_id}"
            )));
        }
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::Validation(format!(
                "page_size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        let doctors = self
            .state
            .store
            .list_doctors(
                PageParams {
                    limit: page_size,
                    offset: (page_id - 1) * page_size,
                },
                query.specialty.as_deref(),
            )
            .await?;

        Ok(doctors.into_iter().map(DoctorProfile::from).collect())
    }
}
