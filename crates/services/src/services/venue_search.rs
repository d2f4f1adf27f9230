//! Filtered, paginated venue directory queries.

use db::models::venue::{Venue, VenueFilters};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use ts_rs::TS;

pub const MAX_PAGE_SIZE: i64 = 50;
pub const DEFAULT_PAGE_SIZE: i64 = 12;

#[derive(Debug, Error)]
pub enum VenueSearchError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct VenueSearchParams {
    pub query: Option<String>,
    /// Two-letter state code; "all" (or absence) means no filter.
    pub state: Option<String>,
    pub table_types: Vec<String>,
    pub amenities: Vec<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct VenueSearchResult {
    pub venues: Vec<Venue>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

pub struct VenueSearchService;

impl VenueSearchService {
    /// One page of active venues matching the params: substring match on
    /// name/city, exact state, overlap on table types and amenities. Claimed
    /// venues first, then alphabetical. Out-of-range paging inputs clamp
    /// rather than error.
    pub async fn search(
        pool: &SqlitePool,
        params: &VenueSearchParams,
    ) -> Result<VenueSearchResult, VenueSearchError> {
        let page = params.page.unwrap_or(1).max(1);
        let per_page = params
            .per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * per_page;

        let filters = Self::filters(params);
        let (venues, total) = Venue::search(pool, &filters, per_page, offset).await?;
        let total_pages = if total == 0 {
            0
        } else {
            (total as u64).div_ceil(per_page as u64) as i64
        };

        Ok(VenueSearchResult {
            venues,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    fn filters(params: &VenueSearchParams) -> VenueFilters {
        let query = params
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        let state = params
            .state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
            .map(str::to_uppercase);
        VenueFilters {
            query,
            state,
            table_types: params.table_types.clone(),
            amenities: params.amenities.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_clears_state_filter() {
        let filters = VenueSearchService::filters(&VenueSearchParams {
            state: Some("all".to_string()),
            ..Default::default()
        });
        assert!(filters.state.is_none());
    }

    #[test]
    fn state_normalizes_to_uppercase() {
        let filters = VenueSearchService::filters(&VenueSearchParams {
            state: Some("tx".to_string()),
            ..Default::default()
        });
        assert_eq!(filters.state.as_deref(), Some("TX"));
    }

    #[test]
    fn blank_query_is_no_filter() {
        let filters = VenueSearchService::filters(&VenueSearchParams {
            query: Some("   ".to_string()),
            ..Default::default()
        });
        assert!(filters.query.is_none());
    }
}
