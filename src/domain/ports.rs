use crate::domain::model::{Record, Region};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Public-institution job postings feed.
#[async_trait]
pub trait JobProvider: Send + Sync {
    async fn fetch_jobs(
        &self,
        page: u32,
        page_size: u32,
        filters: &BTreeMap<String, String>,
    ) -> Result<Vec<Record>>;
}

/// Apartment transaction feed, keyed by 5-digit LAWD code and contract month (YYYYMM).
#[async_trait]
pub trait PropertyProvider: Send + Sync {
    async fn fetch_properties(
        &self,
        region_code: &str,
        deal_ymd: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Record>>;
}

/// Youth policy feed, searched by the region's keywords.
#[async_trait]
pub trait PolicyProvider: Send + Sync {
    async fn fetch_policies(&self, region: &Region, page: u32, page_size: u32)
        -> Result<Vec<Record>>;
}
