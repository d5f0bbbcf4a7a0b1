use crate::core::intent::JOB_FIELD_FILTER;
use crate::core::ranking::{rank_jobs, rank_policies};
use crate::core::region::RegionRegistry;
use crate::core::validity::{filter_active, filter_active_now};
use crate::domain::model::{Aggregation, Domain, Intent, ProviderFailure, Record};
use crate::domain::ports::{JobProvider, PolicyProvider, PropertyProvider};
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::future::Future;
use std::sync::Arc;

pub const DEAL_AMOUNT_FIELD: &str = "dealAmount";

/// Fetch sizes and fallbacks for one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOptions {
    pub default_region: String,
    pub deal_ymd: String,
    pub job_page_size: u32,
    pub property_page_size: u32,
    pub policy_page_size: u32,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            default_region: "44790".to_string(),
            deal_ymd: "202506".to_string(),
            job_page_size: 50,
            property_page_size: 15,
            policy_page_size: 20,
        }
    }
}

/// Parses a provider amount such as `"12,500"` (만원).
pub fn deal_amount(property: &Record) -> Option<u64> {
    property
        .text(DEAL_AMOUNT_FIELD)
        .trim()
        .replace(',', "")
        .parse()
        .ok()
}

/// Keeps properties at or below the ceiling; amounts that cannot be read are dropped.
pub fn filter_by_max_price(properties: Vec<Record>, max_price: u64) -> Vec<Record> {
    properties
        .into_iter()
        .filter(|property| deal_amount(property).is_some_and(|amount| amount <= max_price))
        .collect()
}

/// Keeps jobs whose `ncsCdLst` mentions the requested field code.
pub fn filter_by_job_field(jobs: Vec<Record>, field_code: &str) -> Vec<Record> {
    jobs.into_iter()
        .filter(|job| job.text(JOB_FIELD_FILTER).contains(field_code))
        .collect()
}

/// Sequences the provider ports and applies validity, ranking and price filters.
pub struct Aggregator {
    registry: Arc<RegionRegistry>,
    jobs: Arc<dyn JobProvider>,
    properties: Arc<dyn PropertyProvider>,
    policies: Arc<dyn PolicyProvider>,
    options: AggregateOptions,
    today: Option<NaiveDate>,
}

impl Aggregator {
    pub fn new(
        registry: Arc<RegionRegistry>,
        jobs: Arc<dyn JobProvider>,
        properties: Arc<dyn PropertyProvider>,
        policies: Arc<dyn PolicyProvider>,
        options: AggregateOptions,
    ) -> Self {
        Self {
            registry,
            jobs,
            properties,
            policies,
            options,
            today: None,
        }
    }

    /// Pins the date used for policy validity instead of the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    /// Region precedence: explicit override, then the region named in the query,
    /// then the configured default. The chosen region must be supported.
    pub async fn aggregate(&self, intent: &Intent, region: Option<&str>) -> Result<Aggregation> {
        let requested = region
            .or(intent.region_mentioned.as_deref())
            .unwrap_or(self.options.default_region.as_str());
        let region = self.registry.resolve(requested)?;

        let mut aggregation = Aggregation {
            region_code: region.code.to_string(),
            region_name: region.display_name.to_string(),
            intent_kind: intent.kind,
            jobs: Vec::new(),
            properties: Vec::new(),
            policies: Vec::new(),
            failures: Vec::new(),
        };

        if !intent.is_searchable() {
            tracing::info!("🤔 No searchable intent, skipping provider calls");
            return Ok(aggregation);
        }

        tracing::info!(
            "🔍 Aggregating {} for {}({})",
            intent.kind,
            region.display_name,
            region.code
        );

        let (jobs, properties, policies) = tokio::join!(
            fetch_if(intent.search_jobs, async {
                self.jobs
                    .fetch_jobs(1, self.options.job_page_size, &intent.filters)
                    .await
            }),
            fetch_if(intent.search_realestate, async {
                self.properties
                    .fetch_properties(
                        region.code,
                        &self.options.deal_ymd,
                        1,
                        self.options.property_page_size,
                    )
                    .await
            }),
            fetch_if(intent.search_policies, async {
                self.policies
                    .fetch_policies(region, 1, self.options.policy_page_size)
                    .await
            }),
        );

        if let Some(raw) = settle(Domain::Jobs, jobs, &mut aggregation.failures) {
            let raw = match intent.filter(JOB_FIELD_FILTER) {
                Some(code) => filter_by_job_field(raw, code),
                None => raw,
            };
            aggregation.jobs = rank_jobs(&self.registry, &raw, region.code);
            tracing::debug!("📋 Jobs: {} region-relevant", aggregation.jobs.len());
        }

        if let Some(raw) = settle(Domain::Realestate, properties, &mut aggregation.failures) {
            let before = raw.len();
            aggregation.properties = match intent.max_price {
                Some(max_price) if max_price > 0 => filter_by_max_price(raw, max_price),
                _ => raw,
            };
            tracing::debug!(
                "🏠 Properties: {} of {} within price ceiling {:?}",
                aggregation.properties.len(),
                before,
                intent.max_price
            );
        }

        if let Some(raw) = settle(Domain::Policies, policies, &mut aggregation.failures) {
            let active = match self.today {
                Some(today) => filter_active(&raw, today),
                None => filter_active_now(&raw),
            };
            tracing::debug!("📋 Policies: {} of {} active", active.len(), raw.len());
            aggregation.policies = rank_policies(&self.registry, &active, region.code);
        }

        Ok(aggregation)
    }
}

async fn fetch_if<F>(enabled: bool, fetch: F) -> Option<Result<Vec<Record>>>
where
    F: Future<Output = Result<Vec<Record>>>,
{
    if enabled {
        Some(fetch.await)
    } else {
        None
    }
}

/// Unwraps a provider outcome; a failure becomes an empty domain plus a recorded failure.
fn settle(
    domain: Domain,
    outcome: Option<Result<Vec<Record>>>,
    failures: &mut Vec<ProviderFailure>,
) -> Option<Vec<Record>> {
    match outcome? {
        Ok(records) => Some(records),
        Err(e) => {
            tracing::warn!("⚠️ {} provider failed, continuing without it: {}", domain, e);
            failures.push(ProviderFailure {
                domain,
                message: e.to_string(),
            });
            None
        }
    }
}
