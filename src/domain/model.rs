use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Provider record (job posting, apartment trade, youth policy) kept as an opaque map.
/// Only the fields the engine reads are ever inspected; everything else passes through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<serde_json::Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<serde_json::Value>) {
        self.data.insert(field.to_string(), value.into());
    }

    /// String or number field as text; anything else reads as `""`.
    pub fn text(&self, field: &str) -> Cow<'_, str> {
        match self.data.get(field) {
            Some(serde_json::Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(serde_json::Value::Number(n)) => Cow::Owned(n.to_string()),
            _ => Cow::Borrowed(""),
        }
    }

    pub fn has_text(&self, field: &str) -> bool {
        !self.text(field).trim().is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(obj: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            data: obj.into_iter().collect(),
        }
    }
}

/// One supported administrative region. Instances live in the region registry only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub code: &'static str,
    pub display_name: &'static str,
    /// Names accepted in place of the code, in detection order.
    pub aliases: &'static [&'static str],
    pub city: &'static str,
    /// Province keyword for the job ranker's fallback tier.
    pub province: &'static str,
    /// Province keywords for policy institution tiers, most specific first.
    pub province_keywords: &'static [&'static str],
    /// Province names sent to the policy search alongside the city keyword.
    pub search_province_keywords: &'static [&'static str],
    pub sibling_city_keywords: &'static [&'static str],
}

impl Region {
    /// City keyword followed by province keywords.
    pub fn ranking_keywords(&self) -> Vec<&'static str> {
        std::iter::once(self.city)
            .chain(self.province_keywords.iter().copied())
            .collect()
    }

    /// City keyword followed by the full province names used for policy search.
    pub fn search_keywords(&self) -> Vec<&'static str> {
        std::iter::once(self.city)
            .chain(self.search_province_keywords.iter().copied())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    JobsOnly,
    RealestateOnly,
    PoliciesOnly,
    Comprehensive,
    Unknown,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntentKind::JobsOnly => "jobs_only",
            IntentKind::RealestateOnly => "realestate_only",
            IntentKind::PoliciesOnly => "policies_only",
            IntentKind::Comprehensive => "comprehensive",
            IntentKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Structured reading of one user query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub search_jobs: bool,
    pub search_realestate: bool,
    pub search_policies: bool,
    /// Provider query parameters, e.g. `hireTypeLst` -> `R1010`.
    pub filters: BTreeMap<String, String>,
    pub region_mentioned: Option<String>,
    /// Price ceiling in 만원.
    pub max_price: Option<u64>,
}

impl Intent {
    pub fn unknown() -> Self {
        Self {
            kind: IntentKind::Unknown,
            search_jobs: false,
            search_realestate: false,
            search_policies: false,
            filters: BTreeMap::new(),
            region_mentioned: None,
            max_price: None,
        }
    }

    /// All three domains, as the summary page requests.
    pub fn comprehensive() -> Self {
        Self {
            kind: IntentKind::Comprehensive,
            search_jobs: true,
            search_realestate: true,
            search_policies: true,
            ..Self::unknown()
        }
    }

    pub fn is_searchable(&self) -> bool {
        self.kind != IntentKind::Unknown
            && (self.search_jobs || self.search_realestate || self.search_policies)
    }

    pub fn with_max_price(mut self, max_price: Option<u64>) -> Self {
        if max_price.is_some() {
            self.max_price = max_price;
        }
        self
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }
}

/// Sort key for policy relevance: lower tier first, then fewer covered regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RelevanceScore {
    pub tier: u32,
    pub tie_breaker: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Jobs,
    Realestate,
    Policies,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Jobs => "jobs",
            Domain::Realestate => "realestate",
            Domain::Policies => "policies",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderFailure {
    pub domain: Domain,
    pub message: String,
}

/// Ranked and filtered result set for one request.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregation {
    pub region_code: String,
    pub region_name: String,
    pub intent_kind: IntentKind,
    pub jobs: Vec<Record>,
    pub properties: Vec<Record>,
    pub policies: Vec<Record>,
    pub failures: Vec<ProviderFailure>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty() && self.properties.is_empty() && self.policies.is_empty()
    }

    pub fn failed(&self, domain: Domain) -> bool {
        self.failures.iter().any(|f| f.domain == domain)
    }
}
