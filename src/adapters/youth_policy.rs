use crate::adapters::http::ProviderHttp;
use crate::adapters::records_from_array;
use crate::config::toml_config::YOUTH_POLICY_KEY_ENV;
use crate::config::ProviderConfig;
use crate::core::ranking::exclude_sibling_policies;
use crate::domain::model::{Record, Region};
use crate::domain::ports::PolicyProvider;
use crate::utils::error::{IeumError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

pub const POLICY_ID_FIELD: &str = "plcyNo";

/// Merges search results by policy number. Position follows the first occurrence,
/// content the last; records without a number are dropped.
pub fn dedupe_policies(policies: Vec<Record>) -> Vec<Record> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Record> = Vec::new();

    for policy in policies {
        let id = policy.text(POLICY_ID_FIELD).into_owned();
        if id.is_empty() {
            continue;
        }
        match index.get(&id) {
            Some(&position) => unique[position] = policy,
            None => {
                index.insert(id, unique.len());
                unique.push(policy);
            }
        }
    }

    unique
}

/// Youth policies (youthcenter.go.kr, JSON), searched once per city and province name.
pub struct YouthPolicyClient {
    http: ProviderHttp,
    api_key: Option<String>,
}

impl YouthPolicyClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            http: ProviderHttp::new("policies", config),
            api_key: config.resolved_api_key(YOUTH_POLICY_KEY_ENV),
        }
    }

    async fn search(
        &self,
        api_key: &str,
        keyword: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Record>> {
        let params = [
            ("apiKeyNm", api_key.to_string()),
            ("pageNum", page.to_string()),
            ("pageSize", page_size.to_string()),
            ("rtnType", "json".to_string()),
            ("plcyNm", keyword.to_string()),
        ];

        let body = self.http.get_json(&params).await?;
        match body.get("resultCode").and_then(|c| c.as_i64()) {
            Some(200) => Ok(records_from_array(
                body.get("result").and_then(|r| r.get("youthPolicyList")),
            )),
            code => Err(IeumError::provider(
                self.http.domain(),
                format!(
                    "result code {:?}: {}",
                    code,
                    body.get("resultMessage")
                        .and_then(|m| m.as_str())
                        .unwrap_or("unexpected response")
                ),
            )),
        }
    }
}

#[async_trait]
impl PolicyProvider for YouthPolicyClient {
    async fn fetch_policies(
        &self,
        region: &Region,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Record>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| IeumError::MissingConfigError {
            field: format!("providers.youth_policy.api_key (or {})", YOUTH_POLICY_KEY_ENV),
        })?;

        let keywords = region.search_keywords();
        let mut collected = Vec::new();
        let mut last_error = None;
        let mut succeeded = 0;

        for keyword in &keywords {
            match self.search(api_key, keyword, page, page_size).await {
                Ok(policies) => {
                    tracing::debug!("📋 '{}' matched {} policies", keyword, policies.len());
                    succeeded += 1;
                    collected.extend(policies);
                }
                Err(e) => {
                    tracing::warn!("⚠️ Policy search for '{}' failed: {}", keyword, e);
                    last_error = Some(e);
                }
            }
        }

        if succeeded == 0 {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        let unique = dedupe_policies(collected);
        let before = unique.len();
        let policies = exclude_sibling_policies(region, unique);
        tracing::info!(
            "📋 Received {} policies for {} ({} dropped as other-city)",
            policies.len(),
            region.display_name,
            before - policies.len()
        );
        Ok(policies)
    }
}
