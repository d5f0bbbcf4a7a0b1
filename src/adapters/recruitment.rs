use crate::adapters::http::ProviderHttp;
use crate::adapters::records_from_array;
use crate::config::toml_config::RECRUITMENT_KEY_ENV;
use crate::config::ProviderConfig;
use crate::domain::model::Record;
use crate::domain::ports::JobProvider;
use crate::utils::error::{IeumError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Public-institution recruitment listings (data.go.kr, JSON).
pub struct RecruitmentClient {
    http: ProviderHttp,
    api_key: Option<String>,
}

impl RecruitmentClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            http: ProviderHttp::new("jobs", config),
            api_key: config.resolved_api_key(RECRUITMENT_KEY_ENV),
        }
    }
}

#[async_trait]
impl JobProvider for RecruitmentClient {
    async fn fetch_jobs(
        &self,
        page: u32,
        page_size: u32,
        filters: &BTreeMap<String, String>,
    ) -> Result<Vec<Record>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| IeumError::MissingConfigError {
            field: format!("providers.recruitment.api_key (or {})", RECRUITMENT_KEY_ENV),
        })?;

        let mut params = vec![
            ("serviceKey", api_key.clone()),
            ("type", "json".to_string()),
            ("pageNo", page.to_string()),
            ("numOfRows", page_size.to_string()),
        ];
        params.extend(filters.iter().map(|(k, v)| (k.as_str(), v.clone())));

        tracing::info!(
            "📋 Fetching jobs (page {}, {} rows, filters {:?})",
            page,
            page_size,
            filters
        );
        let body = self.http.get_json(&params).await?;

        if let Some(code) = body.get("resultCode").and_then(|c| c.as_i64()) {
            if code != 200 {
                let message = body
                    .get("resultMsg")
                    .and_then(|m| m.as_str())
                    .unwrap_or("unknown error");
                return Err(IeumError::provider(
                    self.http.domain(),
                    format!("result code {}: {}", code, message),
                ));
            }
        }

        let listing = body
            .get("result")
            .or_else(|| body.get("data").and_then(|d| d.get("result")));
        let jobs = records_from_array(listing);
        tracing::info!("📋 Received {} job postings", jobs.len());
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer, api_key: Option<&str>) -> RecruitmentClient {
        let config = ProviderConfig {
            endpoint: server.url("/recruitment/list"),
            api_key: api_key.map(str::to_string),
            api_key_env: Some("IEUM_TEST_RECRUITMENT_UNSET".to_string()),
            timeout_seconds: Some(5),
            retry_attempts: Some(0),
            retry_delay_seconds: Some(0),
        };
        RecruitmentClient::new(&config)
    }

    #[tokio::test]
    async fn test_fetch_jobs_passes_filters() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/recruitment/list")
                .query_param("serviceKey", "secret")
                .query_param("type", "json")
                .query_param("pageNo", "1")
                .query_param("numOfRows", "50")
                .query_param("hireTypeLst", "R1010");
            then.status(200).json_body(json!({
                "resultCode": 200,
                "resultMsg": "성공했습니다.",
                "result": [
                    {
                        "recrutPblntSn": 1,
                        "recrutPbancTtl": "행정직 채용",
                        "workRgnNmLst": "강원 강릉시"
                    },
                    {
                        "recrutPblntSn": 2,
                        "recrutPbancTtl": "기술직 채용",
                        "workRgnNmLst": "서울"
                    }
                ]
            }));
        });

        let mut filters = BTreeMap::new();
        filters.insert("hireTypeLst".to_string(), "R1010".to_string());

        let jobs = client(&server, Some("secret"))
            .fetch_jobs(1, 50, &filters)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].text("recrutPbancTtl"), "행정직 채용");
        assert_eq!(jobs[0].text("recrutPblntSn"), "1");
    }

    #[tokio::test]
    async fn test_error_result_code_is_a_provider_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/recruitment/list");
            then.status(200).json_body(json!({
                "resultCode": 30,
                "resultMsg": "SERVICE_KEY_IS_NOT_REGISTERED_ERROR"
            }));
        });

        let err = client(&server, Some("bad"))
            .fetch_jobs(1, 10, &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SERVICE_KEY_IS_NOT_REGISTERED_ERROR"));
    }

    #[tokio::test]
    async fn test_nested_data_result_is_accepted() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/recruitment/list");
            then.status(200)
                .json_body(json!({"data": {"result": [{"recrutPblntSn": 7}, "not-an-object"]}}));
        });

        let jobs = client(&server, Some("secret"))
            .fetch_jobs(1, 10, &BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].text("recrutPblntSn"), "7");
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_the_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200);
        });

        let err = client(&server, None)
            .fetch_jobs(1, 10, &BTreeMap::new())
            .await
            .unwrap_err();

        mock.assert_hits(0);
        assert!(matches!(err, IeumError::MissingConfigError { .. }));
    }
}
