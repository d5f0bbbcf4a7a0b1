use crate::core::aggregate::AggregateOptions;
use crate::core::region::RegionRegistry;
use crate::utils::error::{IeumError, Result};
use crate::utils::validation::{
    validate_deal_ymd, validate_non_empty_string, validate_positive_number, validate_range,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const RECRUITMENT_ENDPOINT: &str = "https://apis.data.go.kr/1051000/recruitment/list";
pub const REALESTATE_ENDPOINT: &str =
    "https://apis.data.go.kr/1613000/RTMSDataSvcAptTrade/getRTMSDataSvcAptTrade";
pub const YOUTH_POLICY_ENDPOINT: &str = "https://www.youthcenter.go.kr/go/ythip/getPlcy";

pub const RECRUITMENT_KEY_ENV: &str = "DATA_GO_KR_KEY";
pub const REALESTATE_KEY_ENV: &str = "MOLIT_API_KEY";
pub const YOUTH_POLICY_KEY_ENV: &str = "YOUTH_API_KEY";

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_region: String,
    /// Trade month queried from the real-estate feed (YYYYMM).
    pub deal_ymd: String,
    pub job_page_size: u32,
    pub property_page_size: u32,
    pub policy_page_size: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let options = AggregateOptions::default();
        Self {
            default_region: options.default_region,
            deal_ymd: options.deal_ymd,
            job_page_size: options.job_page_size,
            property_page_size: options.property_page_size,
            policy_page_size: options.policy_page_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "ProviderConfig::recruitment")]
    pub recruitment: ProviderConfig,
    #[serde(default = "ProviderConfig::realestate")]
    pub realestate: ProviderConfig,
    #[serde(default = "ProviderConfig::youth_policy")]
    pub youth_policy: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            recruitment: ProviderConfig::recruitment(),
            realestate: ProviderConfig::realestate(),
            youth_policy: ProviderConfig::youth_policy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Overrides the provider's default environment variable for the key.
    pub api_key_env: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
}

impl ProviderConfig {
    fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: None,
            api_key_env: None,
            timeout_seconds: None,
            retry_attempts: None,
            retry_delay_seconds: None,
        }
    }

    pub fn recruitment() -> Self {
        Self::with_endpoint(RECRUITMENT_ENDPOINT)
    }

    pub fn realestate() -> Self {
        Self::with_endpoint(REALESTATE_ENDPOINT)
    }

    pub fn youth_policy() -> Self {
        Self::with_endpoint(YOUTH_POLICY_ENDPOINT)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(10)
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts.unwrap_or(2)
    }

    pub fn retry_delay_seconds(&self) -> u64 {
        self.retry_delay_seconds.unwrap_or(1)
    }

    /// The configured key, or the environment variable when it is empty or an
    /// unsubstituted `${VAR}`.
    pub fn resolved_api_key(&self, default_env: &str) -> Option<String> {
        let env_name = self.api_key_env.as_deref().unwrap_or(default_env);
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !ENV_PLACEHOLDER.is_match(key))
            .map(str::to_string)
            .or_else(|| {
                std::env::var(env_name)
                    .ok()
                    .map(|key| key.trim().to_string())
                    .filter(|key| !key.is_empty())
            })
    }

    fn validate_as(&self, section: &str) -> Result<()> {
        validate_url(&format!("{section}.endpoint"), &self.endpoint)?;
        if let Some(env_name) = &self.api_key_env {
            validate_non_empty_string(&format!("{section}.api_key_env"), env_name)?;
        }
        validate_range(
            &format!("{section}.timeout_seconds"),
            self.timeout_seconds(),
            1,
            300,
        )?;
        validate_range(
            &format!("{section}.retry_attempts"),
            self.retry_attempts(),
            0,
            10,
        )?;
        validate_range(
            &format!("{section}.retry_delay_seconds"),
            self.retry_delay_seconds(),
            0,
            60,
        )?;
        Ok(())
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IeumError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| IeumError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            default_region: self.engine.default_region.clone(),
            deal_ymd: self.engine.deal_ymd.clone(),
            job_page_size: self.engine.job_page_size,
            property_page_size: self.engine.property_page_size,
            policy_page_size: self.engine.policy_page_size,
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        let registry = RegionRegistry::builtin();
        if registry.resolve(&self.engine.default_region).is_err() {
            return Err(IeumError::InvalidConfigValueError {
                field: "engine.default_region".to_string(),
                value: self.engine.default_region.clone(),
                reason: format!("Supported regions: {}", registry.allowed_list()),
            });
        }

        validate_deal_ymd("engine.deal_ymd", &self.engine.deal_ymd)?;
        validate_positive_number("engine.job_page_size", self.engine.job_page_size as usize, 1)?;
        validate_positive_number(
            "engine.property_page_size",
            self.engine.property_page_size as usize,
            1,
        )?;
        validate_positive_number(
            "engine.policy_page_size",
            self.engine.policy_page_size as usize,
            1,
        )?;

        self.providers
            .recruitment
            .validate_as("providers.recruitment")?;
        self.providers
            .realestate
            .validate_as("providers.realestate")?;
        self.providers
            .youth_policy
            .validate_as("providers.youth_policy")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config.engine.default_region, "44790");
        assert_eq!(config.engine.deal_ymd, "202506");
        assert_eq!(config.engine.job_page_size, 50);
        assert_eq!(config.providers.recruitment.endpoint, RECRUITMENT_ENDPOINT);
        assert!(config.providers.youth_policy.api_key_env.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[engine]
default_region = "강릉"
deal_ymd = "202412"

[providers.realestate]
endpoint = "http://localhost:9000/apt"
api_key = "abc"
timeout_seconds = 3
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.engine.default_region, "강릉");
        assert_eq!(config.engine.policy_page_size, 20);
        assert_eq!(config.providers.realestate.timeout_seconds(), 3);
        assert_eq!(config.providers.realestate.retry_attempts(), 2);
        assert_eq!(
            config.providers.realestate.resolved_api_key(REALESTATE_KEY_ENV).as_deref(),
            Some("abc")
        );
        assert_eq!(config.providers.recruitment.endpoint, RECRUITMENT_ENDPOINT);
        assert!(config.validate().is_ok());

        let options = config.aggregate_options();
        assert_eq!(options.deal_ymd, "202412");
    }

    #[test]
    fn test_env_var_substitution_and_key_fallback() {
        std::env::set_var("IEUM_TEST_ENDPOINT", "https://test.api.com/list");
        std::env::set_var("IEUM_TEST_FALLBACK_KEY", "from-env");

        let toml_content = r#"
[providers.recruitment]
endpoint = "${IEUM_TEST_ENDPOINT}"
api_key = "${IEUM_TEST_UNSET_KEY}"
api_key_env = "IEUM_TEST_FALLBACK_KEY"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.providers.recruitment.endpoint, "https://test.api.com/list");
        assert_eq!(
            config.providers.recruitment.resolved_api_key(RECRUITMENT_KEY_ENV).as_deref(),
            Some("from-env")
        );

        std::env::remove_var("IEUM_TEST_ENDPOINT");
        std::env::remove_var("IEUM_TEST_FALLBACK_KEY");
    }

    #[test]
    fn test_config_validation() {
        let unsupported =
            AppConfig::from_toml_str("[engine]\ndefault_region = \"서울\"\n").unwrap();
        match unsupported.validate() {
            Err(IeumError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "engine.default_region")
            }
            other => panic!("expected invalid default_region, got {:?}", other),
        }

        let bad_month = AppConfig::from_toml_str("[engine]\ndeal_ymd = \"202513\"\n").unwrap();
        assert!(bad_month.validate().is_err());

        let bad_url = AppConfig::from_toml_str(
            "[providers.youth_policy]\nendpoint = \"invalid-url\"\n",
        )
        .unwrap();
        assert!(bad_url.validate().is_err());

        let zero_page = AppConfig::from_toml_str("[engine]\njob_page_size = 0\n").unwrap();
        assert!(zero_page.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let err = AppConfig::from_toml_str("[engine\n").unwrap_err();
        assert!(matches!(err, IeumError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all("[engine]\ndefault_region = \"52210\"\n".as_bytes())
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.engine.default_region, "52210");
    }
}
