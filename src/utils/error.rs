use thiserror::Error;

#[derive(Error, Debug)]
pub enum IeumError {
    #[error("Unsupported region: {input}")]
    UnsupportedRegion { input: String },

    #[error("{domain} provider failed: {message}")]
    ProviderError { domain: String, message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Region,
    Provider,
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IeumError {
    pub fn provider(domain: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            domain: domain.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            IeumError::UnsupportedRegion { .. } => ErrorCategory::Region,
            IeumError::ProviderError { .. } => ErrorCategory::Provider,
            IeumError::ApiError(_) => ErrorCategory::Network,
            IeumError::ConfigValidationError { .. }
            | IeumError::InvalidConfigValueError { .. }
            | IeumError::MissingConfigError { .. } => ErrorCategory::Configuration,
            IeumError::SerializationError(_) | IeumError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            IeumError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Region => ErrorSeverity::Low,
            ErrorCategory::Provider | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            IeumError::UnsupportedRegion { .. } => concat!(
                "지원 지역: 정선군(51770), 영월군(51750), 청양군(44790), ",
                "강릉시(51150), 김제시(52210)"
            )
            .to_string(),
            IeumError::ProviderError { domain, .. } => {
                format!("Check the {} provider endpoint and API key, then retry", domain)
            }
            IeumError::ApiError(_) => "Check network connectivity and retry".to_string(),
            IeumError::ConfigValidationError { field, .. }
            | IeumError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' entry in the configuration file", field)
            }
            IeumError::MissingConfigError { field } => {
                format!("Set '{}' in the configuration file or environment", field)
            }
            IeumError::SerializationError(_) | IeumError::ProcessingError { .. } => {
                "The provider returned unexpected data; retry later".to_string()
            }
            IeumError::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            IeumError::UnsupportedRegion { input } => {
                format!("지원하지 않는 지역입니다: {}", input)
            }
            IeumError::ProviderError { domain, .. } => {
                format!("{} 정보를 가져오지 못했습니다.", domain)
            }
            IeumError::ApiError(_) => "외부 API 호출에 실패했습니다.".to_string(),
            IeumError::ConfigValidationError { .. }
            | IeumError::InvalidConfigValueError { .. }
            | IeumError::MissingConfigError { .. } => format!("설정 오류: {}", self),
            _ => format!("처리 중 오류가 발생했습니다: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, IeumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_region_is_low_severity() {
        let err = IeumError::UnsupportedRegion {
            input: "11110".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Region);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().contains("11110"));
    }

    #[test]
    fn test_provider_error_display() {
        let err = IeumError::provider("jobs", "status 500");
        assert_eq!(err.to_string(), "jobs provider failed: status 500");
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }
}
