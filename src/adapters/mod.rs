// Provider adapters: HTTP implementations of the domain ports.

pub mod http;
pub mod realestate;
pub mod recruitment;
pub mod youth_policy;

pub use realestate::RealEstateClient;
pub use recruitment::RecruitmentClient;
pub use youth_policy::YouthPolicyClient;

use crate::domain::model::Record;

/// Object elements of a JSON array as records; anything else is skipped.
pub(crate) fn records_from_array(value: Option<&serde_json::Value>) -> Vec<Record> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object().cloned().map(Record::from))
                .collect()
        })
        .unwrap_or_default()
}
