use crate::adapters::http::ProviderHttp;
use crate::config::toml_config::REALESTATE_KEY_ENV;
use crate::config::ProviderConfig;
use crate::domain::model::Record;
use crate::domain::ports::PropertyProvider;
use crate::utils::error::{IeumError, Result};
use async_trait::async_trait;
use roxmltree::{Document, Node};

const DOMAIN: &str = "realestate";
const SUCCESS_CODES: &[&str] = &["00", "000"];

fn parse_document(xml: &str) -> Result<Document<'_>> {
    Document::parse(xml)
        .map_err(|e| IeumError::provider(DOMAIN, format!("malformed XML response: {}", e)))
}

/// Text content of a leaf element, CDATA included. `None` when it has child elements.
fn leaf_text(node: Node) -> Option<String> {
    if node.children().any(|child| child.is_element()) {
        return None;
    }
    let text: String = node
        .children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect();
    Some(text.trim().to_string())
}

fn items_of(doc: &Document) -> Vec<Record> {
    doc.descendants()
        .filter(|node| node.has_tag_name("item"))
        .map(|item| {
            let mut record = Record::new();
            for field in item.children().filter(|child| child.is_element()) {
                if let Some(value) = leaf_text(field) {
                    record.insert(field.tag_name().name(), value);
                }
            }
            record
        })
        .collect()
}

/// Flat `<item>` elements of an apartment-trade response. Values are trimmed and
/// nested elements are skipped.
pub fn parse_items(xml: &str) -> Result<Vec<Record>> {
    parse_document(xml).map(|doc| items_of(&doc))
}

/// Error reported in the response header, if any.
fn header_error(doc: &Document) -> Option<String> {
    let text_of = |tag: &str| {
        doc.descendants()
            .find(|node| node.has_tag_name(tag))
            .and_then(leaf_text)
    };

    let code = text_of("resultCode")?;
    if SUCCESS_CODES.contains(&code.as_str()) {
        return None;
    }
    let message = text_of("resultMsg").unwrap_or_default();
    Some(format!("result code {}: {}", code, message))
}

/// Apartment trade records (MOLIT, XML).
pub struct RealEstateClient {
    http: ProviderHttp,
    api_key: Option<String>,
}

impl RealEstateClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            http: ProviderHttp::new(DOMAIN, config),
            api_key: config.resolved_api_key(REALESTATE_KEY_ENV),
        }
    }
}

#[async_trait]
impl PropertyProvider for RealEstateClient {
    async fn fetch_properties(
        &self,
        region_code: &str,
        deal_ymd: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Record>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| IeumError::MissingConfigError {
            field: format!("providers.realestate.api_key (or {})", REALESTATE_KEY_ENV),
        })?;

        let params = [
            ("serviceKey", api_key.clone()),
            ("pageNo", page.to_string()),
            ("numOfRows", page_size.to_string()),
            ("LAWD_CD", region_code.to_string()),
            ("DEAL_YMD", deal_ymd.to_string()),
        ];

        tracing::info!("🏠 Fetching apartment trades for {} in {}", region_code, deal_ymd);
        let body = self.http.get_text(&params).await?;
        let doc = parse_document(&body)?;

        if let Some(message) = header_error(&doc) {
            return Err(IeumError::provider(self.http.domain(), message));
        }

        let properties = items_of(&doc);
        tracing::info!("🏠 Received {} apartment trades", properties.len());
        Ok(properties)
    }
}
