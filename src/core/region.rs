use crate::domain::model::Region;
use crate::utils::error::{IeumError, Result};

const GANGWON_SIBLINGS_OF_GANGNEUNG: &[&str] = &[
    "춘천", "원주", "속초", "동해", "태백", "삼척", "홍천", "횡성", "영월", "평창", "정선", "철원",
    "화천", "양구", "인제", "고성", "양양",
];
const GANGWON_SIBLINGS_OF_JEONGSEON: &[&str] = &[
    "춘천", "원주", "강릉", "속초", "동해", "태백", "삼척", "홍천", "횡성", "영월", "평창", "철원",
    "화천", "양구", "인제", "고성", "양양",
];
const GANGWON_SIBLINGS_OF_YEONGWOL: &[&str] = &[
    "춘천", "원주", "강릉", "속초", "동해", "태백", "삼척", "홍천", "횡성", "정선", "평창", "철원",
    "화천", "양구", "인제", "고성", "양양",
];
const CHUNGNAM_SIBLINGS: &[&str] = &[
    "천안", "공주", "보령", "아산", "서산", "논산", "계룡", "당진", "금산", "부여", "서천", "홍성",
    "예산", "태안",
];
const JEONBUK_SIBLINGS: &[&str] = &[
    "전주", "익산", "군산", "정읍", "남원", "완주", "진안", "무주", "장수", "임실", "순창", "고창",
    "부안",
];

/// Declaration order is also the alias detection order.
const BUILTIN_REGIONS: &[Region] = &[
    Region {
        code: "51770",
        display_name: "정선군",
        aliases: &["정선", "정선군"],
        city: "정선",
        province: "강원",
        province_keywords: &["강원"],
        search_province_keywords: &["강원"],
        sibling_city_keywords: GANGWON_SIBLINGS_OF_JEONGSEON,
    },
    Region {
        code: "51750",
        display_name: "영월군",
        aliases: &["영월", "영월군"],
        city: "영월",
        province: "강원",
        province_keywords: &["강원"],
        search_province_keywords: &["강원"],
        sibling_city_keywords: GANGWON_SIBLINGS_OF_YEONGWOL,
    },
    Region {
        code: "44790",
        display_name: "청양군",
        aliases: &["청양", "청양군"],
        city: "청양",
        province: "충남",
        province_keywords: &["충남", "충청"],
        search_province_keywords: &["충남", "충청남도"],
        sibling_city_keywords: CHUNGNAM_SIBLINGS,
    },
    Region {
        code: "51150",
        display_name: "강릉시",
        aliases: &["강릉", "강릉시"],
        city: "강릉",
        province: "강원",
        province_keywords: &["강원"],
        search_province_keywords: &["강원"],
        sibling_city_keywords: GANGWON_SIBLINGS_OF_GANGNEUNG,
    },
    Region {
        code: "52210",
        display_name: "김제시",
        aliases: &["김제", "김제시"],
        city: "김제",
        province: "전북",
        province_keywords: &["전북", "전라"],
        search_province_keywords: &["전북", "전라북도"],
        sibling_city_keywords: JEONBUK_SIBLINGS,
    },
];

/// Closed allow-list of supported regions. Build once and share by reference.
#[derive(Debug, Clone)]
pub struct RegionRegistry {
    regions: &'static [Region],
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RegionRegistry {
    pub fn builtin() -> Self {
        Self {
            regions: BUILTIN_REGIONS,
        }
    }

    pub fn regions(&self) -> &[Region] {
        self.regions
    }

    pub fn get(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.code == code)
    }

    /// Exact match against a code or an alias; anything else is unsupported.
    pub fn resolve(&self, input: &str) -> Result<&Region> {
        let key = input.trim();
        self.regions
            .iter()
            .find(|r| r.code == key || r.aliases.contains(&key))
            .ok_or_else(|| IeumError::UnsupportedRegion {
                input: input.to_string(),
            })
    }

    /// First region whose alias occurs in `text`.
    pub fn detect_in(&self, text: &str) -> Option<&Region> {
        self.regions
            .iter()
            .find(|r| r.aliases.iter().any(|alias| text.contains(alias)))
    }

    pub fn display_name_or_unsupported(&self, code: &str) -> String {
        match self.get(code) {
            Some(region) => region.display_name.to_string(),
            None => format!("지원하지 않는 지역({})", code),
        }
    }

    /// `정선군(51770), 영월군(51750), ...` for error hints.
    pub fn allowed_list(&self) -> String {
        self.regions
            .iter()
            .map(|r| format!("{}({})", r.display_name, r.code))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_five_unique_codes() {
        let registry = RegionRegistry::builtin();
        let mut codes: Vec<_> = registry.regions().iter().map(|r| r.code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 5);
    }

    #[test]
    fn test_resolve_code_and_aliases() {
        let registry = RegionRegistry::builtin();
        assert_eq!(registry.resolve("51150").unwrap().code, "51150");
        assert_eq!(registry.resolve("강릉").unwrap().code, "51150");
        assert_eq!(registry.resolve("강릉시").unwrap().code, "51150");
        assert_eq!(registry.resolve(" 김제시 ").unwrap().code, "52210");
    }

    #[test]
    fn test_resolve_rejects_everything_else() {
        let registry = RegionRegistry::builtin();
        for input in ["11110", "서울", "강릉시청", "", "gangneung"] {
            match registry.resolve(input) {
                Err(IeumError::UnsupportedRegion { .. }) => {}
                other => panic!("expected UnsupportedRegion for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_detect_in_uses_first_declared_match() {
        let registry = RegionRegistry::builtin();
        // 강릉 is declared after 정선, so 정선 wins regardless of position in the text
        let found = registry.detect_in("강릉이나정선일자리").unwrap();
        assert_eq!(found.code, "51770");
        assert!(registry.detect_in("서울아파트").is_none());
    }

    #[test]
    fn test_display_name_for_unknown_code() {
        let registry = RegionRegistry::builtin();
        assert_eq!(registry.display_name_or_unsupported("44790"), "청양군");
        assert_eq!(
            registry.display_name_or_unsupported("11110"),
            "지원하지 않는 지역(11110)"
        );
    }

    #[test]
    fn test_ranking_keywords_order() {
        let registry = RegionRegistry::builtin();
        let region = registry.get("52210").unwrap();
        assert_eq!(region.ranking_keywords(), vec!["김제", "전북", "전라"]);
    }

    #[test]
    fn test_search_keywords_use_full_province_names() {
        let registry = RegionRegistry::builtin();
        assert_eq!(
            registry.get("44790").unwrap().search_keywords(),
            vec!["청양", "충남", "충청남도"]
        );
        assert_eq!(
            registry.get("52210").unwrap().search_keywords(),
            vec!["김제", "전북", "전라북도"]
        );
        assert_eq!(registry.get("51750").unwrap().search_keywords(), vec!["영월", "강원"]);
    }
}
