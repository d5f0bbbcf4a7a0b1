//! Geographic relevance of provider records to one target region.
//!
//! Regions are only ever matched against free-text fields; no structured geo
//! field from the providers is trusted.

use crate::core::region::RegionRegistry;
use crate::domain::model::{Record, Region, RelevanceScore};

pub const WORK_REGION_FIELD: &str = "workRgnNmLst";
pub const INSTITUTION_FIELD: &str = "sprvsnInstCdNm";
pub const ZIP_CODES_FIELD: &str = "zipCd";

/// Tier of a policy that matches neither an institution keyword nor the zip list.
pub const UNRELATED_TIER: u32 = 999;
/// Records returned when the policy target is not a supported code.
pub const UNSUPPORTED_POLICY_LIMIT: usize = 10;

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn jobs_in(jobs: &[Record], keyword: &str) -> Vec<Record> {
    let keyword = strip_whitespace(keyword);
    jobs.iter()
        .filter(|job| strip_whitespace(&job.text(WORK_REGION_FIELD)).contains(&keyword))
        .cloned()
        .collect()
}

/// City-tier jobs when there are any, otherwise province-tier jobs, otherwise none.
/// `target` may be a code or an alias; unsupported targets yield an empty list.
pub fn rank_jobs(registry: &RegionRegistry, jobs: &[Record], target: &str) -> Vec<Record> {
    let Ok(region) = registry.resolve(target) else {
        tracing::debug!("Job ranking skipped for unsupported region '{}'", target);
        return Vec::new();
    };

    let city_jobs = jobs_in(jobs, region.city);
    if !city_jobs.is_empty() {
        return city_jobs;
    }

    jobs_in(jobs, region.province)
}

/// Number of regions a policy covers according to its zip code list.
pub fn covered_region_count(zip_codes: &str) -> usize {
    if zip_codes.contains(',') {
        zip_codes.split(',').count()
    } else {
        1
    }
}

pub fn policy_score(policy: &Record, region: &Region) -> RelevanceScore {
    let keywords = region.ranking_keywords();
    let institution = strip_whitespace(&policy.text(INSTITUTION_FIELD));
    let zip_codes = policy.text(ZIP_CODES_FIELD);

    let tier = keywords
        .iter()
        .position(|keyword| institution.contains(keyword))
        .map(|index| index as u32)
        .unwrap_or_else(|| {
            if !zip_codes.is_empty() && zip_codes.contains(region.code) {
                keywords.len() as u32
            } else {
                UNRELATED_TIER
            }
        });

    RelevanceScore {
        tier,
        tie_breaker: covered_region_count(&zip_codes),
    }
}

/// Sorts policies by institution tier, then by how few regions they cover.
/// An unsupported `target_code` returns the first ten records unsorted.
pub fn rank_policies(
    registry: &RegionRegistry,
    policies: &[Record],
    target_code: &str,
) -> Vec<Record> {
    let Some(region) = registry.get(target_code) else {
        tracing::debug!(
            "Policy ranking skipped for unsupported region '{}'",
            target_code
        );
        return policies
            .iter()
            .take(UNSUPPORTED_POLICY_LIMIT)
            .cloned()
            .collect();
    };

    let mut scored: Vec<(RelevanceScore, &Record)> = policies
        .iter()
        .map(|policy| (policy_score(policy, region), policy))
        .collect();
    scored.sort_by_key(|(score, _)| *score);

    scored.into_iter().map(|(_, policy)| policy.clone()).collect()
}

/// Drops policies that name a sibling city of `region` but not the region itself.
pub fn exclude_sibling_policies(region: &Region, policies: Vec<Record>) -> Vec<Record> {
    policies
        .into_iter()
        .filter(|policy| {
            let full_text = ["plcyNm", "plcyExplnCn", "cnsgNmor"]
                .iter()
                .map(|field| policy.text(field))
                .filter(|value| !value.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            if full_text.contains(region.city) {
                return true;
            }
            !region
                .sibling_city_keywords
                .iter()
                .any(|sibling| full_text.contains(sibling))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, work_region: &str) -> Record {
        Record::new()
            .with("id", id)
            .with(WORK_REGION_FIELD, work_region)
    }

    fn policy(id: &str, institution: &str, zip_codes: &str) -> Record {
        Record::new()
            .with("plcyNo", id)
            .with(INSTITUTION_FIELD, institution)
            .with(ZIP_CODES_FIELD, zip_codes)
    }

    fn ids(records: &[Record], field: &str) -> Vec<String> {
        records.iter().map(|r| r.text(field).into_owned()).collect()
    }

    #[test]
    fn test_city_tier_wins_without_province_merge() {
        let registry = RegionRegistry::builtin();
        let jobs = vec![
            job("1", "강원 강릉시"),
            job("2", "강원 원주시"),
            job("3", "강 릉"),
            job("4", "서울"),
        ];

        let ranked = rank_jobs(&registry, &jobs, "51150");
        assert_eq!(ids(&ranked, "id"), vec!["1", "3"]);
    }

    #[test]
    fn test_province_fallback() {
        let registry = RegionRegistry::builtin();
        let jobs = vec![job("1", "강원 원주시"), job("2", "서울"), job("3", "강원전역")];

        let ranked = rank_jobs(&registry, &jobs, "정선군");
        assert_eq!(ids(&ranked, "id"), vec!["1", "3"]);
    }

    #[test]
    fn test_no_tier_and_unsupported_region_are_empty() {
        let registry = RegionRegistry::builtin();
        let jobs = vec![job("1", "서울"), job("2", "부산")];
        assert!(rank_jobs(&registry, &jobs, "44790").is_empty());
        assert!(rank_jobs(&registry, &jobs, "11110").is_empty());
    }

    #[test]
    fn test_policy_tiers() {
        let registry = RegionRegistry::builtin();
        let policies = vec![
            policy("unrelated", "서울특별시", "11110"),
            policy("zip", "고용노동부", "44790,11110"),
            policy("province2", "충청 청년센터", ""),
            policy("city", "청양 군청", ""),
            policy("province1", "충남도청", ""),
        ];

        let ranked = rank_policies(&registry, &policies, "44790");
        assert_eq!(
            ids(&ranked, "plcyNo"),
            vec!["city", "province1", "province2", "zip", "unrelated"]
        );
        let region = registry.get("44790").unwrap();
        assert_eq!(policy_score(&ranked[3], region).tier, 3);
        assert_eq!(policy_score(&ranked[4], region).tier, UNRELATED_TIER);
    }

    #[test]
    fn test_policy_tie_break_prefers_fewer_regions() {
        let registry = RegionRegistry::builtin();
        let policies = vec![
            policy("wide", "강원도청", "51150,51770,51750,51110,51130"),
            policy("local", "강원도청", "51150"),
        ];

        let ranked = rank_policies(&registry, &policies, "51150");
        assert_eq!(ids(&ranked, "plcyNo"), vec!["local", "wide"]);
    }

    #[test]
    fn test_unsupported_policy_target_truncates_unsorted() {
        let registry = RegionRegistry::builtin();
        let policies: Vec<Record> = (0..15)
            .map(|i| policy(&i.to_string(), "서울", ""))
            .collect();

        let ranked = rank_policies(&registry, &policies, "강릉");
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked, policies[..10].to_vec());
    }

    #[test]
    fn test_exclude_sibling_policies() {
        let registry = RegionRegistry::builtin();
        let region = registry.get("51150").unwrap();
        let policies = vec![
            Record::new().with("plcyNm", "강릉 청년 월세 지원"),
            Record::new().with("plcyNm", "춘천 청년 창업"),
            Record::new()
                .with("plcyNm", "강원 청년 통합")
                .with("plcyExplnCn", "춘천·강릉 공동"),
            Record::new().with("plcyNm", "전국 청년 도약계좌"),
        ];

        let kept = exclude_sibling_policies(region, policies);
        assert_eq!(
            ids(&kept, "plcyNm"),
            vec!["강릉 청년 월세 지원", "강원 청년 통합", "전국 청년 도약계좌"]
        );
    }

    #[test]
    fn test_covered_region_count() {
        assert_eq!(covered_region_count(""), 1);
        assert_eq!(covered_region_count("44790"), 1);
        assert_eq!(covered_region_count("44790,11110,26110"), 3);
    }
}
