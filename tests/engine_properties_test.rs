use chrono::NaiveDate;
use ieum::core::category::{normalize_category, UNCATEGORIZED};
use ieum::core::intent::IntentClassifier;
use ieum::core::ranking::{
    rank_jobs, rank_policies, INSTITUTION_FIELD, WORK_REGION_FIELD, ZIP_CODES_FIELD,
};
use ieum::core::region::RegionRegistry;
use ieum::core::validity::filter_active;
use ieum::domain::model::{IntentKind, Record};
use std::sync::Arc;

fn job(id: usize, work_region: &str) -> Record {
    Record::new()
        .with("id", id.to_string())
        .with(WORK_REGION_FIELD, work_region)
}

fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y%m%d").unwrap()
}

#[test]
fn test_job_ranking_is_one_tier_subset_for_every_region() -> anyhow::Result<()> {
    let registry = RegionRegistry::builtin();
    let jobs: Vec<Record> = [
        "강원 강릉시",
        "강원 정선군",
        "강원 영월군",
        "강원 원주시",
        "충남 청양군",
        "충남 천안시",
        "전북 김제시",
        "전북 전주시",
        "서울 종로구",
        "",
    ]
    .iter()
    .enumerate()
    .map(|(i, region)| job(i, region))
    .collect();

    for region in registry.regions() {
        let ranked = rank_jobs(&registry, &jobs, region.code);
        assert!(ranked.iter().all(|r| jobs.contains(r)));

        let city_hits = ranked
            .iter()
            .filter(|r| r.text(WORK_REGION_FIELD).contains(region.city))
            .count();
        // city-tier results only, never padded with province-only jobs
        if city_hits > 0 {
            assert_eq!(city_hits, ranked.len(), "mixed tiers for {}", region.code);
        } else {
            assert!(ranked.iter().all(|r| r.text(WORK_REGION_FIELD).contains(region.province)));
        }
    }
    Ok(())
}

#[test]
fn test_province_tier_is_used_only_without_city_matches() {
    let registry = RegionRegistry::builtin();
    let jobs = vec![job(1, "강원 원주시"), job(2, "강원 춘천시"), job(3, "경기 수원시")];

    let ranked = rank_jobs(&registry, &jobs, "51750");
    assert_eq!(ranked, jobs[..2].to_vec());
}

#[test]
fn test_unsupported_region_inputs() {
    let registry = RegionRegistry::builtin();
    let jobs = vec![job(1, "서울 종로구"), job(2, "강원 강릉시")];
    let policies: Vec<Record> = (0..12)
        .map(|i| {
            Record::new()
                .with("plcyNo", i.to_string())
                .with(INSTITUTION_FIELD, if i % 2 == 0 { "강릉시" } else { "서울" })
        })
        .collect();

    for input in ["11110", "서울", "99999", ""] {
        assert!(rank_jobs(&registry, &jobs, input).is_empty());
        assert_eq!(rank_policies(&registry, &policies, input), policies[..10].to_vec());
    }
}

#[test]
fn test_filter_active_is_idempotent_and_respects_boundaries() {
    let policies = vec![
        Record::new().with("plcyNo", "ended").with("bizPrdEndYmd", "20250101"),
        Record::new().with("plcyNo", "running").with("bizPrdEndYmd", "20260101"),
        Record::new()
            .with("plcyNo", "window")
            .with("aplyYmd", "20250101 ~ 20250601"),
        Record::new().with("plcyNo", "open").with("aplyYmd", "상시"),
    ];

    let ids = |records: &[Record]| -> Vec<String> {
        records.iter().map(|r| r.text("plcyNo").into_owned()).collect()
    };

    let on_boundary = filter_active(&policies, day("20250601"));
    assert_eq!(ids(&on_boundary), vec!["running", "window", "open"]);
    assert_eq!(filter_active(&on_boundary, day("20250601")), on_boundary);

    let day_after = filter_active(&policies, day("20250602"));
    assert_eq!(ids(&day_after), vec!["running", "open"]);
}

#[test]
fn test_category_normalization() {
    assert_eq!(normalize_category("교육", "교육"), "교육");
    assert_eq!(normalize_category("교육,복지", "복지"), "교육 > 복지");
    assert_eq!(normalize_category("", ""), UNCATEGORIZED);
}

#[test]
fn test_intent_classification() {
    let classifier = IntentClassifier::new(Arc::new(RegionRegistry::builtin()));

    let both = classifier.classify("강릉 채용이랑 청년 정책 알려줘");
    assert_eq!(both.kind, IntentKind::Comprehensive);
    assert!(both.search_jobs && both.search_policies);
    assert!(!both.search_realestate);
    assert_eq!(both.region_mentioned.as_deref(), Some("51150"));

    let apartments = classifier.classify("김제 아파트 시세");
    assert_eq!(apartments.kind, IntentKind::RealestateOnly);
    assert!(apartments.search_realestate && !apartments.search_jobs);
}

#[test]
fn test_policy_tie_break_on_region_count() {
    let registry = RegionRegistry::builtin();
    let policies = vec![
        Record::new()
            .with("plcyNo", "five")
            .with(INSTITUTION_FIELD, "전라북도")
            .with(ZIP_CODES_FIELD, "52210,52110,52130,52140,52180"),
        Record::new()
            .with("plcyNo", "one")
            .with(INSTITUTION_FIELD, "전라북도")
            .with(ZIP_CODES_FIELD, "52210"),
    ];

    let ranked = rank_policies(&registry, &policies, "52210");
    assert_eq!(ranked[0].text("plcyNo"), "one");
    assert_eq!(ranked[1].text("plcyNo"), "five");
}
