//! Keyword-based intent classification.
//!
//! Matching is literal substring membership over the normalized query
//! (lowercased, whitespace removed). There is no tokenization.

use crate::core::region::RegionRegistry;
use crate::domain::model::{Intent, IntentKind};
use regex::Regex;
use std::sync::{Arc, LazyLock};

const JOB_KEYWORDS: &[&str] = &[
    "채용", "구인", "일자리", "취업", "인턴", "공채", "모집", "구직", "직장",
];
const REALESTATE_KEYWORDS: &[&str] = &[
    "아파트", "부동산", "실거래가", "매매", "집", "주택", "오피스텔", "매물",
];
const LIVING_KEYWORDS: &[&str] = &["살곳", "살", "거주", "이사", "정착", "생활"];
const POLICY_KEYWORDS: &[&str] = &["정책", "지원", "혜택", "복지", "청년정책"];
const ALL_MARKERS: &[&str] = &["통합", "전체", "모든", "다"];

/// Sample queries shown when a query matches no domain, with the kind each yields.
pub const EXAMPLE_QUERIES: &[(&str, &str, IntentKind)] = &[
    ("💼 일자리 ", "강릉시 정규직 채용", IntentKind::JobsOnly),
    ("🏠 부동산 ", "청양 아파트 3억 이하", IntentKind::RealestateOnly),
    ("📋 청년정책", "김제 청년 지원 정책", IntentKind::PoliciesOnly),
    ("🌐 전체   ", "영월 전체 정보", IntentKind::Comprehensive),
];

pub const HIRE_TYPE_FILTER: &str = "hireTypeLst";
pub const EDUCATION_FILTER: &str = "acbgCondLst";
pub const JOB_FIELD_FILTER: &str = "ncsCdLst";
pub const RECRUIT_TYPE_FILTER: &str = "recrutSeNm";

/// NCS job field names and their provider codes.
pub const JOB_FIELDS: &[(&str, &str)] = &[
    ("사업관리", "R600001"),
    ("경영.회계.사무", "R600002"),
    ("금융.보험", "R600003"),
    ("교육.자연.사회과학", "R600004"),
    ("법률.경찰.소방.교도.국방", "R600005"),
    ("보건.의료", "R600006"),
    ("사회복지.종교", "R600007"),
    ("문화.예술.디자인.방송", "R600008"),
    ("운전.운송", "R600009"),
    ("영업판매", "R600010"),
    ("경비.청소", "R600011"),
    ("이용.숙박.여행.오락.스포츠", "R600012"),
    ("음식서비스", "R600013"),
    ("건설", "R600014"),
    ("기계", "R600015"),
    ("재료", "R600016"),
    ("화학", "R600017"),
    ("섬유.의복", "R600018"),
    ("전기.전자", "R600019"),
    ("정보통신", "R600020"),
    ("식품가공", "R600021"),
    ("인쇄.목재.가구.공예", "R600022"),
    ("환경.에너지.안전", "R600023"),
    ("농림어업", "R600024"),
    ("연구", "R600025"),
];

/// Colloquial keywords mapped onto a field name from [`JOB_FIELDS`].
const JOB_FIELD_ALIASES: &[(&str, &str)] = &[
    ("통신", "정보통신"),
    ("it", "정보통신"),
    ("개발", "정보통신"),
    ("프로그래밍", "정보통신"),
    ("의료", "보건.의료"),
    ("병원", "보건.의료"),
    ("간호", "보건.의료"),
    ("교육", "교육.자연.사회과학"),
    ("선생님", "교육.자연.사회과학"),
    ("강사", "교육.자연.사회과학"),
    ("경영", "경영.회계.사무"),
    ("회계", "경영.회계.사무"),
    ("사무", "경영.회계.사무"),
    ("건설", "건설"),
    ("건축", "건설"),
    ("연구", "연구"),
];

static PRICE_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(억|천만|천|만)").expect("price pattern is valid"));

pub fn job_field_code(name: &str) -> Option<&'static str> {
    JOB_FIELDS
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, code)| *code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    AnyOf(&'static [&'static str]),
    AllOf(&'static [&'static str]),
    Contains(&'static str),
}

impl Condition {
    fn matches(&self, text: &str) -> bool {
        match self {
            Condition::AnyOf(words) => words.iter().any(|w| text.contains(w)),
            Condition::AllOf(words) => words.iter().all(|w| text.contains(w)),
            Condition::Contains(word) => text.contains(word),
        }
    }
}

/// One step of structured filter extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterRule {
    pub filter: &'static str,
    pub condition: Condition,
    pub value: &'static str,
}

impl FilterRule {
    const fn new(filter: &'static str, condition: Condition, value: &'static str) -> Self {
        Self {
            filter,
            condition,
            value,
        }
    }
}

/// Ordered filter rules. Every rule is evaluated and a match overwrites the
/// value already set for its filter, so the last matching rule wins.
pub fn default_filter_rules() -> Vec<FilterRule> {
    let mut rules = vec![
        FilterRule::new(
            HIRE_TYPE_FILTER,
            Condition::AllOf(&["청년", "인턴"]),
            "R1050,R1060,R1070",
        ),
        FilterRule::new(HIRE_TYPE_FILTER, Condition::Contains("정규직"), "R1010"),
        FilterRule::new(HIRE_TYPE_FILTER, Condition::AnyOf(&["계약직", "비정규"]), "R1040"),
        FilterRule::new(EDUCATION_FILTER, Condition::Contains("학력무관"), "R7010"),
        FilterRule::new(EDUCATION_FILTER, Condition::AnyOf(&["대졸", "4년제"]), "R7050"),
    ];

    // aliases first so an official field name in the text overrides them
    for (keyword, field) in JOB_FIELD_ALIASES {
        if let Some(code) = job_field_code(field) {
            rules.push(FilterRule::new(JOB_FIELD_FILTER, Condition::Contains(keyword), code));
        }
    }
    for (field, code) in JOB_FIELDS {
        rules.push(FilterRule::new(JOB_FIELD_FILTER, Condition::Contains(field), code));
    }

    rules.extend([
        FilterRule::new(RECRUIT_TYPE_FILTER, Condition::Contains("신입"), "R2010"),
        FilterRule::new(RECRUIT_TYPE_FILTER, Condition::Contains("경력"), "R2020"),
        FilterRule::new(RECRUIT_TYPE_FILTER, Condition::AllOf(&["신입", "경력"]), "R2030"),
        FilterRule::new(RECRUIT_TYPE_FILTER, Condition::Contains("외국인"), "R2040"),
    ]);
    rules
}

pub fn normalize_query(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Price ceiling in 만원 from fragments like `3억`, `5천만원`, `8000만원`.
pub fn parse_max_price(text: &str) -> Option<u64> {
    let normalized = normalize_query(text).replace(',', "");
    let mut total: u64 = 0;
    let mut found = false;

    for caps in PRICE_FRAGMENT.captures_iter(&normalized) {
        let Ok(amount) = caps[1].parse::<u64>() else {
            continue;
        };
        let unit = match &caps[2] {
            "억" => 10_000,
            "천만" | "천" => 1_000,
            _ => 1,
        };
        total = total.saturating_add(amount.saturating_mul(unit));
        found = true;
    }

    (found && total > 0).then_some(total)
}

pub struct IntentClassifier {
    registry: Arc<RegionRegistry>,
    rules: Vec<FilterRule>,
}

impl IntentClassifier {
    pub fn new(registry: Arc<RegionRegistry>) -> Self {
        Self {
            registry,
            rules: default_filter_rules(),
        }
    }

    pub fn classify(&self, text: &str) -> Intent {
        let text = normalize_query(text);
        let mut intent = Intent::unknown();

        intent.region_mentioned = self
            .registry
            .detect_in(&text)
            .map(|region| region.code.to_string());

        let has_job = contains_any(&text, JOB_KEYWORDS);
        let has_realestate =
            contains_any(&text, REALESTATE_KEYWORDS) || contains_any(&text, LIVING_KEYWORDS);
        let has_policy = contains_any(&text, POLICY_KEYWORDS);

        let matched = [has_job, has_realestate, has_policy]
            .iter()
            .filter(|hit| **hit)
            .count();

        if matched >= 2 {
            intent.kind = IntentKind::Comprehensive;
            intent.search_jobs = has_job;
            intent.search_realestate = has_realestate;
            intent.search_policies = has_policy;
        } else if has_job {
            intent.kind = IntentKind::JobsOnly;
            intent.search_jobs = true;
        } else if has_realestate {
            intent.kind = IntentKind::RealestateOnly;
            intent.search_realestate = true;
        } else if has_policy {
            intent.kind = IntentKind::PoliciesOnly;
            intent.search_policies = true;
        } else if contains_any(&text, ALL_MARKERS) {
            intent.kind = IntentKind::Comprehensive;
            intent.search_jobs = true;
            intent.search_realestate = true;
            intent.search_policies = true;
        }

        for rule in &self.rules {
            if rule.condition.matches(&text) {
                intent
                    .filters
                    .insert(rule.filter.to_string(), rule.value.to_string());
            }
        }

        intent.max_price = parse_max_price(&text);

        tracing::debug!(
            "Classified query as {} (region: {:?}, filters: {:?})",
            intent.kind,
            intent.region_mentioned,
            intent.filters
        );
        intent
    }
}
