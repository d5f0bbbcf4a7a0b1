//! Human-readable views over an [`Aggregation`].
//!
//! Views keep the formatted display strings next to each other so the same value can be
//! printed as text or serialized as JSON.

use crate::core::aggregate::deal_amount;
use crate::core::category::{
    category_of, format_education, format_hire_type, format_recruit_type, NO_INFORMATION,
    UNCATEGORIZED,
};
use crate::core::ranking::{covered_region_count, ZIP_CODES_FIELD};
use crate::core::region::RegionRegistry;
use crate::core::validity::{as_compact_date, APPLY_PERIOD_FIELD};
use crate::domain::model::{Aggregation, Domain, Intent, IntentKind, ProviderFailure, Record};
use serde::Serialize;
use std::fmt::Write;

pub const JOB_DISPLAY_LIMIT: usize = 20;
pub const POLICY_DISPLAY_LIMIT: usize = 30;
pub const POLICY_DETAIL_BASE: &str =
    "https://www.youthcenter.go.kr/youthPolicy/ythPlcyTotalSearch/ythPlcyDetail";

const EMPTY_DATE: &str = "00000000";

pub fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Trade amount in 만원: `32500` -> `3억 2,500만원`, `20000` -> `2억원`.
pub fn format_price(amount: u64) -> String {
    match (amount / 10_000, amount % 10_000) {
        (0, man) => format!("{}만원", with_commas(man)),
        (eok, 0) => format!("{}억원", eok),
        (eok, man) => format!("{}억 {}만원", eok, with_commas(man)),
    }
}

/// Like [`format_price`] but always shows the 만원 part once past 1억.
pub fn format_price_breakdown(amount: u64) -> String {
    if amount >= 10_000 {
        format!("{}억 {}만원", amount / 10_000, with_commas(amount % 10_000))
    } else {
        format!("{}만원", with_commas(amount))
    }
}

/// `20250601` -> `2025년 06월 01일`; anything else unchanged.
pub fn format_date(value: &str) -> String {
    match as_compact_date(value) {
        Some(d) => format!("{}년 {}월 {}일", &d[..4], &d[4..6], &d[6..]),
        None => value.to_string(),
    }
}

pub fn format_apply_period(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let parts: Vec<&str> = value.split(" ~ ").collect();
    if parts.len() == 2 {
        return format!(
            "{} ~ {}",
            format_date(parts[0].trim()),
            format_date(parts[1].trim())
        );
    }
    format_date(value)
}

fn is_set_date(value: &str) -> bool {
    !value.trim().is_empty() && value != EMPTY_DATE
}

pub fn format_business_period(start: &str, end: &str) -> String {
    match (is_set_date(start), is_set_date(end)) {
        (true, true) => format!("{} ~ {}", format_date(start), format_date(end)),
        (true, false) if end.is_empty() => format!("{} ~", format_date(start)),
        (false, true) if start.is_empty() => format!("~ {}", format_date(end)),
        _ => String::new(),
    }
}

/// `YYYYMMDD` deadline as `YYYY.MM.DD`, `미정` otherwise.
pub fn format_deadline(value: &str) -> String {
    match as_compact_date(value) {
        Some(d) => format!("{}.{}.{}", &d[..4], &d[4..6], &d[6..]),
        None => "미정".to_string(),
    }
}

/// Coverage label from a policy's zip code list.
pub fn scope_display(zip_codes: &str) -> String {
    if zip_codes.is_empty() {
        return "범위미상".to_string();
    }
    match covered_region_count(zip_codes) {
        n if n >= 50 => format!("전국 ({}개 지역)", n),
        n if n > 10 => format!("광역 ({}개 지역)", n),
        n if n > 1 => format!("다지역 ({}개 지역)", n),
        _ => "지역특화".to_string(),
    }
}

pub fn policy_detail_url(policy_no: &str) -> String {
    if policy_no.is_empty() {
        String::new()
    } else {
        format!("{}/{}", POLICY_DETAIL_BASE, policy_no)
    }
}

fn or_default(record: &Record, field: &str, fallback: &str) -> String {
    let value = record.text(field);
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.into_owned()
    }
}

/// Readable trade amounts only.
pub fn average_price(properties: &[Record]) -> Option<u64> {
    let prices: Vec<u64> = properties.iter().filter_map(deal_amount).collect();
    if prices.is_empty() {
        return None;
    }
    Some(prices.iter().sum::<u64>() / prices.len() as u64)
}

pub fn average_price_display(properties: &[Record]) -> String {
    if properties.is_empty() {
        return "데이터 없음".to_string();
    }
    average_price(properties)
        .map(format_price_breakdown)
        .unwrap_or_else(|| "계산 불가".to_string())
}

pub fn price_range_display(properties: &[Record]) -> String {
    let prices: Vec<u64> = properties.iter().filter_map(deal_amount).collect();
    match (prices.iter().min(), prices.iter().max()) {
        (Some(min), Some(max)) => format!("{}만원 ~ {}만원", with_commas(*min), with_commas(*max)),
        _ => "확인 불가".to_string(),
    }
}

/// Most frequent leading NCS field names; ties keep first-seen order.
pub fn top_job_categories(jobs: &[Record], limit: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for job in jobs {
        let names = job.text("ncsCdNmLst");
        let category = match names.split(',').next() {
            Some(first) if !names.is_empty() => first.trim().to_string(),
            _ => UNCATEGORIZED.to_string(),
        };
        match counts.iter().position(|(name, _)| *name == category) {
            Some(i) => counts[i].1 += 1,
            None => counts.push((category, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(name, _)| name).collect()
}

fn is_urgent(policy: &Record) -> bool {
    policy.text(APPLY_PERIOD_FIELD).contains("마감") || policy.text("plcyNm").contains("긴급")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub region_name: String,
    pub total_jobs: usize,
    pub total_properties: usize,
    pub total_policies: usize,
    pub avg_property_price: String,
    pub property_price_range: String,
    pub top_job_categories: Vec<String>,
    /// Among the five most relevant policies.
    pub urgent_policies: usize,
}

impl Summary {
    pub fn of(aggregation: &Aggregation) -> Self {
        Self {
            region_name: aggregation.region_name.clone(),
            total_jobs: aggregation.jobs.len(),
            total_properties: aggregation.properties.len(),
            total_policies: aggregation.policies.len(),
            avg_property_price: average_price_display(&aggregation.properties),
            property_price_range: price_range_display(&aggregation.properties),
            top_job_categories: top_job_categories(&aggregation.jobs, 3),
            urgent_policies: aggregation
                .policies
                .iter()
                .take(5)
                .filter(|p| is_urgent(p))
                .count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobView {
    pub title: String,
    pub institution: String,
    pub hire_type: String,
    pub hire_type_detail: String,
    pub education: String,
    pub recruit_type: String,
    pub region: String,
    pub ncs_field: String,
    pub deadline: String,
}

impl JobView {
    pub fn from_record(job: &Record, province: &str) -> Self {
        let work_regions = job.text("workRgnNmLst");
        let region = match work_regions.split(',').count() {
            n if !work_regions.is_empty() && n > 1 => format!("{} 외 {}개 지역", province, n - 1),
            _ => province.to_string(),
        };
        let recruit_type = match job.text("recrutSeNm") {
            name if !name.trim().is_empty() => name.into_owned(),
            _ => format_recruit_type(&job.text("recrutSe")),
        };

        Self {
            title: or_default(job, "recrutPbancTtl", "제목 없음"),
            institution: or_default(job, "instNm", "기관명 없음"),
            hire_type: job.text("hireTypeNmLst").into_owned(),
            hire_type_detail: format_hire_type(&job.text("hireTypeLst")),
            education: format_education(&job.text("acbgCondLst")),
            recruit_type,
            region,
            ncs_field: job.text("ncsCdNmLst").into_owned(),
            deadline: format_deadline(&job.text("pbancEndYmd")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyView {
    pub apartment: String,
    pub neighborhood: String,
    pub price: String,
    pub area: String,
    pub floor: String,
    pub deal_date: String,
}

impl PropertyView {
    pub fn from_record(property: &Record) -> Self {
        let price = deal_amount(property)
            .map(format_price)
            .unwrap_or_else(|| or_default(property, "dealAmount", NO_INFORMATION));
        let area = match property.text("excluUseAr") {
            a if a.trim().is_empty() => String::new(),
            a => format!("{}㎡", a.trim()),
        };
        let (year, month, day) = (
            property.text("dealYear"),
            property.text("dealMonth"),
            property.text("dealDay"),
        );
        let deal_date = match (year.parse::<u32>(), month.parse::<u32>(), day.parse::<u32>()) {
            (Ok(y), Ok(m), Ok(d)) => format!("{:04}.{:02}.{:02}", y, m, d),
            _ => String::new(),
        };

        Self {
            apartment: or_default(property, "aptNm", "단지명 없음"),
            neighborhood: property.text("umdNm").into_owned(),
            price,
            area,
            floor: property.text("floor").into_owned(),
            deal_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyView {
    pub title: String,
    pub explanation: String,
    pub category: String,
    pub scope: String,
    pub keywords: String,
    pub institution: String,
    pub support: String,
    pub business_period: String,
    pub apply_period: String,
    pub support_scale: String,
    pub detail_url: String,
}

impl PolicyView {
    pub fn from_record(policy: &Record) -> Self {
        let apply_period = match format_apply_period(&policy.text(APPLY_PERIOD_FIELD)) {
            p if p.is_empty() => "상시접수".to_string(),
            p => p,
        };
        let support_scale = match policy.text("sprtSclCnt") {
            n if n.trim().is_empty() || n == "0" => String::new(),
            n => format!("{}명", n),
        };

        Self {
            title: or_default(policy, "plcyNm", "정책명 없음"),
            explanation: or_default(policy, "plcyExplnCn", "설명 없음"),
            category: category_of(policy),
            scope: scope_display(&policy.text(ZIP_CODES_FIELD)),
            keywords: policy.text("plcyKywdNm").into_owned(),
            institution: policy.text("sprvsnInstCdNm").into_owned(),
            support: policy.text("plcySprtCn").into_owned(),
            business_period: format_business_period(
                &policy.text("bizPrdBgngYmd"),
                &policy.text("bizPrdEndYmd"),
            ),
            apply_period,
            support_scale,
            detail_url: policy_detail_url(&policy.text("plcyNo")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub region_code: String,
    pub region_name: String,
    pub intent_kind: IntentKind,
    /// Domains the query asked for, in display order.
    pub sections: Vec<Domain>,
    pub summary: Summary,
    pub jobs: Vec<JobView>,
    pub properties: Vec<PropertyView>,
    pub policies: Vec<PolicyView>,
    pub failures: Vec<ProviderFailure>,
}

impl Report {
    pub fn new(registry: &RegionRegistry, intent: &Intent, aggregation: &Aggregation) -> Self {
        let province = registry
            .get(&aggregation.region_code)
            .map(|r| r.province)
            .unwrap_or(aggregation.region_name.as_str());
        let sections = [
            (intent.search_jobs, Domain::Jobs),
            (intent.search_realestate, Domain::Realestate),
            (intent.search_policies, Domain::Policies),
        ]
        .into_iter()
        .filter_map(|(requested, domain)| requested.then_some(domain))
        .collect();

        Self {
            region_code: aggregation.region_code.clone(),
            region_name: aggregation.region_name.clone(),
            intent_kind: aggregation.intent_kind,
            sections,
            summary: Summary::of(aggregation),
            jobs: aggregation
                .jobs
                .iter()
                .take(JOB_DISPLAY_LIMIT)
                .map(|job| JobView::from_record(job, province))
                .collect(),
            properties: aggregation
                .properties
                .iter()
                .map(PropertyView::from_record)
                .collect(),
            policies: aggregation
                .policies
                .iter()
                .take(POLICY_DISPLAY_LIMIT)
                .map(PolicyView::from_record)
                .collect(),
            failures: aggregation.failures.clone(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "📍 {} ({})", self.region_name, self.region_code);

        if self.intent_kind == IntentKind::Comprehensive {
            let s = &self.summary;
            let _ = writeln!(
                out,
                "📊 채용 {}건 · 부동산 {}건 · 정책 {}건 · 평균 매매가 {}",
                s.total_jobs, s.total_properties, s.total_policies, s.avg_property_price
            );
            if !s.top_job_categories.is_empty() {
                let _ = writeln!(out, "   주요 직무: {}", s.top_job_categories.join(", "));
            }
        }

        for section in &self.sections {
            match section {
                Domain::Jobs => self.render_jobs(&mut out),
                Domain::Realestate => self.render_properties(&mut out),
                Domain::Policies => self.render_policies(&mut out),
            }
        }

        for failure in &self.failures {
            let _ = writeln!(
                out,
                "\n⚠️ {} 정보를 가져오지 못했습니다: {}",
                failure.domain, failure.message
            );
        }

        out
    }

    fn render_jobs(&self, out: &mut String) {
        if self.jobs.is_empty() {
            let _ = writeln!(out, "\n📋 {} 지역의 채용정보를 찾을 수 없습니다.", self.region_name);
            return;
        }
        let _ = writeln!(
            out,
            "\n📋 채용정보 (총 {}건, 지역 관련성 순)",
            self.summary.total_jobs
        );
        for (i, job) in self.jobs.iter().enumerate() {
            let _ = writeln!(out, "{}. {} ({})", i + 1, job.institution, job.hire_type);
            let _ = writeln!(out, "   {}", job.title);
            let _ = writeln!(
                out,
                "   지역: {} | 학력: {} | 구분: {} | 마감: {}",
                job.region, job.education, job.recruit_type, job.deadline
            );
            if !job.ncs_field.is_empty() {
                let _ = writeln!(out, "   분야: {}", job.ncs_field);
            }
        }
    }

    fn render_properties(&self, out: &mut String) {
        if self.properties.is_empty() {
            let _ = writeln!(
                out,
                "\n🏠 {} 지역의 아파트 거래 정보를 찾을 수 없습니다.",
                self.region_name
            );
            return;
        }
        let _ = writeln!(
            out,
            "\n🏠 아파트 실거래가 (총 {}건, {})",
            self.properties.len(),
            self.summary.property_price_range
        );
        for (i, p) in self.properties.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} {} | {} | {} | {}층 | {}",
                i + 1,
                p.neighborhood,
                p.apartment,
                p.price,
                p.area,
                p.floor,
                p.deal_date
            );
        }
    }

    fn render_policies(&self, out: &mut String) {
        if self.policies.is_empty() {
            let _ = writeln!(
                out,
                "\n📋 {} 지역의 신청 가능한 청년정책이 없습니다.",
                self.region_name
            );
            return;
        }
        let _ = writeln!(
            out,
            "\n📋 청년정책 (총 {}건, 현재 신청 가능)",
            self.summary.total_policies
        );
        for (i, p) in self.policies.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, p.title);
            let _ = writeln!(out, "   분야: {} | 범위: {}", p.category, p.scope);
            if !p.institution.is_empty() {
                let _ = writeln!(out, "   주관: {}", p.institution);
            }
            let _ = writeln!(out, "   신청기간: {}", p.apply_period);
            if !p.business_period.is_empty() {
                let _ = writeln!(out, "   사업기간: {}", p.business_period);
            }
            if !p.detail_url.is_empty() {
                let _ = writeln!(out, "   🔗 {}", p.detail_url);
            }
        }
    }
}
