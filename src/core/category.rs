use crate::domain::model::Record;

pub const UNCATEGORIZED: &str = "기타";
pub const NO_INFORMATION: &str = "정보 없음";

pub const MAJOR_CATEGORY_FIELD: &str = "lclsfNm";
pub const MINOR_CATEGORY_FIELD: &str = "mclsfNm";

fn split_tokens(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|token| !token.is_empty())
}

fn push_unique<'a>(tokens: &mut Vec<&'a str>, token: &'a str) {
    if !tokens.contains(&token) {
        tokens.push(token);
    }
}

fn dedupe_list(list: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for token in split_tokens(list) {
        push_unique(&mut tokens, token);
    }
    tokens
}

/// Collapses overlapping major/minor category strings into one display string.
///
/// With both sources present the unique tokens are joined with `" > "`; with a
/// single source its own tokens are joined with `", "`.
pub fn normalize_category(major: &str, minor: &str) -> String {
    let (major_trimmed, minor_trimmed) = (major.trim(), minor.trim());

    match (major.is_empty(), minor.is_empty()) {
        (false, false) => {
            if major_trimmed == minor_trimmed {
                return major_trimmed.to_string();
            }

            let mut tokens = dedupe_list(major);
            for token in split_tokens(minor) {
                push_unique(&mut tokens, token);
            }

            match tokens.len() {
                0 => major.to_string(),
                1 => tokens[0].to_string(),
                _ => tokens.join(" > "),
            }
        }
        (false, true) => dedupe_list(major).join(", "),
        (true, false) => dedupe_list(minor).join(", "),
        (true, true) => UNCATEGORIZED.to_string(),
    }
}

pub fn category_of(policy: &Record) -> String {
    normalize_category(
        &policy.text(MAJOR_CATEGORY_FIELD),
        &policy.text(MINOR_CATEGORY_FIELD),
    )
}

const EDUCATION_LABELS: &[(&str, &str)] = &[
    ("R7010", "학력무관"),
    ("R7020", "고등학교졸업"),
    ("R7030", "고등학교졸업 이상"),
    ("R7040", "전문대학졸업"),
    ("R7050", "대학교졸업"),
    ("R7060", "대학원 석사졸업"),
    ("R7070", "대학원 박사졸업"),
    ("R7080", "기타"),
];

/// Priority order, highest first.
const HIRE_TYPE_LABELS: &[(&str, &str)] = &[
    ("R1010", "정규직"),
    ("R1020", "무기계약직"),
    ("R1040", "비정규직"),
    ("R1030", "기간제계약직"),
    ("R1060", "청년인턴(채용형)"),
    ("R1050", "청년인턴(체험형)"),
    ("R1070", "기타"),
];

const RECRUIT_TYPE_LABELS: &[(&str, &str)] = &[
    ("R2010", "신입"),
    ("R2020", "경력"),
    ("R2030", "신입+경력"),
    ("R2040", "외국인 전형"),
];

fn label<'a>(table: &[(&str, &'a str)], code: &'a str) -> &'a str {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

fn rank(table: &[(&str, &str)], code: &str) -> Option<usize> {
    table.iter().position(|(c, _)| *c == code)
}

/// Education requirement codes (`R7010,R7050`) as a short label.
pub fn format_education(codes: &str) -> String {
    let codes: Vec<&str> = split_tokens(codes).collect();
    if codes.is_empty() {
        return NO_INFORMATION.to_string();
    }
    if codes.contains(&"R7010") {
        return label(EDUCATION_LABELS, "R7010").to_string();
    }

    let mut ordered: Vec<&str> = codes
        .iter()
        .copied()
        .filter(|code| rank(EDUCATION_LABELS, code).is_some())
        .collect();
    if ordered.is_empty() {
        return codes
            .iter()
            .map(|code| label(EDUCATION_LABELS, code))
            .collect::<Vec<_>>()
            .join(", ");
    }
    ordered.sort_by_key(|code| rank(EDUCATION_LABELS, code));

    match ordered.len() {
        1 => label(EDUCATION_LABELS, ordered[0]).to_string(),
        2 => ordered
            .iter()
            .map(|code| label(EDUCATION_LABELS, code))
            .collect::<Vec<_>>()
            .join(", "),
        _ => format!("{} 이상", label(EDUCATION_LABELS, ordered[0])),
    }
}

/// Hire type codes by priority, at most two shown plus a remainder count.
pub fn format_hire_type(codes: &str) -> String {
    let mut ordered: Vec<&str> = split_tokens(codes)
        .filter(|code| rank(HIRE_TYPE_LABELS, code).is_some())
        .collect();
    if ordered.is_empty() {
        return NO_INFORMATION.to_string();
    }
    ordered.sort_by_key(|code| rank(HIRE_TYPE_LABELS, code));

    let shown = ordered
        .iter()
        .take(2)
        .map(|code| label(HIRE_TYPE_LABELS, code))
        .collect::<Vec<_>>()
        .join(", ");

    if ordered.len() > 2 {
        format!("{} 외 {}개", shown, ordered.len() - 2)
    } else {
        shown
    }
}

pub fn format_recruit_type(code: &str) -> String {
    match code.trim() {
        "" => "미정".to_string(),
        code => label(RECRUIT_TYPE_LABELS, code).to_string(),
    }
}
