//! 发票行一致性检查
//!
//! 每个检查都是独立的纯函数, 最多产生一个问题; `run_checks` 按固定顺序全部执行.

use super::RuleSet;
use crate::models::{Corroboration, InvoiceLine};
use std::fmt;

/// 费率容差 (货币单位/小时)
pub const RATE_TOLERANCE: f64 = 0.01;
/// 场地工时上限容差 (小时)
pub const YARD_CAP_TOLERANCE: f64 = 0.1;
/// 标准班次容差 (小时)
pub const SHIFT_TOLERANCE: f64 = 0.5;
/// 行金额容差 (货币单位)
pub const TOTAL_TOLERANCE: f64 = 0.5;

/// 检查发现的问题
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    MissingJobsheet,
    NoYardSignIn,
    RateMismatch { expected: f64, actual: f64 },
    YardHoursExceeded { max: f64 },
    ShiftLength { hours: f64, standard: f64 },
    MathsError { expected: f64, actual: f64 },
}

impl Issue {
    /// 缺少佐证记录的问题, 优先级最高
    pub fn is_corroboration_gap(&self) -> bool {
        matches!(self, Issue::MissingJobsheet | Issue::NoYardSignIn)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MissingJobsheet => f.write_str("Missing job sheet"),
            Issue::NoYardSignIn => f.write_str("No yard sign-in"),
            Issue::RateMismatch { expected, actual } => {
                write!(f, "Rate mismatch: expected {expected:?}, got {actual:?}")
            }
            Issue::YardHoursExceeded { max } => write!(f, "Yard hours exceed max {max:?}h"),
            Issue::ShiftLength { hours, standard } => write!(
                f,
                "On-site hours {hours:?} differ from standard {standard:?}h (±{SHIFT_TOLERANCE:?}h)"
            ),
            Issue::MathsError { expected, actual } => {
                write!(f, "Maths error: expected {expected:.2}, got {actual:.2}")
            }
        }
    }
}

pub fn check_jobsheet(line: &InvoiceLine, corroboration: &Corroboration) -> Option<Issue> {
    (line.hours_on_site > 0.0 && !corroboration.has_jobsheet()).then_some(Issue::MissingJobsheet)
}

pub fn check_yard_signin(line: &InvoiceLine, corroboration: &Corroboration) -> Option<Issue> {
    (line.hours_yard > 0.0 && !corroboration.has_yard_record()).then_some(Issue::NoYardSignIn)
}

/// 差值超出容差; 非有限值 (NaN/inf) 一律视为超出
fn exceeds(diff: f64, tolerance: f64) -> bool {
    !diff.is_finite() || diff.abs() > tolerance
}

pub fn check_rate(line: &InvoiceLine, rules: &RuleSet) -> Option<Issue> {
    let expected = rules.rates.expected_rate(line.role);
    exceeds(line.rate_per_hour - expected, RATE_TOLERANCE).then(|| Issue::RateMismatch {
        expected,
        actual: line.rate_per_hour,
    })
}

pub fn check_yard_cap(line: &InvoiceLine, rules: &RuleSet) -> Option<Issue> {
    let max = rules.yard_day_max_hours;
    (line.hours_yard > 0.0 && line.hours_yard > max + YARD_CAP_TOLERANCE)
        .then_some(Issue::YardHoursExceeded { max })
}

pub fn check_shift_length(line: &InvoiceLine, rules: &RuleSet) -> Option<Issue> {
    let standard = rules.full_shift_hours;
    (line.hours_on_site > 0.0 && (line.hours_on_site - standard).abs() > SHIFT_TOLERANCE).then(|| {
        Issue::ShiftLength {
            hours: line.hours_on_site,
            standard,
        }
    })
}

pub fn check_maths(line: &InvoiceLine) -> Option<Issue> {
    let expected = line.total_hours() * line.rate_per_hour;
    exceeds(expected - line.line_total, TOTAL_TOLERANCE).then(|| Issue::MathsError {
        expected,
        actual: line.line_total,
    })
}

/// 按固定顺序执行全部检查, 不短路
pub fn run_checks(line: &InvoiceLine, rules: &RuleSet, corroboration: &Corroboration) -> Vec<Issue> {
    [
        check_jobsheet(line, corroboration),
        check_yard_signin(line, corroboration),
        check_rate(line, rules),
        check_yard_cap(line, rules),
        check_shift_length(line, rules),
        check_maths(line),
    ]
    .into_iter()
    .flatten()
    .collect()
}
