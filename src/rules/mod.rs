//! 对账规则: 费率解析, 一致性检查, 状态推导

pub mod checks;
pub mod compiler;
pub mod rates;

pub use checks::{run_checks, Issue};
pub use compiler::{compile, Verdict};
pub use rates::RateTable;

use crate::config::RulesConfig;
use crate::models::{Corroboration, InvoiceLine};

/// 检查所需的全部规则参数
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub rates: RateTable,
    pub yard_day_max_hours: f64,
    pub full_shift_hours: f64,
}

impl RuleSet {
    pub fn from_config(rules: &RulesConfig) -> Self {
        Self {
            rates: RateTable::from_config(rules),
            yard_day_max_hours: rules.yard_day_max_hours,
            full_shift_hours: rules.full_shift_hours,
        }
    }
}

/// 对单行执行检查并推导结论 (纯函数, 不修改行)
pub fn evaluate_line(line: &InvoiceLine, rules: &RuleSet, corroboration: &Corroboration) -> Verdict {
    let issues = run_checks(line, rules, corroboration);
    compile(&issues, corroboration.has_jobsheet(), corroboration.has_yard_record())
}

/// 将佐证引用与结论写回行
pub fn apply_verdict(line: &mut InvoiceLine, corroboration: &Corroboration, verdict: Verdict) {
    line.jobsheet_id = corroboration.jobsheet_id.clone();
    line.yard_record_id = corroboration.yard_record_id.clone();
    line.match_status = verdict.status;
    line.match_score = verdict.score;
    line.match_notes = verdict.notes;
}
