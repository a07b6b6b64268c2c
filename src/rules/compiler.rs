use super::checks::Issue;
use crate::models::MatchStatus;
use serde::{Deserialize, Serialize};

/// 每个问题扣减的分数
pub const ISSUE_PENALTY: f64 = 0.1;

/// 单行对账结论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: MatchStatus,
    pub score: f64,
    pub notes: String,
}

/// 由问题列表和佐证情况推导状态/评分/说明
///
/// 判定顺序 (先命中者生效):
/// 1. 存在缺少佐证的问题 -> NEEDS_REVIEW
/// 2. 存在其他问题 -> PARTIAL_MATCH
/// 3. 至少有一个佐证来源 -> MATCHED
/// 4. 无问题也无佐证 -> NEEDS_REVIEW
pub fn compile(issues: &[Issue], has_jobsheet: bool, has_yard_record: bool) -> Verdict {
    let status = if issues.iter().any(Issue::is_corroboration_gap) {
        MatchStatus::NeedsReview
    } else if !issues.is_empty() {
        MatchStatus::PartialMatch
    } else if has_jobsheet || has_yard_record {
        MatchStatus::Matched
    } else {
        MatchStatus::NeedsReview
    };

    Verdict {
        status,
        score: score_for(issues.len()),
        notes: issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "),
    }
}

pub fn score_for(issue_count: usize) -> f64 {
    (1.0 - ISSUE_PENALTY * issue_count as f64).max(0.0)
}
