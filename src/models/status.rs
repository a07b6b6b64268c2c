use serde::{Deserialize, Serialize};
use std::fmt;

/// 发票行匹配状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Matched,
    PartialMatch,
    #[default]
    NeedsReview,
    /// 预留状态, 规则引擎目前不会产生
    Rejected,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Matched => "MATCHED",
            MatchStatus::PartialMatch => "PARTIAL_MATCH",
            MatchStatus::NeedsReview => "NEEDS_REVIEW",
            MatchStatus::Rejected => "REJECTED",
        }
    }

    /// 解析存储中的状态文本, 无法识别时按待复核处理 (与库表默认值一致)
    pub fn parse_label(label: &str) -> MatchStatus {
        match label.trim().to_ascii_uppercase().as_str() {
            "MATCHED" => MatchStatus::Matched,
            "PARTIAL_MATCH" | "PARTIAL" => MatchStatus::PartialMatch,
            "REJECTED" => MatchStatus::Rejected,
            _ => MatchStatus::NeedsReview,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_needs_review() {
        assert_eq!(MatchStatus::default(), MatchStatus::NeedsReview);
    }

    #[test]
    fn parses_stored_labels() {
        assert_eq!(MatchStatus::parse_label("matched"), MatchStatus::Matched);
        assert_eq!(MatchStatus::parse_label("PARTIAL"), MatchStatus::PartialMatch);
        assert_eq!(MatchStatus::parse_label("REJECTED"), MatchStatus::Rejected);
        assert_eq!(MatchStatus::parse_label("???"), MatchStatus::NeedsReview);
    }
}
