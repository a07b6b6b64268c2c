use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 佐证记录 (工作单 / 场地签到), 引擎只关心其标识
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CorroborationRecord {
    pub id: String,
}

impl CorroborationRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// 佐证来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorroborationSource {
    Jobsheet,
    YardSignIn,
}

impl CorroborationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorroborationSource::Jobsheet => "jobsheet",
            CorroborationSource::YardSignIn => "yard_signin",
        }
    }
}

/// 单行的佐证快照: 每个来源取第一条候选记录的标识
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corroboration {
    pub jobsheet_id: Option<String>,
    pub yard_record_id: Option<String>,
}

impl Corroboration {
    pub fn from_records(jobsheets: &[CorroborationRecord], yard_records: &[CorroborationRecord]) -> Self {
        Self {
            jobsheet_id: jobsheets.first().map(|r| r.id.clone()),
            yard_record_id: yard_records.first().map(|r| r.id.clone()),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn has_jobsheet(&self) -> bool {
        self.jobsheet_id.is_some()
    }

    pub fn has_yard_record(&self) -> bool {
        self.yard_record_id.is_some()
    }
}
