use super::{MatchStatus, Role};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 发票行 (invoice_lines 表的一行)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub id: i64,
    pub work_date: Option<NaiveDate>,
    pub site_location: String,
    pub role: Role,
    pub hours_on_site: f64,
    pub hours_travel: f64,
    pub hours_yard: f64,
    pub rate_per_hour: f64,
    pub line_total: f64,
    pub match_status: MatchStatus,
    pub match_score: f64,
    pub match_notes: String,
    pub jobsheet_id: Option<String>,
    pub yard_record_id: Option<String>,
}

impl InvoiceLine {
    /// 新建未对账的发票行, 对账字段取库表默认值
    pub fn new(id: i64, work_date: Option<NaiveDate>, role: Role) -> Self {
        Self {
            id,
            work_date,
            site_location: String::new(),
            role,
            hours_on_site: 0.0,
            hours_travel: 0.0,
            hours_yard: 0.0,
            rate_per_hour: 0.0,
            line_total: 0.0,
            match_status: MatchStatus::NeedsReview,
            match_score: 0.0,
            match_notes: String::new(),
            jobsheet_id: None,
            yard_record_id: None,
        }
    }

    /// 计费总工时
    pub fn total_hours(&self) -> f64 {
        self.hours_on_site + self.hours_travel + self.hours_yard
    }
}

/// 数据库原始行, 角色与状态以文本存储
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceLineRow {
    pub id: i64,
    pub work_date: Option<NaiveDate>,
    pub site_location: String,
    pub role: String,
    pub hours_on_site: f64,
    pub hours_travel: f64,
    pub hours_yard: f64,
    pub rate_per_hour: f64,
    pub line_total: f64,
    pub match_status: String,
    pub match_score: f64,
    pub match_notes: String,
    pub jobsheet_id: Option<String>,
    pub yard_record_id: Option<String>,
}

impl From<InvoiceLineRow> for InvoiceLine {
    fn from(row: InvoiceLineRow) -> Self {
        Self {
            id: row.id,
            work_date: row.work_date,
            site_location: row.site_location,
            role: Role::parse_label(&row.role),
            hours_on_site: row.hours_on_site,
            hours_travel: row.hours_travel,
            hours_yard: row.hours_yard,
            rate_per_hour: row.rate_per_hour,
            line_total: row.line_total,
            match_status: MatchStatus::parse_label(&row.match_status),
            match_score: row.match_score,
            match_notes: row.match_notes,
            jobsheet_id: row.jobsheet_id,
            yard_record_id: row.yard_record_id,
        }
    }
}

/// 发票及其所有行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    /// 分包商名称; 分包商被删除后为空
    pub subcontractor: Option<String>,
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    pub fn new(id: i64, subcontractor: Option<String>) -> Self {
        Self {
            id,
            subcontractor,
            lines: Vec::new(),
        }
    }

    pub fn add_line(&mut self, line: InvoiceLine) {
        self.lines.push(line);
    }
}

/// 发票头 (用于查询结果)
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceHeader {
    pub id: i64,
    pub subcontractor_name: Option<String>,
}
