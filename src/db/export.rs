use crate::models::InvoiceLine;
use std::io::Write;

const HEADER: [&str; 12] = [
    "line_id",
    "work_date",
    "site_location",
    "role",
    "total_hours",
    "rate_per_hour",
    "line_total",
    "match_status",
    "match_score",
    "jobsheet_id",
    "yard_record_id",
    "match_notes",
];

/// 导出发票行对账结果为 CSV
pub fn write_report<W: Write>(lines: &[InvoiceLine], output: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(HEADER)?;

    for line in lines {
        writer.write_record(&[
            line.id.to_string(),
            line.work_date.map(|d| d.to_string()).unwrap_or_default(),
            line.site_location.clone(),
            line.role.to_string(),
            format!("{:.2}", line.total_hours()),
            format!("{:.2}", line.rate_per_hour),
            format!("{:.2}", line.line_total),
            line.match_status.to_string(),
            format!("{:.2}", line.match_score),
            line.jobsheet_id.clone().unwrap_or_default(),
            line.yard_record_id.clone().unwrap_or_default(),
            line.match_notes.clone(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
