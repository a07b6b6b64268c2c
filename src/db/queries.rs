use crate::error::{ReconError, ReconResult};
use crate::models::{CorroborationRecord, InvoiceHeader, InvoiceLine, InvoiceLineRow};
use chrono::NaiveDate;
use sqlx::PgPool;
use std::time::{Duration, Instant};

/// 写回超时
const COMMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// 查询发票头 (含分包商名称)
pub async fn get_invoice_header(
    pool: &PgPool,
    invoice_id: i64,
) -> Result<Option<InvoiceHeader>, sqlx::Error> {
    sqlx::query_as::<_, InvoiceHeader>(
        r#"
        SELECT i.id::int8 AS id, s.name AS subcontractor_name
        FROM invoices i
        LEFT JOIN subcontractors s ON s.id = i.subcontractor_id
        WHERE i.id = $1
        "#
    )
    .bind(invoice_id)
    .fetch_optional(pool)
    .await
}

/// 查询发票行 (按行ID保序)
pub async fn list_invoice_lines(
    pool: &PgPool,
    invoice_id: i64,
) -> Result<Vec<InvoiceLine>, sqlx::Error> {
    let rows = sqlx::query_as::<_, InvoiceLineRow>(
        r#"
        SELECT id::int8 AS id, work_date, site_location, role,
               hours_on_site, hours_travel, hours_yard,
               rate_per_hour, line_total,
               match_status, match_score, match_notes,
               jobsheet_id, yard_record_id
        FROM invoice_lines
        WHERE invoice_id = $1
        ORDER BY id
        "#
    )
    .bind(invoice_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(InvoiceLine::from).collect())
}

/// 查询某分包商某日的工作单 (按ID升序, 保证"第一条"稳定)
pub async fn find_jobsheets(
    pool: &PgPool,
    subcontractor: &str,
    work_date: Option<NaiveDate>,
) -> Result<Vec<CorroborationRecord>, sqlx::Error> {
    sqlx::query_as::<_, CorroborationRecord>(
        r#"
        SELECT id::text AS id
        FROM jobsheets
        WHERE subcontractor_name = $1
          AND work_date = $2
        ORDER BY id
        "#
    )
    .bind(subcontractor)
    .bind(work_date)
    .fetch_all(pool)
    .await
}

/// 查询某分包商某日的场地签到
pub async fn find_yard_signins(
    pool: &PgPool,
    subcontractor: &str,
    work_date: Option<NaiveDate>,
) -> Result<Vec<CorroborationRecord>, sqlx::Error> {
    sqlx::query_as::<_, CorroborationRecord>(
        r#"
        SELECT id::text AS id
        FROM yard_signins
        WHERE subcontractor_name = $1
          AND work_date = $2
        ORDER BY id
        "#
    )
    .bind(subcontractor)
    .bind(work_date)
    .fetch_all(pool)
    .await
}

/// 在单个事务内写回发票行的对账字段
pub async fn update_lines(pool: &PgPool, invoice_id: i64, lines: &[InvoiceLine]) -> ReconResult<()> {
    if lines.is_empty() {
        return Ok(());
    }

    let start_time = Instant::now();
    let execute_result = tokio::time::timeout(
        COMMIT_TIMEOUT,
        update_lines_in_tx(pool, invoice_id, lines),
    )
    .await;

    // 超时或出错时事务被丢弃, 自动回滚
    match execute_result {
        Ok(Ok(())) => {
            tracing::info!(
                "✓ 发票 {} 写回 {} 行, 耗时: {:?}",
                invoice_id,
                lines.len(),
                start_time.elapsed()
            );
            Ok(())
        }
        Ok(Err(e)) => {
            tracing::error!(
                "✗ 发票 {} 写回失败, 耗时: {:?}, 错误: {:?}",
                invoice_id,
                start_time.elapsed(),
                e
            );
            Err(ReconError::Persistence(e))
        }
        Err(_) => {
            tracing::error!("✗ 发票 {} 写回超时 (>{:?})!", invoice_id, COMMIT_TIMEOUT);
            Err(ReconError::CommitTimeout {
                invoice_id,
                timeout: COMMIT_TIMEOUT,
            })
        }
    }
}

async fn update_lines_in_tx(
    pool: &PgPool,
    invoice_id: i64,
    lines: &[InvoiceLine],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for line in lines {
        let result = sqlx::query(
            r#"
            UPDATE invoice_lines
            SET match_status = $1,
                match_score = $2,
                match_notes = $3,
                jobsheet_id = $4,
                yard_record_id = $5
            WHERE id = $6 AND invoice_id = $7
            "#
        )
        .bind(line.match_status.as_str())
        .bind(line.match_score)
        .bind(&line.match_notes)
        .bind(&line.jobsheet_id)
        .bind(&line.yard_record_id)
        .bind(line.id)
        .bind(invoice_id)
        .execute(&mut *tx)
        .await?;

        // 行不存在或不属于该发票: 放弃整个事务
        if result.rows_affected() != 1 {
            tracing::error!(
                "✗ 发票 {} 行 {} 更新了 {} 行, 回滚",
                invoice_id,
                line.id,
                result.rows_affected()
            );
            return Err(sqlx::Error::RowNotFound);
        }
    }
    tx.commit().await
}
