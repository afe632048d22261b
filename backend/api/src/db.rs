//! Database layer: migrations, ledger writes, request lifecycle and reporting.

use std::str::FromStr;

use chrono::Utc;
use pc_funding::{
    ConfirmationStatus, Decision, DonationKind, FundingError, FundingSnapshot, LedgerEntry,
    NewDonation, NewPcRequest, PcTier, RequestId, YearlyTarget, BASIC_PC_PRICE,
    DEFAULT_CURRENCY,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use crate::errors::{ApiError, Result};
use crate::models::{
    DonationRecord, DonationTotals, ImpactTotals, InventoryCounts, InventoryRecord,
    InventoryStatus, OverviewStats, PcRequestRecord, StatusCounts,
};

const DONATION_COLUMNS: &str = "id, full_name, email, amount, currency, kind, pc_tier, \
     percentage, transaction_id, payment_method, status, created_at";

const PC_REQUEST_COLUMNS: &str = "id, candidate_id, pc_tier, justification, future_project, \
     status, assigned_pc_id, created_at, decided_at";

const INVENTORY_COLUMNS: &str = "id, pc_tier, serial_number, status, created_at";

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let options = SqliteConnectOptions::from_str(&url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

fn now() -> i64 {
    Utc::now().timestamp()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// A stored value that no longer parses is corruption, not bad input.
fn corrupt(err: FundingError) -> ApiError {
    ApiError::Database(sqlx::Error::Decode(Box::new(err)))
}

// ─────────────────────────────────────────────────────────
// Donation ledger
// ─────────────────────────────────────────────────────────

/// Append a validated donation. A transaction id that was already recorded
/// is rejected by the unique index; nothing is written.
pub async fn insert_donation(pool: &SqlitePool, donation: &NewDonation) -> Result<DonationRecord> {
    let sql = format!(
        r#"
        INSERT INTO donations
            (full_name, email, amount, currency, kind, pc_tier, percentage,
             transaction_id, payment_method, status, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        RETURNING {DONATION_COLUMNS}
        "#
    );

    sqlx::query_as::<_, DonationRecord>(&sql)
        .bind(&donation.contributor.full_name)
        .bind(&donation.contributor.email)
        .bind(donation.amount)
        .bind(&donation.currency)
        .bind(donation.kind.as_str())
        .bind(donation.tier.map(|t| t.as_str()))
        .bind(donation.percentage)
        .bind(&donation.transaction_id)
        .bind(&donation.payment_method)
        .bind(donation.status.as_str())
        .bind(now())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::from(FundingError::DuplicateTransaction(
                    donation.transaction_id.clone(),
                ))
            } else {
                ApiError::from(e)
            }
        })
}

/// Fetch all donations, newest first.
pub async fn list_donations(pool: &SqlitePool) -> Result<Vec<DonationRecord>> {
    let sql = format!("SELECT {DONATION_COLUMNS} FROM donations ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, DonationRecord>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Read the `(kind, amount)` pair of every donation in one statement.
pub async fn ledger_entries(pool: &SqlitePool) -> Result<Vec<LedgerEntry>> {
    let rows: Vec<(String, i64)> = sqlx::query_as("SELECT kind, amount FROM donations")
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|(kind, amount)| -> Result<LedgerEntry> {
            let kind = DonationKind::from_str(&kind).map_err(corrupt)?;
            Ok(LedgerEntry { kind, amount })
        })
        .collect()
}

/// Compute the public funding figures from the current ledger.
pub async fn funding_snapshot(pool: &SqlitePool, target: YearlyTarget) -> Result<FundingSnapshot> {
    let entries = ledger_entries(pool).await?;
    Ok(FundingSnapshot::compute(&entries, target, BASIC_PC_PRICE))
}

// ─────────────────────────────────────────────────────────
// PC request lifecycle
// ─────────────────────────────────────────────────────────

/// Insert a new `PENDING` request. The unique index on `candidate_id` turns
/// a second submission, concurrent or not, into `DuplicateRequest`.
pub async fn insert_pc_request(
    pool: &SqlitePool,
    request: &NewPcRequest,
) -> Result<PcRequestRecord> {
    let sql = format!(
        r#"
        INSERT INTO pc_requests
            (candidate_id, pc_tier, justification, future_project, status, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING {PC_REQUEST_COLUMNS}
        "#
    );

    sqlx::query_as::<_, PcRequestRecord>(&sql)
        .bind(request.candidate_id)
        .bind(request.tier.as_str())
        .bind(&request.justification)
        .bind(&request.future_project)
        .bind(ConfirmationStatus::Pending.as_str())
        .bind(now())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::from(FundingError::DuplicateRequest(request.candidate_id))
            } else {
                ApiError::from(e)
            }
        })
}

/// Record an administrator's decision.
///
/// The status check and the write are one conditional `UPDATE`; of two racing
/// decisions exactly one matches a `PENDING` row. When nothing matched, the
/// row is re-read only to tell "absent" from "already decided".
pub async fn decide_pc_request(
    pool: &SqlitePool,
    id: RequestId,
    decision: Decision,
) -> Result<PcRequestRecord> {
    let sql = format!(
        r#"
        UPDATE pc_requests
        SET    status = ?1, decided_at = ?2
        WHERE  id = ?3 AND status = ?4
        RETURNING {PC_REQUEST_COLUMNS}
        "#
    );

    loop {
        let updated = sqlx::query_as::<_, PcRequestRecord>(&sql)
            .bind(decision.as_str())
            .bind(now())
            .bind(id)
            .bind(ConfirmationStatus::Pending.as_str())
            .fetch_optional(pool)
            .await?;

        if let Some(row) = updated {
            return Ok(row);
        }

        let current = get_pc_request(pool, id)
            .await?
            .ok_or(FundingError::NotFound(id))?;
        let status = ConfirmationStatus::from_str(&current.status).map_err(corrupt)?;
        if let Some(err) = refused_decision(id, status, decision) {
            return Err(err);
        }
    }
}

/// The error for a decision whose conditional update matched nothing, or
/// `None` when the re-read row is still `PENDING` and the update can be retried.
fn refused_decision(
    id: RequestId,
    status: ConfirmationStatus,
    decision: Decision,
) -> Option<ApiError> {
    status.apply(id, decision).err().map(ApiError::from)
}

pub async fn get_pc_request(pool: &SqlitePool, id: RequestId) -> Result<Option<PcRequestRecord>> {
    let sql = format!("SELECT {PC_REQUEST_COLUMNS} FROM pc_requests WHERE id = ?1");
    let row = sqlx::query_as::<_, PcRequestRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn get_pc_request_for_candidate(
    pool: &SqlitePool,
    candidate_id: i64,
) -> Result<Option<PcRequestRecord>> {
    let sql = format!("SELECT {PC_REQUEST_COLUMNS} FROM pc_requests WHERE candidate_id = ?1");
    let row = sqlx::query_as::<_, PcRequestRecord>(&sql)
        .bind(candidate_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Fetch all requests, newest first.
pub async fn list_pc_requests(pool: &SqlitePool) -> Result<Vec<PcRequestRecord>> {
    let sql = format!(
        "SELECT {PC_REQUEST_COLUMNS} FROM pc_requests ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, PcRequestRecord>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

// ─────────────────────────────────────────────────────────
// Inventory
// ─────────────────────────────────────────────────────────

pub async fn insert_inventory_item(
    pool: &SqlitePool,
    tier: PcTier,
    serial_number: Option<&str>,
) -> Result<InventoryRecord> {
    let sql = format!(
        r#"
        INSERT INTO inventory (pc_tier, serial_number, status, created_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING {INVENTORY_COLUMNS}
        "#
    );

    sqlx::query_as::<_, InventoryRecord>(&sql)
        .bind(tier.as_str())
        .bind(serial_number)
        .bind(InventoryStatus::InStock.as_str())
        .bind(now())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::BadRequest("serial number already registered".to_string())
            } else {
                ApiError::from(e)
            }
        })
}

pub async fn get_inventory_item(pool: &SqlitePool, id: i64) -> Result<Option<InventoryRecord>> {
    let sql = format!("SELECT {INVENTORY_COLUMNS} FROM inventory WHERE id = ?1");
    let row = sqlx::query_as::<_, InventoryRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_inventory(pool: &SqlitePool) -> Result<Vec<InventoryRecord>> {
    let sql = format!("SELECT {INVENTORY_COLUMNS} FROM inventory ORDER BY id ASC");
    let rows = sqlx::query_as::<_, InventoryRecord>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

// ─────────────────────────────────────────────────────────
// Reporting
// ─────────────────────────────────────────────────────────

async fn count_by_status(pool: &SqlitePool, table: &str) -> Result<Vec<(String, i64)>> {
    let sql = format!("SELECT status, COUNT(*) FROM {table} GROUP BY status");
    let rows = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn pc_request_counts(pool: &SqlitePool) -> Result<StatusCounts> {
    let mut counts = StatusCounts::default();
    for (status, n) in count_by_status(pool, "pc_requests").await? {
        counts.total += n;
        match ConfirmationStatus::from_str(&status).map_err(corrupt)? {
            ConfirmationStatus::Pending => counts.pending = n,
            ConfirmationStatus::Accepted => counts.accepted = n,
            ConfirmationStatus::Rejected => counts.rejected = n,
        }
    }
    Ok(counts)
}

pub async fn inventory_counts(pool: &SqlitePool) -> Result<InventoryCounts> {
    let mut counts = InventoryCounts::default();
    for (status, n) in count_by_status(pool, "inventory").await? {
        counts.total += n;
        if status == InventoryStatus::InStock.as_str() {
            counts.in_stock = n;
        } else if status == InventoryStatus::Delivered.as_str() {
            counts.delivered = n;
        }
    }
    Ok(counts)
}

/// Administrator dashboard figures. Uses the same snapshot as the public
/// statistics so both report the same number of financed PCs.
pub async fn overview_stats(pool: &SqlitePool, target: YearlyTarget) -> Result<OverviewStats> {
    let snapshot = funding_snapshot(pool, target).await?;
    Ok(OverviewStats {
        donations: DonationTotals {
            total_raised: snapshot.total_raised,
            currency: DEFAULT_CURRENCY,
        },
        pc_requests: pc_request_counts(pool).await?,
        inventory: inventory_counts(pool).await?,
        impact: ImpactTotals {
            total_pc_financed: snapshot.total_pc_financed,
        },
    })
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
