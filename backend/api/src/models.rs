//! Database rows and request bodies.
//!
//! Rows keep the enum columns as plain strings, exactly as stored; the
//! `pc_funding` types parse them back where a rule needs the typed value.

use pc_funding::{Contributor, PooledDonation, TargetedDonation};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────
// Rows
// ─────────────────────────────────────────────────────────

/// A donation as stored in / read from the `donations` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub kind: String,
    #[serde(rename = "pcType")]
    pub pc_tier: Option<String>,
    pub percentage: Option<i64>,
    pub transaction_id: String,
    pub payment_method: Option<String>,
    pub status: String,
    pub created_at: i64,
}

/// A PC request as stored in / read from the `pc_requests` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PcRequestRecord {
    pub id: i64,
    pub candidate_id: i64,
    #[serde(rename = "pcType")]
    pub pc_tier: String,
    #[serde(rename = "justificationText")]
    pub justification: Option<String>,
    pub future_project: String,
    pub status: String,
    pub assigned_pc_id: Option<i64>,
    pub created_at: i64,
    pub decided_at: Option<i64>,
}

/// A laptop held in stock.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub id: i64,
    #[serde(rename = "pcType")]
    pub pc_tier: String,
    pub serial_number: Option<String>,
    pub status: String,
    pub created_at: i64,
}

/// Allocation state of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryStatus {
    InStock,
    Delivered,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "IN_STOCK",
            Self::Delivered => "DELIVERED",
        }
    }
}

// ─────────────────────────────────────────────────────────
// Request bodies
// ─────────────────────────────────────────────────────────

/// `POST /api/donations/pc`
///
/// Every field is optional at the JSON level so that presence is reported
/// by the ledger rules rather than by the deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetedDonationBody {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub pc_type: Option<String>,
    pub percentage: Option<i64>,
    pub transaction_id: Option<String>,
    pub payment_method: Option<String>,
    pub currency: Option<String>,
}

impl From<TargetedDonationBody> for TargetedDonation {
    fn from(body: TargetedDonationBody) -> Self {
        TargetedDonation {
            contributor: Contributor {
                full_name: body.full_name,
                email: body.email,
            },
            tier: body.pc_type,
            percentage: body.percentage,
            transaction_id: body.transaction_id,
            payment_method: body.payment_method,
            currency: body.currency,
        }
    }
}

/// `POST /api/donations/common`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PooledDonationBody {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub amount: Option<i64>,
    pub transaction_id: Option<String>,
    pub payment_method: Option<String>,
    pub currency: Option<String>,
}

impl From<PooledDonationBody> for PooledDonation {
    fn from(body: PooledDonationBody) -> Self {
        PooledDonation {
            contributor: Contributor {
                full_name: body.full_name,
                email: body.email,
            },
            amount: body.amount,
            transaction_id: body.transaction_id,
            payment_method: body.payment_method,
            currency: body.currency,
        }
    }
}

/// `POST /api/pc-requests`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PcRequestBody {
    pub pc_type: Option<String>,
    pub future_project: Option<String>,
    pub justification_text: Option<String>,
}

/// `PATCH /api/pc-requests/:id/status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusBody {
    pub status: Option<String>,
}

/// `POST /api/inventory`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryBody {
    pub pc_type: Option<String>,
    pub serial_number: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

/// The caller's own request, with the laptop allocated to it if any.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyPcRequest {
    #[serde(flatten)]
    pub request: PcRequestRecord,
    pub assigned_pc: Option<InventoryRecord>,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub accepted: i64,
    pub rejected: i64,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCounts {
    pub total: i64,
    pub in_stock: i64,
    pub delivered: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationTotals {
    pub total_raised: i64,
    pub currency: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactTotals {
    pub total_pc_financed: f64,
}

/// `GET /api/admin/stats`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub donations: DonationTotals,
    pub pc_requests: StatusCounts,
    pub inventory: InventoryCounts,
    pub impact: ImpactTotals,
}
