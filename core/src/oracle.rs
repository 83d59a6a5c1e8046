//! Planning oracle abstraction and its output contract.
//!
//! The itinerary planner delegates candidate selection to an external
//! planning capability (a generative model). The oracle is unreliable by
//! contract: it may be unreachable, and when it answers it may wrap the
//! plan in markdown, truncate it, or invent fields. This module defines
//! the trait the planner calls and the strict draft shape its text output
//! must parse into before it is trusted.
//!
//! # Dyn Compatibility
//!
//! `PlanningOracle` uses an explicit `Pin<Box<dyn Future>>` return instead
//! of `async fn` so it can be held as `Arc<dyn PlanningOracle>`.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by oracle calls.
type OracleFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, OracleError>> + Send + 'a>>;

/// Errors from the oracle transport layer.
///
/// These are *delivery* failures, distinct from unusable output: a prompt
/// that reaches the model but comes back unparsable is handled by the
/// planner's fallback plan, not by this error type.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The oracle could not be reached (network failure, timeout, missing
    /// credentials).
    #[error("planning oracle unavailable: {0}")]
    Unavailable(String),

    /// The oracle refused the request.
    #[error("planning oracle rejected the request (status {status}): {message}")]
    Rejected {
        /// Upstream status code
        status: u16,
        /// Upstream error message
        message: String,
    },
}

/// External planning capability: prompt in, free-form text out.
///
/// Implementations must not interpret the plan; parsing and validation
/// belong to the planner, because the output is untrusted either way.
pub trait PlanningOracle: Send + Sync {
    /// Submit a rendered planning prompt and return the raw text response.
    fn propose(&self, prompt: String) -> OracleFuture<'_, String>;
}

// ============================================================================
// Draft plan wire contract
// ============================================================================

/// The JSON shape the oracle is instructed to produce.
///
/// Field names mirror the instructed contract exactly (`usedBudget`,
/// `budgetAdjusted`, `eventName`, `totalCost`); anything that fails to
/// deserialize into this shape is a malformed plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDraft {
    /// Success flag; must be `true` for the draft to be usable
    pub success: bool,
    /// The budget the oracle planned against
    pub used_budget: f64,
    /// Whether the oracle raised the requested budget to the minimum
    pub budget_adjusted: bool,
    /// Selected room reference
    pub room: DraftRoom,
    /// One selected event per day of the stay
    pub events: Vec<DraftEvent>,
}

/// Room reference inside a draft plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DraftRoom {
    /// Store id of the selected room, if the oracle echoed one
    #[serde(default)]
    pub id: Option<String>,
    /// Room type as stated by the oracle
    #[serde(rename = "type", default)]
    pub room_type: Option<String>,
    /// Total room cost over the stay
    #[serde(rename = "totalCost", default)]
    pub total_cost: f64,
}

/// Day-indexed event reference inside a draft plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEvent {
    /// 1-based day of the stay
    pub day: u32,
    /// Event name as stated by the oracle
    pub event_name: String,
    /// Store id of the event, if the oracle echoed one
    #[serde(default)]
    pub id: Option<String>,
    /// Date string as stated by the oracle
    #[serde(default)]
    pub date: Option<String>,
    /// Per-event cost
    #[serde(default)]
    pub cost: f64,
}

impl PlanDraft {
    /// Parse a draft plan out of raw oracle text.
    ///
    /// Models routinely wrap JSON in markdown fences or prepend prose, so
    /// the outermost `{ … }` object is extracted first. Returns `None`
    /// when no object can be found, when it is not valid JSON of this
    /// shape, or when the structural checks fail (`success` false, zero
    /// used budget).
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        let json = extract_json_object(text)?;
        let draft: Self = serde_json::from_str(json).ok()?;
        if !draft.success || draft.used_budget <= 0.0 {
            return None;
        }
        Some(draft)
    }
}

/// Extract the outermost `{ … }` span from free-form text.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
