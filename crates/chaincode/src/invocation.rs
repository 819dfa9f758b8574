//! # Invocation Boundary
//!
//! String-argument dispatch for the hosting platform: one request names a
//! contract function and carries its arguments as strings, exactly as the
//! peer runtime delivers them. Argument parsing failures and unknown
//! function names are domain violations at this boundary; everything else is
//! delegated to the [`BloodLedgerApi`] implementation.

use crate::domain::entities::InvocationContext;
use crate::domain::value_objects::TestResult;
use crate::errors::{rules, ContractError};
use crate::ports::inbound::BloodLedgerApi;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

// =============================================================================
// REQUEST
// =============================================================================

/// One invocation as delivered by the host: function name plus positional
/// string arguments.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvokeRequest {
    /// Contract function name, e.g. `"RecordDonation"`.
    pub function: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

impl InvokeRequest {
    /// Builds a request from a function name and string-ish arguments.
    pub fn new<I, T>(function: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn arg(&self, index: usize) -> Result<&str, ContractError> {
        self.args.get(index).map(String::as_str).ok_or_else(|| {
            ContractError::violation(
                rules::BAD_ARGUMENT,
                format!("{} requires argument {}", self.function, index + 1),
            )
        })
    }

    fn int_arg(&self, index: usize) -> Result<u32, ContractError> {
        let raw = self.arg(index)?;
        raw.parse().map_err(|_| {
            ContractError::violation(
                rules::BAD_ARGUMENT,
                format!(
                    "{} argument {} must be a non-negative integer, got {raw:?}",
                    self.function,
                    index + 1
                ),
            )
        })
    }

    /// Optional trailing argument; absent or empty means none.
    fn optional_arg(&self, index: usize) -> Option<&str> {
        self.args
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

fn respond<T: Serialize>(value: &T) -> Result<Value, ContractError> {
    serde_json::to_value(value).map_err(|e| ContractError::corruption("response", e))
}

/// Dispatches one invocation against the ledger API.
///
/// Mutations resolve to JSON `null`; queries resolve to the JSON encoding
/// of the matching record(s).
pub async fn dispatch<A: BloodLedgerApi>(
    api: &A,
    ctx: &InvocationContext,
    request: &InvokeRequest,
) -> Result<Value, ContractError> {
    debug!(function = %request.function, args = request.args.len(), "dispatching invocation");
    match request.function.as_str() {
        "RegisterDonor" => {
            api.register_donor(ctx, request.arg(0)?, request.arg(1)?, request.arg(2)?)
                .await?;
            Ok(Value::Null)
        }
        "RegisterAcceptor" => {
            api.register_acceptor(
                ctx,
                request.arg(0)?,
                request.arg(1)?,
                request.arg(2)?,
                request.arg(3)?,
            )
            .await?;
            Ok(Value::Null)
        }
        "RecordDonation" => {
            api.record_donation(
                ctx,
                request.arg(0)?,
                request.arg(1)?,
                request.arg(2)?,
                request.int_arg(3)?,
                request.arg(4)?,
                request.optional_arg(5),
            )
            .await?;
            Ok(Value::Null)
        }
        "TestBlood" => {
            api.test_blood(ctx, request.arg(0)?, TestResult::new(request.arg(1)?))
                .await?;
            Ok(Value::Null)
        }
        "AcceptBlood" => {
            api.accept_blood(ctx, request.arg(0)?, request.arg(1)?, request.int_arg(2)?)
                .await?;
            Ok(Value::Null)
        }
        "UseBlood" => {
            api.use_blood(ctx, request.arg(0)?).await?;
            Ok(Value::Null)
        }
        "QueryDonor" => respond(&api.query_donor(ctx, request.arg(0)?).await?),
        "QueryAcceptor" => respond(&api.query_acceptor(ctx, request.arg(0)?).await?),
        "QueryBloodUnit" => respond(&api.query_blood_unit(ctx, request.arg(0)?).await?),
        "QueryBloodUnitsByType" => {
            respond(&api.query_blood_units_by_type(ctx, request.arg(0)?).await?)
        }
        "QueryDonationHistory" => {
            respond(&api.query_donation_history(ctx, request.arg(0)?).await?)
        }
        "QueryUsageHistory" => respond(&api.query_usage_history(ctx, request.arg(0)?).await?),
        other => Err(ContractError::violation(
            rules::UNKNOWN_FUNCTION,
            format!("no contract function named {other:?}"),
        )),
    }
}

// =============================================================================
// TESTS
// =============================================================================
