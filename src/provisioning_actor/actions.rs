//! Run-state transitions of a [`MerchantProvisioning`](crate::model::MerchantProvisioning) row.

use crate::model::{ErrorLog, ProvisioningStep};

#[derive(Debug, Clone)]
pub enum ProvisioningAction {
    /// Claim the run: PENDING or FAILED -> IN_PROGRESS. IN_PROGRESS and COMPLETED are
    /// refused, which makes this the guard against two concurrent runs for one store.
    BeginRun,
    /// Persist a finished step: current step, checkpoint percent and milestone flag.
    RecordCheckpoint(ProvisioningStep),
    /// IN_PROGRESS -> COMPLETED at 100%.
    Complete,
    /// IN_PROGRESS -> FAILED with the captured error.
    Fail(ErrorLog),
    /// FAILED -> PENDING, counting the retry.
    ResetForRetry,
}
