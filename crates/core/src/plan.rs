// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::numbering::next_sequential_number;
use drill_assign_domain::{ButtonCode, DomainError, SequentialNumber, ShortCode};

/// The numbering decision for one assignment: the sequence number to issue
/// and the button code composed from it.
///
/// Plans are computed inside the store's atomic unit of work, after the
/// watermark and live maximum have been read under the pair-scoped lock,
/// and are then written verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    /// The sequence number to issue.
    pub sequential_number: SequentialNumber,
    /// The button code to issue.
    pub button_number: ButtonCode,
}

/// Plans a single allocation for a `(scenario, organization)` pair.
///
/// # Arguments
///
/// * `short_code` - The organization's short code
/// * `watermark` - The pair's persisted watermark, 0 if none
/// * `live_max` - The maximum `sequential_number` over live rows, 0 if none
///
/// # Errors
///
/// Returns `CoreError::SequenceExhausted` if the number space overflows.
pub fn plan_allocation(
    short_code: &ShortCode,
    watermark: u32,
    live_max: u32,
) -> Result<AllocationPlan, CoreError> {
    let sequential_number: SequentialNumber = next_sequential_number(watermark, live_max)?;
    Ok(AllocationPlan {
        sequential_number,
        button_number: ButtonCode::compose(short_code, sequential_number),
    })
}

/// Plans a contiguous, gap-free run of allocations for a batch.
///
/// The run starts one past the highest issued number and assigns consecutive
/// numbers in input order. The whole run is committed atomically by the
/// store or not at all; planning never interleaves with other writers
/// because it happens under the same pair-scoped lock as the write.
///
/// # Arguments
///
/// * `short_code` - The organization's short code
/// * `watermark` - The pair's persisted watermark, 0 if none
/// * `live_max` - The maximum `sequential_number` over live rows, 0 if none
/// * `count` - The number of assignments in the batch
///
/// # Errors
///
/// Returns `DomainError::EmptyBatch` (as a domain violation) for an empty
/// batch, or `CoreError::SequenceExhausted` if the run would overflow the
/// number space.
pub fn plan_batch(
    short_code: &ShortCode,
    watermark: u32,
    live_max: u32,
    count: usize,
) -> Result<Vec<AllocationPlan>, CoreError> {
    if count == 0 {
        return Err(CoreError::DomainViolation(DomainError::EmptyBatch));
    }

    let mut plans: Vec<AllocationPlan> = Vec::with_capacity(count);
    let mut last_issued: u32 = watermark.max(live_max);
    for _ in 0..count {
        let plan: AllocationPlan = plan_allocation(short_code, last_issued, 0)?;
        last_issued = plan.sequential_number.value();
        plans.push(plan);
    }
    Ok(plans)
}
