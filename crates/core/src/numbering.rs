// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use drill_assign_domain::SequentialNumber;

/// Bound on allocation retries after store-level collision detection.
///
/// A uniqueness violation during an allocation unit of work means another
/// writer committed the same number first. The allocator re-reads and
/// retries up to this bound before surfacing contention to the caller.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 5;

/// Computes the next sequence number for a `(scenario, organization)` pair.
///
/// The next number is one past the highest number ever issued for the pair.
/// Two observations feed in: the persisted watermark (highest ever issued,
/// survives deletions) and the maximum over live assignment rows (self-heals
/// stores that predate the watermark). Absent values are 0.
///
/// # Arguments
///
/// * `watermark` - The pair's persisted watermark, 0 if none
/// * `live_max` - The maximum `sequential_number` over live rows, 0 if none
///
/// # Errors
///
/// Returns `CoreError::SequenceExhausted` if the number space overflows.
pub fn next_sequential_number(watermark: u32, live_max: u32) -> Result<SequentialNumber, CoreError> {
    let last_issued: u32 = watermark.max(live_max);
    let next: u32 = last_issued
        .checked_add(1)
        .ok_or(CoreError::SequenceExhausted { last_issued })?;
    Ok(SequentialNumber::new(next)?)
}
