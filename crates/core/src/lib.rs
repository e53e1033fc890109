// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod numbering;
mod plan;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use numbering::{MAX_ALLOCATION_ATTEMPTS, next_sequential_number};
pub use plan::{AllocationPlan, plan_allocation, plan_batch};
