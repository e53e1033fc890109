// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AllocationPlan, CoreError, plan_allocation, plan_batch};
use drill_assign_domain::{DomainError, ShortCode};

fn drk() -> ShortCode {
    ShortCode::new("DRK").unwrap()
}

#[test]
fn test_single_plan_composes_button_code() {
    let plan: AllocationPlan = plan_allocation(&drk(), 6, 0).unwrap();

    assert_eq!(plan.sequential_number.value(), 7);
    assert_eq!(plan.button_number.value(), "DRK07");
}

#[test]
fn test_batch_plan_is_contiguous_and_gap_free() {
    let plans = plan_batch(&drk(), 0, 0, 5).unwrap();

    let numbers: Vec<u32> = plans.iter().map(|p| p.sequential_number.value()).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

    let codes: Vec<&str> = plans.iter().map(|p| p.button_number.value()).collect();
    assert_eq!(codes, vec!["DRK01", "DRK02", "DRK03", "DRK04", "DRK05"]);
}

#[test]
fn test_batch_plan_continues_after_existing_numbers() {
    let plans = plan_batch(&drk(), 5, 3, 2).unwrap();

    let numbers: Vec<u32> = plans.iter().map(|p| p.sequential_number.value()).collect();
    assert_eq!(numbers, vec![6, 7]);
}

#[test]
fn test_empty_batch_is_rejected() {
    let result = plan_batch(&drk(), 0, 0, 0);
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::EmptyBatch))
    ));
}

#[test]
fn test_batch_overflow_is_reported() {
    let result = plan_batch(&drk(), u32::MAX - 1, 0, 3);
    assert!(matches!(result, Err(CoreError::SequenceExhausted { .. })));
}

#[test]
fn test_three_digit_numbers_are_not_truncated() {
    let plan: AllocationPlan = plan_allocation(&drk(), 122, 0).unwrap();
    assert_eq!(plan.button_number.value(), "DRK123");
}
