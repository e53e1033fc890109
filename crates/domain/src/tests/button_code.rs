// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ButtonCode, DomainError, SequentialNumber, ShortCode};

#[test]
fn test_sequential_number_accepts_one() {
    let number = SequentialNumber::new(1).unwrap();
    assert_eq!(number.value(), 1);
}

#[test]
fn test_sequential_number_rejects_zero() {
    let result = SequentialNumber::new(0);
    assert!(matches!(
        result,
        Err(DomainError::InvalidSequentialNumber { value: 0 })
    ));
}

#[test]
fn test_button_code_zero_pads_to_two_digits() {
    let short_code: ShortCode = ShortCode::new("DRK").unwrap();
    let number = SequentialNumber::new(7).unwrap();

    let code: ButtonCode = ButtonCode::compose(&short_code, number);
    assert_eq!(code.value(), "DRK07");
}

#[test]
fn test_button_code_does_not_truncate_three_digits() {
    let short_code: ShortCode = ShortCode::new("DRK").unwrap();
    let number = SequentialNumber::new(123).unwrap();

    let code: ButtonCode = ButtonCode::compose(&short_code, number);
    assert_eq!(code.value(), "DRK123");
}

#[test]
fn test_button_code_single_digit_is_padded() {
    let short_code: ShortCode = ShortCode::new("KH").unwrap();
    let number = SequentialNumber::new(1).unwrap();

    let code: ButtonCode = ButtonCode::compose(&short_code, number);
    assert_eq!(code.value(), "KH01");
}

#[test]
fn test_button_code_two_digits_unpadded() {
    let short_code: ShortCode = ShortCode::new("UKF").unwrap();
    let number = SequentialNumber::new(42).unwrap();

    let code: ButtonCode = ButtonCode::compose(&short_code, number);
    assert_eq!(code.value(), "UKF42");
}

#[test]
fn test_button_code_roundtrips_through_stored_form() {
    let short_code: ShortCode = ShortCode::new("DRK").unwrap();
    let number = SequentialNumber::new(9).unwrap();
    let code: ButtonCode = ButtonCode::compose(&short_code, number);

    let stored: ButtonCode = ButtonCode::from_stored(code.value().to_owned());
    assert_eq!(stored, code);
}

#[test]
fn test_short_code_rejects_empty() {
    let result = ShortCode::new("");
    assert!(matches!(result, Err(DomainError::InvalidShortCode(_))));
}

#[test]
fn test_short_code_rejects_digits() {
    let result = ShortCode::new("DRK1");
    assert!(matches!(result, Err(DomainError::InvalidShortCode(_))));
}

#[test]
fn test_short_code_rejects_whitespace() {
    let result = ShortCode::new("DR K");
    assert!(matches!(result, Err(DomainError::InvalidShortCode(_))));
}

#[test]
fn test_short_code_rejects_more_than_ten_characters() {
    let result = ShortCode::new("ABCDEFGHIJK");
    assert!(matches!(result, Err(DomainError::InvalidShortCode(_))));
}

#[test]
fn test_short_code_accepts_ten_characters() {
    let code = ShortCode::new("ABCDEFGHIJ").unwrap();
    assert_eq!(code.value(), "ABCDEFGHIJ");
}

#[test]
fn test_short_code_preserves_case() {
    // Codes are printed on badges exactly as entered.
    let code = ShortCode::new("DrK").unwrap();
    assert_eq!(code.value(), "DrK");
}
