// SPDX-License-Identifier: Apache-2.0

// Base-10 integer conversion straight from the input slice, no allocation.

/// Why a digit run could not be converted.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum IntError {
    /// No digits after the optional sign.
    NoDigits,
    /// A byte that is not a base-10 digit.
    InvalidDigit,
    /// The value does not fit the target type.
    Overflow,
}

macro_rules! define_int_parser {
    ($fn_name:ident, $int_ty:ty) => {
        /// Converts an optionally `-`-signed run of ASCII digits to a(n) `
        #[doc = stringify!($int_ty)]
        /// `.
        ///
        /// Accumulates negatively for negative input so that the type's
        /// minimum converts without overflowing.
        pub fn $fn_name(src: &[u8]) -> Result<$int_ty, IntError> {
            let (negative, digits) = match src {
                [b'-', rest @ ..] => (true, rest),
                _ => (false, src),
            };
            if digits.is_empty() {
                return Err(IntError::NoDigits);
            }

            let mut acc: $int_ty = 0;
            for &byte in digits {
                if !byte.is_ascii_digit() {
                    return Err(IntError::InvalidDigit);
                }
                let digit = (byte - b'0') as $int_ty;
                acc = acc.checked_mul(10).ok_or(IntError::Overflow)?;
                acc = if negative {
                    acc.checked_sub(digit)
                } else {
                    acc.checked_add(digit)
                }
                .ok_or(IntError::Overflow)?;
            }
            Ok(acc)
        }
    };
}

define_int_parser!(from_ascii_i32, i32);
define_int_parser!(from_ascii_i64, i64);
