// SPDX-License-Identifier: Apache-2.0

//! Allocation-free number to text conversion for the writer.

use core::fmt::Write;

/// Longest `i32` text: `-2147483648`.
pub const I32_MAX_LEN: usize = 11;
/// Longest `i64` text: `-9223372036854775808`.
pub const I64_MAX_LEN: usize = 20;
/// Room for any shortest round-trip `f64` text plus a `.0` suffix.
pub const F64_MAX_LEN: usize = 32;

const DIGIT_PAIRS: &[u8; 200] = b"\
    0001020304050607080910111213141516171819\
    2021222324252627282930313233343536373839\
    4041424344454647484950515253545556575859\
    6061626364656667686970717273747576777879\
    8081828384858687888990919293949596979899";

const POWERS_OF_10_U32: [u32; 10] = [
    0,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

const POWERS_OF_10_U64: [u64; 20] = [
    0,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

// log10(2) ~= 1233 / 4096, so bit length * 1233 >> 12 is the digit count or one less.
fn count_digits_u32(n: u32) -> usize {
    let t = ((32 - (n | 1).leading_zeros()) * 1233) >> 12;
    (t - u32::from(n < POWERS_OF_10_U32[t as usize]) + 1) as usize
}

fn count_digits_u64(n: u64) -> usize {
    let t = ((64 - (n | 1).leading_zeros()) * 1233) >> 12;
    (t - u32::from(n < POWERS_OF_10_U64[t as usize]) + 1) as usize
}

macro_rules! define_unsigned_writer {
    ($fn_name:ident, $int_ty:ty, $count:ident) => {
        /// Writes the digits of `val` to the front of `buf`, two at a time,
        /// and returns how many were written.
        fn $fn_name(mut val: $int_ty, buf: &mut [u8]) -> usize {
            let count = $count(val);
            let mut next = count - 1;
            while val >= 100 {
                let i = ((val % 100) * 2) as usize;
                val /= 100;
                buf[next] = DIGIT_PAIRS[i + 1];
                buf[next - 1] = DIGIT_PAIRS[i];
                next -= 2;
            }
            if val < 10 {
                buf[next] = b'0' + val as u8;
            } else {
                let i = (val * 2) as usize;
                buf[next] = DIGIT_PAIRS[i + 1];
                buf[next - 1] = DIGIT_PAIRS[i];
            }
            count
        }
    };
}

define_unsigned_writer!(write_u32, u32, count_digits_u32);
define_unsigned_writer!(write_u64, u64, count_digits_u64);

pub fn format_i32(val: i32, buf: &mut [u8; I32_MAX_LEN]) -> &[u8] {
    let sign = usize::from(val < 0);
    if val < 0 {
        buf[0] = b'-';
    }
    let len = sign + write_u32(val.unsigned_abs(), &mut buf[sign..]);
    &buf[..len]
}

pub fn format_i64(val: i64, buf: &mut [u8; I64_MAX_LEN]) -> &[u8] {
    let sign = usize::from(val < 0);
    if val < 0 {
        buf[0] = b'-';
    }
    let len = sign + write_u64(val.unsigned_abs(), &mut buf[sign..]);
    &buf[..len]
}

struct StackBuf<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl Write for StackBuf<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let end = self.len + s.len();
        let dst = self.buf.get_mut(self.len..end).ok_or(core::fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// Formats a double so that parsing the text back yields a double again.
///
/// Finite values use the shortest text that round-trips (at most 17
/// significant digits). Text without a fraction or exponent gets a `.0`
/// suffix. Infinities and NaN come out as `Infinity`, `-Infinity` and `NaN`.
pub fn format_f64(val: f64, buf: &mut [u8; F64_MAX_LEN]) -> &[u8] {
    if val.is_nan() {
        return b"NaN";
    }
    if val.is_infinite() {
        return if val > 0.0 { b"Infinity" } else { b"-Infinity" };
    }

    let mut out = StackBuf {
        buf: &mut buf[..],
        len: 0,
    };
    // Shortest round-trip text is at most 24 bytes, well inside the buffer
    if write!(out, "{val:?}").is_err() {
        return b"NaN";
    }
    let mut len = out.len;
    if !buf[..len].iter().any(|&b| matches!(b, b'.' | b'e' | b'E')) {
        buf[len] = b'.';
        buf[len + 1] = b'0';
        len += 2;
    }
    &buf[..len]
}
