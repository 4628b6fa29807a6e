// SPDX-License-Identifier: Apache-2.0

//! Error kind and position for malformed input, one test per case.

use duojson::{parse_error_string, parse_str, Document, ErrorKind, ParseError};

fn parse_err(json: &str) -> ParseError {
    let mut doc = Document::new();
    match parse_str(json, &mut doc) {
        Ok(()) => panic!("{json:?} should not parse, got {:?}", *doc),
        Err(e) => e,
    }
}

macro_rules! error_tests {
    ($($name:ident: $json:expr => $kind:ident @ $pos:expr),* $(,)?) => {
        $(
            paste::paste! {
                #[test_log::test]
                fn [<test_error_ $name>]() {
                    let err = parse_err($json);
                    assert_eq!(err.kind(), ErrorKind::$kind, "input {:?}", $json);
                    assert_eq!(err.position(), $pos, "input {:?}: {}", $json, err);
                }
            }
        )*
    };
}

error_tests! {
    empty: "" => ExpectValue @ 0,
    only_whitespace: " \t\r\n" => ExpectValue @ 4,
    trailing_comma_array: "[1, 2,]" => BadValue @ 6,
    leading_zero: "01" => BadValue @ 1,
    bare_minus: "-x" => BadValue @ 1,
    missing_fraction: "3.e1" => BadValue @ 2,
    missing_exponent: "3e" => BadValue @ 2,
    suffix_on_double: "1.5i64" => BadValue @ 3,
    unknown_suffix: "7i8" => BadValue @ 1,
    lowercase_nan: "nan" => BadValue @ 1,
    truncated_true: "tru" => BadValue @ 3,
    int64_overflow: "9223372036854775808" => NumberTooBig @ 0,
    int32_suffix_overflow: "[2147483648i32]" => NumberTooBig @ 1,
    double_overflow: "-1e309" => NumberTooBig @ 0,
    control_char: "\"a\x01\"" => BadStringChar @ 2,
    raw_newline: "\"a\nb\"" => BadStringChar @ 2,
    bad_escape: r#""\a""# => BadStringEscape @ 2,
    bad_hex: r#""\u00G0""# => BadUnicodeHex @ 5,
    lone_high_surrogate: r#""\uD800""# => BadUnicodeSurrogate @ 7,
    high_then_non_low: r#""\uD800A""# => BadUnicodeSurrogate @ 7,
    lone_low_surrogate: r#""\uDC00""# => BadUnicodeSurrogate @ 3,
    unterminated_string: r#""abc"# => MissQuotationMark @ 4,
    missing_array_comma: "[1 2]" => MissCommaOrSquareBracket @ 3,
    unclosed_array: "[1" => MissCommaOrSquareBracket @ 2,
    missing_key: "{1:2}" => MissKey @ 1,
    trailing_comma_object: r#"{"a":1,}"# => MissKey @ 7,
    missing_colon: r#"{"a" 1}"# => MissColon @ 5,
    missing_object_comma: r#"{"a":1 "b":2}"# => MissCommaOrCurlyBracket @ 7,
    wrong_close: r#"{"a":1]"# => MissCommaOrCurlyBracket @ 6,
    two_numbers: "1 2" => RootNotSingular @ 2,
    two_objects: "{} {}" => RootNotSingular @ 3,
    two_nulls: "null null" => RootNotSingular @ 5,
}

#[test_log::test]
fn test_every_kind_has_a_message() {
    let kinds = [
        (ErrorKind::Ok, "ok"),
        (ErrorKind::RootNotSingular, "root not singular"),
        (ErrorKind::BadValue, "bad value"),
        (ErrorKind::ExpectValue, "expect value"),
        (ErrorKind::NumberTooBig, "number too big"),
        (ErrorKind::BadStringChar, "bad character"),
        (ErrorKind::BadStringEscape, "bad escape"),
        (ErrorKind::BadUnicodeHex, "bad unicode hex"),
        (ErrorKind::BadUnicodeSurrogate, "bad unicode surrogate"),
        (ErrorKind::MissQuotationMark, "miss quotation mark"),
        (ErrorKind::MissCommaOrSquareBracket, "miss comma or square bracket"),
        (ErrorKind::MissKey, "miss key"),
        (ErrorKind::MissColon, "miss colon"),
        (ErrorKind::MissCommaOrCurlyBracket, "miss comma or curly bracket"),
        (ErrorKind::UserStopped, "user stopped parse"),
    ];
    for (kind, message) in kinds {
        assert_eq!(parse_error_string(kind), message);
        assert_eq!(kind.to_string(), message);
    }
}

#[test_log::test]
fn test_trailing_garbage_after_any_root() {
    for root in ["0", "-1.5", "\"s\"", "true", "null", "[]", "{}", "NaN", "[1,{\"a\":[]}]"] {
        let mut doc = Document::new();
        let padded = format!(" {root} \n");
        assert_eq!(doc.parse(&padded), Ok(()), "{padded:?}");

        for extra in ["x", "1", "[", "\"", "}"] {
            let json = format!("{padded}{extra}");
            assert_eq!(
                parse_err(&json).kind(),
                ErrorKind::RootNotSingular,
                "{json:?}"
            );
        }
    }
}
