// SPDX-License-Identifier: Apache-2.0

/// The kind of failure reported by the parser.
///
/// `Ok` is part of the taxonomy so that every kind has a canonical message,
/// but parse entry points report success as `Ok(())` and never return it as an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No error.
    Ok,
    /// Non-whitespace content follows the root value.
    RootNotSingular,
    /// A literal or number is malformed.
    BadValue,
    /// Input ended where a value was required.
    ExpectValue,
    /// A number does not fit its target type.
    NumberTooBig,
    /// A control character (or invalid UTF-8) inside a string.
    BadStringChar,
    /// Unknown character after a backslash.
    BadStringEscape,
    /// Non-hex digit inside `\uXXXX`.
    BadUnicodeHex,
    /// Unpaired or misordered UTF-16 surrogate.
    BadUnicodeSurrogate,
    /// String is not terminated.
    MissQuotationMark,
    /// Array element not followed by `,` or `]`.
    MissCommaOrSquareBracket,
    /// Object member does not start with a string key.
    MissKey,
    /// Object key not followed by `:`.
    MissColon,
    /// Object member not followed by `,` or `}`.
    MissCommaOrCurlyBracket,
    /// A handler method asked the parser to stop.
    UserStopped,
}

impl ErrorKind {
    /// The canonical message for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Ok => "ok",
            ErrorKind::RootNotSingular => "root not singular",
            ErrorKind::BadValue => "bad value",
            ErrorKind::ExpectValue => "expect value",
            ErrorKind::NumberTooBig => "number too big",
            ErrorKind::BadStringChar => "bad character",
            ErrorKind::BadStringEscape => "bad escape",
            ErrorKind::BadUnicodeHex => "bad unicode hex",
            ErrorKind::BadUnicodeSurrogate => "bad unicode surrogate",
            ErrorKind::MissQuotationMark => "miss quotation mark",
            ErrorKind::MissCommaOrSquareBracket => "miss comma or square bracket",
            ErrorKind::MissKey => "miss key",
            ErrorKind::MissColon => "miss colon",
            ErrorKind::MissCommaOrCurlyBracket => "miss comma or curly bracket",
            ErrorKind::UserStopped => "user stopped parse",
        }
    }
}

/// Maps an error kind to its canonical message.
pub const fn parse_error_string(kind: ErrorKind) -> &'static str {
    kind.as_str()
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during JSON parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    kind: ErrorKind,
    position: usize,
}

impl ParseError {
    pub(crate) const fn new(kind: ErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// What went wrong.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Byte offset of the first offending byte, or the end of input when the
    /// input ran out.
    pub const fn position(&self) -> usize {
        self.position
    }
}

impl From<ParseError> for ErrorKind {
    fn from(err: ParseError) -> Self {
        err.kind
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.position)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_strings() {
        assert_eq!(parse_error_string(ErrorKind::Ok), "ok");
        assert_eq!(
            parse_error_string(ErrorKind::RootNotSingular),
            "root not singular"
        );
        assert_eq!(parse_error_string(ErrorKind::BadStringChar), "bad character");
        assert_eq!(
            parse_error_string(ErrorKind::UserStopped),
            "user stopped parse"
        );
    }

    #[test]
    fn test_display_includes_position() {
        let err = ParseError::new(ErrorKind::MissColon, 5);
        assert_eq!(err.to_string(), "miss colon at byte 5");
        assert_eq!(err.kind(), ErrorKind::MissColon);
        assert_eq!(err.position(), 5);

        let kind: ErrorKind = err.into();
        assert_eq!(kind, ErrorKind::MissColon);
    }
}
