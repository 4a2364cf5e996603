//! EMV Tag-Length-Value fields.
//!
//! A field is a 2-digit tag, a 2-digit decimal length and the value itself.
//! Lengths count characters, not bytes.

use crate::error::DecodeError;

/// Largest value a 2-digit length prefix can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// Encodes a single field. Values over [`MAX_VALUE_LEN`] are written as-is,
/// which yields a length prefix no reader can follow.
pub fn field(id: &str, value: &str) -> String {
    format!("{}{:02}{}", id, value.chars().count(), value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub id: &'a str,
    pub value: &'a str,
}

/// Splits `input` into its top-level fields, in order.
pub fn parse(input: &str) -> Result<Vec<Field<'_>>, DecodeError> {
    let mut fields = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        let offset = input.len() - rest.len();
        let (header, tail) = split_chars(rest, 4).ok_or(DecodeError::Truncated { offset })?;
        if !header.is_ascii() {
            return Err(DecodeError::InvalidLength {
                offset,
                length: header.to_string(),
            });
        }

        let (id, length) = header.split_at(2);
        let len = match length.parse::<usize>() {
            Ok(len) if length.bytes().all(|b| b.is_ascii_digit()) => len,
            _ => {
                return Err(DecodeError::InvalidLength {
                    offset,
                    length: length.to_string(),
                })
            }
        };

        let (value, next) = split_chars(tail, len).ok_or(DecodeError::Truncated {
            offset: input.len() - tail.len(),
        })?;
        fields.push(Field { id, value });
        rest = next;
    }

    Ok(fields)
}

/// Value of the first field tagged `id`.
pub fn find<'a>(fields: &[Field<'a>], id: &str) -> Option<&'a str> {
    fields.iter().find(|f| f.id == id).map(|f| f.value)
}

fn split_chars(s: &str, n: usize) -> Option<(&str, &str)> {
    match s.char_indices().nth(n) {
        Some((idx, _)) => Some(s.split_at(idx)),
        None if s.chars().count() == n => Some((s, "")),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_pads_length_to_two_digits() {
        assert_eq!(field("00", "01"), "000201");
        assert_eq!(field("58", "BR"), "5802BR");
        assert_eq!(field("62", ""), "6200");
        assert_eq!(field("05", "***"), "0503***");
    }

    #[test]
    fn field_counts_characters() {
        assert_eq!(field("59", "Ørsted"), "5906Ørsted");
    }

    #[test]
    fn parse_reads_fields_in_order() {
        let fields = parse("0002015802BR6200").unwrap();
        assert_eq!(
            fields,
            vec![
                Field { id: "00", value: "01" },
                Field { id: "58", value: "BR" },
                Field { id: "62", value: "" },
            ]
        );
        assert_eq!(find(&fields, "58"), Some("BR"));
        assert_eq!(find(&fields, "54"), None);
    }

    #[test]
    fn parse_handles_multibyte_values() {
        let fields = parse("5906Ørsted6002SP").unwrap();
        assert_eq!(find(&fields, "59"), Some("Ørsted"));
        assert_eq!(find(&fields, "60"), Some("SP"));
    }

    #[test]
    fn parse_rejects_short_value() {
        assert_eq!(
            parse("0005abc"),
            Err(DecodeError::Truncated { offset: 4 })
        );
    }

    #[test]
    fn parse_rejects_short_header() {
        assert_eq!(parse("000201590"), Err(DecodeError::Truncated { offset: 6 }));
    }

    #[test]
    fn parse_rejects_non_numeric_length() {
        assert!(matches!(
            parse("00+1a"),
            Err(DecodeError::InvalidLength { offset: 0, .. })
        ));
    }
}
