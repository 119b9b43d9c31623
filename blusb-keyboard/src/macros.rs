//! Macro table: 24 fixed entries of modifier + up to six key codes
//!
//! The table travels as a single feature report, but not symmetrically:
//! writes carry the feature id in front of the 192 entry bytes while the
//! device returns the 192 entry bytes without it. Both framings have their
//! own entry point so neither side gets "fixed" into the other.

use std::fmt;

use blusb_transport::protocol::{feature, macros};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::FormatError;
use crate::hex;

/// Fields per line in the text form (mods, reserved, 6 keys)
const TEXT_FIELDS: usize = 2 + macros::KEYS;

/// One macro entry, 8 bytes on the wire
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, IntoBytes, FromBytes, KnownLayout, Immutable,
)]
#[repr(C)]
pub struct Macro {
    /// Modifier key bits
    pub mods: u8,
    /// Reserved for future use
    pub reserved: u8,
    /// Up to six key codes, 0 = unused
    pub keys: [u8; macros::KEYS],
}

/// The full macro table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacroTable(pub [Macro; macros::COUNT]);

impl MacroTable {
    pub fn entries(&self) -> &[Macro; macros::COUNT] {
        &self.0
    }

    pub fn entries_mut(&mut self) -> &mut [Macro; macros::COUNT] {
        &mut self.0
    }

    /// Encode for `set_report`: `[MACROS] [entry; 24]`, 193 bytes
    pub fn to_transport_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(1 + macros::TABLE_SIZE);
        data.push(feature::MACROS);
        data.extend_from_slice(self.0.as_bytes());
        data
    }

    /// Decode the id-prefixed form produced by `to_transport_bytes`
    pub fn from_transport_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let Some((&id, entries)) = data.split_first() else {
            return Err(FormatError::ShortBinary {
                what: "macro table",
                expected: 1 + macros::TABLE_SIZE,
                got: 0,
            });
        };
        if id != feature::MACROS {
            return Err(FormatError::FeatureMismatch {
                expected: feature::MACROS,
                got: id,
            });
        }
        if entries.len() < macros::TABLE_SIZE {
            return Err(FormatError::ShortBinary {
                what: "macro table",
                expected: 1 + macros::TABLE_SIZE,
                got: data.len(),
            });
        }
        Self::from_device_bytes(entries)
    }

    /// Decode the table as read back from the device (no feature id)
    ///
    /// Entry 0 starts at offset 0. Bytes past the table are ignored.
    pub fn from_device_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let (table, _) = <[Macro; macros::COUNT]>::read_from_prefix(data).map_err(|_| {
            FormatError::ShortBinary {
                what: "macro table",
                expected: macros::TABLE_SIZE,
                got: data.len(),
            }
        })?;
        Ok(Self(table))
    }

    /// Compose the text form: one line per entry, 8 comma-separated hex fields
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(macros::COUNT * 32);
        for m in &self.0 {
            out.push_str(&format!("{:X}, {:X}", m.mods, m.reserved));
            for k in &m.keys {
                out.push_str(&format!(", {k:X}"));
            }
            out.push('\n');
        }
        out
    }

    /// Parse the text form
    ///
    /// Blank lines are skipped. Entries not present in the text stay zero.
    pub fn from_text(text: &str) -> Result<Self, FormatError> {
        let mut table = Self::default();
        let mut next = 0;

        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = idx + 1;
            if next == macros::COUNT {
                return Err(FormatError::TooMany {
                    what: "macro entries",
                    max: macros::COUNT,
                });
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != TEXT_FIELDS {
                return Err(FormatError::FieldCount {
                    line: line_no,
                    expected: TEXT_FIELDS,
                    got: fields.len(),
                });
            }

            let mut bytes = [0u8; TEXT_FIELDS];
            for (i, token) in fields.iter().enumerate() {
                bytes[i] = hex::parse_u8(token).ok_or_else(|| FormatError::InvalidToken {
                    line: line_no,
                    field: i + 1,
                    token: token.to_string(),
                })?;
            }

            let entry = &mut table.0[next];
            entry.mods = bytes[0];
            entry.reserved = bytes[1];
            entry.keys.copy_from_slice(&bytes[2..]);
            next += 1;
        }

        Ok(table)
    }
}

impl fmt::Display for MacroTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "     MODS  RSVD  KEY1  KEY2  KEY3  KEY4  KEY5  KEY6")?;
        writeln!(f)?;
        for (i, m) in self.0.iter().enumerate() {
            write!(f, "M{:02}  {:02X}    {:02X}", i + 1, m.mods, m.reserved)?;
            for k in &m.keys {
                write!(f, "    {k:02X}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MacroTable {
        let mut table = MacroTable::default();
        table.0[0] = Macro {
            mods: 0x01,
            reserved: 0,
            keys: [0x04, 0x05, 0, 0, 0, 0],
        };
        table.0[23] = Macro {
            mods: 0xE0,
            reserved: 0x7F,
            keys: [1, 2, 3, 4, 5, 6],
        };
        table
    }

    #[test]
    fn test_entry_is_eight_bytes() {
        assert_eq!(std::mem::size_of::<Macro>(), macros::ENTRY_SIZE);
    }

    #[test]
    fn test_transport_bytes_layout() {
        let data = sample().to_transport_bytes();
        assert_eq!(data.len(), 193);
        assert_eq!(data[0], feature::MACROS);
        assert_eq!(&data[1..9], &[0x01, 0x00, 0x04, 0x05, 0, 0, 0, 0]);
        assert_eq!(&data[185..193], &[0xE0, 0x7F, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_both_framings_decode() {
        let table = sample();
        let prefixed = table.to_transport_bytes();
        assert_eq!(MacroTable::from_transport_bytes(&prefixed).unwrap(), table);
        assert_eq!(MacroTable::from_device_bytes(&prefixed[1..]).unwrap(), table);
    }

    #[test]
    fn test_device_bytes_too_short() {
        let err = MacroTable::from_device_bytes(&[0u8; 191]).unwrap_err();
        assert_eq!(
            err,
            FormatError::ShortBinary {
                what: "macro table",
                expected: 192,
                got: 191
            }
        );
    }

    #[test]
    fn test_transport_bytes_wrong_id() {
        let mut data = sample().to_transport_bytes();
        data[0] = feature::LAYERS;
        assert!(matches!(
            MacroTable::from_transport_bytes(&data),
            Err(FormatError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_text_line_parses_each_token_as_hex() {
        let table = MacroTable::from_text("1, 0, A, 0, 0, 0, 0, 0\n").unwrap();
        assert_eq!(table.0[0].mods, 0x01);
        assert_eq!(table.0[0].reserved, 0x00);
        assert_eq!(table.0[0].keys, [0x0A, 0, 0, 0, 0, 0]);
        assert_eq!(table.0[1], Macro::default());
    }

    #[test]
    fn test_text_field_count_mismatch() {
        let err = MacroTable::from_text("0, 0, 0, 0, 0, 0, 0, 0\n1, 0, A, 0, 0, 0, 0\n")
            .unwrap_err();
        assert_eq!(
            err,
            FormatError::FieldCount {
                line: 2,
                expected: 8,
                got: 7
            }
        );
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_text_invalid_token_is_named() {
        let err = MacroTable::from_text("1, 0, ZZ, 0, 0, 0, 0, 0").unwrap_err();
        assert_eq!(
            err,
            FormatError::InvalidToken {
                line: 1,
                field: 3,
                token: "ZZ".into()
            }
        );
    }

    #[test]
    fn test_text_tolerates_whitespace_and_blank_lines() {
        let table = MacroTable::from_text("\n  2 ,0,  e0 ,1,2,3,4,   5  \n\n").unwrap();
        assert_eq!(table.0[0].mods, 2);
        assert_eq!(table.0[0].keys, [0xE0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_text_too_many_entries() {
        let text = "0, 0, 0, 0, 0, 0, 0, 0\n".repeat(25);
        assert!(matches!(
            MacroTable::from_text(&text),
            Err(FormatError::TooMany { .. })
        ));
    }

    #[test]
    fn test_text_roundtrip_uses_uppercase() {
        let table = sample();
        let text = table.to_text();
        assert!(text.starts_with("1, 0, 4, 5, 0, 0, 0, 0\n"));
        assert!(text.contains("E0, 7F, 1, 2, 3, 4, 5, 6\n"));
        assert_eq!(text.lines().count(), 24);
        assert_eq!(MacroTable::from_text(&text).unwrap(), table);
    }

    #[test]
    fn test_display_table() {
        let out = sample().to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "     MODS  RSVD  KEY1  KEY2  KEY3  KEY4  KEY5  KEY6");
        assert_eq!(lines[2], "M01  01    00    04    05    00    00    00    00");
        assert_eq!(lines.len(), 2 + 24);
    }
}
