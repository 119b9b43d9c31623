//! Keymap layers: fixed 8x20 grids of 16-bit key codes
//!
//! Each key code carries the modifier mask in the high byte and the key code
//! in the low byte.
//!
//! Binary layout, as moved by the layer pager:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   # Layers    | Layer 1 R0 C0 (LE u16)        | Layer 1 R0 C1 |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |  ...          |  ... row-major, then Layer 2 R0 C0 ...        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use std::fmt;
use std::ops::Deref;

use blusb_transport::protocol::matrix::{COLS, KEYS, MAX_LAYERS, ROWS};

use crate::error::{FormatError, KeyboardError, ProtocolError};
use crate::hex;

/// Bytes one layer occupies in the binary form
pub const LAYER_BYTES: usize = KEYS * 2;

/// One keymap layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layer {
    matrix: [[u16; COLS]; ROWS],
}

impl Layer {
    /// Layer with every key code zero
    pub const fn empty() -> Self {
        Self {
            matrix: [[0; COLS]; ROWS],
        }
    }

    pub const fn from_matrix(matrix: [[u16; COLS]; ROWS]) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &[[u16; COLS]; ROWS] {
        &self.matrix
    }

    /// Key code at `row`, `col`; `None` outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<u16> {
        self.matrix.get(row)?.get(col).copied()
    }

    /// Replace the key code at `row`, `col`
    pub fn set(&mut self, row: usize, col: usize, code: u16) -> Result<(), KeyboardError> {
        let slot = self
            .matrix
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or_else(|| {
                KeyboardError::InvalidParameter(format!(
                    "matrix position ({row}, {col}) outside {ROWS}x{COLS} grid"
                ))
            })?;
        *slot = code;
        Ok(())
    }

    /// Key codes in row-major order
    pub fn codes(&self) -> impl Iterator<Item = u16> + '_ {
        self.matrix.iter().flatten().copied()
    }

    fn from_codes(codes: &[u16]) -> Self {
        let mut layer = Self::empty();
        for (i, &code) in codes.iter().take(KEYS).enumerate() {
            layer.matrix[i / COLS][i % COLS] = code;
        }
        layer
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    ")?;
        for c in 0..COLS {
            write!(f, "C{c:<3}  ")?;
        }
        writeln!(f)?;
        writeln!(f)?;

        for (r, row) in self.matrix.iter().enumerate() {
            write!(f, "R{r:<1}  ")?;
            for code in row {
                write!(f, "{code:04X}  ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// All configured layers; order is the layer index
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layers(Vec<Layer>);

impl Layers {
    /// Wrap a layer list; at most 255 layers fit the count byte
    pub fn new(layers: Vec<Layer>) -> Result<Self, KeyboardError> {
        if layers.len() > MAX_LAYERS {
            return Err(KeyboardError::InvalidParameter(format!(
                "{} layers given, at most {MAX_LAYERS} supported",
                layers.len()
            )));
        }
        Ok(Self(layers))
    }

    /// Encode: count byte, then each layer's key codes as little-endian u16
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(1 + self.0.len() * LAYER_BYTES);
        data.push(self.0.len() as u8);
        for layer in &self.0 {
            for code in layer.codes() {
                data.extend_from_slice(&code.to_le_bytes());
            }
        }
        data
    }

    /// Decode the binary form
    ///
    /// Decoding stops after the declared number of layers, so trailing page
    /// padding is ignored. Fewer bytes than the declared count needs is an
    /// error rather than a silently short result.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        let (&count, body) = data
            .split_first()
            .ok_or(ProtocolError::MissingLayerCount)?;
        let declared = count as usize;

        let layers: Vec<Layer> = body
            .chunks_exact(LAYER_BYTES)
            .take(declared)
            .map(|chunk| {
                let codes: Vec<u16> = chunk
                    .chunks_exact(2)
                    .map(|b| u16::from_le_bytes([b[0], b[1]]))
                    .collect();
                Layer::from_codes(&codes)
            })
            .collect();

        if layers.len() < declared {
            return Err(ProtocolError::Truncated {
                declared,
                decoded: layers.len(),
            });
        }
        Ok(Self(layers))
    }

    /// Compose the text form: one line per layer, 160 hex codes joined by ", "
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * KEYS * 6);
        for layer in &self.0 {
            let line: Vec<String> = layer.codes().map(|c| format!("{c:X}")).collect();
            out.push_str(&line.join(", "));
            out.push('\n');
        }
        out
    }

    /// Parse the text form
    ///
    /// Tokens may be separated by any mix of commas and whitespace, line
    /// breaks included; every 160 codes make one layer, so a layer may span
    /// several lines. An incomplete final layer is reported at the line
    /// where it starts.
    pub fn from_text(text: &str) -> Result<Self, FormatError> {
        let mut layers = Vec::new();
        let mut codes = [0u16; KEYS];
        let mut filled = 0;
        let mut start_line = 0;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let tokens = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty());

            for (i, token) in tokens.enumerate() {
                if filled == 0 {
                    if layers.len() == MAX_LAYERS {
                        return Err(FormatError::TooMany {
                            what: "layers",
                            max: MAX_LAYERS,
                        });
                    }
                    start_line = line_no;
                }
                codes[filled] = hex::parse_u16(token).ok_or_else(|| FormatError::InvalidToken {
                    line: line_no,
                    field: i + 1,
                    token: token.to_string(),
                })?;
                filled += 1;
                if filled == KEYS {
                    layers.push(Layer::from_codes(&codes));
                    filled = 0;
                }
            }
        }

        if filled != 0 {
            return Err(FormatError::FieldCount {
                line: start_line,
                expected: KEYS,
                got: filled,
            });
        }
        Ok(Self(layers))
    }
}

impl Deref for Layers {
    type Target = [Layer];

    fn deref(&self) -> &[Layer] {
        &self.0
    }
}

impl fmt::Display for Layers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.0.iter().enumerate() {
            writeln!(f, "Layer {}/{}", i + 1, self.0.len())?;
            writeln!(f)?;
            writeln!(f, "{layer}")?;
        }
        Ok(())
    }
}
