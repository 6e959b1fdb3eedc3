//! Byte-stream decoders for the GL and GR character-set slots.
//!
//! The parser hands the engine raw bytes; the cursor owns two decoders
//! (GL and GR) that turn those bytes into codepoints.  UTF-8 decoding is
//! incremental so that a multi-byte sequence split across two reads
//! still decodes correctly; the 7-bit sets selected by SCS sequences
//! are simple table lookups.

const REPLACEMENT: char = '\u{fffd}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Ascii,
    Uk,
    DecLineDrawing,
}

#[derive(Debug)]
pub struct Decoder {
    charset: Charset,
    /// Undecoded tail of a multi-byte utf-8 sequence.
    pending: Vec<u8>,
}

impl Decoder {
    pub fn new(charset: Charset) -> Decoder {
        Decoder {
            charset,
            pending: Vec::new(),
        }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Select a different character set; any partially decoded sequence
    /// is discarded.
    pub fn set_charset(&mut self, charset: Charset) {
        self.charset = charset;
        self.pending.clear();
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Decode `bytes` and append the codepoints to `out`.  Malformed
    /// input produces U+FFFD and decoding continues; it is never an
    /// error.
    pub fn decode(&mut self, bytes: &[u8], out: &mut String) {
        match self.charset {
            Charset::Utf8 => self.decode_utf8(bytes, out),
            Charset::Ascii => {
                for &b in bytes {
                    out.push(map_seven_bit(b, |c| c));
                }
            }
            Charset::Uk => {
                for &b in bytes {
                    out.push(map_seven_bit(b, |c| if c == '#' { '£' } else { c }));
                }
            }
            Charset::DecLineDrawing => {
                for &b in bytes {
                    out.push(map_seven_bit(b, map_dec_graphics));
                }
            }
        }
    }

    /// Convenience wrapper returning the decoded string.
    pub fn decode_to_string(&mut self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        self.decode(bytes, &mut out);
        out
    }

    fn decode_utf8(&mut self, bytes: &[u8], out: &mut String) {
        let buffered;
        let mut input = if self.pending.is_empty() {
            bytes
        } else {
            self.pending.extend_from_slice(bytes);
            buffered = std::mem::replace(&mut self.pending, Vec::new());
            &buffered[..]
        };

        loop {
            match std::str::from_utf8(input) {
                Ok(s) => {
                    out.push_str(s);
                    return;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    // valid_up_to() guarantees this cannot fail
                    out.push_str(std::str::from_utf8(valid).unwrap_or(""));
                    match err.error_len() {
                        Some(bad) => {
                            out.push(REPLACEMENT);
                            input = &rest[bad..];
                        }
                        None => {
                            // Incomplete tail; keep it for the next read
                            self.pending = rest.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }
}

impl Default for Decoder {
    fn default() -> Decoder {
        Decoder::new(Charset::Utf8)
    }
}

fn map_seven_bit(b: u8, f: impl Fn(char) -> char) -> char {
    if b < 0x80 {
        f(b as char)
    } else {
        REPLACEMENT
    }
}

/// The DEC special graphics glyphs, mapped from the `0x60..=0x7e`
/// range they occupy on the wire.
fn map_dec_graphics(c: char) -> char {
    match c {
        '`' => '◆',
        'a' => '▒',
        'b' => '␉',
        'c' => '␌',
        'd' => '␍',
        'e' => '␊',
        'f' => '°',
        'g' => '±',
        'h' => '␤',
        'i' => '␋',
        'j' => '┘',
        'k' => '┐',
        'l' => '┌',
        'm' => '└',
        'n' => '┼',
        'o' => '⎺',
        'p' => '⎻',
        'q' => '─',
        'r' => '⎼',
        's' => '⎽',
        't' => '├',
        'u' => '┤',
        'v' => '┴',
        'w' => '┬',
        'x' => '│',
        'y' => '≤',
        'z' => '≥',
        '{' => 'π',
        '|' => '≠',
        '}' => '£',
        '~' => '·',
        _ => c,
    }
}
