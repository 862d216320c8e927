/// Streaming encoder for ASCII mode: bare LF becomes CRLF, existing CRLF stays.
///
/// The encoder remembers whether the previous chunk ended in CR, so a CRLF pair
/// split across two reads is not doubled.
#[derive(Debug, Default)]
pub struct AsciiEncoder {
    last_was_cr: bool,
}

impl AsciiEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, input: &[u8], out: &mut Vec<u8>) {
        out.reserve(input.len() + input.len() / 16);
        for &byte in input {
            if byte == b'\n' && !self.last_was_cr {
                out.push(b'\r');
            }
            out.push(byte);
            self.last_was_cr = byte == b'\r';
        }
    }
}
