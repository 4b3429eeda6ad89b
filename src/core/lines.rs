//! Line reading that tolerates bytes outside UTF-8.
//!
//! Component sources are mostly UTF-8, but a stray Latin-1 byte (a `©` in a
//! footer) must not cost a whole file. Invalid sequences are replaced with
//! U+FFFD; only real I/O failures surface as errors.

use std::io::{self, BufRead};

/// Iterator over the lines of a reader, decoded lossily.
///
/// Like [`BufRead::lines`], the trailing `\n` or `\r\n` is stripped.
pub struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

pub fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> {
    LossyLines {
        reader,
        buf: Vec::new(),
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
