//! Word-aligned bitstream reader

use byteorder::{BigEndian, ByteOrder};
use halftone_core::consts::WORD_BITS;
use halftone_core::{CodecError, CodecResult};
use std::io::{ErrorKind, Read};

const WORD_BYTES: usize = WORD_BITS / 8;

/// Reads 32-bit big-endian payload words one at a time
pub struct WordReader<R: Read> {
    reader: R,
    words_read: usize,
}

impl<R: Read> WordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            words_read: 0,
        }
    }

    /// Next word, or `None` at a clean end of stream
    ///
    /// A stream that ends in the middle of a word is rejected.
    pub fn next_word(&mut self) -> CodecResult<Option<u32>> {
        let mut buf = [0u8; WORD_BYTES];
        let mut filled = 0;
        while filled < WORD_BYTES {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => Ok(None),
            WORD_BYTES => {
                self.words_read += 1;
                Ok(Some(BigEndian::read_u32(&buf)))
            }
            n => Err(CodecError::InvalidBitstream(format!(
                "payload ends with a partial word ({} of {} bytes)",
                n, WORD_BYTES
            ))),
        }
    }

    pub fn words_read(&self) -> usize {
        self.words_read
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for WordReader<R> {
    type Item = CodecResult<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_word().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_words() {
        let data = vec![0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x00, 0x00, 0x01];
        let mut reader = WordReader::new(Cursor::new(data));

        assert_eq!(reader.next_word().unwrap(), Some(0xDEADBEEF));
        assert_eq!(reader.next_word().unwrap(), Some(1));
        assert_eq!(reader.next_word().unwrap(), None);
        assert_eq!(reader.words_read(), 2);
    }

    #[test]
    fn test_partial_word_rejected() {
        let data = vec![0x12, 0x34, 0x56, 0x78, 0x9A];
        let words: Vec<_> = WordReader::new(Cursor::new(data)).collect();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].as_ref().unwrap(), &0x12345678);
        assert!(matches!(words[1], Err(CodecError::InvalidBitstream(_))));
    }
}
