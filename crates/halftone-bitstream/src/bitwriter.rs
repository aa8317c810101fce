//! Word-aligned bitstream writer

use bitvec::prelude::*;
use byteorder::{BigEndian, WriteBytesExt};
use halftone_core::consts::{MAX_FLUSH_THRESHOLD, WORD_BITS};
use halftone_core::{CodecError, CodecResult};
use std::io::Write;

/// Validate a flush threshold: a positive multiple of the word width
pub fn validate_flush_threshold(flush_threshold: usize) -> CodecResult<()> {
    if flush_threshold == 0
        || flush_threshold % WORD_BITS != 0
        || flush_threshold > MAX_FLUSH_THRESHOLD
    {
        return Err(CodecError::InvalidParameter(format!(
            "flush threshold {} must be a positive multiple of {} bits, at most {}",
            flush_threshold, WORD_BITS, MAX_FLUSH_THRESHOLD
        )));
    }
    Ok(())
}

/// Packs variable-length codes MSB-first into 32-bit big-endian words
///
/// Bits accumulate in a pending buffer; once it holds more than
/// `flush_threshold` bits every complete word is emitted and the remainder is
/// kept. [`WordWriter::finish`] pads the tail with zero bits to a whole word.
pub struct WordWriter<W: Write> {
    writer: W,
    pending: BitVec<u8, Msb0>,
    flush_threshold: usize,
    bits_written: u64,
    words_written: usize,
}

impl<W: Write> WordWriter<W> {
    pub fn new(writer: W, flush_threshold: usize) -> CodecResult<Self> {
        validate_flush_threshold(flush_threshold)?;
        Ok(Self {
            writer,
            pending: BitVec::with_capacity(flush_threshold + WORD_BITS),
            flush_threshold,
            bits_written: 0,
            words_written: 0,
        })
    }

    /// Append a code to the stream
    pub fn write_code(&mut self, code: &BitSlice<u8, Msb0>) -> CodecResult<()> {
        self.pending.extend_from_bitslice(code);
        self.bits_written += code.len() as u64;
        self.flush_over_threshold()
    }

    /// Append a single bit
    pub fn write_bit(&mut self, bit: bool) -> CodecResult<()> {
        self.pending.push(bit);
        self.bits_written += 1;
        self.flush_over_threshold()
    }

    fn flush_over_threshold(&mut self) -> CodecResult<()> {
        if self.pending.len() > self.flush_threshold {
            self.emit_full_words()?;
        }
        Ok(())
    }

    fn emit_full_words(&mut self) -> CodecResult<()> {
        while self.pending.len() >= WORD_BITS {
            let word = self
                .pending
                .drain(..WORD_BITS)
                .fold(0u32, |acc, bit| (acc << 1) | bit as u32);
            self.writer.write_u32::<BigEndian>(word)?;
            self.words_written += 1;
        }
        Ok(())
    }

    /// Code bits written so far, padding excluded
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    pub fn words_written(&self) -> usize {
        self.words_written
    }

    /// Pad the last partial word with zeros, emit it, flush and hand back the writer
    pub fn finish(mut self) -> CodecResult<W> {
        let remainder = self.pending.len() % WORD_BITS;
        if remainder != 0 {
            let padded = self.pending.len() + WORD_BITS - remainder;
            self.pending.resize(padded, false);
        }
        self.emit_full_words()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bits_msb_first() {
        let mut writer = WordWriter::new(Vec::new(), WORD_BITS).unwrap();
        writer.write_code(bits![u8, Msb0; 1, 0, 1, 0]).unwrap();
        writer.write_code(bits![u8, Msb0; 1, 1, 0, 0, 1, 1, 0, 0]).unwrap();
        assert_eq!(writer.bits_written(), 12);
        let output = writer.finish().unwrap();

        assert_eq!(output, vec![0b1010_1100, 0b1100_0000, 0, 0]);
    }

    #[test]
    fn test_write_bit() {
        let mut writer = WordWriter::new(Vec::new(), WORD_BITS).unwrap();
        for i in 0..33 {
            writer.write_bit(i % 2 == 1).unwrap();
        }
        assert_eq!(writer.words_written(), 1);
        let output = writer.finish().unwrap();
        assert_eq!(output, vec![0x55, 0x55, 0x55, 0x55, 0, 0, 0, 0]);
    }

    #[test]
    fn test_empty_stream_emits_nothing() {
        let writer = WordWriter::new(Vec::new(), WORD_BITS).unwrap();
        assert!(writer.finish().unwrap().is_empty());
    }

    #[test]
    fn test_threshold_does_not_change_output() {
        let codes: Vec<BitVec<u8, Msb0>> = (0..200u32)
            .map(|i| (0..(i % 7 + 1)).map(|b| (i >> b) & 1 == 1).collect())
            .collect();

        let encode = |threshold| {
            let mut writer = WordWriter::new(Vec::new(), threshold).unwrap();
            for code in &codes {
                writer.write_code(code).unwrap();
            }
            writer.finish().unwrap()
        };

        let reference = encode(32);
        assert_eq!(encode(64), reference);
        assert_eq!(encode(4096), reference);
    }

    #[test]
    fn test_invalid_threshold() {
        for threshold in [0, 8, 33] {
            assert!(matches!(
                WordWriter::new(Vec::new(), threshold),
                Err(CodecError::InvalidParameter(_))
            ));
        }
    }
}
