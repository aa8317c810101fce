//! Huffman stream encoder and decoder
//!
//! Stream layout:
//!
//! ```text
//! [symbol_count:u32][leaf_count:u32][pre-order tree nodes][payload words]
//! ```
//!
//! The encoder moves through `Idle → TreeBuilt → CodedReady`, the decoder through
//! `Idle → TreeLoaded → Streaming`. Calling an operation out of order is an
//! [`CodecError::InvalidState`].

use crate::bitreader::WordReader;
use crate::bitwriter::{validate_flush_threshold, WordWriter};
use crate::huffman::{CodeTable, FrequencyTable, HuffmanTree};
use bitvec::prelude::*;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use halftone_core::consts::{DEFAULT_FLUSH_THRESHOLD, WORD_BITS};
use halftone_core::{CodecError, CodecResult};
use std::io::{Read, Write};

/// Encoder lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderPhase {
    Idle,
    TreeBuilt,
    CodedReady,
}

/// Decoder lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderPhase {
    Idle,
    TreeLoaded,
    Streaming,
}

/// What one [`HuffmanEncoder::encode`] call produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeSummary {
    pub symbol_count: u64,
    pub distinct_symbols: usize,
    /// Code bits, padding excluded
    pub payload_bits: u64,
    pub payload_words: usize,
    /// Mean code length in bits per symbol
    pub average_code_length: f64,
}

/// Whether every announced symbol was recovered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Complete,
    /// The payload ran out before `symbol_count` symbols resolved
    Truncated {
        missing_symbols: u64,
        /// Bits left over that did not resolve to a leaf
        dangling_bits: usize,
    },
}

impl StreamStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, StreamStatus::Complete)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedStream {
    pub symbols: Vec<i32>,
    pub status: StreamStatus,
    /// Whole payload words that followed the last expected symbol
    pub surplus_words: usize,
}

enum EncoderState {
    Idle,
    TreeBuilt {
        frequencies: FrequencyTable,
        tree: HuffmanTree,
    },
    CodedReady {
        frequencies: FrequencyTable,
        tree: HuffmanTree,
        codes: CodeTable,
    },
}

/// Huffman encoder for one symbol stream
pub struct HuffmanEncoder {
    flush_threshold: usize,
    state: EncoderState,
}

impl Default for HuffmanEncoder {
    fn default() -> Self {
        Self {
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            state: EncoderState::Idle,
        }
    }
}

impl HuffmanEncoder {
    /// `flush_threshold` is in bits and must be a positive multiple of 32
    pub fn new(flush_threshold: usize) -> CodecResult<Self> {
        validate_flush_threshold(flush_threshold)?;
        Ok(Self {
            flush_threshold,
            state: EncoderState::Idle,
        })
    }

    pub fn phase(&self) -> EncoderPhase {
        match self.state {
            EncoderState::Idle => EncoderPhase::Idle,
            EncoderState::TreeBuilt { .. } => EncoderPhase::TreeBuilt,
            EncoderState::CodedReady { .. } => EncoderPhase::CodedReady,
        }
    }

    /// Count symbol frequencies and build the tree
    pub fn build_tree(&mut self, symbols: &[i32]) -> CodecResult<&HuffmanTree> {
        if !matches!(self.state, EncoderState::Idle) {
            return Err(self.out_of_order("build_tree"));
        }

        let frequencies = FrequencyTable::from_symbols(symbols);
        let tree = HuffmanTree::build(&frequencies);
        log::trace!(
            "Huffman tree over {} symbols, {} distinct",
            frequencies.total(),
            frequencies.len()
        );
        self.state = EncoderState::TreeBuilt { frequencies, tree };

        self.tree().ok_or_else(|| self.out_of_order("build_tree"))
    }

    /// Derive the code table from the built tree
    pub fn derive_codes(&mut self) -> CodecResult<&CodeTable> {
        match std::mem::replace(&mut self.state, EncoderState::Idle) {
            EncoderState::TreeBuilt { frequencies, tree } => {
                let codes = tree.code_table();
                self.state = EncoderState::CodedReady {
                    frequencies,
                    tree,
                    codes,
                };
            }
            other => {
                self.state = other;
                return Err(self.out_of_order("derive_codes"));
            }
        }

        self.code_table().ok_or_else(|| self.out_of_order("derive_codes"))
    }

    pub fn tree(&self) -> Option<&HuffmanTree> {
        match &self.state {
            EncoderState::Idle => None,
            EncoderState::TreeBuilt { tree, .. } | EncoderState::CodedReady { tree, .. } => {
                Some(tree)
            }
        }
    }

    pub fn code_table(&self) -> Option<&CodeTable> {
        match &self.state {
            EncoderState::CodedReady { codes, .. } => Some(codes),
            _ => None,
        }
    }

    pub fn frequencies(&self) -> Option<&FrequencyTable> {
        match &self.state {
            EncoderState::Idle => None,
            EncoderState::TreeBuilt { frequencies, .. }
            | EncoderState::CodedReady { frequencies, .. } => Some(frequencies),
        }
    }

    /// Write the tree section followed by the packed payload
    pub fn encode<W: Write>(
        &self,
        symbols: &[i32],
        mut writer: W,
    ) -> CodecResult<EncodeSummary> {
        let EncoderState::CodedReady {
            frequencies,
            tree,
            codes,
        } = &self.state
        else {
            return Err(self.out_of_order("encode"));
        };

        let symbol_count = u32::try_from(symbols.len()).map_err(|_| {
            CodecError::InvalidInput(format!("{} symbols exceed the u32 count", symbols.len()))
        })?;
        writer.write_u32::<BigEndian>(symbol_count)?;
        tree.write_to(&mut writer)?;

        let mut words = WordWriter::new(&mut writer, self.flush_threshold)?;
        for &symbol in symbols {
            let code = codes.get(symbol).ok_or(CodecError::UnknownSymbol(symbol))?;
            words.write_code(code)?;
        }
        let payload_bits = words.bits_written();
        words.finish()?;

        let summary = EncodeSummary {
            symbol_count: symbols.len() as u64,
            distinct_symbols: codes.len(),
            payload_bits,
            payload_words: payload_bits.div_ceil(WORD_BITS as u64) as usize,
            average_code_length: codes.average_length(frequencies),
        };
        log::debug!(
            "Huffman payload: {} symbols, {} bits in {} words",
            summary.symbol_count,
            summary.payload_bits,
            summary.payload_words
        );
        Ok(summary)
    }

    /// Back to `Idle`, keeping the flush threshold
    pub fn reset(&mut self) {
        self.state = EncoderState::Idle;
    }

    fn out_of_order(&self, operation: &str) -> CodecError {
        CodecError::InvalidState(format!(
            "{} not allowed while the encoder is {:?}",
            operation,
            self.phase()
        ))
    }
}

struct Session {
    tree: HuffmanTree,
    expected: u64,
    pending: BitVec<u8, Msb0>,
    symbols: Vec<i32>,
    surplus_words: usize,
}

impl Session {
    fn is_done(&self) -> bool {
        self.symbols.len() as u64 >= self.expected
    }

    fn absorb(&mut self, word: u32) {
        if self.is_done() {
            self.surplus_words += 1;
            return;
        }

        self.pending
            .extend_from_bitslice(word.to_be_bytes().view_bits::<Msb0>());

        let mut consumed = 0;
        while !self.is_done() {
            match self.tree.decode_symbol(&self.pending[consumed..]) {
                Some((symbol, bits)) => {
                    self.symbols.push(symbol);
                    consumed += bits;
                }
                // Partial code, wait for the next word
                None => break,
            }
        }

        if self.is_done() {
            // Whatever is left is zero padding
            self.pending.clear();
        } else {
            self.pending.drain(..consumed);
        }
    }
}

enum DecoderState {
    Idle,
    TreeLoaded(Session),
    Streaming(Session),
}

/// Huffman decoder for one symbol stream
pub struct HuffmanDecoder {
    state: DecoderState,
}

impl Default for HuffmanDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HuffmanDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Idle,
        }
    }

    pub fn phase(&self) -> DecoderPhase {
        match self.state {
            DecoderState::Idle => DecoderPhase::Idle,
            DecoderState::TreeLoaded(_) => DecoderPhase::TreeLoaded,
            DecoderState::Streaming(_) => DecoderPhase::Streaming,
        }
    }

    /// Read the symbol count and the tree
    pub fn load_tree<R: Read>(&mut self, reader: &mut R) -> CodecResult<&HuffmanTree> {
        if !matches!(self.state, DecoderState::Idle) {
            return Err(self.out_of_order("load_tree"));
        }

        let expected = u64::from(reader.read_u32::<BigEndian>()?);
        let tree = HuffmanTree::read_from(reader)?;
        if tree.is_empty() && expected > 0 {
            return Err(CodecError::InvalidBitstream(format!(
                "{} symbols announced with an empty Huffman tree",
                expected
            )));
        }
        log::trace!(
            "loaded Huffman tree with {} leaves for {} symbols",
            tree.leaf_count(),
            expected
        );

        self.state = DecoderState::TreeLoaded(Session {
            tree,
            expected,
            pending: BitVec::with_capacity(64),
            // Capped, the count comes from untrusted input
            symbols: Vec::with_capacity(expected.min(1 << 20) as usize),
            surplus_words: 0,
        });

        self.tree().ok_or_else(|| self.out_of_order("load_tree"))
    }

    pub fn tree(&self) -> Option<&HuffmanTree> {
        match &self.state {
            DecoderState::Idle => None,
            DecoderState::TreeLoaded(session) | DecoderState::Streaming(session) => {
                Some(&session.tree)
            }
        }
    }

    /// Symbols announced by the tree section
    pub fn expected_symbols(&self) -> Option<u64> {
        match &self.state {
            DecoderState::Idle => None,
            DecoderState::TreeLoaded(session) | DecoderState::Streaming(session) => {
                Some(session.expected)
            }
        }
    }

    /// Decode every code completed by this word; partial codes carry over
    pub fn feed_word(&mut self, word: u32) -> CodecResult<()> {
        match std::mem::replace(&mut self.state, DecoderState::Idle) {
            DecoderState::TreeLoaded(mut session) | DecoderState::Streaming(mut session) => {
                session.absorb(word);
                self.state = DecoderState::Streaming(session);
                Ok(())
            }
            DecoderState::Idle => Err(self.out_of_order("feed_word")),
        }
    }

    /// End of payload: hand back the symbols and return to `Idle`
    pub fn finish(&mut self) -> CodecResult<DecodedStream> {
        let session = match std::mem::replace(&mut self.state, DecoderState::Idle) {
            DecoderState::TreeLoaded(session) | DecoderState::Streaming(session) => session,
            DecoderState::Idle => return Err(self.out_of_order("finish")),
        };

        if session.surplus_words > 0 {
            log::warn!(
                "ignoring {} payload words after the last symbol",
                session.surplus_words
            );
        }

        let decoded = session.symbols.len() as u64;
        let status = if decoded < session.expected {
            let missing_symbols = session.expected - decoded;
            log::warn!(
                "Huffman payload truncated: {} of {} symbols missing, {} dangling bits",
                missing_symbols,
                session.expected,
                session.pending.len()
            );
            StreamStatus::Truncated {
                missing_symbols,
                dangling_bits: session.pending.len(),
            }
        } else {
            StreamStatus::Complete
        };

        Ok(DecodedStream {
            symbols: session.symbols,
            status,
            surplus_words: session.surplus_words,
        })
    }

    /// Load the tree, stream every payload word and finish
    pub fn decode<R: Read>(&mut self, mut reader: R) -> CodecResult<DecodedStream> {
        self.load_tree(&mut reader)?;
        for word in WordReader::new(reader) {
            self.feed_word(word?)?;
        }
        self.finish()
    }

    fn out_of_order(&self, operation: &str) -> CodecError {
        CodecError::InvalidState(format!(
            "{} not allowed while the decoder is {:?}",
            operation,
            self.phase()
        ))
    }
}

/// Build a tree for `symbols` and write the complete stream
pub fn encode_symbols<W: Write>(
    symbols: &[i32],
    writer: W,
    flush_threshold: usize,
) -> CodecResult<EncodeSummary> {
    let mut encoder = HuffmanEncoder::new(flush_threshold)?;
    encoder.build_tree(symbols)?;
    encoder.derive_codes()?;
    encoder.encode(symbols, writer)
}

/// Read a complete stream
pub fn decode_symbols<R: Read>(reader: R) -> CodecResult<DecodedStream> {
    HuffmanDecoder::new().decode(reader)
}
