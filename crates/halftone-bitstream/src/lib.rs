//! Bitstream reading and writing for the halftone codec
//!
//! This crate provides word-aligned bit packing and the Huffman entropy codec:
//! frequency analysis, tree construction, code-table derivation, tree
//! serialization and the streaming encoder/decoder.

pub mod bitreader;
pub mod bitwriter;
pub mod huffman;
pub mod stream;

pub use bitreader::WordReader;
pub use bitwriter::WordWriter;
pub use huffman::{Code, CodeTable, FrequencyTable, HuffmanNode, HuffmanTree};
pub use stream::{
    decode_symbols, encode_symbols, DecodedStream, DecoderPhase, EncodeSummary, EncoderPhase,
    HuffmanDecoder, HuffmanEncoder, StreamStatus,
};
