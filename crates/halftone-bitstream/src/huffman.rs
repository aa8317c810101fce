//! Huffman coding over integer coefficient symbols
//!
//! The tree is built greedily with a min-heap keyed by `(weight, insertion
//! sequence)`. Leaves are inserted in ascending symbol order and every merged node
//! takes the next sequence number, so among equal weights the earliest inserted
//! entry is popped first. The first popped entry becomes the left (`0`) child and
//! the second the right (`1`) child. The rule fixes the exact bit layout; any
//! other rule would still decode correctly.

use bitvec::prelude::*;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use halftone_core::{CodecError, CodecResult};
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};
use std::io::{Read, Write};

/// A Huffman code, most significant (first emitted) bit first
pub type Code = BitVec<u8, Msb0>;

/// Deepest tree accepted when deserializing. Huffman depth grows with the
/// logarithm of the total count, so real trees stay far below this.
const MAX_TREE_DEPTH: usize = 256;

const TAG_INTERNAL: u8 = 0;
const TAG_LEAF: u8 = 1;

/// Occurrence counts per distinct symbol
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<i32, u64>,
    total: u64,
}

impl FrequencyTable {
    /// Count every symbol in one pass
    pub fn from_symbols(symbols: &[i32]) -> Self {
        let mut counts = BTreeMap::new();
        for &symbol in symbols {
            *counts.entry(symbol).or_insert(0u64) += 1;
        }
        Self {
            counts,
            total: symbols.len() as u64,
        }
    }

    /// Build from explicit counts. Zero counts are skipped.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (i32, u64)>,
    {
        let mut table = Self::default();
        for (symbol, count) in counts.into_iter().filter(|&(_, c)| c > 0) {
            *table.counts.entry(symbol).or_insert(0) += count;
            table.total += count;
        }
        table
    }

    pub fn count(&self, symbol: i32) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// `count / total`, 0 for unseen symbols
    pub fn probability(&self, symbol: i32) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(symbol) as f64 / self.total as f64
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(symbol, count)` in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }
}

/// Huffman tree node. Internal nodes own both children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: i32,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }
}

/// Heap entry ordered by weight, then by insertion sequence
struct QueueEntry {
    weight: u64,
    sequence: u64,
    node: HuffmanNode,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.sequence).cmp(&(other.weight, other.sequence))
    }
}

/// Huffman tree over distinct coefficient values
///
/// Node weights are occurrence counts. A tree read back with
/// [`HuffmanTree::read_from`] carries zero weights; only its shape and symbols
/// are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<HuffmanNode>,
}

impl HuffmanTree {
    /// Greedy minimum-pair merging over the frequency table
    pub fn build(frequencies: &FrequencyTable) -> Self {
        let mut heap = BinaryHeap::with_capacity(frequencies.len());
        let mut sequence = 0u64;

        for (symbol, count) in frequencies.iter() {
            heap.push(Reverse(QueueEntry {
                weight: count,
                sequence,
                node: HuffmanNode::Leaf {
                    symbol,
                    weight: count,
                },
            }));
            sequence += 1;
        }

        while heap.len() > 1 {
            let (Some(Reverse(left)), Some(Reverse(right))) = (heap.pop(), heap.pop()) else {
                break;
            };
            let weight = left.weight + right.weight;
            heap.push(Reverse(QueueEntry {
                weight,
                sequence,
                node: HuffmanNode::Internal {
                    weight,
                    left: Box::new(left.node),
                    right: Box::new(right.node),
                },
            }));
            sequence += 1;
        }

        Self {
            root: heap.pop().map(|Reverse(entry)| entry.node),
        }
    }

    pub fn root(&self) -> Option<&HuffmanNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn leaf_count(&self) -> usize {
        fn count(node: &HuffmanNode) -> usize {
            match node {
                HuffmanNode::Leaf { .. } => 1,
                HuffmanNode::Internal { left, right, .. } => count(left) + count(right),
            }
        }
        self.root.as_ref().map_or(0, count)
    }

    /// Derive the code of every leaf: left appends `0`, right appends `1`
    ///
    /// A tree with a single leaf gives that symbol the one-bit code `0`.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = BTreeMap::new();

        match &self.root {
            None => {}
            Some(HuffmanNode::Leaf { symbol, .. }) => {
                codes.insert(*symbol, bitvec![u8, Msb0; 0]);
            }
            Some(root) => {
                let mut stack = vec![(root, Code::new())];
                while let Some((node, prefix)) = stack.pop() {
                    match node {
                        HuffmanNode::Leaf { symbol, .. } => {
                            codes.insert(*symbol, prefix);
                        }
                        HuffmanNode::Internal { left, right, .. } => {
                            let mut right_code = prefix.clone();
                            right_code.push(true);
                            let mut left_code = prefix;
                            left_code.push(false);
                            stack.push((right.as_ref(), right_code));
                            stack.push((left.as_ref(), left_code));
                        }
                    }
                }
            }
        }

        CodeTable { codes }
    }

    /// Walk from the root over `bits`
    ///
    /// Returns the symbol and the number of bits consumed, or `None` when the bits
    /// run out before a leaf is reached (a partial code).
    pub fn decode_symbol(&self, bits: &BitSlice<u8, Msb0>) -> Option<(i32, usize)> {
        let mut node = self.root.as_ref()?;

        if let HuffmanNode::Leaf { symbol, .. } = node {
            return if bits.is_empty() {
                None
            } else {
                Some((*symbol, 1))
            };
        }

        let mut consumed = 0;
        loop {
            match node {
                HuffmanNode::Leaf { symbol, .. } => return Some((*symbol, consumed)),
                HuffmanNode::Internal { left, right, .. } => {
                    let bit = *bits.get(consumed)?;
                    consumed += 1;
                    node = if bit { right.as_ref() } else { left.as_ref() };
                }
            }
        }
    }

    /// Serialize as `[leaf_count:u32]` followed by the nodes in pre-order
    ///
    /// Internal node: tag `0`, then left and right subtrees. Leaf: tag `1`, then
    /// `symbol:i32`. Big-endian throughout.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> CodecResult<()> {
        fn write_node<W: Write>(node: &HuffmanNode, writer: &mut W) -> CodecResult<()> {
            match node {
                HuffmanNode::Leaf { symbol, .. } => {
                    writer.write_u8(TAG_LEAF)?;
                    writer.write_i32::<BigEndian>(*symbol)?;
                }
                HuffmanNode::Internal { left, right, .. } => {
                    writer.write_u8(TAG_INTERNAL)?;
                    write_node(left, writer)?;
                    write_node(right, writer)?;
                }
            }
            Ok(())
        }

        let leaf_count = u32::try_from(self.leaf_count()).map_err(|_| {
            CodecError::InvalidInput("too many distinct symbols to serialize".to_string())
        })?;
        writer.write_u32::<BigEndian>(leaf_count)?;
        if let Some(root) = &self.root {
            write_node(root, writer)?;
        }
        Ok(())
    }

    /// Inverse of [`HuffmanTree::write_to`]
    pub fn read_from<R: Read>(reader: &mut R) -> CodecResult<Self> {
        struct TreeReader<'a, R: Read> {
            reader: &'a mut R,
            leaves_left: u32,
        }

        impl<R: Read> TreeReader<'_, R> {
            fn read_node(&mut self, depth: usize) -> CodecResult<HuffmanNode> {
                if depth > MAX_TREE_DEPTH {
                    return Err(CodecError::InvalidBitstream(format!(
                        "Huffman tree deeper than {}",
                        MAX_TREE_DEPTH
                    )));
                }
                match self.reader.read_u8()? {
                    TAG_LEAF => {
                        if self.leaves_left == 0 {
                            return Err(CodecError::InvalidBitstream(
                                "Huffman tree has more leaves than declared".to_string(),
                            ));
                        }
                        self.leaves_left -= 1;
                        let symbol = self.reader.read_i32::<BigEndian>()?;
                        Ok(HuffmanNode::Leaf { symbol, weight: 0 })
                    }
                    TAG_INTERNAL => {
                        let left = self.read_node(depth + 1)?;
                        let right = self.read_node(depth + 1)?;
                        Ok(HuffmanNode::Internal {
                            weight: 0,
                            left: Box::new(left),
                            right: Box::new(right),
                        })
                    }
                    tag => Err(CodecError::InvalidBitstream(format!(
                        "unknown Huffman node tag {}",
                        tag
                    ))),
                }
            }
        }

        let leaf_count = reader.read_u32::<BigEndian>()?;
        if leaf_count == 0 {
            return Ok(Self::default());
        }

        let mut tree_reader = TreeReader {
            reader,
            leaves_left: leaf_count,
        };
        let root = tree_reader.read_node(0)?;
        if tree_reader.leaves_left != 0 {
            return Err(CodecError::InvalidBitstream(format!(
                "Huffman tree declared {} leaves but holds {}",
                leaf_count,
                leaf_count - tree_reader.leaves_left
            )));
        }

        Ok(Self { root: Some(root) })
    }
}

/// Symbol → code mapping derived from a tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<i32, Code>,
}

impl CodeTable {
    pub fn get(&self, symbol: i32) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&symbol).map(|c| c.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &BitSlice<u8, Msb0>)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c.as_bitslice()))
    }

    pub fn max_length(&self) -> usize {
        self.codes.values().map(|c| c.len()).max().unwrap_or(0)
    }

    /// No code is a prefix of another
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<Vec<bool>> = self
            .codes
            .values()
            .map(|c| c.iter().by_vals().collect())
            .collect();
        // After sorting, a prefix sorts immediately before some code it prefixes
        codes.sort();
        codes.windows(2).all(|pair| !pair[1].starts_with(&pair[0]))
    }

    /// Total encoded length `Σ count(s) · len(code(s))` in bits
    pub fn weighted_length(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .map(|(symbol, count)| count * self.codes.get(&symbol).map_or(0, |c| c.len() as u64))
            .sum()
    }

    /// Mean code length weighted by probability
    pub fn average_length(&self, frequencies: &FrequencyTable) -> f64 {
        if frequencies.total() == 0 {
            return 0.0;
        }
        self.weighted_length(frequencies) as f64 / frequencies.total() as f64
    }
}
