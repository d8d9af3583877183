//! Huffman tree construction and the tree-header wire format
//!
//! This module covers the model side of the codec:
//! - frequency analysis over the 257-symbol alphabet (256 byte values plus
//!   the end-of-stream marker),
//! - prefix-code tree construction with a deterministic tie-break,
//! - code table derivation (root-to-leaf paths as bit vectors),
//! - pre-order bit-level tree header serialization and parsing.
//!
//! The tree is built fresh per compress/decompress invocation, owned by that
//! invocation, and discarded afterwards.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{HuffzipError, Result, StreamPhase};
use crate::io::{BitInput, BitOutput};

/// A symbol in the extended alphabet: byte values 0..=255 plus the
/// end-of-stream marker
pub type Symbol = u16;

/// Number of symbols in the extended alphabet
pub const SYMBOL_COUNT: usize = 257;

/// The sentinel end-of-stream symbol, one past the last byte value
///
/// It is never a literal byte; its presence lets the decoder find the
/// logical end of the payload independent of byte alignment.
pub const END_OF_STREAM: Symbol = 256;

/// Width of a leaf value field in the tree header
///
/// Nine bits, because the symbol space spans 0..=256 and needs one more bit
/// than a raw byte.
pub const SYMBOL_BITS: u32 = 9;

/// Occurrence counts for every symbol in the extended alphabet
///
/// The end-of-stream entry is always exactly 1 regardless of input, so the
/// marker is guaranteed a leaf even for empty input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl FrequencyTable {
    /// Count symbol occurrences by reading `input` to exhaustion in 8-bit
    /// units
    ///
    /// Consumes the whole input; the caller rewinds the port before the
    /// encode pass. Empty input yields all-zero literal counts with only the
    /// end-of-stream entry populated.
    pub fn count_symbols<R: BitInput + ?Sized>(input: &mut R) -> Result<Self> {
        let mut counts = [0u64; SYMBOL_COUNT];
        while let Some(byte) = input.read_bits(8)? {
            counts[byte as usize] += 1;
        }
        counts[END_OF_STREAM as usize] = 1;
        Ok(Self { counts })
    }

    /// Create a table from raw counts
    ///
    /// The end-of-stream entry is forced to 1, matching
    /// [`count_symbols`](Self::count_symbols).
    pub fn from_counts(mut counts: [u64; SYMBOL_COUNT]) -> Self {
        counts[END_OF_STREAM as usize] = 1;
        Self { counts }
    }

    /// Occurrence count for `symbol`
    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of symbols with nonzero count (always at least 1)
    pub fn populated_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

/// A node of the prefix-code tree
///
/// The tree is full binary: a node is a leaf iff it has no children, and
/// internal nodes always have exactly two. Weights are meaningful only on
/// the build path; trees parsed from a header carry zero weights.
#[derive(Debug, Clone)]
pub enum HuffNode {
    /// Terminal node carrying a symbol
    Leaf {
        /// The symbol this leaf decodes to
        symbol: Symbol,
        /// Sum of occurrences of this symbol
        weight: u64,
    },
    /// Interior node with exactly two children
    Internal {
        /// Sum of descendant leaf weights
        weight: u64,
        /// Subtree reached on a `0` bit
        left: Box<HuffNode>,
        /// Subtree reached on a `1` bit
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    /// The node's weight: its own frequency for leaves, the sum of
    /// descendant leaf frequencies for internal nodes
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// Whether this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }
}

/// Pending node in the tree builder's priority queue
///
/// Ordering is weight ascending with ties broken by strict insertion order
/// (`seq`). Leaves are seeded in ascending symbol order, so the tie-break is
/// fully deterministic across platforms.
#[derive(Debug)]
struct HeapEntry {
    weight: u64,
    seq: u32,
    node: HuffNode,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.weight
            .cmp(&other.weight)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Table of derived prefix codes, one per populated symbol
///
/// Codes are kept as bit vectors end-to-end and written bit-by-bit, so code
/// length is never capped by a machine integer width.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Vec<bool>>>,
    max_code_length: usize,
}

impl CodeTable {
    /// The code for `symbol`, if it was populated in the source tree
    pub fn code(&self, symbol: Symbol) -> Option<&[bool]> {
        self.codes[symbol as usize].as_deref()
    }

    /// Length of the longest code in the table
    pub fn max_code_length(&self) -> usize {
        self.max_code_length
    }

    /// Iterate over `(symbol, code)` pairs in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &[bool])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_deref().map(|c| (symbol as Symbol, c)))
    }
}

/// A prefix-code tree with its construction and wire-format operations
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Build the tree from a frequency table
    ///
    /// One leaf per populated symbol enters a min-priority queue; the two
    /// lowest-weight nodes are repeatedly merged (first removed becomes the
    /// left child) until one node remains. With only the end-of-stream entry
    /// populated the result is a single leaf with no internal structure,
    /// which downstream code handles as a first-class case.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        let mut heap = BinaryHeap::new();
        let mut seq = 0u32;

        for symbol in 0..SYMBOL_COUNT as Symbol {
            let weight = frequencies.get(symbol);
            if weight > 0 {
                heap.push(Reverse(HeapEntry {
                    weight,
                    seq,
                    node: HuffNode::Leaf { symbol, weight },
                }));
                seq += 1;
            }
        }

        if heap.is_empty() {
            return Err(HuffzipError::EmptyAlphabet);
        }

        while heap.len() > 1 {
            let Reverse(first) = heap.pop().ok_or(HuffzipError::EmptyAlphabet)?;
            let Reverse(second) = heap.pop().ok_or(HuffzipError::EmptyAlphabet)?;
            let weight = first.weight + second.weight;
            heap.push(Reverse(HeapEntry {
                weight,
                seq,
                node: HuffNode::Internal {
                    weight,
                    left: Box::new(first.node),
                    right: Box::new(second.node),
                },
            }));
            seq += 1;
        }

        let Reverse(entry) = heap.pop().ok_or(HuffzipError::EmptyAlphabet)?;
        Ok(Self { root: entry.node })
    }

    /// The root node
    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Derive the code table: each populated symbol's root-to-leaf path
    ///
    /// A degenerate single-leaf tree assigns its symbol the empty code.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = vec![None; SYMBOL_COUNT];
        let mut max_code_length = 0;
        Self::fill_codes(&self.root, Vec::new(), &mut codes, &mut max_code_length);
        CodeTable {
            codes,
            max_code_length,
        }
    }

    fn fill_codes(
        node: &HuffNode,
        path: Vec<bool>,
        codes: &mut [Option<Vec<bool>>],
        max_code_length: &mut usize,
    ) {
        match node {
            HuffNode::Leaf { symbol, .. } => {
                *max_code_length = (*max_code_length).max(path.len());
                codes[*symbol as usize] = Some(path);
            }
            HuffNode::Internal { left, right, .. } => {
                let mut left_path = path.clone();
                left_path.push(false);
                Self::fill_codes(left, left_path, codes, max_code_length);

                let mut right_path = path;
                right_path.push(true);
                Self::fill_codes(right, right_path, codes, max_code_length);
            }
        }
    }

    /// Serialize the tree to `output` in pre-order
    ///
    /// Internal nodes contribute a single `0` bit followed by their left
    /// then right subtrees; leaves contribute a `1` bit and a 9-bit value.
    pub fn write_header<W: BitOutput + ?Sized>(&self, output: &mut W) -> Result<()> {
        Self::write_node(&self.root, output)
    }

    fn write_node<W: BitOutput + ?Sized>(node: &HuffNode, output: &mut W) -> Result<()> {
        match node {
            HuffNode::Internal { left, right, .. } => {
                output.write_bits(1, 0)?;
                Self::write_node(left, output)?;
                Self::write_node(right, output)
            }
            HuffNode::Leaf { symbol, .. } => {
                output.write_bits(1, 1)?;
                output.write_bits(SYMBOL_BITS, u32::from(*symbol))
            }
        }
    }

    /// Reconstruct a tree by parsing a pre-order header from `input`
    ///
    /// Fails with a truncation error if input runs out where a structural
    /// bit or leaf value is expected, and rejects leaf values outside the
    /// symbol range (the 9-bit field spans 0..=511 but only 0..=256 are
    /// meaningful).
    pub fn read_header<R: BitInput + ?Sized>(input: &mut R) -> Result<Self> {
        let root = Self::read_node(input)?;
        Ok(Self { root })
    }

    fn read_node<R: BitInput + ?Sized>(input: &mut R) -> Result<HuffNode> {
        let bit = input
            .read_bits(1)?
            .ok_or(HuffzipError::Truncated {
                phase: StreamPhase::HeaderNode,
            })?;

        if bit == 0 {
            let left = Self::read_node(input)?;
            let right = Self::read_node(input)?;
            Ok(HuffNode::Internal {
                weight: 0,
                left: Box::new(left),
                right: Box::new(right),
            })
        } else {
            let value = input
                .read_bits(SYMBOL_BITS)?
                .ok_or(HuffzipError::Truncated {
                    phase: StreamPhase::HeaderSymbol,
                })?;
            if value > u32::from(END_OF_STREAM) {
                return Err(HuffzipError::malformed_header(format!(
                    "leaf value {} outside the symbol range 0..=256",
                    value
                )));
            }
            Ok(HuffNode::Leaf {
                symbol: value as Symbol,
                weight: 0,
            })
        }
    }

    /// Number of leaves, equal to the number of populated symbols
    pub fn leaf_count(&self) -> usize {
        Self::count_leaves(&self.root)
    }

    fn count_leaves(node: &HuffNode) -> usize {
        match node {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => {
                Self::count_leaves(left) + Self::count_leaves(right)
            }
        }
    }

    /// Whether two trees have identical shape and leaf values
    ///
    /// Weights are ignored; a parsed tree carries none.
    pub fn structural_eq(&self, other: &Self) -> bool {
        Self::nodes_structural_eq(&self.root, &other.root)
    }

    fn nodes_structural_eq(a: &HuffNode, b: &HuffNode) -> bool {
        match (a, b) {
            (HuffNode::Leaf { symbol: sa, .. }, HuffNode::Leaf { symbol: sb, .. }) => sa == sb,
            (
                HuffNode::Internal {
                    left: la,
                    right: ra,
                    ..
                },
                HuffNode::Internal {
                    left: lb,
                    right: rb,
                    ..
                },
            ) => Self::nodes_structural_eq(la, lb) && Self::nodes_structural_eq(ra, rb),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{from_slice, to_vec};

    fn table_with(entries: &[(Symbol, u64)]) -> FrequencyTable {
        let mut counts = [0u64; SYMBOL_COUNT];
        for &(symbol, count) in entries {
            counts[symbol as usize] = count;
        }
        FrequencyTable::from_counts(counts)
    }

    #[test]
    fn test_frequency_table_counts_input() {
        let data = b"aabac";
        let mut input = from_slice(data);
        let table = FrequencyTable::count_symbols(&mut input).unwrap();

        assert_eq!(table.get(b'a' as Symbol), 3);
        assert_eq!(table.get(b'b' as Symbol), 1);
        assert_eq!(table.get(b'c' as Symbol), 1);
        assert_eq!(table.get(END_OF_STREAM), 1);
        assert_eq!(table.populated_symbols(), 4);
    }

    #[test]
    fn test_frequency_table_empty_input() {
        let mut input = from_slice(&[]);
        let table = FrequencyTable::count_symbols(&mut input).unwrap();
        assert_eq!(table.populated_symbols(), 1);
        assert_eq!(table.get(END_OF_STREAM), 1);
    }

    #[test]
    fn test_degenerate_tree_is_single_leaf() {
        let table = table_with(&[]);
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        assert!(tree.root().is_leaf());
        assert_eq!(tree.leaf_count(), 1);

        // The lone end-of-stream leaf gets the empty code.
        let codes = tree.code_table();
        assert_eq!(codes.code(END_OF_STREAM), Some(&[][..]));
        assert_eq!(codes.max_code_length(), 0);
    }

    #[test]
    fn test_two_symbol_tree() {
        let table = table_with(&[(b'A' as Symbol, 1000)]);
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        assert_eq!(tree.leaf_count(), 2);

        let codes = tree.code_table();
        // End-of-stream has weight 1, so it is removed first and lands left.
        assert_eq!(codes.code(END_OF_STREAM), Some(&[false][..]));
        assert_eq!(codes.code(b'A' as Symbol), Some(&[true][..]));
    }

    #[test]
    fn test_tie_break_is_symbol_order() {
        // Three equal-weight leaves: 'a', 'b', end-of-stream. Leaves are
        // seeded in ascending symbol order, so 'a' and 'b' merge first.
        let table = table_with(&[(b'a' as Symbol, 1), (b'b' as Symbol, 1)]);
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        let codes = tree.code_table();

        assert_eq!(codes.code(END_OF_STREAM), Some(&[false][..]));
        assert_eq!(codes.code(b'a' as Symbol), Some(&[true, false][..]));
        assert_eq!(codes.code(b'b' as Symbol), Some(&[true, true][..]));
    }

    #[test]
    fn test_tree_construction_is_deterministic() {
        let table = table_with(&[(1, 5), (2, 5), (3, 5), (4, 5), (5, 20)]);
        let first = HuffmanTree::from_frequencies(&table).unwrap();
        let second = HuffmanTree::from_frequencies(&table).unwrap();
        assert!(first.structural_eq(&second));
    }

    #[test]
    fn test_empty_alphabet_is_rejected() {
        let table = FrequencyTable {
            counts: [0u64; SYMBOL_COUNT],
        };
        assert!(matches!(
            HuffmanTree::from_frequencies(&table),
            Err(HuffzipError::EmptyAlphabet)
        ));
    }

    #[test]
    fn test_header_round_trip() {
        let table = table_with(&[(b'x' as Symbol, 7), (b'y' as Symbol, 3), (b'z' as Symbol, 1)]);
        let tree = HuffmanTree::from_frequencies(&table).unwrap();

        let mut output = to_vec();
        tree.write_header(&mut output).unwrap();
        output.close().unwrap();

        let bytes = output.into_bytes();
        let mut input = from_slice(&bytes);
        let parsed = HuffmanTree::read_header(&mut input).unwrap();
        assert!(tree.structural_eq(&parsed));
    }

    #[test]
    fn test_header_single_leaf_round_trip() {
        let tree = HuffmanTree::from_frequencies(&table_with(&[])).unwrap();

        let mut output = to_vec();
        tree.write_header(&mut output).unwrap();
        output.close().unwrap();
        // One structural bit plus a 9-bit value, padded to two bytes.
        assert_eq!(output.bits_written(), 16);

        let bytes = output.into_bytes();
        let parsed = HuffmanTree::read_header(&mut from_slice(&bytes)).unwrap();
        assert!(tree.structural_eq(&parsed));
    }

    #[test]
    fn test_header_truncated_node_bit() {
        // A lone internal marker with nothing after it: the pad bits parse
        // as further internal nodes until input runs out.
        let mut output = to_vec();
        output.write_bits(1, 0).unwrap();
        output.close().unwrap();
        let bytes = output.into_bytes();

        let err = HuffmanTree::read_header(&mut from_slice(&bytes)).unwrap_err();
        assert!(matches!(
            err,
            HuffzipError::Truncated {
                phase: StreamPhase::HeaderNode
            }
        ));
    }

    #[test]
    fn test_header_truncated_leaf_value() {
        // A leaf marker with only 7 pad bits left where 9 are needed.
        let mut output = to_vec();
        output.write_bits(1, 1).unwrap();
        output.close().unwrap();
        let bytes = output.into_bytes();

        let err = HuffmanTree::read_header(&mut from_slice(&bytes)).unwrap_err();
        assert!(matches!(
            err,
            HuffzipError::Truncated {
                phase: StreamPhase::HeaderSymbol
            }
        ));
    }

    #[test]
    fn test_header_rejects_out_of_range_leaf() {
        let mut output = to_vec();
        output.write_bits(1, 1).unwrap();
        output.write_bits(SYMBOL_BITS, 300).unwrap();
        output.close().unwrap();
        let bytes = output.into_bytes();

        let err = HuffmanTree::read_header(&mut from_slice(&bytes)).unwrap_err();
        assert!(matches!(err, HuffzipError::MalformedHeader { .. }));
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let data: Vec<u8> = b"the quick brown fox jumps over the lazy dog".to_vec();
        let mut input = from_slice(&data);
        let table = FrequencyTable::count_symbols(&mut input).unwrap();
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        let codes = tree.code_table();

        let all: Vec<(Symbol, &[bool])> = codes.iter().collect();
        for (i, &(_, a)) in all.iter().enumerate() {
            for &(_, b) in &all[i + 1..] {
                let shorter = a.len().min(b.len());
                assert_ne!(&a[..shorter], &b[..shorter]);
            }
        }
    }
}
