//! The GRIN container: a Huffman-coded file with its tree stored inline.
//!
//! Layout, most significant bit first within every field:
//!
//! | Width      | Field                                                       |
//! |------------|-------------------------------------------------------------|
//! | 32 bits    | Magic number [`MAGIC`]                                      |
//! | variable   | Pre-order tree (see [`huffman::tree_codec`](super::huffman::tree_codec)) |
//! | variable   | One code per source byte, then the [`EOF`] code            |
//! | 0-7 bits   | Zero padding to a byte boundary                             |
//!
//! There is no length field. The decoder stops when it reaches the EOF leaf,
//! so the padding is never interpreted.
//!
//! Encoding makes two passes over the source: one to count byte frequencies
//! and one to emit codes. Sources that cannot be rewound are buffered in
//! memory first.
//!
//! # Example
//!
//! ```rust
//! use grin::cs::compression::grin::{decode_bytes, encode_bytes, MAGIC};
//!
//! let packed = encode_bytes(b"mississippi").unwrap();
//! assert_eq!(u32::from_be_bytes([packed[0], packed[1], packed[2], packed[3]]), MAGIC);
//! assert_eq!(decode_bytes(&packed).unwrap(), b"mississippi");
//! ```

use crate::cs::compression::bitstream::{BitReader, BitWriter};
use crate::cs::compression::huffman::{
    build_tree, read_tree, write_tree, CodeTable, FrequencyTable, HuffmanNode, Symbol,
    DEFAULT_MAX_TREE_DEPTH, EOF,
};
use crate::cs::compression::{Compression, Result};
use crate::cs::error::Error;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Cursor, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Identifies a GRIN container.
pub const MAGIC: u32 = 1846;

/// Width of the magic number field.
pub const MAGIC_BITS: usize = 32;

const READ_CHUNK: usize = 64 * 1024;

/// Sizes of the parts of an encoded container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// Bytes read from the source
    pub source_len: u64,
    /// Bits used by the serialized tree
    pub tree_bits: u64,
    /// Bits used by the symbol codes, EOF code included
    pub payload_bits: u64,
    /// Size of the container, padding included
    pub total_bytes: u64,
}

/// GRIN encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grin {
    max_tree_depth: usize,
}

impl Default for Grin {
    fn default() -> Self {
        Self::new()
    }
}

impl Grin {
    /// Creates a codec with default settings.
    pub fn new() -> Self {
        Grin {
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }

    /// Limits how deep a tree read from a container may be.
    ///
    /// Trees produced by the encoder never exceed the default, so lowering it
    /// only matters when decoding untrusted input with a tighter recursion budget.
    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = depth;
        self
    }

    /// The deepest tree the decoder accepts.
    pub fn max_tree_depth(&self) -> usize {
        self.max_tree_depth
    }

    /// Encodes `source` into `dest`, rewinding `source` between the counting
    /// pass and the coding pass.
    ///
    /// The final partial byte is only written once the EOF code is in place.
    /// On error, any whole chunks already handed to `dest` do not form a
    /// container and must be discarded.
    pub fn encode<R: Read + Seek, W: Write>(&self, mut source: R, dest: W) -> Result<EncodeStats> {
        let start = source.stream_position()?;
        let (freqs, source_len) = FrequencyTable::from_reader(&mut source)?;
        source.seek(SeekFrom::Start(start))?;
        self.encode_counted(&freqs, source_len, source, dest)
    }

    /// Encodes a forward-only source by buffering it in memory.
    pub fn encode_stream<R: Read, W: Write>(&self, mut source: R, dest: W) -> Result<EncodeStats> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;
        self.encode(Cursor::new(data), dest)
    }

    /// Encodes the file at `input` into a new file at `output`.
    ///
    /// If encoding fails the partially written output file is removed.
    pub fn encode_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<EncodeStats> {
        let output = output.as_ref();
        let source = BufReader::new(File::open(input.as_ref())?);
        let dest = BufWriter::new(File::create(output)?);
        match self.encode(source, dest) {
            Ok(stats) => {
                log::debug!(
                    "encoded {} ({} bytes) into {} ({} bytes)",
                    input.as_ref().display(),
                    stats.source_len,
                    output.display(),
                    stats.total_bytes
                );
                Ok(stats)
            }
            Err(e) => {
                remove_partial_output(output, &e);
                Err(e)
            }
        }
    }

    fn encode_counted<R: Read, W: Write>(
        &self,
        freqs: &FrequencyTable,
        source_len: u64,
        mut source: R,
        dest: W,
    ) -> Result<EncodeStats> {
        log::debug!(
            "counted {} bytes with {} distinct values",
            source_len,
            freqs.distinct()
        );
        let tree = build_tree(freqs);
        log::trace!("huffman tree:\n{}", tree);
        let codes = CodeTable::build(&tree);

        let mut out = BitWriter::new(dest);
        out.write_bits(MAGIC, MAGIC_BITS)?;
        write_tree(&tree, &mut out)?;
        let header_bits = out.bits_written();

        let mut buf = vec![0u8; READ_CHUNK];
        let mut emitted = 0u64;
        loop {
            let n = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &byte in &buf[..n] {
                let code = codes.get(Symbol::from(byte)).ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "byte {:#04x} was not present when the source was counted",
                        byte
                    ))
                })?;
                out.write_code(code)?;
            }
            emitted += n as u64;
        }
        if emitted != source_len {
            return Err(Error::InvalidInput(format!(
                "source changed between passes: counted {} bytes, then read {}",
                source_len, emitted
            )));
        }

        let eof = codes
            .get(EOF)
            .ok_or_else(|| Error::InvalidInput("tree has no EOF leaf".to_string()))?;
        out.write_code(eof)?;

        let total_bits = out.bits_written();
        out.finish()?;

        let stats = EncodeStats {
            source_len,
            tree_bits: header_bits - MAGIC_BITS as u64,
            payload_bits: total_bits - header_bits,
            total_bytes: total_bits.div_ceil(8),
        };
        log::debug!(
            "wrote {} tree bits and {} code bits ({} bytes)",
            stats.tree_bits,
            stats.payload_bits,
            stats.total_bytes
        );
        Ok(stats)
    }

    /// Decodes the container in `source` into `dest`.
    ///
    /// Returns the number of bytes written. Reading stops at the EOF code, so
    /// anything after it in `source` is left unread. On error, whatever was
    /// already written to `dest` is incomplete and must be discarded.
    pub fn decode<R: Read, W: Write>(&self, source: R, dest: W) -> Result<u64> {
        let mut input = BitReader::new(source);
        let magic = input.read_bits(MAGIC_BITS)?;
        if magic != Some(MAGIC) {
            return Err(Error::FormatMismatch { found: magic });
        }

        let tree = read_tree(&mut input, self.max_tree_depth)?;
        log::trace!("huffman tree:\n{}", tree);
        if !tree.symbols().contains(&EOF) {
            log::warn!("tree has no EOF leaf, decoding until the input runs out");
        }

        let mut out = BufWriter::new(dest);
        let mut produced = 0u64;
        while let Some(symbol) = next_symbol(&tree, &mut input)? {
            if symbol == EOF {
                break;
            }
            out.write_all(&[symbol as u8])?;
            produced += 1;
        }
        out.flush()?;
        log::debug!(
            "decoded {} bytes from {} bits",
            produced,
            input.bits_read()
        );
        Ok(produced)
    }

    /// Decodes the file at `input` into a new file at `output`.
    ///
    /// If decoding fails the partially written output file is removed.
    pub fn decode_file(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<u64> {
        let output = output.as_ref();
        let source = BufReader::new(File::open(input.as_ref())?);
        let dest = File::create(output)?;
        match self.decode(source, dest) {
            Ok(produced) => Ok(produced),
            Err(e) => {
                remove_partial_output(output, &e);
                Err(e)
            }
        }
    }
}

fn remove_partial_output(output: &Path, cause: &Error) {
    log::warn!("removing partial output {}: {}", output.display(), cause);
    if let Err(remove_err) = fs::remove_file(output) {
        log::warn!("could not remove {}: {}", output.display(), remove_err);
    }
}

/// Walk from the root to a leaf, one input bit per branch.
///
/// Returns `None` when the input is exhausted before the first bit of a code.
/// Running out of input after that is a [`Error::MalformedCode`].
fn next_symbol<R: Read>(root: &HuffmanNode, input: &mut BitReader<R>) -> Result<Option<Symbol>> {
    // A lone leaf is coded as a single zero bit.
    if let HuffmanNode::Leaf { symbol, .. } = root {
        return match input.read_bit()? {
            None => Ok(None),
            Some(false) => Ok(Some(*symbol)),
            Some(true) => Err(Error::MalformedCode(
                "a one bit has no branch in a single-leaf tree".to_string(),
            )),
        };
    }

    let mut node = root;
    let mut depth = 0usize;
    loop {
        match node {
            HuffmanNode::Leaf { symbol, .. } => return Ok(Some(*symbol)),
            HuffmanNode::Internal { left, right, .. } => match input.read_bit()? {
                Some(bit) => {
                    node = if bit { right } else { left };
                    depth += 1;
                }
                None if depth == 0 => return Ok(None),
                None => {
                    return Err(Error::MalformedCode(format!(
                        "stream ended {} bits into a code after {} bits total",
                        depth,
                        input.bits_read()
                    )))
                }
            },
        }
    }
}

impl Compression for Grin {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(Cursor::new(data), &mut out)?;
        Ok(out)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.decode(data, &mut out)?;
        Ok(out)
    }
}

/// Encode a seekable source with default settings. See [`Grin::encode`].
pub fn encode<R: Read + Seek, W: Write>(source: R, dest: W) -> Result<EncodeStats> {
    Grin::new().encode(source, dest)
}

/// Encode a forward-only source with default settings. See [`Grin::encode_stream`].
pub fn encode_stream<R: Read, W: Write>(source: R, dest: W) -> Result<EncodeStats> {
    Grin::new().encode_stream(source, dest)
}

/// Encode `data` into a new container.
pub fn encode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Grin::new().compress(data)
}

/// Encode a file with default settings. See [`Grin::encode_file`].
pub fn encode_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<EncodeStats> {
    Grin::new().encode_file(input, output)
}

/// Decode a container with default settings. See [`Grin::decode`].
pub fn decode<R: Read, W: Write>(source: R, dest: W) -> Result<u64> {
    Grin::new().decode(source, dest)
}

/// Decode a container held in memory.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Grin::new().decompress(data)
}

/// Decode a file with default settings. See [`Grin::decode_file`].
pub fn decode_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<u64> {
    Grin::new().decode_file(input, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::compression::huffman::SYMBOL_BITS;

    fn round_trip(input: &[u8]) {
        let encoded = encode_bytes(input).unwrap();
        let decoded = decode_bytes(&encoded).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_empty_input() {
        let encoded = encode_bytes(&[]).unwrap();
        // magic + 21 tree bits + 1 EOF bit
        assert_eq!(encoded.len(), 7);
        assert!(decode_bytes(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_round_trips() {
        round_trip(b"a");
        round_trip(b"ab");
        round_trip(b"this is an example for huffman encoding");
        round_trip(&(0..=255u8).collect::<Vec<u8>>());
        round_trip(&(0..10_000u32).map(|i| (i * i % 251) as u8).collect::<Vec<u8>>());
    }

    #[test]
    fn test_three_byte_container() {
        let mut encoded = Vec::new();
        let stats = encode(Cursor::new(vec![0x00, 0x00, 0x01]), &mut encoded).unwrap();

        // codes: 0x00 -> 0, 0x01 -> 10, EOF -> 11
        assert_eq!(
            stats,
            EncodeStats {
                source_len: 3,
                tree_bits: 32,
                payload_bits: 6,
                total_bytes: 9,
            }
        );
        assert_eq!(
            encoded,
            vec![0x00, 0x00, 0x07, 0x36, 0x80, 0x10, 0x05, 0x00, 0x2c]
        );
        assert_eq!(decode_bytes(&encoded).unwrap(), vec![0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_stats_match_code_lengths() {
        let input = b"abracadabra, said the magician";
        let tree = build_tree(&FrequencyTable::from_bytes(input));
        let codes = CodeTable::build(&tree);
        let expected_payload: u64 = input
            .iter()
            .map(|&b| codes.get(Symbol::from(b)).unwrap().len() as u64)
            .sum::<u64>()
            + codes.get(EOF).unwrap().len() as u64;

        let mut encoded = Vec::new();
        let stats = encode(Cursor::new(&input[..]), &mut encoded).unwrap();
        assert_eq!(stats.payload_bits, expected_payload);
        assert_eq!(
            stats.total_bytes,
            (MAGIC_BITS as u64 + stats.tree_bits + stats.payload_bits).div_ceil(8)
        );
        assert_eq!(stats.total_bytes, encoded.len() as u64);
    }

    #[test]
    fn test_degenerate_input_stops_at_eof() {
        let input = vec![0x41; 5000];
        let mut encoded = encode_bytes(&input).unwrap();
        // Trailing garbage is never read because decoding ends at the EOF leaf.
        encoded.extend_from_slice(&[0xff, 0x00, 0xff]);

        let mut out = Vec::new();
        let produced = decode(&encoded[..], &mut out).unwrap();
        assert_eq!(produced, 5000);
        assert_eq!(out, input);
    }

    #[test]
    fn test_output_is_deterministic() {
        let input = b"the same input always yields the same container";
        assert_eq!(encode_bytes(input).unwrap(), encode_bytes(input).unwrap());
    }

    #[test]
    fn test_encode_respects_start_position() {
        let mut source = Cursor::new(b"skip:payload".to_vec());
        source.set_position(5);
        let mut encoded = Vec::new();
        let stats = encode(&mut source, &mut encoded).unwrap();
        assert_eq!(stats.source_len, 7);
        assert_eq!(decode_bytes(&encoded).unwrap(), b"payload");
    }

    #[test]
    fn test_encode_stream_matches_encode() {
        let input = b"forward-only sources are buffered";
        let mut streamed = Vec::new();
        encode_stream(&input[..], &mut streamed).unwrap();
        assert_eq!(streamed, encode_bytes(input).unwrap());
    }

    #[test]
    fn test_wrong_magic_reads_nothing_further() {
        let mut encoded = encode_bytes(b"hello").unwrap();
        encoded[3] ^= 0x01;
        let mut source = Cursor::new(encoded);
        let err = decode(&mut source, Vec::new()).unwrap_err();
        match err {
            Error::FormatMismatch { found } => assert_eq!(found, Some(MAGIC ^ 1)),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(source.position(), 4);
    }

    #[test]
    fn test_short_input_is_format_mismatch() {
        let err = decode_bytes(&[0x00, 0x00, 0x07]).unwrap_err();
        assert!(matches!(err, Error::FormatMismatch { found: None }));
        let err = decode_bytes(&[]).unwrap_err();
        assert!(matches!(err, Error::FormatMismatch { found: None }));
    }

    #[test]
    fn test_truncated_tree_is_malformed() {
        let encoded = encode_bytes(b"several distinct bytes").unwrap();
        let err = decode_bytes(&encoded[..6]).unwrap_err();
        assert!(matches!(err, Error::MalformedTree(_)));
    }

    #[test]
    fn test_stream_ending_mid_code_is_malformed() {
        let mut encoded = encode_bytes(&[0x00, 0x00, 0x01]).unwrap();
        // Seven `0` codes, then a lone `1` that starts a two-bit code.
        *encoded.last_mut().unwrap() = 0b0000_0001;
        let err = decode_bytes(&encoded).unwrap_err();
        assert!(matches!(err, Error::MalformedCode(_)));
    }

    #[test]
    fn test_stream_ending_at_root_is_clean() {
        let mut encoded = encode_bytes(&[0x00, 0x00, 0x01]).unwrap();
        // Drop the code byte entirely: the input ends right after the tree.
        encoded.pop();
        assert!(decode_bytes(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_single_leaf_container() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(MAGIC, MAGIC_BITS).unwrap();
        writer.write_bit(false).unwrap();
        writer.write_bits(u32::from(EOF), SYMBOL_BITS).unwrap();
        writer.write_bit(false).unwrap();
        let encoded = writer.finish().unwrap();
        assert!(decode_bytes(&encoded).unwrap().is_empty());

        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(MAGIC, MAGIC_BITS).unwrap();
        writer.write_bit(false).unwrap();
        writer.write_bits(u32::from(EOF), SYMBOL_BITS).unwrap();
        writer.write_bit(true).unwrap();
        let encoded = writer.finish().unwrap();
        assert!(matches!(
            decode_bytes(&encoded),
            Err(Error::MalformedCode(_))
        ));
    }

    #[test]
    fn test_tree_depth_limit_applies_to_decode() {
        let input: Vec<u8> = (0..20u8)
            .flat_map(|i| std::iter::repeat(i).take(1 << (i / 2)))
            .collect();
        let encoded = encode_bytes(&input).unwrap();
        assert_eq!(Grin::new().decompress(&encoded).unwrap(), input);

        let strict = Grin::new().with_max_tree_depth(2);
        assert_eq!(strict.max_tree_depth(), 2);
        assert!(matches!(
            strict.decompress(&encoded),
            Err(Error::MalformedTree(_))
        ));
    }

    /// Serves `first` until rewound, then `second`.
    struct ChangingSource {
        first: Cursor<Vec<u8>>,
        second: Cursor<Vec<u8>>,
        rewound: bool,
    }

    impl Read for ChangingSource {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.rewound {
                self.second.read(buf)
            } else {
                self.first.read(buf)
            }
        }
    }

    impl Seek for ChangingSource {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            if self.first.position() > 0 {
                self.rewound = true;
            }
            self.second.seek(pos)
        }
    }

    #[test]
    fn test_source_changing_between_passes() {
        let new_byte = ChangingSource {
            first: Cursor::new(b"aaaa".to_vec()),
            second: Cursor::new(b"aaab".to_vec()),
            rewound: false,
        };
        let mut partial = Vec::new();
        assert!(matches!(
            encode(new_byte, &mut partial),
            Err(Error::InvalidInput(_))
        ));
        // Nothing that could pass for a container reaches the sink.
        assert!(partial.is_empty());

        let grown = ChangingSource {
            first: Cursor::new(b"aaaa".to_vec()),
            second: Cursor::new(b"aaaaa".to_vec()),
            rewound: false,
        };
        let mut partial = Vec::new();
        assert!(matches!(
            encode(grown, &mut partial),
            Err(Error::InvalidInput(_))
        ));
        assert!(partial.is_empty());
    }
}
