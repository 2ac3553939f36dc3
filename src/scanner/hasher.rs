//! CRC-32 block hasher with streaming support.
//!
//! # Overview
//! This module provides the [`BlockHasher`] which turns a readable handle
//! into a lazy sequence of [`BlockDigest`] values, one per consecutive
//! non-overlapping block of up to `block_size` bytes. Only one block is held
//! in memory at a time, so a comparison can stop reading as soon as two
//! streams disagree.
//!
//! The checksum is CRC-32 (IEEE), an integrity check rather than a security
//! primitive. A matching block is provisional evidence only; equality is
//! decided over the whole stream.
//!
//! # Example
//!
//! ```
//! use bayan::scanner::BlockHasher;
//! use std::io::Cursor;
//!
//! let mut hasher = BlockHasher::new(Cursor::new(b"hello world".to_vec()), 4);
//! let lens: Vec<usize> = hasher.by_ref().map(|d| d.unwrap().len).collect();
//! assert_eq!(lens, vec![4, 4, 3]);
//!
//! // The sequence can be restarted from the first block.
//! hasher.rewind().unwrap();
//! assert_eq!(hasher.count(), 3);
//! ```

use std::io::{self, Read, Seek, SeekFrom};

/// Default block size in bytes.
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Checksum of a single block plus the number of bytes it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDigest {
    /// Number of bytes covered by this digest (the last block may be short)
    pub len: usize,
    /// CRC-32 of exactly those bytes
    pub checksum: u32,
}

impl BlockDigest {
    /// Compute the digest of a block.
    #[must_use]
    pub fn of(block: &[u8]) -> Self {
        Self {
            len: block.len(),
            checksum: crc32fast::hash(block),
        }
    }
}

/// Lazy, restartable sequence of block digests over one reader.
///
/// Each item is read on demand. A read error is yielded once and ends the
/// sequence; the caller decides whether that aborts the comparison.
#[derive(Debug)]
pub struct BlockHasher<R> {
    reader: R,
    buffer: Vec<u8>,
    bytes_read: u64,
    finished: bool,
}

impl<R: Read + Seek> BlockHasher<R> {
    /// Create a hasher over `reader` with the given block size.
    ///
    /// A block size of zero is clamped to one; callers validate
    /// configuration before constructing hashers.
    #[must_use]
    pub fn new(reader: R, block_size: usize) -> Self {
        Self {
            reader,
            buffer: vec![0; block_size.max(1)],
            bytes_read: 0,
            finished: false,
        }
    }

    /// Block size in bytes.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.buffer.len()
    }

    /// Total bytes consumed since creation or the last rewind.
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Restart the sequence from the first block.
    ///
    /// # Errors
    ///
    /// Returns the underlying seek error.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.bytes_read = 0;
        self.finished = false;
        Ok(())
    }

    /// Fill the buffer with up to one block, returning the filled length.
    ///
    /// Short reads are continued so that block boundaries always fall at
    /// multiples of the block size regardless of how the reader chunks data.
    fn fill_block(&mut self) -> io::Result<usize> {
        let mut filled = 0;
        while filled < self.buffer.len() {
            match self.reader.read(&mut self.buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read + Seek> Iterator for BlockHasher<R> {
    type Item = io::Result<BlockDigest>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.fill_block() {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(n) => {
                self.bytes_read += n as u64;
                Some(Ok(BlockDigest::of(&self.buffer[..n])))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
