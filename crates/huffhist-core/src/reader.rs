use std::io::{self, ErrorKind, Read};

#[cfg(loom)]
use loom::sync::Mutex;
#[cfg(not(loom))]
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::error::{HistError, HistResult};

/// Default bytes claimed per read.
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// A reusable read buffer owned by exactly one worker.
///
/// After a successful claim it holds the bytes of one contiguous range of
/// the stream, starting at [`offset`](Self::offset).
pub struct Block {
    buf: Box<[u8]>,
    len: usize,
    offset: u64,
}

impl Block {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
            offset: 0,
        }
    }

    /// Bytes of the last claim.
    pub fn bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stream position of the first byte in [`bytes`](Self::bytes).
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn clear(&mut self) {
        self.len = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Open,
    Exhausted,
    /// A read failed; the stream is no longer trusted.
    Halted,
}

struct Shared<R> {
    stream: R,
    consumed: u64,
    state: ReadState,
}

/// Serializes "claim the next block" over a single stream.
///
/// ## Claim Protocol
/// The read and the cursor advance happen under one lock, so concurrent
/// callers receive disjoint, gap-free ranges whatever order they arrive in.
/// Faster callers simply claim more blocks.
pub struct BlockReader<R> {
    shared: Mutex<Shared<R>>,
    block_size: usize,
}

impl<R: Read> BlockReader<R> {
    pub fn new(stream: R, block_size: usize) -> HistResult<Self> {
        if block_size == 0 {
            return Err(HistError::InvalidBlockSize(block_size));
        }
        Ok(Self {
            shared: Mutex::new(Shared {
                stream,
                consumed: 0,
                state: ReadState::Open,
            }),
            block_size,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Claims the next unread region of the stream into `block`.
    ///
    /// Returns `Ok(true)` with a non-empty block, `Ok(false)` at end of
    /// stream, or the stream's error. `Interrupted` reads are retried here.
    /// Once a read has failed every later call reports end of stream, so
    /// co-running workers wind down instead of reading a failed stream. A
    /// claimant that panicked inside the stream poisons the lock, which also
    /// reads as end of stream: the panic is reported by the coordinator as a
    /// missing outcome, never as a stream error.
    pub fn read_next(&self, block: &mut Block) -> io::Result<bool> {
        block.clear();
        let mut shared = match self.shared.lock() {
            Ok(shared) => shared,
            Err(_) => {
                tracing::warn!("block reader poisoned by a panicked claimant; treating as halted");
                return Ok(false);
            }
        };

        if shared.state != ReadState::Open {
            return Ok(false);
        }

        if block.capacity() < self.block_size {
            *block = Block::new(self.block_size);
        }
        let want = self.block_size;
        loop {
            match shared.stream.read(&mut block.buf[..want]) {
                Ok(0) => {
                    shared.state = ReadState::Exhausted;
                    return Ok(false);
                }
                Ok(n) => {
                    block.len = n;
                    block.offset = shared.consumed;
                    shared.consumed += n as u64;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    shared.state = ReadState::Halted;
                    return Err(e);
                }
            }
        }
    }

    /// Total bytes handed out so far.
    pub fn bytes_consumed(&self) -> u64 {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .consumed
    }

    /// True once a read has failed or a claimant panicked mid-read.
    pub fn is_halted(&self) -> bool {
        self.shared
            .lock()
            .map(|s| s.state == ReadState::Halted)
            .unwrap_or(true)
    }

    /// Hands the stream back to the caller once every worker has finished.
    pub fn into_inner(self) -> R {
        match self.shared.into_inner() {
            Ok(shared) => shared.stream,
            Err(poisoned) => poisoned.into_inner().stream,
        }
    }
}
