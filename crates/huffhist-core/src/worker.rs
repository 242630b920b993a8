use std::io::{self, Read};

use crate::histogram::Histogram;
use crate::reader::{Block, BlockReader};

/// The single report a worker sends before terminating.
#[derive(Debug)]
pub struct Outcome {
    pub worker: usize,
    /// The worker's complete local histogram, or the error that stopped it.
    pub result: io::Result<Histogram>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Pulls blocks from a shared [`BlockReader`] and tallies them privately.
pub struct Worker {
    id: usize,
    block: Block,
    local: Histogram,
    blocks_claimed: u64,
}

impl Worker {
    pub fn new(id: usize, block_size: usize) -> Self {
        Self {
            id,
            block: Block::new(block_size),
            local: Histogram::new(),
            blocks_claimed: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Reads until end of stream or the first error, then reports once.
    ///
    /// On error the partial histogram is dropped with the worker; a
    /// truncated count would silently skew the merged statistics.
    pub fn run<R: Read>(mut self, reader: &BlockReader<R>) -> Outcome {
        loop {
            match reader.read_next(&mut self.block) {
                Ok(true) => {
                    self.local.tally(self.block.bytes());
                    self.blocks_claimed += 1;
                }
                Ok(false) => {
                    tracing::debug!(
                        "worker {}: end of stream after {} blocks ({} bytes)",
                        self.id,
                        self.blocks_claimed,
                        self.local.total()
                    );
                    return Outcome {
                        worker: self.id,
                        result: Ok(self.local),
                    };
                }
                Err(e) => {
                    tracing::warn!("worker {}: read failed after {} blocks: {}", self.id, self.blocks_claimed, e);
                    return Outcome {
                        worker: self.id,
                        result: Err(e),
                    };
                }
            }
        }
    }
}
