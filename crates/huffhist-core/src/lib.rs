//! # huffhist-core: Concurrent Byte Histograms
//!
//! First stage of a Huffman compressor: a fixed pool of worker threads
//! races on one shared stream, each tallying the blocks it claims into a
//! private histogram, and a coordinator merges the per-worker results.
//!
//! ```no_run
//! use std::fs::File;
//!
//! let file = File::open("input.bin")?;
//! let histogram = huffhist_core::build_histogram(file, 4)?;
//! for (symbol, count) in histogram.iter() {
//!     println!("{:#04x} {}", symbol, count);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod histogram;
pub mod reader;
pub mod worker;

pub use config::BuildConfig;
pub use coordinator::{build_histogram, build_histogram_with, Coordinator, CoordinatorState};
pub use error::{HistError, HistResult};
pub use histogram::{Histogram, ALPHABET_SIZE};
pub use reader::{Block, BlockReader, DEFAULT_BLOCK_SIZE};
pub use worker::{Outcome, Worker};

// Workers share the reader by reference and ship results by value.
static_assertions::assert_impl_all!(BlockReader<std::fs::File>: Send, Sync);
static_assertions::assert_impl_all!(Histogram: Send, Clone);
static_assertions::assert_impl_all!(Outcome: Send);
static_assertions::assert_impl_all!(HistError: Send, Sync, std::error::Error);
