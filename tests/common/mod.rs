//! Shared stream fixtures for the integration tests.
#![allow(dead_code)]

use std::io::{self, ErrorKind, Read};

/// Deterministic pseudo-random bytes (64-bit LCG, high byte).
pub fn lcg_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect()
}

/// Serves `data[..fail_at]`, then fails every read with `kind`.
pub struct FailingReader {
    data: Vec<u8>,
    pos: usize,
    fail_at: usize,
    kind: ErrorKind,
}

impl FailingReader {
    pub fn new(data: Vec<u8>, fail_at: usize, kind: ErrorKind) -> Self {
        Self { data, pos: 0, fail_at, kind }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.fail_at {
            return Err(io::Error::new(self.kind, "injected stream failure"));
        }
        let end = (self.pos + buf.len()).min(self.fail_at).min(self.data.len());
        let n = end - self.pos;
        buf[..n].copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(n)
    }
}

/// Returns at most `max` bytes per read and `Interrupted` on every other call.
pub struct ChoppyReader {
    data: Vec<u8>,
    pos: usize,
    max: usize,
    calls: usize,
}

impl ChoppyReader {
    pub fn new(data: Vec<u8>, max: usize) -> Self {
        Self { data, pos: 0, max, calls: 0 }
    }
}

impl Read for ChoppyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls += 1;
        if self.calls % 2 == 0 {
            return Err(io::Error::new(ErrorKind::Interrupted, "signal"));
        }
        let n = buf.len().min(self.max).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Panics on its first read.
pub struct PanickingReader;

impl Read for PanickingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        panic!("reader exploded");
    }
}
