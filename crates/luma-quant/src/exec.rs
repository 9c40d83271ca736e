//! Execution strategy selection.
//!
//! Every filter produces identical output under either strategy; the
//! choice only affects wall-clock time.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;

/// How per-pixel and per-tile work is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Execution {
    /// Single-threaded, on the calling thread.
    #[default]
    Sequential,
    /// Data-parallel fan-out on the global rayon pool.
    Parallel,
}

impl Execution {
    /// `Parallel` when `parallel` is set, `Sequential` otherwise.
    pub fn from_flag(parallel: bool) -> Self {
        if parallel {
            Execution::Parallel
        } else {
            Execution::Sequential
        }
    }

    /// Map every element of `buffer` into a new owning buffer.
    pub fn map<T, U>(self, buffer: &PixelBuffer<T>, f: impl Fn(T) -> U + Sync + Send) -> PixelBuffer<U>
    where
        T: Copy + Send + Sync,
        U: Copy + Send,
    {
        match self {
            Execution::Sequential => buffer.map(f),
            Execution::Parallel => buffer.par_map(f),
        }
    }
}
