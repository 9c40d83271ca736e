//! Precomputed DCT basis.
//!
//! Generated at compile time by build.rs; immutable and shared by every
//! transform call.

include!(concat!(env!("OUT_DIR"), "/dct_basis.rs"));
