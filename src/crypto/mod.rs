//! Cryptographic primitives for minichain

pub mod hash;
