//! Verification of Extractable One-Time Signatures (EOTS) from Bitcoin-staked finality
//! providers, backing fast finality for rollup blocks.

#![deny(missing_docs)]

pub mod aggregator;
pub mod config;
pub mod curve;
pub mod eots;
pub mod error;
pub mod merkle;
pub mod registry;
pub mod schnorr;

#[cfg(test)]
mod tests;
