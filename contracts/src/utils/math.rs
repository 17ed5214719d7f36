//! Arithmetic helpers shared by the contracts.
pub(crate) mod storage;
