//! Export adapters

pub mod csv;
