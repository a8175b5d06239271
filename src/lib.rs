//! Copenhagen population statistics: download the dataset, parse its rows
//! and fold them into a nested year → city → age → zip-code mapping.

pub mod fetch;
pub mod process;
pub mod stats;
