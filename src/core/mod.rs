pub mod calculator;
pub mod log;
pub mod tracker;
