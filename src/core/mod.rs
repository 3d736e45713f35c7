pub mod catalog;
pub mod encoder;
pub mod engine;
pub mod similarity;
pub mod types;
