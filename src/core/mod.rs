// File: src/core/mod.rs
pub mod decompose;
pub mod engine;
pub mod jamo;
pub mod tables;
pub mod types;
