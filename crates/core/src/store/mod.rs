pub mod traits;

// Settings store implementations
pub mod memory;
pub mod rest;
