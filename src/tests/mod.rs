// Test modules for fault-router crate
//
// Test organization follows the template pattern where each source file
// has a corresponding test file that focuses on business logic verification.

// Test helper utilities (recording sinks, terminators and reporters)
pub mod helpers;

pub mod manager;
