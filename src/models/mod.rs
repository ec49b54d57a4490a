pub mod person;

// Re-export commonly used types
pub use person::*;
