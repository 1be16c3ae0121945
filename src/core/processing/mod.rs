pub mod analyzer;
pub mod plan;
pub mod probe;
pub mod scan;
