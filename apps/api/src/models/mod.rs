pub mod candidate;
pub mod document;
pub mod job;
pub mod match_result;
