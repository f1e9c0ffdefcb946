pub mod aggregator;
pub mod lexical;
pub mod matchers;
pub mod ranker;
pub mod weights;
