pub mod extractor;
pub mod normalize;
pub mod rules;
pub mod vocabulary;
