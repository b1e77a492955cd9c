pub mod normalizer;
mod porter;
pub mod stopwords;

pub use normalizer::normalize;
