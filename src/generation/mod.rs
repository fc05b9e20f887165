/// Edition loop: DNA retries, decoding, drawing and output
pub mod engine;
/// Per-edition draw order permutation
pub mod scramble;
