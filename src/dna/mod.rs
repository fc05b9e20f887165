/// Per-edition weighted selection with exclusion and fairness rules
pub mod generator;
/// Structural binding and positional replay parsing of DNA
pub mod parser;
/// Seeded random draws and weighted selection
pub mod selection;
/// Tagged DNA tokens and their string form
pub mod token;
/// Set of accepted DNA with a bounded collision budget
pub mod uniqueness;
