pub mod code_generator;

pub use code_generator::{CODE_ALPHABET, CodeGenerator, GeneratorPolicy, is_valid_code};
