//! Text processing modules
//!
//! - Script conversion (traditional to simplified)
//! - Text normalization (script, width, case)

mod converter;
mod normalizer;

pub use converter::{default_converter, ScriptConverter, TableConverter, T2S_DICT_ENV};
pub use normalizer::{
    full_width_to_half, to_half_width_char, NormalizationOptions, NormalizationOverrides,
    TextNormalizer,
};
