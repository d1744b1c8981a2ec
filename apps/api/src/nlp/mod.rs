// Text normalization and skill alias expansion shared by profile extraction and matching.
// Everything here is pure and total: no I/O, no errors.

pub mod normalize;
pub mod variants;

pub use normalize::{contains_phrase, normalize, tokens};
pub use variants::{token_variants, variants};
