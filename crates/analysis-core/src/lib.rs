pub mod error;
pub mod normalize;
pub mod traits;
pub mod types;

pub use error::*;
pub use normalize::{clamp_score, delta, normalize, round2, Breakpoints, NEUTRAL_SCORE};
pub use traits::*;
pub use types::*;
