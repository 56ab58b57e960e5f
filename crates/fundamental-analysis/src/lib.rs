mod engine;
mod history;
pub mod scorers;
mod scoring;


pub use engine::*;
pub use history::*;
pub use scoring::{render_summary, Scores, LABEL_SEPARATOR};
