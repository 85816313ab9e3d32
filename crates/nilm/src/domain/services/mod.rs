//! Domain Services
//!
//! Pure computations over domain entities: the prompt context summary,
//! the dashboard overview and recommendation rules, and prompt assembly.

mod context_summarizer;
mod dashboard;
mod number_format;
mod prompt;

pub use context_summarizer::*;
pub use dashboard::*;
pub use number_format::*;
pub use prompt::*;
