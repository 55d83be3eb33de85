mod core;
mod output;

pub use self::core::{App, Outcome, MISSING_ARGS_ERROR};
pub use output::render_result;
