//! Line parser for the "hero" scripting mini-language.
//!
//! Pure function boundary: script text plus an allow-list of command keys
//! in, a validated action list (or the first error) out. Execution belongs
//! to an external engine; nothing here performs I/O.

mod expr;
mod parser;

pub use expr::{eval_expr_concat, ExprError};
pub use parser::{parse_program, Action, Direction, ParsedAction, ScriptError};
