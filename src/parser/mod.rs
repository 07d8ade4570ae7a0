pub mod errors;
pub mod parse;
pub mod statement;

pub use errors::ParseError;
pub use parse::parse;
pub use statement::{Argument, Span, Statement};
