mod core;
pub mod analysis;
pub mod ast;
pub mod cmdline;
pub mod lexer;

pub use crate::core::errors::{self, RetcheckError};
pub use crate::core::Loc;
