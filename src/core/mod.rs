pub mod errors;
mod loc;

pub use loc::Loc;
