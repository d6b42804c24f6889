pub mod ast;
pub mod error;
pub mod stack;
pub mod token;
pub mod types;

pub use ast::*;
pub use error::*;
pub use token::*;
pub use types::*;
