pub mod ast;
pub mod token;
pub mod lexer;
pub mod signature;
