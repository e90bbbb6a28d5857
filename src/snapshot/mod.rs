pub mod element;
pub mod node;
pub mod parser;
