pub mod unit;
pub mod color;
pub mod binop_registry;
