pub mod identity;
pub mod index;
