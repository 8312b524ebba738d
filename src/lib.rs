pub mod catalog;
pub mod fetch;
pub mod sort;
pub mod table;
