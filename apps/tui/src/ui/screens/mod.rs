pub mod document;
pub mod help;
pub mod map;
pub mod setlists;
