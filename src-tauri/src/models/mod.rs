pub mod catalog;
pub mod classify_types;
pub mod locale;
