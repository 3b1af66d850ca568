//! Document processors

pub mod document;
