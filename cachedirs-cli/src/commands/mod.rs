pub mod apply;
pub mod compile;
pub mod input;
pub mod service;
