//! API Routes

pub mod describe;
pub mod form;
pub mod predict;
