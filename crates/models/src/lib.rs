pub mod catalog;
pub mod offering;
pub mod recommendation;
pub mod schedule;
