//! Shapes of the query strings and form bodies the browser sends, plus their conversions into
//! domain types

pub mod auth;
pub mod dashboard;
pub mod task;
