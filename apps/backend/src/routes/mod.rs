//! HTTP route handlers

pub mod auth;
pub mod dictionaries;
pub mod statistics;
pub mod training;
pub mod users;
pub mod words;
