//! LineCook: a hierarchical task outline rendered as a Gantt chart.
//!
//! The interesting part is [`outline`], which derives effective date ranges
//! for every task from explicit dates and descendants, and turns them into a
//! week-aligned timeline. [`store`] and [`api`] persist the outline and serve
//! it over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod outline;
pub mod render;
pub mod store;
