//! Typed client, state container and reference server for the class roll
//! REST API (`/api/class-entities`, `/api/students`).
//!
//! The heart of the crate is [`store::EntityStore`]: one instance per entity
//! type tracks list/detail/write operations against its resource and exposes
//! the `loading` / `updating` / `update_success` / `error_message` flags a
//! view renders from.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod entity;
pub mod logging;
pub mod mvi;
pub mod server;
pub mod store;
