//! Server-rendered admin dashboard for the Loomworks store.
//!
//! The dashboard holds no data of its own. Every page is a thin view over
//! the store API: the admin logs in once, the bearer token is persisted in
//! a local session file, and each request is authenticated with it. When
//! the API stops honoring the token the session is dropped and the admin
//! lands back on the login page.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
