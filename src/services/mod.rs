//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the login check and the relay policy so route
//! handlers can stay focused on request decoding and response shapes.

pub mod auth;
pub mod relay;
