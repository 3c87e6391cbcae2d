//! Session gate and login client
//!
//! Every page load passes through [`SessionGate::on_page_load`] before any
//! other handler runs. The gate either redirects or wires the login form /
//! logout control of the page.

mod client;
mod gate;

pub use client::{Credentials, HttpLoginClient, LoginClient, GENERIC_LOGIN_ERROR};
pub use gate::{LoginOutcome, PageGate, SessionGate};
