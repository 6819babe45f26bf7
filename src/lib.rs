//! Front office for a small house-cleaning business: clients, scheduled jobs,
//! invoices and supplies, run from the terminal.

pub mod app;
pub mod dashboard;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod seed;
pub mod services;
pub mod session;
pub mod settings;
pub mod validation;
pub mod views;
