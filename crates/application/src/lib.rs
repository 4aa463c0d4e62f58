//! Ferrous Discovery Application Layer
pub mod ports;
pub mod services;
