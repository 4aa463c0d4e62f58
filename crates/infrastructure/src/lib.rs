//! Ferrous Discovery Infrastructure Layer
pub mod directory;
