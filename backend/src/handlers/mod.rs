//! HTTP handlers for the weather dashboard API

pub mod climate;
pub mod dashboard;
pub mod health;
pub mod templates;

pub use climate::*;
pub use dashboard::*;
pub use health::*;
pub use templates::*;
