//! Shared core of the weather dashboard
//!
//! Widget and template models, the climate catalogue, season resolution, seasonal
//! recommendations and the template merge algorithm, plus the dashboard controller that
//! ties them to a persistence port. Used by the backend and, through WASM, the browser.

pub mod catalog;
pub mod clock;
pub mod composition;
pub mod dashboard;
pub mod models;
pub mod recommendation;
pub mod season;
pub mod types;
pub mod validation;

pub use catalog::*;
pub use clock::*;
pub use composition::*;
pub use dashboard::*;
pub use models::*;
pub use recommendation::*;
pub use season::*;
pub use types::*;
pub use validation::*;
