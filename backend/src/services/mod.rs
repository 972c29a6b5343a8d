//! Business logic services for the weather dashboard

pub mod climate;
pub mod dashboard;
pub mod template;

pub use climate::ClimateService;
pub use dashboard::DashboardService;
pub use template::TemplateService;
