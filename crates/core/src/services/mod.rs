pub mod alignment_service;
pub mod axis_service;
pub mod commit_service;
pub mod interpolation_service;
pub mod render_service;
pub mod viewport_service;
pub mod window_analytics_service;
