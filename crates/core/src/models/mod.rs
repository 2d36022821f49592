pub mod analytics;
pub mod axis;
pub mod chart;
pub mod config;
pub mod series;
pub mod settings;
pub mod table;
pub mod viewport;
