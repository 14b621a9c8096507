pub mod analytics;
pub mod datasource;
pub mod template;
