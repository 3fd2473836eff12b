pub mod acquisition_service;
pub mod chart_service;
pub mod regression_service;
