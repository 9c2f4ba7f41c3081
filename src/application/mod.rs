// Application layer - Use cases and repository ports
pub mod analytics_repository;
pub mod dashboard_service;
pub mod section_adapters;
pub mod section_board;
pub mod streaming_service;
