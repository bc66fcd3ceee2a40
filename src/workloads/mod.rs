pub mod constants;
pub mod labels;
pub mod volume_server;
pub mod volume_service;
