//! Desired-state generation for the volume servers of SeaweedFS clusters.

pub mod controllers;
pub mod health;
pub mod models;
pub mod utils;
pub mod workloads;
