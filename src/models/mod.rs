pub mod cluster_config;
pub mod seaweed;
pub mod workload_spec;
