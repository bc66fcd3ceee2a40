/// Port the volume server serves data and `/status` on.
pub const VOLUME_HTTP_PORT: i32 = 8444;
/// Internal port of the volume server (gRPC), always HTTP port + 10000.
pub const VOLUME_GRPC_PORT: i32 = 18444;
pub const VOLUME_PORT_NAME: &str = "swfs-volume";
pub const VOLUME_GRPC_PORT_NAME: &str = "swfs-volume-grpc";

/// Port masters accept volume server registrations on.
pub const MASTER_PORT: i32 = 9333;
pub const DEFAULT_MASTER_COUNT: i32 = 3;

pub const CONTAINER_NAME: &str = "seaweedfs";
pub const IMAGE_PULL_POLICY: &str = "IfNotPresent";

pub const HEALTH_CHECK_PATH: &str = "/status";

pub const READINESS_INITIAL_DELAY_SECONDS: i32 = 15;
pub const READINESS_FAILURE_THRESHOLD: i32 = 100;

pub const LIVENESS_INITIAL_DELAY_SECONDS: i32 = 20;
pub const LIVENESS_FAILURE_THRESHOLD: i32 = 6;

// shared by both probes
pub const PROBE_TIMEOUT_SECONDS: i32 = 5;
pub const PROBE_PERIOD_SECONDS: i32 = 90;
pub const PROBE_SUCCESS_THRESHOLD: i32 = 1;
