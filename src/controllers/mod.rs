pub mod volume_server;
