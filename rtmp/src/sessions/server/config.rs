/// The configuration options that govern how a RTMP server session should operate
#[derive(Clone, Debug, PartialEq)]
pub struct ServerSessionConfig {
    /// Reported to the client as `fmsVer` in the connect response
    pub fms_version: String,

    /// Reported to the client as `capabilities` in the connect response
    pub capabilities: u32,

    /// Outbound chunk size announced once the client connects
    pub chunk_size: u32,

    /// How many bytes the client may send before it has to acknowledge
    pub window_ack_size: u32,

    pub peer_bandwidth: u32,

    /// The message stream id handed out by `createStream`
    pub stream_id: u32,
}

impl ServerSessionConfig {
    /// Creates a new server session config with overridable defaults
    pub fn new() -> ServerSessionConfig {
        ServerSessionConfig {
            fms_version: "FMS/3,0,1,123".to_string(),
            capabilities: 31,
            chunk_size: 1024,
            window_ack_size: 2_500_000,
            peer_bandwidth: 2_500_000,
            stream_id: 1,
        }
    }
}

impl Default for ServerSessionConfig {
    fn default() -> Self {
        ServerSessionConfig::new()
    }
}
