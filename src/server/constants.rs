/// First line written to stdout, telling the host shim how to talk to us.
pub const HANDSHAKE: &str = "BUNNYCDN_PROVIDER|1|stdio";

/// Responses buffered before request tasks wait on the writer.
pub const RESPONSE_BUFFER: usize = 64;
