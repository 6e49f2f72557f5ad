//! Buffer set for packet I/O.

/// Buffers owned by a connection.
pub struct BufferSet {
    /// Payload of the last packet read (continuation frames joined)
    pub read_buffer: Vec<u8>,
    /// Outgoing packet: 4-byte header followed by payload
    pub write_buffer: Vec<u8>,
}

impl BufferSet {
    /// Create a new buffer set.
    pub fn new() -> Self {
        Self {
            read_buffer: Vec::with_capacity(8192),
            write_buffer: Vec::with_capacity(64),
        }
    }
}

impl Default for BufferSet {
    fn default() -> Self {
        Self::new()
    }
}
