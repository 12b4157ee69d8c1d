//! Socket tunables, applied by the runtime layer at construction.
//!
//! Mirrors libzmq's socket options; a zero value means "unlimited" or
//! "disabled" depending on the option, documented per field below.

/// Socket configuration tunables.
///
/// # Examples
///
/// ```
/// use ironmq_core::settings::Settings;
///
/// let settings = Settings::default()
///     .with_send_high_water(200)
///     .with_inactivity_seconds(10);
/// assert_eq!(settings.send_high_water(), 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    send_high_water: u32,
    receive_high_water: u32,
    message_size_limit: u64,
    handshake_seconds: u32,
    ping_seconds: u32,
    inactivity_seconds: u32,
    reconnect_seconds: u32,
    send_milliseconds: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            send_high_water: 100,
            receive_high_water: 100,
            message_size_limit: 0,
            handshake_seconds: 30,
            ping_seconds: 0,
            inactivity_seconds: 0,
            reconnect_seconds: 1,
            send_milliseconds: 0,
        }
    }
}

impl Settings {
    /// Maximum buffered outbound messages. Zero means unlimited.
    #[must_use]
    pub fn send_high_water(&self) -> u32 {
        self.send_high_water
    }

    /// Maximum buffered inbound messages. Zero means unlimited.
    #[must_use]
    pub fn receive_high_water(&self) -> u32 {
        self.receive_high_water
    }

    /// Maximum single message size, in bytes. Zero means unlimited.
    #[must_use]
    pub fn message_size_limit(&self) -> u64 {
        self.message_size_limit
    }

    /// Deadline for the initial peer handshake, in seconds. Zero means
    /// unlimited.
    #[must_use]
    pub fn handshake_seconds(&self) -> u32 {
        self.handshake_seconds
    }

    /// Heartbeat ping interval, in seconds. Zero disables heartbeating.
    #[must_use]
    pub fn ping_seconds(&self) -> u32 {
        self.ping_seconds
    }

    /// Heartbeat timeout, in seconds. Zero disables the timeout.
    #[must_use]
    pub fn inactivity_seconds(&self) -> u32 {
        self.inactivity_seconds
    }

    /// Client reconnect ceiling, in seconds. Zero disables reconnection.
    #[must_use]
    pub fn reconnect_seconds(&self) -> u32 {
        self.reconnect_seconds
    }

    /// Blocking send deadline, in milliseconds. Zero means unlimited.
    #[must_use]
    pub fn send_milliseconds(&self) -> u32 {
        self.send_milliseconds
    }

    /// Set the send high-water mark.
    #[must_use]
    pub fn with_send_high_water(mut self, value: u32) -> Self {
        self.send_high_water = value;
        self
    }

    /// Set the receive high-water mark.
    #[must_use]
    pub fn with_receive_high_water(mut self, value: u32) -> Self {
        self.receive_high_water = value;
        self
    }

    /// Set the maximum message size, in bytes.
    #[must_use]
    pub fn with_message_size_limit(mut self, value: u64) -> Self {
        self.message_size_limit = value;
        self
    }

    /// Set the handshake deadline, in seconds.
    #[must_use]
    pub fn with_handshake_seconds(mut self, value: u32) -> Self {
        self.handshake_seconds = value;
        self
    }

    /// Set the heartbeat ping interval, in seconds.
    #[must_use]
    pub fn with_ping_seconds(mut self, value: u32) -> Self {
        self.ping_seconds = value;
        self
    }

    /// Set the heartbeat timeout, in seconds.
    #[must_use]
    pub fn with_inactivity_seconds(mut self, value: u32) -> Self {
        self.inactivity_seconds = value;
        self
    }

    /// Set the reconnect ceiling, in seconds.
    #[must_use]
    pub fn with_reconnect_seconds(mut self, value: u32) -> Self {
        self.reconnect_seconds = value;
        self
    }

    /// Set the blocking send deadline, in milliseconds.
    #[must_use]
    pub fn with_send_milliseconds(mut self, value: u32) -> Self {
        self.send_milliseconds = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_implementation() {
        let settings = Settings::default();
        assert_eq!(settings.send_high_water(), 100);
        assert_eq!(settings.receive_high_water(), 100);
        assert_eq!(settings.handshake_seconds(), 30);
        assert_eq!(settings.reconnect_seconds(), 1);
        assert_eq!(settings.message_size_limit(), 0);
        assert_eq!(settings.ping_seconds(), 0);
        assert_eq!(settings.inactivity_seconds(), 0);
        assert_eq!(settings.send_milliseconds(), 0);
    }

    #[test]
    fn builder_methods_chain() {
        let settings = Settings::default()
            .with_send_high_water(5)
            .with_reconnect_seconds(0);
        assert_eq!(settings.send_high_water(), 5);
        assert_eq!(settings.reconnect_seconds(), 0);
    }
}
