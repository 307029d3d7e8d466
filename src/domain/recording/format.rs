//! Encoder settings for recordings

/// Audio settings every recording is captured with.
/// AAC in an MPEG-4 container, matching the `.m4a` extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingFormat {
    /// Encoder bitrate in bits per second
    pub bitrate_bps: u32,
    /// Sample rate in Hz
    pub sample_rate_hz: u32,
    /// Channel count
    pub channels: u16,
}

impl RecordingFormat {
    /// AAC, 128 kbps, 44.1 kHz, mono
    pub const AAC_M4A: Self = Self {
        bitrate_bps: 128_000,
        sample_rate_hz: 44_100,
        channels: 1,
    };

    /// Bitrate in kbps as used by encoder command lines
    pub const fn bitrate_kbps(&self) -> u32 {
        self.bitrate_bps / 1000
    }
}

impl Default for RecordingFormat {
    fn default() -> Self {
        Self::AAC_M4A
    }
}
