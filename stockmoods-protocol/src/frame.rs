//! Byte framing for the companion link.
//!
//! Frame format:
//! - START (1 byte): 0xAA synchronization byte
//! - LENGTH (1 byte): payload length (0-250)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-250 bytes): type-specific data
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE, and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Bytes a frame adds around its payload (START, LENGTH, TYPE, CHECKSUM)
pub const FRAME_OVERHEAD: usize = 4;

/// Maximum encoded frame size
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;

/// Errors raised while framing or unframing link traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Length byte out of range
    InvalidLength,
    /// Frame type or payload does not describe a known message
    InvalidFrame,
    /// Output buffer too small for encoding
    BufferTooSmall,
}

/// One unit of link traffic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

/// XOR checksum over the length, type and payload bytes
fn checksum(length: u8, msg_type: u8, payload: &[u8]) -> u8 {
    payload.iter().fold(length ^ msg_type, |acc, &b| acc ^ b)
}

impl Frame {
    /// Build a frame, copying the payload
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Build a frame with no payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    /// Number of bytes [`Frame::encode`] will write
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    /// Encode into `out`, returning the number of bytes written
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.encoded_len();
        if out.len() < len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        let body_end = 3 + self.payload.len();

        out[0] = FRAME_START;
        out[1] = length;
        out[2] = self.msg_type;
        out[3..body_end].copy_from_slice(&self.payload);
        out[body_end] = checksum(length, self.msg_type, &self.payload);

        Ok(len)
    }

    /// Encode into a fixed-capacity vector
    pub fn to_bytes(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut bytes = Vec::new();
        bytes
            .resize_default(self.encoded_len())
            .map_err(|_| FrameError::BufferTooSmall)?;
        self.encode(&mut bytes)?;
        Ok(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Hunting for START
    Sync,
    /// Got START, next byte is LENGTH
    Length,
    /// Got LENGTH, next byte is TYPE
    Type,
    /// Collecting payload bytes
    Payload,
    /// Next byte is CHECKSUM
    Checksum,
}

/// Incremental frame decoder fed one UART byte at a time
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    length: u8,
    msg_type: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub const fn new() -> Self {
        Self {
            state: ParseState::Sync,
            length: 0,
            msg_type: 0,
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame and wait for the next START byte
    pub fn reset(&mut self) {
        self.state = ParseState::Sync;
        self.length = 0;
        self.msg_type = 0;
        self.payload.clear();
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(frame))` when a frame completes, `Ok(None)` while more
    /// bytes are needed. On error the parser has already resynchronised.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::Sync => {
                // Line noise between frames is skipped silently
                if byte == FRAME_START {
                    self.state = ParseState::Length;
                }
            }
            ParseState::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidLength);
                }
                self.length = byte;
                self.state = ParseState::Type;
            }
            ParseState::Type => {
                self.msg_type = byte;
                self.payload.clear();
                self.state = if self.length == 0 {
                    ParseState::Checksum
                } else {
                    ParseState::Payload
                };
            }
            ParseState::Payload => {
                // Capacity is guaranteed by the LENGTH check above
                let _ = self.payload.push(byte);
                if self.payload.len() == self.length as usize {
                    self.state = ParseState::Checksum;
                }
            }
            ParseState::Checksum => {
                let expected = checksum(self.length, self.msg_type, &self.payload);
                if byte != expected {
                    self.reset();
                    return Err(FrameError::InvalidChecksum);
                }
                let frame = Frame {
                    msg_type: self.msg_type,
                    payload: core::mem::take(&mut self.payload),
                };
                self.reset();
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Feed bytes until the first complete frame
    ///
    /// Bytes after that frame are left unconsumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// True while a frame is partially received
    pub fn in_frame(&self) -> bool {
        self.state != ParseState::Sync
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_empty_frame() {
        let frame = Frame::empty(0x31);
        let mut buf = [0u8; 8];
        let len = frame.encode(&mut buf).unwrap();

        assert_eq!(len, 4);
        assert_eq!(&buf[..4], &[FRAME_START, 0, 0x31, 0x31]);
    }

    #[test]
    fn test_encode_with_payload() {
        let frame = Frame::new(0x30, &[7, 1, 0]).unwrap();
        let bytes = frame.to_bytes().unwrap();

        assert_eq!(bytes.len(), 7);
        assert_eq!(bytes[1], 3); // length
        assert_eq!(bytes[2], 0x30); // type
        assert_eq!(&bytes[3..6], &[7, 1, 0]);
        assert_eq!(bytes[6], 3 ^ 0x30 ^ 7 ^ 1);
    }

    #[test]
    fn test_buffer_too_small() {
        let frame = Frame::new(0x10, &[1, 2, 3]).unwrap();
        let mut buf = [0u8; 6];
        assert_eq!(frame.encode(&mut buf), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_parse_encoded_frame() {
        let original = Frame::new(0x10, b"GOOG").unwrap();
        let bytes = original.to_bytes().unwrap();

        let mut parser = FrameParser::new();
        let parsed = parser.feed_bytes(&bytes).unwrap().unwrap();
        assert_eq!(parsed, original);
        assert!(!parser.in_frame());
    }

    #[test]
    fn test_bad_checksum_resyncs() {
        let mut bytes = Frame::new(0x11, &[4]).unwrap().to_bytes().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x5A;

        let mut parser = FrameParser::new();
        assert_eq!(parser.feed_bytes(&bytes), Err(FrameError::InvalidChecksum));

        // Next good frame still parses
        let good = Frame::empty(0x11).to_bytes().unwrap();
        assert_eq!(parser.feed_bytes(&good).unwrap().unwrap().msg_type, 0x11);
    }

    #[test]
    fn test_oversize_length_rejected() {
        let mut parser = FrameParser::new();
        parser.feed(FRAME_START).unwrap();
        assert_eq!(parser.feed(251), Err(FrameError::InvalidLength));
        assert!(!parser.in_frame());
    }

    #[test]
    fn test_garbage_before_frame_skipped() {
        let frame = Frame::new(0x12, &[3, 2]).unwrap().to_bytes().unwrap();
        let mut data = Vec::<u8, 32>::new();
        data.extend_from_slice(&[0x00, 0x13, 0xFF]).unwrap();
        data.extend_from_slice(&frame).unwrap();

        let mut parser = FrameParser::new();
        let parsed = parser.feed_bytes(&data).unwrap().unwrap();
        assert_eq!(parsed.msg_type, 0x12);
        assert_eq!(&parsed.payload[..], &[3, 2]);
    }

    #[test]
    fn test_payload_too_large() {
        let big = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(Frame::new(0x10, &big), Err(FrameError::PayloadTooLarge));
    }

    proptest! {
        #[test]
        fn parser_survives_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..600)) {
            let mut parser = FrameParser::new();
            for b in bytes {
                let _ = parser.feed(b);
            }
        }

        #[test]
        fn encoded_frames_parse_back(msg_type in any::<u8>(), payload in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE)) {
            let frame = Frame::new(msg_type, &payload).unwrap();
            let bytes = frame.to_bytes().unwrap();
            let mut parser = FrameParser::new();
            prop_assert_eq!(parser.feed_bytes(&bytes).unwrap(), Some(frame));
        }
    }
}
