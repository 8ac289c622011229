use std::fmt;
use thiserror::Error;

/// Fixed numeric codes carried by initialization failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum VRErrorCode {
    Critical,
    Render,
    NotInitialized,
    NoHmd,
    Unknown,
}

impl VRErrorCode {
    pub fn value(self) -> u32 {
        match self {
            VRErrorCode::Critical => 0x0DEA_D60D,
            VRErrorCode::Render => 0x05AD_E60D,
            VRErrorCode::NotInitialized => 0x0207_760D,
            VRErrorCode::NoHmd => 0x0B12_D60D,
            VRErrorCode::Unknown => 0x0200_760D,
        }
    }
}

impl fmt::Display for VRErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#09X}", self.value())
    }
}

/// Fatal failure while bringing up a runtime session or its render resources.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("VR initialization failed ({code}): {message}")]
pub struct VRInitError {
    pub code: VRErrorCode,
    pub message: String,
}

impl VRInitError {
    pub fn new<S: Into<String>>(code: VRErrorCode, message: S) -> VRInitError {
        VRInitError {
            code,
            message: message.into(),
        }
    }

    pub fn critical<S: Into<String>>(message: S) -> VRInitError {
        VRInitError::new(VRErrorCode::Critical, message)
    }

    pub fn render<S: Into<String>>(message: S) -> VRInitError {
        VRInitError::new(VRErrorCode::Render, message)
    }

    pub fn no_hmd<S: Into<String>>(message: S) -> VRInitError {
        VRInitError::new(VRErrorCode::NoHmd, message)
    }

    pub fn not_initialized<S: Into<String>>(message: S) -> VRInitError {
        VRInitError::new(VRErrorCode::NotInitialized, message)
    }
}

/// Recoverable failure of a per-frame or teardown call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VRError {
    #[error("input state unavailable for the {0} hand")]
    InputUnavailable(&'static str),

    #[error("unknown swap chain {0}")]
    UnknownSwapChain(u32),

    #[error("unknown mirror texture {0}")]
    UnknownMirrorTexture(u32),

    #[error("{eye} eye already committed for frame {frame_index}")]
    DoubleCommit { eye: &'static str, frame_index: u64 },

    #[error("{0} eye buffer is not ready")]
    BufferNotReady(&'static str),

    #[error("failed to release {resource}: {message}")]
    ReleaseFailed { resource: String, message: String },

    #[error("runtime call {call} failed: {message}")]
    RuntimeCall { call: &'static str, message: String },

    #[error("engine failure: {0}")]
    Engine(String),

    #[error("operation not supported by the {0} runtime")]
    Unsupported(&'static str),
}

impl VRError {
    pub fn runtime_call<S: Into<String>>(call: &'static str, message: S) -> VRError {
        VRError::RuntimeCall {
            call,
            message: message.into(),
        }
    }
}

pub type VRResult<T> = std::result::Result<T, VRError>;
pub type VRInitResult<T> = std::result::Result<T, VRInitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_keep_their_values() {
        assert_eq!(VRErrorCode::Critical.value(), 0xDEAD60D);
        assert_eq!(VRErrorCode::Render.value(), 0x5ADE60D);
        assert_eq!(VRErrorCode::NotInitialized.value(), 0x207760D);
        assert_eq!(VRErrorCode::NoHmd.value(), 0xB12D60D);
        assert_eq!(VRErrorCode::Unknown.value(), 0x200760D);
    }

    #[test]
    fn init_error_message_carries_code() {
        let err = VRInitError::no_hmd("no headset connected");
        let text = err.to_string();
        assert!(text.contains("0xB12D60D"), "{}", text);
        assert!(text.contains("no headset connected"));
    }
}
