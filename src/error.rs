use std::fmt;

#[derive(Debug)]
pub enum CaptureError {
    /// The requested capture rectangle is empty or inverted.
    InvalidRegion(String),

    /// No visible top-level window matched the selector.
    WindowNotFound(String),

    /// A screen or window device context could not be acquired.
    DcUnavailable(String),

    BlitFailed(String),

    PrintFailed(String),

    /// `GetDIBits` refused to copy the captured scan lines out.
    GetBitsFailed(String),

    CursorUnavailable(String),

    /// The OS reported a DPI of zero for the window.
    DpiUnavailable,

    EnumFailed(String),

    /// The window's class name could not be read. Carries the raw handle.
    ClassNameUnavailable(isize),

    /// The window's owning process id read back as zero.
    ProcessIdUnavailable(isize),

    /// The window's style word read back as zero, which this crate
    /// treats as a failed read.
    StyleUnavailable(isize),

    /// The engine has been closed; no further captures are possible.
    Closed,

    /// Size arithmetic overflowed while laying out a pixel buffer.
    BufferOverflow,

    InvalidBmp(String),

    /// The BMP header declares a compression scheme this decoder does
    /// not handle. Contains the raw compression field.
    UnsupportedCompression(u32),

    MalformedRle(String),

    Platform(anyhow::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureErrorClass {
    InvalidInput,
    Transient,
    Lifecycle,
    Fatal,
}

impl CaptureError {
    pub fn class(&self) -> CaptureErrorClass {
        match self {
            Self::InvalidRegion(_)
            | Self::WindowNotFound(_)
            | Self::InvalidBmp(_)
            | Self::UnsupportedCompression(_)
            | Self::MalformedRle(_) => CaptureErrorClass::InvalidInput,
            Self::DcUnavailable(_)
            | Self::BlitFailed(_)
            | Self::PrintFailed(_)
            | Self::GetBitsFailed(_)
            | Self::CursorUnavailable(_)
            | Self::DpiUnavailable
            | Self::EnumFailed(_)
            | Self::ClassNameUnavailable(_)
            | Self::ProcessIdUnavailable(_)
            | Self::StyleUnavailable(_) => CaptureErrorClass::Transient,
            Self::Closed => CaptureErrorClass::Lifecycle,
            Self::BufferOverflow | Self::Platform(_) => CaptureErrorClass::Fatal,
        }
    }

    /// Whether the same call is worth repeating. The engine never retries
    /// internally; this classifies failures for callers that do.
    pub fn is_retryable(&self) -> bool {
        matches!(self.class(), CaptureErrorClass::Transient)
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegion(detail) => write!(f, "invalid capture region: {detail}"),
            Self::WindowNotFound(selector) => {
                write!(f, "no visible window matched {selector}")
            }
            Self::DcUnavailable(which) => {
                write!(f, "failed to acquire device context for {which}")
            }
            Self::BlitFailed(detail) => write!(f, "screen blit failed: {detail}"),
            Self::PrintFailed(detail) => write!(f, "window print failed: {detail}"),
            Self::GetBitsFailed(detail) => {
                write!(f, "failed to read captured pixels: {detail}")
            }
            Self::CursorUnavailable(detail) => {
                write!(f, "failed to composite cursor: {detail}")
            }
            Self::DpiUnavailable => write!(f, "the OS reported a DPI of zero"),
            Self::EnumFailed(detail) => write!(f, "window enumeration failed: {detail}"),
            Self::ClassNameUnavailable(handle) => {
                write!(f, "failed to read class name of window {handle:#x}")
            }
            Self::ProcessIdUnavailable(handle) => {
                write!(f, "failed to read process id of window {handle:#x}")
            }
            Self::StyleUnavailable(handle) => {
                write!(f, "failed to read style of window {handle:#x}")
            }
            Self::Closed => write!(f, "the capture engine has been closed"),
            Self::BufferOverflow => write!(f, "pixel buffer size overflow"),
            Self::InvalidBmp(detail) => write!(f, "invalid BMP stream: {detail}"),
            Self::UnsupportedCompression(raw) => {
                write!(f, "unsupported BMP compression scheme {raw}")
            }
            Self::MalformedRle(detail) => write!(f, "malformed RLE stream: {detail}"),
            Self::Platform(inner) => write!(f, "{inner}"),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Platform(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

pub type CaptureResult<T> = Result<T, CaptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_step_failures_are_retryable() {
        assert!(CaptureError::BlitFailed("x".into()).is_retryable());
        assert!(CaptureError::DcUnavailable("screen".into()).is_retryable());
        assert!(CaptureError::DpiUnavailable.is_retryable());
    }

    #[test]
    fn caller_input_failures_are_not_retryable() {
        assert!(!CaptureError::InvalidRegion("empty".into()).is_retryable());
        assert!(!CaptureError::InvalidBmp("short".into()).is_retryable());
        assert_eq!(
            CaptureError::UnsupportedCompression(4).class(),
            CaptureErrorClass::InvalidInput
        );
    }

    #[test]
    fn closed_is_a_lifecycle_failure() {
        assert_eq!(CaptureError::Closed.class(), CaptureErrorClass::Lifecycle);
        assert!(!CaptureError::Closed.is_retryable());
    }
}
