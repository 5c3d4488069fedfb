// SPDX-License-Identifier: Apache-2.0

use std::{
    error,
    fmt::{Debug, Display},
    io,
};

/// Failures when unwrapping a certificate data object into plain DER.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CertFormatError {
    /// The leading tag is unknown or names a format this crate does not
    /// interpret (e.g. the USB Type-C certificate chain). Carries the tag,
    /// or `None` when the object was empty.
    UnsupportedFormat(Option<u8>),

    /// The object claims to be a TLS certificate chain envelope but is too
    /// short, or the embedded certificate is not DER-tagged.
    MalformedEnvelope {
        /// Length of the object that was handed in.
        len: usize,
    },
}

impl error::Error for CertFormatError {}

impl Display for CertFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat(Some(tag)) => {
                write!(f, "Unsupported certificate format (tag {tag:#04x}).")
            }
            Self::UnsupportedFormat(None) => write!(f, "Empty certificate data object."),
            Self::MalformedEnvelope { len } => write!(
                f,
                "Malformed TLS certificate chain envelope ({len} bytes)."
            ),
        }
    }
}

/// Failures when decoding the metadata of a data object.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetadataError {
    /// The metadata does not start with the `0x20` constructed tag.
    InvalidTag(u8),

    /// The declared length runs past the end of the buffer.
    Truncated,

    /// An entry carries a value of a length that is not allowed for its tag.
    InvalidLength {
        /// Entry tag.
        tag: u8,
        /// Declared value length.
        len: usize,
    },

    /// The same tag shows up twice.
    Duplicate(u8),
}

impl error::Error for MetadataError {}

impl Display for MetadataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(tag) => write!(f, "Invalid metadata tag {tag:#04x}, expected 0x20."),
            Self::Truncated => write!(f, "Metadata is truncated."),
            Self::InvalidLength { tag, len } => {
                write!(f, "Metadata entry {tag:#04x} has invalid length {len}.")
            }
            Self::Duplicate(tag) => write!(f, "Metadata entry {tag:#04x} is repeated."),
        }
    }
}

/// The chip's response status could not be matched against a known code.
#[derive(Debug)]
pub enum Indeterminate<T: Debug> {
    /// The error condition is known.
    Known(T),

    /// The error condition is unknown.
    Unknown(u16),
}

/// Error conditions reported by the secure element or by the transport
/// underneath it.
#[derive(Debug)]
#[repr(u16)]
pub enum Error {
    /// Something went wrong when talking to the chip (I2C, driver, ...).
    IoError(io::Error),

    /// The object id is not known to the chip.
    InvalidOid = 0x8001,

    /// The parameter field of the command is invalid.
    InvalidParamField = 0x8004,

    /// The length field of the command is invalid.
    InvalidLengthField = 0x8005,

    /// A parameter in the data field is invalid.
    InvalidParameterInDataField = 0x8006,

    /// An internal chip process failed.
    InternalProcessError = 0x8007,

    /// Access conditions of the object are not satisfied.
    AccessConditionsNotSatisfied = 0x8008,

    /// The sum of offset and length exceeds the size of the data object.
    DataObjectBoundaryExceeded = 0x8009,

    /// Metadata does not fit into the object.
    MetadataTruncation = 0x800A,

    /// The command field is invalid.
    InvalidCommandField = 0x800B,

    /// The command was issued out of sequence.
    CommandOutOfSequence = 0x800C,

    /// The command is not available.
    CommandNotAvailable = 0x800D,

    /// The chip ran out of memory.
    InsufficientMemory = 0x800E,

    /// A monotonic counter reached its threshold.
    CounterThresholdExceeded = 0x800F,

    /// The certificate format is invalid.
    InvalidCertificateFormat = 0x8029,

    /// The certificate uses an unsupported algorithm.
    UnsupportedCertificateAlgorithm = 0x802A,

    /// A signature did not verify.
    SignatureVerificationFailure = 0x802C,
}

impl Error {
    /// The raw status code, if this error corresponds to one.
    pub fn code(&self) -> Option<u16> {
        match self {
            Error::IoError(_) => None,
            Error::InvalidOid => Some(0x8001),
            Error::InvalidParamField => Some(0x8004),
            Error::InvalidLengthField => Some(0x8005),
            Error::InvalidParameterInDataField => Some(0x8006),
            Error::InternalProcessError => Some(0x8007),
            Error::AccessConditionsNotSatisfied => Some(0x8008),
            Error::DataObjectBoundaryExceeded => Some(0x8009),
            Error::MetadataTruncation => Some(0x800A),
            Error::InvalidCommandField => Some(0x800B),
            Error::CommandOutOfSequence => Some(0x800C),
            Error::CommandNotAvailable => Some(0x800D),
            Error::InsufficientMemory => Some(0x800E),
            Error::CounterThresholdExceeded => Some(0x800F),
            Error::InvalidCertificateFormat => Some(0x8029),
            Error::UnsupportedCertificateAlgorithm => Some(0x802A),
            Error::SignatureVerificationFailure => Some(0x802C),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let err_description = match self {
            Error::IoError(_) => "I/O Error",
            Error::InvalidOid => "Invalid object id",
            Error::InvalidParamField => "Invalid parameter field",
            Error::InvalidLengthField => "Invalid length field",
            Error::InvalidParameterInDataField => "Invalid parameter in data field",
            Error::InternalProcessError => "Internal process error",
            Error::AccessConditionsNotSatisfied => "Access conditions not satisfied",
            Error::DataObjectBoundaryExceeded => "Data object boundary exceeded",
            Error::MetadataTruncation => "Metadata truncation error",
            Error::InvalidCommandField => "Invalid command field",
            Error::CommandOutOfSequence => "Command out of sequence",
            Error::CommandNotAvailable => "Command not available",
            Error::InsufficientMemory => "Insufficient buffer or memory",
            Error::CounterThresholdExceeded => "Counter threshold limit exceeded",
            Error::InvalidCertificateFormat => "Invalid certificate format",
            Error::UnsupportedCertificateAlgorithm => "Unsupported certificate algorithm",
            Error::SignatureVerificationFailure => "Signature verification failure",
        };
        write!(f, "{err_description}")
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    #[inline]
    fn from(error: io::Error) -> Error {
        Error::IoError(error)
    }
}

impl error::Error for Indeterminate<Error> {}

impl Display for Indeterminate<Error> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let error = match self {
            Indeterminate::Known(error) => format!("Known Error: {error}"),
            Indeterminate::Unknown(code) => format!("Unknown Error Encountered: {code:#06x}"),
        };

        write!(f, "{error}")
    }
}

impl From<io::Error> for Indeterminate<Error> {
    #[inline]
    fn from(error: io::Error) -> Indeterminate<Error> {
        Indeterminate::Known(error.into())
    }
}

impl From<Error> for Indeterminate<Error> {
    #[inline]
    fn from(error: Error) -> Indeterminate<Error> {
        Indeterminate::Known(error)
    }
}

impl From<Indeterminate<Error>> for io::Error {
    #[inline]
    fn from(indeterminate: Indeterminate<Error>) -> io::Error {
        match indeterminate {
            Indeterminate::Known(Error::IoError(e)) => e,
            Indeterminate::Known(e) => io::Error::new(io::ErrorKind::Other, e),
            Indeterminate::Unknown(code) => io::Error::new(
                io::ErrorKind::Other,
                format!("unknown OPTIGA error {code:#06x}"),
            ),
        }
    }
}

impl From<u16> for Indeterminate<Error> {
    #[inline]
    fn from(code: u16) -> Indeterminate<Error> {
        Indeterminate::Known(match code {
            0x8001 => Error::InvalidOid,
            0x8004 => Error::InvalidParamField,
            0x8005 => Error::InvalidLengthField,
            0x8006 => Error::InvalidParameterInDataField,
            0x8007 => Error::InternalProcessError,
            0x8008 => Error::AccessConditionsNotSatisfied,
            0x8009 => Error::DataObjectBoundaryExceeded,
            0x800A => Error::MetadataTruncation,
            0x800B => Error::InvalidCommandField,
            0x800C => Error::CommandOutOfSequence,
            0x800D => Error::CommandNotAvailable,
            0x800E => Error::InsufficientMemory,
            0x800F => Error::CounterThresholdExceeded,
            0x8029 => Error::InvalidCertificateFormat,
            0x802A => Error::UnsupportedCertificateAlgorithm,
            0x802C => Error::SignatureVerificationFailure,
            _ => return Indeterminate::Unknown(code),
        })
    }
}

/// Wrapper error for everything the session and toolbox APIs can hit.
#[derive(Debug)]
pub enum UserApiError {
    /// The chip or its transport reported an error.
    DeviceError(Indeterminate<Error>),

    /// A certificate data object could not be unwrapped.
    FormatError(CertFormatError),

    /// Object metadata could not be decoded.
    MetadataError(MetadataError),

    /// Reading or writing host files failed.
    IoError(io::Error),

    /// Certificate, key or signature handling failed on the host.
    CryptoError(String),

    /// The device reported more bytes than the buffer it was given.
    BufferOverflow {
        /// Length reported by the device.
        reported: usize,
        /// Capacity of the buffer handed to the device.
        capacity: usize,
    },

    /// An argument was rejected before reaching the chip.
    InvalidArgument(&'static str),
}

impl error::Error for UserApiError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::DeviceError(device_error) => Some(device_error),
            Self::FormatError(format_error) => Some(format_error),
            Self::MetadataError(metadata_error) => Some(metadata_error),
            Self::IoError(io_error) => Some(io_error),
            Self::CryptoError(_) | Self::BufferOverflow { .. } | Self::InvalidArgument(_) => None,
        }
    }
}

impl Display for UserApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let err_msg: String = match self {
            Self::DeviceError(error) => format!("Device Error Encountered: {error}"),
            Self::FormatError(error) => format!("Certificate Format Error Encountered: {error}"),
            Self::MetadataError(error) => format!("Metadata Error Encountered: {error}"),
            Self::IoError(error) => format!("I/O Error Encountered: {error}"),
            Self::CryptoError(msg) => format!("Crypto Error Encountered: {msg}"),
            Self::BufferOverflow { reported, capacity } => format!(
                "Buffer overflow prevented: device reported {reported} bytes for a {capacity} byte buffer."
            ),
            Self::InvalidArgument(msg) => format!("Invalid argument: {msg}"),
        };
        write!(f, "{err_msg}")
    }
}

impl From<Indeterminate<Error>> for UserApiError {
    fn from(device_error: Indeterminate<Error>) -> Self {
        Self::DeviceError(device_error)
    }
}

impl From<Error> for UserApiError {
    fn from(device_error: Error) -> Self {
        Self::DeviceError(Indeterminate::Known(device_error))
    }
}

impl From<CertFormatError> for UserApiError {
    fn from(format_error: CertFormatError) -> Self {
        Self::FormatError(format_error)
    }
}

impl From<MetadataError> for UserApiError {
    fn from(metadata_error: MetadataError) -> Self {
        Self::MetadataError(metadata_error)
    }
}

impl From<io::Error> for UserApiError {
    fn from(io_error: io::Error) -> Self {
        Self::IoError(io_error)
    }
}
