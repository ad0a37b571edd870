/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::io;

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStreamError;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: Use [`aws_sdk_s3::error::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// General categories of transfer errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Job input or configuration validation issues
    InputInvalid,

    /// The object store could not be reached or the connection failed mid-transfer
    Transport,

    /// Resource not found (e.g. bucket, key or file)
    NotFound,

    /// Access to the bucket, object or file was denied
    PermissionDenied,

    /// Downloaded content does not match the digest recorded at upload time
    ChecksumMismatch,

    /// Local I/O errors
    IOError,

    /// Anything that does not fit another category
    Unknown,
}

impl Error {
    /// Creates a new transfer [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::Transport => write!(f, "transport failure"),
            ErrorKind::NotFound => write!(f, "resource not found"),
            ErrorKind::PermissionDenied => write!(f, "permission denied"),
            ErrorKind::ChecksumMismatch => write!(f, "checksum mismatch"),
            ErrorKind::IOError => write!(f, "I/O error"),
            ErrorKind::Unknown => write!(f, "unexpected error"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        let kind = match value.kind() {
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::TimedOut => ErrorKind::Transport,
            io::ErrorKind::InvalidInput => ErrorKind::InputInvalid,
            // response bodies surface failures as `Other` wrapping the stream error
            _ if is_byte_stream_error(&value) => ErrorKind::Transport,
            _ => ErrorKind::IOError,
        };
        Self::new(kind, value)
    }
}

fn is_byte_stream_error(err: &io::Error) -> bool {
    err.get_ref().is_some_and(|inner| inner.is::<ByteStreamError>())
}

impl<E, R> From<SdkError<E, R>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: Send + Sync + fmt::Debug + 'static,
{
    fn from(value: SdkError<E, R>) -> Self {
        let kind = match &value {
            SdkError::ServiceError(_) => kind_from_code(value.code()),
            SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) | SdkError::ResponseError(_) => {
                ErrorKind::Transport
            }
            SdkError::ConstructionFailure(_) => ErrorKind::InputInvalid,
            _ => ErrorKind::Unknown,
        };

        Error::new(kind, value)
    }
}

fn kind_from_code(code: Option<&str>) -> ErrorKind {
    match code {
        Some("NotFound" | "NoSuchKey" | "NoSuchBucket") => ErrorKind::NotFound,
        Some(
            "AccessDenied"
            | "Forbidden"
            | "AllAccessDisabled"
            | "InvalidAccessKeyId"
            | "SignatureDoesNotMatch"
            | "ExpiredToken",
        ) => ErrorKind::PermissionDenied,
        Some("SlowDown" | "ServiceUnavailable" | "InternalError" | "RequestTimeout") => {
            ErrorKind::Transport
        }
        _ => ErrorKind::Unknown,
    }
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

pub(crate) fn not_found<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::NotFound, err)
}

pub(crate) fn checksum_mismatch<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::ChecksumMismatch, err)
}
