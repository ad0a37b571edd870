/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::str::FromStr;

use crate::error;

/// The kind of transfer a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Generate a payload and upload it to the object store
    #[default]
    Upload,

    /// Download an object into memory and hash it
    Download,

    /// Generate a payload and write it to the mounted filesystem
    FsxWrite,

    /// Read a file from the mounted filesystem and hash it
    FsxRead,
}

impl Direction {
    /// Canonical token for this direction
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Upload => "upload",
            Direction::Download => "download",
            Direction::FsxWrite => "fsx-write",
            Direction::FsxRead => "fsx-read",
        }
    }

    /// Whether this direction talks to the object store
    pub const fn uses_object_store(&self) -> bool {
        matches!(self, Direction::Upload | Direction::Download)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let direction = match s.to_ascii_lowercase().as_str() {
            "upload" | "put" => Direction::Upload,
            "download" | "get" => Direction::Download,
            "fsx-write" | "fsx_write" | "fsxwrite" => Direction::FsxWrite,
            "fsx-read" | "fsx_read" | "fsxread" => Direction::FsxRead,
            _ => {
                return Err(error::invalid_input(format!(
                    "unknown transfer direction '{s}' (expected one of upload, download, fsx-write, fsx-read)"
                )))
            }
        };

        Ok(direction)
    }
}

/// Bucket and key identifying an object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    bucket: String,
    key: String,
}

impl ObjectLocation {
    /// Create a new location
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// The bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The object key
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// A single transfer directive, usually built from the process arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferJob {
    direction: Direction,
    location: ObjectLocation,
}

impl TransferJob {
    /// Create a new job
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, direction: Direction) -> Self {
        Self {
            direction,
            location: ObjectLocation::new(bucket, key),
        }
    }

    /// The kind of transfer to perform
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Where the data lives
    pub fn location(&self) -> &ObjectLocation {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Direction, ObjectLocation};
    use crate::error::ErrorKind;

    #[test]
    fn test_direction_from_str() {
        let cases = [
            ("upload", Direction::Upload),
            ("PUT", Direction::Upload),
            ("download", Direction::Download),
            ("get", Direction::Download),
            ("fsx-write", Direction::FsxWrite),
            ("fsx_write", Direction::FsxWrite),
            ("FsxWrite", Direction::FsxWrite),
            ("fsx-read", Direction::FsxRead),
            ("fsxread", Direction::FsxRead),
        ];

        for (token, expected) in cases {
            assert_eq!(expected, Direction::from_str(token).unwrap(), "{token}");
        }

        let err = Direction::from_str("sideways").unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());
    }

    #[test]
    fn test_direction_display_is_parseable() {
        for d in [
            Direction::Upload,
            Direction::Download,
            Direction::FsxWrite,
            Direction::FsxRead,
        ] {
            assert_eq!(d, d.to_string().parse().unwrap());
        }
    }

    #[test]
    fn test_location_display() {
        let location = ObjectLocation::new("my-bucket", "data/key1");
        assert_eq!("s3://my-bucket/data/key1", location.to_string());
    }
}
