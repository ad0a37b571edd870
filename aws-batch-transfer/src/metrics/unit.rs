/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::{fmt, str::FromStr};

use crate::error;

/// Binary byte units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteUnit {
    /// 1 byte
    Byte,
    /// 2<sup>10</sup> bytes.
    Kibibyte,
    /// 2<sup>20</sup> bytes.
    Mebibyte,
    /// 2<sup>30</sup> bytes.
    Gibibyte,
}

impl ByteUnit {
    /// Convert some number of bytes into this unit as an `f64`
    pub fn convert(&self, bytes: u64) -> f64 {
        bytes as f64 / self.as_bytes_u64() as f64
    }

    /// Figure out the best unit to display the given number of bytes in
    /// and return a [`ByteCountDisplayContext`] with the appropriate units set
    pub fn display(total_bytes: u64) -> ByteCountDisplayContext {
        let unit = [ByteUnit::Gibibyte, ByteUnit::Mebibyte, ByteUnit::Kibibyte]
            .into_iter()
            .find(|u| total_bytes >= u.as_bytes_u64())
            .unwrap_or(ByteUnit::Byte);

        ByteCountDisplayContext::new(total_bytes, unit)
    }

    /// The number of bytes represented by this unit
    pub const fn as_bytes_u64(&self) -> u64 {
        match self {
            ByteUnit::Byte => 1,
            ByteUnit::Kibibyte => 1 << 10,
            ByteUnit::Mebibyte => 1 << 20,
            ByteUnit::Gibibyte => 1 << 30,
        }
    }

    pub(crate) const fn as_str(&self) -> &'static str {
        match self {
            ByteUnit::Byte => "B",
            ByteUnit::Kibibyte => "KiB",
            ByteUnit::Mebibyte => "MiB",
            ByteUnit::Gibibyte => "GiB",
        }
    }
}

impl FromStr for ByteUnit {
    type Err = error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s {
            "B" => ByteUnit::Byte,
            "KiB" => ByteUnit::Kibibyte,
            "MiB" => ByteUnit::Mebibyte,
            "GiB" => ByteUnit::Gibibyte,
            _ => return Err(error::invalid_input(format!("unknown byte unit '{s}'"))),
        };

        Ok(unit)
    }
}

/// Parse a byte count such as `1048576`, `512KiB` or `3.5GiB`.
///
/// Fractional values are only accepted with a unit suffix and are truncated to whole bytes.
pub fn parse_byte_count(s: &str) -> Result<u64, error::Error> {
    let s = s.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, suffix) = s.split_at(split);
    let suffix = suffix.trim();

    if suffix.is_empty() {
        return number
            .parse::<u64>()
            .map_err(|err| error::invalid_input(format!("invalid byte count '{s}': {err}")));
    }

    let unit = ByteUnit::from_str(suffix)?;
    let value = number
        .parse::<f64>()
        .map_err(|err| error::invalid_input(format!("invalid byte count '{s}': {err}")))?;
    let bytes = value * unit.as_bytes_u64() as f64;
    if !bytes.is_finite() || bytes < 0.0 || bytes > u64::MAX as f64 {
        return Err(error::invalid_input(format!("byte count '{s}' out of range")));
    }

    Ok(bytes as u64)
}

/// Display context to format a value representing number of bytes in a particular unit
#[derive(Debug)]
pub struct ByteCountDisplayContext {
    /// The number of bytes to display
    pub total_bytes: u64,
    /// The precise unit to display the count as
    pub unit: ByteUnit,
}

impl ByteCountDisplayContext {
    /// Create a new display context for the number of bytes in a specific unit
    pub fn new(total_bytes: u64, unit: ByteUnit) -> Self {
        Self { total_bytes, unit }
    }
}

impl fmt::Display for ByteCountDisplayContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total_bytes % self.unit.as_bytes_u64() == 0 {
            let converted = self.total_bytes / self.unit.as_bytes_u64();
            return write!(f, "{converted} {}", self.unit.as_str());
        }
        let precision = f.precision().unwrap_or(3);
        write!(
            f,
            "{1:.*} {2:}",
            precision,
            self.unit.convert(self.total_bytes),
            self.unit.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{parse_byte_count, ByteCountDisplayContext, ByteUnit};

    #[test]
    fn test_from_str() {
        for u in &[
            ByteUnit::Byte,
            ByteUnit::Kibibyte,
            ByteUnit::Mebibyte,
            ByteUnit::Gibibyte,
        ] {
            assert_eq!(*u, ByteUnit::from_str(u.as_str()).unwrap());
        }

        assert!(ByteUnit::from_str("kb").is_err());
    }

    #[test]
    fn test_parse_byte_count() {
        assert_eq!(1048576, parse_byte_count("1048576").unwrap());
        assert_eq!(512 * 1024, parse_byte_count("512KiB").unwrap());
        assert_eq!(5 * 1024 * 1024, parse_byte_count("5 MiB").unwrap());
        assert_eq!(3584 * 1024 * 1024, parse_byte_count("3.5GiB").unwrap());
        assert_eq!(7, parse_byte_count("7B").unwrap());

        assert!(parse_byte_count("").is_err());
        assert!(parse_byte_count("1.5").is_err());
        assert!(parse_byte_count("12 parsecs").is_err());
        assert!(parse_byte_count("-1MiB").is_err());
    }

    #[test]
    fn test_byte_display_context() {
        assert_eq!("1 KiB", format!("{}", ByteUnit::display(1024)));
        assert_eq!("1 MiB", format!("{}", ByteUnit::display(1024 * 1024)));
        assert_eq!("727 B", format!("{}", ByteUnit::display(727)));
        assert_eq!("3.420 KiB", format!("{}", ByteUnit::display(3502)));
        assert_eq!("7.201 MiB", format!("{}", ByteUnit::display(7550498)));
        assert_eq!(
            "1040.690 MiB",
            format!(
                "{}",
                ByteCountDisplayContext::new(1091242563, ByteUnit::Mebibyte)
            )
        );
    }
}
