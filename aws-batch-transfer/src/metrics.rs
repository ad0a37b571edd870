/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::time::Duration;

/// Units of measurement
pub mod unit;

mod tracker;

pub use self::tracker::{ThroughputTracker, TransferGuard, TransferSummary};

/// Measured bytes transferred over some duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    bytes_transferred: u64,
    elapsed: Duration,
}

impl Throughput {
    /// Create a new throughput measurement with the given bytes transferred and time elapsed
    pub const fn new(bytes_transferred: u64, elapsed: Duration) -> Throughput {
        Throughput {
            bytes_transferred,
            elapsed,
        }
    }

    /// Convert this throughput into a specific unit per second
    ///
    /// A measurement over a zero duration reports zero.
    pub fn as_unit_per_sec(&self, unit: unit::ByteUnit) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        unit.convert(self.bytes_transferred) / secs
    }

    /// Returns a type that can be used to format/display this throughput in a particular unit
    pub fn display_as(&self, unit: unit::ByteUnit) -> ThroughputDisplayContext<'_> {
        ThroughputDisplayContext {
            throughput: self,
            unit,
        }
    }
}

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_as(unit::ByteUnit::Mebibyte), f)
    }
}

/// Display context to format throughput in a particular unit
#[derive(Debug)]
pub struct ThroughputDisplayContext<'a> {
    /// The throughput measurement to display
    pub throughput: &'a Throughput,
    /// The precise unit to display the throughput as
    pub unit: unit::ByteUnit,
}

impl fmt::Display for ThroughputDisplayContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(3);
        write!(
            f,
            "{1:.*} {2:}/s",
            precision,
            self.throughput.as_unit_per_sec(self.unit),
            self.unit.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::unit::ByteUnit;
    use super::Throughput;

    #[test]
    fn test_throughput_display() {
        let t = Throughput::new(10 * 1024 * 1024, Duration::from_secs(4));
        assert_eq!("2.500 MiB/s", format!("{t}"));
        assert_eq!("2.5 MiB/s", format!("{:.1}", t.display_as(ByteUnit::Mebibyte)));
        assert_eq!("2560.000 KiB/s", format!("{}", t.display_as(ByteUnit::Kibibyte)));
        assert_eq!(
            "0.00244 GiB/s",
            format!("{:.5}", t.display_as(ByteUnit::Gibibyte))
        );
    }

    #[test]
    fn test_zero_elapsed() {
        let t = Throughput::new(1024, Duration::ZERO);
        assert_eq!(0.0, t.as_unit_per_sec(ByteUnit::Byte));
    }
}
