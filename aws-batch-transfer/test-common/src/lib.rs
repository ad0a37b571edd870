/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_batch_transfer::types::ObjectLocation;
use aws_sdk_s3::config::Region;
use aws_smithy_mocks_experimental::{MockResponseInterceptor, Rule, RuleMode};
use aws_smithy_types::body::SdkBody;

/// Payload size used by most tests
pub const TEST_PAYLOAD_SIZE: u64 = 5 * 1024 * 1024;

/// Block size used by most tests
pub const TEST_BLOCK_SIZE: usize = 64 * 1024;

/// Report threshold used by most tests
pub const TEST_REPORT_THRESHOLD: u64 = 1024 * 1024;

/// Create an S3 client whose responses come from `rules`.
///
/// Requests never leave the process, the HTTP client answers every request with an empty
/// `200 OK` that the mock interceptor replaces.
pub fn mock_s3_client(rules: &[&Rule]) -> aws_sdk_s3::Client {
    let mut interceptor = MockResponseInterceptor::new().rule_mode(RuleMode::MatchAny);
    for rule in rules {
        interceptor = interceptor.with_rule(rule);
    }

    let http_client = aws_smithy_http_client::test_util::infallible_client_fn(|_req| {
        http::Response::builder()
            .status(200)
            .body(SdkBody::empty())
            .unwrap()
    });

    let config = aws_sdk_s3::Config::builder()
        .with_test_defaults()
        .region(Region::from_static("us-east-1"))
        .http_client(http_client)
        .interceptor(interceptor)
        .build();
    aws_sdk_s3::Client::from_conf(config)
}

/// Config builder with a small payload suitable for tests
pub fn small_config() -> aws_batch_transfer::config::Builder {
    aws_batch_transfer::Config::builder()
        .payload_size(TEST_PAYLOAD_SIZE)
        .block_size(TEST_BLOCK_SIZE)
        .report_threshold(TEST_REPORT_THRESHOLD)
        .read_buffer_size(256 * 1024)
}

/// Location used by the round trip tests
pub fn test_location() -> ObjectLocation {
    ObjectLocation::new("my-bucket", "data/key1")
}

/// Create a temporary directory standing in for the FSx mount
pub fn fsx_dir() -> tempfile::TempDir {
    tempfile::Builder::new().prefix("fsx").tempdir().unwrap()
}
