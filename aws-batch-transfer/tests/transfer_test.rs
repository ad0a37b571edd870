/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use async_trait::async_trait;
use aws_batch_transfer::checksum::Sha256Digest;
use aws_batch_transfer::error::{Error, ErrorKind};
use aws_batch_transfer::io::Payload;
use aws_batch_transfer::store::{GetObjectOutput, InMemoryStore, ObjectStore, PutObjectInput};
use aws_batch_transfer::types::{Direction, ObjectLocation, TransferJob};
use aws_batch_transfer::Client;
use aws_smithy_runtime::test_util::capture_test_logs::capture_test_logs;
use test_common::{small_config, test_location, TEST_BLOCK_SIZE, TEST_PAYLOAD_SIZE};
use tokio::io::AsyncReadExt;

const SEED: u64 = 19_590_414;

/// Wraps an in-memory store, reporting a different digest than the one stored
#[derive(Debug, Clone)]
struct TamperedDigestStore(InMemoryStore);

#[async_trait]
impl ObjectStore for TamperedDigestStore {
    async fn put_object(
        &self,
        location: &ObjectLocation,
        input: PutObjectInput,
    ) -> Result<(), Error> {
        self.0.put_object(location, input).await
    }

    async fn get_object(&self, location: &ObjectLocation) -> Result<GetObjectOutput, Error> {
        let output = self.0.get_object(location).await?;
        Ok(output.with_sha256(Some(Sha256Digest::of(b"something else"))))
    }
}

/// Accepts part of an upload body before the connection "resets"
#[derive(Debug)]
struct FailingStore {
    fail_after: u64,
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn put_object(
        &self,
        _location: &ObjectLocation,
        input: PutObjectInput,
    ) -> Result<(), Error> {
        let mut body = input.into_body().take(self.fail_after);
        let mut sink = Vec::new();
        body.read_to_end(&mut sink).await?;
        Err(Error::new(ErrorKind::Transport, "connection reset by peer"))
    }

    async fn get_object(&self, _location: &ObjectLocation) -> Result<GetObjectOutput, Error> {
        Err(Error::new(ErrorKind::Transport, "connection reset by peer"))
    }
}

#[tokio::test]
async fn test_upload_stores_generated_payload() {
    let store = InMemoryStore::new();
    let client = Client::new(small_config().seed(SEED).store(store.clone()).build());
    let location = test_location();

    let output = client.upload(&location).await.unwrap();

    let expected = Payload::generate(SEED, TEST_BLOCK_SIZE, TEST_PAYLOAD_SIZE).unwrap();
    let stored = store.get(&location).await.unwrap();
    assert_eq!(TEST_PAYLOAD_SIZE, stored.len() as u64);
    assert_eq!(expected.sha256(), Sha256Digest::of(&stored));
    assert_eq!(&expected.sha256(), output.sha256());
    assert_eq!(TEST_PAYLOAD_SIZE, output.bytes_transferred());
    assert_eq!(Direction::Upload, output.direction());
    assert_eq!("s3://my-bucket/data/key1", output.target());
    assert!(output.summary().completed());
}

#[tokio::test]
async fn test_upload_then_download_round_trip() {
    let client = Client::new(small_config().store(InMemoryStore::new()).build());
    let location = test_location();

    let uploaded = client
        .run(&TransferJob::new("my-bucket", "data/key1", Direction::Upload))
        .await
        .unwrap();
    let downloaded = client.download(&location).await.unwrap();

    assert_eq!(uploaded.sha256(), downloaded.sha256());
    assert_eq!(TEST_PAYLOAD_SIZE, downloaded.bytes_transferred());
    assert_eq!(Direction::Download, downloaded.direction());
}

#[tokio::test]
async fn test_same_seed_same_digest() {
    let first = Client::new(small_config().seed(7).store(InMemoryStore::new()).build());
    let second = Client::new(small_config().seed(7).store(InMemoryStore::new()).build());
    let other = Client::new(small_config().seed(8).store(InMemoryStore::new()).build());
    let location = test_location();

    let a = first.upload(&location).await.unwrap();
    let b = second.upload(&location).await.unwrap();
    let c = other.upload(&location).await.unwrap();
    assert_eq!(a.sha256(), b.sha256());
    assert_ne!(a.sha256(), c.sha256());
}

#[tokio::test]
async fn test_upload_reports_progress() {
    let (_guard, rx) = capture_test_logs();
    let client = Client::new(small_config().store(InMemoryStore::new()).build());
    client.upload(&test_location()).await.unwrap();

    let logs = rx.contents();
    // 5 MiB payload with a 1 MiB threshold
    assert_eq!(5, logs.matches("transferred ").count(), "{logs}");
    assert_eq!(1, logs.matches("transfer finished [completed]").count());
    assert!(logs.contains("5242880 bytes uploaded to s3://my-bucket/data/key1"));
}

#[tokio::test]
async fn test_download_missing_key() {
    let (_guard, rx) = capture_test_logs();
    let client = Client::new(small_config().store(InMemoryStore::new()).build());

    let err = client
        .download(&ObjectLocation::new("my-bucket", "missing/key"))
        .await
        .unwrap_err();

    assert_eq!(&ErrorKind::NotFound, err.kind());
    let logs = rx.contents();
    assert_eq!(1, logs.matches("transfer finished [aborted]").count(), "{logs}");
}

#[tokio::test]
async fn test_download_checksum_mismatch() {
    let store = TamperedDigestStore(InMemoryStore::new());
    let client = Client::new(small_config().store(store).build());
    let location = test_location();
    client.upload(&location).await.unwrap();

    let err = client.download(&location).await.unwrap_err();
    assert_eq!(&ErrorKind::ChecksumMismatch, err.kind());
}

#[tokio::test]
async fn test_download_without_recorded_digest() {
    let store = InMemoryStore::new();
    let location = test_location();
    store.insert(location.clone(), &b"hello world"[..]).await;
    let client = Client::new(small_config().store(store).build());

    let output = client.download(&location).await.unwrap();
    assert_eq!(11, output.bytes_transferred());
    assert_eq!(
        "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
        output.sha256().to_string()
    );
}

#[tokio::test]
async fn test_summary_logged_once_when_upload_fails() {
    let (_guard, rx) = capture_test_logs();
    let store = FailingStore {
        fail_after: 2 * 1024 * 1024 + 10,
    };
    let client = Client::new(small_config().store(store).build());

    let err = client.upload(&test_location()).await.unwrap_err();
    assert_eq!(&ErrorKind::Transport, err.kind());

    let logs = rx.contents();
    assert_eq!(1, logs.matches("transfer finished").count(), "{logs}");
    assert!(logs.contains("transfer finished [aborted]"), "{logs}");
    // progress was still reported for the bytes that made it out
    assert_eq!(2, logs.matches("transferred ").count(), "{logs}");
}

#[tokio::test]
async fn test_missing_store() {
    let client = Client::new(small_config().build());

    let err = client.upload(&test_location()).await.unwrap_err();
    assert_eq!(&ErrorKind::InputInvalid, err.kind());
    let err = client.download(&test_location()).await.unwrap_err();
    assert_eq!(&ErrorKind::InputInvalid, err.kind());
}

#[tokio::test]
async fn test_invalid_block_size() {
    let client = Client::new(
        small_config()
            .block_size(1000)
            .store(InMemoryStore::new())
            .build(),
    );

    let err = client.upload(&test_location()).await.unwrap_err();
    assert_eq!(&ErrorKind::InputInvalid, err.kind());
}
