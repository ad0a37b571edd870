/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use async_trait::async_trait;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_smithy_types::body::SdkBody;

use super::{GetObjectOutput, ObjectStore, PutObjectInput, SHA256_METADATA_KEY};
use crate::checksum::Sha256Digest;
use crate::error::{self, Error};
use crate::io::body::ReaderBody;
use crate::io::DownloadReader;
use crate::types::ObjectLocation;
use crate::MEBIBYTE;

/// Size of the frames an upload body is sent in
const FRAME_SIZE: usize = MEBIBYTE as usize;

/// [`ObjectStore`] backed by Amazon S3.
///
/// Objects are written with a single `PutObject` request whose body is streamed from the
/// reader handed in, so every byte the SDK pulls passes through the caller's reader.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    /// Create a new store using the given S3 client
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(
        &self,
        location: &ObjectLocation,
        input: PutObjectInput,
    ) -> Result<(), Error> {
        let content_length = input.content_length();
        let content_length_i64 = i64::try_from(content_length).map_err(|_| {
            error::invalid_input(format!("content length {content_length} is invalid"))
        })?;
        let sha256 = input.sha256().copied();

        let body = ReaderBody::new(input.into_body(), content_length, FRAME_SIZE);
        let body = ByteStream::new(SdkBody::from_body_1_x(body));

        let mut request = self
            .client
            .put_object()
            .bucket(location.bucket())
            .key(location.key())
            .content_length(content_length_i64)
            .body(body);
        if let Some(digest) = sha256 {
            request = request.metadata(SHA256_METADATA_KEY, digest.to_string());
        }

        tracing::debug!(%location, content_length, "sending PutObject");
        let resp = request.send().await?;
        tracing::debug!(%location, e_tag = ?resp.e_tag(), "PutObject complete");
        Ok(())
    }

    async fn get_object(&self, location: &ObjectLocation) -> Result<GetObjectOutput, Error> {
        tracing::debug!(%location, "sending GetObject");
        let resp = self
            .client
            .get_object()
            .bucket(location.bucket())
            .key(location.key())
            .send()
            .await
            .map_err(|err| {
                // the modeled error may not carry an error code
                if err
                    .as_service_error()
                    .is_some_and(GetObjectError::is_no_such_key)
                {
                    error::not_found(err)
                } else {
                    Error::from(err)
                }
            })?;

        let sha256 = resp
            .metadata()
            .and_then(|metadata| metadata.get(SHA256_METADATA_KEY))
            .and_then(|value| match value.parse::<Sha256Digest>() {
                Ok(digest) => Some(digest),
                Err(err) => {
                    tracing::warn!(%location, %value, "ignoring malformed sha256 metadata: {err}");
                    None
                }
            });
        let content_length = resp.content_length().and_then(|len| u64::try_from(len).ok());

        let body: DownloadReader = Box::pin(resp.body.into_async_read());
        Ok(GetObjectOutput::new(body)
            .with_content_length(content_length)
            .with_sha256(sha256))
    }
}
