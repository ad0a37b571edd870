/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tokio::sync::RwLock;

use super::{GetObjectOutput, ObjectStore, PutObjectInput};
use crate::checksum::Sha256Digest;
use crate::error::{self, Error, ErrorKind};
use crate::types::ObjectLocation;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    sha256: Option<Sha256Digest>,
}

/// [`ObjectStore`] keeping every object in process memory.
///
/// Clones share the same underlying objects.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    objects: Arc<RwLock<HashMap<ObjectLocation, StoredObject>>>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the content stored under `location`
    pub async fn get(&self, location: &ObjectLocation) -> Option<Bytes> {
        let objects = self.objects.read().await;
        objects.get(location).map(|o| o.data.clone())
    }

    /// Store `data` under `location` without recording a digest
    pub async fn insert(&self, location: ObjectLocation, data: impl Into<Bytes>) {
        let mut objects = self.objects.write().await;
        objects.insert(
            location,
            StoredObject {
                data: data.into(),
                sha256: None,
            },
        );
    }

    /// Returns true if nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn put_object(
        &self,
        location: &ObjectLocation,
        input: PutObjectInput,
    ) -> Result<(), Error> {
        let content_length = input.content_length();
        let sha256 = input.sha256().copied();
        let mut body = input.into_body();

        let mut data = Vec::new();
        body.read_to_end(&mut data).await?;
        if data.len() as u64 != content_length {
            return Err(Error::new(
                ErrorKind::IOError,
                format!(
                    "body length {} does not match content length {content_length}",
                    data.len()
                ),
            ));
        }

        let mut objects = self.objects.write().await;
        objects.insert(
            location.clone(),
            StoredObject {
                data: data.into(),
                sha256,
            },
        );
        Ok(())
    }

    async fn get_object(&self, location: &ObjectLocation) -> Result<GetObjectOutput, Error> {
        let objects = self.objects.read().await;
        let object = objects
            .get(location)
            .ok_or_else(|| error::not_found(format!("NoSuchKey: {location}")))?;

        Ok(GetObjectOutput::new(Box::pin(Cursor::new(object.data.clone())))
            .with_content_length(Some(object.data.len() as u64))
            .with_sha256(object.sha256))
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;

    use super::InMemoryStore;
    use crate::error::ErrorKind;
    use crate::store::{ObjectStore, PutObjectInput};
    use crate::types::ObjectLocation;

    #[tokio::test]
    async fn test_put_get() {
        let store = InMemoryStore::new();
        let location = ObjectLocation::new("bucket", "key");
        let input = PutObjectInput::new(Box::pin(&b"some data"[..]), 9);
        store.put_object(&location, input).await.unwrap();

        let output = store.get_object(&location).await.unwrap();
        assert_eq!(Some(9), output.content_length());
        assert!(output.sha256().is_none());

        let mut data = Vec::new();
        output.into_body().read_to_end(&mut data).await.unwrap();
        assert_eq!(b"some data", data.as_slice());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryStore::new();
        let err = store
            .get_object(&ObjectLocation::new("bucket", "missing"))
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::NotFound, err.kind());
    }

    #[tokio::test]
    async fn test_put_length_mismatch() {
        let store = InMemoryStore::new();
        let location = ObjectLocation::new("bucket", "key");
        let input = PutObjectInput::new(Box::pin(&b"short"[..]), 10);
        let err = store.put_object(&location, input).await.unwrap_err();

        assert_eq!(&ErrorKind::IOError, err.kind());
        assert!(store.is_empty().await);
    }
}
