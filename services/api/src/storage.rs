//! Object storage for place images

use anyhow::Result;
use aws_sdk_s3::{Client, primitives::ByteStream};
use tracing::info;
use uuid::Uuid;

/// Stored object and the URL visitors load it from
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub key: String,
    pub url: String,
}

/// Uploads place images to an S3-compatible bucket
#[derive(Clone)]
pub struct ImageStore {
    client: Client,
    bucket: String,
    public_url: Option<String>,
}

impl ImageStore {
    /// Create a new image store. `public_url` is the base URL objects are
    /// served from; without it the AWS virtual-hosted URL is used.
    pub fn new(client: Client, bucket: String, public_url: Option<String>) -> Self {
        Self {
            client,
            bucket,
            public_url: public_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// Key for a new image of a place: `places/{place_id}/{uuid}.{ext}`
    pub fn object_key(place_id: Uuid, extension: &str) -> String {
        format!("places/{}/{}.{}", place_id, Uuid::new_v4(), extension)
    }

    pub fn public_url(&self, key: &str) -> String {
        match &self.public_url {
            Some(base) => format!("{}/{}/{}", base, self.bucket, key),
            None => format!("https://{}.s3.amazonaws.com/{}", self.bucket, key),
        }
    }

    /// Upload image bytes for a place
    pub async fn upload(
        &self,
        place_id: Uuid,
        extension: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredImage> {
        let key = Self::object_key(place_id, extension);
        info!("Uploading place image to S3: {}", key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await?;

        let url = self.public_url(&key);
        Ok(StoredImage { key, url })
    }
}
