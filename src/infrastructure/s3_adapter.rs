use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::domain::{error::FetchError, ports::ObjectStore};

/// Object-storage byte source over S3. Path-style addressing, one GetObject
/// per fetch, body buffered fully before returning.
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient AWS environment, honoring
    /// `AWS_ENDPOINT_URL` for LocalStack-style deployments.
    pub async fn from_env() -> Self {
        debug!("Loading AWS configuration");
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Ok(endpoint_url) = std::env::var("AWS_ENDPOINT_URL") {
            info!("Using custom AWS endpoint: {}", endpoint_url);
            config_loader = config_loader.endpoint_url(&endpoint_url);
        }

        let aws_config = config_loader.load().await;
        debug!("AWS region: {:?}", aws_config.region());

        let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
            .force_path_style(true)
            .build();

        Self::new(Client::from_conf(s3_config))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        let location = format!("s3://{}/{}", bucket, key);
        debug!("Issuing GetObject for {}", location);

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify_get_object_error(&location, e))?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| FetchError::Io(format!("{}: body stream failed: {}", location, e)))?;

        Ok(body.into_bytes().to_vec())
    }
}

fn classify_get_object_error<E, R>(location: &str, err: SdkError<E, R>) -> FetchError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
{
    match &err {
        SdkError::ServiceError(context) => {
            let service_err = context.err();
            match service_err.code() {
                Some("NoSuchKey") | Some("NoSuchBucket") => {
                    FetchError::NotFound(location.to_string())
                }
                Some("AccessDenied")
                | Some("InvalidAccessKeyId")
                | Some("SignatureDoesNotMatch")
                | Some("ExpiredToken") => FetchError::Auth(format!(
                    "{}: {}",
                    location,
                    service_err.message().unwrap_or("access denied")
                )),
                _ => FetchError::Io(format!("{}: {:?}", location, service_err)),
            }
        }
        _ => FetchError::Io(format!("{}: {}", location, err)),
    }
}
