//! OCI registry pull and layer extraction.
//!
//! Templates published as OCI artifacts carry their file tree in the image
//! layers. Every layer is an (optionally gzip-compressed) tar stream;
//! layers are unpacked in order, so later layers overwrite earlier ones.

use std::io::Cursor;
use std::path::Path;

use flate2::read::GzDecoder;
use oci_distribution::client::{ClientConfig, ClientProtocol};
use oci_distribution::manifest::{
    IMAGE_DOCKER_LAYER_GZIP_MEDIA_TYPE, IMAGE_DOCKER_LAYER_TAR_MEDIA_TYPE,
    IMAGE_LAYER_GZIP_MEDIA_TYPE, IMAGE_LAYER_MEDIA_TYPE,
};
use oci_distribution::secrets::RegistryAuth;
use oci_distribution::{Client, Reference};
use tracing::{debug, info};

use crate::error::{SourceError, SourceResult};

/// Layer media type used by published devcontainer artifacts.
pub const DEVCONTAINER_LAYER_MEDIA_TYPE: &str = "application/vnd.devcontainers.layer.v1+tar";

const ACCEPTED_MEDIA_TYPES: &[&str] = &[
    IMAGE_LAYER_MEDIA_TYPE,
    IMAGE_LAYER_GZIP_MEDIA_TYPE,
    IMAGE_DOCKER_LAYER_TAR_MEDIA_TYPE,
    IMAGE_DOCKER_LAYER_GZIP_MEDIA_TYPE,
    DEVCONTAINER_LAYER_MEDIA_TYPE,
];

/// OCI registry client for pulling template artifacts.
pub struct OciClient {
    client: Client,
}

impl Default for OciClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OciClient {
    /// Create a new client with default configuration.
    pub fn new() -> Self {
        let config = ClientConfig {
            protocol: ClientProtocol::Https,
            ..Default::default()
        };
        Self {
            client: Client::new(config),
        }
    }

    /// Pull `reference` and unpack every layer into `dest`, in layer order.
    pub async fn pull_template(&self, reference: &Reference, dest: &Path) -> SourceResult<()> {
        info!(reference = %reference.whole(), "pulling OCI template");

        let auth = registry_auth(reference);
        let image = self
            .client
            .pull(reference, &auth, ACCEPTED_MEDIA_TYPES.to_vec())
            .await
            .map_err(|e| SourceError::pull_failed(reference.whole(), e.to_string()))?;

        debug!(
            reference = %reference.whole(),
            layer_count = image.layers.len(),
            "pulled image"
        );

        for layer in &image.layers {
            extract_layer(&layer.media_type, &layer.data, dest)
                .map_err(|e| SourceError::pull_failed(reference.whole(), e.to_string()))?;
        }

        Ok(())
    }
}

/// Authentication for a registry. Anonymous, except ghcr.io where a token
/// from the environment is used when present.
fn registry_auth(reference: &Reference) -> RegistryAuth {
    if reference.registry() == "ghcr.io" {
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            return RegistryAuth::Basic(String::new(), token);
        }
        if let Ok(token) = std::env::var("GH_TOKEN") {
            return RegistryAuth::Basic(String::new(), token);
        }
    }

    RegistryAuth::Anonymous
}

/// Unpack a single layer tar stream, decompressing when the media type says
/// the layer is gzip-compressed.
fn extract_layer(media_type: &str, data: &[u8], dest: &Path) -> std::io::Result<()> {
    if media_type.ends_with("gzip") {
        let mut archive = tar::Archive::new(GzDecoder::new(Cursor::new(data)));
        archive.unpack(dest)
    } else {
        let mut archive = tar::Archive::new(Cursor::new(data));
        archive.unpack(dest)
    }
}
