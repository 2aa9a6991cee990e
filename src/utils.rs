use std::{env, path::Path};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

use crate::{config::ModelSource, error::DownloadError};

async fn download_file(url: &str, path: &str) -> Result<(), DownloadError> {
    tracing::info!(%url, %path, "downloading model");

    let mut header_map = HeaderMap::new();

    if let Ok(token) = env::var("GITHUB_TOKEN") {
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| DownloadError::InvalidToken)?;
        header_map.insert(AUTHORIZATION, auth_value);
    }
    header_map.insert(ACCEPT, HeaderValue::from_static("application/octet-stream"));

    let request_error = |source| DownloadError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .headers(header_map)
        .send()
        .await
        .map_err(request_error)?;

    if !response.status().is_success() {
        return Err(DownloadError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let bytes = response.bytes().await.map_err(request_error)?;

    if let Some(parent) = Path::new(path).parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| DownloadError::Write {
                path: path.to_string(),
                source,
            })?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| DownloadError::Write {
            path: path.to_string(),
            source,
        })
}

/// Makes sure every model graph is present locally, fetching missing ones.
pub async fn ensure_files_exist(sources: &[&ModelSource]) -> Result<(), DownloadError> {
    tracing::info!("checking models");
    for source in sources {
        if Path::new(&source.path).exists() {
            continue;
        }
        let url = source.url.as_deref().ok_or_else(|| DownloadError::MissingUrl {
            path: source.path.clone(),
            var: source.url_var,
        })?;
        download_file(url, &source.path).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn present_files_need_no_url() {
        let source = ModelSource {
            path: "Cargo.toml".into(),
            url: None,
            url_var: "LEAF_MODEL_URL",
        };
        assert!(ensure_files_exist(&[&source]).await.is_ok());
    }

    #[tokio::test]
    async fn missing_file_without_url_is_an_error() {
        let source = ModelSource {
            path: "./does/not/exist.pb".into(),
            url: None,
            url_var: "PALM_MODEL_URL",
        };
        let err = ensure_files_exist(&[&source]).await.unwrap_err();
        assert!(matches!(err, DownloadError::MissingUrl { var: "PALM_MODEL_URL", .. }));
    }
}
