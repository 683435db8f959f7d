use futures::FutureExt;

pub trait ScreenshotStorage: Send + Sync {
    fn duplicate(&self) -> Box<dyn ScreenshotStorage>;

    /// Stores the object and returns its public url.
    fn store<'f, 'own>(
        &'own self,
        path: String,
        content: Vec<u8>,
    ) -> futures::future::BoxFuture<'f, Result<String, String>>
    where
        'own: 'f;

    /// Best effort removal, returns the paths that could not be removed
    /// together with the error.
    fn delete<'f, 'own>(
        &'own self,
        paths: Vec<String>,
    ) -> futures::future::BoxFuture<'f, Vec<(String, String)>>
    where
        'own: 'f;

    /// Maps a public url back to the object path. None for urls that do not
    /// belong to this storage, which includes the manual/daily sentinel
    /// literals persisted in `screenshot_url`.
    fn object_path(&self, url: &str) -> Option<String>;
}

pub struct FileStorage {
    folder: std::sync::Arc<std::path::PathBuf>,
    public_base: String,
}

impl FileStorage {
    pub fn new<P, IS>(folder: P, public_base: IS) -> Self
    where
        P: Into<std::path::PathBuf>,
        IS: Into<String>,
    {
        Self {
            folder: std::sync::Arc::new(folder.into()),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }
}

impl ScreenshotStorage for FileStorage {
    fn duplicate(&self) -> Box<dyn ScreenshotStorage> {
        Box::new(Self {
            folder: self.folder.clone(),
            public_base: self.public_base.clone(),
        })
    }

    fn store<'f, 'own>(
        &'own self,
        path: String,
        content: Vec<u8>,
    ) -> futures::future::BoxFuture<'f, Result<String, String>>
    where
        'own: 'f,
    {
        let folder = self.folder.clone();

        async move {
            let target = folder.join(&path);

            if let Some(parent) = target.parent() {
                if !tokio::fs::try_exists(parent).await.unwrap_or(false) {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| format!("Creating object folder: {:?}", e))?;
                }
            }

            tokio::fs::write(&target, content)
                .await
                .map_err(|e| format!("Writing object: {:?}", e))?;

            Ok(format!("{}/{}", self.public_base, path))
        }
        .boxed()
    }

    fn delete<'f, 'own>(
        &'own self,
        paths: Vec<String>,
    ) -> futures::future::BoxFuture<'f, Vec<(String, String)>>
    where
        'own: 'f,
    {
        let folder = self.folder.clone();

        async move {
            let mut failed = Vec::new();

            for path in paths {
                let target = folder.join(&path);
                if let Err(e) = tokio::fs::remove_file(&target).await {
                    failed.push((path, format!("{:?}", e)));
                }
            }

            failed
        }
        .boxed()
    }

    fn object_path(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_base)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(|rest| rest.to_string())
    }
}

pub struct S3Storage {
    bucket: std::sync::Arc<s3::Bucket>,
    public_base: String,
}

impl S3Storage {
    pub fn new(
        bucket_name: &str,
        region: s3::region::Region,
        credentials: s3::creds::Credentials,
        public_base: String,
    ) -> Self {
        let mut bucket = s3::bucket::Bucket::new(bucket_name, region, credentials).unwrap();
        bucket.set_path_style();

        Self {
            bucket: bucket.into(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }
}

impl ScreenshotStorage for S3Storage {
    fn duplicate(&self) -> Box<dyn ScreenshotStorage> {
        Box::new(Self {
            bucket: self.bucket.clone(),
            public_base: self.public_base.clone(),
        })
    }

    fn store<'f, 'own>(
        &'own self,
        path: String,
        content: Vec<u8>,
    ) -> futures::future::BoxFuture<'f, Result<String, String>>
    where
        'own: 'f,
    {
        async move {
            self.bucket
                .put_object(&path, &content)
                .await
                .map_err(|e| format!("Uploading to bucket: {:?}", e))?;

            Ok(format!("{}/{}", self.public_base, path))
        }
        .boxed()
    }

    fn delete<'f, 'own>(
        &'own self,
        paths: Vec<String>,
    ) -> futures::future::BoxFuture<'f, Vec<(String, String)>>
    where
        'own: 'f,
    {
        async move {
            let mut failed = Vec::new();

            for path in paths {
                if let Err(e) = self.bucket.delete_object(&path).await {
                    failed.push((path, format!("{:?}", e)));
                }
            }

            failed
        }
        .boxed()
    }

    fn object_path(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_base)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(|rest| rest.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStorage, ScreenshotStorage};

    #[test]
    fn object_path_only_maps_own_urls() {
        let storage = FileStorage::new("uploads/", "http://localhost:3000/uploads");

        assert_eq!(
            storage.object_path("http://localhost:3000/uploads/team-a/1.png"),
            Some("team-a/1.png".to_string())
        );
        assert_eq!(storage.object_path("manual-entry"), None);
        assert_eq!(storage.object_path("daily-total-entry"), None);
        assert_eq!(storage.object_path("https://elsewhere.example/x.png"), None);
    }
}
