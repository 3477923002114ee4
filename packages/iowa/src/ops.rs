//! Read and write operations: JSON-aware, text, and binary.

use std::path::Path;

use bytes::Bytes;
use iowa_storage::Storage;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec;
use crate::{
    require_path, AccessOptions, Content, Encoding, Error, Iowa, ResolvedOptions, Result,
    DEFAULT_OPTIONS, TEXT_DEFAULT_OPTIONS,
};

fn decode(path: &Path, content: Content, json: bool) -> Result<Content> {
    codec::parse(content, json).map_err(|err| Error::decode(path, err))
}

impl<S: Storage> Iowa<S> {
    /// Read a file, decoding it as JSON unless `options.json` is `false`.
    ///
    /// A missing file is created with `options.seed` (the default) and the
    /// decoded seed is returned. A blank file also yields the decoded seed.
    ///
    /// # Errors
    ///
    /// * [`Error::NotFound`] - the file is missing and creation is disabled.
    /// * [`Error::Decode`] - the content is not valid JSON (in JSON mode) or
    ///   not valid in the configured encoding.
    /// * [`Error::Write`] - the missing file could not be created.
    /// * [`Error::UnexpectedIo`] - any other storage failure.
    pub async fn read_file(
        &self,
        path: impl AsRef<Path>,
        options: &AccessOptions,
    ) -> Result<Content> {
        self.read_with(path.as_ref(), options.resolve(&DEFAULT_OPTIONS))
            .await
    }

    /// Same as [`Iowa::read_file`], with JSON decoding off by default.
    pub async fn read_text_file(
        &self,
        path: impl AsRef<Path>,
        options: &AccessOptions,
    ) -> Result<Content> {
        self.read_with(path.as_ref(), options.resolve(&TEXT_DEFAULT_OPTIONS))
            .await
    }

    /// Read a file and deserialize its JSON content into `T`.
    pub async fn read_json<T: DeserializeOwned>(
        &self,
        path: impl AsRef<Path>,
        options: &AccessOptions,
    ) -> Result<T> {
        let path = path.as_ref();
        let content = self
            .read_with(path, options.resolve(&DEFAULT_OPTIONS))
            .await?;

        content.deserialize().map_err(|err| Error::decode(path, err))
    }

    /// Read a file's raw bytes. Missing files are never created.
    pub async fn read_binary(&self, path: impl AsRef<Path>) -> Result<Bytes> {
        let path = path.as_ref();
        require_path(path)?;

        tracing::debug!("Reading {} as binary...", path.display());
        self.storage
            .read_raw(path)
            .await
            .map_err(|err| Error::from_storage(path, err))
    }

    /// Write `data` to a file, creating missing parent directories and
    /// replacing any existing content.
    ///
    /// Returns the logical value written, decoded the way a read would decode
    /// it. The stored bytes are not read back. Data that cannot be decoded is
    /// rejected before anything is written.
    pub async fn write_file(
        &self,
        path: impl AsRef<Path>,
        data: impl Into<Content>,
        options: &AccessOptions,
    ) -> Result<Content> {
        self.write_with(path.as_ref(), data.into(), options.resolve(&DEFAULT_OPTIONS))
            .await
    }

    /// Same as [`Iowa::write_file`], with JSON encoding off by default.
    pub async fn write_text_file(
        &self,
        path: impl AsRef<Path>,
        data: impl Into<Content>,
        options: &AccessOptions,
    ) -> Result<Content> {
        self.write_with(
            path.as_ref(),
            data.into(),
            options.resolve(&TEXT_DEFAULT_OPTIONS),
        )
        .await
    }

    /// Serialize `value` and write it as JSON.
    pub async fn write_json<T: Serialize + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
        options: &AccessOptions,
    ) -> Result<Content> {
        let path = path.as_ref();
        let content = Content::json(value).map_err(|err| Error::write(path, err))?;

        self.write_with(path, content, options.resolve(&DEFAULT_OPTIONS))
            .await
    }

    /// Write raw bytes, creating missing parent directories. Returns `data`.
    pub async fn write_binary(
        &self,
        path: impl AsRef<Path>,
        data: impl Into<Bytes>,
    ) -> Result<Bytes> {
        let path = path.as_ref();
        require_path(path)?;

        let data = data.into();
        tracing::debug!("Writing {} bytes to {}...", data.len(), path.display());
        self.store(path, data.clone()).await?;

        Ok(data)
    }

    pub(crate) async fn read_with(&self, path: &Path, options: ResolvedOptions) -> Result<Content> {
        require_path(path)?;

        tracing::debug!("Reading {}...", path.display());
        match self.storage.read_raw(path).await {
            Ok(bytes) => {
                let text = options
                    .encoding
                    .decode(&bytes)
                    .map_err(|err| Error::decode(path, err))?;

                let trimmed = text.trim();
                let content = if trimmed.is_empty() {
                    options.seed
                } else {
                    Content::Text(trimmed.to_string())
                };

                decode(path, content, options.json)
            }
            Err(err) if err.is_not_found() => {
                if !options.create_if_not_exists {
                    return Err(Error::creation_disabled(path, err));
                }

                self.seed_file(path, &options.seed, options.json, options.encoding)
                    .await?;
                decode(path, options.seed, options.json)
            }
            Err(err) => Err(Error::unexpected(path, err)),
        }
    }

    pub(crate) async fn write_with(
        &self,
        path: &Path,
        data: Content,
        options: ResolvedOptions,
    ) -> Result<Content> {
        require_path(path)?;

        let logical = decode(path, data.clone(), options.json)?;

        tracing::debug!("Writing {}...", path.display());
        self.persist(path, &data, options.json, options.encoding)
            .await?;

        Ok(logical)
    }

    /// Stringify, encode and store `data`.
    pub(crate) async fn persist(
        &self,
        path: &Path,
        data: &Content,
        json: bool,
        encoding: Encoding,
    ) -> Result<()> {
        let text = codec::stringify(data, json);
        let bytes = encoding
            .encode(&text)
            .map_err(|err| Error::write(path, err))?;

        self.store(path, Bytes::from(bytes)).await
    }

    async fn store(&self, path: &Path, data: Bytes) -> Result<()> {
        self.ensure_path(path).await?;
        self.storage
            .write_raw(path, data)
            .await
            .map_err(|err| Error::write(path, err))
    }
}
