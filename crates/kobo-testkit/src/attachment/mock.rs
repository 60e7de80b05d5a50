use crate::attachment::{Attachment, AttachmentError, AudioTranscoder, FfmpegTranscoder};
use kobo_core::Settings;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Attachment backed by a fixture file under `{base_dir}/kpi/tests`.
///
/// The file is opened and read in full on construction. The handle stays
/// open until [`close`](Self::close) is called or the value is dropped.
#[derive(Debug)]
pub struct MockAttachment {
    pub id: i64,
    pub pk: i64,
    media_file: Option<File>,
    path: PathBuf,
    basename: String,
    media_file_size: u64,
    content: Vec<u8>,
    mimetype: Option<String>,
    transcoder: Box<dyn AudioTranscoder>,
}

impl MockAttachment {
    /// Open fixture `filename` (only its basename is used).
    ///
    /// Without an explicit `mimetype` it is guessed from the extension.
    pub fn new(
        settings: &Settings,
        pk: i64,
        filename: &str,
        mimetype: Option<&str>,
    ) -> Result<Self, AttachmentError> {
        let basename = Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AttachmentError::InvalidFilename(filename.to_string()))?
            .to_string();
        let path = settings.fixtures_dir().join(&basename);

        let mut file = File::open(&path).map_err(|source| AttachmentError::Open {
            path: path.clone(),
            source,
        })?;
        let media_file_size = file.metadata()?.len();
        let mut content = Vec::with_capacity(media_file_size as usize);
        file.read_to_end(&mut content)?;

        let mimetype = match mimetype {
            Some(m) => Some(m.to_string()),
            None => new_mime_guess::from_path(&path)
                .first_raw()
                .map(str::to_string),
        };

        tracing::debug!(
            pk,
            path = %path.display(),
            size = media_file_size,
            mimetype = ?mimetype,
            "opened mock attachment"
        );

        Ok(Self {
            id: pk,
            pk,
            media_file: Some(file),
            path,
            basename,
            media_file_size,
            content,
            mimetype,
            transcoder: Box::new(FfmpegTranscoder::default()),
        })
    }

    /// Replace the ffmpeg transcoder.
    pub fn with_transcoder(mut self, transcoder: Box<dyn AudioTranscoder>) -> Self {
        self.transcoder = transcoder;
        self
    }

    pub fn media_file_basename(&self) -> &str {
        &self.basename
    }

    /// Release the file handle. Content and path stay available.
    pub fn close(&mut self) {
        if self.media_file.take().is_some() {
            tracing::debug!(pk = self.pk, "closed mock attachment");
        }
    }

    pub fn is_open(&self) -> bool {
        self.media_file.is_some()
    }
}

impl Attachment for MockAttachment {
    fn content(&self) -> &[u8] {
        &self.content
    }

    fn absolute_path(&self) -> &Path {
        &self.path
    }

    fn mimetype(&self) -> Option<&str> {
        self.mimetype.as_deref()
    }

    fn media_file_size(&self) -> u64 {
        self.media_file_size
    }

    fn transcoder(&self) -> &dyn AudioTranscoder {
        self.transcoder.as_ref()
    }
}
