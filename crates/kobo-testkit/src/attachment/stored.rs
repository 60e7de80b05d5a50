use crate::attachment::{Attachment, AttachmentError, AudioTranscoder, FfmpegTranscoder};
use std::path::{Path, PathBuf};

/// Attachment stored on disk by the media storage backend.
#[derive(Debug)]
pub struct StoredAttachment {
    path: PathBuf,
    content: Vec<u8>,
    mimetype: Option<String>,
    transcoder: Box<dyn AudioTranscoder>,
}

impl StoredAttachment {
    pub fn new(path: impl Into<PathBuf>, mimetype: Option<String>) -> Result<Self, AttachmentError> {
        let path = path.into();
        let content = std::fs::read(&path).map_err(|source| AttachmentError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            content,
            mimetype,
            transcoder: Box::new(FfmpegTranscoder::default()),
        })
    }

    pub fn with_transcoder(mut self, transcoder: Box<dyn AudioTranscoder>) -> Self {
        self.transcoder = transcoder;
        self
    }
}

impl Attachment for StoredAttachment {
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
        self.content.len() as u64
    }

    fn transcoder(&self) -> &dyn AudioTranscoder {
        self.transcoder.as_ref()
    }
}
