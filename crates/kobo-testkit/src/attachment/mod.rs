//! Media attachments and audio transcoding.
//!
//! [`Attachment`] is implemented by the storage-backed [`StoredAttachment`]
//! and by the fixture-backed [`MockAttachment`]; both transcode through an
//! injected [`AudioTranscoder`].

mod mock;
mod stored;
mod transcoding;

pub use mock::MockAttachment;
pub use stored::StoredAttachment;
pub use transcoding::{AudioTranscoder, FfmpegTranscoder};

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("cannot open attachment file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid attachment filename: {0}")]
    InvalidFilename(String),
    #[error("cannot transcode attachment with mimetype {0:?}")]
    NotAudio(Option<String>),
    #[error("transcoding failed with status {status:?}: {stderr}")]
    Transcoding { status: Option<i32>, stderr: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Location of an attachment's servable file.
///
/// A transcoded copy lives in a temporary file that is deleted when this
/// value is dropped, so keep it alive for as long as the path is used.
#[derive(Debug)]
pub enum ProtectedPath {
    Original(PathBuf),
    Transcoded(NamedTempFile),
}

impl ProtectedPath {
    pub fn path(&self) -> &Path {
        match self {
            ProtectedPath::Original(path) => path,
            ProtectedPath::Transcoded(file) => file.path(),
        }
    }

    pub fn is_transcoded(&self) -> bool {
        matches!(self, ProtectedPath::Transcoded(_))
    }
}

/// Media file attached to a submission.
pub trait Attachment {
    /// Raw file bytes.
    fn content(&self) -> &[u8];

    fn absolute_path(&self) -> &Path;

    fn mimetype(&self) -> Option<&str>;

    fn media_file_size(&self) -> u64;

    fn transcoder(&self) -> &dyn AudioTranscoder;

    /// Audio track of this attachment converted to `format`.
    ///
    /// Only audio and video attachments can be transcoded.
    fn get_transcoded_audio(&self, format: &str) -> Result<Vec<u8>, AttachmentError> {
        let mimetype = self.mimetype();
        let is_media = mimetype.is_some_and(|m| m.starts_with("audio/") || m.starts_with("video/"));
        if !is_media {
            return Err(AttachmentError::NotAudio(mimetype.map(str::to_string)));
        }
        self.transcoder().transcode(self.absolute_path(), format)
    }

    /// Path to serve for `format`: an mp3 transcode, or the original file.
    fn protected_path(&self, format: Option<&str>) -> Result<ProtectedPath, AttachmentError> {
        match format {
            Some("mp3") => {
                let bytes = self.get_transcoded_audio("mp3")?;
                let mut file = tempfile::Builder::new().suffix(".mp3").tempfile()?;
                file.write_all(&bytes)?;
                file.flush()?;
                tracing::debug!(
                    source = %self.absolute_path().display(),
                    transcoded = %file.path().display(),
                    bytes = bytes.len(),
                    "wrote transcoded attachment"
                );
                Ok(ProtectedPath::Transcoded(file))
            }
            _ => Ok(ProtectedPath::Original(self.absolute_path().to_path_buf())),
        }
    }
}
