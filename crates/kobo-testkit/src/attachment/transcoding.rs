use crate::attachment::AttachmentError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Converts a media file's audio track to another container format.
pub trait AudioTranscoder: fmt::Debug {
    fn transcode(&self, source: &Path, format: &str) -> Result<Vec<u8>, AttachmentError>;
}

/// Transcoder shelling out to `ffmpeg`, reading the result from stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments passed to ffmpeg for `source` and `format`.
    pub fn args(source: &Path, format: &str) -> Vec<String> {
        vec![
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            source.display().to_string(),
            "-f".to_string(),
            format.to_string(),
            "pipe:1".to_string(),
        ]
    }
}

impl AudioTranscoder for FfmpegTranscoder {
    fn transcode(&self, source: &Path, format: &str) -> Result<Vec<u8>, AttachmentError> {
        tracing::debug!(
            binary = %self.binary.display(),
            source = %source.display(),
            format,
            "transcoding attachment"
        );
        let output = Command::new(&self.binary)
            .args(Self::args(source, format))
            .output()?;

        if !output.status.success() {
            return Err(AttachmentError::Transcoding {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    #[cfg(unix)]
    use tempfile::TempDir;

    /// Write an executable shell script standing in for ffmpeg.
    #[cfg(unix)]
    fn fake_ffmpeg(dir: &TempDir, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("ffmpeg");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[rstest]
    fn test_ffmpeg_args() {
        let args = FfmpegTranscoder::args(Path::new("/media/audio.m4a"), "mp3");
        assert_eq!(
            args,
            ["-loglevel", "error", "-i", "/media/audio.m4a", "-f", "mp3", "pipe:1"]
        );
    }

    #[rstest]
    fn test_missing_binary_is_io_error() {
        let transcoder = FfmpegTranscoder::new("/nonexistent/bin/ffmpeg");
        let err = transcoder
            .transcode(Path::new("/media/audio.m4a"), "mp3")
            .unwrap_err();
        assert!(matches!(err, AttachmentError::Io(_)));
    }

    #[cfg(unix)]
    #[rstest]
    fn test_transcode_returns_stdout() {
        let dir = TempDir::new().unwrap();
        let transcoder = FfmpegTranscoder::new(fake_ffmpeg(&dir, "printf 'mp3-bytes'"));

        let output = transcoder
            .transcode(Path::new("/media/audio.m4a"), "mp3")
            .expect("Should return the transcoder's stdout");
        assert_eq!(output, b"mp3-bytes");
    }

    #[cfg(unix)]
    #[rstest]
    fn test_transcode_failure_reports_status_and_stderr() {
        let dir = TempDir::new().unwrap();
        let transcoder = FfmpegTranscoder::new(fake_ffmpeg(
            &dir,
            "echo '  Invalid data found when processing input  ' >&2\nexit 3",
        ));

        let err = transcoder
            .transcode(Path::new("/media/audio.m4a"), "mp3")
            .unwrap_err();
        match err {
            AttachmentError::Transcoding { status, stderr } => {
                assert_eq!(status, Some(3));
                assert_eq!(stderr, "Invalid data found when processing input");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
