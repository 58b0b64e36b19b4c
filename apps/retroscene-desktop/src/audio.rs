//! Boot and ambient sounds played through rodio on the first frame.

use retroscene_frame::StartupCues;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("playback error: {0}")]
    Play(#[from] rodio::PlayError),
    #[error("output stream error: {0}")]
    Stream(#[from] rodio::StreamError),
}

/// Plays the boot sound once and loops the ambience. Missing or broken files
/// are logged and skipped; the scene keeps running silently.
pub struct RodioCues {
    boot: Option<PathBuf>,
    ambient: Option<PathBuf>,
    // Dropping the stream stops all playback.
    stream: Option<OutputStream>,
}

impl RodioCues {
    pub fn new(boot: Option<PathBuf>, ambient: Option<PathBuf>) -> Self {
        Self {
            boot,
            ambient,
            stream: None,
        }
    }

    fn start(&mut self) -> Result<(), AudioError> {
        let (stream, handle) = OutputStream::try_default()?;
        if let Some(path) = &self.boot {
            report(path, play(&handle, path, false));
        }
        if let Some(path) = &self.ambient {
            report(path, play(&handle, path, true));
        }
        self.stream = Some(stream);
        Ok(())
    }
}

impl StartupCues for RodioCues {
    fn on_first_frame(&mut self) {
        if self.stream.is_some() {
            return;
        }
        if let Err(e) = self.start() {
            warn!("audio unavailable: {e}");
        }
    }
}

fn play(handle: &OutputStreamHandle, path: &Path, looped: bool) -> Result<(), AudioError> {
    let source = Decoder::new(BufReader::new(File::open(path)?))?;
    let sink = Sink::try_new(handle)?;
    if looped {
        sink.append(source.repeat_infinite());
    } else {
        sink.append(source);
    }
    sink.detach();
    Ok(())
}

fn report(path: &Path, result: Result<(), AudioError>) {
    match result {
        Ok(()) => info!("playing {}", path.display()),
        Err(e) => warn!("failed to play {}: {e}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let file = File::open("/nonexistent/boot.ogg").unwrap_err();
        let err = AudioError::from(file);
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn cues_start_without_stream() {
        let cues = RodioCues::new(Some("boot.ogg".into()), None);
        assert!(cues.stream.is_none());
        assert_eq!(cues.boot.as_deref(), Some(Path::new("boot.ogg")));
    }
}
