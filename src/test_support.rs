//! Shared helpers for unit tests.
use std::io;
use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use crate::models::{MediaFile, MusicFolder};

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Number of captured lines containing `needle`
    pub fn count(&self, needle: &str) -> usize {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Routes every event emitted on the current thread into a buffer until the
/// guard is dropped
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .finish();

    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

pub fn folder(id: i32) -> MusicFolder {
    MusicFolder {
        id,
        name: format!("Folder {}", id),
        path: format!("/music/{}", id),
    }
}

pub fn media_file(id: i64, folder_id: i32, artist: &str, title: &str) -> MediaFile {
    MediaFile {
        id,
        path: format!("/music/{}/{} - {}.flac", folder_id, artist, title),
        folder_id,
        artist: Some(artist.to_string()),
        title: Some(title.to_string()),
        album: None,
        mb_recording_id: None,
        duration_seconds: Some(240),
    }
}
