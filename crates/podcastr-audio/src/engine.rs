//! Audio engine: a [`MediaResource`] backed by a decode/output worker thread.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use podcastr_core::{Error, Result};
use tracing::{debug, error, info, warn};

use crate::decode::AudioDecoder;
use crate::output::{AudioOutput, PlaybackBuffer};
use crate::resource::{LoadId, MediaEvent, MediaEventKind, MediaResource};

/// How often elapsed time is reported while playing.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// Command poll timeout while idle or paused.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Command poll timeout while playing, so decoding keeps up with output.
const BUSY_POLL: Duration = Duration::from_millis(5);

/// Decoded audio kept ahead of the output callback.
const BUFFER_AHEAD_SECS: usize = 2;

/// Largest episode download accepted.
const MAX_DOWNLOAD_BYTES: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone)]
enum EngineCommand {
    Load { load: LoadId, url: String },
    Play,
    Pause,
    Seek(f64),
    SetLooping(bool),
    Unload,
    Shutdown,
}

/// Plays one episode at a time on a dedicated `audio-engine` thread.
///
/// The output device is only opened once something is loaded, at the
/// sample rate and channel count of that file.
#[derive(Debug)]
pub struct AudioEngine {
    command_tx: Sender<EngineCommand>,
    event_rx: Receiver<MediaEvent>,
    last_load: LoadId,
}

impl AudioEngine {
    pub fn new() -> Result<Self> {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        std::thread::Builder::new()
            .name("audio-engine".to_string())
            .spawn(move || EngineWorker::new(command_rx, event_tx).run())
            .map_err(|e| Error::AudioOutput(format!("Failed to spawn engine thread: {e}")))?;

        Ok(Self {
            command_tx,
            event_rx,
            last_load: LoadId::default(),
        })
    }

    fn send(&self, command: EngineCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|e| Error::AudioOutput(format!("Failed to send command: {e}")))
    }
}

impl MediaResource for AudioEngine {
    fn load(&mut self, url: &str) -> Result<LoadId> {
        let load = self.last_load.next();
        self.send(EngineCommand::Load {
            load,
            url: url.to_string(),
        })?;
        self.last_load = load;
        Ok(load)
    }

    fn play(&mut self) -> Result<()> {
        self.send(EngineCommand::Play)
    }

    fn pause(&mut self) -> Result<()> {
        self.send(EngineCommand::Pause)
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.send(EngineCommand::Seek(seconds))
    }

    fn set_looping(&mut self, looping: bool) -> Result<()> {
        self.send(EngineCommand::SetLooping(looping))
    }

    fn unload(&mut self) -> Result<()> {
        self.send(EngineCommand::Unload)
    }

    fn try_recv_event(&mut self) -> Option<MediaEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        let _ = self.command_tx.send(EngineCommand::Shutdown);
    }
}

/// Event sender bound to one load.
struct EventSink {
    tx: Sender<MediaEvent>,
    load: LoadId,
}

impl EventSink {
    fn emit(&self, kind: MediaEventKind) {
        let _ = self.tx.send(MediaEvent::new(self.load, kind));
    }
}

/// The currently loaded episode.
struct Playback {
    events: EventSink,
    decoder: AudioDecoder,
    buffer: Arc<PlaybackBuffer>,
    output: AudioOutput,
    sample_rate: u32,
    /// Position the frame counter is relative to (last seek target).
    base_secs: f64,
    /// The decoder hit the end of the stream.
    drained: bool,
    /// Playback finished and `Ended` was reported.
    ended: bool,
}

impl Playback {
    fn position(&self) -> f64 {
        position_secs(self.base_secs, self.buffer.consumed_frames(), self.sample_rate)
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        let seconds = seconds.max(0.0);
        self.buffer.reset();
        self.decoder.seek(seconds)?;
        self.base_secs = seconds;
        self.drained = false;
        self.ended = false;
        Ok(())
    }

    /// Keep the buffer topped up.
    fn decode_ahead(&mut self) {
        let target = self.sample_rate as usize * usize::from(self.decoder.channels()) * BUFFER_AHEAD_SECS;
        while !self.drained && self.buffer.len() < target {
            match self.decoder.decode_next() {
                Ok(Some(samples)) => self.buffer.push(&samples),
                Ok(None) => {
                    debug!("{}: end of stream decoded", self.events.load);
                    self.drained = true;
                }
                Err(e) => {
                    error!("{}: {e}", self.events.load);
                    self.events.emit(MediaEventKind::Error(e.to_string()));
                    self.drained = true;
                }
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn position_secs(base_secs: f64, frames: u64, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return base_secs;
    }
    base_secs + frames as f64 / f64::from(sample_rate)
}

struct EngineWorker {
    command_rx: Receiver<EngineCommand>,
    event_tx: Sender<MediaEvent>,
    playback: Option<Playback>,
    looping: bool,
    last_progress: Instant,
}

impl EngineWorker {
    fn new(command_rx: Receiver<EngineCommand>, event_tx: Sender<MediaEvent>) -> Self {
        Self {
            command_rx,
            event_tx,
            playback: None,
            looping: false,
            last_progress: Instant::now(),
        }
    }

    fn is_playing(&self) -> bool {
        self.playback.as_ref().is_some_and(|p| p.buffer.is_playing())
    }

    fn run(mut self) {
        info!("Audio engine worker started");

        loop {
            let timeout = if self.is_playing() { BUSY_POLL } else { IDLE_POLL };
            match self.command_rx.recv_timeout(timeout) {
                Ok(EngineCommand::Shutdown) => {
                    info!("Audio engine shutting down");
                    break;
                }
                Ok(command) => self.handle_command(command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Command channel closed, shutting down");
                    break;
                }
            }

            self.tick();
        }
    }

    fn handle_command(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Load { load, url } => self.load(load, &url),
            EngineCommand::Play => self.play(),
            EngineCommand::Pause => self.pause(),
            EngineCommand::Seek(seconds) => {
                let Some(playback) = self.playback.as_mut() else {
                    return;
                };
                match playback.seek(seconds) {
                    Ok(()) => playback.events.emit(MediaEventKind::Progress(seconds.max(0.0))),
                    Err(e) => {
                        warn!("{e}");
                        playback.events.emit(MediaEventKind::Error(e.to_string()));
                    }
                }
            }
            EngineCommand::SetLooping(looping) => self.looping = looping,
            EngineCommand::Unload => {
                if self.playback.take().is_some() {
                    debug!("Media unloaded");
                }
            }
            EngineCommand::Shutdown => {}
        }
    }

    fn load(&mut self, load: LoadId, url: &str) {
        // Drop the previous stream before opening a new one.
        self.playback = None;

        let events = EventSink {
            tx: self.event_tx.clone(),
            load,
        };
        match open_playback(url, events) {
            Ok(playback) => {
                info!(
                    "{load} ready: {} Hz, {} channels on {}",
                    playback.sample_rate,
                    playback.decoder.channels(),
                    playback.output.device_name()
                );
                playback.events.emit(MediaEventKind::Loaded {
                    duration: playback.decoder.duration(),
                });
                self.playback = Some(playback);
            }
            Err(e) => {
                error!("Failed to load {url}: {e}");
                let _ = self
                    .event_tx
                    .send(MediaEvent::new(load, MediaEventKind::Error(e.to_string())));
            }
        }
    }

    fn play(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            warn!("Cannot play: nothing loaded");
            return;
        };

        if playback.ended {
            if let Err(e) = playback.seek(0.0) {
                playback.events.emit(MediaEventKind::Error(e.to_string()));
                return;
            }
            playback.events.emit(MediaEventKind::Progress(0.0));
        }

        if !playback.buffer.is_playing() {
            playback.decode_ahead();
            playback.buffer.set_playing(true);
            playback.events.emit(MediaEventKind::PlayStateChanged(true));
        }
    }

    fn pause(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        if playback.buffer.is_playing() {
            playback.buffer.set_playing(false);
            playback.events.emit(MediaEventKind::Progress(playback.position()));
            playback.events.emit(MediaEventKind::PlayStateChanged(false));
        }
    }

    fn tick(&mut self) {
        let looping = self.looping;
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        if !playback.buffer.is_playing() {
            return;
        }

        playback.decode_ahead();

        if playback.drained && playback.buffer.is_empty() {
            if looping {
                debug!("{}: looping", playback.events.load);
                if let Err(e) = playback.seek(0.0) {
                    playback.events.emit(MediaEventKind::Error(e.to_string()));
                }
                playback.events.emit(MediaEventKind::Progress(0.0));
            } else {
                info!("{}: playback finished", playback.events.load);
                playback.buffer.set_playing(false);
                playback.ended = true;
                playback.events.emit(MediaEventKind::Progress(playback.position()));
                playback.events.emit(MediaEventKind::PlayStateChanged(false));
                playback.events.emit(MediaEventKind::Ended);
            }
            return;
        }

        if self.last_progress.elapsed() >= PROGRESS_INTERVAL {
            playback.events.emit(MediaEventKind::Progress(playback.position()));
            self.last_progress = Instant::now();
        }
    }
}

fn open_playback(url: &str, events: EventSink) -> Result<Playback> {
    let (data, mime_type) = fetch(url)?;
    let decoder = AudioDecoder::from_bytes(data, mime_type.as_deref(), Some(url))?;
    let sample_rate = decoder.sample_rate();
    let buffer = Arc::new(PlaybackBuffer::new(decoder.channels()));
    let output = AudioOutput::open(Arc::clone(&buffer), sample_rate, decoder.channels())?;

    Ok(Playback {
        events,
        decoder,
        buffer,
        output,
        sample_rate,
        base_secs: 0.0,
        drained: false,
        ended: false,
    })
}

fn fetch(url: &str) -> Result<(Vec<u8>, Option<String>)> {
    debug!("Fetching {url}");
    let mut body = ureq::get(url)
        .header("User-Agent", concat!("Podcastr/", env!("CARGO_PKG_VERSION")))
        .call()
        .map_err(|e| Error::Network(format!("HTTP request failed: {e}")))?
        .into_body();

    let mime_type = body.mime_type().map(String::from);
    let data = body
        .with_config()
        .limit(MAX_DOWNLOAD_BYTES)
        .read_to_vec()
        .map_err(|e| Error::Network(format!("Failed to read response: {e}")))?;

    debug!("Fetched {} bytes, mime: {mime_type:?}", data.len());
    Ok((data, mime_type))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_frames() {
        assert!((position_secs(0.0, 44_100, 44_100) - 1.0).abs() < f64::EPSILON);
        assert!((position_secs(30.0, 22_050, 44_100) - 30.5).abs() < f64::EPSILON);
        assert!((position_secs(12.0, 500, 0) - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unreachable_url_reports_error_for_its_load() {
        let mut engine = AudioEngine::new().unwrap();
        let load = engine.load("http://127.0.0.1:9/episode.mp3").unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        let event = loop {
            if let Some(event) = engine.try_recv_event() {
                break event;
            }
            assert!(Instant::now() < deadline, "no event from engine");
            std::thread::sleep(Duration::from_millis(10));
        };

        assert_eq!(event.load, load);
        assert!(matches!(event.kind, MediaEventKind::Error(_)));
    }

    #[test]
    fn test_load_ids_are_generations() {
        let mut engine = AudioEngine::new().unwrap();
        engine.unload().unwrap();
        let first = engine.load("http://127.0.0.1:9/a.mp3").unwrap();
        let second = engine.load("http://127.0.0.1:9/b.mp3").unwrap();
        assert!(second > first);
    }
}
