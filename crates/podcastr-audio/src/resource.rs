//! The playback primitive a transport controller drives.

use std::fmt;

use podcastr_core::Result;

/// Generation number of a `load` call.
///
/// Every load gets a strictly larger id than the one before it, so events
/// tagged with an older id belong to media that has since been replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadId(pub u64);

impl LoadId {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

/// What happened to the loaded media.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEventKind {
    /// Metadata is known; `duration` is `None` for streams without a length.
    Loaded { duration: Option<f64> },
    /// Elapsed playback time in seconds.
    Progress(f64),
    /// The resource started or stopped producing sound on its own.
    PlayStateChanged(bool),
    /// Playback reached the end without looping.
    Ended,
    /// Fetch, decode or output failure.
    Error(String),
}

/// A [`MediaEventKind`] tagged with the load it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub load: LoadId,
    pub kind: MediaEventKind,
}

impl MediaEvent {
    pub const fn new(load: LoadId, kind: MediaEventKind) -> Self {
        Self { load, kind }
    }
}

/// Something that can play one media URL at a time.
///
/// Commands are fire-and-forget; their outcome is reported later through
/// [`MediaResource::try_recv_event`].
pub trait MediaResource {
    /// Replace the current media with `url`.
    fn load(&mut self, url: &str) -> Result<LoadId>;

    /// Start or resume. Playing ended media restarts it from the beginning.
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Jump to `seconds` from the start.
    fn seek(&mut self, seconds: f64) -> Result<()>;

    /// Restart at the end instead of reporting [`MediaEventKind::Ended`].
    fn set_looping(&mut self, looping: bool) -> Result<()>;

    /// Drop the current media and go silent.
    fn unload(&mut self) -> Result<()>;

    /// Next pending event, if any.
    fn try_recv_event(&mut self) -> Option<MediaEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_ids_increase() {
        let first = LoadId::default().next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.to_string(), "load#2");
    }
}
