/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! The playback coordinator.
//!
//! [`Player`] ties the seek clock, the dual buffers, and the three
//! collaborators (container reader, audio decoder, audio sink) into one
//! host-polled engine: the host calls [`Player::get_current_vector_frame`]
//! once per display frame and paints whatever comes back. Everything else
//! (buffering, concealment, audio hand-off, failure classification) happens
//! inside that call.

use web_time::Duration;

use crate::buffers::{BuffersController, PageLookup, RefillNeed};
use crate::clock::SeekClock;
use crate::codec::AudioDecoder;
use crate::conceal::replacement_page;
use crate::error::{PlaybackError, Result};
use crate::events::{ChangeNotifier, PlayerStatus, StatusListener};
use crate::page::{MediaPageHeader, ReadableMediaPage, ReadyToPlayPage, RenderingInstructions};
use crate::reader::VideoReader;
use crate::sink::AudioSink;
use crate::statistics::{LifetimeStatistics, PlaybackStats};

/// Playback states.
///
/// ```text
/// Paused ⇄ Playing
///    ↕        ↕
///    Buffering (transient, while the buffers rebuild)
///    ↓
/// Defunct (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
    /// The buffers are being rebuilt around the playhead.
    Buffering,
    /// The player shut down after an unrecoverable failure or a release.
    Defunct,
}

/// Player configuration
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Forward buffer capacity. The backward capacity follows at 70%.
    pub forward_buffer: Duration,
    /// Whether `stop` discards the buffered pages along with the sink queue.
    pub clear_buffers_on_stop: bool,
    /// Whether `seek` keeps the clock running when it was running before.
    /// When off, the host calls `play` again after seeking.
    pub resume_after_seek: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            forward_buffer: crate::buffers::DEFAULT_FORWARD_CAPACITY,
            clear_buffers_on_stop: false,
            resume_after_seek: false,
        }
    }
}

/// The playback engine for one npxl video.
///
/// The player owns its collaborators from construction until [`release`];
/// they never call back into it. All operations complete synchronously on
/// the calling thread, so a host that polls from its render loop needs no
/// locking of its own.
///
/// [`release`]: Player::release
pub struct Player {
    config: PlayerConfig,
    state: PlaybackState,
    clock: SeekClock,
    buffers: BuffersController,
    video_duration: Duration,
    /// Concealment source: the newest non-void header queued so far.
    last_non_void_header: Option<MediaPageHeader>,
    /// Audio dedup marker: header of the page whose audio went out last.
    audio_pushed_for: Option<MediaPageHeader>,
    last_error: Option<PlaybackError>,
    soft_buffering_enabled: bool,
    reader: Box<dyn VideoReader>,
    decoder: Option<Box<dyn AudioDecoder>>,
    sink: Option<Box<dyn AudioSink>>,
    notifier: ChangeNotifier,
    stats: LifetimeStatistics,
}

impl Player {
    /// Create a player with the default configuration.
    pub fn new(
        reader: Box<dyn VideoReader>,
        decoder: Option<Box<dyn AudioDecoder>>,
        sink: Option<Box<dyn AudioSink>>,
    ) -> Self {
        Self::with_config(PlayerConfig::default(), reader, decoder, sink)
            .expect("default configuration is valid")
    }

    /// Create a player with a custom configuration.
    pub fn with_config(
        config: PlayerConfig,
        reader: Box<dyn VideoReader>,
        decoder: Option<Box<dyn AudioDecoder>>,
        sink: Option<Box<dyn AudioSink>>,
    ) -> Result<Self> {
        if config.forward_buffer.is_zero() {
            return Err(PlaybackError::InvalidConfig(
                "forward buffer capacity must be positive".to_string(),
            ));
        }
        let buffers = BuffersController::new(config.forward_buffer);
        Ok(Self {
            config,
            state: PlaybackState::Paused,
            clock: SeekClock::new(),
            buffers,
            video_duration: Duration::ZERO,
            last_non_void_header: None,
            audio_pushed_for: None,
            last_error: None,
            soft_buffering_enabled: true,
            reader,
            decoder,
            sink,
            notifier: ChangeNotifier::new(),
            stats: LifetimeStatistics::default(),
        })
    }

    /// Bring up the collaborators and read the video's properties.
    ///
    /// Must be called once before any transport or frame-query operation.
    /// On failure the player stays paused and must be discarded.
    pub fn init(&mut self) -> Result<()> {
        self.reader.init().map_err(as_init_error)?;
        self.video_duration = self.reader.video_duration();
        let properties = self.reader.audio_properties();
        if let Some(decoder) = &mut self.decoder {
            decoder.init(&properties).map_err(as_init_error)?;
        }
        if let Some(sink) = &mut self.sink {
            sink.init(&properties).map_err(as_init_error)?;
        }
        log::info!(
            "player initialized: duration={}ms, {}Hz/{}ch",
            self.video_duration.as_millis(),
            properties.sample_rate,
            properties.channels
        );
        self.notify();
        Ok(())
    }

    /// Register an observer. Listeners are kept for the player's lifetime
    /// and invoked synchronously on every state change.
    pub fn add_listener(&mut self, listener: StatusListener) {
        self.notifier.add_listener(listener);
    }

    // ── Transport ────────────────────────────────────────────────────────

    /// Start the playhead.
    pub fn play(&mut self) {
        if self.refuse_when_defunct("play") {
            return;
        }
        self.clock.start();
        self.set_state(PlaybackState::Playing);
        self.notify();
    }

    /// Halt the playhead in place.
    pub fn pause(&mut self) {
        if self.refuse_when_defunct("pause") {
            return;
        }
        self.clock.stop();
        self.set_state(PlaybackState::Paused);
        self.notify();
    }

    /// Halt and rewind to the beginning, discarding queued sink audio.
    pub fn stop(&mut self) {
        if self.refuse_when_defunct("stop") {
            return;
        }
        self.clock.reset();
        if let Some(sink) = &mut self.sink {
            sink.clear();
        }
        if self.config.clear_buffers_on_stop {
            self.buffers.clear();
            self.last_non_void_header = None;
        }
        self.set_state(PlaybackState::Paused);
        self.notify();
    }

    /// Restart playback from the beginning.
    pub fn replay(&mut self) {
        self.stop();
        self.play();
    }

    /// Move the playhead to `to`.
    ///
    /// The replacement clock starts stopped; unless
    /// [`PlayerConfig::resume_after_seek`] is set, the host calls [`play`]
    /// to resume. A seek landing outside the buffered range resolves on the
    /// next frame query, which rebuilds the buffers around it.
    ///
    /// [`play`]: Player::play
    pub fn seek(&mut self, to: Duration) {
        if self.refuse_when_defunct("seek") {
            return;
        }
        let was_running = self.clock.is_running();
        self.clock = SeekClock::with_offset(to);
        if self.config.resume_after_seek && was_running {
            self.clock.start();
        }
        log::debug!("seek to {}ms", to.as_millis());
        self.notify();
    }

    /// Shut the player down for good, releasing all collaborators.
    pub fn release(&mut self) {
        self.release_collaborators();
        self.set_state(PlaybackState::Defunct);
        self.last_error = None;
        self.notify();
    }

    /// Re-enable soft buffering after a failure disabled it, and try to top
    /// the forward buffer up right away.
    pub fn try_soft_buffering_again(&mut self) {
        if self.refuse_when_defunct("soft-buffering retry") {
            return;
        }
        self.soft_buffering_enabled = true;
        self.notify();
        self.soft_buffer();
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current playhead position.
    pub fn seek_position(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Total video duration; zero for a live stream.
    pub fn video_duration(&self) -> Duration {
        self.video_duration
    }

    /// The most recent failure, or `None` after a release or when nothing
    /// has gone wrong.
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    pub fn is_soft_buffering_enabled(&self) -> bool {
        self.soft_buffering_enabled
    }

    /// Resize the forward buffer. The backward buffer follows at 70%.
    pub fn set_forward_buffer_size(&mut self, size: Duration) -> Result<()> {
        if size.is_zero() {
            return Err(PlaybackError::InvalidConfig(
                "forward buffer capacity must be positive".to_string(),
            ));
        }
        self.buffers.set_forward_capacity(size);
        Ok(())
    }

    /// Statistics snapshot.
    pub fn statistics(&self) -> PlaybackStats {
        PlaybackStats {
            lifetime: self.stats.clone(),
            current_buffer_ms: self.buffers.buffered_span().as_millis() as u64,
            buffered_pages: self.buffers.page_count(),
        }
    }

    // ── Frame queries ────────────────────────────────────────────────────

    /// The vector frame at the current playhead position.
    pub fn get_current_vector_frame(&mut self) -> RenderingInstructions {
        self.query_frame(false)
    }

    /// The vector frame at the current playhead position, also handing the
    /// page's audio to the sink the first time the page is seen.
    pub fn get_current_vector_frame_and_push_audio(&mut self) -> RenderingInstructions {
        self.query_frame(true)
    }

    fn query_frame(&mut self, push_audio: bool) -> RenderingInstructions {
        self.stats.record_frame_query();
        if self.state == PlaybackState::Defunct {
            return RenderingInstructions::void();
        }
        let position = self.clock.elapsed();

        if !self.video_duration.is_zero() && position >= self.video_duration {
            self.pause();
            return self.buffers.last_page().vector_frame();
        }

        let PageLookup { page, refill } = self.buffers.get_at(position);
        match refill {
            RefillNeed::Full => {
                self.stats.record_buffer_miss();
                self.full_buffer(position);
                return RenderingInstructions::void();
            }
            RefillNeed::Soft => self.soft_buffer(),
            RefillNeed::None => {}
        }

        if page.is_void() {
            return RenderingInstructions::void();
        }

        if push_audio && page.header != self.audio_pushed_for {
            if let Some(sink) = &mut self.sink {
                sink.write(&page.decoded_audio);
                self.stats.record_audio_push();
            }
            self.audio_pushed_for = page.header.clone();
        }

        page.vector_frame()
    }

    // ── Buffering ────────────────────────────────────────────────────────

    /// Rebuild the buffers around the playhead after a miss.
    fn full_buffer(&mut self, position: Duration) {
        self.stats.record_full_buffer();
        let prior_state = self.state;
        self.buffers.clear();
        self.set_state(PlaybackState::Buffering);
        self.notify();

        let range_end = position + self.buffers.forward_capacity();
        log::debug!(
            "full buffering [{}ms, {}ms)",
            position.as_millis(),
            range_end.as_millis()
        );

        let pages = match self.reader.pages_in_range(position, range_end) {
            Ok(pages) => pages,
            Err(e) => {
                self.fail_fatally(e);
                return;
            }
        };

        for page in pages {
            if let Err(e) = self.queue_and_conceal(page) {
                self.fail_fatally(e);
                return;
            }
        }

        if self.state != PlaybackState::Defunct {
            self.set_state(prior_state);
        }

        // The codec must not carry state across the discontinuity.
        if let Some(decoder) = &mut self.decoder {
            match decoder.decode(&[]) {
                Ok(_) | Err(PlaybackError::Decoding(_)) => {}
                Err(e) => {
                    self.fail_fatally(e);
                    return;
                }
            }
        }

        self.notify();
    }

    /// Top up the forward buffer while playback continues.
    fn soft_buffer(&mut self) {
        if !self.soft_buffering_enabled {
            return;
        }
        let position = self.clock.elapsed();
        let space = self.buffers.forward_space_to_fill(position);
        if space.is_zero() {
            return;
        }
        let start = self.buffers.end_of_last_queued_page();
        self.stats.record_soft_buffer();
        log::debug!(
            "soft buffering [{}ms, {}ms)",
            start.as_millis(),
            (start + space).as_millis()
        );

        let pages = match self.reader.pages_in_range(start, start + space) {
            Ok(pages) => pages,
            Err(e) => {
                self.disable_soft_buffering(e);
                return;
            }
        };
        for page in pages {
            if let Err(e) = self.queue_and_conceal(page) {
                self.disable_soft_buffering(e);
                return;
            }
        }
    }

    /// Decode and queue one incoming page, concealing it when void.
    ///
    /// Only a defunct decoder propagates an error out of here; every other
    /// failure costs at most the page in hand.
    fn queue_and_conceal(&mut self, incoming: ReadableMediaPage) -> Result<()> {
        let start = self.buffers.end_of_last_queued_page();

        let Some(header) = incoming.header else {
            // Void page: repeat the last good page over the lost span. With
            // no good page seen yet the void is dropped, and the shortfall
            // surfaces as a miss that the next full buffer absorbs.
            let Some(last) = self.last_non_void_header.clone() else {
                log::debug!("dropping void page: no concealment source yet");
                self.stats.record_dropped_page();
                return Ok(());
            };
            let audio = match self.concealment_audio() {
                Ok(audio) => audio,
                Err(PlaybackError::Decoding(e)) => {
                    log::warn!("concealment decode failed, dropping void page: {e}");
                    self.stats.record_dropped_page();
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
            let length = last.page_duration();
            self.buffers.push_page(replacement_page(&last, audio), start, length);
            self.stats.record_concealment();
            return Ok(());
        };

        let decoded_audio = if incoming.compressed_audio.is_empty() {
            Vec::new()
        } else if let Some(decoder) = &mut self.decoder {
            match decoder.decode(&incoming.compressed_audio) {
                Ok(pcm) => pcm,
                Err(PlaybackError::Decoding(e)) => {
                    log::warn!("dropping page {}: {e}", header.media_page_number);
                    self.stats.record_dropped_page();
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        } else {
            Vec::new()
        };

        match &self.last_non_void_header {
            Some(last) if header.media_page_number <= last.media_page_number => {
                // Stale number: queue the page, but keep concealing from the
                // newest page seen.
                log::warn!(
                    "page {} arrived after page {}",
                    header.media_page_number,
                    last.media_page_number
                );
            }
            _ => self.last_non_void_header = Some(header.clone()),
        }

        let length = header.page_duration();
        self.buffers
            .push_page(ReadyToPlayPage::new(header, decoded_audio), start, length);
        self.stats.record_page_buffered();
        Ok(())
    }

    /// Loss-concealment PCM from the decoder, or silence without one.
    fn concealment_audio(&mut self) -> Result<Vec<u8>> {
        match &mut self.decoder {
            Some(decoder) => decoder.decode(&[]),
            None => Ok(Vec::new()),
        }
    }

    // ── Failure handling ─────────────────────────────────────────────────

    fn disable_soft_buffering(&mut self, error: PlaybackError) {
        log::warn!("soft buffering disabled: {error}");
        self.last_error = Some(error);
        self.soft_buffering_enabled = false;
        self.notify();
    }

    fn fail_fatally(&mut self, error: PlaybackError) {
        log::error!("playback failed: {error}");
        self.last_error = Some(error);
        self.set_state(PlaybackState::Defunct);
        self.release_collaborators();
        self.notify();
    }

    fn release_collaborators(&mut self) {
        if let Err(e) = self.reader.release() {
            log::warn!("reader release failed: {e}");
        }
        if let Some(decoder) = &mut self.decoder {
            if let Err(e) = decoder.release() {
                log::warn!("decoder release failed: {e}");
            }
        }
        if let Some(sink) = &mut self.sink {
            if let Err(e) = sink.release() {
                log::warn!("sink release failed: {e}");
            }
        }
    }

    fn refuse_when_defunct(&self, operation: &str) -> bool {
        if self.state == PlaybackState::Defunct {
            log::warn!("ignoring {operation}: player is defunct");
            true
        } else {
            false
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            log::info!("state {:?} -> {:?}", self.state, state);
        }
        self.state = state;
    }

    fn notify(&self) {
        let status = PlayerStatus {
            state: self.state,
            seek_position: self.clock.elapsed(),
            last_error: self.last_error.clone(),
            soft_buffering_enabled: self.soft_buffering_enabled,
        };
        self.notifier.notify(&status);
    }
}

fn as_init_error(error: PlaybackError) -> PlaybackError {
    match error {
        PlaybackError::Initialization(_) => error,
        other => PlaybackError::Initialization(other.to_string()),
    }
}
