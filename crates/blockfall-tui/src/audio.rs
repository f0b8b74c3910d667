use std::time::Duration;

use blockfall_engine::TickEvents;
use rodio::{
    OutputStream, Sink,
    source::{SineWave, Source as _},
};

/// Tone played when a piece lands without clearing anything.
const LANDED_HZ: f32 = 220.0;
/// Base tone for row clears; the pitch rises with the cleared count.
const CLEAR_BASE_HZ: f32 = 440.0;
const CLEAR_STEP_HZ: f32 = 110.0;

const CUE_VOLUME: f32 = 0.25;

/// Plays the landing and row-clear cues.
///
/// Cues are short synthesized tones appended to a single sink, so
/// back-to-back events queue up instead of cutting each other off. The
/// output stream handle must stay alive for the sink to keep playing.
pub struct AudioOutput {
    _stream: OutputStream,
    sink: Sink,
}

impl AudioOutput {
    /// Opens the default audio device.
    ///
    /// Returns `None` when no device is available; the game then runs
    /// silently.
    #[must_use]
    pub fn open() -> Option<Self> {
        let (stream, handle) = OutputStream::try_default().ok()?;
        let sink = Sink::try_new(&handle).ok()?;
        Some(Self {
            _stream: stream,
            sink,
        })
    }

    /// Queues the cues for one tick's events.
    ///
    /// A landing always sounds; a clear adds a higher tone whose pitch
    /// encodes how many rows went at once.
    #[expect(clippy::cast_precision_loss)]
    pub fn play(&self, events: TickEvents) {
        if events.landed {
            self.chirp(LANDED_HZ, Duration::from_millis(60));
        }
        if events.rows_cleared > 0 {
            let pitch = CLEAR_BASE_HZ + CLEAR_STEP_HZ * (events.rows_cleared - 1) as f32;
            self.chirp(pitch, Duration::from_millis(180));
        }
    }

    fn chirp(&self, frequency: f32, length: Duration) {
        let source = SineWave::new(frequency)
            .take_duration(length)
            .amplify(CUE_VOLUME);
        self.sink.append(source);
    }
}
