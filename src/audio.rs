//! Bell cues for contacts
//!
//! Every sounding contact plays the next tone of one shared score. The
//! simulation only emits `Cue`s; an `AudioSink` on the host side plays them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::BodyId;
use crate::stereo_pan;

/// Bell tones available to a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    A,
    C,
    CSharp,
    D,
    E,
    F,
}

impl Tone {
    /// Fundamental frequency in Hz (A4 = 440)
    pub fn frequency(&self) -> f32 {
        match self {
            Tone::A => 440.0,
            Tone::C => 523.25,
            Tone::CSharp => 554.37,
            Tone::D => 587.33,
            Tone::E => 659.25,
            Tone::F => 698.46,
        }
    }

    /// Sample file name the desktop build loads for this tone
    pub fn sample_name(&self) -> &'static str {
        match self {
            Tone::A => "A_BELL.wav",
            Tone::C => "C_BELL.wav",
            Tone::CSharp => "C#_BELL.wav",
            Tone::D => "D_BELL.wav",
            Tone::E => "E_BELL.wav",
            Tone::F => "F_BELL.wav",
        }
    }
}

/// The board's melody: four bars of arpeggios, two beats each
pub const BELL_SCORE: [Tone; 32] = {
    use Tone::*;
    [
        F, D, A, D, F, D, A, D, //
        F, C, A, C, F, C, A, C, //
        E, CSharp, A, CSharp, E, CSharp, A, CSharp, //
        E, CSharp, A, CSharp, E, CSharp, A, CSharp,
    ]
};

/// Cyclic cursor over a read-only score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SequencerData")]
pub struct Sequencer {
    tones: Vec<Tone>,
    cursor: usize,
    /// Total tones handed out (never wraps)
    plays: u64,
}

/// Unchecked wire form of a `Sequencer`
#[derive(Deserialize)]
struct SequencerData {
    tones: Vec<Tone>,
    #[serde(default)]
    cursor: usize,
    #[serde(default)]
    plays: u64,
}

impl TryFrom<SequencerData> for Sequencer {
    type Error = String;

    fn try_from(data: SequencerData) -> Result<Self, Self::Error> {
        if data.tones.is_empty() {
            return Err("sequencer score has no tones".to_string());
        }
        if data.cursor >= data.tones.len() {
            return Err(format!(
                "sequencer cursor {} is past the end of a {}-tone score",
                data.cursor,
                data.tones.len()
            ));
        }
        Ok(Self {
            tones: data.tones,
            cursor: data.cursor,
            plays: data.plays,
        })
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self {
            tones: BELL_SCORE.to_vec(),
            cursor: 0,
            plays: 0,
        }
    }
}

impl Sequencer {
    /// Returns `None` for an empty score
    pub fn new(tones: Vec<Tone>) -> Option<Self> {
        if tones.is_empty() {
            return None;
        }
        Some(Self {
            tones,
            cursor: 0,
            plays: 0,
        })
    }

    /// Index to play now; the cursor advances and wraps to 0 at the end
    pub fn next_tone(&mut self) -> usize {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.tones.len();
        self.plays += 1;
        index
    }

    pub fn tone(&self, index: usize) -> Tone {
        self.tones[index % self.tones.len()]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn plays(&self) -> u64 {
        self.plays
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.plays = 0;
    }
}

/// A tone to play, fire-and-forget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Index into the score (pre-advance)
    pub index: usize,
    pub tone: Tone,
    /// Ball that caused it (None for pendulum strikes)
    pub body: Option<BodyId>,
    /// Where the contact happened
    pub at: Vec2,
    /// Stereo position from the contact x, -1 (left) to 1 (right)
    pub pan: f32,
}

/// Turns sounding contacts into cues using one shared sequencer
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    sequencer: Sequencer,
}

impl Dispatcher {
    pub fn new(sequencer: Sequencer) -> Self {
        Self { sequencer }
    }

    /// Advance the shared cursor and build the cue for a contact at `at`
    pub fn cue(&mut self, body: Option<BodyId>, at: Vec2, field_width: f32) -> Cue {
        let index = self.sequencer.next_tone();
        let cue = Cue {
            index,
            tone: self.sequencer.tone(index),
            body,
            at,
            pan: stereo_pan(at.x, field_width),
        };
        log::debug!("Cue #{} {:?} pan {:.2}", cue.index, cue.tone, cue.pan);
        cue
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn reset(&mut self) {
        self.sequencer.reset();
    }
}

/// Host-side playback of cues (non-blocking)
pub trait AudioSink {
    fn play(&mut self, cue: &Cue);
}

/// Sink that logs cues instead of playing them (headless runs)
#[derive(Debug, Clone)]
pub struct LogSink {
    master_volume: f32,
    muted: bool,
    played: u64,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,
            played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogSink {
    fn play(&mut self, cue: &Cue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        log::info!(
            "♪ {} ({:.0} Hz) vol {:.2} pan {:+.2}",
            cue.tone.sample_name(),
            cue.tone.frequency(),
            vol,
            cue.pan
        );
    }
}

/// Collecting sink, handy for hosts that batch playback per frame
impl AudioSink for Vec<Cue> {
    fn play(&mut self, cue: &Cue) {
        self.push(*cue);
    }
}
