//! Audio cue mapping
//!
//! Audio never looks at the machine, only at stages. [`AudioCueMapper`] turns
//! stages into [`SoundRequest`]s and hands them to an [`AudioBackend`].
//! Playback is fire-and-forget: a failing backend is logged, not retried.

use serde::{Deserialize, Serialize};

use rf_stage::{ControlId, SinkError, Stage, StageEvent, StageSink};

/// Instrument voices of the cabinet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    Click,
    ReelStop,
    Win,
    NoWin,
    GameOver,
    SpinStart,
}

/// One note or chord to play
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundRequest {
    pub sound: Sound,
    /// Scientific pitch names; more than one is a chord
    pub notes: Vec<&'static str>,
    /// Note value ("16n", "8n") or seconds ("1s")
    pub duration: &'static str,
    /// Delay after the triggering stage
    pub offset_ms: u64,
}

impl SoundRequest {
    pub fn note(sound: Sound, note: &'static str, duration: &'static str) -> Self {
        Self {
            sound,
            notes: vec![note],
            duration,
            offset_ms: 0,
        }
    }

    pub fn chord(sound: Sound, notes: &[&'static str], duration: &'static str) -> Self {
        Self {
            sound,
            notes: notes.to_vec(),
            duration,
            offset_ms: 0,
        }
    }

    pub fn delayed(mut self, offset_ms: u64) -> Self {
        self.offset_ms = offset_ms;
        self
    }
}

/// Synthesis engine seam
pub trait AudioBackend: Send {
    fn play(&mut self, request: &SoundRequest) -> Result<(), SinkError>;
}

/// Backend that only logs what would have played
#[derive(Debug, Default)]
pub struct LogAudioBackend;

impl AudioBackend for LogAudioBackend {
    fn play(&mut self, request: &SoundRequest) -> Result<(), SinkError> {
        log::debug!(
            "♪ {:?} {} {} +{}ms",
            request.sound,
            request.notes.join(","),
            request.duration,
            request.offset_ms
        );
        Ok(())
    }
}

/// Backend that keeps every request (tests, traces)
#[derive(Debug, Default)]
pub struct RecordingAudioBackend {
    pub played: Vec<SoundRequest>,
}

impl AudioBackend for RecordingAudioBackend {
    fn play(&mut self, request: &SoundRequest) -> Result<(), SinkError> {
        self.played.push(request.clone());
        Ok(())
    }
}

/// Stage → sound translation
pub struct AudioCueMapper<B: AudioBackend> {
    backend: B,
    muted: bool,
}

impl<B: AudioBackend> AudioCueMapper<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            muted: false,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Sounds for one stage, ignoring mute
///
/// Empty for every stage that is not [`Stage::is_audible`].
pub fn cues_for(stage: &Stage) -> Vec<SoundRequest> {
    if !stage.is_audible() {
        return Vec::new();
    }
    match stage {
        Stage::SpinStart { .. } => vec![SoundRequest::chord(
            Sound::SpinStart,
            &["C4", "E4", "G4", "C5"],
            "16n",
        )],
        Stage::ReelStop { is_last, .. } => {
            let note = if *is_last { "G2" } else { "C2" };
            vec![SoundRequest::note(Sound::ReelStop, note, "16n")]
        }
        Stage::WinPresent { .. } => vec![
            SoundRequest::chord(Sound::Win, &["C4", "E4", "G4"], "8n"),
            SoundRequest::chord(Sound::Win, &["E4", "G4", "B4"], "8n").delayed(200),
            SoundRequest::chord(Sound::Win, &["G4", "B4", "D5"], "8n").delayed(400),
        ],
        Stage::NoWin => vec![SoundRequest::note(Sound::NoWin, "F#2", "8n")],
        Stage::GameOver => vec![SoundRequest::note(Sound::GameOver, "C2", "1s")],
        Stage::ControlPressed { control } => vec![click(control)],
        _ => Vec::new(),
    }
}

fn click(control: &ControlId) -> SoundRequest {
    let (note, duration) = match control {
        ControlId::BetUp | ControlId::BetDown => ("C4", "16n"),
        ControlId::AutoSpin { enabled: true } => ("E4", "16n"),
        ControlId::AutoSpin { enabled: false } => ("A3", "16n"),
        ControlId::Mute { muted: true } => ("A3", "16n"),
        ControlId::Mute { muted: false } => ("E4", "16n"),
        ControlId::StatsOpen => ("A4", "16n"),
        ControlId::StatsClose => ("G4", "16n"),
        ControlId::Restart => ("G4", "8n"),
    };
    SoundRequest::note(Sound::Click, note, duration)
}

impl<B: AudioBackend> StageSink for AudioCueMapper<B> {
    fn name(&self) -> &str {
        "audio"
    }

    fn on_stage(&mut self, event: &StageEvent) -> Result<(), SinkError> {
        if let Stage::MuteChanged { muted } = event.stage {
            self.muted = muted;
            return Ok(());
        }
        if self.muted {
            return Ok(());
        }
        for request in cues_for(&event.stage) {
            self.backend.play(&request)?;
        }
        Ok(())
    }
}
