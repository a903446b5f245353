/// Length of the anti-click ramp applied when a channel starts or stops
pub const CHANNEL_FADE_FRAMES: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    FadingIn { position: usize },
    Sustaining,
    FadingOut { position: usize },
}

/// The per-channel gain envelope
///
/// A short linear ramp wraps every transition in and out of silence so
/// that starting or stopping a channel mid-signal never clicks. The
/// envelope is advanced one frame at a time by the mixing loop.
pub struct Envelope {
    phase: Phase,
}

impl Envelope {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    /// Begin ramping up, resuming from the current gain if a fade-out is
    /// in progress
    pub fn sound_on(&mut self) {
        self.phase = match self.phase {
            Phase::Idle => Phase::FadingIn { position: 0 },
            Phase::FadingOut { position } => Phase::FadingIn {
                position: CHANNEL_FADE_FRAMES - position.min(CHANNEL_FADE_FRAMES),
            },
            phase => phase,
        };
    }

    /// Begin ramping down, resuming from the current gain if a fade-in is
    /// in progress
    pub fn sound_off(&mut self) {
        self.phase = match self.phase {
            Phase::Sustaining => Phase::FadingOut { position: 0 },
            Phase::FadingIn { position } => Phase::FadingOut {
                position: CHANNEL_FADE_FRAMES - position.min(CHANNEL_FADE_FRAMES),
            },
            phase => phase,
        };
    }

    /// Cut to silence without a ramp
    pub fn kill(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_fading_out(&self) -> bool {
        matches!(self.phase, Phase::FadingOut { .. })
    }

    /// The gain for the current frame; advances the envelope by one frame
    pub fn next_gain(&mut self) -> f32 {
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Sustaining => 1.0,
            Phase::FadingIn { position } => {
                let gain = position as f32 / CHANNEL_FADE_FRAMES as f32;

                self.phase = if position + 1 >= CHANNEL_FADE_FRAMES {
                    Phase::Sustaining
                } else {
                    Phase::FadingIn {
                        position: position + 1,
                    }
                };

                gain
            }
            Phase::FadingOut { position } => {
                let gain = 1.0 - position as f32 / CHANNEL_FADE_FRAMES as f32;

                self.phase = if position + 1 >= CHANNEL_FADE_FRAMES {
                    Phase::Idle
                } else {
                    Phase::FadingOut {
                        position: position + 1,
                    }
                };

                gain
            }
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
