use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use audiostream::{
    open_engine, share_effect, AudioBuffer, AudioProcess, AudioStream, EngineConfig, MemorySound,
    OwnedAudioBuffer, Player, ReadStream, SampleLocation, ScheduleError, SymbolicDate,
    VolumeEffect,
};

struct Fixture {
    player: Player,
    process: Box<dyn AudioProcess + Send>,
    input_channel_count: usize,
    output_channel_count: usize,
}

impl Fixture {
    fn new() -> Self {
        let config = EngineConfig {
            buffer_size: 128,
            ..Default::default()
        };

        let (player, process) = open_engine(config).expect("engine should open");
        player.start();

        Self {
            player,
            process,
            input_channel_count: config.input_channel_count,
            output_channel_count: config.output_channel_count,
        }
    }

    fn process_frames(&mut self, frame_count: usize) -> OwnedAudioBuffer {
        let input = OwnedAudioBuffer::new(frame_count, self.input_channel_count);
        let mut output = OwnedAudioBuffer::new(frame_count, self.output_channel_count);
        self.process.process(&input, &mut output);
        output
    }
}

fn constant_stream(frame_count: usize, value: f32) -> Box<dyn AudioStream> {
    let mut buffer = OwnedAudioBuffer::new(frame_count, 1);
    buffer.fill_with_value(value);
    Box::new(ReadStream::new(MemorySound::new(buffer)))
}

#[test]
fn playback_windows_are_sample_accurate() {
    let mut fixture = Fixture::new();

    fixture
        .player
        .play_stream(
            constant_stream(4096, 1.0),
            SymbolicDate::absolute(100),
            SymbolicDate::absolute(180),
        )
        .expect("dates are valid");

    // First cycle covers [0, 64): nothing is due yet
    let output = fixture.process_frames(64);
    assert!(output.channel_is_silent(0));

    // Second cycle covers [64, 192): the window [100, 180) lands at
    // offsets [36, 116)
    let output = fixture.process_frames(128);
    assert_eq!(output.get_sample(SampleLocation::frame(35)), 0.0);
    assert_eq!(output.get_sample(SampleLocation::frame(36)), 1.0);
    assert_eq!(output.get_sample(SampleLocation::frame(115)), 1.0);
    assert_eq!(output.get_sample(SampleLocation::frame(116)), 0.0);

    // The command retired; nothing plays afterwards
    let output = fixture.process_frames(128);
    assert!(output.channel_is_silent(0));
}

#[test]
fn inverted_absolute_dates_are_rejected() {
    let fixture = Fixture::new();

    let result = fixture.player.play_stream(
        constant_stream(4096, 1.0),
        SymbolicDate::absolute(200),
        SymbolicDate::absolute(100),
    );

    assert_eq!(
        result.err(),
        Some(ScheduleError::InvertedDates {
            start: 200,
            stop: 100
        })
    );
}

#[test]
fn deferred_dates_hold_commands_until_set() {
    let mut fixture = Fixture::new();

    let start = SymbolicDate::deferred();
    fixture
        .player
        .play_stream(
            constant_stream(4096, 1.0),
            start.clone(),
            SymbolicDate::deferred(),
        )
        .expect("dates are valid");

    let output = fixture.process_frames(128);
    assert!(output.channel_is_silent(0));

    start.set(160);
    let output = fixture.process_frames(128);
    assert_eq!(output.get_sample(SampleLocation::frame(31)), 0.0);
    assert_eq!(output.get_sample(SampleLocation::frame(32)), 1.0);
}

#[test]
fn relative_dates_follow_their_base() {
    let mut fixture = Fixture::new();

    let base = SymbolicDate::absolute(100);
    fixture
        .player
        .play_stream(
            constant_stream(4096, 1.0),
            SymbolicDate::offset_from(&base, -50),
            base,
        )
        .expect("dates are valid");

    let output = fixture.process_frames(128);
    assert_eq!(output.get_sample(SampleLocation::frame(49)), 0.0);
    assert_eq!(output.get_sample(SampleLocation::frame(50)), 1.0);
    assert_eq!(output.get_sample(SampleLocation::frame(99)), 1.0);
    assert_eq!(output.get_sample(SampleLocation::frame(100)), 0.0);
}

#[test]
fn cancelled_streams_never_play() {
    let mut fixture = Fixture::new();

    let id = fixture
        .player
        .play_stream(
            constant_stream(4096, 1.0),
            SymbolicDate::absolute(0),
            SymbolicDate::deferred(),
        )
        .expect("dates are valid");

    fixture.player.cancel_stream(id);

    let output = fixture.process_frames(128);
    assert!(output.channel_is_silent(0));
}

#[test]
fn callbacks_fire_at_their_date() {
    let mut fixture = Fixture::new();

    let fired_at = Arc::new(AtomicU64::new(u64::MAX));
    let fired_clone = Arc::clone(&fired_at);

    fixture.player.schedule_callback(
        SymbolicDate::absolute(300),
        move |frame| {
            fired_clone.store(frame, Ordering::Release);
        },
    );

    fixture.process_frames(128);
    assert_eq!(fired_at.load(Ordering::Acquire), u64::MAX);

    fixture.process_frames(128);
    fixture.process_frames(128);
    assert_eq!(fired_at.load(Ordering::Acquire), 300);
}

#[test]
fn effect_controls_change_at_their_date() {
    let mut fixture = Fixture::new();

    let effect = share_effect(VolumeEffect::new(1.0));
    fixture
        .player
        .schedule_effect_control(Arc::clone(&effect), 0, 0.25, SymbolicDate::absolute(64));

    fixture.process_frames(128);

    let value = effect.lock().expect("effect lock").control_value(0);
    assert_eq!(value, 0.25);
}
