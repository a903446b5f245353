use approx::assert_relative_eq;
use audiostream::{
    AudioBuffer, AudioStream, CutStream, FadeStream, LoopStream, MemorySound, MixStream,
    NullStream, OwnedAudioBuffer, ReadStream, SampleLocation, SequenceStream, StereoStream,
    StreamLength,
};

fn constant_stream(frame_count: usize, value: f32) -> Box<dyn AudioStream> {
    let mut buffer = OwnedAudioBuffer::new(frame_count, 1);
    buffer.fill_with_value(value);
    Box::new(ReadStream::new(MemorySound::new(buffer)))
}

fn render(stream: &mut dyn AudioStream, frame_count: usize) -> OwnedAudioBuffer {
    let mut buffer = OwnedAudioBuffer::new(frame_count, stream.channel_count());

    let mut position = 0;
    while position < frame_count {
        let cycle = 512.min(frame_count - position);
        let produced = stream.read(&mut buffer, cycle, position);
        position += cycle;

        if produced < cycle {
            break;
        }
    }

    buffer
}

#[test]
fn mix_length_is_the_maximum_of_its_children() {
    let mix = MixStream::new(constant_stream(100, 1.0), constant_stream(250, 1.0));
    assert_eq!(mix.length(), StreamLength::Frames(250));
}

#[test]
fn sequence_length_subtracts_the_crossfade() {
    let sequence = SequenceStream::new(constant_stream(1000, 1.0), constant_stream(500, 1.0), 100);
    assert_eq!(sequence.length(), StreamLength::Frames(1400));
}

#[test]
fn read_reset_read_is_idempotent() {
    let sound = MemorySound::new(OwnedAudioBuffer::sine(2000, 1, 44_100, 220.0, 1.0));
    let mut stream = ReadStream::new(sound);

    let first_pass = render(&mut stream, 2000);
    stream.reset();
    let second_pass = render(&mut stream, 2000);

    for frame in (0..2000).step_by(13) {
        let location = SampleLocation::frame(frame);
        assert_eq!(
            first_pass.get_sample(location),
            second_pass.get_sample(location)
        );
    }
}

#[test]
fn duplicates_are_independent() {
    let mut original = LoopStream::new(constant_stream(10, 1.0), 4);
    let mut copy = original.duplicate();

    let mut buffer = OwnedAudioBuffer::new(64, 1);
    assert_eq!(original.read(&mut buffer, 25, 0), 25);

    // The copy starts from the beginning regardless of the original's
    // position
    buffer.clear();
    assert_eq!(copy.read(&mut buffer, 40, 0), 40);
    assert_eq!(buffer.get_sample(SampleLocation::frame(0)), 1.0);
}

#[test]
fn composed_tree_renders_sample_accurately() {
    // 100 silent frames, then 200 frames of a faded constant, looped
    // twice, in stereo
    let faded = Box::new(FadeStream::new(constant_stream(200, 0.8), 50, 50));
    let sequence = Box::new(SequenceStream::new(
        Box::new(NullStream::new(100, 1)),
        faded,
        0,
    ));
    let looped = Box::new(LoopStream::new(sequence, 2));
    let mut stereo = StereoStream::new(looped);

    assert_eq!(stereo.length(), StreamLength::Frames(600));
    assert_eq!(stereo.channel_count(), 2);

    let rendered = render(&mut stereo, 600);

    // Silence before the fade starts, both iterations
    assert_eq!(rendered.get_sample(SampleLocation::new(0, 50)), 0.0);
    assert_eq!(rendered.get_sample(SampleLocation::new(1, 350)), 0.0);

    // The plateau reaches full level in both channels
    assert_relative_eq!(
        rendered.get_sample(SampleLocation::new(0, 200)),
        0.8,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        rendered.get_sample(SampleLocation::new(1, 500)),
        0.8,
        epsilon = 1e-6
    );
}

#[test]
fn cut_begin_recomposes_an_independent_tree() {
    let mut ramp = OwnedAudioBuffer::new(100, 1);
    for frame in 0..100 {
        ramp.set_sample(SampleLocation::frame(frame), frame as f32);
    }

    let original = ReadStream::new(MemorySound::new(ramp));
    let mut cut = original.cut_begin(40);

    assert_eq!(cut.length(), StreamLength::Frames(60));

    let rendered = render(cut.as_mut(), 60);
    assert_eq!(rendered.get_sample(SampleLocation::frame(0)), 40.0);
    assert_eq!(rendered.get_sample(SampleLocation::frame(59)), 99.0);
}

#[test]
fn cut_stream_clamps_to_the_child() {
    let cut = CutStream::new(constant_stream(100, 1.0), 20, 500);
    assert_eq!(cut.length(), StreamLength::Frames(80));

    let empty = CutStream::new(constant_stream(100, 1.0), 50, 50);
    assert_eq!(empty.length(), StreamLength::Frames(0));
}

#[test]
fn overlapping_mix_sums_samples() {
    let mut mix = MixStream::new(constant_stream(100, 0.25), constant_stream(50, 0.5));
    let rendered = render(&mut mix, 100);

    assert_relative_eq!(rendered.get_sample(SampleLocation::frame(25)), 0.75);
    assert_relative_eq!(rendered.get_sample(SampleLocation::frame(75)), 0.25);
}
