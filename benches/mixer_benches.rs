use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use audiostream::{
    open_engine, AudioStream, EngineConfig, FadeStream, LoopStream, MemorySound, OwnedAudioBuffer,
    ReadStream, StereoStream, SymbolicDate,
};

fn sine_stream(frame_count: usize, sample_rate: usize) -> Box<dyn AudioStream> {
    let buffer = OwnedAudioBuffer::sine(frame_count, 1, sample_rate, 440.0, 0.5);
    Box::new(ReadStream::new(MemorySound::new(buffer)))
}

fn mixer_benchmarks(c: &mut Criterion) {
    c.bench_function("process cycle with scheduled streams", |bencher| {
        let config = EngineConfig {
            buffer_size: 512,
            ..Default::default()
        };
        let (player, mut process) = open_engine(config).expect("engine should open");
        player.start();

        for voice in 0..16_u64 {
            let stream = Box::new(StereoStream::new(Box::new(LoopStream::new(
                sine_stream(config.sample_rate, config.sample_rate),
                0,
            ))));
            player
                .play_stream(
                    stream,
                    SymbolicDate::absolute(voice * 32),
                    SymbolicDate::deferred(),
                )
                .expect("dates are valid");
        }

        let input = OwnedAudioBuffer::new(512, config.input_channel_count);
        let mut output = OwnedAudioBuffer::new(512, config.output_channel_count);

        bencher.iter(|| process.process(&input, &mut output));

        black_box(output);
    });

    c.bench_function("process cycle with playing channels", |bencher| {
        let config = EngineConfig {
            buffer_size: 512,
            ..Default::default()
        };
        let (player, mut process) = open_engine(config).expect("engine should open");
        player.start();

        for channel in 0..config.channel_count {
            let stream = Box::new(LoopStream::new(
                Box::new(FadeStream::new(
                    sine_stream(config.sample_rate, config.sample_rate),
                    64,
                    64,
                )),
                0,
            ));
            player.load_channel(channel, stream).expect("channel exists");
            player.start_channel(channel).expect("channel exists");
        }

        let input = OwnedAudioBuffer::new(512, config.input_channel_count);
        let mut output = OwnedAudioBuffer::new(512, config.output_channel_count);

        bencher.iter(|| process.process(&input, &mut output));

        black_box(output);
    });
}

criterion_group!(benches, mixer_benchmarks);

criterion_main!(benches);
