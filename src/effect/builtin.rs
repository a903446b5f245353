use crate::{pan_table::PanTable, AudioBuffer, SampleLocation};

use super::{AudioEffect, ControlInfo};

fn copy_through(input: &dyn AudioBuffer, output: &mut dyn AudioBuffer, frame_count: usize) {
    let channel_count = input.channel_count().min(output.channel_count());
    output.copy_from(
        input,
        SampleLocation::origin(),
        SampleLocation::origin(),
        channel_count,
        frame_count,
    );
}

/// A gain effect with a single `volume` control
pub struct VolumeEffect {
    volume: f32,
    bypassed: bool,
}

impl VolumeEffect {
    /// Create a volume effect with a gain in `[0, 1]`
    pub fn new(volume: f32) -> Self {
        Self {
            volume,
            bypassed: false,
        }
    }
}

impl AudioEffect for VolumeEffect {
    fn control_count(&self) -> usize {
        1
    }

    fn control_info(&self, index: usize) -> Option<ControlInfo> {
        (index == 0).then(|| ControlInfo {
            name: "volume".to_string(),
            min: 0.0,
            max: 1.0,
            default: 1.0,
        })
    }

    fn control_value(&self, _index: usize) -> f32 {
        self.volume
    }

    fn set_control_value(&mut self, index: usize, value: f32) {
        if index == 0 {
            self.volume = value.clamp(0.0, 1.0);
        }
    }

    fn process(
        &mut self,
        input: &dyn AudioBuffer,
        output: &mut dyn AudioBuffer,
        frame_count: usize,
    ) {
        if self.bypassed {
            copy_through(input, output, frame_count);
            return;
        }

        let channel_count = input.channel_count().min(output.channel_count());

        for channel in 0..channel_count {
            let source = input.get_channel_data(SampleLocation::channel(channel));
            let destination = output.get_channel_data_mut(SampleLocation::channel(channel));

            for (destination_value, source_value) in destination[..frame_count]
                .iter_mut()
                .zip(source[..frame_count].iter())
            {
                *destination_value = *source_value * self.volume;
            }
        }
    }

    fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    fn is_bypassed(&self) -> bool {
        self.bypassed
    }
}

/// An equal-power pan effect for mono input, producing stereo output
pub struct MonoPanEffect {
    pan: f32,
    bypassed: bool,
}

impl MonoPanEffect {
    /// Create a pan effect with a pan in `[0, 1]`
    pub fn new(pan: f32) -> Self {
        Self {
            pan,
            bypassed: false,
        }
    }
}

impl AudioEffect for MonoPanEffect {
    fn control_count(&self) -> usize {
        1
    }

    fn control_info(&self, index: usize) -> Option<ControlInfo> {
        (index == 0).then(|| ControlInfo {
            name: "pan".to_string(),
            min: 0.0,
            max: 1.0,
            default: 0.5,
        })
    }

    fn control_value(&self, _index: usize) -> f32 {
        self.pan
    }

    fn set_control_value(&mut self, index: usize, value: f32) {
        if index == 0 {
            self.pan = value.clamp(0.0, 1.0);
        }
    }

    fn process(
        &mut self,
        input: &dyn AudioBuffer,
        output: &mut dyn AudioBuffer,
        frame_count: usize,
    ) {
        if self.bypassed {
            copy_through(input, output, frame_count);
            return;
        }

        let (left_gain, right_gain) = PanTable::left_right(1.0, self.pan);

        let source = input.get_channel_data(SampleLocation::origin());

        for frame in 0..frame_count {
            let value = source[frame];
            output.set_sample(SampleLocation::new(0, frame), value * left_gain);
            if output.channel_count() > 1 {
                output.set_sample(SampleLocation::new(1, frame), value * right_gain);
            }
        }
    }

    fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    fn is_bypassed(&self) -> bool {
        self.bypassed
    }
}

/// A pan effect with independent left and right pan controls for stereo
/// input
pub struct StereoPanEffect {
    pan_left: f32,
    pan_right: f32,
    bypassed: bool,
}

impl StereoPanEffect {
    /// Create a stereo pan effect with left and right pans in `[0, 1]`
    pub fn new(pan_left: f32, pan_right: f32) -> Self {
        Self {
            pan_left,
            pan_right,
            bypassed: false,
        }
    }
}

impl AudioEffect for StereoPanEffect {
    fn control_count(&self) -> usize {
        2
    }

    fn control_info(&self, index: usize) -> Option<ControlInfo> {
        match index {
            0 => Some(ControlInfo {
                name: "pan_left".to_string(),
                min: 0.0,
                max: 1.0,
                default: 1.0,
            }),
            1 => Some(ControlInfo {
                name: "pan_right".to_string(),
                min: 0.0,
                max: 1.0,
                default: 0.0,
            }),
            _ => None,
        }
    }

    fn control_value(&self, index: usize) -> f32 {
        match index {
            0 => self.pan_left,
            _ => self.pan_right,
        }
    }

    fn set_control_value(&mut self, index: usize, value: f32) {
        match index {
            0 => self.pan_left = value.clamp(0.0, 1.0),
            1 => self.pan_right = value.clamp(0.0, 1.0),
            _ => (),
        }
    }

    fn process(
        &mut self,
        input: &dyn AudioBuffer,
        output: &mut dyn AudioBuffer,
        frame_count: usize,
    ) {
        if self.bypassed {
            copy_through(input, output, frame_count);
            return;
        }

        let left_gain = PanTable::vol_left(1.0, self.pan_left);
        let right_gain = PanTable::vol_right(1.0, self.pan_right);

        for frame in 0..frame_count {
            let left = input.get_sample(SampleLocation::new(0, frame));
            output.set_sample(SampleLocation::new(0, frame), left * left_gain);

            if input.channel_count() > 1 && output.channel_count() > 1 {
                let right = input.get_sample(SampleLocation::new(1, frame));
                output.set_sample(SampleLocation::new(1, frame), right * right_gain);
            }
        }
    }

    fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    fn is_bypassed(&self) -> bool {
        self.bypassed
    }
}
