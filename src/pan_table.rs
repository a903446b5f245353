use std::sync::OnceLock;

const TABLE_SIZE: usize = 128;

/// Precomputed equal-power pan and volume curves
///
/// Volume and pan values in `[0, 1]` are quantized to 128 steps before
/// lookup. The quantization is audible in principle; it is the intended
/// trade-off for a table lookup in the mix loop. [`PanTable::left_right`]
/// is the unquantized reference law, and the two agree at the 128 table
/// points.
pub struct PanTable {
    pan: [f32; TABLE_SIZE],
    vol: [f32; TABLE_SIZE],
}

fn shared_table() -> &'static PanTable {
    static TABLE: OnceLock<PanTable> = OnceLock::new();
    TABLE.get_or_init(PanTable::build)
}

impl PanTable {
    fn build() -> Self {
        let mut pan = [0.0_f32; TABLE_SIZE];
        let mut vol = [0.0_f32; TABLE_SIZE];

        for (index, value) in pan.iter_mut().enumerate() {
            let curve =
                (index as f32 / (TABLE_SIZE - 1) as f32 * std::f32::consts::FRAC_PI_2).cos();
            *value = curve * curve;
        }

        for (index, value) in vol.iter_mut().enumerate().skip(1) {
            let curve = index as f32 / (TABLE_SIZE - 1) as f32;
            *value = curve * curve;
        }

        // Index 0 must be exact silence
        vol[0] = 0.0;

        Self { pan, vol }
    }

    fn quantize(value: f32) -> usize {
        let index = (value * (TABLE_SIZE - 1) as f32).round() as isize;
        index.clamp(0, (TABLE_SIZE - 1) as isize) as usize
    }

    /// The perceptual volume curve at a table index
    pub fn vol(index: usize) -> f32 {
        shared_table().vol[index.min(TABLE_SIZE - 1)]
    }

    /// Quantized left gain for a volume and pan in `[0, 1]`
    pub fn vol_left(vol: f32, pan: f32) -> f32 {
        let table = shared_table();
        table.vol[Self::quantize(vol)] * (1.0 - table.pan[Self::quantize(pan)])
    }

    /// Quantized right gain for a volume and pan in `[0, 1]`
    pub fn vol_right(vol: f32, pan: f32) -> f32 {
        let table = shared_table();
        table.vol[Self::quantize(vol)] * table.pan[Self::quantize(pan)]
    }

    /// Unquantized equal-power gains for a volume and pan in `[0, 1]`
    pub fn left_right(vol: f32, pan: f32) -> (f32, f32) {
        let left = vol * (pan * std::f32::consts::FRAC_PI_2).sin();
        let right = vol * (pan * std::f32::consts::FRAC_PI_2).cos();
        (left, right)
    }
}
