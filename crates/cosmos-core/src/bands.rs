//! Bass/mid/treble aggregation over a normalized spectrum.

use crate::spectrum::SpectrumFrame;

/// Mean energy of each third of the spectrum, each in 0..1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandEnergy {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
}

impl BandEnergy {
    pub const SILENT: BandEnergy = BandEnergy {
        bass: 0.0,
        mid: 0.0,
        treble: 0.0,
    };

    /// Average of the three bands.
    pub fn overall(&self) -> f32 {
        (self.bass + self.mid + self.treble) / 3.0
    }
}

/// The three contiguous, equal-sized band segments of `frame`.
///
/// Each segment is `floor(len / 3)` long; the `len % 3` highest bins are dropped.
pub fn band_slices(frame: &SpectrumFrame) -> [&[f32]; 3] {
    let bins = frame.as_slice();
    let size = bins.len() / 3;
    [
        &bins[..size],
        &bins[size..size * 2],
        &bins[size * 2..size * 3],
    ]
}

pub fn aggregate(frame: &SpectrumFrame) -> BandEnergy {
    let [bass, mid, treble] = band_slices(frame);
    BandEnergy {
        bass: mean(bass),
        mid: mean(mid),
        treble: mean(treble),
    }
}

#[inline]
fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f32 = values.iter().sum();
    (sum / values.len() as f32).clamp(0.0, 1.0)
}
