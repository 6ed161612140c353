//! Spectrum sampling: raw analyser magnitudes in, normalized frames out.

use crate::constants::{DB_FLOOR, DB_RANGE};

/// Map a decibel magnitude onto 0..1. NaN is treated as silence.
#[inline]
pub fn normalize_db(db: f32) -> f32 {
    if db.is_nan() {
        return 0.0;
    }
    ((db - DB_FLOOR) / DB_RANGE).clamp(0.0, 1.0)
}

/// One frame of normalized frequency magnitudes, lowest frequency first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpectrumFrame {
    bins: Vec<f32>,
}

impl SpectrumFrame {
    pub fn silent(len: usize) -> Self {
        Self {
            bins: vec![0.0; len],
        }
    }

    pub fn from_decibels(db: &[f32]) -> Self {
        Self {
            bins: db.iter().copied().map(normalize_db).collect(),
        }
    }

    /// Build from already-normalized values; anything out of range is clamped.
    pub fn from_normalized(values: impl Into<Vec<f32>>) -> Self {
        let mut bins = values.into();
        for v in &mut bins {
            *v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        }
        Self { bins }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.bins
    }

    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        self.bins.get(index).copied().unwrap_or(0.0)
    }

    /// Value for entity `index` out of `count` entities sharing this spectrum.
    ///
    /// Uses `floor(index * len / count)` with no interpolation, so when the
    /// counts don't divide evenly some bins are skipped.
    pub fn bucket(&self, index: usize, count: usize) -> f32 {
        if count == 0 || self.bins.is_empty() {
            return 0.0;
        }
        self.get(bucket_index(index, count, self.bins.len()))
    }

    /// Nearest-bin downsample into `buckets` values.
    pub fn downsample(&self, buckets: usize) -> Vec<f32> {
        (0..buckets).map(|i| self.bucket(i, buckets)).collect()
    }

    pub fn is_silent(&self) -> bool {
        self.bins.iter().all(|v| *v == 0.0)
    }
}

#[inline]
pub fn bucket_index(index: usize, count: usize, len: usize) -> usize {
    ((index * len) / count.max(1)).min(len.saturating_sub(1))
}

/// Read side of the audio analysis primitive.
pub trait SpectrumSource {
    /// Number of frequency bins per read.
    fn bin_count(&self) -> usize;
    /// Fill `out` with raw decibel magnitudes (typically -100..0).
    fn read_decibels(&mut self, out: &mut [f32]);
}

/// Pulls one spectrum per frame from a source and normalizes it.
pub struct SpectrumSampler {
    resolution: usize,
    scratch: Vec<f32>,
}

impl SpectrumSampler {
    /// `fft_size` is the analyser FFT size; the frame resolution is half of it.
    pub fn new(fft_size: u32) -> Self {
        let resolution = (fft_size / 2) as usize;
        Self {
            resolution,
            scratch: vec![0.0; resolution],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn silent(&self) -> SpectrumFrame {
        SpectrumFrame::silent(self.resolution)
    }

    /// Sample the source, or return the silent frame when there is none.
    pub fn sample(&mut self, source: Option<&mut dyn SpectrumSource>) -> SpectrumFrame {
        match source {
            Some(src) => self.read(src),
            None => self.silent(),
        }
    }

    /// Read and normalize one frame from `src`.
    pub fn read<S: SpectrumSource + ?Sized>(&mut self, src: &mut S) -> SpectrumFrame {
        let bins = src.bin_count();
        if bins != self.scratch.len() {
            log::warn!(
                "[spectrum] source reports {} bins, expected {}; resizing",
                bins,
                self.resolution
            );
            self.scratch.resize(bins, DB_FLOOR);
        }
        src.read_decibels(&mut self.scratch);
        SpectrumFrame::from_decibels(&self.scratch)
    }
}
