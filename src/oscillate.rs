/// Procedural oscillators for ambient idle motion (particle float, strip
/// shimmer). Sampled from wall-clock seconds supplied by the caller so the
/// crate itself never reads a clock.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub enum Wave {
    Sine,
    Cosine,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Oscillator {
    pub wave: Wave,
    pub amp: f64,
    pub freq: f64,
    pub phase: f64,
    pub offset: f64,
}

impl Oscillator {
    pub fn sine(amp: f64, freq: f64, phase: f64, offset: f64) -> Self {
        Self {
            wave: Wave::Sine,
            amp,
            freq,
            phase,
            offset,
        }
    }

    pub fn cosine(amp: f64, freq: f64, phase: f64, offset: f64) -> Self {
        Self {
            wave: Wave::Cosine,
            amp,
            freq,
            phase,
            offset,
        }
    }

    pub fn sample(&self, time_secs: f64) -> f64 {
        let arg = time_secs * self.freq + self.phase;
        let v = match self.wave {
            Wave::Sine => arg.sin(),
            Wave::Cosine => arg.cos(),
        };
        self.offset + self.amp * v
    }
}
