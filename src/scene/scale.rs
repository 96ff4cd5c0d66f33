//! Linear and band scales
//!
//! Same arithmetic as d3's `scaleLinear` (including `nice()` and `ticks()`)
//! and `scaleBand`, so charts line up with what a browser-side renderer
//! would draw for the same data.

/// Step between "nice" ticks covering `[start, stop]` with roughly `count`
/// ticks. Negative values encode the reciprocal of a fractional step
/// (`-10.0` means a step of `0.1`), which keeps tick math exact.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Tick values for `[start, stop]` (ascending).
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if start == stop {
        return vec![start];
    }
    let inc = tick_increment(start, stop, count);
    if inc > 0.0 {
        let r0 = (start / inc).ceil() as i64;
        let r1 = (stop / inc).floor() as i64;
        (r0..=r1).map(|i| i as f64 * inc).collect()
    } else if inc < 0.0 {
        let inv = -inc;
        let r0 = (start * inv).ceil() as i64;
        let r1 = (stop * inv).floor() as i64;
        (r0..=r1).map(|i| i as f64 / inv).collect()
    } else {
        Vec::new()
    }
}

/// Format a tick value: integers get thousands separators, fractions get as
/// many decimals as the tick step needs.
pub fn format_tick(value: f64, step: f64) -> String {
    if step >= 1.0 || step == 0.0 {
        group_thousands(value.round() as i64)
    } else {
        let decimals = (-step.log10().floor()).max(0.0) as usize;
        format!("{:.*}", decimals, value)
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Extend the domain outward to round tick boundaries.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut prestep = 0.0;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if step == prestep {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = step;
        }
        // (x * -step) rounding can yield -0.0
        start += 0.0;
        stop += 0.0;
        self.domain = if reversed { (stop, start) } else { (start, stop) };
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value to a pixel offset. A zero-width domain maps
    /// everything to the middle of the range.
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        ticks(d0.min(d1), d0.max(d1), count)
    }

    pub fn tick_step(&self, count: usize) -> f64 {
        let (d0, d1) = self.domain;
        let inc = tick_increment(d0.min(d1), d0.max(d1), count);
        if inc < 0.0 {
            -1.0 / inc
        } else {
            inc
        }
    }
}

/// Ordinal band scale over `len` positions, with equal inner and outer padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    len: usize,
    range: (f64, f64),
    padding: f64,
}

impl BandScale {
    pub fn new(len: usize, range: (f64, f64), padding: f64) -> Self {
        Self { len, range, padding: padding.clamp(0.0, 1.0) }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.len as f64;
        (r1 - r0) / (n - self.padding + self.padding * 2.0).max(1.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Start offset of band `index`, `None` past the end.
    pub fn position(&self, index: usize) -> Option<f64> {
        if index >= self.len {
            return None;
        }
        let (r0, r1) = self.range;
        let step = self.step();
        let n = self.len as f64;
        // align = 0.5: leftover space split evenly on both sides
        let start = r0 + (r1 - r0 - step * (n - self.padding)) * 0.5;
        Some(start + step * index as f64)
    }
}
