use crate::merge::MergedRegion;
use hexmap_core::Rgb;
use palette::{FromColor, Lab, Srgb};

/// Maps a measure value to a fill color.
///
/// Interpolation happens in CIE Lab so midpoints between diverging endpoints keep a plausible
/// hue; interpolating sRGB channels directly muddies them.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorScale {
    /// Every value maps to the same color.
    Constant(Rgb),
    Linear {
        min: f64,
        max: f64,
        low: Rgb,
        high: Rgb,
        low_lab: Lab,
        high_lab: Lab,
    },
}

impl ColorScale {
    /// Scale over the measure values of matched regions.
    ///
    /// Without a bound measure the scale is constant `high`. With one, the domain is the extent of
    /// matched values; unmatched regions do not contribute. A single-value domain maps everything
    /// to `low`.
    pub fn build(merged: &[MergedRegion], measure_bound: bool, low: Rgb, high: Rgb) -> Self {
        if !measure_bound {
            return Self::Constant(high);
        }
        let Some((min, max)) = extent(merged.iter().filter_map(MergedRegion::measure_value))
        else {
            return Self::Constant(high);
        };
        Self::linear(min, max, low, high)
    }

    pub fn linear(min: f64, max: f64, low: Rgb, high: Rgb) -> Self {
        Self::Linear {
            min,
            max,
            low,
            high,
            low_lab: to_lab(low),
            high_lab: to_lab(high),
        }
    }

    pub fn domain(&self) -> Option<(f64, f64)> {
        match self {
            Self::Constant(_) => None,
            Self::Linear { min, max, .. } => Some((*min, *max)),
        }
    }

    pub fn color(&self, value: f64) -> Rgb {
        match self {
            Self::Constant(c) => *c,
            Self::Linear {
                min,
                max,
                low,
                high,
                low_lab,
                high_lab,
            } => {
                let span = max - min;
                let t = if span == 0.0 || !span.is_finite() {
                    0.0
                } else {
                    (value - min) / span
                };
                if t == 0.0 || !t.is_finite() {
                    return *low;
                }
                if t == 1.0 {
                    return *high;
                }
                let t = t as f32;
                let mixed = Lab::new(
                    low_lab.l + (high_lab.l - low_lab.l) * t,
                    low_lab.a + (high_lab.a - low_lab.a) * t,
                    low_lab.b + (high_lab.b - low_lab.b) * t,
                );
                let rgb: Srgb = Srgb::from_color(mixed);
                Rgb::from_f32([rgb.red, rgb.green, rgb.blue])
            }
        }
    }
}

fn to_lab(color: Rgb) -> Lab {
    let [r, g, b] = color.to_f32();
    Lab::from_color(Srgb::new(r, g, b))
}

fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
}
