//! Pixel-wise comparison of two equally sized rasters

use image::Rgba;
use log::debug;

use crate::capture::Raster;

/// How a compared pixel pair is turned into an output pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareMode {
    /// White where equal, black where different
    BlackWhite,
    /// Black where equal, white where different
    WhiteBlack,
    /// Gray level `255 - distance`: closer is whiter
    GrayWhite,
    /// Gray level `distance`: closer is blacker
    GrayBlack,
    /// Per-channel average
    Mixed,
    /// Per-channel `|subject - reference|`
    SubBlack,
    /// Per-channel `255 - |subject - reference|`
    SubWhite,
}

impl CompareMode {
    pub fn all() -> &'static [CompareMode] {
        &[
            CompareMode::BlackWhite,
            CompareMode::WhiteBlack,
            CompareMode::GrayWhite,
            CompareMode::GrayBlack,
            CompareMode::Mixed,
            CompareMode::SubBlack,
            CompareMode::SubWhite,
        ]
    }

    /// Stable identifier, used as menu action target
    pub fn key(&self) -> &'static str {
        match self {
            CompareMode::BlackWhite => "black-white",
            CompareMode::WhiteBlack => "white-black",
            CompareMode::GrayWhite => "gray-white",
            CompareMode::GrayBlack => "gray-black",
            CompareMode::Mixed => "mixed",
            CompareMode::SubBlack => "sub-black",
            CompareMode::SubWhite => "sub-white",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompareMode::BlackWhite => "Equal White / Different Black",
            CompareMode::WhiteBlack => "Equal Black / Different White",
            CompareMode::GrayWhite => "Distance, Equal White",
            CompareMode::GrayBlack => "Distance, Equal Black",
            CompareMode::Mixed => "Mixed",
            CompareMode::SubBlack => "Difference, Equal Black",
            CompareMode::SubWhite => "Difference, Equal White",
        }
    }

    fn apply(&self, reference: &Rgba<u8>, subject: &Rgba<u8>) -> Rgba<u8> {
        match self {
            CompareMode::BlackWhite => {
                if reference == subject {
                    gray(255)
                } else {
                    gray(0)
                }
            }
            CompareMode::WhiteBlack => {
                if reference == subject {
                    gray(0)
                } else {
                    gray(255)
                }
            }
            CompareMode::GrayWhite => {
                let d = distance(reference, subject).round();
                gray((255.0 - d).clamp(0.0, 255.0) as u8)
            }
            CompareMode::GrayBlack => {
                let d = distance(reference, subject).round();
                gray(d.clamp(0.0, 255.0) as u8)
            }
            CompareMode::Mixed => per_channel(reference, subject, |a, b| {
                ((a as u16 + b as u16) / 2) as u8
            }),
            CompareMode::SubBlack => per_channel(reference, subject, |a, b| a.abs_diff(b)),
            CompareMode::SubWhite => {
                per_channel(reference, subject, |a, b| 255 - a.abs_diff(b))
            }
        }
    }
}

impl std::fmt::Display for CompareMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for CompareMode {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompareMode::all()
            .iter()
            .find(|mode| mode.key() == s)
            .copied()
            .ok_or_else(|| CompareError::UnsupportedMode(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    DimensionMismatch {
        reference: (u32, u32),
        subject: (u32, u32),
    },
    UnsupportedMode(String),
}

impl std::fmt::Display for CompareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareError::DimensionMismatch { reference, subject } => write!(
                f,
                "Image sizes differ: reference {}x{}, subject {}x{}",
                reference.0, reference.1, subject.0, subject.1
            ),
            CompareError::UnsupportedMode(mode) => {
                write!(f, "Unsupported compare mode \"{}\"", mode)
            }
        }
    }
}

impl std::error::Error for CompareError {}

fn gray(level: u8) -> Rgba<u8> {
    Rgba([level, level, level, 255])
}

/// Euclidean distance over the color channels, alpha ignored
fn distance(a: &Rgba<u8>, b: &Rgba<u8>) -> f64 {
    a.0[..3]
        .iter()
        .zip(&b.0[..3])
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

fn per_channel(reference: &Rgba<u8>, subject: &Rgba<u8>, f: impl Fn(u8, u8) -> u8) -> Rgba<u8> {
    let [r0, g0, b0, _] = reference.0;
    let [r1, g1, b1, _] = subject.0;
    Rgba([f(r1, r0), f(g1, g0), f(b1, b0), 255])
}

/// Rewrite `subject` in place with the comparison against `reference`
pub fn compare(
    reference: &Raster,
    subject: &mut Raster,
    mode: CompareMode,
) -> Result<(), CompareError> {
    if reference.dimensions() != subject.dimensions() {
        return Err(CompareError::DimensionMismatch {
            reference: reference.dimensions(),
            subject: subject.dimensions(),
        });
    }

    debug!(
        "Comparing {}x{} rasters with {:?}",
        subject.width(),
        subject.height(),
        mode
    );
    for (out, reference) in subject.pixels_mut().zip(reference.pixels()) {
        *out = mode.apply(reference, out);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Raster {
        Raster::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    fn noisy(width: u32, height: u32, seed: u32) -> Raster {
        Raster::from_fn(width, height, |x, y| {
            let v = (x * 31 + y * 17 + seed * 101) % 256;
            Rgba([v as u8, (v * 7 % 256) as u8, (255 - v) as u8, 255])
        })
    }

    fn compared(reference: &Raster, subject: &Raster, mode: CompareMode) -> Raster {
        let mut out = subject.clone();
        compare(reference, &mut out, mode).unwrap();
        out
    }

    #[test]
    fn test_identical_red_black_white_is_white() {
        let reference = solid(4, 4, [255, 0, 0]);
        let out = compared(&reference, &reference.clone(), CompareMode::BlackWhite);
        assert!(out.pixels().all(|p| p.0[..3] == [255, 255, 255]));
    }

    #[test]
    fn test_identical_white_black_is_black() {
        let reference = noisy(8, 8, 3);
        let out = compared(&reference, &reference.clone(), CompareMode::WhiteBlack);
        assert!(out.pixels().all(|p| p.0[..3] == [0, 0, 0]));
    }

    #[test]
    fn test_black_white_marks_differences() {
        let reference = solid(3, 1, [10, 20, 30]);
        let mut subject = reference.clone();
        subject.put_pixel(1, 0, Rgba([10, 20, 31, 255]));

        let out = compared(&reference, &subject, CompareMode::BlackWhite);
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(1, 0).0, [0, 0, 0, 255]);

        let out = compared(&reference, &subject, CompareMode::WhiteBlack);
        assert_eq!(out.get_pixel(1, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_gray_distance() {
        let reference = solid(1, 1, [0, 0, 0]);
        let subject = solid(1, 1, [3, 4, 0]);
        let white = compared(&reference, &subject, CompareMode::GrayWhite);
        let black = compared(&reference, &subject, CompareMode::GrayBlack);
        assert_eq!(white.get_pixel(0, 0).0, [250, 250, 250, 255]);
        assert_eq!(black.get_pixel(0, 0).0, [5, 5, 5, 255]);
    }

    #[test]
    fn test_gray_modes_are_complementary() {
        let reference = noisy(16, 16, 1);
        let subject = noisy(16, 16, 2);
        let white = compared(&reference, &subject, CompareMode::GrayWhite);
        let black = compared(&reference, &subject, CompareMode::GrayBlack);

        for ((r, s), (w, b)) in reference
            .pixels()
            .zip(subject.pixels())
            .zip(white.pixels().zip(black.pixels()))
        {
            let d = distance(r, s).round();
            if d <= 255.0 {
                assert_eq!(w.0[0] as u32 + b.0[0] as u32, 255);
            } else {
                assert_eq!((w.0[0], b.0[0]), (0, 255));
            }
        }
    }

    #[test]
    fn test_gray_saturates() {
        let reference = solid(1, 1, [0, 0, 0]);
        let subject = solid(1, 1, [255, 255, 255]);
        let white = compared(&reference, &subject, CompareMode::GrayWhite);
        let black = compared(&reference, &subject, CompareMode::GrayBlack);
        assert_eq!(white.get_pixel(0, 0).0[0], 0);
        assert_eq!(black.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_sub_modes_are_complementary() {
        let reference = noisy(16, 16, 5);
        let subject = noisy(16, 16, 9);
        let black = compared(&reference, &subject, CompareMode::SubBlack);
        let white = compared(&reference, &subject, CompareMode::SubWhite);
        for (b, w) in black.pixels().zip(white.pixels()) {
            for c in 0..3 {
                assert_eq!(b.0[c] as u32 + w.0[c] as u32, 255);
            }
        }
    }

    #[test]
    fn test_sub_black_is_absolute_difference() {
        let reference = solid(1, 1, [200, 10, 100]);
        let subject = solid(1, 1, [50, 60, 100]);
        let out = compared(&reference, &subject, CompareMode::SubBlack);
        assert_eq!(out.get_pixel(0, 0).0, [150, 50, 0, 255]);
    }

    #[test]
    fn test_mixed_averages_channels() {
        let reference = solid(1, 1, [255, 0, 11]);
        let subject = solid(1, 1, [0, 0, 20]);
        let out = compared(&reference, &subject, CompareMode::Mixed);
        assert_eq!(out.get_pixel(0, 0).0, [127, 0, 15, 255]);
    }

    #[test]
    fn test_dimension_mismatch_leaves_subject_untouched() {
        let reference = solid(4, 4, [1, 2, 3]);
        let mut subject = solid(4, 5, [9, 9, 9]);
        let err = compare(&reference, &mut subject, CompareMode::Mixed).unwrap_err();
        assert_eq!(
            err,
            CompareError::DimensionMismatch {
                reference: (4, 4),
                subject: (4, 5)
            }
        );
        assert!(subject.pixels().all(|p| p.0 == [9, 9, 9, 255]));
    }

    #[test]
    fn test_mode_keys_round_trip() {
        for mode in CompareMode::all() {
            assert_eq!(mode.key().parse::<CompareMode>(), Ok(*mode));
        }
        assert_eq!(
            "xor".parse::<CompareMode>(),
            Err(CompareError::UnsupportedMode("xor".to_string()))
        );
    }
}
