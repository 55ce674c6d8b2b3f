//! Similarity scoring between equal-sized grayscale frames

use image::GrayImage;

/// Stabilization constant for the luminance term, (0.01 * 255)^2
const C1: f64 = 6.5025;
/// Stabilization constant for the contrast term, (0.03 * 255)^2
const C2: f64 = 58.5225;

/// Scoring collaborator consumed by the scan engine.
///
/// Returns a value in [0, 1] where 1 means identical frames.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, a: &GrayImage, b: &GrayImage) -> f64;
}

/// Structural similarity (SSIM) over non-overlapping windows.
///
/// Each window contributes the standard SSIM term built from window means,
/// variances and covariance; the final score is the mean over all windows,
/// clamped into [0, 1]. Frames of unequal size are compared over their
/// shared region.
#[derive(Debug, Clone)]
pub struct SsimScorer {
    window: u32,
}

impl SsimScorer {
    pub fn new(window: u32) -> Self {
        Self {
            window: window.max(1),
        }
    }

    fn window_ssim(a: &GrayImage, b: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) -> f64 {
        let n = ((x1 - x0) * (y1 - y0)) as f64;

        let mut sum_a = 0.0;
        let mut sum_b = 0.0;
        for y in y0..y1 {
            for x in x0..x1 {
                sum_a += a.get_pixel(x, y).0[0] as f64;
                sum_b += b.get_pixel(x, y).0[0] as f64;
            }
        }
        let mean_a = sum_a / n;
        let mean_b = sum_b / n;

        let mut var_a = 0.0;
        let mut var_b = 0.0;
        let mut covar = 0.0;
        for y in y0..y1 {
            for x in x0..x1 {
                let da = a.get_pixel(x, y).0[0] as f64 - mean_a;
                let db = b.get_pixel(x, y).0[0] as f64 - mean_b;
                var_a += da * da;
                var_b += db * db;
                covar += da * db;
            }
        }
        var_a /= n;
        var_b /= n;
        covar /= n;

        let numerator = (2.0 * mean_a * mean_b + C1) * (2.0 * covar + C2);
        let denominator = (mean_a * mean_a + mean_b * mean_b + C1) * (var_a + var_b + C2);
        numerator / denominator
    }
}

impl Default for SsimScorer {
    fn default() -> Self {
        Self::new(8)
    }
}

impl SimilarityScorer for SsimScorer {
    fn score(&self, a: &GrayImage, b: &GrayImage) -> f64 {
        let width = a.width().min(b.width());
        let height = a.height().min(b.height());
        if width == 0 || height == 0 {
            return 0.0;
        }

        let mut total = 0.0;
        let mut windows = 0u64;
        let mut y = 0;
        while y < height {
            let y1 = (y + self.window).min(height);
            let mut x = 0;
            while x < width {
                let x1 = (x + self.window).min(width);
                total += Self::window_ssim(a, b, x, y, x1, y1);
                windows += 1;
                x = x1;
            }
            y = y1;
        }

        (total / windows as f64).clamp(0.0, 1.0)
    }
}
