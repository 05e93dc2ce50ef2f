use super::Binarizer;
use crate::image::{GrayImage, ImageView};
use serde::{Deserialize, Serialize};

/// Global Otsu threshold: pixels strictly above the threshold become 255.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtsuBinarizer;

/// Threshold maximizing the between-class variance of the histogram.
///
/// Class 0 holds values `<= t`. Returns 0 for empty or single-valued images.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for row in gray.rows() {
        for &v in row {
            histogram[v as usize] += 1;
        }
    }
    let total = histogram.iter().sum::<u64>() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut best_threshold = 0u8;
    let mut max_variance = 0.0f64;
    let mut weight_background = 0.0f64;
    let mut sum_background = 0.0f64;
    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count as f64;
        if weight_background == 0.0 {
            continue;
        }
        let weight_foreground = total - weight_background;
        if weight_foreground == 0.0 {
            break;
        }
        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background;
        let mean_foreground = (total_sum - sum_background) / weight_foreground;
        let variance =
            weight_background * weight_foreground * (mean_background - mean_foreground).powi(2);
        if variance > max_variance {
            max_variance = variance;
            best_threshold = t as u8;
        }
    }
    best_threshold
}

impl Binarizer for OtsuBinarizer {
    fn binarize(&self, gray: &GrayImage) -> GrayImage {
        let t = otsu_threshold(gray);
        let (w, h) = gray.dimensions();
        let data = gray
            .as_slice()
            .iter()
            .map(|&v| if v > t { 255 } else { 0 })
            .collect();
        GrayImage::from_raw(w, h, data).unwrap_or_else(|| GrayImage::new(w, h))
    }
}
