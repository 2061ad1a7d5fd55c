//! Block colours.
//!
//! Each colour bucket has a small gradient palette. A block picks its entry
//! by hashing its stable label, so the same function keeps the same colour
//! across renders.

use super::layout::ColorBucket;
use sha1::{Digest, Sha1};

/// RGB triple
pub type Rgb = (u8, u8, u8);

/// `size` colours stepping from `start` towards `end` (end excluded)
fn gradient(start: Rgb, end: Rgb, size: i32) -> Vec<Rgb> {
    let channel = |s: u8, e: u8, i: i32| -> u8 {
        let (s, e) = (i32::from(s), i32::from(e));
        (s + ((e - s) * i).div_euclid(size)) as u8
    };

    (0..size)
        .map(|i| {
            (
                channel(start.0, end.0, i),
                channel(start.1, end.1, i),
                channel(start.2, end.2, i),
            )
        })
        .collect()
}

/// Palette for a colour bucket
pub fn palette(bucket: ColorBucket) -> Vec<Rgb> {
    match bucket {
        ColorBucket::Normal => gradient((255, 240, 141), (255, 65, 34), 7),
        ColorBucket::Recursive => gradient((44, 255, 210), (113, 194, 0), 5),
        ColorBucket::RootLike => gradient((230, 230, 255), (150, 150, 255), 5),
        ColorBucket::Merged => gradient((190, 190, 190), (240, 240, 240), 7),
    }
}

/// Map a label into `[0, 1)`: first four SHA-1 bytes, big-endian, over 2^32
pub fn name_hash(label: &str) -> f64 {
    let digest = Sha1::digest(label.as_bytes());
    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    f64::from(prefix) / 4_294_967_296.0
}

/// Stable fill colour for a label in a bucket
pub fn block_color(bucket: ColorBucket, label: &str) -> Rgb {
    let colors = palette(bucket);
    let index = (colors.len() as f64 * name_hash(label)) as usize;
    colors[index.min(colors.len() - 1)]
}

/// CSS `rgb(r,g,b)` notation
pub fn css_rgb(color: Rgb) -> String {
    format!("rgb({},{},{})", color.0, color.1, color.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_palette_endpoints() {
        let colors = palette(ColorBucket::Normal);
        assert_eq!(colors.len(), 7);
        assert_eq!(colors[0], (255, 240, 141));
        assert_eq!(colors[1], (255, 215, 125));
        assert_eq!(colors[6], (255, 90, 49));
    }

    #[test]
    fn test_gradient_floors_negative_steps() {
        // (34 - 141) / 7 = -15.3 floors to -16
        let colors = palette(ColorBucket::Normal);
        assert_eq!(colors[1].2, 141 - 16);

        let recursive = palette(ColorBucket::Recursive);
        assert_eq!(recursive[1], (57, 242, 168));
    }

    #[test]
    fn test_palette_sizes() {
        assert_eq!(palette(ColorBucket::Recursive).len(), 5);
        assert_eq!(palette(ColorBucket::RootLike).len(), 5);
        assert_eq!(palette(ColorBucket::Merged).len(), 7);
    }

    #[test]
    fn test_name_hash_range_and_stability() {
        for label in ["", "a.py:1:main", "~:0:<built-in method time.sleep>"] {
            let h = name_hash(label);
            assert!((0.0..1.0).contains(&h));
            assert_eq!(h, name_hash(label));
        }
    }

    #[test]
    fn test_name_hash_known_value() {
        // sha1("abc") = a9993e36...
        assert_eq!(name_hash("abc"), f64::from(0xa9993e36u32) / 4_294_967_296.0);
    }

    #[test]
    fn test_block_color_comes_from_bucket_palette() {
        let color = block_color(ColorBucket::Merged, "app.py:1:main");
        assert!(palette(ColorBucket::Merged).contains(&color));
        assert_eq!(css_rgb((1, 2, 3)), "rgb(1,2,3)");
    }
}
