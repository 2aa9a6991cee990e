use image::GenericImageView;

use crate::engine::UploadedImage;

const MIN_SIDE: u32 = 200;
const MIN_BRIGHTNESS: f64 = 50.0;
const MAX_BRIGHTNESS: f64 = 200.0;

/// Returns the reason a photo is unfit for diagnosis, if any.
pub fn check_image_quality(image_data: &[u8]) -> Option<&'static str> {
    let img = match image::load_from_memory(image_data) {
        Ok(img) => img,
        Err(_) => return Some("Unreadable image"),
    };

    let (width, height) = img.dimensions();
    if height < MIN_SIDE || width < MIN_SIDE {
        return Some("Low resolution image");
    }

    let gray = img.to_luma8();
    let total: u64 = gray.pixels().map(|p| u64::from(p[0])).sum();
    let brightness = total as f64 / (u64::from(width) * u64::from(height)) as f64;

    if brightness < MIN_BRIGHTNESS {
        Some("Image too dark - take in daylight")
    } else if brightness > MAX_BRIGHTNESS {
        Some("Image overexposed - avoid direct sunlight")
    } else {
        None
    }
}

/// Collects `"<filename>: <reason>"` for every image failing the check.
pub fn quality_issues(images: &[UploadedImage]) -> Vec<String> {
    images
        .iter()
        .filter_map(|image| {
            check_image_quality(&image.data).map(|reason| format!("{}: {}", image.filename, reason))
        })
        .collect()
}

/// The batch is rejected once more than half of it (rounded down) has issues.
pub fn too_many_issues(issue_count: usize, image_count: usize) -> bool {
    issue_count > 0 && issue_count > image_count / 2
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use image::{ImageOutputFormat, Rgb, RgbImage};

    use super::*;

    pub(crate) fn png(width: u32, height: u32, shade: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([shade, shade, shade]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn well_lit_photo_passes() {
        assert_eq!(check_image_quality(&png(256, 256, 120)), None);
    }

    #[test]
    fn each_problem_is_named() {
        assert_eq!(check_image_quality(b"not an image"), Some("Unreadable image"));
        assert_eq!(check_image_quality(&png(199, 400, 120)), Some("Low resolution image"));
        assert_eq!(
            check_image_quality(&png(256, 256, 20)),
            Some("Image too dark - take in daylight")
        );
        assert_eq!(
            check_image_quality(&png(256, 256, 240)),
            Some("Image overexposed - avoid direct sunlight")
        );
    }

    #[test]
    fn issues_carry_filenames() {
        let images = vec![
            UploadedImage::new("a.png", png(256, 256, 120)),
            UploadedImage::new("b.png", png(64, 64, 120)),
        ];
        assert_eq!(quality_issues(&images), vec!["b.png: Low resolution image"]);
    }

    #[test]
    fn rejection_needs_more_than_half() {
        assert!(!too_many_issues(0, 3));
        assert!(!too_many_issues(1, 3));
        assert!(too_many_issues(2, 3));
        assert!(!too_many_issues(2, 4));
        assert!(too_many_issues(3, 4));
    }
}
