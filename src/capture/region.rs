//! Pure region cropping logic — functional core.
//!
//! Takes pixel data in, returns pixel data out. Used by single-shot
//! capture when the caller only wants part of a window.

use image::RgbaImage;
use std::str::FromStr;

/// A rectangle in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Parses `x,y,width,height`.
impl FromStr for Region {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<u32> = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| CropError::Malformed(s.to_string()))?;

        match parts.as_slice() {
            [x, y, width, height] => Ok(Region {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            }),
            _ => Err(CropError::Malformed(s.to_string())),
        }
    }
}

/// Crops a frame to the specified rectangle.
///
/// This is a pure function with no side effects.
pub fn crop_frame(frame: &RgbaImage, region: Region) -> Result<RgbaImage, CropError> {
    if region.width == 0 || region.height == 0 {
        return Err(CropError::ZeroDimension);
    }

    let (img_width, img_height) = frame.dimensions();
    let right = u64::from(region.x) + u64::from(region.width);
    let bottom = u64::from(region.y) + u64::from(region.height);

    if right > u64::from(img_width) || bottom > u64::from(img_height) {
        return Err(CropError::OutOfBounds {
            requested: (region.x, region.y, region.width, region.height),
            image_size: (img_width, img_height),
        });
    }

    Ok(image::imageops::crop_imm(frame, region.x, region.y, region.width, region.height).to_image())
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Crop rectangle has zero width or height")]
    ZeroDimension,

    #[error(
        "Crop rectangle ({},{},{},{}) exceeds frame bounds ({}x{})",
        requested.0, requested.1, requested.2, requested.3,
        image_size.0, image_size.1
    )]
    OutOfBounds {
        requested: (u32, u32, u32, u32),
        image_size: (u32, u32),
    },

    #[error("Expected crop as x,y,width,height — got '{0}'")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn crop_valid_region() {
        let mut img = RgbaImage::new(100, 100);
        img.put_pixel(10, 10, Rgba([9, 8, 7, 255]));
        let region = Region {
            x: 10,
            y: 10,
            width: 50,
            height: 40,
        };
        let cropped = crop_frame(&img, region).unwrap();
        assert_eq!(cropped.dimensions(), (50, 40));
        assert_eq!(cropped.get_pixel(0, 0), &Rgba([9, 8, 7, 255]));
    }

    #[test]
    fn crop_zero_dimension_fails() {
        let img = RgbaImage::new(100, 100);
        let region = Region {
            x: 0,
            y: 0,
            width: 0,
            height: 50,
        };
        assert!(matches!(crop_frame(&img, region), Err(CropError::ZeroDimension)));
    }

    #[test]
    fn crop_out_of_bounds_fails() {
        let img = RgbaImage::new(100, 100);
        let region = Region {
            x: 80,
            y: 80,
            width: 30,
            height: 30,
        };
        assert!(matches!(crop_frame(&img, region), Err(CropError::OutOfBounds { .. })));
    }

    #[test]
    fn crop_does_not_overflow_on_huge_offsets() {
        let img = RgbaImage::new(100, 100);
        let region = Region {
            x: u32::MAX,
            y: 0,
            width: 10,
            height: 10,
        };
        assert!(matches!(crop_frame(&img, region), Err(CropError::OutOfBounds { .. })));
    }

    #[test]
    fn parses_region_string() {
        let region: Region = "1, 2,30,40".parse().unwrap();
        assert_eq!(
            region,
            Region {
                x: 1,
                y: 2,
                width: 30,
                height: 40
            }
        );
        assert!("1,2,3".parse::<Region>().is_err());
        assert!("a,b,c,d".parse::<Region>().is_err());
    }
}
