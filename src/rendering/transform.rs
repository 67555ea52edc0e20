use crate::data::{LayerRole, LayerSprite, Origin};
use crate::rendering::grid::PixelPos;
use image::{imageops, RgbaImage};
use std::borrow::Cow;

/// Everything needed to draw one sprite, computed up front for each cell and layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTransform {
    /// Sprite position after the origin is applied, in unmirrored surface space
    pub position: PixelPos,
    pub flip: bool,
    /// Quarter turns clockwise, already reduced modulo 4
    pub rotation_steps: u8,
}

impl DrawTransform {
    pub fn new(base: PixelPos, origin: Origin, sprite: LayerSprite, role: LayerRole) -> Self {
        let rotation_steps = if role.supports_rotation() {
            sprite.rotation_steps % 4
        } else {
            0
        };

        Self {
            position: PixelPos {
                x: base.x + origin.x,
                y: base.y + origin.y,
            },
            flip: sprite.flip,
            rotation_steps,
        }
    }

    /// X at which the draw call is issued. Under a mirrored surface the
    /// sprite is drawn at `-x - width` so that its footprint stays put.
    pub fn draw_x(&self, sprite_width: u32) -> f64 {
        if self.flip {
            -self.position.x - sprite_width as f64
        } else {
            self.position.x
        }
    }

    /// Left edge of the footprint on the unmirrored raster.
    pub fn device_left(&self, sprite_width: u32) -> f64 {
        let x = self.draw_x(sprite_width);
        if self.flip {
            -x - sprite_width as f64
        } else {
            x
        }
    }
}

/// Rotate by `steps` quarter turns about the image centre, keeping the
/// original dimensions. Corners that leave the frame are cropped and
/// uncovered pixels stay transparent.
pub fn rotate_about_center(image: &RgbaImage, steps: u8) -> Cow<'_, RgbaImage> {
    let steps = steps % 4;
    if steps == 0 {
        return Cow::Borrowed(image);
    }

    let (width, height) = image.dimensions();
    if steps == 2 {
        return Cow::Owned(imageops::rotate180(image));
    }
    if width == height {
        return Cow::Owned(if steps == 1 {
            imageops::rotate90(image)
        } else {
            imageops::rotate270(image)
        });
    }

    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let mut out = RgbaImage::new(width, height);

    for (dx, dy, pixel) in out.enumerate_pixels_mut() {
        // offset of the destination pixel centre from the image centre
        let px = dx as f64 + 0.5 - cx;
        let py = dy as f64 + 0.5 - cy;

        // inverse rotation: one quarter turn clockwise maps (x, y) -> (-y, x)
        let (sx, sy) = if steps == 1 { (py, -px) } else { (-py, px) };

        let sx = (sx + cx - 0.5).floor();
        let sy = (sy + cy - 0.5).floor();
        if sx >= 0.0 && sy >= 0.0 && sx < width as f64 && sy < height as f64 {
            *pixel = *image.get_pixel(sx as u32, sy as u32);
        }
    }

    Cow::Owned(out)
}

/// A sprite ready to be blitted onto the raster at an integer position.
pub struct PreparedSprite<'a> {
    pub image: Cow<'a, RgbaImage>,
    pub x: i64,
    pub y: i64,
}

/// Rotation first, on the unflipped image, then the mirror.
pub fn prepare<'a>(image: &'a RgbaImage, transform: &DrawTransform) -> PreparedSprite<'a> {
    let rotated = rotate_about_center(image, transform.rotation_steps);

    let left = transform.device_left(rotated.width());
    let image = if transform.flip {
        Cow::Owned(imageops::flip_horizontal(rotated.as_ref()))
    } else {
        rotated
    };

    PreparedSprite {
        image,
        x: left.floor() as i64,
        y: transform.position.y.floor() as i64,
    }
}
