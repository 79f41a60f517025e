#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
}

/// A gradient so resizing has real content to work with.
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    })
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    gradient(width, height)
        .save_with_format(path, ImageFormat::Png)
        .expect("write png");
}

pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    gradient(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .expect("write jpeg");
}

pub fn write_gif(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    RgbaImage::from_pixel(width, height, Rgba([30, 60, 90, 255]))
        .save_with_format(path, ImageFormat::Gif)
        .expect("write gif");
}

pub fn write_garbage(path: &Path) {
    ensure_parent(path);
    fs::write(path, b"this is not an image at all").expect("write garbage");
}

pub fn dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).expect("read dimensions")
}
