#![allow(dead_code)]

pub mod fake_driver;

use std::io::Cursor;

/// Solid-colour PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([210, 210, 210]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
        .unwrap();
    buf
}

/// Trimmed-down accessibility dump in the shape XCUITest prints.
pub const RAW_HIERARCHY: &str = "\
Attributes: Application, 0x600003f1c000, pid: 4242, label: 'Demo'
Element subtree:
 →Application, 0x600003f1c000, pid: 4242, label: 'Demo'
    Window (Main), 0x600003f1c0e0, {{0.0, 0.0}, {393.0, 852.0}}
      Other, 0x600003f1c1c0, {{0.0, 0.0}, {393.0, 852.0}}
        StaticText, 0x600003f1c2a0, {{16.0, 100.0}, {361.0, 20.0}}, identifier: 'titleLabel', label: 'Welcome to the extremely long hea…'
        Button, 0x600003f1c380, {{16.0, 140.0}, {100.0, 44.0}}, identifier: 'settingsButton', label: 'Settings'
        TextField, 0x600003f1c460, {{16.0, 200.0}, {361.0, 34.0}}, identifier: 'nameField', placeholderValue: 'Name'
        SecureTextField, 0x600003f1c540, {{16.0, 250.0}, {361.0, 34.0}}, identifier: 'passwordField'
        Image, 0x600003f1c620, {{16.0, 300.0}, {64.0, 64.0}}, identifier: 'logo'
        Other, 0x600003f1c700, {{0.0, 800.0}, {393.0, 52.0}}, identifier: 'footer'
Path to element:
 →Application, 0x600003f1c000, pid: 4242, label: 'Demo'
";
