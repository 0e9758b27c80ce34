// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted capabilities for coordinator tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use docscan_bridge::{
    CapturedPhoto, NativeCamera, NativeFilePicker, NativeMimeTypes, PickedFile, ScannerBridge,
};
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{Quad, RotationDirection};
use docscan_document::{CornerDetector, Imaging, ProcessorImaging};
use image::{DynamicImage, Rgb, RgbImage};

/// What the camera does on its next launch.
pub enum CameraStep {
    Photo { width: u32, height: u32 },
    /// A small real photo reported with the given (possibly bogus) size.
    Reported { width: u32, height: u32 },
    Cancel,
    Fail,
}

/// What the picker does on its next launch.
pub enum PickerStep {
    /// A fresh PNG in the "gallery", reported as `image/png`.
    Image { width: u32, height: u32 },
    /// An existing path with an optional reported MIME type.
    File { path: PathBuf, mime_type: Option<String> },
    Cancel,
}

/// Bridge that replays queued camera and picker steps.
pub struct ScriptedBridge {
    dir: PathBuf,
    camera: Mutex<VecDeque<CameraStep>>,
    picker: Mutex<VecDeque<PickerStep>>,
    files: AtomicUsize,
    pub camera_launches: AtomicUsize,
    pub picker_launches: AtomicUsize,
}

impl ScriptedBridge {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            camera: Mutex::new(VecDeque::new()),
            picker: Mutex::new(VecDeque::new()),
            files: AtomicUsize::new(0),
            camera_launches: AtomicUsize::new(0),
            picker_launches: AtomicUsize::new(0),
        }
    }

    pub fn camera(self, step: CameraStep) -> Self {
        self.camera.lock().expect("camera lock").push_back(step);
        self
    }

    pub fn picker(self, step: PickerStep) -> Self {
        self.picker.lock().expect("picker lock").push_back(step);
        self
    }

    fn write_photo(&self, prefix: &str, ext: &str, width: u32, height: u32) -> PathBuf {
        let n = self.files.fetch_add(1, Ordering::SeqCst);
        let path = self.dir.join(format!("{prefix}_{n}.{ext}"));
        photo(width, height).save(&path).expect("write photo");
        path
    }
}

impl ScannerBridge for ScriptedBridge {
    fn platform_name(&self) -> &str {
        "Scripted"
    }
}

impl NativeCamera for ScriptedBridge {
    fn capture_photo(&self) -> Result<Option<CapturedPhoto>> {
        self.camera_launches.fetch_add(1, Ordering::SeqCst);
        let step = self.camera.lock().expect("camera lock").pop_front();
        match step {
            Some(CameraStep::Photo { width, height }) => Ok(Some(CapturedPhoto {
                path: self.write_photo("camera", "jpg", width, height),
                width,
                height,
            })),
            Some(CameraStep::Reported { width, height }) => Ok(Some(CapturedPhoto {
                path: self.write_photo("camera", "jpg", 40, 30),
                width,
                height,
            })),
            Some(CameraStep::Cancel) => Ok(None),
            Some(CameraStep::Fail) | None => Err(ScanError::Bridge("camera did not open".into())),
        }
    }
}

impl NativeFilePicker for ScriptedBridge {
    fn pick_document(&self, _mime_types: &[&str]) -> Result<Option<PickedFile>> {
        self.picker_launches.fetch_add(1, Ordering::SeqCst);
        let step = self.picker.lock().expect("picker lock").pop_front();
        match step {
            Some(PickerStep::Image { width, height }) => Ok(Some(PickedFile {
                path: self.write_photo("gallery", "png", width, height),
                mime_type: Some("image/png".into()),
            })),
            Some(PickerStep::File { path, mime_type }) => Ok(Some(PickedFile { path, mime_type })),
            Some(PickerStep::Cancel) => Ok(None),
            None => Err(ScanError::Bridge("picker did not open".into())),
        }
    }
}

impl NativeMimeTypes for ScriptedBridge {}

/// A plain photo with a dark page on a light background.
pub fn photo(width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([230, 230, 230]));
    for y in height / 4..height * 3 / 4 {
        for x in width / 4..width * 3 / 4 {
            img.put_pixel(x, y, Rgb([20, 20, 20]));
        }
    }
    img
}

/// Detector that finds nothing and counts how often it was asked.
#[derive(Default)]
pub struct CountingDetector {
    pub calls: AtomicUsize,
}

impl CornerDetector for CountingDetector {
    fn detect_corners(&self, _photo_path: &Path, _width: u32, _height: u32) -> Option<Quad> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        None
    }
}

/// Real imaging that starts failing crops after a number of successes.
pub struct FlakyImaging {
    crops_left: AtomicUsize,
}

impl FlakyImaging {
    pub fn failing_after(crops: usize) -> Self {
        Self {
            crops_left: AtomicUsize::new(crops),
        }
    }
}

impl Imaging for FlakyImaging {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        ProcessorImaging.dimensions(path)
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        ProcessorImaging.decode(path)
    }

    fn crop_to_quad(&self, path: &Path, quad: &Quad) -> Result<DynamicImage> {
        let remaining = self.crops_left.load(Ordering::SeqCst);
        if remaining == 0 {
            return Err(ScanError::CropFailure("codec gave up".into()));
        }
        self.crops_left.store(remaining - 1, Ordering::SeqCst);
        ProcessorImaging.crop_to_quad(path, quad)
    }

    fn encode_and_save(&self, pixels: &DynamicImage, quality: u8, dest: &Path) -> Result<()> {
        ProcessorImaging.encode_and_save(pixels, quality, dest)
    }

    fn rotate_pixels_90(&self, pixels: DynamicImage, direction: RotationDirection) -> DynamicImage {
        ProcessorImaging.rotate_pixels_90(pixels, direction)
    }

    fn rewrite_in_place(&self, pixels: &DynamicImage, path: &Path) -> Result<()> {
        ProcessorImaging.rewrite_in_place(pixels, path)
    }
}

/// Number of regular files directly inside `dir`.
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .count()
}
