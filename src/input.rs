// 该文件是 yolo-shm-reader （共享内存检测读取） 项目的一部分。
// src/input.rs - 图像文件输入
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader, RgbImage};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum InputError {
  #[error("Image not found: {}", .0.display())]
  NotFound(PathBuf),
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
}

/// 已解码的输入图像
pub struct ImageFileInput {
  path: PathBuf,
  image: RgbImage,
  format: Option<ImageFormat>,
}

impl ImageFileInput {
  /// 检查输入路径存在，不读取内容
  pub fn ensure_exists(path: impl AsRef<Path>) -> Result<(), InputError> {
    let path = path.as_ref();
    if !path.exists() {
      debug!("Image not found: {}", path.display());
      return Err(InputError::NotFound(path.to_path_buf()));
    }
    Ok(())
  }

  /// 打开并解码图像，格式按内容猜测
  pub fn open(path: impl AsRef<Path>) -> Result<Self, InputError> {
    let path = path.as_ref();
    Self::ensure_exists(path)?;

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format();
    let image = reader.decode()?.into_rgb8();
    debug!(
      "已解码图像 {}: {}x{} {:?}",
      path.display(),
      image.width(),
      image.height(),
      format
    );

    Ok(Self {
      path: path.to_path_buf(),
      image,
      format,
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn image(&self) -> &RgbImage {
    &self.image
  }

  pub fn format(&self) -> Option<ImageFormat> {
    self.format
  }

  pub fn into_image(self) -> RgbImage {
    self.image
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  #[test]
  fn test_missing_image() {
    let err = ImageFileInput::open("/nonexistent/sample.ppm").err().unwrap();
    assert!(matches!(err, InputError::NotFound(_)));
    assert_eq!(err.to_string(), "Image not found: /nonexistent/sample.ppm");
  }

  #[test]
  fn test_ensure_exists() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ImageFileInput::ensure_exists(dir.path()).is_ok());
    assert!(matches!(
      ImageFileInput::ensure_exists(dir.path().join("missing.png")),
      Err(InputError::NotFound(p)) if p == dir.path().join("missing.png")
    ));
  }

  #[test]
  fn test_open_guesses_format_from_content() {
    let dir = tempfile::tempdir().unwrap();
    // 扩展名与内容不符，按内容识别
    let path = dir.path().join("frame.bin");
    let image = RgbImage::from_pixel(4, 3, Rgb([1, 2, 3]));
    image.save_with_format(&path, ImageFormat::Png).unwrap();

    let input = ImageFileInput::open(&path).unwrap();
    assert_eq!(input.format(), Some(ImageFormat::Png));
    assert_eq!(input.image().dimensions(), (4, 3));
    assert_eq!(input.into_image(), image);
  }

  #[test]
  fn test_undecodable_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not an image").unwrap();

    let err = ImageFileInput::open(&path).err().unwrap();
    assert!(matches!(err, InputError::ImageLoadError(_)));
  }
}
