// 该文件是 yolo-shm-reader （共享内存检测读取） 项目的一部分。
// src/output.rs - 输出定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::{Path, PathBuf};

use thiserror::Error;

pub trait Render<Frame, Output>: Sized {
  type Error;
  fn render_result(&self, frame: &Frame, result: &Output) -> Result<(), Self::Error>;
}

pub mod draw;
mod glyph;

mod save_image_file;
pub use self::save_image_file::SaveImageFileOutput;

/// 输出文件名中插入的后缀
pub const OUTPUT_SUFFIX: &str = "_detected";

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像编码错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("无法确定输出格式: {}", .0.display())]
  UnknownFormat(PathBuf),
  #[error("字体加载错误: {0}")]
  FontError(#[from] ab_glyph::InvalidFont),
}

/// 在扩展名前插入 `_detected`，例如 `sample.ppm` -> `sample_detected.ppm`
pub fn derive_output_path(input: impl AsRef<Path>) -> PathBuf {
  let input = input.as_ref();
  let stem = input
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default();

  let file_name = match input.extension() {
    Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
    None => format!("{}{}", stem, OUTPUT_SUFFIX),
  };
  input.with_file_name(file_name)
}
