// 该文件是 yolo-shm-reader （共享内存检测读取） 项目的一部分。
// src/output/save_image_file.rs - 保存图像文件
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

use image::{ImageFormat, RgbImage};
use tracing::info;

use crate::{
  model::DetectResult,
  output::{OutputError, Render, draw::Draw},
};

pub struct SaveImageFileOutput {
  path: PathBuf,
  draw: Draw,
  fallback_format: Option<ImageFormat>,
}

impl SaveImageFileOutput {
  pub fn new(path: impl AsRef<Path>, draw: Draw) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
      draw,
      fallback_format: None,
    }
  }

  /// 输出路径无法识别格式时使用的格式，一般为输入图像的格式
  pub fn with_fallback_format(mut self, format: Option<ImageFormat>) -> Self {
    self.fallback_format = format;
    self
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn output_format(&self) -> Result<ImageFormat, OutputError> {
    ImageFormat::from_path(&self.path)
      .ok()
      .or(self.fallback_format)
      .ok_or_else(|| OutputError::UnknownFormat(self.path.clone()))
  }

  fn save_image(&self, image: &RgbImage) -> Result<(), OutputError> {
    let format = self.output_format()?;

    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    image.save_with_format(&self.path, format)?;

    info!("保存图像到文件: {}", self.path.display());

    Ok(())
  }
}

impl Render<RgbImage, DetectResult> for SaveImageFileOutput {
  type Error = OutputError;

  fn render_result(&self, frame: &RgbImage, result: &DetectResult) -> Result<(), Self::Error> {
    info!("绘制 {} 个检测结果...", result.len());
    let image = self.draw.draw_detection(frame, result);
    self.save_image(&image)
  }
}
