// 该文件是 yolo-shm-reader （共享内存检测读取） 项目的一部分。
// src/output/draw.rs - 目标检测结果可视化
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::{
  drawing::{draw_hollow_rect_mut, draw_text_mut, text_size},
  rect::Rect,
};
use tracing::{debug, warn};

use super::{OutputError, glyph};
use crate::model::{DetectItem, DetectResult};

// 文本渲染常量
const LABEL_FONT_SIZE: f32 = 18.0;
const LABEL_GLYPH_SCALE: u32 = 2;
const LABEL_OFFSET_Y: i32 = 5; // 标签底部与边框顶部的间距
const BOX_THICKNESS: i32 = 2;
const BOX_COLOR: [u8; 3] = [0, 255, 0]; // 绿色

/// 未指定字体时依次尝试的系统字体
pub const SYSTEM_FONT_PATHS: &[&str] = &[
  "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
  "/usr/share/fonts/TTF/DejaVuSans.ttf",
  "/usr/share/fonts/dejavu/DejaVuSans.ttf",
  "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
  "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
  "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// 标签字体
#[derive(Clone)]
pub enum LabelFont {
  /// TrueType 字体
  TrueType(FontArc),
  /// 内置 5x7 点阵字体
  Builtin,
}

impl std::fmt::Debug for LabelFont {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      LabelFont::TrueType(_) => f.write_str("TrueType"),
      LabelFont::Builtin => f.write_str("Builtin"),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Draw {
  font: LabelFont,
  font_size: f32,
  glyph_scale: u32,
  color: Rgb<u8>,
}

impl Default for Draw {
  fn default() -> Self {
    Self::with_font(LabelFont::Builtin)
  }
}

impl Draw {
  pub fn with_font(font: LabelFont) -> Self {
    Self {
      font,
      font_size: LABEL_FONT_SIZE,
      glyph_scale: LABEL_GLYPH_SCALE,
      color: Rgb(BOX_COLOR),
    }
  }

  /// 从 TrueType 字体文件加载
  pub fn from_font_file(path: impl AsRef<Path>) -> Result<Self, OutputError> {
    let data = std::fs::read(path.as_ref())?;
    let font = FontArc::try_from_vec(data)?;
    debug!("已加载字体: {}", path.as_ref().display());
    Ok(Self::with_font(LabelFont::TrueType(font)))
  }

  /// 在系统字体中查找可用字体，找不到时退回内置点阵字体
  pub fn discover() -> Self {
    Self::discover_in(SYSTEM_FONT_PATHS.iter().map(PathBuf::from))
  }

  pub fn discover_in(candidates: impl IntoIterator<Item = PathBuf>) -> Self {
    for path in candidates {
      if !path.exists() {
        continue;
      }
      match Self::from_font_file(&path) {
        Ok(draw) => return draw,
        Err(err) => warn!("无法加载字体 {}: {}", path.display(), err),
      }
    }
    debug!("未找到 TrueType 字体, 使用内置点阵字体");
    Self::default()
  }

  pub fn font(&self) -> &LabelFont {
    &self.font
  }

  pub fn color(&self) -> Rgb<u8> {
    self.color
  }

  /// 标签文本的像素尺寸
  pub fn label_size(&self, label: &str) -> (u32, u32) {
    match &self.font {
      LabelFont::TrueType(font) => text_size(PxScale::from(self.font_size), font, label),
      LabelFont::Builtin => glyph::text_size(label, self.glyph_scale),
    }
  }

  /// 边框从 `(x, y)` 到 `(x + w, y + h)`（含端点），宽 2 像素，超出图像的部分被裁剪
  fn draw_bbox(&self, image: &mut RgbImage, item: &DetectItem) {
    let (x_a, y_a) = (item.x as i64, item.y as i64);
    let (x_b, y_b) = (x_a + item.w as i64, y_a + item.h as i64);

    // 限制在图像外一圈，避免极端坐标溢出
    let clamp_x = |v: i64| v.clamp(-(BOX_THICKNESS as i64), image.width() as i64 + 1);
    let clamp_y = |v: i64| v.clamp(-(BOX_THICKNESS as i64), image.height() as i64 + 1);
    let (x_min, x_max) = (clamp_x(x_a.min(x_b)), clamp_x(x_a.max(x_b)));
    let (y_min, y_max) = (clamp_y(y_a.min(y_b)), clamp_y(y_a.max(y_b)));

    for t in 0..BOX_THICKNESS as i64 {
      let (left, top) = (x_min + t, y_min + t);
      let (right, bottom) = (x_max - t, y_max - t);
      if left > right || top > bottom {
        break;
      }
      let rect = Rect::at(left as i32, top as i32)
        .of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
      draw_hollow_rect_mut(image, rect, self.color);
    }
  }

  fn draw_label(&self, image: &mut RgbImage, item: &DetectItem) {
    let label = item.label();
    let Some((label_x, label_y)) = label_origin(
      item.x,
      item.y,
      self.label_size(&label),
      image.dimensions(),
    ) else {
      return;
    };

    match &self.font {
      LabelFont::TrueType(font) => draw_text_mut(
        image,
        self.color,
        label_x,
        label_y,
        PxScale::from(self.font_size),
        font,
        &label,
      ),
      LabelFont::Builtin => glyph::draw_text(
        image,
        self.color,
        label_x,
        label_y,
        self.glyph_scale,
        &label,
      ),
    }
  }

  /// 按顺序绘制每个检测框及其标签
  pub fn draw_detections_on_image(&self, image: &mut RgbImage, result: &DetectResult) {
    for item in result {
      self.draw_bbox(image, item);
      self.draw_label(image, item);
    }
  }

  pub fn draw_detection(&self, image: &RgbImage, result: &DetectResult) -> RgbImage {
    let mut image = image.clone();
    self.draw_detections_on_image(&mut image, result);
    image
  }
}

/// 标签左上角，位于边框上方并贴住图像顶部；标签完全落在图像外时返回 `None`
///
/// 坐标在 i64 中计算，返回值保证字形偏移累加时不会溢出 i32。
fn label_origin(
  x: i32,
  y: i32,
  (label_w, label_h): (u32, u32),
  (width, height): (u32, u32),
) -> Option<(i32, i32)> {
  let (label_w, label_h) = (label_w as i64, label_h as i64);
  let (width, height) = (width as i64, height as i64);
  let x = x as i64;
  let y = (y as i64 - LABEL_OFFSET_Y as i64 - label_h).max(0);

  if x >= width || x + label_w <= 0 || y >= height {
    return None;
  }

  let x = x.clamp(-label_w, width).clamp(i32::MIN as i64, i32::MAX as i64);
  let y = y.min(i32::MAX as i64);
  Some((x as i32, y as i32))
}
