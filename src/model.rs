// 该文件是 yolo-shm-reader （共享内存检测读取） 项目的一部分。
// src/model.rs - 检测结果定义
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

use thiserror::Error;

/// 共享内存中检测框数组的容量
pub const MAX_BOXES: usize = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
  #[error("检测结果已满: 容量 {0}")]
  CapacityExceeded(usize),
}

/// 单个检测目标：类别、置信度与像素坐标下的边界框
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DetectItem {
  pub class_id: i32,
  pub confidence: f32,
  /// 左上角 x
  pub x: i32,
  /// 左上角 y
  pub y: i32,
  pub w: i32,
  pub h: i32,
}

impl DetectItem {
  /// 右下角坐标 `(x + w, y + h)`
  pub fn bottom_right(&self) -> (i32, i32) {
    (self.x.saturating_add(self.w), self.y.saturating_add(self.h))
  }

  /// 绘制在图像上的标签文本
  pub fn label(&self) -> String {
    format!("ID:{} {:.2}", self.class_id, self.confidence)
  }
}

/// 定长检测结果容器，元素个数不会超过 [`MAX_BOXES`]
#[derive(Debug, Clone, PartialEq)]
pub struct DetectResult {
  len: usize,
  items: [DetectItem; MAX_BOXES],
}

impl Default for DetectResult {
  fn default() -> Self {
    Self::new()
  }
}

impl DetectResult {
  pub fn new() -> Self {
    Self {
      len: 0,
      items: [DetectItem::default(); MAX_BOXES],
    }
  }

  pub fn push(&mut self, item: DetectItem) -> Result<(), ModelError> {
    let slot = self
      .items
      .get_mut(self.len)
      .ok_or(ModelError::CapacityExceeded(MAX_BOXES))?;
    *slot = item;
    self.len += 1;
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn capacity(&self) -> usize {
    MAX_BOXES
  }

  pub fn as_slice(&self) -> &[DetectItem] {
    &self.items[..self.len]
  }

  pub fn iter(&self) -> std::slice::Iter<'_, DetectItem> {
    self.as_slice().iter()
  }
}

impl<'a> IntoIterator for &'a DetectResult {
  type Item = &'a DetectItem;
  type IntoIter = std::slice::Iter<'a, DetectItem>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl TryFrom<&[DetectItem]> for DetectResult {
  type Error = ModelError;

  fn try_from(items: &[DetectItem]) -> Result<Self, Self::Error> {
    let mut result = DetectResult::new();
    for item in items {
      result.push(*item)?;
    }
    Ok(result)
  }
}
