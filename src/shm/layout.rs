// 该文件是 yolo-shm-reader （共享内存检测读取） 项目的一部分。
// src/shm/layout.rs - 共享内存二进制布局
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

//! 与生产者约定的 C 结构体布局。
//!
//! ```c
//! typedef struct { int class_id; float confidence; int x, y, w, h; } Detection;
//! typedef struct { int count; Detection det[10]; } SharedData;
//! ```
//!
//! 字节序与对齐均取本机约定。

use bytemuck::{Pod, Zeroable};
use tracing::warn;

use crate::model::{DetectItem, DetectResult, MAX_BOXES};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct RawDetection {
  pub class_id: i32,
  pub confidence: f32,
  pub x: i32,
  pub y: i32,
  pub w: i32,
  pub h: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SharedData {
  pub count: i32,
  pub det: [RawDetection; MAX_BOXES],
}

impl SharedData {
  pub const SIZE: usize = std::mem::size_of::<SharedData>();

  /// 从字节中复制出结构体，`bytes` 至少需要 [`SharedData::SIZE`] 字节
  pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
    bytes
      .get(..Self::SIZE)
      .map(bytemuck::pod_read_unaligned::<SharedData>)
  }

  pub fn to_bytes(&self) -> Vec<u8> {
    bytemuck::bytes_of(self).to_vec()
  }

  /// 按生产者的布局构造共享数据，多余的条目被忽略
  pub fn from_items(items: &[DetectItem]) -> Self {
    let mut data = SharedData::zeroed();
    let n = items.len().min(MAX_BOXES);
    for (slot, item) in data.det.iter_mut().zip(&items[..n]) {
      *slot = RawDetection::from(*item);
    }
    data.count = n as i32;
    data
  }

  /// 有效条目数，`count` 被限制在 `0..=MAX_BOXES`
  pub fn valid_count(&self) -> usize {
    let clamped = self.count.clamp(0, MAX_BOXES as i32) as usize;
    if clamped as i32 != self.count {
      warn!(
        "共享内存中的 count={} 超出范围 0..={}, 按 {} 处理",
        self.count, MAX_BOXES, clamped
      );
    }
    clamped
  }

  pub fn detections(&self) -> DetectResult {
    let mut result = DetectResult::new();
    for raw in &self.det[..self.valid_count()] {
      // valid_count 不超过容量，push 不会失败
      if result.push(DetectItem::from(*raw)).is_err() {
        break;
      }
    }
    result
  }
}

impl From<RawDetection> for DetectItem {
  fn from(raw: RawDetection) -> Self {
    DetectItem {
      class_id: raw.class_id,
      confidence: raw.confidence,
      x: raw.x,
      y: raw.y,
      w: raw.w,
      h: raw.h,
    }
  }
}

impl From<DetectItem> for RawDetection {
  fn from(item: DetectItem) -> Self {
    RawDetection {
      class_id: item.class_id,
      confidence: item.confidence,
      x: item.x,
      y: item.y,
      w: item.w,
      h: item.h,
    }
  }
}
