// 该文件是 yolo-shm-reader （共享内存检测读取） 项目的一部分。
// src/shm.rs - 共享内存快照读取
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

use std::{
  fs::File,
  path::{Path, PathBuf},
};

use memmap2::MmapOptions;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::DetectResult;

mod layout;
pub use self::layout::{RawDetection, SharedData};

/// 生产者使用的 POSIX 共享内存对象名
pub const SHM_NAME: &str = "/ipc_yolov4_shm";

/// 共享内存文件系统挂载点
pub const SHM_MOUNT: &str = "/dev/shm";

#[derive(Error, Debug)]
pub enum ShmError {
  #[error("共享内存不存在: {}", .0.display())]
  NotFound(PathBuf),
  #[error("无法打开共享内存 {}: {source}", path.display())]
  Open {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("无法映射共享内存 {}: {source}", path.display())]
  Map {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("共享内存过小: 期望至少 {expected} 字节, 实际 {actual} 字节")]
  ShortRead { expected: usize, actual: u64 },
}

/// 检测结果来源
pub trait DetectionSource {
  fn read_detections(&self) -> Result<DetectResult, ShmError>;
}

/// 共享内存快照读取器
///
/// 每次 [`ShmReader::read_snapshot`] 都会重新打开并映射共享内存，复制后立即释放映射。
/// 与生产者之间没有任何同步，生产者写入过程中读取可能得到不一致的数据。
#[derive(Debug, Clone)]
pub struct ShmReader {
  path: PathBuf,
}

impl Default for ShmReader {
  fn default() -> Self {
    Self::from_name(SHM_NAME)
  }
}

impl ShmReader {
  /// 根据 POSIX 共享内存对象名定位 `/dev/shm` 下的文件
  pub fn from_name(name: &str) -> Self {
    Self {
      path: shm_path(name),
    }
  }

  /// 直接指定共享内存的后备文件
  pub fn with_path(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// 读取一次共享内存中的检测结果
  pub fn read_snapshot(&self) -> Result<DetectResult, ShmError> {
    let data = self.read_raw()?;
    let result = data.detections();
    info!(
      "从共享内存读取 {} 个检测结果 (count={})",
      result.len(),
      data.count
    );
    Ok(result)
  }

  /// 读取原始结构体，映射在返回前释放
  pub fn read_raw(&self) -> Result<SharedData, ShmError> {
    if !self.path.exists() {
      return Err(ShmError::NotFound(self.path.clone()));
    }

    let file = File::open(&self.path).map_err(|source| ShmError::Open {
      path: self.path.clone(),
      source,
    })?;

    let actual = file
      .metadata()
      .map_err(|source| ShmError::Open {
        path: self.path.clone(),
        source,
      })?
      .len();
    if actual < SharedData::SIZE as u64 {
      return Err(ShmError::ShortRead {
        expected: SharedData::SIZE,
        actual,
      });
    }

    // SAFETY: 只读映射，且仅在本函数内复制出定长字节；生产者并发写入只会造成撕裂读取。
    let mmap = unsafe { MmapOptions::new().len(SharedData::SIZE).map(&file) }.map_err(|source| {
      ShmError::Map {
        path: self.path.clone(),
        source,
      }
    })?;
    debug!("已映射 {} 字节: {}", mmap.len(), self.path.display());

    let mut buffer = [0u8; SharedData::SIZE];
    buffer.copy_from_slice(&mmap[..SharedData::SIZE]);
    drop(mmap);
    drop(file);

    Ok(bytemuck::pod_read_unaligned::<SharedData>(&buffer))
  }
}

impl DetectionSource for ShmReader {
  fn read_detections(&self) -> Result<DetectResult, ShmError> {
    self.read_snapshot()
  }
}

/// `/ipc_yolov4_shm` -> `/dev/shm/ipc_yolov4_shm`
pub fn shm_path(name: &str) -> PathBuf {
  Path::new(SHM_MOUNT).join(name.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::MAX_BOXES;

  #[test]
  fn test_shm_path_strips_leading_slash() {
    assert_eq!(shm_path(SHM_NAME), PathBuf::from("/dev/shm/ipc_yolov4_shm"));
    assert_eq!(shm_path("other"), PathBuf::from("/dev/shm/other"));
  }

  #[test]
  fn test_default_reader_points_at_producer_segment() {
    assert_eq!(
      ShmReader::default().path(),
      Path::new("/dev/shm/ipc_yolov4_shm")
    );
  }

  #[test]
  fn test_missing_segment_is_not_found() {
    let reader = ShmReader::with_path("/nonexistent/dir/ipc_yolov4_shm");
    match reader.read_snapshot() {
      Err(ShmError::NotFound(path)) => {
        assert_eq!(path, PathBuf::from("/nonexistent/dir/ipc_yolov4_shm"))
      }
      other => panic!("Expected NotFound, got {:?}", other),
    }
  }

  #[test]
  fn test_read_raw_copies_full_struct() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segment");
    let mut data = SharedData::from_items(&[crate::model::DetectItem {
      class_id: 5,
      ..Default::default()
    }]);
    data.det[MAX_BOXES - 1].class_id = 42;
    std::fs::write(&path, data.to_bytes()).unwrap();

    let raw = ShmReader::with_path(&path).read_raw().unwrap();
    assert_eq!(raw.count, 1);
    assert_eq!(raw.det[0].class_id, 5);
    assert_eq!(raw.det[MAX_BOXES - 1].class_id, 42);
  }

  #[test]
  fn test_error_display() {
    let err = ShmError::ShortRead {
      expected: 244,
      actual: 8,
    };
    assert_eq!(
      err.to_string(),
      "共享内存过小: 期望至少 244 字节, 实际 8 字节"
    );
  }
}
