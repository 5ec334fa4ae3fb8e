// 该文件是 yolo-shm-reader （共享内存检测读取） 项目的一部分。
// src/task.rs - 单次读取与渲染任务
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
  io::Write,
  path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::info;

use crate::{
  input::{ImageFileInput, InputError},
  model::DetectResult,
  output::{OutputError, Render, SaveImageFileOutput, derive_output_path, draw::Draw},
  shm::{DetectionSource, ShmError},
};

#[derive(Error, Debug)]
pub enum TaskError {
  #[error(transparent)]
  Input(#[from] InputError),
  #[error(transparent)]
  Shm(#[from] ShmError),
  #[error(transparent)]
  Output(#[from] OutputError),
  #[error("控制台输出错误: {0}")]
  Console(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
  /// 从共享内存读到的检测数
  pub read: usize,
  /// 绘制到图像上的检测数
  pub rendered: usize,
  pub output: PathBuf,
}

/// 读取一次检测结果并渲染到一张图像上
#[derive(Debug, Default)]
pub struct OneShotTask {
  draw: Draw,
  output: Option<PathBuf>,
}

impl OneShotTask {
  pub fn new(draw: Draw) -> Self {
    Self { draw, output: None }
  }

  /// 指定输出路径，未指定时由输入路径推导
  pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
    self.output = output;
    self
  }

  pub fn output_path(&self, image_path: &Path) -> PathBuf {
    self
      .output
      .clone()
      .unwrap_or_else(|| derive_output_path(image_path))
  }

  /// 依次：检查输入图像存在、读取共享内存、打印检测列表、绘制并保存
  pub fn run_task<S: DetectionSource, W: Write>(
    &self,
    image_path: &Path,
    source: &S,
    console: &mut W,
  ) -> Result<TaskReport, TaskError> {
    ImageFileInput::ensure_exists(image_path)?;

    let result = source.read_detections()?;
    print_detections(console, &result)?;

    let input = ImageFileInput::open(image_path)?;
    let output_path = self.output_path(image_path);
    let output = SaveImageFileOutput::new(&output_path, self.draw.clone())
      .with_fallback_format(input.format());

    writeln!(console, "Rendering {} detection(s)...", result.len())?;
    output.render_result(input.image(), &result)?;
    writeln!(console, "Saved to {}", output_path.display())?;
    info!("任务完成");

    Ok(TaskReport {
      read: result.len(),
      rendered: result.len(),
      output: output_path,
    })
  }
}

/// 打印人类可读的检测列表
pub fn print_detections<W: Write>(console: &mut W, result: &DetectResult) -> std::io::Result<()> {
  writeln!(
    console,
    "Read {} detection(s) from shared memory:",
    result.len()
  )?;
  for (i, det) in result.iter().enumerate() {
    writeln!(
      console,
      "  [{}] class_id={} conf={:.2} box=({},{},{},{})",
      i, det.class_id, det.confidence, det.x, det.y, det.w, det.h
    )?;
  }
  Ok(())
}
