// 该文件是 yolo-shm-reader （共享内存检测读取） 项目的一部分。
// src/args.rs - 项目参数配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use clap::Parser;
use yolo_shm_reader::shm::SHM_NAME;

/// 从共享内存读取 YOLO 检测结果并绘制到图像上
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  long_about = None,
  after_help = "Example: ipc-reader sample.ppm\n\nNote: run the detector first to populate shared memory"
)]
pub struct Args {
  /// 输入图像路径
  #[arg(value_name = "IMAGE")]
  pub image: PathBuf,

  /// 输出图像路径，默认在输入文件名后加 `_detected`
  #[arg(long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// POSIX 共享内存对象名
  #[arg(long, env = "YOLO_SHM_NAME", default_value = SHM_NAME, value_name = "NAME")]
  pub shm_name: String,

  /// 标签使用的 TrueType 字体，未指定时查找系统字体
  #[arg(long, env = "YOLO_SHM_FONT", value_name = "FILE")]
  pub font: Option<PathBuf>,
}
