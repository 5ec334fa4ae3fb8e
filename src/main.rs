// 该文件是 yolo-shm-reader （共享内存检测读取） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

mod args;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, error::ErrorKind};
use tracing::{error, info};

use yolo_shm_reader::{logging, output::draw::Draw, shm::ShmReader, task::OneShotTask};

fn main() -> ExitCode {
  let args = match args::Args::try_parse() {
    Ok(args) => args,
    Err(err) => {
      let _ = err.print();
      // 参数错误统一返回 1，帮助与版本信息返回 0
      return match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
      };
    }
  };

  logging::init();

  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      error!("{:#}", err);
      ExitCode::FAILURE
    }
  }
}

fn run(args: &args::Args) -> Result<()> {
  info!("输入图像: {}", args.image.display());
  info!("共享内存: {}", args.shm_name);

  let draw = match &args.font {
    Some(path) => Draw::from_font_file(path)
      .with_context(|| format!("无法加载字体文件: {}", path.display()))?,
    None => Draw::discover(),
  };

  let reader = ShmReader::from_name(&args.shm_name);
  let task = OneShotTask::new(draw).with_output(args.output.clone());

  let report = task.run_task(&args.image, &reader, &mut std::io::stdout().lock())?;
  info!(
    "读取 {} 个, 绘制 {} 个检测结果, 输出: {}",
    report.read,
    report.rendered,
    report.output.display()
  );

  Ok(())
}
