use std::{
  path::Path,
  process::{Command, Output},
};

use image::{Rgb, RgbImage};
use tempfile::tempdir;
use yolo_shm_reader::{
  model::DetectItem,
  shm::{SHM_MOUNT, SharedData},
};

const BIN: &str = env!("CARGO_BIN_EXE_ipc-reader");

fn missing_shm_name() -> String {
  format!("/yolo_shm_reader_missing_{}", std::process::id())
}

fn run(args: &[&str], shm_name: &str) -> Output {
  Command::new(BIN)
    .args(args)
    .env("YOLO_SHM_NAME", shm_name)
    .env_remove("YOLO_SHM_FONT")
    .output()
    .unwrap()
}

#[test]
fn test_no_arguments_prints_usage() {
  let out = run(&[], &missing_shm_name());
  assert_eq!(out.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("Usage"), "stderr: {}", stderr);
  assert!(out.stdout.is_empty());
}

#[test]
fn test_two_arguments_prints_usage() {
  let dir = tempdir().unwrap();
  let a = dir.path().join("a.png");
  RgbImage::new(4, 4).save(&a).unwrap();

  let out = run(&[a.to_str().unwrap(), "b.png"], &missing_shm_name());
  assert_eq!(out.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
  assert!(!dir.path().join("a_detected.png").exists());
}

#[test]
fn test_help_exits_zero() {
  let out = run(&["--help"], &missing_shm_name());
  assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_nonexistent_image() {
  let out = run(&["/nonexistent/sample.ppm"], &missing_shm_name());
  assert_eq!(out.status.code(), Some(1));
  // 未读取共享内存，因此没有检测列表
  assert!(out.stdout.is_empty());
}

#[test]
fn test_missing_segment() {
  let dir = tempdir().unwrap();
  let image = dir.path().join("in.png");
  RgbImage::new(8, 8).save(&image).unwrap();

  let out = run(&[image.to_str().unwrap()], &missing_shm_name());
  assert_eq!(out.status.code(), Some(1));
  assert!(out.stdout.is_empty());
  assert!(!dir.path().join("in_detected.png").exists());
}

#[test]
fn test_full_run_against_shm_segment() {
  if !Path::new(SHM_MOUNT).is_dir() {
    return;
  }
  let name = format!("/yolo_shm_reader_cli_{}", std::process::id());
  let segment = Path::new(SHM_MOUNT).join(name.trim_start_matches('/'));
  let det = DetectItem {
    class_id: 3,
    confidence: 0.87,
    x: 10,
    y: 20,
    w: 30,
    h: 40,
  };
  std::fs::write(&segment, SharedData::from_items(&[det]).to_bytes()).unwrap();

  let dir = tempdir().unwrap();
  let image = dir.path().join("in.png");
  RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]))
    .save(&image)
    .unwrap();

  let out = run(&[image.to_str().unwrap()], &name);
  let _ = std::fs::remove_file(&segment);

  assert_eq!(out.status.code(), Some(0));
  let stdout = String::from_utf8_lossy(&out.stdout);
  assert!(stdout.contains("Read 1 detection(s) from shared memory:"));
  assert!(stdout.contains("  [0] class_id=3 conf=0.87 box=(10,20,30,40)"));

  let written = image::open(dir.path().join("in_detected.png"))
    .unwrap()
    .into_rgb8();
  assert_eq!(*written.get_pixel(10, 20), Rgb([0, 255, 0]));
}
