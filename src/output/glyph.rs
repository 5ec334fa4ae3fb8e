// 该文件是 yolo-shm-reader （共享内存检测读取） 项目的一部分。
// src/output/glyph.rs - 内置点阵字体
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::{Rgb, RgbImage};

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
// 字间距（未缩放）
const GLYPH_SPACING: u32 = 1;

// 每行低 5 位有效，0x10 为最左列
const UNKNOWN: [u8; 7] = [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04];

fn glyph(c: char) -> [u8; 7] {
  match c {
    '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
    '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
    '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
    '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
    '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
    '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
    '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
    '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
    '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
    '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
    'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
    'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
    // NaN / inf 置信度
    'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
    'a' => [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F],
    'n' => [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
    'i' => [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
    'f' => [0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08],
    ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
    '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
    '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
    ' ' => [0x00; 7],
    _ => UNKNOWN,
  }
}

/// 文本在给定缩放下的像素尺寸
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
  let n = text.chars().count() as u32;
  if n == 0 {
    return (0, 0);
  }
  let advance = (GLYPH_WIDTH + GLYPH_SPACING) * scale;
  (n * advance - GLYPH_SPACING * scale, GLYPH_HEIGHT * scale)
}

/// 以 `(x, y)` 为左上角绘制文本，超出图像的部分被裁剪
pub fn draw_text(image: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, scale: u32, text: &str) {
  let (width, height) = (image.width() as i64, image.height() as i64);
  let scale = scale.max(1) as i64;
  let advance = (GLYPH_WIDTH + GLYPH_SPACING) as i64 * scale;

  for (i, c) in text.chars().enumerate() {
    let origin_x = x as i64 + i as i64 * advance;
    if origin_x >= width {
      break;
    }
    for (row, bits) in glyph(c).iter().enumerate() {
      for col in 0..GLYPH_WIDTH as i64 {
        if bits & (0x10 >> col) == 0 {
          continue;
        }
        for dy in 0..scale {
          for dx in 0..scale {
            let px = origin_x + col * scale + dx;
            let py = y as i64 + row as i64 * scale + dy;
            if px >= 0 && px < width && py >= 0 && py < height {
              image.put_pixel(px as u32, py as u32, color);
            }
          }
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_label_alphabet_is_covered() {
    for c in "ID:0123456789 .-".chars() {
      assert_ne!(glyph(c), UNKNOWN, "glyph for {:?} missing", c);
    }
  }

  #[test]
  fn test_non_finite_confidence_labels_are_covered() {
    use crate::model::DetectItem;

    for confidence in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
      let label = DetectItem {
        class_id: 1,
        confidence,
        ..DetectItem::default()
      }
      .label();
      for c in label.chars() {
        assert_ne!(glyph(c), UNKNOWN, "glyph for {:?} in {:?} missing", c, label);
      }
    }
  }

  #[test]
  fn test_text_size() {
    assert_eq!(text_size("", 2), (0, 0));
    assert_eq!(text_size("1", 1), (5, 7));
    assert_eq!(text_size("ID:3", 2), (4 * 12 - 2, 14));
  }

  #[test]
  fn test_draw_text_pixels() {
    let mut image = RgbImage::new(10, 10);
    let green = Rgb([0, 255, 0]);
    draw_text(&mut image, green, 0, 0, 1, "-");
    // '-' 只占第 4 行
    for x in 0..5 {
      assert_eq!(*image.get_pixel(x, 3), green);
      assert_eq!(*image.get_pixel(x, 2), Rgb([0, 0, 0]));
    }
  }

  #[test]
  fn test_draw_text_clips() {
    let mut image = RgbImage::new(4, 4);
    draw_text(&mut image, Rgb([255, 255, 255]), -3, -3, 2, "8888");
    draw_text(&mut image, Rgb([255, 255, 255]), 100, 100, 2, "8");
  }
}
