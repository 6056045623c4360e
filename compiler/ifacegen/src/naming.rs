//! 出力ファイル名の命名規則。

/// CamelCase を snake_case へ変換する。連続する大文字は 1 語として扱う。
pub fn camel_to_snake(name: &str) -> String {
  let chars: Vec<char> = name.chars().collect();
  let mut snake = String::with_capacity(name.len() + 4);
  for (index, &ch) in chars.iter().enumerate() {
    if ch.is_uppercase() {
      if index > 0 {
        let prev = chars[index - 1];
        let next_is_lower = chars
          .get(index + 1)
          .map(|next| next.is_lowercase())
          .unwrap_or(false);
        let boundary = prev.is_lowercase()
          || prev.is_ascii_digit()
          || (prev.is_uppercase() && next_is_lower);
        if boundary && prev != '_' {
          snake.push('_');
        }
      }
      snake.extend(ch.to_lowercase());
    } else {
      snake.push(ch);
    }
  }
  snake
}

/// `<snake_case>.go`
pub fn go_file_name(name: &str) -> String {
  format!("{}.go", camel_to_snake(name))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn converts_common_shapes() {
    let cases = [
      ("Widget", "widget"),
      ("TextView", "text_view"),
      ("HTTPServer", "http_server"),
      ("GLArea", "gl_area"),
      ("ID", "id"),
      ("Vec3Builder", "vec3_builder"),
      ("already_snake", "already_snake"),
      ("Gtk_Window", "gtk_window"),
    ];
    for (input, expected) in cases {
      assert_eq!(camel_to_snake(input), expected, "{input}");
    }
  }

  #[test]
  fn file_name_has_go_extension() {
    assert_eq!(go_file_name("ComboBoxText"), "combo_box_text.go");
  }
}
