use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use tempfile::tempdir;

fn goiface_gen() -> Command {
  Command::new(env!("CARGO_BIN_EXE_goiface-gen"))
}

fn json_lines(stdout: &[u8]) -> Vec<Value> {
  String::from_utf8_lossy(stdout)
    .lines()
    .map(|line| serde_json::from_str(line).unwrap_or_else(|err| panic!("{line}: {err}")))
    .collect()
}

fn finish_event(stdout: &[u8]) -> Value {
  json_lines(stdout)
    .into_iter()
    .rev()
    .find(|event| event["event"] == "goiface.finish")
    .expect("goiface.finish イベントが必要です")
}

fn run_args<'a>(source: &'a Path, output: &'a Path) -> Vec<&'a str> {
  vec![
    source.to_str().unwrap(),
    "Gtk",
    "github.com/example/wrap",
    "gtk",
    output.to_str().unwrap(),
  ]
}

#[test]
fn too_few_positionals_print_usage_and_exit_1() {
  goiface_gen()
    .args(["src", "Gtk", "github.com/example/wrap"])
    .assert()
    .code(1)
    .stdout(contains("USAGE:"));
}

#[test]
fn help_prints_usage_and_succeeds() {
  goiface_gen()
    .arg("--help")
    .assert()
    .success()
    .stdout(contains("--exclude <pattern>"));
}

#[test]
fn unknown_option_is_config_error() {
  let assert = goiface_gen().arg("--verbose").assert().code(1);
  let finish = finish_event(&assert.get_output().stdout);
  assert_eq!(finish["status"], "failed");
  assert_eq!(finish["diagnostics"][0]["code"], "goiface.config_invalid");
}

#[test]
fn successful_run_reports_generated_files() {
  let source = tempdir().unwrap();
  let output = tempdir().unwrap();
  fs::write(
    source.path().join("button.go"),
    "package gtk\n\ntype Button struct{}\n\nfunc (b *Button) Click() {}\n\nfunc Init() {}\n",
  )
  .unwrap();

  let assert = goiface_gen()
    .args(run_args(source.path(), output.path()))
    .assert()
    .success();
  let events = json_lines(&assert.get_output().stdout);
  let names: Vec<_> = events
    .iter()
    .map(|event| event["event"].as_str().unwrap_or_default().to_string())
    .collect();
  assert_eq!(names.first().map(String::as_str), Some("goiface.start"));
  assert_eq!(names.iter().filter(|name| *name == "goiface.generate").count(), 4);

  let finish = finish_event(&assert.get_output().stdout);
  assert_eq!(finish["status"], "success");
  assert_eq!(finish["generated"].as_array().map(Vec::len), Some(4));
  assert!(output.path().join("gtk/iface/button.go").exists());
  assert!(output.path().join("gtk/real_gtk.go").exists());
}

#[test]
fn parse_failure_exits_1_with_diagnostic() {
  let source = tempdir().unwrap();
  let output = tempdir().unwrap();
  fs::write(source.path().join("broken.go"), "package gtk\n\nfunc Broken(\n").unwrap();

  let assert = goiface_gen()
    .args(run_args(source.path(), output.path()))
    .assert()
    .code(1);
  let finish = finish_event(&assert.get_output().stdout);
  assert_eq!(finish["status"], "failed");
  assert_eq!(finish["diagnostics"][0]["code"], "goiface.parse_failed");
  assert!(!output.path().join("gtk").exists());
}

#[test]
fn exclude_flag_skips_matching_files() {
  let source = tempdir().unwrap();
  let output = tempdir().unwrap();
  fs::write(source.path().join("app.go"), "package gtk\n\nfunc Init() {}\n").unwrap();
  fs::write(source.path().join("zz_broken.go"), "package gtk\n\nfunc Broken(\n").unwrap();

  let mut args = vec!["--exclude", "^zz_"];
  args.extend(run_args(source.path(), output.path()));
  goiface_gen().args(args).assert().success();
  assert!(output.path().join("gtk/iface/gtk.go").exists());
}
