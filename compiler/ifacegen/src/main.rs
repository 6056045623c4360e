use goiface_gen::{generate, load_config, DiagnosticEntry, GenConfig, GenError, GenerateOptions};
use serde_json::json;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Default)]
struct CliOptions {
  config_path: Option<PathBuf>,
  exclude: Vec<String>,
  positionals: Vec<String>,
}

fn main() {
  let args: Vec<String> = env::args().skip(1).collect();
  let cli = match parse_args(&args) {
    Ok(value) => value,
    Err(message) => {
      if message == "help" {
        print_usage();
        return;
      }
      fail_with(DiagnosticEntry {
        code: "goiface.config_invalid".to_string(),
        file: None,
        type_name: None,
        reason: Some(message),
        hint: Some("--help で引数を確認".to_string()),
      });
    }
  };

  if cli.positionals.len() < 5 {
    print_usage();
    std::process::exit(1);
  }

  emit_log(json!({
    "event": "goiface.start",
    "source": cli.positionals[0],
    "config": cli.config_path.as_ref().map(|path| path.to_string_lossy().to_string()),
  }));

  let options = match build_options(&cli) {
    Ok(options) => options,
    Err(err) => fail_with(err.to_diagnostic()),
  };

  match generate(&options) {
    Ok(report) => {
      emit_log(json!({
        "event": "goiface.collect",
        "status": "success",
        "files": report
          .source_files
          .iter()
          .map(|path| path.to_string_lossy().to_string())
          .collect::<Vec<_>>(),
        "types": report.types,
        "operations": report.operations,
        "input_hash": report.input_hash,
      }));
      for file in &report.files {
        emit_log(json!({
          "event": "goiface.generate",
          "status": "success",
          "output": file.path.to_string_lossy(),
          "bytes": file.contents.len(),
        }));
      }
      emit_log(json!({
        "event": "goiface.finish",
        "status": "success",
        "generated": report
          .files
          .iter()
          .map(|file| file.path.to_string_lossy().to_string())
          .collect::<Vec<_>>(),
        "diagnostics": Vec::<DiagnosticEntry>::new(),
      }));
    }
    Err(err) => fail_with(err.to_diagnostic()),
  }
}

fn build_options(cli: &CliOptions) -> Result<GenerateOptions, GenError> {
  let mut config = match &cli.config_path {
    Some(path) => load_config(path)?,
    None => GenConfig::default(),
  };
  config.apply_overrides(&cli.exclude);
  config.compile_excludes()?;

  Ok(GenerateOptions {
    source_dir: PathBuf::from(&cli.positionals[0]),
    contract_name: cli.positionals[1].clone(),
    package_root: cli.positionals[2].clone(),
    package_name: cli.positionals[3].clone(),
    output_dir: PathBuf::from(&cli.positionals[4]),
    config,
  })
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
  let mut cli = CliOptions::default();
  let mut iter = args.iter().peekable();

  while let Some(arg) = iter.next() {
    match arg.as_str() {
      "--config" => {
        cli.config_path = Some(next_value(&mut iter, "--config")?.into());
      }
      "--exclude" => {
        cli.exclude.push(next_value(&mut iter, "--exclude")?);
      }
      "--help" | "-h" => {
        return Err("help".to_string());
      }
      value if value.starts_with("--") => {
        return Err(format!("不明なオプション: {}", arg));
      }
      _ => cli.positionals.push(arg.clone()),
    }
  }

  Ok(cli)
}

fn next_value<'a, I>(iter: &mut I, flag: &str) -> Result<String, String>
where
  I: Iterator<Item = &'a String>,
{
  iter
    .next()
    .map(|value| value.to_string())
    .ok_or_else(|| format!("{} の値が必要です", flag))
}

fn emit_log(value: serde_json::Value) {
  if let Ok(line) = serde_json::to_string(&value) {
    println!("{}", line);
  }
}

fn fail_with(diagnostic: DiagnosticEntry) -> ! {
  emit_log(json!({
    "event": "goiface.finish",
    "status": "failed",
    "diagnostics": [diagnostic],
  }));
  std::process::exit(1);
}

fn print_usage() {
  let usage = r#"goiface-gen

USAGE:
  goiface-gen [options] <source-dir> <contract-name> <package-root> <package-name> <output-dir>

OPTIONS:
  --config <path>      設定ファイル（TOML）を指定
  --exclude <pattern>  除外するファイル名パターン（正規表現、複数指定可）
  --help, -h           ヘルプ表示
"#;
  println!("{}", usage);
}
