use std::{
  fs,
  path::{Path, PathBuf},
  process::Command,
};

use crate::{
  batch::Batch,
  error::{Error, ErrorKind, Result},
  paths::ToolPaths,
  process::Executor,
  request::{RawRequest, WatermarkSettings},
  watermark::Watermarker,
};

/// One recorded subprocess call.
#[derive(Debug, Clone)]
struct Call {
  program: String,
  args: Vec<String>,
}

impl Call {
  fn is_probe(&self) -> bool {
    self.program == "ffprobe"
  }

  fn is_prescale(&self) -> bool {
    self.program == "ffmpeg" && self.args.iter().any(|a| a == "-vf")
  }

  fn is_composite(&self) -> bool {
    self.program == "ffmpeg" && self.args.iter().any(|a| a == "-filter_complex")
  }

  fn output(&self) -> &str {
    self.args.last().map(String::as_str).unwrap_or_default()
  }

  /// The value following `flag`, or the `n`th input for `-i`.
  fn value_after(&self, flag: &str, n: usize) -> Option<&str> {
    self
      .args
      .iter()
      .enumerate()
      .filter(|(_, a)| *a == flag)
      .nth(n)
      .and_then(|(i, _)| self.args.get(i + 1))
      .map(String::as_str)
  }
}

/// Stands in for ffmpeg/ffprobe: records every call, answers probes with a
/// canned document and writes a placeholder file at each ffmpeg output.
struct FakeTools {
  calls: Vec<Call>,
  probe_output: String,
  fail_prescale: bool,
  fail_composite: bool,
  fail_inputs: Vec<PathBuf>,
  /// Whether the composite's second input existed while it ran.
  watermark_existed: Vec<bool>,
}

impl FakeTools {
  fn new() -> Self {
    Self {
      calls: Vec::new(),
      probe_output: r#"{"streams": [{"width": 1920, "height": 1080, "sample_aspect_ratio": "1:1"}]}"#
        .to_string(),
      fail_prescale: false,
      fail_composite: false,
      fail_inputs: Vec::new(),
      watermark_existed: Vec::new(),
    }
  }

  fn calls_where(&self, predicate: fn(&Call) -> bool) -> Vec<&Call> {
    self.calls.iter().filter(|c| predicate(c)).collect()
  }
}

impl Executor for FakeTools {
  fn execute(&mut self, command: &mut Command) -> Result<String> {
    let call = Call {
      program: command.get_program().to_string_lossy().into_owned(),
      args: command
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect(),
    };
    self.calls.push(call.clone());

    if call.is_probe() {
      return Ok(self.probe_output.clone());
    }

    if call.is_prescale() && self.fail_prescale {
      return Err(Error::process("Error reinitializing filters!\nInvalid argument\n"));
    }

    if call.is_composite() {
      let second_input = call.value_after("-i", 1).unwrap();
      self.watermark_existed.push(Path::new(second_input).exists());
      let first_input = PathBuf::from(call.value_after("-i", 0).unwrap());
      if self.fail_composite || self.fail_inputs.contains(&first_input) {
        return Err(Error::process("Error initializing complex filters.\nInvalid argument\n"));
      }
    }

    fs::write(call.output(), b"rendered")?;
    Ok(String::new())
  }
}

struct Workspace {
  dir: tempfile::TempDir,
}

impl Workspace {
  fn new() -> Self {
    let dir = tempfile::tempdir().unwrap();
    for name in ["clip.mp4", "logo.png"] {
      fs::write(dir.path().join(name), b"fixture").unwrap();
    }
    fs::create_dir(dir.path().join("out")).unwrap();
    Self { dir }
  }

  fn path(&self, name: &str) -> PathBuf {
    self.dir.path().join(name)
  }

  fn request(&self) -> RawRequest {
    RawRequest::new(
      self.path("clip.mp4"),
      self.path("logo.png"),
      self.path("out").join("clip.mp4"),
    )
  }
}

fn watermarker(tools: FakeTools) -> Watermarker<FakeTools> {
  let paths = ToolPaths {
    ffmpeg: PathBuf::from("ffmpeg"),
    ffprobe: PathBuf::from("ffprobe"),
  };
  Watermarker::with_executor(paths, tools)
}

#[test]
fn test_manual_placement_runs_single_composite() {
  let ws = Workspace::new();
  let mut wm = watermarker(FakeTools::new());
  let raw = ws.request().position("bottom-right").offset(10, 10);

  let output = wm.add_watermark(&raw).unwrap();
  assert_eq!(output, ws.path("out").join("clip.mp4"));

  let calls = &wm.executor().calls;
  assert_eq!(calls.len(), 1);
  let composite = &calls[0];
  assert!(composite.is_composite());
  assert!(composite.args.contains(&"-y".to_string()));
  assert_eq!(composite.value_after("-i", 0), Some(ws.path("clip.mp4").to_str().unwrap()));
  assert_eq!(composite.value_after("-i", 1), Some(ws.path("logo.png").to_str().unwrap()));
  let graph = composite.value_after("-filter_complex", 0).unwrap();
  assert!(graph.contains("x=W-w-10:y=H-h-10"));
  assert!(graph.contains("blend=all_mode=normal"));
  assert_eq!(composite.output(), output.to_str().unwrap());
}

#[test]
fn test_autoscale_probes_prescales_and_cleans_up() {
  let ws = Workspace::new();
  let mut wm = watermarker(FakeTools::new());
  let raw = ws
    .request()
    .position("bottom-right")
    .offset(10, 10)
    .autoscale(true);

  wm.add_watermark(&raw).unwrap();

  let tools = wm.executor();
  let kinds: Vec<_> = tools
    .calls
    .iter()
    .map(|c| (c.is_probe(), c.is_prescale(), c.is_composite()))
    .collect();
  assert_eq!(
    kinds,
    [(true, false, false), (false, true, false), (false, false, true)]
  );

  let prescale = &tools.calls[1];
  let temp = prescale.output();
  assert!(temp.ends_with(".png"));
  assert_eq!(prescale.value_after("-vf", 0), Some("scale=w=1920:h=-1"));

  let composite = &tools.calls[2];
  assert_eq!(composite.value_after("-i", 1), Some(temp));
  let graph = composite.value_after("-filter_complex", 0).unwrap();
  assert!(graph.contains("overlay=x=0:y=0"));
  assert!(!graph.contains("W-w-10"));

  assert_eq!(tools.watermark_existed, [true]);
  assert!(!Path::new(temp).exists());
}

#[test]
fn test_autoscale_cleans_up_when_composite_fails() {
  let ws = Workspace::new();
  let mut fake = FakeTools::new();
  fake.fail_composite = true;
  let mut wm = watermarker(fake);

  let err = wm.add_watermark(&ws.request().autoscale(true)).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Process);
  assert!(err.message.contains("Error initializing complex filters"));

  let tools = wm.executor();
  let temp = tools.calls_where(Call::is_prescale)[0].output().to_string();
  assert_eq!(tools.watermark_existed, [true]);
  assert!(!Path::new(&temp).exists());
}

#[test]
fn test_autoscale_cleans_up_when_prescale_fails() {
  let ws = Workspace::new();
  let mut fake = FakeTools::new();
  fake.fail_prescale = true;
  let mut wm = watermarker(fake);

  let err = wm.add_watermark(&ws.request().autoscale(true)).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Process);
  assert!(err.message.contains("Error reinitializing filters"));

  let tools = wm.executor();
  assert!(tools.calls_where(Call::is_composite).is_empty());
  let prescales = tools.calls_where(Call::is_prescale);
  assert_eq!(prescales.len(), 1);
  assert!(!Path::new(prescales[0].output()).exists());
  assert!(!ws.path("out").join("clip.mp4").exists());
}

#[test]
fn test_probe_failure_spawns_nothing_else() {
  let ws = Workspace::new();
  let mut fake = FakeTools::new();
  fake.probe_output = r#"{"streams": []}"#.to_string();
  let mut wm = watermarker(fake);

  let err = wm.add_watermark(&ws.request().autoscale(true)).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Probe);
  assert_eq!(wm.executor().calls.len(), 1);
}

#[test]
fn test_invalid_request_spawns_nothing() {
  let ws = Workspace::new();
  let mut wm = watermarker(FakeTools::new());

  let invalid = [
    ws.request().offset("abc", 0),
    ws.request().position("center"),
    ws.request().blend_mode("invalid-mode"),
    RawRequest::new(ws.path("missing.mp4"), ws.path("logo.png"), ws.path("o.mp4")),
  ];
  for raw in &invalid {
    let err = wm.add_watermark(raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
  }
  assert!(wm.executor().calls.is_empty());
}

#[test]
fn test_batch_reports_progress_and_outputs() {
  let ws = Workspace::new();
  fs::write(ws.path("intro.mov"), b"fixture").unwrap();
  let mut wm = watermarker(FakeTools::new());
  let batch = Batch::new(
    [ws.path("clip.mp4"), ws.path("intro.mov"), ws.path("clip.mp4")],
    ws.path("logo.png"),
    ws.path("out"),
  );

  let mut seen = Vec::new();
  let produced = wm
    .run_batch(&batch, |p| seen.push((p.index, p.total, p.file.to_path_buf())))
    .unwrap();

  assert_eq!(
    produced,
    [ws.path("out").join("clip.mp4"), ws.path("out").join("intro.mov")]
  );
  assert_eq!(
    seen,
    [(0, 2, ws.path("clip.mp4")), (1, 2, ws.path("intro.mov"))]
  );
  assert!(produced.iter().all(|p| p.exists()));
}

#[test]
fn test_batch_stops_at_first_failure() {
  let ws = Workspace::new();
  for name in ["a.mp4", "b.mp4", "c.mp4"] {
    fs::write(ws.path(name), b"fixture").unwrap();
  }
  let mut fake = FakeTools::new();
  fake.fail_inputs.push(ws.path("b.mp4"));
  let mut wm = watermarker(fake);
  let batch = Batch::new(
    [ws.path("a.mp4"), ws.path("b.mp4"), ws.path("c.mp4")],
    ws.path("logo.png"),
    ws.path("out"),
  )
  .settings(WatermarkSettings::default());

  let err = wm.run_batch(&batch, |_| {}).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Process);
  assert_eq!(err.file.as_deref(), Some(ws.path("b.mp4").as_path()));

  // a was written and left alone, c was never attempted
  assert!(ws.path("out").join("a.mp4").exists());
  assert!(!ws.path("out").join("c.mp4").exists());
  assert_eq!(wm.executor().calls_where(Call::is_composite).len(), 2);
}
