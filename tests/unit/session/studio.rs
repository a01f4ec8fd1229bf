use std::sync::{Arc, Mutex};

use super::*;
use crate::encode::sink::{InMemorySink, SinkConfig};
use crate::foundation::core::Canvas;
use crate::render::backend::FrameRGBA;

fn studio(max_frames: u64) -> Studio {
    let config = GeneratorConfig {
        canvas: Canvas {
            width: 80,
            height: 60,
        },
        max_frames,
        ..GeneratorConfig::default()
    };
    Studio::new(config).unwrap().with_pacing(Pacing::Immediate)
}

#[test]
fn empty_script_is_blocked_before_any_task() {
    let mut s = studio(10);
    s.set_script("   \n\t ");
    let err = s.generate().unwrap_err();
    assert_eq!(err.to_string(), "Please enter a script for your video!");
    assert_eq!(s.status(), &GenerationStatus::Idle);
    assert_eq!(s.progress(), 0);
    assert!(s.download().is_none());
}

#[test]
fn generation_completes_with_artifact_and_details() {
    let mut s = studio(120);
    s.set_script("Hello world this is a test");
    s.set_style(AnimationStyle::Anime);
    s.set_voice(VoiceStyle::Kid);
    let id = s.generate().unwrap();
    assert!(s.status().is_generating());

    let status = s.wait().clone();
    assert_eq!(status, GenerationStatus::Complete { task: id });
    assert_eq!(s.progress(), 100);

    let artifact = s.download().unwrap();
    assert_eq!(artifact.file_name, "youtube-cartoon-animation.png");
    assert_eq!((artifact.width, artifact.height), (80, 60));

    let details = s.details().unwrap();
    assert_eq!(details.style, "Anime Style");
    assert_eq!(details.voice, "Kid-Friendly");
    assert_eq!(details.duration_secs, 2);
    assert_eq!(details.format, "Animated Canvas (80x60)");
}

#[test]
fn download_before_completion_yields_nothing() {
    let mut s = studio(100_000).with_pacing(Pacing::Realtime);
    s.set_script("slow run");
    s.generate().unwrap();
    assert!(s.download().is_none());
    assert!(s.details().is_none());
    assert!(s.cancel());
    assert!(matches!(s.status(), GenerationStatus::Cancelled { .. }));
    assert!(s.download().is_none());
    assert!(!s.cancel());
}

struct SharedSink(Arc<Mutex<InMemorySink>>);

impl FrameSink for SharedSink {
    fn begin(&mut self, cfg: SinkConfig) -> ToonResult<()> {
        self.0.lock().unwrap().begin(cfg)
    }
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ToonResult<()> {
        self.0.lock().unwrap().push_frame(idx, frame)
    }
    fn end(&mut self) -> ToonResult<()> {
        self.0.lock().unwrap().end()
    }
}

#[test]
fn regenerate_supersedes_the_running_task() {
    let mut s = studio(100_000).with_pacing(Pacing::Realtime);
    s.set_script("first run");
    let first_frames = Arc::new(Mutex::new(InMemorySink::new()));
    let first = s
        .generate_into(Box::new(SharedSink(first_frames.clone())))
        .unwrap();
    while !matches!(s.status(), GenerationStatus::Generating { frame: Some(_), .. }) {
        s.poll();
        std::thread::sleep(Duration::from_millis(1));
    }

    s.set_script("second run");
    let second = s.generate().unwrap();
    assert_ne!(first, second);

    let painted_by_first = first_frames.lock().unwrap().frames().len();
    assert!(painted_by_first >= 1);
    assert!(!first_frames.lock().unwrap().is_ended());

    // A late event from the first task must not move the session.
    s.tx
        .send(RenderEvent::Progress {
            task: first,
            frame: FrameIndex(99_999),
            percent: 99,
        })
        .unwrap();
    std::thread::sleep(Duration::from_millis(30));
    s.poll();

    match s.status() {
        GenerationStatus::Generating {
            task,
            frame,
            progress,
        } => {
            assert_eq!(*task, second);
            assert_ne!(*frame, Some(FrameIndex(99_999)));
            assert!(*progress < 99);
        }
        other => panic!("expected the second task to be running, got {other:?}"),
    }
    assert_eq!(first_frames.lock().unwrap().frames().len(), painted_by_first);
    assert!(s.cancel());
}

#[test]
fn stopping_a_running_task_leaves_it_cancelled() {
    let mut s = studio(10);
    s.status = GenerationStatus::Generating {
        task: TaskId(7),
        frame: None,
        progress: 0,
    };
    s.stop_current();
    assert_eq!(s.status(), &GenerationStatus::Cancelled { task: TaskId(7) });
}

#[test]
fn wait_returns_when_the_worker_is_gone() {
    let mut s = studio(10);
    s.status = GenerationStatus::Generating {
        task: TaskId(8),
        frame: Some(FrameIndex(3)),
        progress: 40,
    };
    assert!(s.current.is_none());
    assert!(matches!(
        s.wait(),
        GenerationStatus::Failed { task, .. } if *task == TaskId(8)
    ));
}

#[test]
fn restart_after_completion_clears_the_artifact() {
    let mut s = studio(5);
    s.set_script("one two");
    s.generate().unwrap();
    s.wait();
    assert!(s.download().is_some());

    s.generate().unwrap();
    assert!(s.download().is_none());
    s.wait();
    assert!(s.download().is_some());
}

#[test]
fn stale_events_are_ignored() {
    let mut s = studio(5);
    s.set_script("a b c");
    let id = s.generate().unwrap();
    s.tx
        .send(RenderEvent::Cancelled {
            task: TaskId(id.0 + 100),
        })
        .unwrap();
    assert_eq!(s.wait(), &GenerationStatus::Complete { task: id });
}

#[test]
fn invalid_config_is_rejected() {
    let config = GeneratorConfig {
        max_frames: 0,
        ..GeneratorConfig::default()
    };
    assert!(Studio::new(config).is_err());
}
