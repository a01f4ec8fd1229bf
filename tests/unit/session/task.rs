use std::sync::mpsc;

use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Canvas;

fn job(id: u64, max_frames: u64, clock: Box<dyn FrameClock>) -> RenderJob {
    RenderJob {
        id: TaskId(id),
        config: GeneratorConfig {
            canvas: Canvas {
                width: 64,
                height: 48,
            },
            max_frames,
            ..GeneratorConfig::default()
        },
        script: Script::parse("Hello world this is a test"),
        clock,
        sink: None,
    }
}

struct SleepClock(Duration);

impl FrameClock for SleepClock {
    fn wait_next_frame(&mut self) {
        std::thread::sleep(self.0);
    }
}

#[test]
fn full_run_reports_every_frame_then_finishes() {
    let (tx, rx) = mpsc::channel();
    run(job(1, 10, Box::new(ImmediateClock)), &CancelToken::new(), &tx);
    drop(tx);
    let events: Vec<RenderEvent> = rx.iter().collect();

    assert_eq!(events.len(), 12);
    assert_eq!(events[0], RenderEvent::Started { task: TaskId(1) });
    for (i, ev) in events[1..11].iter().enumerate() {
        let RenderEvent::Progress { frame, percent, .. } = ev else {
            panic!("expected progress, got {ev:?}");
        };
        assert_eq!(frame.0, i as u64);
        assert_eq!(*percent as usize, (i + 1) * 10);
    }
    let RenderEvent::Finished { artifact, task } = &events[11] else {
        panic!("expected finish");
    };
    assert_eq!(*task, TaskId(1));
    assert_eq!((artifact.width, artifact.height), (64, 48));
    assert!(events.iter().all(|e| e.task() == TaskId(1)));
}

#[test]
fn cancelled_before_start_paints_nothing() {
    let (tx, rx) = mpsc::channel();
    let token = CancelToken::new();
    token.cancel();
    run(job(2, 10, Box::new(ImmediateClock)), &token, &tx);
    drop(tx);
    let events: Vec<RenderEvent> = rx.iter().collect();
    assert_eq!(
        events,
        vec![
            RenderEvent::Started { task: TaskId(2) },
            RenderEvent::Cancelled { task: TaskId(2) }
        ]
    );
}

#[test]
fn handle_cancel_stops_a_running_worker() {
    let (tx, rx) = mpsc::channel();
    let clock = Box::new(SleepClock(Duration::from_millis(5)));
    let handle = spawn(job(3, 100_000, clock), tx).unwrap();
    assert_eq!(handle.id(), TaskId(3));

    // Wait for the first painted frame before cancelling.
    loop {
        if let RenderEvent::Progress { .. } = rx.recv().unwrap() {
            break;
        }
    }
    handle.cancel();
    handle.join().unwrap();

    let last = rx.iter().last().unwrap();
    assert_eq!(last, RenderEvent::Cancelled { task: TaskId(3) });
}

#[test]
fn dropping_the_handle_cancels() {
    let (tx, rx) = mpsc::channel();
    let clock = Box::new(SleepClock(Duration::from_millis(5)));
    let handle = spawn(job(4, 100_000, clock), tx).unwrap();
    let token = handle.token().clone();
    drop(handle);
    assert!(token.is_cancelled());
    assert!(rx.iter().last().unwrap().is_terminal());
}

#[test]
fn sink_receives_each_frame() {
    struct Shared(std::sync::Arc<std::sync::Mutex<InMemorySink>>);
    impl FrameSink for Shared {
        fn begin(&mut self, cfg: SinkConfig) -> ToonResult<()> {
            self.0.lock().unwrap().begin(cfg)
        }
        fn push_frame(
            &mut self,
            idx: FrameIndex,
            frame: &crate::render::backend::FrameRGBA,
        ) -> ToonResult<()> {
            self.0.lock().unwrap().push_frame(idx, frame)
        }
        fn end(&mut self) -> ToonResult<()> {
            self.0.lock().unwrap().end()
        }
    }

    let shared = std::sync::Arc::new(std::sync::Mutex::new(InMemorySink::new()));
    let mut j = job(5, 6, Box::new(ImmediateClock));
    j.sink = Some(Box::new(Shared(shared.clone())));
    let (tx, rx) = mpsc::channel();
    run(j, &CancelToken::new(), &tx);
    drop(tx);
    assert!(matches!(rx.iter().last(), Some(RenderEvent::Finished { .. })));

    let sink = shared.lock().unwrap();
    assert_eq!(sink.frames().len(), 6);
    assert!(sink.is_ended());
}

#[test]
fn unavailable_surface_fails_at_capture() {
    let (tx, rx) = mpsc::channel();
    let mut j = job(6, 3, Box::new(ImmediateClock));
    j.config.canvas = Canvas {
        width: 70_000,
        height: 10,
    };
    run(j, &CancelToken::new(), &tx);
    drop(tx);
    let events: Vec<RenderEvent> = rx.iter().collect();
    assert_eq!(events.len(), 5);
    assert!(matches!(events[4], RenderEvent::Failed { .. }));
}

#[test]
fn interval_clock_paces_frames() {
    let mut clock = IntervalClock::new(Fps::new(100, 1).unwrap());
    assert_eq!(clock.period(), Duration::from_millis(10));
    let t0 = Instant::now();
    clock.wait_next_frame();
    clock.wait_next_frame();
    clock.wait_next_frame();
    assert!(t0.elapsed() >= Duration::from_millis(20));
}
