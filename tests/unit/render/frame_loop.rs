use std::convert::Infallible;

use super::*;

#[test]
fn runs_exactly_max_frames_then_idles() {
    let mut lp = FrameLoop::new(120);
    assert_eq!(lp.state(), LoopState::Idle);
    assert_eq!(lp.start(), FrameIndex(0));
    assert_eq!(
        lp.state(),
        LoopState::Running {
            frame: FrameIndex(0)
        }
    );

    let mut painted = Vec::new();
    let mut ticks = 0;
    loop {
        ticks += 1;
        let step = lp
            .tick(|f| {
                painted.push(f.0);
                Ok::<_, Infallible>(())
            })
            .unwrap();
        if step == Step::Done {
            break;
        }
    }

    assert_eq!(ticks, 120);
    assert_eq!(painted, (0..120).collect::<Vec<_>>());
    assert_eq!(lp.state(), LoopState::Idle);
    assert_eq!(lp.progress_percent(), 100);
}

#[test]
fn idle_tick_paints_nothing() {
    let mut lp = FrameLoop::new(3);
    let step = lp
        .tick(|_| -> Result<(), Infallible> { panic!("must not paint") })
        .unwrap();
    assert_eq!(step, Step::Done);
}

#[test]
fn restart_resets_to_frame_zero() {
    let mut lp = FrameLoop::new(10);
    lp.start();
    for _ in 0..4 {
        lp.tick(|_| Ok::<_, Infallible>(())).unwrap();
    }
    assert_eq!(lp.progress_percent(), 40);
    lp.start();
    assert_eq!(lp.completed(), 0);
    assert_eq!(
        lp.state(),
        LoopState::Running {
            frame: FrameIndex(0)
        }
    );
}

#[test]
fn paint_error_does_not_advance() {
    let mut lp = FrameLoop::new(5);
    lp.start();
    assert!(lp.tick(|_| Err("boom")).is_err());
    assert_eq!(
        lp.state(),
        LoopState::Running {
            frame: FrameIndex(0)
        }
    );
}
