// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::frame_loop::FrameLoop;
use gloo_render::{request_animation_frame, AnimationFrame};
use renderer::GraphicsContext;
use std::cell::RefCell;
use std::rc::Rc;

/// Calls back once per display refresh.
pub trait Scheduler: 'static {
    /// Keeps a requested callback alive until it fires.
    type Handle: 'static;

    /// Calls `callback` once, with a monotonic timestamp in milliseconds, before the next
    /// repaint.
    fn request_frame(&self, callback: impl FnOnce(f64) + 'static) -> Self::Handle;
}

/// Schedules with `window.requestAnimationFrame`.
#[derive(Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = AnimationFrame;

    fn request_frame(&self, callback: impl FnOnce(f64) + 'static) -> AnimationFrame {
        request_animation_frame(callback)
    }
}

/// A [`FrameLoop`] being driven by a [`Scheduler`].
pub struct Animation<G: GraphicsContext, S: Scheduler> {
    frame_loop: FrameLoop<G>,
    scheduler: S,
    pending: Option<S::Handle>,
    /// Handle of the callback that requested `pending`, which may still be running.
    _running: Option<S::Handle>,
}

impl<G: GraphicsContext, S: Scheduler> Animation<G, S> {
    /// The animated [`FrameLoop`].
    pub fn frame_loop(&self) -> &FrameLoop<G> {
        &self.frame_loop
    }
}

/// Draws a frame of `frame_loop` on every callback from `scheduler`, forever. Each callback
/// requests exactly one successor after its frame is done, so frames never overlap.
pub fn animate<G: GraphicsContext + 'static, S: Scheduler>(
    frame_loop: FrameLoop<G>,
    scheduler: S,
) -> Rc<RefCell<Animation<G, S>>> {
    let animation = Rc::new(RefCell::new(Animation {
        frame_loop,
        scheduler,
        pending: None,
        _running: None,
    }));
    request_next(&animation);
    animation
}

fn request_next<G: GraphicsContext + 'static, S: Scheduler>(
    animation: &Rc<RefCell<Animation<G, S>>>,
) {
    let next = Rc::clone(animation);
    let handle = animation.borrow().scheduler.request_frame(move |time| {
        if let Err(e) = next.borrow_mut().frame_loop.frame(time) {
            log::debug!("skipped frame: {}", e);
        }
        request_next(&next);
    });
    // Don't drop the handle of a callback that is still running.
    let mut animation = animation.borrow_mut();
    let running = animation.pending.replace(handle);
    animation._running = running;
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::frame_loop::FrameLoop;
    use crate::scheduler::{animate, Scheduler};
    use glam::uvec2;
    use renderer::{RecordingContext, Renderer};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Queues callbacks until the test fires them.
    #[derive(Clone, Default)]
    struct ManualScheduler(Rc<RefCell<VecDeque<Box<dyn FnOnce(f64)>>>>);

    impl Scheduler for ManualScheduler {
        type Handle = ();

        fn request_frame(&self, callback: impl FnOnce(f64) + 'static) {
            self.0.borrow_mut().push_back(Box::new(callback));
        }
    }

    impl ManualScheduler {
        fn pending(&self) -> usize {
            self.0.borrow().len()
        }

        fn fire(&self, time: f64) {
            let callback = self.0.borrow_mut().pop_front().expect("no frame requested");
            callback(time);
        }
    }

    #[test]
    fn one_callback_one_frame() {
        let renderer = Renderer::with_context(RecordingContext::with_size(uvec2(640, 480)));
        let frame_loop = FrameLoop::new(renderer, &Config::default()).unwrap();
        let scheduler = ManualScheduler::default();
        let animation = animate(frame_loop, scheduler.clone());

        // Nothing is drawn until the host calls back.
        assert_eq!(scheduler.pending(), 1);
        assert!(animation
            .borrow()
            .frame_loop()
            .renderer()
            .context()
            .draws()
            .is_empty());

        for (i, time) in [1000.0, 1016.0, 1033.0, 1050.0].into_iter().enumerate() {
            scheduler.fire(time);
            assert_eq!(scheduler.pending(), 1);

            let animation = animation.borrow();
            let frame_loop = animation.frame_loop();
            assert_eq!(frame_loop.renderer().context().draws().len(), i + 1);
            assert!((frame_loop.clock().rotation() - time * 0.001).abs() < 1e-12);
        }
    }

    #[test]
    fn keeps_running_through_degenerate_frames() {
        let renderer = Renderer::with_context(RecordingContext::with_size(uvec2(640, 0)));
        let frame_loop = FrameLoop::new(renderer, &Config::default()).unwrap();
        let scheduler = ManualScheduler::default();
        let animation = animate(frame_loop, scheduler.clone());

        scheduler.fire(16.0);
        assert_eq!(scheduler.pending(), 1);

        animation
            .borrow()
            .frame_loop()
            .renderer()
            .context()
            .set_drawing_buffer_size(uvec2(640, 480));
        scheduler.fire(32.0);
        assert_eq!(
            animation
                .borrow()
                .frame_loop()
                .renderer()
                .context()
                .draws()
                .len(),
            1
        );
    }
}
