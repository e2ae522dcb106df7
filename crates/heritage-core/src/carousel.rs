use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::timer::{Scheduler, TimerHandle, TimerTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarouselState {
    pub index: usize,
    pub len: usize,
    pub auto_advance_enabled: bool,
}

/// Auto-advancing slide index with manual next/previous.
///
/// Manual moves never touch the timer, so the next automatic advance still
/// lands on the established cadence and can compound with a manual one.
#[derive(Debug)]
pub struct CarouselScheduler {
    len: usize,
    index: usize,
    auto_advance: bool,
    generation: u64,
    timer: Option<TimerHandle>,
    torn_down: bool,
}

impl CarouselScheduler {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            auto_advance: true,
            generation: 0,
            timer: None,
            torn_down: false,
        }
    }

    /// Start the repeating advance.  An empty or single-slide carousel has
    /// nothing to rotate, so no timer is created.
    pub fn start(&mut self, scheduler: &dyn Scheduler, period: Duration) {
        if self.torn_down || self.len < 2 {
            return;
        }
        self.generation += 1;
        let tag = TimerTag::Carousel {
            generation: self.generation,
        };
        // Replacing drops (and cancels) any previous timer.
        let timer = scheduler.every(period, tag);
        if !self.auto_advance {
            timer.suspend();
        }
        self.timer = Some(timer);
        info!("carousel: started, {} slides every {:?}", self.len, period);
    }

    /// Automatic firing.  Returns whether the index moved.
    pub fn on_tick(&mut self, generation: u64) -> bool {
        if self.torn_down || !self.auto_advance || generation != self.generation {
            debug!("carousel: drop tick gen {}", generation);
            return false;
        }
        self.step_forward();
        true
    }

    pub fn next(&mut self) {
        if !self.torn_down {
            self.step_forward();
        }
    }

    pub fn previous(&mut self) {
        if !self.torn_down && self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    fn step_forward(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        if self.auto_advance == enabled {
            return;
        }
        self.auto_advance = enabled;
        if let Some(timer) = &self.timer {
            if enabled {
                timer.resume();
            } else {
                timer.suspend();
            }
        }
        debug!("carousel: auto-advance {}", enabled);
    }

    /// Cancel the timer.  The index is frozen from here on.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.timer = None;
        info!("carousel: torn down at {}", self.index);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn state(&self) -> CarouselState {
        CarouselState {
            index: self.index,
            len: self.len,
            auto_advance_enabled: self.auto_advance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualScheduler;

    const PERIOD: Duration = Duration::from_secs(4);

    fn run(carousel: &mut CarouselScheduler, sched: &ManualScheduler, by: Duration) {
        for tag in sched.advance(by) {
            if let TimerTag::Carousel { generation } = tag {
                carousel.on_tick(generation);
            }
        }
    }

    #[test]
    fn starts_at_zero_with_auto_advance() {
        let c = CarouselScheduler::new(4);
        assert_eq!(
            c.state(),
            CarouselState {
                index: 0,
                len: 4,
                auto_advance_enabled: true
            }
        );
    }

    #[test]
    fn previous_wraps_backwards() {
        let mut c = CarouselScheduler::new(4);
        let mut seen = Vec::new();
        for _ in 0..3 {
            c.previous();
            seen.push(c.state().index);
        }
        assert_eq!(seen, vec![3, 2, 1]);
    }

    #[test]
    fn next_wraps_forwards() {
        let mut c = CarouselScheduler::new(3);
        c.next();
        c.next();
        c.next();
        assert_eq!(c.state().index, 0);
    }

    #[test]
    fn automatic_advance_on_cadence() {
        let sched = ManualScheduler::new();
        let mut c = CarouselScheduler::new(4);
        c.start(&sched, PERIOD);
        run(&mut c, &sched, Duration::from_secs(3));
        assert_eq!(c.state().index, 0);
        run(&mut c, &sched, Duration::from_secs(1));
        assert_eq!(c.state().index, 1);
        run(&mut c, &sched, 3 * PERIOD);
        assert_eq!(c.state().index, 0);
    }

    #[test]
    fn manual_move_keeps_phase() {
        let sched = ManualScheduler::new();
        let mut c = CarouselScheduler::new(4);
        c.start(&sched, PERIOD);
        run(&mut c, &sched, Duration::from_secs(3));
        c.next();
        assert_eq!(c.state().index, 1);
        // The automatic tick still fires at t=4s, one second after the manual move.
        run(&mut c, &sched, Duration::from_secs(1));
        assert_eq!(c.state().index, 2);
    }

    #[test]
    fn disabling_auto_advance_suspends_timer() {
        let sched = ManualScheduler::new();
        let mut c = CarouselScheduler::new(4);
        c.start(&sched, PERIOD);
        c.set_auto_advance(false);
        run(&mut c, &sched, 3 * PERIOD);
        assert_eq!(c.state().index, 0);
        c.set_auto_advance(true);
        run(&mut c, &sched, PERIOD);
        assert_eq!(c.state().index, 1);
    }

    #[test]
    fn teardown_cancels_and_freezes() {
        let sched = ManualScheduler::new();
        let mut c = CarouselScheduler::new(4);
        c.start(&sched, PERIOD);
        assert_eq!(sched.live_count(), 1);
        c.teardown();
        assert_eq!(sched.live_count(), 0);
        assert!(!c.on_tick(1));
        c.next();
        c.previous();
        assert_eq!(c.state().index, 0);
    }

    #[test]
    fn single_slide_never_starts_timer() {
        let sched = ManualScheduler::new();
        let mut c = CarouselScheduler::new(1);
        c.start(&sched, PERIOD);
        assert_eq!(sched.live_count(), 0);
        c.next();
        assert_eq!(c.state().index, 0);
    }
}
