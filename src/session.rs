/// Cooperative, single-threaded driver that wires a clock, an input source,
/// a renderer and an RNG around the pure round functions.
///
/// One `step` is one tick: drain input, apply it, advance the simulation,
/// then hand the renderer a read-only frame.  Rendering always happens
/// strictly after the update, never interleaved with it.

use rand::Rng;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::compute::{apply_input, start_round, tick, Control};
use crate::entities::{Frame, RoundState};
use crate::input::{EventQueue, InputSource};

/// Presentation surface.  How (or whether) a frame is drawn is up to the
/// implementation; failures are reported back but never stop the round.
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>) -> std::io::Result<()>;
}

/// Why `Session::run` returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    GameOver,
}

pub struct Session<C, I, R, G> {
    state: RoundState,
    clock: C,
    input: I,
    renderer: R,
    rng: G,
    queue: EventQueue,
    render_failures: u64,
}

impl<C, I, R, G> Session<C, I, R, G>
where
    C: Clock,
    I: InputSource,
    R: Renderer,
    G: Rng,
{
    pub fn new(state: RoundState, clock: C, input: I, renderer: R, rng: G) -> Self {
        Self {
            state,
            clock,
            input,
            renderer,
            rng,
            queue: EventQueue::default(),
            render_failures: 0,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn render_failures(&self) -> u64 {
        self.render_failures
    }

    /// Leave the menu; the round clock starts now.
    pub fn start(&mut self) {
        self.state = start_round(&self.state, self.clock.now_ms());
    }

    /// Run one tick.
    pub fn step(&mut self) -> Control {
        let now = self.clock.now_ms();
        self.input.poll(&mut self.queue);

        let mut control = Control::Continue;
        for event in self.queue.drain() {
            let (next, ctl) = apply_input(&self.state, event, now);
            self.state = next;
            if ctl == Control::Quit {
                control = Control::Quit;
                break;
            }
        }
        // Anything queued behind a quit is discarded.
        self.queue.drain().for_each(drop);

        if control == Control::Continue {
            self.state = tick(&self.state, now, &mut self.rng);
        }

        if let Err(e) = self.renderer.render(&self.state.frame()) {
            self.render_failures += 1;
            warn!("render failed: {e}");
        }
        control
    }

    /// Tick until the round ends or the player quits.  `pace` is called after
    /// every tick and is where a real loop waits for the next frame.
    pub fn run(&mut self, mut pace: impl FnMut()) -> Outcome {
        loop {
            if self.step() == Control::Quit {
                info!(score = self.state.player.score, "quit requested");
                return Outcome::Quit;
            }
            if self.state.is_over() {
                return Outcome::GameOver;
            }
            pace();
        }
    }
}
