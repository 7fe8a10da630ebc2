//! A complete countdown program: timer, progress track and key controls.
//!
//! Run with `cargo run --example countdown`.

use bubbletea_rs::{quit, Cmd, KeyMsg, Model, Msg, Program};
use countdown_widgets::key::TimerKeyMap;
use countdown_widgets::ring;
use countdown_widgets::timer::{self, CompleteMsg};

const TOTAL_SECS: u64 = 90;

struct Countdown {
    timer: timer::Model,
    ring: ring::Model,
    keys: TimerKeyMap,
    finished: bool,
}

impl Model for Countdown {
    fn init() -> (Self, Option<Cmd>) {
        let mut timer = timer::new(TOTAL_SECS)
            .expect("demo duration is positive")
            .with_auto_start(true);
        let cmd = timer.init();
        let ring = ring::new(&[ring::with_width(30)]);
        (
            Self {
                timer,
                ring,
                keys: TimerKeyMap::default(),
                finished: false,
            },
            cmd,
        )
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            if self.keys.quit.matches(key) {
                return Some(quit());
            }
            if self.keys.start.matches(key) {
                self.finished = false;
                return Some(self.timer.start());
            }
            if self.keys.toggle.matches(key) {
                return Some(self.timer.toggle());
            }
            if self.keys.reset.matches(key) {
                self.finished = false;
                return Some(self.timer.reset());
            }
            return None;
        }

        if let Some(done) = msg.downcast_ref::<CompleteMsg>() {
            if done.id == self.timer.id() {
                self.finished = true;
            }
        }

        let cmd = self.timer.update(msg);
        self.ring.set_percentage(self.timer.percentage());
        cmd
    }

    fn view(&self) -> String {
        let clock = if self.finished {
            "Time's up!".to_string()
        } else {
            self.timer.view()
        };
        format!(
            "\n  {}  {}\n\n  {}\n",
            self.ring.view(),
            clock,
            self.keys.help_line()
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let program = Program::<Countdown>::builder().build()?;
    program.run().await?;
    Ok(())
}
