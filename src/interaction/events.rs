use std::collections::VecDeque;
use std::time::Duration;

use crate::error::FigureResult;
use crate::interaction::{Key, MouseEvent, MouseState};

/// Blocking input poll.
///
/// `wait` delivers pointer activity into `mouse` and returns the first key
/// pressed within `timeout`, or `None` when the timeout elapses.
pub trait EventSource {
    fn wait(&mut self, timeout: Duration, mouse: &mut MouseState) -> FigureResult<Option<Key>>;
}

/// One entry of a scripted input session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    Key(Key),
    Mouse(MouseEvent),
    /// A poll that times out without a key.
    Idle,
}

/// Deterministic `EventSource` replaying a fixed session.
///
/// Each `wait` applies queued mouse steps until it reaches a key or an idle
/// step. Once the script is exhausted every poll reports `Key::Close`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    steps: VecDeque<ScriptStep>,
    polls: usize,
}

impl ScriptedEvents {
    #[must_use]
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            polls: 0,
        }
    }

    #[must_use]
    pub fn keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self::new(keys.into_iter().map(ScriptStep::Key))
    }

    pub fn push(&mut self, step: ScriptStep) {
        self.steps.push_back(step);
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    /// Number of `wait` calls served so far.
    #[must_use]
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl EventSource for ScriptedEvents {
    fn wait(&mut self, _timeout: Duration, mouse: &mut MouseState) -> FigureResult<Option<Key>> {
        self.polls += 1;
        while let Some(step) = self.steps.pop_front() {
            match step {
                ScriptStep::Mouse(event) => mouse.on_event(event),
                ScriptStep::Key(key) => return Ok(Some(key)),
                ScriptStep::Idle => return Ok(None),
            }
        }
        Ok(Some(Key::Close))
    }
}

#[cfg(test)]
mod tests {
    use super::{EventSource, ScriptStep, ScriptedEvents};
    use crate::interaction::{Key, MouseEvent, MouseState};
    use std::time::Duration;

    #[test]
    fn mouse_steps_are_applied_before_the_key() {
        let mut events = ScriptedEvents::new([
            ScriptStep::Mouse(MouseEvent::moved(5, 6)),
            ScriptStep::Key(Key::Char('g')),
            ScriptStep::Idle,
        ]);
        let mut mouse = MouseState::new(10, 10);
        let timeout = Duration::from_millis(40);

        assert_eq!(events.wait(timeout, &mut mouse).expect("poll"), Some(Key::Char('g')));
        assert_eq!(mouse.move_position(), Some((5, 6)));
        assert_eq!(events.wait(timeout, &mut mouse).expect("poll"), None);
        assert_eq!(events.wait(timeout, &mut mouse).expect("poll"), Some(Key::Close));
        assert_eq!(events.polls(), 3);
    }
}
