use std::collections::VecDeque;
use std::time::Duration;

use crate::clock::Instant;
use crate::output::{Line, Tone};

/// Where a render step lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Header,
    Log,
}

/// One unit of queued playback. Line playback is a run of `AppendLine` steps,
/// character playback is a single `TypeChars` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Show a whole line at once, then wait `delay`.
    AppendLine {
        target: Target,
        line: Line,
        delay: Duration,
    },
    /// Open a new line and reveal `text` one character at a time, waiting `delay`
    /// after each character.
    TypeChars {
        target: Target,
        text: String,
        tone: Tone,
        delay: Duration,
    },
    Pause(Duration),
    /// Hand a command line back to the dispatcher once every earlier step ran.
    Dispatch(String),
}

/// What the owner of the screen has to do as a result of a [Animator::tick].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    Append { target: Target, line: Line },
    Open { target: Target },
    Reveal { target: Target, ch: char, tone: Tone },
    Dispatch(String),
}

#[derive(Debug)]
struct Typing {
    target: Target,
    tone: Tone,
    delay: Duration,
    chars: std::vec::IntoIter<char>,
}

/// Single consumer of the render queue. Deadlines chain off the previous deadline,
/// not the tick time, so a late tick catches up.
#[derive(Debug, Default)]
pub struct Animator {
    queue: VecDeque<Step>,
    typing: Option<Typing>,
    resume_at: Option<Instant>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, steps: impl IntoIterator<Item = Step>) {
        self.queue.extend(steps);
    }

    /// True once every queued step ran and its trailing delay elapsed.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.typing.is_none() && self.resume_at.is_none()
    }

    /// When the next tick has something to do. `None` while idle, or when queued
    /// work has not been started by a first tick yet.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.resume_at
    }

    /// Run every step that is due at `now`. Stops right after a `Dispatch` cue so
    /// that steps the dispatch enqueues line up behind the ones already queued.
    pub fn tick(&mut self, now: Instant) -> Vec<Cue> {
        let mut cues = Vec::new();
        loop {
            let base = match self.resume_at {
                Some(at) if now < at => break,
                Some(at) => at,
                None => now,
            };

            if let Some(typing) = &mut self.typing {
                match typing.chars.next() {
                    Some(ch) => {
                        cues.push(Cue::Reveal {
                            target: typing.target,
                            ch,
                            tone: typing.tone,
                        });
                        self.resume_at = Some(base + typing.delay);
                    }
                    None => self.typing = None,
                }
                continue;
            }

            let Some(step) = self.queue.pop_front() else {
                self.resume_at = None;
                break;
            };
            match step {
                Step::AppendLine {
                    target,
                    line,
                    delay,
                } => {
                    cues.push(Cue::Append { target, line });
                    self.resume_at = Some(base + delay);
                }
                Step::TypeChars {
                    target,
                    text,
                    tone,
                    delay,
                } => {
                    cues.push(Cue::Open { target });
                    self.typing = Some(Typing {
                        target,
                        tone,
                        delay,
                        chars: text.chars().collect::<Vec<_>>().into_iter(),
                    });
                    self.resume_at = Some(base);
                }
                Step::Pause(delay) => self.resume_at = Some(base + delay),
                Step::Dispatch(command) => {
                    cues.push(Cue::Dispatch(command));
                    self.resume_at = Some(base);
                    break;
                }
            }
        }
        cues
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use crate::animation::{Animator, Cue, Step, Target};
    use crate::clock::Instant;
    use crate::output::{Line, Tone};

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn revealed(cues: &[Cue]) -> String {
        cues.iter()
            .filter_map(|cue| match cue {
                Cue::Reveal { ch, .. } => Some(*ch),
                _ => None,
            })
            .collect()
    }

    fn typed(text: &str) -> Step {
        Step::TypeChars {
            target: Target::Log,
            text: text.to_string(),
            tone: Tone::Normal,
            delay: ms(30),
        }
    }

    #[test]
    fn new_animator_is_idle() {
        let animator = Animator::new();
        assert!(animator.is_idle());
        assert_eq!(animator.next_deadline(), None);
    }

    #[test]
    fn reveals_one_character_per_delay() {
        let start = Instant::now();
        let mut animator = Animator::new();
        animator.enqueue([typed("abc")]);

        let cues = animator.tick(start);
        assert_eq!(cues[0], Cue::Open { target: Target::Log });
        assert_eq!(revealed(&cues), "a");
        assert_eq!(animator.next_deadline(), Some(start + ms(30)));

        assert!(animator.tick(start + ms(29)).is_empty());
        assert_eq!(revealed(&animator.tick(start + ms(30))), "b");
        assert_eq!(revealed(&animator.tick(start + ms(60))), "c");
        assert!(!animator.is_idle());

        assert!(animator.tick(start + ms(90)).is_empty());
        assert!(animator.is_idle());
    }

    #[test]
    fn late_tick_catches_up() {
        let start = Instant::now();
        let mut animator = Animator::new();
        animator.enqueue([typed("hello")]);
        animator.tick(start);

        let cues = animator.tick(start + ms(95));
        assert_eq!(revealed(&cues), "ell");
        assert_eq!(animator.next_deadline(), Some(start + ms(120)));
    }

    #[test]
    fn line_playback_waits_after_each_line() {
        let start = Instant::now();
        let mut animator = Animator::new();
        animator.enqueue(["one", "two"].map(|text| Step::AppendLine {
            target: Target::Log,
            line: Line::plain(text),
            delay: ms(150),
        }));

        assert_eq!(
            animator.tick(start),
            vec![Cue::Append {
                target: Target::Log,
                line: Line::plain("one")
            }]
        );
        assert!(animator.tick(start + ms(100)).is_empty());
        assert_eq!(animator.tick(start + ms(150)).len(), 1);
        assert!(!animator.is_idle());
        animator.tick(start + ms(300));
        assert!(animator.is_idle());
    }

    #[test]
    fn steps_never_interleave() {
        let start = Instant::now();
        let mut animator = Animator::new();
        animator.enqueue([typed("ab"), Step::Pause(ms(500)), typed("cd")]);

        let mut cues = animator.tick(start);
        assert_eq!(revealed(&cues), "a");
        cues.extend(animator.tick(start + ms(10_000)));
        assert_eq!(revealed(&cues), "abcd");
        let opens = cues
            .iter()
            .filter(|cue| matches!(cue, Cue::Open { .. }))
            .count();
        assert_eq!(opens, 2);
        assert!(animator.is_idle());
    }

    #[test]
    fn zero_delays_finish_in_one_tick() {
        let start = Instant::now();
        let mut animator = Animator::new();
        animator.enqueue([Step::AppendLine {
            target: Target::Header,
            line: Line::blank(),
            delay: Duration::ZERO,
        }]);
        assert_eq!(animator.tick(start).len(), 1);
        assert!(animator.is_idle());
    }

    #[test]
    fn stops_after_dispatch() {
        let start = Instant::now();
        let mut animator = Animator::new();
        animator.enqueue([Step::Dispatch("today".to_string()), typed("x")]);

        assert_eq!(
            animator.tick(start),
            vec![Cue::Dispatch("today".to_string())]
        );
        assert_eq!(revealed(&animator.tick(start)), "x");
    }
}
