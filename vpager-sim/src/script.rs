//! Swipe scripts.
//!
//! A script is a comma separated list of steps:
//!
//! | step    | meaning                                         |
//! |---------|-------------------------------------------------|
//! | `f`     | swipe forward one page                          |
//! | `b`     | swipe backward one page                         |
//! | `h`     | touch and release without moving                |
//! | `g<N>`  | jump to page N                                  |
//! | `a`     | append a page                                   |
//! | `d<N>`  | remove page N                                   |
//! | `r`     | release offscreen memory                        |
//! | `w<MS>` | wait MS milliseconds                            |

use anyhow::{Context, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Backward,
    Hold,
    Goto(usize),
    Append,
    Remove(usize),
    Release,
    Wait(u64),
}

impl Step {
    pub fn label(&self) -> String {
        match self {
            Step::Forward => "swipe forward".into(),
            Step::Backward => "swipe backward".into(),
            Step::Hold => "hold".into(),
            Step::Goto(n) => format!("goto {n}"),
            Step::Append => "append page".into(),
            Step::Remove(n) => format!("remove page {n}"),
            Step::Release => "release memory".into(),
            Step::Wait(ms) => format!("wait {ms}ms"),
        }
    }
}

pub fn parse(script: &str) -> anyhow::Result<Vec<Step>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_step)
        .collect()
}

fn parse_step(token: &str) -> anyhow::Result<Step> {
    let mut chars = token.chars();
    let Some(head) = chars.next() else {
        bail!("empty script step");
    };
    let step = match (head, chars.as_str()) {
        ('f', "") => Step::Forward,
        ('b', "") => Step::Backward,
        ('h', "") => Step::Hold,
        ('a', "") => Step::Append,
        ('r', "") => Step::Release,
        ('g', n) => Step::Goto(number(token, n)?),
        ('d', n) => Step::Remove(number(token, n)?),
        ('w', ms) => Step::Wait(number(token, ms)?),
        _ => bail!("unknown script step '{token}'"),
    };
    Ok(step)
}

fn number<T: std::str::FromStr>(token: &str, digits: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    digits
        .parse()
        .with_context(|| format!("step '{token}' needs a number"))
}

/// Host positions reported while dragging from `current` in `step`'s
/// direction, and the page the host settles on.
pub fn gesture(step: Step, current: usize, page_count: usize) -> (Vec<(usize, f32)>, usize) {
    let last = page_count.saturating_sub(1);
    match step {
        Step::Forward if current < last => (
            vec![(current, 0.25), (current, 0.5), (current, 0.75), (current + 1, 0.0)],
            current + 1,
        ),
        Step::Backward if current > 0 => (
            vec![
                (current - 1, 0.75),
                (current - 1, 0.5),
                (current - 1, 0.25),
                (current - 1, 0.0),
            ],
            current - 1,
        ),
        // Overscroll at either end springs back.
        Step::Forward | Step::Backward => (vec![(current, 0.1), (current, 0.0)], current),
        _ => (Vec::new(), current),
    }
}
