//! Cyclic selection over a completion candidate list.
//!
//! The cursor walks sentinel -> first -> ... -> last -> sentinel in either
//! direction. The sentinel stands for the text the user typed, so cycling all
//! the way round restores it. The navigator is not reentrant: callbacks must
//! not call back into it.

/// Direction of a selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn from_back(back: bool) -> Self {
        if back {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }
}

/// What the cursor points at after a step.
#[derive(Debug, PartialEq, Eq)]
pub enum Selection<'a, T> {
    /// Back on the sentinel: the original, unmodified input.
    Input(&'a str),
    Candidate(&'a T),
}

/// Called after every successful step.
pub type SelectFn<T> = Box<dyn FnMut(Selection<'_, T>)>;

struct Session<T> {
    candidates: Vec<T>,
    input: String,
    // None is the sentinel
    cursor: Option<usize>,
    direction: Direction,
    on_select: SelectFn<T>,
}

/// Completion navigator; inactive until `start` is called.
pub struct Navigator<T> {
    session: Option<Session<T>>,
}

impl<T> Default for Navigator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Navigator<T> {
    pub fn new() -> Self {
        Self { session: None }
    }

    /// Begin a completion session over `candidates` with the cursor on the
    /// sentinel. Any running session is dropped first.
    ///
    /// `direction` is the session's default, used by `step`.
    pub fn start(
        &mut self,
        candidates: Vec<T>,
        input: impl Into<String>,
        on_select: impl FnMut(Selection<'_, T>) + 'static,
        direction: Direction,
    ) {
        self.session = Some(Session {
            candidates,
            input: input.into(),
            cursor: None,
            direction,
            on_select: Box::new(on_select),
        });
    }

    /// Move the cursor one step, wrapping through the sentinel, and report
    /// the new selection to the callback.
    ///
    /// Returns false without doing anything when inactive or when there are
    /// no candidates.
    pub fn next(&mut self, direction: Direction) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let len = session.candidates.len();
        if len == 0 {
            return false;
        }

        session.cursor = match (direction, session.cursor) {
            (Direction::Forward, None) => Some(0),
            (Direction::Forward, Some(i)) if i + 1 < len => Some(i + 1),
            (Direction::Forward, Some(_)) => None,
            (Direction::Backward, None) => Some(len - 1),
            (Direction::Backward, Some(0)) => None,
            (Direction::Backward, Some(i)) => Some(i - 1),
        };

        let selection = match session.cursor {
            Some(i) => Selection::Candidate(&session.candidates[i]),
            None => Selection::Input(&session.input),
        };
        (session.on_select)(selection);
        true
    }

    /// `next` in the direction the session was started with.
    pub fn step(&mut self) -> bool {
        match self.session.as_ref() {
            Some(session) => {
                let direction = session.direction;
                self.next(direction)
            }
            None => false,
        }
    }

    /// End the session and release its candidates.
    pub fn stop(&mut self) {
        self.session = None;
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Cursor position; `None` while on the sentinel or inactive.
    pub fn cursor(&self) -> Option<usize> {
        self.session.as_ref().and_then(|s| s.cursor)
    }

    pub fn selected(&self) -> Option<&T> {
        let session = self.session.as_ref()?;
        session.candidates.get(session.cursor?)
    }

    /// The input the session was started with.
    pub fn input(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.input.as_str())
    }

    pub fn len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.candidates.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
