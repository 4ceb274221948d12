mod cursor;
pub use cursor::PathCursor;

use crate::{Error, Result};

use std::{fmt, sync::Arc};

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Named property, `article` in `article.subject`.
    Property(String),

    /// List or array index, `3` in `tags[3]` or `tags.3`.
    Index(usize),
}

impl Step {
    pub fn as_property(&self) -> Option<&str> {
        match self {
            Step::Property(name) => Some(name),
            Step::Index(_) => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Property(name) => f.write_str(name),
            Step::Index(index) => write!(f, "[{index}]"),
        }
    }
}

#[derive(Debug, Clone)]
struct Segment {
    step: Step,
    start: usize,
    end: usize,
}

/// A parsed property path such as `posts[0].author.name` or `2.title`.
///
/// Paths remember the text they were parsed from so that diagnostics can
/// quote the consumed prefix. A path obtained with [`PropertyPath::tail`]
/// keeps quoting the full text.
#[derive(Clone)]
pub struct PropertyPath {
    source: Arc<str>,
    segments: Vec<Segment>,

    /// End offset of the text consumed before the first segment.
    base: usize,
}

impl PropertyPath {
    pub fn parse(source: &str) -> Result<PropertyPath> {
        if source.is_empty() {
            return Err(Error::invalid_path(source, 0, "empty property path"));
        }

        let mut cursor = PathCursor::new(source);
        let mut segments = vec![];

        while cursor.has_next() {
            let start = cursor.position();
            let step = cursor.next_step()?;
            segments.push(Segment {
                step,
                start: cursor.step_start().unwrap_or(start),
                end: cursor.position(),
            });
        }

        Ok(PropertyPath {
            source: source.into(),
            segments,
            base: 0,
        })
    }

    /// The full text the path was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn steps(&self) -> impl ExactSizeIterator<Item = &Step> + '_ {
        self.segments.iter().map(|segment| &segment.step)
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.segments.get(index).map(|segment| &segment.step)
    }

    pub fn first(&self) -> Option<&Step> {
        self.step(0)
    }

    /// Source text up to and including step `count - 1`.
    pub fn prefix(&self, count: usize) -> &str {
        let end = match count {
            0 => self.base,
            n => self.segments[n.min(self.segments.len()) - 1].end,
        };
        &self.source[..end]
    }

    /// Byte offset where step `index` starts in the source text.
    pub fn offset(&self, index: usize) -> usize {
        self.segments
            .get(index)
            .map(|segment| segment.start)
            .unwrap_or(self.source.len())
    }

    /// The path without its first `skip` steps.
    pub fn tail(&self, skip: usize) -> PropertyPath {
        let skip = skip.min(self.segments.len());
        PropertyPath {
            source: self.source.clone(),
            base: self.prefix(skip).len(),
            segments: self.segments[skip..].to_vec(),
        }
    }
}

impl PartialEq for PropertyPath {
    fn eq(&self, other: &Self) -> bool {
        self.steps().eq(other.steps())
    }
}

impl Eq for PropertyPath {}

/// Canonical form: properties joined with `.`, indices in brackets except a
/// leading index, which is written as bare digits.
impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps().enumerate() {
            match step {
                Step::Property(name) if i == 0 => f.write_str(name)?,
                Step::Property(name) => write!(f, ".{name}")?,
                Step::Index(index) if i == 0 => write!(f, "{index}")?,
                Step::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyPath").field(&self.to_string()).finish()
    }
}
