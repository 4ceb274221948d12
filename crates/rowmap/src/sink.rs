//! Destinations for mapped values.

use rowmap_core::{Error, Result, Type, Value};

use std::fmt;

/// Receives the values produced by a mapping.
///
/// `push` is called once per mapped object in the order objects are first
/// seen; `commit` is called once after the last push.
pub trait Sink: Send {
    fn push(&mut self, value: Value) -> Result<()>;

    fn commit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// How values reach the property or slot a result map populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// At most one value.
    Single,

    /// Appended to a growable list.
    List,

    /// Buffered and installed as a fixed-size array on commit.
    Array,
}

impl SinkKind {
    /// The kind matching a property or return type.
    pub fn of(ty: &Type) -> SinkKind {
        match ty.strip_option() {
            Type::List(_) => SinkKind::List,
            Type::Array(_) => SinkKind::Array,
            _ => SinkKind::Single,
        }
    }
}

/// Accepts exactly one value.
#[derive(Debug)]
pub struct SingleSink {
    target: String,
    value: Option<Value>,
}

impl SingleSink {
    /// `target` names the receiving property or statement in errors.
    pub fn new(target: impl fmt::Display) -> SingleSink {
        SingleSink {
            target: target.to_string(),
            value: None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.value
    }
}

impl Sink for SingleSink {
    fn push(&mut self, value: Value) -> Result<()> {
        if self.value.is_some() {
            return Err(Error::multiple_results(&self.target));
        }

        self.value = Some(value);
        Ok(())
    }
}

/// Collects values in push order.
#[derive(Debug, Default)]
pub struct ListSink {
    items: Vec<Value>,
}

impl ListSink {
    pub fn new() -> ListSink {
        ListSink::default()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl Sink for ListSink {
    fn push(&mut self, value: Value) -> Result<()> {
        self.items.push(value);
        Ok(())
    }
}

/// Buffers values and builds a fixed-size array of the component type on
/// commit. Nothing is visible before that.
#[derive(Debug)]
pub struct ArraySink {
    component: Type,
    buffer: Vec<Value>,
    array: Option<Box<[Value]>>,
}

impl ArraySink {
    pub fn new(component: Type) -> ArraySink {
        ArraySink {
            component,
            buffer: vec![],
            array: None,
        }
    }

    /// The committed array; `None` before `commit`.
    pub fn array(&self) -> Option<&[Value]> {
        self.array.as_deref()
    }

    pub fn into_array(self) -> Option<Box<[Value]>> {
        self.array
    }
}

impl Sink for ArraySink {
    fn push(&mut self, value: Value) -> Result<()> {
        self.buffer.push(value);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let array = std::mem::take(&mut self.buffer)
            .into_iter()
            .map(|value| value.cast(&self.component))
            .collect::<Result<Box<[_]>>>()?;

        self.array = Some(array);
        Ok(())
    }
}

/// A sink calling `f` for every value.
pub fn from_fn<F>(f: F) -> FnSink<F>
where
    F: FnMut(Value) -> Result<()> + Send,
{
    FnSink(f)
}

pub struct FnSink<F>(F);

impl<F> Sink for FnSink<F>
where
    F: FnMut(Value) -> Result<()> + Send,
{
    fn push(&mut self, value: Value) -> Result<()> {
        (self.0)(value)
    }
}

impl<F> fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSink")
    }
}

/// A built-in sink collecting values for one property of one object.
#[derive(Debug)]
pub(crate) enum Collector {
    Single(SingleSink),
    List(ListSink),
    Array(ArraySink),
}

impl Collector {
    /// `ty` is the declared type of the receiving property.
    pub(crate) fn new(kind: SinkKind, ty: &Type, target: impl fmt::Display) -> Collector {
        match kind {
            SinkKind::Single => Collector::Single(SingleSink::new(target)),
            SinkKind::List => Collector::List(ListSink::new()),
            SinkKind::Array => Collector::Array(ArraySink::new(
                ty.strip_option().element().cloned().unwrap_or(Type::Any),
            )),
        }
    }

    pub(crate) fn push(&mut self, value: Value) -> Result<()> {
        match self {
            Collector::Single(sink) => sink.push(value),
            Collector::List(sink) => sink.push(value),
            Collector::Array(sink) => sink.push(value),
        }
    }

    /// Commits and returns what was collected: the single value, the list
    /// items, or the array.
    pub(crate) fn finish(self) -> Result<Collected> {
        Ok(match self {
            Collector::Single(sink) => Collected::Single(sink.into_value()),
            Collector::List(sink) => Collected::List(sink.into_items()),
            Collector::Array(mut sink) => {
                sink.commit()?;
                Collected::Array(sink.into_array().map(Vec::from).unwrap_or_default())
            }
        })
    }
}

#[derive(Debug)]
pub(crate) enum Collected {
    Single(Option<Value>),
    List(Vec<Value>),
    Array(Vec<Value>),
}
