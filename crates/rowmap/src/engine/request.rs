use super::Cx;
use crate::{
    accessor::{Getter, Setter},
    result_map::{GroupKey, PropertyMapping, ResultMap, Source, Target},
    sink::{Collected, Collector, Sink, SinkKind},
};

use indexmap::IndexMap;
use rowmap_core::{driver::RowRef, Bean, Error, Object, Result, Type, Value};

use std::{collections::HashMap, sync::Arc};

/// Index of an object in the request arena.
type ObjectId = usize;

/// State of one top-level mapping call.
#[derive(Default)]
pub(crate) struct Request {
    /// Objects created and not yet handed out.
    objects: Vec<Option<Box<dyn Bean>>>,

    /// Group key index per result map.
    groups: HashMap<usize, HashMap<GroupKey, ObjectId>>,

    /// Values waiting for a nested property, keyed by mapping and container.
    sinks: IndexMap<(usize, ObjectId), PendingSink>,

    /// Values produced by the top-level map.
    roots: Vec<Item>,

    subselects: Vec<PendingSubselect>,
}

/// Where a mapped value goes.
#[derive(Clone, Copy)]
pub(crate) enum Parent<'a> {
    Root,
    Property {
        container: ObjectId,
        owner: &'a ResultMap,
        mapping: &'a PropertyMapping,
        kind: SinkKind,
        getter: &'a Arc<dyn Getter>,
    },
}

enum Item {
    Object(ObjectId),
    Value(Value),
}

struct PendingSink {
    kind: SinkKind,
    target: String,
    ty: Type,
    getter: Arc<dyn Getter>,
    setter: Arc<dyn Setter>,
    items: Vec<Item>,
}

struct PendingSubselect {
    object: ObjectId,
    setter: Arc<dyn Setter>,
    statement: String,
    arg: Value,
}

impl Request {
    /// Maps one row with `map`, creating or reusing its target and running
    /// every nested map below it.
    pub(crate) fn map_row(&mut self, map: &ResultMap, row: RowRef<'_>, parent: Parent<'_>) -> Result<()> {
        match map.target() {
            Target::Scalar { handler, column } => {
                let value = column.read(handler.as_ref(), &row)?;

                // A null nested scalar is a missing element.
                if value.is_null() && !matches!(parent, Parent::Root) {
                    return Ok(());
                }

                self.emit(parent, Item::Value(value))
            }
            Target::Bean(_) => self.map_bean(map, row, parent),
        }
    }

    fn map_bean(&mut self, map: &ResultMap, row: RowRef<'_>, parent: Parent<'_>) -> Result<()> {
        let key = map.group_key(&row)?;

        if !matches!(parent, Parent::Root) && key.as_ref().is_some_and(GroupKey::is_null) {
            return Ok(());
        }

        let existing = key
            .as_ref()
            .and_then(|key| self.groups.get(&map.key())?.get(key))
            .copied();

        let (id, created) = match existing {
            Some(id) => (id, false),
            None => {
                let id = self.create(map, &row)?;

                if let Some(key) = key {
                    self.groups.entry(map.key()).or_default().insert(key, id);
                }

                self.emit(parent, Item::Object(id))?;
                (id, true)
            }
        };

        for mapping in map.mappings() {
            let Source::Nested {
                map: nested,
                kind,
                getter,
            } = mapping.source()
            else {
                continue;
            };

            // An ungrouped one-to-one child repeats on every row of its
            // parent; only the first row populates it.
            if !created && *kind == SinkKind::Single && !nested.has_group_by() {
                continue;
            }

            self.map_row(
                nested,
                row,
                Parent::Property {
                    container: id,
                    owner: map,
                    mapping,
                    kind: *kind,
                    getter,
                },
            )?;
        }

        Ok(())
    }

    /// Instantiates the target of `map`, applies its column mappings and
    /// queues its subselects.
    fn create(&mut self, map: &ResultMap, row: &RowRef<'_>) -> Result<ObjectId> {
        let mut bean = map.instantiate()?;
        let id = self.objects.len();
        let auto = map.auto_mappings(row.columns())?;

        for mapping in map.mappings().iter().chain(auto.iter()) {
            match mapping.source() {
                Source::Column { column, handler } => {
                    let mut value = column.read(handler.as_ref(), row)?;

                    if value.is_null() {
                        value = mapping.ty().zero_value().unwrap_or_default();
                    }

                    mapping.setter().set(bean.as_reflect_mut(), value)?;
                }
                Source::Subselect { column, statement } => {
                    let arg = column.raw(row)?.clone();

                    if !arg.is_null() {
                        self.subselects.push(PendingSubselect {
                            object: id,
                            setter: mapping.setter().clone(),
                            statement: statement.clone(),
                            arg,
                        });
                    }
                }
                Source::Nested { .. } => {}
            }
        }

        self.objects.push(Some(bean));
        Ok(id)
    }

    fn emit(&mut self, parent: Parent<'_>, item: Item) -> Result<()> {
        let Parent::Property {
            container,
            owner,
            mapping,
            kind,
            getter,
        } = parent
        else {
            self.roots.push(item);
            return Ok(());
        };

        let pending = self
            .sinks
            .entry((mapping.key(), container))
            .or_insert_with(|| PendingSink {
                kind,
                target: format!("{}.{}", owner.ty(), mapping.property()),
                ty: mapping.ty().clone(),
                getter: getter.clone(),
                setter: mapping.setter().clone(),
                items: vec![],
            });

        if pending.kind == SinkKind::Single && !pending.items.is_empty() {
            return Err(Error::multiple_results(&pending.target));
        }

        pending.items.push(item);
        Ok(())
    }

    /// Runs queued subselects, installs nested values into their containers
    /// and hands the top-level values to `sink`. Leaves the request empty.
    pub(crate) async fn flush(&mut self, cx: &mut Cx<'_>, sink: &mut dyn Sink) -> Result<()> {
        for pending in std::mem::take(&mut self.subselects) {
            let value = super::subselect(cx, &pending.statement, pending.arg).await?;
            let object = self.object_mut(pending.object)?;
            pending.setter.set(object.as_reflect_mut(), value)?;
        }

        self.finish_sinks()?;

        for item in std::mem::take(&mut self.roots) {
            let value = self.take(item)?;
            sink.push(value)?;
        }

        self.objects.clear();
        self.groups.clear();
        Ok(())
    }

    /// Children are always created after their container, so finishing
    /// containers from the newest down completes every child before it is
    /// moved into its parent.
    fn finish_sinks(&mut self) -> Result<()> {
        let mut sinks: Vec<_> = self.sinks.drain(..).collect();
        sinks.sort_by(|(a, _), (b, _)| b.1.cmp(&a.1));

        for ((_, container), pending) in sinks {
            let mut collector = Collector::new(pending.kind, &pending.ty, &pending.target);

            for item in pending.items {
                let value = self.take(item)?;
                collector.push(value)?;
            }

            let object = self.object_mut(container)?.as_reflect_mut();

            match collector.finish()? {
                Collected::Single(Some(value)) => pending.setter.set(object, value)?,
                Collected::Single(None) => {}
                Collected::List(items) => {
                    let mut list = match pending.getter.get(object)? {
                        Value::List(existing) => existing,
                        _ => vec![],
                    };
                    list.extend(items);
                    pending.setter.set(object, Value::List(list))?;
                }
                Collected::Array(items) => pending.setter.set(object, Value::List(items))?,
            }
        }

        Ok(())
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut Box<dyn Bean>> {
        self.objects
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::mapping(format!("object #{id}"), "already moved out of the request"))
    }

    fn take(&mut self, item: Item) -> Result<Value> {
        match item {
            Item::Value(value) => Ok(value),
            Item::Object(id) => self
                .objects
                .get_mut(id)
                .and_then(Option::take)
                .map(|bean| Value::Bean(Object::from_box(bean)))
                .ok_or_else(|| {
                    Error::mapping(format!("object #{id}"), "already moved out of the request")
                }),
        }
    }
}
