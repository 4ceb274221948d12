use pretty_assertions::assert_eq;
use tests::prelude::*;

const STRATEGIES: [AccessorStrategy; 2] = [AccessorStrategy::Reflective, AccessorStrategy::Compiled];

#[derive(Debug, Default, Clone, PartialEq, rowmap::Bean)]
struct Page<T> {
    total: i64,
    items: Vec<T>,
}

#[derive(Debug, Default, Clone, PartialEq, rowmap::Bean)]
struct Audit {
    created_by: String,
}

#[derive(Debug, Default, Clone, PartialEq, rowmap::Bean)]
#[bean(name = "Entry")]
struct AuditedEntry {
    #[bean(rename = "headline")]
    title: String,

    #[bean(flatten)]
    audit: Audit,

    #[bean(readonly)]
    version: i32,

    #[bean(skip)]
    dirty: bool,
}

fn page() -> Page<Post> {
    Page {
        total: 2,
        items: vec![
            Post {
                id: 1,
                title: "one".to_string(),
                author: Some(author(1, "ana")),
                ..Post::default()
            },
            Post {
                id: 2,
                title: "two".to_string(),
                ..Post::default()
            },
        ],
    }
}

#[test]
fn generic_descriptors_use_type_variables() {
    let descriptor = Page::<Value>::describe();

    assert_eq!(descriptor.name, "Page");
    assert_eq!(descriptor.params, vec!["T"]);
    assert_eq!(descriptor.properties[1].ty, Type::list(Type::Var("T")));

    // Every instantiation shares the descriptor.
    assert!(std::ptr::eq(descriptor, Page::<Post>::describe()));
    assert_eq!(Page::<Post>::ty().to_string(), "Page<Post>");
}

#[test]
fn attributes_shape_the_descriptor() {
    let descriptor = AuditedEntry::describe();

    assert_eq!(descriptor.name, "Entry");

    let names = descriptor
        .properties
        .iter()
        .map(|property| (property.name, property.flatten, property.writable))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            ("headline", false, true),
            ("audit", true, true),
            ("version", false, false),
        ]
    );
}

#[test]
fn strategies_agree_through_generic_containers() {
    let page = page();

    for strategy in STRATEGIES {
        let accessors = Accessors::new(strategy);

        let title = accessors
            .getter_of::<Page<Post>>("items[1].title")
            .unwrap();
        assert_eq!(title.ty(), &Type::String);
        assert_eq!(title.get(&page).unwrap(), Value::from("two"));

        let name = accessors
            .getter_of::<Page<Post>>("items[0].author.name")
            .unwrap();
        assert_eq!(name.get(&page).unwrap(), Value::from("ana"));

        let err = accessors
            .getter_of::<Page<Post>>("items[1].author.name")
            .unwrap()
            .get(&page)
            .unwrap_err();
        assert!(err.is_null_navigation(), "{strategy:?}: {err}");

        let err = accessors
            .getter_of::<Page<Post>>("items[5].title")
            .unwrap()
            .get(&page)
            .unwrap_err();
        assert!(err.is_index_out_of_bounds(), "{strategy:?}: {err}");
    }
}

#[test]
fn setters_write_through_flattened_properties() {
    for strategy in STRATEGIES {
        let accessors = Accessors::new(strategy);
        let mut entry = AuditedEntry::default();

        accessors
            .setter_of::<AuditedEntry>("created_by")
            .unwrap()
            .set(&mut entry, Value::from("bo"))
            .unwrap();
        accessors
            .setter_of::<AuditedEntry>("headline")
            .unwrap()
            .set(&mut entry, Value::from("news"))
            .unwrap();

        assert_eq!(entry.audit.created_by, "bo");
        assert_eq!(entry.title, "news");
        assert!(!entry.dirty);

        let err = accessors
            .setter_of::<AuditedEntry>("version")
            .unwrap_err();
        assert!(err.is_introspection(), "{strategy:?}: {err}");

        let err = accessors.getter_of::<AuditedEntry>("dirty").unwrap_err();
        assert!(err.is_introspection(), "{strategy:?}: {err}");
    }
}

#[test]
fn setters_coerce_values() {
    for strategy in STRATEGIES {
        let mut page = page();

        Accessors::new(strategy)
            .setter_of::<Page<Post>>("total")
            .unwrap()
            .set(&mut page, Value::I32(7))
            .unwrap();
        assert_eq!(page.total, 7);

        let err = Accessors::new(strategy)
            .setter_of::<Page<Post>>("items[0].id")
            .unwrap()
            .set(&mut page, Value::from("seven"))
            .unwrap_err();
        assert!(err.is_type_conversion(), "{strategy:?}: {err}");
    }
}
