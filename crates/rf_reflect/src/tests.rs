//! End-to-end tests over a small object graph.

use alloc::collections::{BTreeMap, LinkedList};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::access::{Lookup, Reflector};
use crate::derive::{Reflect, member_path};
use crate::info::{BindingFlags, MemberKind, Type, Typed};
use crate::registry::{GetTypeMeta, TypeBuilder, TypeMeta, TypeRegistry};
use crate::{Obj, ReflectError, Value};

// -----------------------------------------------------------------------------
// Fixtures

#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Idle,
    Active = 4,
}

#[derive(Reflect, Clone, Debug, PartialEq)]
#[reflect(value)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug)]
struct Child {
    value: i32,
    status: Status,
    items: Obj<Vec<String>>,
    scores: Obj<BTreeMap<String, i32>>,
    position: Point,
    next: Option<Obj<Child>>,
}

impl Child {
    fn new(value: i32) -> Self {
        Self {
            value,
            status: Status::Idle,
            items: Obj::new(vec!["a".into(), "b".into(), "c".into()]),
            scores: Obj::new(BTreeMap::from([("alice".to_string(), 3)])),
            position: Point { x: 1, y: 2 },
            next: None,
        }
    }
}

impl Typed for Child {
    fn static_type() -> Type {
        Type::of::<Self>()
    }
}

impl GetTypeMeta for Child {
    fn get_type_meta() -> TypeMeta {
        TypeBuilder::<Self>::object()
            .field("Value", |c| c.value, |c, v| c.value = v)
            .field("Status", |c| c.status, |c, v| c.status = v)
            .field("Items", |c| c.items.clone(), |c, v| c.items = v)
            .field("Scores", |c| c.scores.clone(), |c, v| c.scores = v)
            .field("Position", |c| c.position.clone(), |c, v| c.position = v)
            .field("Next", |c| c.next.clone(), |c, v| c.next = v)
            .property_get("Double", |c| c.value * 2)
            .method("Describe", |c, (): ()| format!("value {}", c.value))
            .method("Describe", |c, (n,): (i32,)| format!("{n} x {}", c.value))
            .method_mut("Add", |c, (n,): (i32,)| {
                c.value += n;
                c.value
            })
            .try_method("Fail", |_, (): ()| Err::<i32, &str>("boom"))
            .constructor(|(): ()| Child::new(0))
            .constructor(|(value,): (i32,)| Child::new(value))
            .build()
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<Obj<Vec<String>>>();
        registry.register::<Obj<BTreeMap<String, i32>>>();
        registry.register::<Point>();
        registry.register::<Status>();
    }
}

#[derive(Reflect, Default)]
#[reflect(default)]
struct Root {
    #[reflect(rename = "Child")]
    child: Option<Obj<Child>>,
    #[reflect(rename = "Name")]
    name: String,
    #[reflect(rename = "Id", readonly)]
    id: u64,
    #[reflect(skip)]
    #[allow(dead_code, reason = "present to check that skipped fields are not reflected")]
    cache: Vec<u8>,
}

#[derive(Reflect, Default, Debug)]
struct Shared {
    #[reflect(rename = "Name")]
    name: String,
}

static SHARED: RwLock<Option<Obj<Shared>>> = RwLock::new(None);

struct Holder;

impl Typed for Holder {
    fn static_type() -> Type {
        Type::of::<Self>()
    }
}

impl GetTypeMeta for Holder {
    fn get_type_meta() -> TypeMeta {
        TypeBuilder::<Self>::object()
            .static_property(
                "Shared",
                || SHARED.read().unwrap().clone(),
                |v| *SHARED.write().unwrap() = v,
            )
            .build()
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<Shared>();
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register::<Root>();
    registry.register::<Holder>();
    registry
}

fn root() -> Obj<Root> {
    Obj::new(Root {
        child: Some(Obj::new(Child::new(1))),
        name: "root".into(),
        id: 9,
        cache: Vec::new(),
    })
}

fn child_of(root: &Obj<Root>) -> Obj<Child> {
    root.read().child.clone().unwrap()
}

// -----------------------------------------------------------------------------
// Reads and writes

#[test]
fn reads_match_direct_traversal() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let root = root();
    let value = Some(root.to_value());
    let instance = value.as_ref();

    assert_eq!(
        reflector.get::<String>(instance, None, "Child.Items[1]").unwrap(),
        Lookup::Value("b".to_string())
    );
    assert_eq!(
        reflector.get::<i32>(instance, None, "Child.Value").unwrap(),
        Lookup::Value(child_of(&root).read().value)
    );
    assert_eq!(
        reflector.get::<i32>(instance, None, "Child.Scores[alice]").unwrap(),
        Lookup::Value(3)
    );
    assert_eq!(reflector.get::<i32>(instance, None, "Child.Double").unwrap(), Lookup::Value(2));
    assert_eq!(reflector.get::<i32>(instance, None, "Child.Position.x").unwrap(), Lookup::Value(1));
    assert_eq!(reflector.get::<u64>(instance, None, "Id").unwrap(), Lookup::Value(9));

    let items = reflector.get::<Obj<Vec<String>>>(instance, None, "Child.Items").unwrap();
    let items = items.value().unwrap();
    assert!(Obj::ptr_eq(&items, &child_of(&root).read().items));
}

#[test]
fn writes_round_trip() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let root = root();
    let value = Some(root.to_value());
    let instance = value.as_ref();

    assert!(reflector.set(instance, None, "Child.Value", Some(Value::from(42))).unwrap());
    assert_eq!(reflector.get::<i32>(instance, None, "Child.Value").unwrap(), Lookup::Value(42));

    assert!(reflector.set(instance, None, "Child.Items[0]", Some(Value::from("z"))).unwrap());
    assert_eq!(child_of(&root).read().items.read()[0], "z");

    assert!(!reflector.set(instance, None, "Child.Items[5]", Some(Value::from("x"))).unwrap());
    assert!(!reflector.set(instance, None, "Child.Scores[bob]", Some(Value::from(1))).unwrap());
    assert!(child_of(&root).read().scores.read().get("bob").is_none());

    assert!(reflector.set(instance, None, "Name", Some(Value::from("renamed"))).unwrap());
    assert_eq!(root.read().name, "renamed");
}

#[test]
fn unresolved_paths() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let value = Some(root().to_value());
    let instance = value.as_ref();

    assert_eq!(reflector.get::<i32>(instance, None, "Child.Missing").unwrap(), Lookup::Unresolved);
    assert_eq!(reflector.get::<i32>(instance, None, "cache").unwrap(), Lookup::Unresolved);
    assert_eq!(reflector.get::<String>(instance, None, "Child.Items[9]").unwrap(), Lookup::Unresolved);
    assert_eq!(reflector.get::<String>(instance, None, "Child.Value").unwrap(), Lookup::Unresolved);
    assert_eq!(reflector.get::<i32>(instance, None, "Child..Value").unwrap(), Lookup::Unresolved);
    assert_eq!(reflector.get::<i32>(None, None, "Child.Value").unwrap(), Lookup::Unresolved);

    // Read-only members, plain value containers and getter-only properties.
    assert!(!reflector.set(instance, None, "Id", Some(Value::from(1_u64))).unwrap());
    assert!(!reflector.set(instance, None, "Child.Position.x", Some(Value::from(5))).unwrap());
    assert!(!reflector.set(instance, None, "Child.Double", Some(Value::from(5))).unwrap());
}

#[test]
fn null_intermediates_fail_quietly() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let root = Obj::new(Root::default());
    let value = Some(root.to_value());
    let instance = value.as_ref();

    assert_eq!(reflector.get::<Obj<Child>>(instance, None, "Child").unwrap(), Lookup::Null);
    assert_eq!(reflector.get::<i32>(instance, None, "Child.Value").unwrap(), Lookup::Unresolved);
    assert!(!reflector.set(instance, None, "Child.Value", Some(Value::from(1))).unwrap());
    assert_eq!(
        reflector
            .invoke::<String>(instance, None, "Child.Describe", Some(&[]), &[])
            .unwrap(),
        Lookup::Unresolved
    );
    assert!(reflector.get_info(instance, None, "Child.Items[0].Len", None).unwrap().is_empty());
}

#[test]
fn static_members_resolve_from_a_type() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let holder = Some(Type::of::<Holder>());

    *SHARED.write().unwrap() = None;
    assert_eq!(reflector.get::<String>(None, holder, "Shared.Name").unwrap(), Lookup::Unresolved);
    assert_eq!(reflector.get::<Obj<Shared>>(None, holder, "Shared").unwrap(), Lookup::Null);

    assert!(reflector.set(None, holder, "Shared", Some(Obj::new(Shared::default()).into_value())).unwrap());
    assert_eq!(
        reflector.get::<String>(None, holder, "Shared.Name").unwrap(),
        Lookup::Value(String::new())
    );
    assert!(reflector.set(None, holder, "Shared.Name", Some(Value::from("set"))).unwrap());
    assert_eq!(SHARED.read().unwrap().as_ref().map(|s| s.read().name.clone()).as_deref(), Some("set"));

    *SHARED.write().unwrap() = None;
}

#[test]
fn value_type_checks() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let value = Some(root().to_value());
    let instance = value.as_ref();

    let error = reflector.set(instance, None, "Child.Value", Some(Value::from("text"))).unwrap_err();
    assert!(matches!(error, ReflectError::ValueType { .. }));
    let error = reflector.set(instance, None, "Child.Value", None).unwrap_err();
    assert!(matches!(error, ReflectError::ValueType { actual: None, .. }));
    let error = reflector.set(instance, None, "Child.Items[0]", Some(Value::from(1))).unwrap_err();
    assert!(matches!(error, ReflectError::ValueType { .. }));

    assert!(reflector.set(instance, None, "Child.Next", None).unwrap());
}

#[test]
fn shared_members_reject_plain_values() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let root = root();
    let value = Some(root.to_value());
    let instance = value.as_ref();

    let plain = || Some(Value::new(vec!["q".to_string()]));
    let error = reflector.set(instance, None, "Child.Items", plain()).unwrap_err();
    assert!(matches!(error, ReflectError::ValueType { .. }));
    let error = reflector.set_coerced(instance, None, "Child.Items", plain()).unwrap_err();
    assert!(matches!(error, ReflectError::ValueType { .. }));
    assert_eq!(child_of(&root).read().items.read().len(), 3);

    let error = reflector
        .set(instance, None, "Child.Next", Some(Value::new(Child::new(5))))
        .unwrap_err();
    assert!(matches!(error, ReflectError::ValueType { .. }));

    let items = Obj::new(vec!["q".to_string()]);
    assert!(reflector.set(instance, None, "Child.Items", Some(items.to_value())).unwrap());
    assert_eq!(
        reflector.get::<String>(instance, None, "Child.Items[0]").unwrap(),
        Lookup::Value("q".to_string())
    );
}

// -----------------------------------------------------------------------------
// Coercion

#[test]
fn coerced_writes() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let root = root();
    let value = Some(root.to_value());
    let instance = value.as_ref();

    assert!(reflector.set_coerced(instance, None, "Child.Status", Some(Value::from("Active"))).unwrap());
    assert_eq!(child_of(&root).read().status, Status::Active);
    assert_eq!(
        reflector.get::<Status>(instance, None, "Child.Status").unwrap(),
        Lookup::Value(Status::Active)
    );
    assert!(reflector.set_coerced(instance, None, "Child.Status", Some(Value::from(0_u8))).unwrap());
    assert_eq!(child_of(&root).read().status, Status::Idle);

    assert!(reflector.set_coerced(instance, None, "Child.Value", Some(Value::from("17"))).unwrap());
    assert_eq!(child_of(&root).read().value, 17);
    assert!(reflector.set_coerced(instance, None, "Child.Scores[alice]", Some(Value::from(2_u8))).unwrap());
    assert_eq!(child_of(&root).read().scores.read()["alice"], 2);

    let point = Value::new(Point { x: 0, y: 0 });
    let error = reflector
        .set_coerced(instance, None, "Child.Status", Some(point))
        .unwrap_err();
    assert!(matches!(error, ReflectError::Conversion { .. }));
    let error = reflector
        .set_coerced(instance, None, "Child.Value", Some(Value::from("many")))
        .unwrap_err();
    assert!(matches!(error, ReflectError::Conversion { source: Some(_), .. }));
}

#[test]
fn coerced_null_writes() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let root = root();
    child_of(&root).write().next = Some(Obj::new(Child::new(2)));
    let value = Some(root.to_value());
    let instance = value.as_ref();

    assert!(reflector.set_coerced(instance, None, "Child.Next", None).unwrap());
    assert!(child_of(&root).read().next.is_none());
    let error = reflector.set_coerced(instance, None, "Child.Value", None).unwrap_err();
    assert!(matches!(error, ReflectError::ValueType { actual: None, .. }));
    assert_eq!(child_of(&root).read().value, 1);
}

// -----------------------------------------------------------------------------
// Indexers and element shapes

struct Grid {
    cells: Vec<i32>,
}

impl Typed for Grid {
    fn static_type() -> Type {
        Type::of::<Self>()
    }
}

impl GetTypeMeta for Grid {
    fn get_type_meta() -> TypeMeta {
        TypeBuilder::<Self>::object()
            .indexer(
                |g: &Grid, i: usize| g.cells.get(i).copied(),
                |g: &mut Grid, i: usize, v: i32| match g.cells.get_mut(i) {
                    Some(slot) => {
                        *slot = v;
                        true
                    }
                    None => false,
                },
            )
            .build()
    }
}

#[derive(Reflect)]
struct Roster {
    #[reflect(rename = "Names")]
    names: Obj<LinkedList<String>>,
    #[reflect(rename = "Slots")]
    slots: Obj<Vec<Option<Obj<Child>>>>,
    #[reflect(rename = "Ids")]
    ids: Obj<HashMap<u64, String>>,
}

fn roster() -> Obj<Roster> {
    Obj::new(Roster {
        names: Obj::new(LinkedList::from(["ann".to_string(), "bo".to_string()])),
        slots: Obj::new(vec![Some(Obj::new(Child::new(3))), None]),
        ids: Obj::new(HashMap::from([(u64::MAX, "max".to_string()), (7, "seven".to_string())])),
    })
}

#[test]
fn indexer_at_the_root() {
    let mut registry = TypeRegistry::new();
    registry.register::<Grid>();
    let reflector = Reflector::new(&registry);
    let grid = Obj::new(Grid { cells: vec![1, 2, 3] });
    let value = Some(grid.to_value());
    let instance = value.as_ref();

    assert_eq!(reflector.get::<i32>(instance, None, "[1]").unwrap(), Lookup::Value(2));
    assert_eq!(reflector.get::<i32>(instance, None, "[7]").unwrap(), Lookup::Unresolved);
    assert_eq!(reflector.get::<i32>(instance, None, "[x]").unwrap(), Lookup::Unresolved);

    assert!(reflector.set(instance, None, "[1]", Some(Value::from(20))).unwrap());
    assert!(!reflector.set(instance, None, "[7]", Some(Value::from(1))).unwrap());
    let error = reflector.set(instance, None, "[0]", Some(Value::from("x"))).unwrap_err();
    assert!(matches!(error, ReflectError::ValueType { .. }));
    assert!(reflector.set_coerced(instance, None, "[0]", Some(Value::from("5"))).unwrap());
    assert_eq!(grid.read().cells, [5, 20, 3]);
}

#[test]
fn sequence_elements() {
    let mut registry = TypeRegistry::new();
    registry.register::<Roster>();
    let reflector = Reflector::new(&registry);
    let roster = roster();
    let value = Some(roster.to_value());
    let instance = value.as_ref();

    assert_eq!(
        reflector.get::<String>(instance, None, "Names[1]").unwrap(),
        Lookup::Value("bo".to_string())
    );
    assert_eq!(reflector.get::<String>(instance, None, "Names[2]").unwrap(), Lookup::Unresolved);
    assert!(reflector.set(instance, None, "Names[0]", Some(Value::from("al"))).unwrap());
    assert!(!reflector.set(instance, None, "Names[5]", Some(Value::from("x"))).unwrap());
    assert_eq!(roster.read().names.read().front().map(String::as_str), Some("al"));
}

#[test]
fn null_elements_end_the_path() {
    let mut registry = TypeRegistry::new();
    registry.register::<Roster>();
    let reflector = Reflector::new(&registry);
    let roster = roster();
    let value = Some(roster.to_value());
    let instance = value.as_ref();

    assert_eq!(reflector.get::<i32>(instance, None, "Slots[0].Value").unwrap(), Lookup::Value(3));
    assert_eq!(reflector.get::<Obj<Child>>(instance, None, "Slots[1]").unwrap(), Lookup::Null);
    assert_eq!(reflector.get::<i32>(instance, None, "Slots[1].Value").unwrap(), Lookup::Unresolved);
    assert!(!reflector.set(instance, None, "Slots[1].Value", Some(Value::from(1))).unwrap());

    let error = reflector
        .set(instance, None, "Slots[1]", Some(Value::new(Child::new(8))))
        .unwrap_err();
    assert!(matches!(error, ReflectError::ValueType { .. }));
    let child = Obj::new(Child::new(8));
    assert!(reflector.set(instance, None, "Slots[1]", Some(child.to_value())).unwrap());
    assert_eq!(reflector.get::<i32>(instance, None, "Slots[1].Value").unwrap(), Lookup::Value(8));
}

#[test]
fn wide_integer_map_keys() {
    let mut registry = TypeRegistry::new();
    registry.register::<Roster>();
    let reflector = Reflector::new(&registry);
    let roster = roster();
    let value = Some(roster.to_value());
    let instance = value.as_ref();

    let max = "Ids[18446744073709551615]";
    assert_eq!(
        reflector.get::<String>(instance, None, max).unwrap(),
        Lookup::Value("max".to_string())
    );
    assert_eq!(
        reflector.get::<String>(instance, None, "Ids[07]").unwrap(),
        Lookup::Value("seven".to_string())
    );
    assert!(reflector.set(instance, None, max, Some(Value::from("top"))).unwrap());
    assert_eq!(roster.read().ids.read()[&u64::MAX], "top");
}

// -----------------------------------------------------------------------------
// Introspection and calls

#[test]
fn overloads_in_get_info() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let value = Some(root().to_value());
    let instance = value.as_ref();

    let all = reflector.get_info(instance, None, "Child.Describe", None).unwrap();
    assert_eq!(all.members.len(), 2);
    assert_eq!(all.container_type, Some(Type::of::<Child>()));
    assert!(all.container.is_some());

    let one = reflector
        .get_info(instance, None, "Child.Describe", Some(&[Type::of::<i32>()]))
        .unwrap();
    assert_eq!(one.members.len(), 1);
    assert_eq!(one.members[0].parameters().len(), 1);

    let none = reflector
        .get_info(instance, None, "Child.Describe", Some(&[Type::of::<u8>()]))
        .unwrap();
    assert!(none.is_empty());

    let ctors = reflector.get_info(None, Some(Type::of::<Child>()), "ctor", None).unwrap();
    assert_eq!(ctors.members.len(), 2);
    assert!(ctors.members.iter().all(|m| m.kind() == MemberKind::Constructor));
}

#[test]
fn invoking_methods() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let root = root();
    let value = Some(root.to_value());
    let instance = value.as_ref();

    let described = reflector
        .invoke::<String>(instance, None, "Child.Describe", Some(&[]), &[])
        .unwrap();
    assert_eq!(described, Lookup::Value("value 1".to_string()));

    // Without parameter types the last overload is chosen.
    let described = reflector
        .invoke::<String>(instance, None, "Child.Describe", None, &[Some(Value::from(3))])
        .unwrap();
    assert_eq!(described, Lookup::Value("3 x 1".to_string()));

    let sum = reflector
        .invoke::<i32>(instance, None, "Child.Add", None, &[Some(Value::from(4))])
        .unwrap();
    assert_eq!(sum, Lookup::Value(5));
    assert_eq!(child_of(&root).read().value, 5);

    let error = reflector
        .invoke::<i32>(instance, None, "Child.Add", None, &[])
        .unwrap_err();
    assert!(matches!(error, ReflectError::ArgumentCount { expected: 1, actual: 0, .. }));
    let error = reflector
        .invoke::<i32>(instance, None, "Child.Add", None, &[Some(Value::from("x"))])
        .unwrap_err();
    assert!(matches!(error, ReflectError::ArgumentType { index: 0, .. }));

    match reflector.invoke::<i32>(instance, None, "Child.Fail", None, &[]) {
        Err(ReflectError::Target { member, source, .. }) => {
            assert_eq!(member, "Fail");
            assert_eq!(source.to_string(), "boom");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert_eq!(
        reflector.invoke::<i32>(instance, None, "Child.Missing", None, &[]).unwrap(),
        Lookup::Unresolved
    );
    assert_eq!(
        reflector.invoke::<i32>(instance, None, "Child.Items[0]", None, &[]).unwrap(),
        Lookup::Unresolved
    );
}

#[test]
fn constructors_create_instances() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let root = root();
    let value = Some(root.to_value());
    let instance = value.as_ref();

    let created = reflector
        .invoke::<Obj<Child>>(
            instance,
            None,
            "Child.ctor",
            Some(&[Type::of::<i32>()]),
            &[Some(Value::from(7))],
        )
        .unwrap()
        .value()
        .unwrap();
    assert_eq!(created.read().value, 7);
    assert!(!Obj::ptr_eq(&created, &child_of(&root)));

    // A constructed value that is not a `String` does not satisfy the request.
    let mismatched = reflector
        .invoke::<String>(instance, None, "Child.CTOR", Some(&[]), &[])
        .unwrap();
    assert_eq!(mismatched, Lookup::Unresolved);

    let fresh = reflector
        .invoke::<Obj<Root>>(None, Some(Type::of::<Root>()), "ctor", None, &[])
        .unwrap()
        .value()
        .unwrap();
    assert!(fresh.read().child.is_none());
}

#[test]
fn members_info_accessors() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let root = root();
    let value = Some(root.to_value());
    let instance = value.as_ref();

    let info = reflector.get_info(instance, None, "Child.Value", None).unwrap();
    assert_eq!(info.get::<i32>().unwrap(), Lookup::Value(1));
    assert!(info.set(Some(Value::from(8))).unwrap());
    assert_eq!(child_of(&root).read().value, 8);
    assert_eq!(info.invoke::<i32>(&[]).unwrap(), Lookup::Unresolved);

    let add = reflector
        .get_info(instance, None, "Child.Add", Some(&[Type::of::<i32>()]))
        .unwrap();
    assert_eq!(add.invoke::<i32>(&[Some(Value::from(2))]).unwrap(), Lookup::Value(10));
    assert_eq!(add.get::<i32>().unwrap(), Lookup::Unresolved);
    assert!(!add.set(Some(Value::from(1))).unwrap());

    let holder = reflector
        .get_info(None, Some(Type::of::<Holder>()), "Shared", None)
        .unwrap();
    assert!(holder.container.is_none());
    assert!(holder.first().is_some_and(|m| m.is_static()));
}

#[test]
fn binding_rules() {
    let registry = registry();
    let value = Some(root().to_value());
    let instance = value.as_ref();

    let strict = Reflector::new(&registry);
    assert_eq!(strict.get::<i32>(instance, None, "child.value").unwrap(), Lookup::Unresolved);

    let relaxed = strict.with_binding(BindingFlags::DEFAULT | BindingFlags::IGNORE_CASE);
    assert_eq!(relaxed.get::<i32>(instance, None, "child.value").unwrap(), Lookup::Value(1));

    let statics = strict.with_binding(BindingFlags::STATIC | BindingFlags::PUBLIC);
    assert_eq!(statics.get::<i32>(instance, None, "Child.Value").unwrap(), Lookup::Unresolved);
}

#[test]
fn type_lookup_by_simple_name() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    assert_eq!(reflector.get_types("Child"), [Type::of::<Child>()]);
    assert!(reflector.get_types("Vec").contains(&Type::of::<Vec<String>>()));
    assert!(reflector.get_types("Nothing").is_empty());
}

// -----------------------------------------------------------------------------
// Compiled accessors

#[test]
fn compiled_accessors_over_the_graph() {
    let registry = registry();
    let reflector = Reflector::new(&registry);
    let root = root();

    let value = reflector.create_getter::<Obj<Root>, i32>("Child.Value", None).unwrap();
    let status = reflector.create_getter::<Obj<Root>, String>("Child.Status", None).unwrap();
    let set_status = reflector.create_setter::<Obj<Root>, String>("Child.Status", None).unwrap();

    assert_eq!(value.get(&root).unwrap(), 1);
    assert_eq!(status.get(&root).unwrap(), "Idle");
    set_status.set(&root, "active".to_string()).unwrap();
    assert_eq!(child_of(&root).read().status, Status::Active);
    assert_eq!(status.get(&root).unwrap(), "Active");

    let empty = Obj::new(Root::default());
    assert!(matches!(value.get(&empty), Err(ReflectError::NullReference { .. })));

    assert!(reflector.create_getter::<Obj<Root>, String>("Child.Items[0]", None).is_none());
    assert!(reflector.create_setter::<Obj<Root>, u64>("Id", None).is_none());
}

// -----------------------------------------------------------------------------
// Macros

#[test]
fn member_paths_from_closures() {
    assert_eq!(member_path!(|x| x.Child.Items[1]), "Child.Items[1]");
    assert_eq!(member_path!(|x: &Root| x.Child.Describe()), "Child.Describe");
    assert_eq!(member_path!(|x| x.Child.Scores["alice"]), "Child.Scores[alice]");
    assert_eq!(member_path!(|x| x.grid[1][-2]), "grid[1].[-2]");
    assert_eq!(member_path!(|x| &x.Name), "Name");

    let registry = registry();
    let reflector = Reflector::new(&registry);
    let value = Some(root().to_value());
    let found = reflector
        .get::<String>(value.as_ref(), None, member_path!(|x| x.Child.Items[2]))
        .unwrap();
    assert_eq!(found, Lookup::Value("c".to_string()));
}

#[test]
fn derived_metadata() {
    let root = Root::get_type_meta();
    let names: Vec<_> = root.members().iter().map(|m| m.name()).collect();
    assert_eq!(names, ["Child", "Name", "Id", ".ctor"]);
    assert!(root.members()[0].is_nullable());
    assert!(!root.members()[2].can_write());

    let point = Point::get_type_meta();
    assert_eq!(point.storage(), crate::registry::TypeStorage::Value);

    let status = Status::get_type_meta();
    let variants = status
        .get_trait::<crate::registry::TypeTraitEnum>()
        .unwrap()
        .variants();
    assert_eq!(variants[1].name(), "Active");
    assert_eq!(variants[1].discriminant(), 4);
}

#[cfg(feature = "auto_register")]
mod auto_registration {
    use core::any::TypeId;

    use super::*;

    #[derive(Reflect)]
    #[reflect(auto_register)]
    struct Registered {
        level: u8,
    }

    #[test]
    fn collects_annotated_types() {
        let mut registry = TypeRegistry::empty();
        if registry.auto_register() {
            assert!(registry.contains(TypeId::of::<Registered>()));
            assert!(registry.contains(TypeId::of::<u8>()));
            assert!(registry.auto_register());
        }
    }
}
