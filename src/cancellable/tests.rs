use super::*;
use crate::classify::{CANCELLATION_TOKEN, TASKS_NAMESPACE, THREADING_NAMESPACE};
use crate::host::{
    Accessibility, ContainingType, Member, MethodSymbol, NamedTypeRef, ParameterSymbol,
    TypeDeclaration, TypeKind, TypeRef,
};
use expect_test::expect;

fn int() -> TypeRef {
    TypeRef::named(Some("System"), "Int32", Vec::new())
}

fn string() -> TypeRef {
    TypeRef::named(Some("System"), "String", Vec::new())
}

fn token_type() -> TypeRef {
    TypeRef::named(Some(THREADING_NAMESPACE), CANCELLATION_TOKEN, Vec::new())
}

fn task(arguments: Vec<TypeRef>) -> TypeRef {
    TypeRef::named(Some(TASKS_NAMESPACE), "Task", arguments)
}

fn value_task(arguments: Vec<TypeRef>) -> TypeRef {
    TypeRef::named(Some(TASKS_NAMESPACE), "ValueTask", arguments)
}

fn partial_class(name: &str, methods: Vec<MethodSymbol>) -> TypeDeclaration {
    let mut declaration = TypeDeclaration::new(Some("Demo"), name, TypeKind::Class);
    declaration.is_partial = true;
    declaration.accessibility = Accessibility::Public;
    declaration.members = methods.into_iter().map(Member::Method).collect();
    declaration
}

fn model_for(method: MethodSymbol) -> Option<CancellableMethodModel> {
    let declaration = partial_class("Foo", Vec::new());
    CancellableMethodModel::create(&declaration, &method, "TaskSynth", &CancellationToken::new())
        .expect("live token")
}

fn parameter_names(model: &CancellableMethodModel) -> Vec<&str> {
    model
        .parameters
        .iter()
        .map(|parameter| parameter.name.as_str())
        .collect()
}

#[test]
fn token_parameter_is_removed_and_order_kept() {
    let method = MethodSymbol::new("Load", Some(task(vec![int()])))
        .with_parameter("id", int())
        .with_parameter("ct", token_type())
        .with_parameter("name", string());
    let model = model_for(method).expect("qualifies");
    assert_eq!(parameter_names(&model), ["id", "name"]);
    assert_eq!(model.cancellation_parameter.name, "ct");
    assert_eq!(model.cancellation_parameter.ordinal, 1);
}

#[test]
fn return_type_names_follow_container_and_argument() {
    let plain = model_for(
        MethodSymbol::new("Run", Some(task(Vec::new()))).with_parameter("ct", token_type()),
    )
    .expect("plain task");
    assert_eq!(plain.return_type, "global::TaskSynth.CancellableTask");
    assert_eq!(plain.element_type, None);

    let valued = model_for(
        MethodSymbol::new("Count", Some(task(vec![int()]))).with_parameter("ct", token_type()),
    )
    .expect("valued task");
    assert_eq!(valued.return_type, "global::TaskSynth.CancellableTask<int>");
    assert_eq!(valued.element_type.as_deref(), Some("int"));

    let bar = TypeRef::named(Some("Demo.Models"), "Bar", Vec::new());
    let value = model_for(
        MethodSymbol::new("Fetch", Some(value_task(vec![bar]))).with_parameter("ct", token_type()),
    )
    .expect("value task");
    assert_eq!(
        value.return_type,
        "global::TaskSynth.CancellableValueTask<global::Demo.Models.Bar>"
    );
}

#[test]
fn token_count_boundary() {
    let none = MethodSymbol::new("Run", Some(task(Vec::new()))).with_parameter("id", int());
    assert!(model_for(none).is_none());

    let one = MethodSymbol::new("Run", Some(task(Vec::new()))).with_parameter("ct", token_type());
    assert!(model_for(one).is_some());

    let two = MethodSymbol::new("Run", Some(task(Vec::new())))
        .with_parameter("first", token_type())
        .with_parameter("id", int())
        .with_parameter("second", token_type());
    let model = model_for(two).expect("two tokens");
    assert_eq!(model.cancellation_parameter.name, "second");
    assert_eq!(parameter_names(&model), ["first", "id"]);
}

#[test]
fn non_matching_methods_are_excluded() {
    let void = MethodSymbol::new("Fire", None).with_parameter("ct", token_type());
    assert!(model_for(void).is_none());

    let no_parameters = MethodSymbol::new("Run", Some(task(Vec::new())));
    assert!(model_for(no_parameters).is_none());

    let mut explicit = MethodSymbol::new("Run", Some(task(Vec::new())))
        .with_parameter("ct", token_type());
    explicit.explicit_interface = Some("global::Demo.IRunner".into());
    assert!(model_for(explicit).is_none());

    let synchronous = MethodSymbol::new("Count", Some(int())).with_parameter("ct", token_type());
    assert!(model_for(synchronous).is_none());

    let two_arguments = MethodSymbol::new("Pair", Some(task(vec![int(), int()])))
        .with_parameter("ct", token_type());
    assert!(model_for(two_arguments).is_none());
}

#[test]
fn scanner_only_visits_partial_extensible_types() {
    let method = || {
        MethodSymbol::new("Run", Some(task(Vec::new()))).with_parameter("ct", token_type())
    };
    let sealed = {
        let mut declaration = partial_class("Sealed", vec![method()]);
        declaration.is_partial = false;
        declaration
    };
    let interface = {
        let mut declaration = partial_class("IRunner", vec![method()]);
        declaration.kind = TypeKind::Interface;
        declaration
    };
    let record = {
        let mut declaration = partial_class("Job", vec![method()]);
        declaration.kind = TypeKind::Record;
        declaration
    };
    let snapshot = Snapshot::new(vec![sealed, interface, record], Vec::new());
    let candidates = scan_candidates(&snapshot, &CancellationToken::new()).expect("scan");
    let names: Vec<&str> = candidates
        .iter()
        .map(|candidate| candidate.declaration.name.as_str())
        .collect();
    assert_eq!(names, ["Job"]);
}

#[test]
fn emits_overloads_grouped_per_type() {
    let mut count = ParameterSymbol::new("count", int(), 0);
    count.syntax = Some("int count = 3".into());
    let load = MethodSymbol::new("LoadAsync", Some(task(vec![string()])))
        .with_parameter("id", int())
        .with_parameter("ct", token_type());
    let mut repeat = MethodSymbol::new("RepeatAsync", Some(value_task(Vec::new())));
    repeat.parameters = vec![
        ParameterSymbol::new("cancellationToken", token_type(), 0),
        ParameterSymbol {
            ordinal: 1,
            ..count
        },
    ];
    repeat.is_static = true;
    repeat.accessibility = Accessibility::Internal;

    let snapshot = Snapshot::new(vec![partial_class("Repository", vec![load, repeat])], Vec::new());
    let fragments = CancellableGenerator::new("TaskSynth", 4)
        .generate(&snapshot, &CancellationToken::new())
        .expect("generate");
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].id, "Demo_Repository.Cancellable.g.cs");
    expect![[r#"
        // <auto-generated>
        //     Generated by tasksynth.cancellable.
        //     Changes to this file will be lost when the code is regenerated.
        // </auto-generated>
        #nullable enable

        namespace Demo;

        partial class Repository
        {
            public global::TaskSynth.CancellableTask<string> LoadAsync(int id)
            {
                var __cts = new global::System.Threading.CancellationTokenSource();
                var __ct = __cts.Token;
                var __task = LoadAsync(id: id, ct: __ct);
                var __result = new global::TaskSynth.CancellableTask<string>(__task, __cts);
                return __result;
            }

            internal static global::TaskSynth.CancellableValueTask RepeatAsync(int count = 3)
            {
                var __cts = new global::System.Threading.CancellationTokenSource();
                var __ct = __cts.Token;
                var __task = RepeatAsync(count: count, cancellationToken: __ct);
                var __result = new global::TaskSynth.CancellableValueTask(__task, __cts);
                return __result;
            }
        }
    "#]]
    .assert_eq(&fragments[0].source);
}

#[test]
fn generic_and_nested_types_are_reopened() {
    let mut method = MethodSymbol::new("MapAsync", Some(task(vec![TypeRef::type_parameter("TOut")])))
        .with_parameter("input", TypeRef::type_parameter("TIn"))
        .with_parameter("token", token_type());
    method.type_parameters = vec!["TOut".into()];
    let mut declaration = partial_class("Mapper", vec![method]);
    declaration.kind = TypeKind::Struct;
    declaration.namespace = None;
    declaration.type_parameters = vec!["TIn".into()];
    declaration.containing_types = vec![ContainingType {
        name: "Outer".into(),
        kind: TypeKind::Class,
        type_parameters: Vec::new(),
    }];

    let snapshot = Snapshot::new(vec![declaration], Vec::new());
    let fragments = CancellableGenerator::new("Runtime.Tasks", 2)
        .generate(&snapshot, &CancellationToken::new())
        .expect("generate");
    assert_eq!(fragments[0].id, "Outer_Mapper`1.Cancellable.g.cs");
    expect![[r#"
        // <auto-generated>
        //     Generated by tasksynth.cancellable.
        //     Changes to this file will be lost when the code is regenerated.
        // </auto-generated>
        #nullable enable

        partial class Outer
        {
          partial struct Mapper<TIn>
          {
            public global::Runtime.Tasks.CancellableTask<TOut> MapAsync<TOut>(TIn input)
            {
              var __cts = new global::System.Threading.CancellationTokenSource();
              var __ct = __cts.Token;
              var __task = MapAsync<TOut>(input: input, token: __ct);
              var __result = new global::Runtime.Tasks.CancellableTask<TOut>(__task, __cts);
              return __result;
            }
          }
        }
    "#]]
    .assert_eq(&fragments[0].source);
}

#[test]
fn by_reference_parameters_forward_their_modifier() {
    let mut method = MethodSymbol::new("TryAsync", Some(task(Vec::new())));
    let mut state = ParameterSymbol::new("state", int(), 0);
    state.syntax = Some("[NotNull] ref int state".into());
    let mut options = ParameterSymbol::new("options", string(), 1);
    options.syntax = Some("in string options".into());
    method.parameters = vec![state, options, ParameterSymbol::new("ct", token_type(), 2)];

    let model = model_for(method).expect("qualifies");
    let arguments: Vec<String> = model
        .parameters
        .iter()
        .map(ParameterDescriptor::forwarding_argument)
        .collect();
    assert_eq!(arguments, ["state: ref state", "options: in options"]);
}

#[test]
fn attribute_arguments_do_not_hide_the_modifier() {
    let mut count = ParameterSymbol::new("count", int(), 0);
    count.syntax = Some("[Foo(Flag = true)] ref int count".into());
    let mut label = ParameterSymbol::new("label", string(), 1);
    label.syntax = Some("[Note(\"a]b\")][Bar] in string label = \"x\"".into());
    let mut limit = ParameterSymbol::new("limit", int(), 2);
    limit.syntax = Some("[Range(1, 10)] int limit = 5".into());
    let mut method = MethodSymbol::new("TryAsync", Some(task(Vec::new())));
    method.parameters = vec![count, label, limit, ParameterSymbol::new("ct", token_type(), 3)];

    let model = model_for(method).expect("qualifies");
    let arguments: Vec<String> = model
        .parameters
        .iter()
        .map(ParameterDescriptor::forwarding_argument)
        .collect();
    assert_eq!(arguments, ["count: ref count", "label: in label", "limit: limit"]);
}

#[test]
fn nullable_annotated_container_still_qualifies() {
    let mut returned = NamedTypeRef::new(Some(TASKS_NAMESPACE), "Task", vec![int()]);
    returned.nullable = true;
    let method = MethodSymbol::new("MaybeAsync", Some(TypeRef::Named(returned)))
        .with_parameter("ct", token_type());
    let model = model_for(method).expect("qualifies");
    assert_eq!(model.return_type, "global::TaskSynth.CancellableTask<int>");
}

#[test]
fn groups_keep_first_seen_type_order() {
    let method = |name: &str| {
        MethodSymbol::new(name, Some(task(Vec::new()))).with_parameter("ct", token_type())
    };
    let snapshot = Snapshot::new(
        vec![
            partial_class("Beta", vec![method("One")]),
            partial_class("Alpha", vec![method("Two"), method("Three")]),
        ],
        Vec::new(),
    );
    let generator = CancellableGenerator::new("TaskSynth", 4);
    let models = generator
        .models(&snapshot, &CancellationToken::new())
        .expect("models");
    let groups = group_by_containing_type(models);
    let shape: Vec<(String, usize)> = groups
        .iter()
        .map(|group| (group[0].containing_type.name.clone(), group.len()))
        .collect();
    assert_eq!(shape, [("Beta".to_string(), 1), ("Alpha".to_string(), 2)]);

    let first = generator
        .generate(&snapshot, &CancellationToken::new())
        .expect("first run");
    let second = generator
        .generate(&snapshot, &CancellationToken::new())
        .expect("second run");
    assert_eq!(first, second);
}

#[test]
fn cancelled_run_yields_no_fragments() {
    let snapshot = Snapshot::new(
        vec![partial_class(
            "Foo",
            vec![MethodSymbol::new("Run", Some(task(Vec::new()))).with_parameter("ct", token_type())],
        )],
        Vec::new(),
    );
    let token = CancellationToken::new();
    token.cancel();
    let result = CancellableGenerator::new("TaskSynth", 4).generate(&snapshot, &token);
    assert!(result.is_err());
}
