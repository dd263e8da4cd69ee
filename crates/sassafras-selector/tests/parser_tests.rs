//! Integration tests for selector parsing, serialization, and the
//! structural equality/hash/order guarantees of the data model.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use sassafras_selector::{
    parse_compound_selector, parse_selector_list, parse_simple_selector, AttributeOp, Combinator,
    SelectorList, SelectorParser, SimpleSelector, Specificity,
};

fn parse(source: &str) -> SelectorList {
    parse_selector_list(source).unwrap()
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_parse_type_selector() {
    let simple = parse_simple_selector("div").unwrap();
    assert!(matches!(
        &simple,
        SimpleSelector::Type(name) if name.name == "div" && name.namespace.is_none()
    ));
    assert_eq!(simple.to_string(), "div");
}

#[test]
fn test_parse_namespaced_types() {
    // [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    // "The universal selector... represents the qualified name of any
    // element type", optionally qualified by a namespace prefix.
    let universal_namespace = parse_simple_selector("*|a").unwrap();
    assert!(matches!(
        &universal_namespace,
        SimpleSelector::Type(name) if name.namespace.as_deref() == Some("*")
    ));

    let empty_namespace = parse_simple_selector("|a").unwrap();
    assert!(matches!(
        &empty_namespace,
        SimpleSelector::Type(name) if name.namespace.as_deref() == Some("")
    ));

    let named = parse_simple_selector("svg|rect").unwrap();
    assert_eq!(named.to_string(), "svg|rect");

    let universal_in_namespace = parse_simple_selector("svg|*").unwrap();
    assert!(universal_in_namespace.is_universal());
}

#[test]
fn test_parse_class_id_placeholder() {
    assert!(matches!(
        parse_simple_selector(".highlight").unwrap(),
        SimpleSelector::Class(name) if name == "highlight"
    ));
    assert!(matches!(
        parse_simple_selector("#main-content").unwrap(),
        SimpleSelector::Id(name) if name == "main-content"
    ));
    assert!(matches!(
        parse_simple_selector("%base").unwrap(),
        SimpleSelector::Placeholder(name) if name == "base"
    ));
}

#[test]
fn test_parse_compound_selector_parts() {
    let compound = parse_compound_selector("div.foo#bar").unwrap();
    assert_eq!(compound.len(), 3);
    assert_eq!(compound.specificity(), Specificity(1, 1, 1));
    assert_eq!(
        compound.simple_selectors(),
        vec!["div".to_string(), ".foo".to_string(), "#bar".to_string()]
    );
}

#[test]
fn test_parse_attribute_selectors() {
    let exists = parse_simple_selector("[href]").unwrap();
    let SimpleSelector::Attribute(attribute) = &exists else {
        panic!("expected attribute selector");
    };
    assert!(attribute.op.is_none());
    assert_eq!(exists.to_string(), "[href]");

    let prefix = parse_simple_selector("[href^=\"http\"]").unwrap();
    let SimpleSelector::Attribute(attribute) = &prefix else {
        panic!("expected attribute selector");
    };
    assert_eq!(attribute.op, Some(AttributeOp::Prefix));
    assert_eq!(attribute.value.as_deref(), Some("http"));
    // "http" is an identifier, so it serializes without quotes.
    assert_eq!(prefix.to_string(), "[href^=http]");

    // [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
    let modifier = parse_simple_selector("[title=hello i]").unwrap();
    let SimpleSelector::Attribute(attribute) = &modifier else {
        panic!("expected attribute selector");
    };
    assert_eq!(attribute.modifier, Some('i'));
    assert_eq!(modifier.to_string(), "[title=hello i]");

    let includes = parse_simple_selector("[data-x~=y]").unwrap();
    assert_eq!(includes.to_string(), "[data-x~=y]");
}

#[test]
fn test_parse_pseudo_selectors() {
    let hover = parse_simple_selector(":hover").unwrap();
    let SimpleSelector::Pseudo(pseudo) = &hover else {
        panic!("expected pseudo selector");
    };
    assert!(pseudo.is_class());
    assert_eq!(hover.to_string(), ":hover");

    let before = parse_simple_selector("::before").unwrap();
    let SimpleSelector::Pseudo(pseudo) = &before else {
        panic!("expected pseudo selector");
    };
    assert!(pseudo.is_pseudo_element());
    assert_eq!(before.to_string(), "::before");

    // `:before` written with one colon is syntactically a class but still
    // a pseudo-element.
    let legacy = parse_simple_selector(":before").unwrap();
    let SimpleSelector::Pseudo(pseudo) = &legacy else {
        panic!("expected pseudo selector");
    };
    assert!(pseudo.is_pseudo_element());
    assert!(pseudo.is_syntactic_class());
    assert_eq!(legacy.to_string(), ":before");
}

#[test]
fn test_parse_pseudo_arguments() {
    let nth = parse_simple_selector(":nth-child(2n+1)").unwrap();
    let SimpleSelector::Pseudo(pseudo) = &nth else {
        panic!("expected pseudo selector");
    };
    assert_eq!(pseudo.argument(), Some("2n+1"));
    assert!(pseudo.selector().is_none());

    let not = parse_simple_selector(":not(.a, .b)").unwrap();
    let SimpleSelector::Pseudo(pseudo) = &not else {
        panic!("expected pseudo selector");
    };
    assert_eq!(pseudo.selector().unwrap().len(), 2);
    assert_eq!(not.to_string(), ":not(.a, .b)");

    let nth_of = parse_simple_selector(":nth-child(2n of .x)").unwrap();
    let SimpleSelector::Pseudo(pseudo) = &nth_of else {
        panic!("expected pseudo selector");
    };
    assert_eq!(pseudo.argument(), Some("2n of"));
    assert_eq!(pseudo.selector().unwrap().to_string(), ".x");
    assert_eq!(nth_of.to_string(), ":nth-child(2n of .x)");

    let vendor = parse_simple_selector(":-webkit-matches(.a)").unwrap();
    let SimpleSelector::Pseudo(pseudo) = &vendor else {
        panic!("expected pseudo selector");
    };
    assert_eq!(pseudo.normalized(), "matches");
}

#[test]
fn test_parse_parent_selectors() {
    let bare = parse("&");
    let compound = bare.components()[0].components()[0].selector();
    assert!(compound.with_explicit_parent());
    assert!(compound.is_empty());

    let with_class = parse("&.b");
    let compound = with_class.components()[0].components()[0].selector();
    assert!(compound.with_explicit_parent());
    assert_eq!(compound.len(), 1);

    // An identifier directly after `&` is a suffix, parsed as a bare type
    // selector inside the parent compound.
    let with_suffix = parse("&foo");
    let compound = with_suffix.components()[0].components()[0].selector();
    assert!(compound.with_explicit_parent());
    assert!(matches!(
        &compound.components()[0],
        SimpleSelector::Type(name) if name.name == "foo"
    ));
    assert_eq!(with_suffix.to_string(), "&foo");
}

#[test]
fn test_parse_combinators() {
    let child = parse("a > b");
    let components = child.components()[0].components();
    assert_eq!(components.len(), 2);
    assert_eq!(components[0].combinators(), &[Combinator::Child]);
    assert!(components[1].combinators().is_empty());
    assert_eq!(child.to_string(), "a > b");

    assert_eq!(parse("a+b").to_string(), "a + b");
    assert_eq!(parse("a ~ b").to_string(), "a ~ b");
    assert_eq!(parse("a  b").to_string(), "a b");

    // Leading and trailing combinators parse (and warn) rather than fail.
    let leading = parse("> a");
    assert_eq!(leading.components()[0].leading_combinators(), &[Combinator::Child]);
    assert!(leading.is_bogus_strict());
    assert!(!leading.is_bogus_lenient());

    let trailing = parse("a >");
    let components = trailing.components()[0].components();
    assert_eq!(components[0].combinators(), &[Combinator::Child]);
    assert!(trailing.is_bogus_lenient());
}

#[test]
fn test_parse_selector_list_variants() {
    let list = parse("a, b.c");
    assert_eq!(list.len(), 2);
    assert_eq!(list.to_string(), "a, b.c");

    // A newline before an alternative is recorded and re-emitted.
    let multiline = parse("a,\nb");
    assert!(multiline.components()[1].line_break());
    assert_eq!(multiline.to_string(), "a,\nb");

    // Comments count as whitespace.
    assert_eq!(parse("a /* gap */ b").to_string(), "a b");
}

#[test]
fn test_parse_errors() {
    assert!(parse_selector_list("").is_err());
    assert!(parse_selector_list("..a").is_err());
    assert!(parse_selector_list("[a").is_err());
    assert!(parse_selector_list("a&").is_err());
    assert!(parse_selector_list(":nth-child(x)").is_err());
}

#[test]
fn test_parser_options() {
    assert!(SelectorParser::new("&")
        .allow_parent(false)
        .parse_selector_list()
        .is_err());
    assert!(SelectorParser::new("%x")
        .allow_placeholder(false)
        .parse_selector_list()
        .is_err());
}

#[test]
fn test_parse_emit_round_trips() {
    // Property: parse(emit(s)) == s, up to equivalence.
    for source in [
        ".a.b",
        "a > b.c",
        ".a, .b",
        "#x:hover::after",
        "[a=b]",
        "[svg|width=\"100%\"]",
        "%ph",
        "a + b ~ c",
        ":not(.a)",
        ":is(.a > .b, .c)",
        "*",
        "*|a",
        "&.b",
        "> a",
        ":nth-child(2n+1 of .x)",
    ] {
        let parsed = parse(source);
        let reparsed = parse(&parsed.to_string());
        assert_eq!(reparsed, parsed, "round-trip failed for {source}");
    }
}

#[test]
fn test_equality_is_order_insensitive() {
    // Compound selectors compare as multisets of simple selectors.
    assert_eq!(parse(".a.b"), parse(".b.a"));
    assert_eq!(hash_of(&parse(".a.b")), hash_of(&parse(".b.a")));

    // Selector lists compare as multisets of complex selectors.
    assert_eq!(parse(".a, .b"), parse(".b, .a"));
    assert_eq!(hash_of(&parse(".a, .b")), hash_of(&parse(".b, .a")));

    // Complex selectors are order-sensitive.
    assert_ne!(parse(".a .b"), parse(".b .a"));

    // Equal values always hash equally.
    let x = parse("a#b.c:hover");
    let y = parse("a.c#b:hover");
    assert_eq!(x, y);
    assert_eq!(hash_of(&x), hash_of(&y));
}

#[test]
fn test_specificity() {
    // [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    let complex_selector = parse("#a .b div");
    let complex = &complex_selector.components()[0];
    assert_eq!(complex.specificity(), Specificity(1, 1, 1));
    assert_eq!(complex.max_specificity(), complex.specificity());

    assert_eq!(parse("*").components()[0].specificity(), Specificity::ZERO);

    // Placeholders count like classes.
    assert_eq!(parse("%x").components()[0].specificity(), Specificity(0, 1, 0));

    // Pseudo-elements count like type selectors.
    assert_eq!(parse("::after").components()[0].specificity(), Specificity(0, 0, 1));
}

#[test]
fn test_classifiers() {
    assert!(parse("%x").is_invisible());
    assert!(!parse("%x, .a").is_invisible());
    assert!(parse("%x").has_placeholder());
    assert!(parse("> > a").is_useless());
    assert!(!parse("> a").is_useless());
    assert!(parse("&").contains_parent_selector());
    assert!(parse(":not(&)").contains_parent_selector());
    assert!(!parse(".a").contains_parent_selector());
}
