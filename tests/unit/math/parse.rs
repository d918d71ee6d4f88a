use super::*;

fn row(items: Vec<Node>) -> Node {
    Node::Row(items)
}

#[test]
fn adjacent_glyphs_merge_into_one_run() {
    assert_eq!(parse("2x+1").unwrap(), row(vec![Node::Run("2x+1".into())]));
}

#[test]
fn whitespace_is_insignificant() {
    assert_eq!(parse("a + b").unwrap(), parse("a+b").unwrap());
}

#[test]
fn frac_takes_two_groups() {
    let node = parse(r"\frac{1}{2}").unwrap();
    let Node::Row(items) = node else { panic!("expected row") };
    assert_eq!(items.len(), 1);
    let Node::Frac(num, den) = &items[0] else { panic!("expected frac") };
    assert_eq!(**num, row(vec![Node::Run("1".into())]));
    assert_eq!(**den, row(vec![Node::Run("2".into())]));
}

#[test]
fn sqrt_takes_one_group() {
    let node = parse(r"\sqrt{x+1}").unwrap();
    let Node::Row(items) = node else { panic!("expected row") };
    assert!(matches!(&items[0], Node::Sqrt(_)));
}

#[test]
fn superscript_splits_the_preceding_glyph() {
    let node = parse("x^2").unwrap();
    let Node::Row(items) = node else { panic!("expected row") };
    assert_eq!(items.len(), 1);
    let Node::Script { base, sup, sub } = &items[0] else { panic!("expected script") };
    assert_eq!(**base, Node::Run("x".into()));
    assert_eq!(*sup.as_deref().unwrap(), row(vec![Node::Run("2".into())]));
    assert!(sub.is_none());
}

#[test]
fn script_base_is_last_glyph_of_a_longer_run() {
    let node = parse("2x^3").unwrap();
    let Node::Row(items) = node else { panic!("expected row") };
    assert_eq!(items[0], Node::Run("2".into()));
    let Node::Script { base, .. } = &items[1] else { panic!("expected script") };
    assert_eq!(**base, Node::Run("x".into()));
}

#[test]
fn sub_and_sup_share_one_base() {
    let node = parse("x_i^2").unwrap();
    let Node::Row(items) = node else { panic!("expected row") };
    assert_eq!(items.len(), 1);
    let Node::Script { sup, sub, .. } = &items[0] else { panic!("expected script") };
    assert!(sup.is_some() && sub.is_some());
}

#[test]
fn double_superscript_is_rejected() {
    assert!(parse("x^2^3").is_err());
}

#[test]
fn named_symbols_substitute_unicode() {
    assert_eq!(symbol("alpha"), Some('α'));
    assert_eq!(symbol("times"), Some('×'));
    assert_eq!(symbol("leq"), Some('≤'));
    assert_eq!(symbol("rightarrow"), Some('→'));
    assert_eq!(symbol("nosuchsymbol"), None);

    assert_eq!(
        parse(r"\alpha\beta").unwrap(),
        row(vec![Node::Run("αβ".into())])
    );
}

#[test]
fn unknown_command_is_an_error() {
    assert!(parse(r"\definitelynotacommand{x}").is_err());
}

#[test]
fn unbalanced_braces_are_errors() {
    assert!(parse("{x").is_err());
    assert!(parse("x}").is_err());
    assert!(parse(r"\frac{1}").is_err());
}

#[test]
fn text_group_is_kept_verbatim() {
    let node = parse(r"\text{speed of light}").unwrap();
    let Node::Row(items) = node else { panic!("expected row") };
    assert_eq!(items[0], Node::Run("speed of light".into()));
}

#[test]
fn left_right_delimiters_keep_the_glyph() {
    let node = parse(r"\left(x\right)").unwrap();
    let Node::Row(items) = node else { panic!("expected row") };
    assert_eq!(items, vec![Node::Run("(x)".into())]);

    // The invisible delimiter contributes nothing.
    let node = parse(r"\left.x\right)").unwrap();
    let Node::Row(items) = node else { panic!("expected row") };
    assert_eq!(items, vec![Node::Run("x)".into())]);
}

#[test]
fn spacing_commands_produce_space_nodes() {
    let node = parse(r"a\quad b").unwrap();
    let Node::Row(items) = node else { panic!("expected row") };
    assert_eq!(items.len(), 3);
    assert!(matches!(items[1], Node::Space(em) if em == 1.0));
}

#[test]
fn empty_formula_parses_to_empty_row() {
    assert_eq!(parse("").unwrap(), row(vec![]));
}
