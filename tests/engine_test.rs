// Built-in engine output checked structurally with roxmltree

use mathbridge_wasm::renderers::mathml::MATHML_NAMESPACE;
use mathbridge_wasm::{ConversionEngine, ConversionOptions, EngineError, TexEngine};

fn mathml(input: &str, display: bool) -> String {
    let mut engine = TexEngine::default();
    engine.process_input(input, display).expect("input should be accepted");
    engine.mathml().expect("markup should render")
}

/// Element tree as nested s-expressions: `(msup (mi x) (mn 2))`
fn shape(markup: &str) -> String {
    let doc = roxmltree::Document::parse(markup).expect("markup should be well-formed XML");
    let root = doc.root_element();
    assert_eq!(root.tag_name().namespace(), Some(MATHML_NAMESPACE));
    root.children()
        .filter(|n| n.is_element())
        .map(|n| render_shape(&n))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_shape(node: &roxmltree::Node) -> String {
    let children: Vec<String> = node
        .children()
        .filter(|n| n.is_element())
        .map(|n| render_shape(&n))
        .collect();
    let name = node.tag_name().name();
    if children.is_empty() {
        match node.text() {
            Some(text) => format!("({} {})", name, text),
            None => format!("({})", name),
        }
    } else {
        format!("({} {})", name, children.join(" "))
    }
}

#[test]
fn test_scripts() {
    assert_eq!(shape(&mathml("x^2", false)), "(msup (mi x) (mn 2))");
    assert_eq!(shape(&mathml("x_i", false)), "(msub (mi x) (mi i))");
    assert_eq!(
        shape(&mathml("x_i^{n+1}", false)),
        "(msubsup (mi x) (mi i) (mrow (mi n) (mo +) (mn 1)))"
    );
}

#[test]
fn test_quadratic_formula() {
    let markup = mathml(r"x = \frac{-b \pm \sqrt{b^2 - 4ac}}{2a}", true);
    assert_eq!(
        shape(&markup),
        "(mi x) (mo =) (mfrac (mrow (mo \u{2212}) (mi b) (mo \u{00B1}) \
         (msqrt (mrow (msup (mi b) (mn 2)) (mo \u{2212}) (mn 4) (mi a) (mi c))) \
         (mrow (mn 2) (mi a)))"
    );
}

#[test]
fn test_display_limits() {
    assert_eq!(
        shape(&mathml(r"\lim_{n \to \infty} a_n", true)),
        "(munder (mi lim) (mrow (mi n) (mo \u{2192}) (mi \u{221E}))) (mo \u{2061}) (msub (mi a) (mi n))"
    );
}

#[test]
fn test_fenced_binomial_and_accents() {
    assert_eq!(
        shape(&mathml(r"\left[ \binom{n}{k} \right]", false)),
        "(mrow (mo [) (mrow (mo () (mfrac (mi n) (mi k)) (mo ))) (mo ]))"
    );
    assert_eq!(
        shape(&mathml(r"\hat{x} \underline{y}", false)),
        "(mover (mi x) (mo ^)) (munder (mi y) (mo _))"
    );
}

#[test]
fn test_empty_input_renders_empty_math() {
    assert_eq!(shape(&mathml("", false)), "");
    assert_eq!(shape(&mathml("  % just a comment", false)), "");
}

#[test]
fn test_text_content_is_escaped() {
    let markup = mathml(r"\text{a < b & c}", false);
    assert!(markup.contains("<mtext>a &lt; b &amp; c</mtext>"));
    assert_eq!(shape(&markup), "(mtext a < b & c)");
}

#[test]
fn test_engine_errors_are_domain() {
    let mut engine = TexEngine::new(ConversionOptions::default());
    for (input, code) in [
        (r"\unknownmacro", "UnrecognisedCommand"),
        ("x^", "MissingArgument"),
        (r"\def", "ReservedCommand"),
        ("x\u{0007}", "IllegalCharacter"),
        ("\\", "IllegalFinalBackslash"),
    ] {
        match engine.process_input(input, false) {
            Err(EngineError::Domain(e)) => assert_eq!(e.code, code, "input {:?}", input),
            other => panic!("input {:?}: expected domain error, got {:?}", input, other),
        }
    }
}
