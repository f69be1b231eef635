use selpath_html::{Document, NodeId, parse_fragment};
use selpath_xpath::{literal, select, select_first, select_first_from};

const NESTED: &str = r#"
    <div id="app">
        <ul class="menu">
            <li class="item">A</li>
            <li class="item active">B</li>
        </ul>
        <ul>
            <li>C</li>
            <li title="it's">D</li>
            <li title='say "hi" it&apos;s'>E</li>
        </ul>
    </div>
"#;

fn texts(document: &Document, nodes: &[NodeId]) -> Vec<String> {
    nodes.iter().map(|node| document.text_content(*node)).collect()
}

#[test]
fn positional_predicate_is_per_parent() {
    let document = parse_fragment(NESTED).unwrap();
    let found = select(&document, document.root(), "//DIV/UL/LI[2]").unwrap();
    assert_eq!(texts(&document, &found), vec!["B", "D"]);

    let first = select_first(&document, "//DIV/UL[2]/LI[1]").unwrap().unwrap();
    assert_eq!(document.text_content(first), "C");
}

#[test]
fn contains_predicates_are_anded() {
    let document = parse_fragment(NESTED).unwrap();
    let found = select_first(
        &document,
        "//LI[contains(@class, 'item') and contains(@class, 'active')]",
    )
    .unwrap()
    .unwrap();
    assert_eq!(document.text_content(found), "B");
}

#[test]
fn position_then_attribute_filters_in_order() {
    let document = parse_fragment(NESTED).unwrap();
    assert_eq!(
        select_first(&document, "//UL/LI[1][contains(@class, 'active')]").unwrap(),
        None
    );
    let second = select_first(&document, "//UL/LI[2][contains(@class, 'active')]").unwrap().unwrap();
    assert_eq!(document.text_content(second), "B");
}

#[test]
fn relative_query_starts_at_context_node() {
    let document = parse_fragment(NESTED).unwrap();
    let second_list = select_first(&document, "//UL[2]").unwrap().unwrap();
    let found = select_first_from(&document, second_list, ".//LI[2]").unwrap().unwrap();
    assert_eq!(document.text_content(found), "D");
    assert_eq!(select_first_from(&document, second_list, ".//UL").unwrap(), None);
}

#[test]
fn quoted_literals_round_trip() {
    let document = parse_fragment(NESTED).unwrap();
    let query = format!("//LI[contains(@title, {})]", literal("it's"));
    let found = select(&document, document.root(), &query).unwrap();
    assert_eq!(texts(&document, &found), vec!["D", "E"]);

    let query = format!("//LI[@title = {}]", literal("say \"hi\" it's"));
    let found = select_first(&document, &query).unwrap().unwrap();
    assert_eq!(document.text_content(found), "E");
}

#[test]
fn functions_and_wildcards() {
    let document = parse_fragment(NESTED).unwrap();
    let last = select_first(&document, "//UL[1]/*[position() = last()]").unwrap().unwrap();
    assert_eq!(document.text_content(last), "B");
    let without_class = select(&document, document.root(), "//LI[not(@class)]").unwrap();
    assert_eq!(texts(&document, &without_class), vec!["C", "D", "E"]);
    let parent = select_first(&document, "//LI[starts-with(normalize-space(string(@class)), 'item a')]/..")
        .unwrap()
        .unwrap();
    assert_eq!(document.attribute(parent, "class"), Some("menu"));
}

#[test]
fn malformed_queries_are_errors() {
    let document = parse_fragment(NESTED).unwrap();
    assert!(select_first(&document, "//LI[").is_err());
    assert!(select_first(&document, "//LI[@]").is_err());
    assert!(select_first(&document, "//LI[text()]").is_err());
}
