use selpath_css::{CssError, query_selector, query_selector_all, query_selector_from, query_selector_within};
use selpath_html::parse_fragment;

const LIST: &str = r#"
    <div id="app" class="shell main">
        <ul>
            <li>A</li>
            <li class="active" data-kind="x y">B</li>
            <li>C</li>
        </ul>
        <a href="/docs" title="Docs">docs</a>
    </div>
"#;

#[test]
fn uppercase_type_selectors_match_html_elements() {
    let document = parse_fragment(LIST).unwrap();
    let found = query_selector(&document, "DIV UL LI:nth-of-type(2)").unwrap().unwrap();
    assert_eq!(document.text_content(found), "B");
}

#[test]
fn id_class_and_attribute_selectors() {
    let document = parse_fragment(LIST).unwrap();
    let app = query_selector(&document, "DIV#app.shell.main").unwrap().unwrap();
    assert_eq!(document.id(app), Some("app"));

    let link = query_selector(&document, "A[href='/docs']").unwrap().unwrap();
    assert_eq!(document.attribute(link, "title"), Some("Docs"));

    let active = query_selector(&document, "LI[data-kind~='y']").unwrap().unwrap();
    assert_eq!(document.text_content(active), "B");

    assert_eq!(query_selector(&document, "LI.missing").unwrap(), None);
}

#[test]
fn query_all_is_in_document_order() {
    let document = parse_fragment(LIST).unwrap();
    let items = query_selector_all(&document, "ul > li").unwrap();
    let texts: Vec<String> = items.iter().map(|node| document.text_content(*node)).collect();
    assert_eq!(texts, vec!["A", "B", "C"]);
}

#[test]
fn scoped_query_only_returns_descendants() {
    let document = parse_fragment(LIST).unwrap();
    let list = query_selector(&document, "UL").unwrap().unwrap();
    assert_eq!(query_selector_from(&document, list, "A").unwrap(), None);
    let third = query_selector_from(&document, list, "LI:nth-of-type(3)").unwrap().unwrap();
    assert_eq!(document.text_content(third), "C");
}

#[test]
fn unsupported_selectors_are_errors() {
    let document = parse_fragment(LIST).unwrap();
    let err = query_selector(&document, "LI:hover").unwrap_err();
    assert!(matches!(err, CssError::InvalidSelector { .. }));
    assert!(query_selector(&document, "DIV >").is_err());
}

#[test]
fn within_keeps_every_compound_inside_the_scope() {
    let document = parse_fragment(
        r#"<em><div id="scope"><b id="outer">1</b><em><b id="inner">2</b></em></div></em>"#,
    )
    .unwrap();
    let scope = query_selector(&document, "#scope").unwrap().unwrap();

    let loose = query_selector_from(&document, scope, "EM B").unwrap().unwrap();
    assert_eq!(document.id(loose), Some("outer"));

    let confined = query_selector_within(&document, scope, "EM B").unwrap().unwrap();
    assert_eq!(document.id(confined), Some("inner"));
    assert_eq!(query_selector_within(&document, scope, "DIV B").unwrap(), None);
}
