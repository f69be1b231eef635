//! `selpath`: derive CSS and XPath locators for elements of an HTML file.
//!
//! Picks are simulated with CSS selectors; the picked nodes go through the
//! same picking session an interactive front end would use.

mod args;

use std::env;
use std::fs::read_to_string;
use std::io::{Write, stderr, stdout};

use anyhow::{Result, anyhow};
use args::{Options, USAGE, parse_args};
use selpath_builder::{BuilderConfig, PickOutcome, PickingSession, Scope, SelectorPathBuilder};
use selpath_html::dom::to_json;
use selpath_html::{Document, NodeId, parse_document, parse_fragment};

/// Environment first, then the config file, then command line flags.
fn load_config(options: &Options) -> Result<BuilderConfig> {
    let mut config = match &options.config {
        Some(path) => BuilderConfig::from_json_file(path)?,
        None => BuilderConfig::from_env(),
    };
    if options.xpath {
        config.use_xpath = true;
    }
    Ok(config)
}

fn pick(
    session: &mut PickingSession,
    builder: &mut SelectorPathBuilder<'_>,
    document: &Document,
    scope: Scope,
    selector: &str,
) -> Result<NodeId> {
    let node = selpath_css::query_selector(document, selector)?
        .ok_or_else(|| anyhow!("no element matches --{} `{selector}`", flag_name(scope)))?;
    session.start_picking(scope);
    match session.handle_click(builder, node)? {
        PickOutcome::Picked(_) => Ok(node),
        outcome => Err(anyhow!("pick was not taken: {outcome:?}")),
    }
}

const fn flag_name(scope: Scope) -> &'static str {
    match scope {
        Scope::Main => "pick",
        Scope::Relative => "relative",
    }
}

fn report(out: &mut impl Write, builder: &SelectorPathBuilder<'_>, scope: Scope, picked: NodeId) -> Result<()> {
    let query = builder.render_scope(scope);
    let resolved = builder.resolve_scope(scope)?;
    writeln!(out, "{scope} ({}): {query}", builder.grammar())?;
    let verdict = if resolved == Some(picked) { "picked node" } else { "a different node" };
    writeln!(out, "  resolves to {verdict}")?;
    Ok(())
}

/// Execute one invocation, writing results to `out`.
///
/// # Errors
/// Returns an error if the file cannot be read, a pick or toggle is rejected,
/// or a query fails to resolve.
fn run(options: &Options, out: &mut impl Write) -> Result<()> {
    let config = load_config(options)?;
    let html = read_to_string(&options.file)
        .map_err(|err| anyhow!("cannot read {}: {err}", options.file.display()))?;
    let document = if options.fragment { parse_fragment(&html)? } else { parse_document(&html)? };
    log::debug!("parsed {} with {} elements", options.file.display(), document.elements().count());

    if options.dump_dom {
        writeln!(out, "{}", serde_json::to_string_pretty(&to_json(&document))?)?;
    }

    let mut builder = SelectorPathBuilder::new(&document, config);
    let mut session = PickingSession::new();
    let main_leaf = pick(&mut session, &mut builder, &document, Scope::Main, &options.pick)?;
    let relative_leaf = match &options.relative {
        Some(selector) => Some(pick(&mut session, &mut builder, &document, Scope::Relative, selector)?),
        None => None,
    };

    for include in &options.includes {
        builder.toggle_attribute(include.scope, include.index, &include.name, &include.value, true)?;
    }

    report(out, &builder, Scope::Main, main_leaf)?;
    if let Some(leaf) = relative_leaf {
        report(out, &builder, Scope::Relative, leaf)?;
        if !builder.has_common_ancestor() {
            writeln!(out, "  no common ancestor; query is absolute")?;
        }
    }
    if options.tree {
        write!(out, "{}", builder.merged_tree())?;
    }
    Ok(())
}

/// Main entry point for the selpath CLI tool.
///
/// # Errors
/// Returns an error if argument parsing or execution fails.
fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(&args).inspect_err(|_| {
        drop(writeln!(stderr(), "{USAGE}"));
    })?;
    run(&options, &mut stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use args::Include;
    use tempfile::NamedTempFile;

    const PAGE: &str = r#"<div id="app"><ul class="menu"><li>A</li><li class="on">B</li></ul><footer><a href="/x">x</a></footer></div>"#;

    fn page() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(PAGE.as_bytes()).unwrap();
        file
    }

    fn output(options: &Options) -> String {
        let mut out = Vec::new();
        run(options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_main_and_relative_queries() {
        let file = page();
        let options = Options {
            file: file.path().to_path_buf(),
            pick: "li.on".to_owned(),
            relative: Some("footer a".to_owned()),
            fragment: true,
            tree: true,
            includes: vec![Include {
                scope: Scope::Main,
                index: 2,
                name: "class".to_owned(),
                value: "on".to_owned(),
            }],
            ..Options::default()
        };
        assert_eq!(
            output(&options),
            "main (CSS): DIV UL LI:nth-of-type(2).on\n  resolves to picked node\n\
             relative (CSS): FOOTER A\n  resolves to picked node\n\
             DIV *\n  UL\n    LI\n  FOOTER (relative)\n    A (relative)\n"
        );
    }

    #[test]
    fn xpath_flag_switches_grammar() {
        let file = page();
        let options = Options {
            file: file.path().to_path_buf(),
            pick: "li".to_owned(),
            xpath: true,
            ..Options::default()
        };
        assert_eq!(
            output(&options),
            "main (XPath): //BODY/DIV/UL/LI\n  resolves to picked node\n"
        );
    }

    #[test]
    fn unmatched_pick_is_an_error() {
        let file = page();
        let options = Options {
            file: file.path().to_path_buf(),
            pick: "table".to_owned(),
            ..Options::default()
        };
        let err = run(&options, &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "no element matches --pick `table`");
    }
}
