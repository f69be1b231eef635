//! Command line parsing for `selpath`.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use selpath_builder::Scope;

pub const USAGE: &str = "Usage:\n  selpath <FILE> --pick <CSS> [--relative <CSS>] \
[--include <main|relative>:<index>:<name>=<value>]... [--xpath] [--fragment] [--tree] \
[--dump-dom] [--config <JSON>]";

/// One `--include` flag: add `value` of attribute `name` to entry `index` of `scope`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub scope: Scope,
    pub index: usize,
    pub name: String,
    pub value: String,
}

impl Include {
    /// Parse `<scope>:<index>:<name>=<value>`. The value may contain `:` and `=`.
    ///
    /// # Errors
    /// Returns an error if a part is missing or malformed.
    pub fn parse(spec: &str) -> Result<Self> {
        let (scope, rest) = spec
            .split_once(':')
            .ok_or_else(|| anyhow!("--include `{spec}`: expected <scope>:<index>:<name>=<value>"))?;
        let (index, assignment) = rest
            .split_once(':')
            .ok_or_else(|| anyhow!("--include `{spec}`: missing index"))?;
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("--include `{spec}`: missing `=`"))?;
        if name.is_empty() {
            return Err(anyhow!("--include `{spec}`: empty attribute name"));
        }
        Ok(Self {
            scope: scope
                .parse()
                .map_err(|scope| anyhow!("--include `{spec}`: unknown scope `{scope}`"))?,
            index: index
                .parse()
                .map_err(|err| anyhow!("--include `{spec}`: bad index: {err}"))?,
            name: name.to_owned(),
            value: value.to_owned(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub file: PathBuf,
    pub pick: String,
    pub relative: Option<String>,
    pub includes: Vec<Include>,
    pub xpath: bool,
    pub fragment: bool,
    pub tree: bool,
    pub dump_dom: bool,
    pub config: Option<PathBuf>,
}

/// Parse arguments (program name excluded).
///
/// # Errors
/// Returns an error for unknown flags, missing values or a missing file or `--pick`.
pub fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut file: Option<PathBuf> = None;
    let mut pick: Option<String> = None;
    let mut index = 0;
    while index < args.len() {
        let arg = args[index].as_str();
        let mut value = || {
            index += 1;
            args.get(index)
                .cloned()
                .ok_or_else(|| anyhow!("{arg} requires a value"))
        };
        match arg {
            "--pick" => pick = Some(value()?),
            "--relative" => options.relative = Some(value()?),
            "--include" => options.includes.push(Include::parse(&value()?)?),
            "--config" => options.config = Some(PathBuf::from(value()?)),
            "--xpath" => options.xpath = true,
            "--fragment" => options.fragment = true,
            "--tree" => options.tree = true,
            "--dump-dom" => options.dump_dom = true,
            flag if flag.starts_with("--") => return Err(anyhow!("unknown flag {flag}")),
            path => {
                if file.is_some() {
                    return Err(anyhow!("unexpected argument {path}"));
                }
                file = Some(PathBuf::from(path));
            }
        }
        index += 1;
    }
    options.file = file.ok_or_else(|| anyhow!("missing <FILE>"))?;
    options.pick = pick.ok_or_else(|| anyhow!("--pick is required"))?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| (*arg).to_owned()).collect()
    }

    #[test]
    fn parses_every_flag() {
        let options = parse_args(&args(&[
            "page.html",
            "--pick",
            "li:nth-of-type(2)",
            "--relative",
            "#footer a",
            "--include",
            "main:0:id=app",
            "--include",
            "relative:1:href=/a?b=c",
            "--xpath",
            "--fragment",
            "--tree",
            "--dump-dom",
            "--config",
            "selpath.json",
        ]))
        .unwrap();
        assert_eq!(options.file, PathBuf::from("page.html"));
        assert_eq!(options.pick, "li:nth-of-type(2)");
        assert_eq!(options.relative.as_deref(), Some("#footer a"));
        assert_eq!(
            options.includes[1],
            Include {
                scope: Scope::Relative,
                index: 1,
                name: "href".to_owned(),
                value: "/a?b=c".to_owned(),
            }
        );
        assert!(options.xpath && options.fragment && options.tree && options.dump_dom);
        assert_eq!(options.config, Some(PathBuf::from("selpath.json")));
    }

    #[test]
    fn reports_missing_pieces() {
        let missing_pick = parse_args(&args(&["page.html"])).unwrap_err();
        assert_eq!(missing_pick.to_string(), "--pick is required");
        let missing_value = parse_args(&args(&["page.html", "--pick"])).unwrap_err();
        assert_eq!(missing_value.to_string(), "--pick requires a value");
        let missing_file = parse_args(&args(&["--pick", "p"])).unwrap_err();
        assert_eq!(missing_file.to_string(), "missing <FILE>");
        let unknown = parse_args(&args(&["a.html", "--pick", "p", "--verbose"])).unwrap_err();
        assert_eq!(unknown.to_string(), "unknown flag --verbose");
    }

    #[test]
    fn rejects_malformed_includes() {
        assert_eq!(
            Include::parse("side:0:id=x").unwrap_err().to_string(),
            "--include `side:0:id=x`: unknown scope `side`"
        );
        assert!(Include::parse("main:first:id=x").is_err());
        assert!(Include::parse("main:0:id").is_err());
        assert!(Include::parse("main:0:=x").is_err());
    }
}
