//! Syntactic dependency extraction
//!
//! Each language family gets a handful of line-oriented regexes. Nothing here
//! parses; a target is whatever string an import-like statement names.

use super::language::ImportSyntax;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    // EcmaScript
    static ref ES_FROM: Regex = Regex::new(r#"(?:^|[\s}*])from\s*['"]([^'"]+)['"]"#).unwrap();
    static ref ES_BARE_IMPORT: Regex = Regex::new(r#"^\s*import\s*['"]([^'"]+)['"]"#).unwrap();
    static ref ES_REQUIRE: Regex = Regex::new(r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap();
    static ref ES_DYNAMIC: Regex = Regex::new(r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap();

    // Python
    static ref PY_FROM: Regex = Regex::new(r"^\s*from\s+([\w.]+)\s+import\b").unwrap();
    static ref PY_IMPORT: Regex = Regex::new(r"^\s*import\s+([\w.]+(?:\s+as\s+\w+)?(?:\s*,\s*[\w.]+(?:\s+as\s+\w+)?)*)").unwrap();

    // Go
    static ref GO_SINGLE: Regex = Regex::new(r#"^\s*import\s+(?:[\w.]+\s+)?"([^"]+)""#).unwrap();
    static ref GO_BLOCK_START: Regex = Regex::new(r"^\s*import\s*\(").unwrap();
    static ref GO_BLOCK_ENTRY: Regex = Regex::new(r#"^\s*(?:[\w.]+\s+)?"([^"]+)""#).unwrap();

    // Rust
    static ref RS_USE: Regex = Regex::new(r"^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+([^;]+);").unwrap();
    static ref RS_EXTERN: Regex = Regex::new(r"^\s*extern\s+crate\s+(\w+)").unwrap();

    // Java / Kotlin / Scala / C#
    static ref JVM_IMPORT: Regex = Regex::new(r"^\s*import\s+(?:static\s+)?([\w.]+(?:\.\*)?)\s*;?\s*$").unwrap();
    static ref CS_USING: Regex = Regex::new(r"^\s*using\s+(?:static\s+)?([\w.]+)\s*;").unwrap();

    // C / C++
    static ref C_INCLUDE: Regex = Regex::new(r#"^\s*#\s*include\s*[<"]([^>"]+)[>"]"#).unwrap();

    // Ruby
    static ref RB_REQUIRE: Regex = Regex::new(r#"^\s*require\s*\(?\s*['"]([^'"]+)['"]"#).unwrap();

    // PHP
    static ref PHP_USE: Regex = Regex::new(r"^\s*use\s+([\w\\]+)").unwrap();
    static ref PHP_REQUIRE: Regex = Regex::new(r#"\b(?:require|include)(?:_once)?\s*\(?\s*['"]([^'"]+)['"]"#).unwrap();

    // Swift
    static ref SWIFT_IMPORT: Regex = Regex::new(r"^\s*(?:@testable\s+)?import\s+(?:\w+\s+)?(\w+)").unwrap();
}

/// Extract bare dependency targets from the leading lines of a file.
///
/// Targets naming a relative or absolute path are dropped, duplicates are
/// removed and first-seen order is kept.
pub fn extract_dependencies(syntax: ImportSyntax, lines: &[&str]) -> Vec<String> {
    let mut raw = Vec::new();

    match syntax {
        ImportSyntax::EcmaScript => {
            for line in lines {
                for re in [&*ES_FROM, &*ES_BARE_IMPORT, &*ES_REQUIRE, &*ES_DYNAMIC] {
                    raw.extend(re.captures_iter(line).map(|c| c[1].to_string()));
                }
            }
        }
        ImportSyntax::Python => {
            for line in lines {
                if let Some(caps) = PY_FROM.captures(line) {
                    raw.push(caps[1].to_string());
                } else if let Some(caps) = PY_IMPORT.captures(line) {
                    raw.extend(
                        caps[1]
                            .split(',')
                            .filter_map(|part| part.split_whitespace().next())
                            .map(String::from),
                    );
                }
            }
        }
        ImportSyntax::Go => extract_go(lines, &mut raw),
        ImportSyntax::Rust => {
            for line in lines {
                if let Some(caps) = RS_USE.captures(line) {
                    raw.push(rust_use_root(&caps[1]));
                } else if let Some(caps) = RS_EXTERN.captures(line) {
                    raw.push(caps[1].to_string());
                }
            }
        }
        ImportSyntax::JvmLike => {
            for line in lines {
                if let Some(caps) = JVM_IMPORT.captures(line).or_else(|| CS_USING.captures(line)) {
                    raw.push(caps[1].to_string());
                }
            }
        }
        ImportSyntax::CInclude => collect_first(lines, &C_INCLUDE, &mut raw),
        ImportSyntax::Ruby => collect_first(lines, &RB_REQUIRE, &mut raw),
        ImportSyntax::Php => {
            for line in lines {
                if let Some(caps) = PHP_USE.captures(line).or_else(|| PHP_REQUIRE.captures(line)) {
                    raw.push(caps[1].to_string());
                }
            }
        }
        ImportSyntax::Swift => collect_first(lines, &SWIFT_IMPORT, &mut raw),
    }

    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|target| target.trim().to_string())
        .filter(|target| is_bare_target(target))
        .filter(|target| seen.insert(target.clone()))
        .collect()
}

fn collect_first(lines: &[&str], re: &Regex, out: &mut Vec<String>) {
    out.extend(
        lines
            .iter()
            .filter_map(|line| re.captures(line))
            .map(|caps| caps[1].to_string()),
    );
}

fn extract_go(lines: &[&str], out: &mut Vec<String>) {
    let mut in_block = false;
    for line in lines {
        if in_block {
            if line.trim_start().starts_with(')') {
                in_block = false;
            } else if let Some(caps) = GO_BLOCK_ENTRY.captures(line) {
                out.push(caps[1].to_string());
            }
        } else if GO_BLOCK_START.is_match(line) {
            in_block = true;
            // `import ( "fmt" )` on one line
            let rest = line.split_once('(').map_or("", |(_, rest)| rest);
            for quoted in rest.split('"').skip(1).step_by(2) {
                out.push(quoted.to_string());
            }
            if rest.contains(')') {
                in_block = false;
            }
        } else if let Some(caps) = GO_SINGLE.captures(line) {
            out.push(caps[1].to_string());
        }
    }
}

/// `std::collections::{HashMap, HashSet}` -> `std::collections`,
/// `serde_json::Value as Json` -> `serde_json::Value`
fn rust_use_root(path: &str) -> String {
    let path = path.split(" as ").next().unwrap_or(path);
    let path = path.split("::{").next().unwrap_or(path);
    let path = path.trim_start_matches("::");
    // `self::` and `super::` are relative to the current module
    if path.starts_with("self::") || path.starts_with("super::") || path == "self" || path == "super" {
        return format!("./{path}");
    }
    path.trim().to_string()
}

fn is_bare_target(target: &str) -> bool {
    !target.is_empty() && !target.starts_with(['.', '/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(syntax: ImportSyntax, source: &str) -> Vec<String> {
        let lines: Vec<&str> = source.lines().collect();
        extract_dependencies(syntax, &lines)
    }

    #[test]
    fn test_ecmascript_forms() {
        let source = r#"
import React from 'react';
import { a,
  b } from "lodash";
import './styles.css';
import 'reflect-metadata';
export * from '@scope/pkg';
const fs = require('fs');
const lazy = await import("chart.js");
import local from "./b";
import abs from "/abs/path";
"#;
        assert_eq!(
            extract(ImportSyntax::EcmaScript, source),
            vec!["react", "lodash", "reflect-metadata", "@scope/pkg", "fs", "chart.js"]
        );
    }

    #[test]
    fn test_python_forms() {
        let source = "from os import path\nimport sys, json as j\nfrom . import sibling\nfrom .models import User\nimport numpy.linalg\n";
        assert_eq!(
            extract(ImportSyntax::Python, source),
            vec!["os", "sys", "json", "numpy.linalg"]
        );
    }

    #[test]
    fn test_go_blocks() {
        let source = "package main\n\nimport \"fmt\"\nimport (\n\t\"os\"\n\tlog \"github.com/sirupsen/logrus\"\n)\nimport ( \"strings\" )\n";
        assert_eq!(
            extract(ImportSyntax::Go, source),
            vec!["fmt", "os", "github.com/sirupsen/logrus", "strings"]
        );
    }

    #[test]
    fn test_rust_use() {
        let source = "use std::collections::{HashMap, HashSet};\npub use crate::models::Zone;\nuse super::language;\nuse serde_json::Value as Json;\nextern crate regex;\n";
        assert_eq!(
            extract(ImportSyntax::Rust, source),
            vec!["std::collections", "crate::models::Zone", "serde_json::Value", "regex"]
        );
    }

    #[test]
    fn test_jvm_and_csharp() {
        let java = "package a;\nimport java.util.List;\nimport static org.junit.Assert.*;\n";
        assert_eq!(
            extract(ImportSyntax::JvmLike, java),
            vec!["java.util.List", "org.junit.Assert.*"]
        );
        let csharp = "using System;\nusing System.Linq;\n";
        assert_eq!(extract(ImportSyntax::JvmLike, csharp), vec!["System", "System.Linq"]);
        let kotlin = "import kotlinx.coroutines.launch\n";
        assert_eq!(extract(ImportSyntax::JvmLike, kotlin), vec!["kotlinx.coroutines.launch"]);
    }

    #[test]
    fn test_c_ruby_php_swift() {
        assert_eq!(
            extract(ImportSyntax::CInclude, "#include <stdio.h>\n# include \"util/str.h\"\n"),
            vec!["stdio.h", "util/str.h"]
        );
        assert_eq!(
            extract(ImportSyntax::Ruby, "require 'json'\nrequire_relative 'helper'\n"),
            vec!["json"]
        );
        assert_eq!(
            extract(ImportSyntax::Php, "use App\\Models\\User;\nrequire_once 'vendor/autoload.php';\n"),
            vec!["App\\Models\\User", "vendor/autoload.php"]
        );
        assert_eq!(
            extract(ImportSyntax::Swift, "import Foundation\n@testable import MyApp\n"),
            vec!["Foundation", "MyApp"]
        );
    }

    #[test]
    fn test_duplicates_removed() {
        let source = "import a from 'x';\nimport b from 'x';\n";
        assert_eq!(extract(ImportSyntax::EcmaScript, source), vec!["x"]);
    }
}
