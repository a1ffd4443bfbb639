//! Static language registry keyed by file extension

/// Languages the scanner recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    // Structural - dependency declarations are extracted
    TypeScript,
    JavaScript,
    Python,
    Go,
    Rust,
    Java,
    Kotlin,
    Scala,
    CSharp,
    C,
    Cpp,
    Ruby,
    Php,
    Swift,

    // Recognized only
    Vue,
    Svelte,
    Html,
    Css,
    Scss,
    Json,
    Yaml,
    Toml,
    Xml,
    Markdown,
    GraphQL,
    Sql,
    Protobuf,
    Shell,
    Dockerfile,
    Makefile,
    Hcl,
    Ini,

    PlainText,
}

/// Family of syntactic rules used to pull dependency targets out of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSyntax {
    /// `import x from 'y'`, `require('y')`, `import('y')`
    EcmaScript,
    /// `from x import y`, `import x`
    Python,
    /// `import "x"` and parenthesized import blocks
    Go,
    /// `use a::b;`, `extern crate a;`
    Rust,
    /// `import a.b.C;`, `using A.B;`
    JvmLike,
    /// `#include "x"`, `#include <x>`
    CInclude,
    /// `require 'x'`
    Ruby,
    /// `use A\B;`, `require 'x';`
    Php,
    /// `import Foundation`
    Swift,
}

impl Language {
    /// Extensions mapped to this language (lower-case, without dot)
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::TypeScript => &["ts", "mts", "cts"],
            Self::JavaScript => &["js", "mjs", "cjs", "jsx"],
            Self::Python => &["py", "pyw", "pyi"],
            Self::Go => &["go"],
            Self::Rust => &["rs"],
            Self::Java => &["java"],
            Self::Kotlin => &["kt", "kts"],
            Self::Scala => &["scala", "sc"],
            Self::CSharp => &["cs"],
            Self::C => &["c", "h"],
            Self::Cpp => &["cpp", "cxx", "cc", "hpp", "hxx", "hh"],
            Self::Ruby => &["rb", "rake"],
            Self::Php => &["php"],
            Self::Swift => &["swift"],
            Self::Vue => &["vue"],
            Self::Svelte => &["svelte"],
            Self::Html => &["html", "htm"],
            Self::Css => &["css"],
            Self::Scss => &["scss", "sass", "less"],
            Self::Json => &["json", "jsonc"],
            Self::Yaml => &["yaml", "yml"],
            Self::Toml => &["toml"],
            Self::Xml => &["xml"],
            Self::Markdown => &["md", "markdown"],
            Self::GraphQL => &["graphql", "gql"],
            Self::Sql => &["sql"],
            Self::Protobuf => &["proto"],
            Self::Shell => &["sh", "bash", "zsh"],
            Self::Dockerfile => &["dockerfile"],
            Self::Makefile => &["mk"],
            Self::Hcl => &["hcl", "tf", "tfvars"],
            Self::Ini => &["ini", "cfg", "conf"],
            Self::PlainText => &[],
        }
    }

    pub const fn all_languages() -> &'static [Self] {
        &[
            Self::TypeScript, Self::JavaScript, Self::Python, Self::Go, Self::Rust,
            Self::Java, Self::Kotlin, Self::Scala, Self::CSharp, Self::C, Self::Cpp,
            Self::Ruby, Self::Php, Self::Swift,
            Self::Vue, Self::Svelte, Self::Html, Self::Css, Self::Scss, Self::Json,
            Self::Yaml, Self::Toml, Self::Xml, Self::Markdown, Self::GraphQL, Self::Sql,
            Self::Protobuf, Self::Shell, Self::Dockerfile, Self::Makefile, Self::Hcl,
            Self::Ini,
        ]
    }

    /// Tag stored on [`crate::CodeFile::language`]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Java => "java",
            Self::Kotlin => "kotlin",
            Self::Scala => "scala",
            Self::CSharp => "csharp",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Swift => "swift",
            Self::Vue => "vue",
            Self::Svelte => "svelte",
            Self::Html => "html",
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Xml => "xml",
            Self::Markdown => "markdown",
            Self::GraphQL => "graphql",
            Self::Sql => "sql",
            Self::Protobuf => "protobuf",
            Self::Shell => "shell",
            Self::Dockerfile => "dockerfile",
            Self::Makefile => "makefile",
            Self::Hcl => "hcl",
            Self::Ini => "ini",
            Self::PlainText => "plaintext",
        }
    }

    /// Dependency rules for languages that support structural analysis
    pub const fn import_syntax(self) -> Option<ImportSyntax> {
        match self {
            Self::TypeScript | Self::JavaScript | Self::Vue | Self::Svelte => {
                Some(ImportSyntax::EcmaScript)
            }
            Self::Python => Some(ImportSyntax::Python),
            Self::Go => Some(ImportSyntax::Go),
            Self::Rust => Some(ImportSyntax::Rust),
            Self::Java | Self::Kotlin | Self::Scala | Self::CSharp => Some(ImportSyntax::JvmLike),
            Self::C | Self::Cpp => Some(ImportSyntax::CInclude),
            Self::Ruby => Some(ImportSyntax::Ruby),
            Self::Php => Some(ImportSyntax::Php),
            Self::Swift => Some(ImportSyntax::Swift),
            _ => None,
        }
    }

    pub const fn is_structural(self) -> bool {
        self.import_syntax().is_some()
    }

    /// Detect the language from a file name; unknown names are plain text
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_lowercase();

        match lower.as_str() {
            "dockerfile" | "containerfile" => return Self::Dockerfile,
            "makefile" | "gnumakefile" => return Self::Makefile,
            "gemfile" | "rakefile" => return Self::Ruby,
            _ => {}
        }
        if lower.starts_with("dockerfile.") {
            return Self::Dockerfile;
        }

        let Some(extension) = lower.rsplit_once('.').map(|(_, ext)| ext) else {
            return Self::PlainText;
        };

        Self::all_languages()
            .iter()
            .copied()
            .find(|lang| lang.extensions().contains(&extension))
            .unwrap_or(Self::PlainText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_detection() {
        assert_eq!(Language::from_file_name("a.ts"), Language::TypeScript);
        assert_eq!(Language::from_file_name("A.PY"), Language::Python);
        assert_eq!(Language::from_file_name("lib.rs"), Language::Rust);
        assert_eq!(Language::from_file_name("notes.xyz"), Language::PlainText);
        assert_eq!(Language::from_file_name("LICENSE"), Language::PlainText);
    }

    #[test]
    fn test_special_file_names() {
        assert_eq!(Language::from_file_name("Dockerfile"), Language::Dockerfile);
        assert_eq!(Language::from_file_name("Dockerfile.prod"), Language::Dockerfile);
        assert_eq!(Language::from_file_name("Makefile"), Language::Makefile);
    }

    #[test]
    fn test_structural_languages() {
        assert!(Language::TypeScript.is_structural());
        assert!(Language::Go.is_structural());
        assert!(!Language::Markdown.is_structural());
        assert!(!Language::PlainText.is_structural());
    }

    #[test]
    fn test_extensions_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for lang in Language::all_languages() {
            for ext in lang.extensions() {
                assert!(seen.insert(*ext), "duplicate extension {ext}");
            }
        }
    }
}
