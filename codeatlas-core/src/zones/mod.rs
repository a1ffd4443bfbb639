//! Zone classification
//!
//! Maps a file to exactly one [`Zone`] using path heuristics. The rules are
//! checked in a fixed priority order and the first match wins; the order is
//! what keeps ambiguous paths stable (a test under `/api/` is a test, a
//! `user-util-service.ts` is core rather than lib).

use crate::models::{CodeFile, Zone};

const TEST_MARKERS: &[&str] = &[".test.", ".spec.", "__tests__", "/test/", "/tests/"];

const INFRA_DIRS: &[&str] = &[
    "/.github/", "/.gitlab/", "/.circleci/", "/.buildkite/", "/ci/", "/deploy/",
    "/k8s/", "/kubernetes/", "/helm/", "/terraform/", "/infra/", "/infrastructure/",
];

const INFRA_FILES: &[&str] = &[
    ".dockerignore", "jenkinsfile", "makefile", "procfile", "vagrantfile",
    ".gitlab-ci.yml", ".travis.yml", "skaffold.yaml", "compose.yml", "compose.yaml",
];

const INFRA_FILE_PREFIXES: &[&str] = &["dockerfile", "docker-compose"];

const INFRA_EXTENSIONS: &[&str] = &["tf", "tfvars", "hcl", "nomad"];

const ENTRY_STEMS: &[&str] = &[
    "main", "index", "app", "server", "cli", "bin", "entry", "bootstrap", "startup",
];

const ENTRY_DIRS: &[&str] = &["/bin/", "/cmd/", "/cli/"];

const API_DIRS: &[&str] = &[
    "/api/", "/routes/", "/controllers/", "/handlers/", "/resolvers/", "/graphql/",
];

const API_STEM_MARKERS: &[&str] = &["controller", "handler", "route", "endpoint"];

const API_EXTENSIONS: &[&str] = &["graphql", "gql"];

const DATA_DIRS: &[&str] = &[
    "/models/", "/schemas/", "/repositories/", "/migrations/", "/db/", "/orm/",
];

const DATA_EXTENSIONS: &[&str] = &["sql", "prisma"];

const UI_DIRS: &[&str] = &["/components/", "/views/", "/pages/", "/layouts/"];

const UI_EXTENSIONS: &[&str] = &[
    "css", "scss", "sass", "less", "styl", "vue", "svelte", "jsx", "tsx", "html",
];

const LIB_DIRS: &[&str] = &["/utils/", "/util/", "/helpers/", "/lib/", "/shared/", "/common/"];

const CONFIG_EXTENSIONS: &[&str] = &[
    "json", "yaml", "yml", "toml", "ini", "cfg", "conf", "env", "xml", "lock",
];

const CORE_DIRS: &[&str] = &["/services/", "/domain/", "/managers/", "/providers/"];

const CORE_STEM_MARKERS: &[&str] = &["service", "provider", "manager"];

const LIB_STEM_MARKERS: &[&str] = &["util", "helper"];

const SOURCE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "py", "go", "rs", "java", "kt", "kts",
    "scala", "cs", "c", "h", "cc", "cpp", "cxx", "hpp", "hxx", "rb", "php", "swift",
    "m", "mm", "dart", "lua", "ex", "exs", "erl", "hs", "clj", "fs", "vue", "svelte",
];

/// Path pieces the rules look at, lower-cased once
struct PathParts<'a> {
    /// `/`-prefixed so root-level directories match `/name/` markers
    path: String,
    name: &'a str,
    /// Name without its last extension; dotfiles keep their whole name
    base: String,
    /// Text after the last dot, empty when there is none
    extension: String,
}

impl<'a> PathParts<'a> {
    fn new(relative_path: &'a str) -> Self {
        let normalized = relative_path.replace('\\', "/");
        let path = format!("/{}", normalized.trim_start_matches('/').to_lowercase());
        let name = relative_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(relative_path);
        let lower_name = name.to_lowercase();
        let (base, extension) = match lower_name.rfind('.') {
            Some(0) | None => (lower_name.clone(), String::new()),
            Some(idx) => (lower_name[..idx].to_string(), lower_name[idx + 1..].to_string()),
        };
        Self { path, name, base, extension }
    }

    fn lower_name(&self) -> String {
        self.name.to_lowercase()
    }

    fn path_has(&self, markers: &[&str]) -> bool {
        markers.iter().any(|marker| self.path.contains(marker))
    }

    fn base_has(&self, markers: &[&str]) -> bool {
        markers.iter().any(|marker| self.base.contains(marker))
    }

    fn extension_in(&self, extensions: &[&str]) -> bool {
        extensions.contains(&self.extension.as_str())
    }

    fn is_source(&self) -> bool {
        self.extension_in(SOURCE_EXTENSIONS)
    }
}

/// Pure, total mapping from files to zones
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneClassifier;

impl ZoneClassifier {
    pub const fn new() -> Self {
        Self
    }

    pub fn zone_for(&self, file: &CodeFile) -> Zone {
        self.zone_for_path(&file.relative_path)
    }

    pub fn zone_for_path(&self, relative_path: &str) -> Zone {
        let parts = PathParts::new(relative_path);

        if parts.path_has(TEST_MARKERS) {
            return Zone::Test;
        }
        if is_infra(&parts) {
            return Zone::Infra;
        }
        if parts.is_source()
            && (ENTRY_STEMS.contains(&parts.base.as_str()) || parts.path_has(ENTRY_DIRS))
        {
            return Zone::Entry;
        }
        if parts.path_has(API_DIRS)
            || parts.extension_in(API_EXTENSIONS)
            || (parts.is_source() && parts.base_has(API_STEM_MARKERS))
        {
            return Zone::Api;
        }
        if parts.path_has(DATA_DIRS) || parts.extension_in(DATA_EXTENSIONS) {
            return Zone::Data;
        }
        if parts.path_has(UI_DIRS) || parts.extension_in(UI_EXTENSIONS) {
            return Zone::Ui;
        }
        if parts.path_has(LIB_DIRS) || parts.extension_in(CONFIG_EXTENSIONS) {
            return Zone::Lib;
        }
        // Service-like names outrank the generic util/helper names below.
        if parts.path_has(CORE_DIRS) || parts.base_has(CORE_STEM_MARKERS) {
            return Zone::Core;
        }
        if parts.base_has(LIB_STEM_MARKERS) {
            return Zone::Lib;
        }

        if parts.is_source() {
            Zone::Core
        } else {
            Zone::Lib
        }
    }
}

fn is_infra(parts: &PathParts<'_>) -> bool {
    if parts.path_has(INFRA_DIRS) || parts.extension_in(INFRA_EXTENSIONS) {
        return true;
    }
    let name = parts.lower_name();
    INFRA_FILES.contains(&name.as_str())
        || INFRA_FILE_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(path: &str) -> Zone {
        ZoneClassifier::new().zone_for_path(path)
    }

    #[test]
    fn test_service_outranks_util() {
        assert_eq!(zone("src/services/user-util-service.ts"), Zone::Core);
        assert_eq!(zone("src/user-util-service.ts"), Zone::Core);
        assert_eq!(zone("src/string-util.ts"), Zone::Lib);
        assert_eq!(zone("src/date.util.ts"), Zone::Lib);
        assert_eq!(zone("src/form.helpers.js"), Zone::Lib);
        assert_eq!(zone("src/billing.service.ts"), Zone::Core);
        assert_eq!(zone("src/user.util.service.ts"), Zone::Core);
    }

    #[test]
    fn test_lib_directory_outranks_service_name() {
        assert_eq!(zone("src/utils/user-service.ts"), Zone::Lib);
    }

    #[test]
    fn test_tests_win_over_everything() {
        assert_eq!(zone("src/api/users.test.ts"), Zone::Test);
        assert_eq!(zone("src/components/__tests__/Button.tsx"), Zone::Test);
        assert_eq!(zone("tests/integration.rs"), Zone::Test);
        assert_eq!(zone("pkg/server/handler.spec.js"), Zone::Test);
    }

    #[test]
    fn test_infra_markers() {
        assert_eq!(zone(".github/workflows/ci.yml"), Zone::Infra);
        assert_eq!(zone("Dockerfile"), Zone::Infra);
        assert_eq!(zone("docker/Dockerfile.dev"), Zone::Infra);
        assert_eq!(zone("docker-compose.yaml"), Zone::Infra);
        assert_eq!(zone("terraform/main.tf"), Zone::Infra);
        assert_eq!(zone("Makefile"), Zone::Infra);
    }

    #[test]
    fn test_entry_points_need_source_extension() {
        assert_eq!(zone("src/main.rs"), Zone::Entry);
        assert_eq!(zone("src/index.ts"), Zone::Entry);
        assert_eq!(zone("cmd/tool/run.go"), Zone::Entry);
        assert_eq!(zone("index.html"), Zone::Ui);
        assert_eq!(zone("app.json"), Zone::Lib);
    }

    #[test]
    fn test_entry_names_match_whole_base_name() {
        assert_eq!(zone("src/app.module.ts"), Zone::Core);
        assert_eq!(zone("src/main.helpers.ts"), Zone::Lib);
        assert_eq!(zone("src/server.controller.ts"), Zone::Api);
        assert_eq!(zone("src/App.tsx"), Zone::Entry);
    }

    #[test]
    fn test_api_data_ui_markers() {
        assert_eq!(zone("src/routes/users.ts"), Zone::Api);
        assert_eq!(zone("src/userController.ts"), Zone::Api);
        assert_eq!(zone("src/users.controller.ts"), Zone::Api);
        assert_eq!(zone("src/orders.routes.js"), Zone::Api);
        assert_eq!(zone("src/payment.handler.go"), Zone::Api);
        assert_eq!(zone("src/health.endpoint.py"), Zone::Api);
        assert_eq!(zone("schema/types.graphql"), Zone::Api);
        assert_eq!(zone("src/models/user.py"), Zone::Data);
        assert_eq!(zone("db/001_init.sql"), Zone::Data);
        assert_eq!(zone("src/components/Button.vue"), Zone::Ui);
        assert_eq!(zone("styles/site.scss"), Zone::Ui);
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(zone("src/engine.go"), Zone::Core);
        assert_eq!(zone("README.md"), Zone::Lib);
        assert_eq!(zone("LICENSE"), Zone::Lib);
        assert_eq!(zone("package.json"), Zone::Lib);
    }

    #[test]
    fn test_is_case_insensitive_and_handles_backslashes() {
        assert_eq!(zone("SRC\\Services\\Billing.cs"), Zone::Core);
        assert_eq!(zone("Tests/Foo.java"), Zone::Test);
    }

    #[test]
    fn test_zone_for_file_uses_relative_path() {
        let file = CodeFile {
            id: CodeFile::id_for("src/db/pool.rs"),
            file_path: "/repo/src/db/pool.rs".to_string(),
            relative_path: "src/db/pool.rs".to_string(),
            language: "rust".to_string(),
            size: 0,
            lines: 0,
            dependencies: Vec::new(),
            complexity: None,
            last_modified: None,
            content: String::new(),
        };
        assert_eq!(ZoneClassifier::new().zone_for(&file), Zone::Data);
    }
}
