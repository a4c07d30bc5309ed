//! Path classification: functional domain, risk and public-surface
//! predicates for a changed file.
//!
//! Every path maps to exactly one domain. User rules from the settings
//! file are checked first, then test detection, then the built-in glob
//! tables below in order; anything unmatched is `other`.

use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::warn;

use crate::config::ClassifySettings;

pub const DEFAULT_DOMAIN: &str = "other";

/// Test directory names; a path under any of them is a test file.
pub const TEST_DIRS: &[&str] = &["tests", "test", "__tests__", "spec"];

const BUILTIN_DOMAINS: &[(&str, &[&str])] = &[
    (
        "ci",
        &[
            ".github/workflows/**",
            ".github/actions/**",
            ".gitlab-ci.yml",
            ".circleci/**",
            "**/Jenkinsfile",
            "azure-pipelines.yml",
            ".travis.yml",
            "bitbucket-pipelines.yml",
        ],
    ),
    (
        "infra",
        &[
            "**/*.tf",
            "**/*.tfvars",
            "**/*.hcl",
            "**/Dockerfile",
            "**/Dockerfile.*",
            "**/*.dockerfile",
            "**/docker-compose*.{yml,yaml}",
            "**/k8s/**",
            "**/kubernetes/**",
            "**/helm/**",
            "**/charts/**",
            "**/terraform/**",
            "**/infra/**",
            "**/deploy/**",
            "**/ansible/**",
        ],
    ),
    (
        "build",
        &[
            "**/Makefile",
            "**/*.mk",
            "**/CMakeLists.txt",
            "**/*.cmake",
            "**/package.json",
            "**/package-lock.json",
            "**/yarn.lock",
            "**/pnpm-lock.yaml",
            "**/Cargo.toml",
            "**/Cargo.lock",
            "**/build.rs",
            "**/go.mod",
            "**/go.sum",
            "**/pom.xml",
            "**/build.gradle",
            "**/build.gradle.kts",
            "**/settings.gradle*",
            "**/requirements*.txt",
            "**/pyproject.toml",
            "**/setup.py",
            "**/Gemfile",
            "**/Gemfile.lock",
            "**/tsconfig*.json",
            "**/{webpack,vite,rollup,babel}.config.*",
            "**/.babelrc",
        ],
    ),
    (
        "docs",
        &[
            "**/*.{md,mdx,rst,adoc}",
            "**/docs/**",
            "**/doc/**",
            "**/LICENSE*",
            "**/CHANGELOG*",
        ],
    ),
    (
        "db",
        &[
            "**/migrations/**",
            "**/migrate/**",
            "**/*.sql",
            "**/*.prisma",
            "**/schema.rb",
        ],
    ),
    (
        "config",
        &[
            "**/*.{yml,yaml,toml,ini,cfg,conf,json}",
            "**/.env*",
            "**/.*rc",
            "**/.editorconfig",
            "**/.gitignore",
            "**/.gitattributes",
        ],
    ),
    (
        "assets",
        &[
            "**/*.{png,jpg,jpeg,gif,svg,ico,webp,woff,woff2,ttf,eot,mp3,mp4}",
            "**/*.{css,scss,sass,less}",
        ],
    ),
    (
        "source",
        &[
            "**/*.{rs,go,py,js,jsx,mjs,cjs,ts,tsx,java,kt,kts,scala,swift}",
            "**/*.{c,h,cc,cpp,cxx,hpp,cs,rb,php,ex,exs,erl,hs,dart,lua}",
            "**/*.{sh,bash,zsh,vue,svelte,m,mm,clj,r,jl,zig,nim,ml}",
        ],
    ),
];

/// Areas where a mistake tends to be expensive: auth, money, secrets,
/// schema changes, pipelines and deployment.
const BUILTIN_RISKY: &[&str] = &[
    "**/*auth*",
    "**/*login*",
    "**/*session*",
    "**/*permission*",
    "**/*security*",
    "**/*crypto*",
    "**/*secret*",
    "**/*password*",
    "**/*payment*",
    "**/*billing*",
    "**/*stripe*",
    "**/*invoice*",
    "**/migrations/**",
    "**/*.sql",
    ".github/workflows/**",
    "**/Dockerfile",
    "**/*.tf",
    "**/.env*",
    "**/*.{pem,key}",
];

/// Files whose change likely alters a published contract.
const BUILTIN_PUBLIC: &[&str] = &[
    "**/index.{js,mjs,cjs,ts}",
    "**/*.d.ts",
    "**/api/**",
    "**/*.proto",
    "**/*.{graphql,gql}",
    "**/openapi*.{yml,yaml,json}",
    "**/swagger*.{yml,yaml,json}",
    "**/include/**/*.{h,hpp}",
    "**/src/lib.rs",
    "package.json",
];

pub struct Classifier {
    domains: Vec<(String, GlobSet)>,
    risky: GlobSet,
    public: GlobSet,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ClassifySettings::default())
    }
}

impl Classifier {
    /// Build the classifier; user globs are consulted before the built-ins.
    /// Invalid globs are skipped with a warning.
    pub fn new(settings: &ClassifySettings) -> Self {
        let mut domains: Vec<(String, GlobSet)> = settings
            .domains
            .iter()
            .map(|rule| (rule.name.to_lowercase(), build_set(rule.globs.iter())))
            .collect();
        domains.extend(
            BUILTIN_DOMAINS
                .iter()
                .map(|(name, globs)| (name.to_string(), build_set(globs.iter()))),
        );

        let risky = settings
            .risky
            .iter()
            .map(String::as_str)
            .chain(BUILTIN_RISKY.iter().copied());
        let public = settings
            .public
            .iter()
            .map(String::as_str)
            .chain(BUILTIN_PUBLIC.iter().copied());

        Self {
            domains,
            risky: build_set(risky),
            public: build_set(public),
        }
    }

    /// Domain of a path. Total: unmatched paths are `other`.
    pub fn domain(&self, path: &str) -> &str {
        let user_rules = self.domains.len() - BUILTIN_DOMAINS.len();
        let (user, builtin) = self.domains.split_at(user_rules);

        if let Some((name, _)) = user.iter().find(|(_, set)| set.is_match(path)) {
            return name;
        }
        if is_test_file(path) {
            return "test";
        }
        builtin
            .iter()
            .find(|(_, set)| set.is_match(path))
            .map(|(name, _)| name.as_str())
            .unwrap_or(DEFAULT_DOMAIN)
    }

    pub fn is_risky(&self, path: &str) -> bool {
        self.risky.is_match(path)
    }

    pub fn is_public_surface(&self, path: &str) -> bool {
        self.public.is_match(path)
    }
}

fn build_set<I, S>(globs: I) -> GlobSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in globs {
        let pattern = pattern.as_ref();
        match GlobBuilder::new(pattern).case_insensitive(true).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => warn!("skipping glob {pattern:?}: {err}"),
        }
    }
    builder.build().unwrap_or_else(|err| {
        warn!("glob set failed to build: {err}");
        GlobSet::empty()
    })
}

/// Check whether a path is a test file, either by living under a test
/// directory or by a language-specific test naming convention.
pub fn is_test_file(path: &str) -> bool {
    let path = Path::new(path);
    let in_test_dir = path
        .parent()
        .into_iter()
        .flat_map(|p| p.iter())
        .filter_map(|c| c.to_str())
        .any(|c| TEST_DIRS.contains(&c));
    in_test_dir || has_test_name(path)
}

/// Check whether a file matches a test naming pattern based on its extension.
fn has_test_name(path: &Path) -> bool {
    let file_name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };

    let Some(dot) = file_name.rfind('.') else {
        return false;
    };
    let ext = &file_name[dot + 1..];
    let base = &file_name[..dot];

    match ext {
        // suffix _test: Rust, Go, Python, Ruby, PHP, Elixir, Dart
        "rs" | "go" | "exs" | "dart" => base.ends_with("_test"),
        "py" => base.starts_with("test_") || base.ends_with("_test"),
        "rb" => base.ends_with("_test") || base.ends_with("_spec"),
        "php" => base.ends_with("Test") || base.ends_with("_test"),
        // double-ext .test./.spec.: JS/TS family
        "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "mts" | "cts" => {
            base.ends_with(".test") || base.ends_with(".spec")
        }
        // PascalCase suffixes: Java, Kotlin, C#, Swift, Scala
        "java" | "kt" | "kts" | "cs" | "swift" => {
            base.ends_with("Test") || base.ends_with("Tests")
        }
        "scala" | "hs" => base.ends_with("Test") || base.ends_with("Spec"),
        "c" => base.ends_with("_test") || base.starts_with("test_") || base.ends_with("_unittest"),
        "cc" | "cpp" | "cxx" => {
            base.ends_with("_test")
                || base.starts_with("test_")
                || base.ends_with("_unittest")
                || base.ends_with("Test")
        }
        _ => false,
    }
}

/// Capitalized display label for a domain name.
pub fn label(domain: &str) -> String {
    let mut chars = domain.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
