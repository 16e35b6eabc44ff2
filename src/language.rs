//! Language tags: the wire enum, editor-identifier detection, and the
//! allow-list of languages that participate in prompt assembly.
//!
//! Detection covers the three editor families the client injects into:
//! Monaco language ids, CodeMirror 5 mode/MIME names, and a couple of
//! filename overrides for cases where the editor mode is ambiguous.

use serde::{Deserialize, Serialize};

/// Wire-level language tag, serialized with the protocol's enum names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "LANGUAGE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "LANGUAGE_C")]
    C,
    #[serde(rename = "LANGUAGE_CLOJURE")]
    Clojure,
    #[serde(rename = "LANGUAGE_COFFEESCRIPT")]
    CoffeeScript,
    #[serde(rename = "LANGUAGE_CPP")]
    Cpp,
    #[serde(rename = "LANGUAGE_CSHARP")]
    CSharp,
    #[serde(rename = "LANGUAGE_CSS")]
    Css,
    #[serde(rename = "LANGUAGE_CUDACPP")]
    CudaCpp,
    #[serde(rename = "LANGUAGE_DART")]
    Dart,
    #[serde(rename = "LANGUAGE_DOCKERFILE")]
    Dockerfile,
    #[serde(rename = "LANGUAGE_GO")]
    Go,
    #[serde(rename = "LANGUAGE_GROOVY")]
    Groovy,
    #[serde(rename = "LANGUAGE_HANDLEBARS")]
    Handlebars,
    #[serde(rename = "LANGUAGE_HASKELL")]
    Haskell,
    #[serde(rename = "LANGUAGE_HCL")]
    Hcl,
    #[serde(rename = "LANGUAGE_HTML")]
    Html,
    #[serde(rename = "LANGUAGE_INI")]
    Ini,
    #[serde(rename = "LANGUAGE_JAVA")]
    Java,
    #[serde(rename = "LANGUAGE_JAVASCRIPT")]
    JavaScript,
    #[serde(rename = "LANGUAGE_JSON")]
    Json,
    #[serde(rename = "LANGUAGE_JULIA")]
    Julia,
    #[serde(rename = "LANGUAGE_KOTLIN")]
    Kotlin,
    #[serde(rename = "LANGUAGE_LATEX")]
    Latex,
    #[serde(rename = "LANGUAGE_LESS")]
    Less,
    #[serde(rename = "LANGUAGE_LUA")]
    Lua,
    #[serde(rename = "LANGUAGE_MAKEFILE")]
    Makefile,
    #[serde(rename = "LANGUAGE_MARKDOWN")]
    Markdown,
    #[serde(rename = "LANGUAGE_OBJECTIVEC")]
    ObjectiveC,
    #[serde(rename = "LANGUAGE_OBJECTIVECPP")]
    ObjectiveCpp,
    #[serde(rename = "LANGUAGE_OCAML")]
    OCaml,
    #[serde(rename = "LANGUAGE_PBTXT")]
    Pbtxt,
    #[serde(rename = "LANGUAGE_PERL")]
    Perl,
    #[serde(rename = "LANGUAGE_PHP")]
    Php,
    #[serde(rename = "LANGUAGE_PLAINTEXT")]
    Plaintext,
    #[serde(rename = "LANGUAGE_PROTOBUF")]
    Protobuf,
    #[serde(rename = "LANGUAGE_PYTHON")]
    Python,
    #[serde(rename = "LANGUAGE_R")]
    R,
    #[serde(rename = "LANGUAGE_RST")]
    Rst,
    #[serde(rename = "LANGUAGE_RUBY")]
    Ruby,
    #[serde(rename = "LANGUAGE_RUST")]
    Rust,
    #[serde(rename = "LANGUAGE_SASS")]
    Sass,
    #[serde(rename = "LANGUAGE_SCALA")]
    Scala,
    #[serde(rename = "LANGUAGE_SCSS")]
    Scss,
    #[serde(rename = "LANGUAGE_SHELL")]
    Shell,
    #[serde(rename = "LANGUAGE_SQL")]
    Sql,
    #[serde(rename = "LANGUAGE_STARLARK")]
    Starlark,
    #[serde(rename = "LANGUAGE_SWIFT")]
    Swift,
    #[serde(rename = "LANGUAGE_TOML")]
    Toml,
    #[serde(rename = "LANGUAGE_TSX")]
    Tsx,
    #[serde(rename = "LANGUAGE_TYPESCRIPT")]
    TypeScript,
    #[serde(rename = "LANGUAGE_VISUALBASIC")]
    VisualBasic,
    #[serde(rename = "LANGUAGE_VUE")]
    Vue,
    #[serde(rename = "LANGUAGE_XML")]
    Xml,
    #[serde(rename = "LANGUAGE_XSL")]
    Xsl,
    #[serde(rename = "LANGUAGE_YAML")]
    Yaml,
}

impl Language {
    /// Fence tag for prompt assembly, present only for the languages that
    /// participate in notebook prompts. The tag is the conventional fenced
    /// code block annotation; R and Scala are allowed in prompts but have no
    /// GFM tag, so they fence untagged.
    pub fn fence_tag(&self) -> Option<&'static str> {
        match self {
            Language::Python => Some("python"),
            Language::Sql => Some("sql"),
            Language::R => Some(""),
            Language::Markdown => Some("markdown"),
            Language::Scala => Some(""),
            _ => None,
        }
    }

    /// Whether this language participates in multi-cell prompt assembly.
    pub fn is_prompt_language(&self) -> bool {
        self.fence_tag().is_some()
    }

    /// Map a Monaco / VS Code language identifier.
    pub fn from_editor_language(id: &str) -> Language {
        match id {
            "bazel" => Language::Starlark,
            "c" => Language::C,
            "clojure" => Language::Clojure,
            "coffeescript" => Language::CoffeeScript,
            "cpp" => Language::Cpp,
            "csharp" => Language::CSharp,
            "css" => Language::Css,
            "cuda-cpp" => Language::CudaCpp,
            "dockerfile" => Language::Dockerfile,
            "go" => Language::Go,
            "groovy" => Language::Groovy,
            "handlebars" => Language::Handlebars,
            "haskell" => Language::Haskell,
            "html" => Language::Html,
            "ini" => Language::Ini,
            "java" => Language::Java,
            "javascript" | "javascriptreact" | "jsx" => Language::JavaScript,
            "json" | "jsonc" => Language::Json,
            "julia" => Language::Julia,
            "kotlin" => Language::Kotlin,
            "latex" => Language::Latex,
            "less" => Language::Less,
            "lua" => Language::Lua,
            "makefile" => Language::Makefile,
            "markdown" => Language::Markdown,
            "objective-c" => Language::ObjectiveC,
            "objective-cpp" => Language::ObjectiveCpp,
            "pbtxt" => Language::Pbtxt,
            "perl" => Language::Perl,
            "pgsql" | "sql" => Language::Sql,
            "php" => Language::Php,
            "plaintext" => Language::Plaintext,
            "proto3" => Language::Protobuf,
            // Colab reports notebook cells under dedicated ids.
            "python" | "notebook-python" | "notebook-python-lsp" => Language::Python,
            "r" => Language::R,
            "ruby" => Language::Ruby,
            "rust" => Language::Rust,
            "sass" => Language::Sass,
            "scala" => Language::Scala,
            "scss" => Language::Scss,
            "shellscript" => Language::Shell,
            "swift" => Language::Swift,
            "terraform" => Language::Hcl,
            "typescript" => Language::TypeScript,
            "typescriptreact" => Language::Tsx,
            "vb" => Language::VisualBasic,
            "vue" | "vue-html" => Language::Vue,
            "xml" => Language::Xml,
            "xsl" => Language::Xsl,
            "yaml" => Language::Yaml,
            _ => Language::Unspecified,
        }
    }

    /// Map a CodeMirror 5 MIME mode option, for modes (clike, css,
    /// javascript, jsx, mllike) that multiplex several languages.
    pub fn from_mime(mime: &str) -> Option<Language> {
        let language = match mime {
            "text/x-csrc" => Language::C,
            "text/x-c++src" => Language::Cpp,
            "text/x-csharp" => Language::CSharp,
            "text/x-java" => Language::Java,
            "text/x-kotlin" => Language::Kotlin,
            "text/x-objectivec" => Language::ObjectiveC,
            "text/x-objectivec++" => Language::ObjectiveCpp,
            "text/x-scala" => Language::Scala,
            "text/css" => Language::Css,
            "text/x-less" => Language::Less,
            "text/x-sass" => Language::Sass,
            "text/x-scss" => Language::Scss,
            "application/json" | "application/x-json" | "application/ld+json" => Language::Json,
            "application/typescript" => Language::TypeScript,
            // No separate JSX language downstream.
            "text/jsx" => Language::JavaScript,
            "text/typescript-jsx" => Language::Tsx,
            "text/x-ocaml" => Language::OCaml,
            "text/x-ipython" => Language::Python,
            _ => return None,
        };
        Some(language)
    }

    /// Map a CodeMirror 5 mode name.
    pub fn from_mode(mode: &str) -> Option<Language> {
        let language = match mode {
            "clojure" => Language::Clojure,
            "coffeescript" => Language::CoffeeScript,
            // Includes Cython.
            "python" | "ipython" => Language::Python,
            "sql" => Language::Sql,
            "dart" => Language::Dart,
            "gfm" | "markdown" | "ipythongfm" => Language::Markdown,
            "go" => Language::Go,
            "groovy" => Language::Groovy,
            "haskell" | "haskell-literate" => Language::Haskell,
            "htmlmixed" => Language::Html,
            "javascript" => Language::JavaScript,
            "julia" => Language::Julia,
            "lua" => Language::Lua,
            "perl" => Language::Perl,
            "php" => Language::Php,
            "null" => Language::Plaintext,
            "protobuf" => Language::Protobuf,
            "r" => Language::R,
            "rst" => Language::Rst,
            "ruby" => Language::Ruby,
            "rust" => Language::Rust,
            "shell" => Language::Shell,
            "swift" => Language::Swift,
            "stex" => Language::Latex,
            "toml" => Language::Toml,
            "vue" => Language::Vue,
            "xml" => Language::Xml,
            "yaml" => Language::Yaml,
            _ => return None,
        };
        Some(language)
    }

    /// Filename overrides for files whose editor mode is indistinguishable
    /// from another language (Starlark reports as Python).
    pub fn from_filename(basename: &str) -> Option<Language> {
        if basename == "BUILD" || basename.ends_with(".bzl") {
            return Some(Language::Starlark);
        }
        None
    }

    /// Full CodeMirror detection: filename override, then MIME, then mode.
    pub fn detect(mode: &str, mime: Option<&str>, path: Option<&str>) -> Language {
        if let Some(path) = path {
            let basename = path.rsplit('/').next().unwrap_or("");
            if let Some(language) = Language::from_filename(basename) {
                return language;
            }
        }
        if let Some(language) = mime.and_then(Language::from_mime) {
            return language;
        }
        Language::from_mode(mode).unwrap_or(Language::Unspecified)
    }
}
