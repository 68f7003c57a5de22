//! Purpose: Compile the MuPDF context shim and emit native link directives.
//! Role: Cargo build-script; only does real work when the `mupdf` feature is on.
//! Invariants: `cargo:rerun-if-*` covers the C sources and every env var read here.
//! Invariants: Without the feature nothing native is compiled or linked.
//! Invariants: Link configuration comes only from `MUPDF_*` env vars and the target triple.
use std::env;
use std::path::{Path, PathBuf};

#[path = "src/core/link_libs.rs"]
mod link_libs;

const ENV_VARS: &[&str] = &[
    "MUPDF_DIR",
    "MUPDF_INCLUDE_DIR",
    "MUPDF_LIB_DIR",
    "MUPDF_STATIC",
    "MUPDF_LIBS",
    "MUPDF_CXX_RUNTIME",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/core/link_libs.rs");
    println!("cargo:rerun-if-changed=c/fitzlink_shim.c");
    println!("cargo:rerun-if-changed=c/fitzlink_shim.cpp");
    println!("cargo:rerun-if-changed=c/fitzlink_shim.h");
    for var in ENV_VARS {
        println!("cargo:rerun-if-env-changed={var}");
    }

    if env::var_os("CARGO_FEATURE_MUPDF").is_none() {
        return;
    }

    let target = env::var("TARGET").unwrap_or_default();
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let layout = MupdfLayout::from_env();

    let include_dir = layout.include_dir();
    if !include_dir.join("mupdf").join("fitz.h").exists() {
        panic!(
            "MuPDF headers not found under `{}`.\n\
             Fix: set `MUPDF_DIR` to the install prefix or `MUPDF_INCLUDE_DIR` to the directory \
             containing `mupdf/fitz.h`, then run cargo build again.",
            include_dir.display()
        );
    }

    let mut build = cc::Build::new();
    build
        .include(&include_dir)
        .include(manifest_dir.join("c"))
        .warnings(false);
    if layout.cxx_runtime {
        build.cpp(true).file(manifest_dir.join("c").join("fitzlink_shim.cpp"));
    } else {
        build.file(manifest_dir.join("c").join("fitzlink_shim.c"));
    }
    build.compile("fitzlink_shim");

    if let Some(lib_dir) = layout.lib_dir() {
        println!("cargo:rustc-link-search=native={}", lib_dir.display());
    }
    emit_link_libs(&target, layout.static_link);
}

struct MupdfLayout {
    prefix: Option<PathBuf>,
    include_dir: Option<PathBuf>,
    lib_dir: Option<PathBuf>,
    static_link: bool,
    cxx_runtime: bool,
}

impl MupdfLayout {
    fn from_env() -> Self {
        Self {
            prefix: env::var_os("MUPDF_DIR").map(PathBuf::from),
            include_dir: env::var_os("MUPDF_INCLUDE_DIR").map(PathBuf::from),
            lib_dir: env::var_os("MUPDF_LIB_DIR").map(PathBuf::from),
            static_link: env_flag("MUPDF_STATIC"),
            cxx_runtime: env_flag("MUPDF_CXX_RUNTIME"),
        }
    }

    fn include_dir(&self) -> PathBuf {
        if let Some(dir) = &self.include_dir {
            return dir.clone();
        }
        match &self.prefix {
            Some(prefix) => prefix.join("include"),
            None => Path::new("/usr/include").to_path_buf(),
        }
    }

    fn lib_dir(&self) -> Option<PathBuf> {
        self.lib_dir
            .clone()
            .or_else(|| self.prefix.as_ref().map(|prefix| prefix.join("lib")))
    }
}

fn emit_link_libs(target: &str, static_link: bool) {
    let overrides = env::var("MUPDF_LIBS")
        .ok()
        .and_then(|value| link_libs::parse_lib_list(&value));
    for lib in link_libs::native_link_libs(target, static_link, overrides.as_deref()) {
        println!("cargo:rustc-link-lib={}", lib.directive());
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
