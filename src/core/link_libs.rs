//! Purpose: Decide which native libraries a MuPDF build links against.
//! Exports: `LinkLib`, `native_link_libs`, `parse_lib_list`.
//! Role: Shared by `build.rs` (via `#[path]`) and the library's unit tests.
//! Invariants: Self-contained; no `crate::` paths so the build script can include it.
//! Invariants: Static MSVC builds list every archive a stock MuPDF win32 build produces.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkKind {
    Static,
    Dylib,
}

impl LinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Static => "static",
            LinkKind::Dylib => "dylib",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkLib {
    pub kind: LinkKind,
    pub name: String,
}

impl LinkLib {
    fn new(kind: LinkKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }

    /// Value for a `cargo:rustc-link-lib=` directive.
    pub fn directive(&self) -> String {
        format!("{}={}", self.kind.as_str(), self.name)
    }
}

const MSVC_STATIC_ARCHIVES: &[&str] = &[
    "libmupdf",
    "libthirdparty",
    "libresources",
    "libharfbuzz",
    "libextract",
    "libpkcs7",
    "libzxing",
    "libleptonica",
    "libtesseract",
];

const MSVC_DYLIB_IMPORTS: &[&str] = &["libmupdf", "libthirdparty", "libresources"];

const MSVC_SYSTEM_LIBS: &[&str] = &[
    "user32",
    "gdi32",
    "advapi32",
    "shell32",
    "ole32",
    "oleaut32",
    "comdlg32",
    "crypt32",
    "msimg32",
    "windowscodecs",
    "winspool",
];

/// Libraries for `target`. `mupdf_libs` replaces the MuPDF archive list
/// (from `MUPDF_LIBS`) but never the system libraries.
pub fn native_link_libs(
    target: &str,
    static_link: bool,
    mupdf_libs: Option<&[String]>,
) -> Vec<LinkLib> {
    let kind = if static_link {
        LinkKind::Static
    } else {
        LinkKind::Dylib
    };
    let mut libs = Vec::new();

    if let Some(names) = mupdf_libs {
        libs.extend(names.iter().map(|name| LinkLib::new(kind, name)));
    } else if target.contains("windows-msvc") {
        let names = if static_link {
            MSVC_STATIC_ARCHIVES
        } else {
            MSVC_DYLIB_IMPORTS
        };
        libs.extend(names.iter().map(|name| LinkLib::new(kind, name)));
    } else {
        libs.push(LinkLib::new(kind, "mupdf"));
        if static_link {
            libs.push(LinkLib::new(LinkKind::Static, "mupdf-third"));
        }
    }

    if target.contains("windows-msvc") {
        libs.extend(MSVC_SYSTEM_LIBS.iter().map(|name| LinkLib::new(LinkKind::Dylib, name)));
    } else if !target.contains("windows") {
        libs.push(LinkLib::new(LinkKind::Dylib, "m"));
    }
    libs
}

/// Splits a comma or whitespace separated `MUPDF_LIBS` value.
pub fn parse_lib_list(value: &str) -> Option<Vec<String>> {
    let names: Vec<String> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    (!names.is_empty()).then_some(names)
}
