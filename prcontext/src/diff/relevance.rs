//! Essential-file classification by filename suffix.
//!
//! Opaque or generated content (media, archives, compiled output, lock
//! files, minified bundles) cannot be usefully reviewed and would only burn
//! budget, so it never reaches the allocator.

/// Suffixes of non-essential files. Matched case-insensitively.
pub const NON_ESSENTIAL_SUFFIXES: &[&str] = &[
    // Images
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".tiff", ".tif", ".ico", ".webp", ".svg", ".psd",
    ".heic", ".raw",
    // Video
    ".mp4", ".mov", ".avi", ".mkv", ".webm", ".flv", ".wmv", ".m4v",
    // Audio
    ".mp3", ".wav", ".ogg", ".flac", ".aac", ".m4a", ".wma",
    // Archives
    ".zip", ".tar", ".gz", ".tgz", ".bz2", ".xz", ".7z", ".rar", ".jar", ".war", ".ear",
    // Binaries and compiled output
    ".exe", ".dll", ".so", ".dylib", ".bin", ".o", ".obj", ".a", ".lib", ".class", ".pyc",
    ".pyo", ".wasm", ".dat", ".db", ".sqlite", ".sqlite3",
    // Lock files
    ".lock", "package-lock.json", "pnpm-lock.yaml", "yarn.lock", "go.sum",
    // Certificates and keys
    ".pem", ".crt", ".cer", ".der", ".key", ".p12", ".pfx", ".jks",
    // Minified assets and source maps
    ".min.js", ".min.css", ".map",
    // Fonts
    ".ttf", ".otf", ".woff", ".woff2", ".eot",
    // Documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
    // Serialized models and data dumps
    ".pkl", ".pt", ".onnx", ".h5", ".parquet",
];

/// Whether `filename` should be considered for inclusion at all.
pub fn is_essential_file(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    !NON_ESSENTIAL_SUFFIXES
        .iter()
        .any(|suffix| lower.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_files_are_essential() {
        assert!(is_essential_file("src/main.rs"));
        assert!(is_essential_file("web/app.tsx"));
        assert!(is_essential_file("Makefile"));
        assert!(is_essential_file("docs/guide.md"));
    }

    #[test]
    fn test_deny_listed_suffixes() {
        assert!(!is_essential_file("assets/logo.png"));
        assert!(!is_essential_file("Cargo.lock"));
        assert!(!is_essential_file("dist/bundle.min.js"));
        assert!(!is_essential_file("dist/bundle.js.map"));
        assert!(!is_essential_file("certs/server.pem"));
        assert!(!is_essential_file("frontend/package-lock.json"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(!is_essential_file("Screenshot.PNG"));
        assert!(!is_essential_file("release/App.EXE"));
    }

    #[test]
    fn test_suffix_must_be_at_end() {
        assert!(is_essential_file("src/png_decoder.rs"));
        assert!(is_essential_file("lockfile.rs"));
    }
}
