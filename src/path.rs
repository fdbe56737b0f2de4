//! Cleanup of entry paths before they are written into the archive.
//!
//! Entry names inside the container always use forward slashes. Paths built
//! from several fragments can carry noise such as `html/../images/logo.png`;
//! [`normalize`] reduces them to the canonical relative form readers expect.

/// Clean up a path, removing redundant elements such as `./`, `//` and
/// resolvable `../` segments.
///
/// Backslashes are converted to forward slashes first. A leading `/` (or a
/// `<letter>:` drive prefix on the first segment) marks the path as absolute;
/// `..` segments that would climb above an absolute root are dropped, while on
/// a relative path they are retained as a bounded run of leading `../`.
///
/// The function is idempotent: normalizing an already-normalized path returns
/// it unchanged.
///
/// ```
/// use zipack::path::normalize;
///
/// assert_eq!(normalize("a//b/../c"), "a/c");
/// assert_eq!(normalize("./x/./y"), "x/y");
/// assert_eq!(normalize("../../x"), "../../x");
/// ```
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");

    let mut segments: Vec<&str> = unified
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();

    let mut root = String::new();
    if unified.starts_with('/') {
        root.push('/');
    } else if let Some(first) = segments.first() {
        if is_drive_prefix(first) {
            root = first.to_ascii_uppercase();
            root.push('/');
            segments.remove(0);
        }
    }

    // `depth` is the length of the retained prefix of `stack`; `above` counts
    // the leading `../` runs a relative path keeps; `surplus` tracks how far
    // the running `..` excess got past every segment seen so far.
    let mut stack: Vec<&str> = Vec::new();
    let mut depth = 0usize;
    let mut above = 0usize;
    let mut surplus = 0i64;

    for segment in segments {
        if segment != ".." {
            surplus -= 1;
            stack.truncate(depth);
            stack.push(segment);
            depth += 1;
        } else {
            surplus += 1;
            if depth == 0 {
                if surplus > above as i64 {
                    above += 1;
                }
            } else {
                depth -= 1;
            }
        }
    }

    let mut clean = if root.is_empty() {
        "../".repeat(above)
    } else {
        root
    };
    clean.push_str(&stack[..depth].join("/"));
    clean
}

/// Join `file` to the `dir` path and clean up any excess separators.
pub fn join(dir: &str, file: &str) -> String {
    if dir.is_empty() || file.is_empty() {
        return normalize(&[dir, file].concat());
    }
    normalize(&[dir, "/", file].concat())
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
